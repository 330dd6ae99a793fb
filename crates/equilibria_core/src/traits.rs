use nalgebra::{Matrix2, Vector2};

/// A two-dimensional nonlinear system `f(x) = 0` whose roots are equilibria.
///
/// Implementors provide the residual and its analytic Jacobian; the Newton
/// solver never differentiates numerically.
pub trait PlanarSystem {
    /// Evaluates the residual (the vector field) at `state`.
    fn residual(&self, state: &Vector2<f64>) -> Vector2<f64>;

    /// Evaluates the Jacobian of the residual at `state`.
    /// Row `i`, column `j` holds `∂f_i / ∂x_j`.
    fn jacobian(&self, state: &Vector2<f64>) -> Matrix2<f64>;
}

impl<S: PlanarSystem + ?Sized> PlanarSystem for &S {
    fn residual(&self, state: &Vector2<f64>) -> Vector2<f64> {
        (**self).residual(state)
    }

    fn jacobian(&self, state: &Vector2<f64>) -> Matrix2<f64> {
        (**self).jacobian(state)
    }
}
