//! Lotka–Volterra predator–prey model.
//!
//! ```text
//! dx/dt =  alpha*x - beta*x*y     (prey)
//! dy/dt = -gamma*y + delta*x*y    (predator)
//! ```

use crate::error::{SolverError, SolverResult};
use crate::traits::PlanarSystem;
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

/// Rate parameters of the model. All four must be finite and strictly positive.
///
/// Missing fields deserialize to the classic defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotkaVolterraParams {
    /// Prey growth rate.
    pub alpha: f64,
    /// Predation rate.
    pub beta: f64,
    /// Predator death rate.
    pub gamma: f64,
    /// Predator growth per prey consumed.
    pub delta: f64,
}

impl Default for LotkaVolterraParams {
    fn default() -> Self {
        Self {
            alpha: 100.0,
            beta: 4.0,
            gamma: 20.0,
            delta: 0.01,
        }
    }
}

impl LotkaVolterraParams {
    pub fn new(alpha: f64, beta: f64, gamma: f64, delta: f64) -> Self {
        Self {
            alpha,
            beta,
            gamma,
            delta,
        }
    }

    pub fn validate(&self) -> SolverResult<()> {
        for (name, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
            ("delta", self.delta),
        ] {
            if !value.is_finite() {
                return Err(SolverError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite",
                });
            }
            if value <= 0.0 {
                return Err(SolverError::InvalidParameter {
                    name,
                    value,
                    reason: "must be strictly positive",
                });
            }
        }
        Ok(())
    }

    /// The coexistence point `(gamma/delta, alpha/beta)`.
    pub fn coexistence_equilibrium(&self) -> Vector2<f64> {
        Vector2::new(self.gamma / self.delta, self.alpha / self.beta)
    }

    /// The trivial (extinction) point at the origin.
    pub fn extinction_equilibrium(&self) -> Vector2<f64> {
        Vector2::zeros()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LotkaVolterra {
    params: LotkaVolterraParams,
}

impl LotkaVolterra {
    pub fn new(params: LotkaVolterraParams) -> SolverResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &LotkaVolterraParams {
        &self.params
    }
}

impl PlanarSystem for LotkaVolterra {
    fn residual(&self, state: &Vector2<f64>) -> Vector2<f64> {
        let LotkaVolterraParams {
            alpha,
            beta,
            gamma,
            delta,
        } = self.params;
        let (x, y) = (state[0], state[1]);
        Vector2::new(alpha * x - beta * x * y, -gamma * y + delta * x * y)
    }

    fn jacobian(&self, state: &Vector2<f64>) -> Matrix2<f64> {
        let LotkaVolterraParams {
            alpha,
            beta,
            gamma,
            delta,
        } = self.params;
        let (x, y) = (state[0], state[1]);
        Matrix2::new(
            alpha - beta * y,
            -beta * x,
            delta * y,
            -gamma + delta * x,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact_model() -> LotkaVolterra {
        LotkaVolterra::new(LotkaVolterraParams::new(2.0, 1.0, 1.0, 0.5)).expect("valid params")
    }

    #[test]
    fn default_params_give_classic_equilibrium() {
        let eq = LotkaVolterraParams::default().coexistence_equilibrium();
        assert!((eq[0] - 2000.0).abs() < 1e-9);
        assert!((eq[1] - 25.0).abs() < 1e-12);
    }

    #[test]
    fn residual_vanishes_at_both_equilibria() {
        let model = exact_model();
        let coexist = model.params().coexistence_equilibrium();
        assert_eq!(model.residual(&coexist), Vector2::zeros());
        assert_eq!(
            model.residual(&model.params().extinction_equilibrium()),
            Vector2::zeros()
        );
    }

    #[test]
    fn jacobian_matches_finite_differences() {
        let model = exact_model();
        let state = Vector2::new(1.3, 0.7);
        let jac = model.jacobian(&state);
        let h = 1e-6;
        for j in 0..2 {
            let mut plus = state;
            let mut minus = state;
            plus[j] += h;
            minus[j] -= h;
            let column = (model.residual(&plus) - model.residual(&minus)) / (2.0 * h);
            for i in 0..2 {
                assert!(
                    (jac[(i, j)] - column[i]).abs() < 1e-6,
                    "entry ({i}, {j}): analytic {} vs numeric {}",
                    jac[(i, j)],
                    column[i]
                );
            }
        }
    }

    #[test]
    fn rejects_zero_and_negative_parameters() {
        let err = LotkaVolterra::new(LotkaVolterraParams::new(1.0, 0.0, 1.0, 1.0))
            .expect_err("zero beta");
        assert!(matches!(err, SolverError::InvalidParameter { name: "beta", .. }));

        let err = LotkaVolterra::new(LotkaVolterraParams::new(1.0, 1.0, 1.0, -2.0))
            .expect_err("negative delta");
        assert!(format!("{err}").contains("delta"));
    }

    #[test]
    fn rejects_non_finite_parameters() {
        let err = LotkaVolterraParams::new(f64::NAN, 1.0, 1.0, 1.0)
            .validate()
            .expect_err("nan alpha");
        assert!(format!("{err}").contains("must be finite"));
    }
}
