use thiserror::Error;

/// Failures raised by the equilibrium solver.
///
/// Degenerate iterates and iteration-cap exhaustion are *not* errors; they are
/// reported through [`crate::equilibrium::Termination`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// A model parameter is zero, negative, or non-finite.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Solver settings or the initial guess are unusable.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// The Jacobian determinant vanished, so the Newton update is undefined.
    #[error("Jacobian is singular at iteration {iteration} (det = {determinant}, state = {state:?})")]
    SingularJacobian {
        iteration: usize,
        determinant: f64,
        state: [f64; 2],
    },

    /// An update produced NaN or infinity.
    #[error("iterate {iteration} is not finite: {state:?}")]
    NonFiniteState { iteration: usize, state: [f64; 2] },
}

pub type SolverResult<T> = Result<T, SolverError>;
