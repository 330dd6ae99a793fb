pub mod config;
pub mod equilibrium;
pub mod error;
pub mod linalg;
pub mod lotka_volterra;
pub mod stability;
/// The `equilibria_core` crate locates equilibria of planar nonlinear systems
/// with Newton–Raphson iteration and a closed-form 2×2 Jacobian inverse.
///
/// Key components:
/// - **Traits**: `PlanarSystem` (residual plus analytic Jacobian).
/// - **Lotka–Volterra**: the predator–prey model and its analytic equilibria.
/// - **Equilibrium**: one-shot and stepped Newton solvers with an explicit
///   `Termination` (converged, degenerate, cap exhausted).
/// - **Stability**: eigenvalue-based classification of the located point.
pub mod traits;
