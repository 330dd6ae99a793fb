use crate::error::{SolverError, SolverResult};
use crate::linalg::{determinant_2x2, invert_2x2, is_zero_vector, within_tolerance};
use crate::lotka_volterra::{LotkaVolterra, LotkaVolterraParams};
use crate::traits::PlanarSystem;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewtonSettings {
    pub max_steps: usize,
    /// Per-component absolute tolerance against the known equilibrium.
    pub tolerance: [f64; 2],
}

impl Default for NewtonSettings {
    fn default() -> Self {
        Self {
            max_steps: 100,
            tolerance: [0.01, 0.01],
        }
    }
}

impl NewtonSettings {
    pub fn validate(&self) -> SolverResult<()> {
        if self.max_steps == 0 {
            return Err(SolverError::InvalidSettings(
                "max_steps must be greater than zero.".into(),
            ));
        }
        if self.tolerance.iter().any(|t| !t.is_finite() || *t <= 0.0) {
            return Err(SolverError::InvalidSettings(format!(
                "tolerances must be positive and finite, got {:?}.",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// How a solve ended. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Every component is within tolerance of the known equilibrium.
    Converged,
    /// The iterate collapsed onto the trivial all-zero solution.
    Degenerate,
    /// The iteration cap was reached first.
    CapExhausted,
}

impl Termination {
    pub fn message(&self) -> &'static str {
        match self {
            Termination::Converged => "converged to the known equilibrium",
            Termination::Degenerate => "trivial solution found, try different initial values",
            Termination::CapExhausted => "iteration cap reached without convergence",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquilibriumReport {
    pub termination: Termination,
    pub state: [f64; 2],
    pub target: [f64; 2],
    pub iterations: usize,
    /// `‖f(state)‖₂` at the final iterate.
    pub residual_norm: f64,
    /// `|state - target|` per component.
    pub error: [f64; 2],
    /// Every iterate produced, in order. The initial guess is not included.
    pub trace: Vec<[f64; 2]>,
}

impl EquilibriumReport {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Snapshot of a running solve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolverProgress {
    pub done: bool,
    pub iterations: usize,
    pub max_steps: usize,
    pub state: [f64; 2],
    pub residual_norm: f64,
    pub termination: Option<Termination>,
}

/// One Newton–Raphson update `x - J(x)⁻¹ f(x)` using the closed-form inverse.
pub fn newton_update<S: PlanarSystem>(
    system: &S,
    state: &Vector2<f64>,
) -> SolverResult<Vector2<f64>> {
    newton_step(system, state, 0)
}

fn newton_step<S: PlanarSystem>(
    system: &S,
    state: &Vector2<f64>,
    iteration: usize,
) -> SolverResult<Vector2<f64>> {
    let residual = system.residual(state);
    let jacobian = system.jacobian(state);
    let inverse = invert_2x2(&jacobian).ok_or_else(|| SolverError::SingularJacobian {
        iteration,
        determinant: determinant_2x2(&jacobian),
        state: to_array(state),
    })?;
    Ok(state - inverse * residual)
}

/// Stepped Newton solver.
///
/// Holds the latest iterate and the trace; callers drive it with
/// [`EquilibriumSolver::step`] or [`EquilibriumSolver::run_steps`] and can
/// observe each iterate as it is produced.
#[derive(Debug, Clone)]
pub struct EquilibriumSolver<S: PlanarSystem> {
    system: S,
    target: Vector2<f64>,
    tolerance: Vector2<f64>,
    max_steps: usize,
    state: Vector2<f64>,
    iterations: usize,
    trace: Vec<[f64; 2]>,
    termination: Option<Termination>,
}

impl<S: PlanarSystem> EquilibriumSolver<S> {
    pub fn new(
        system: S,
        target: Vector2<f64>,
        initial_guess: Vector2<f64>,
        settings: NewtonSettings,
    ) -> SolverResult<Self> {
        settings.validate()?;
        if initial_guess.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::InvalidSettings(format!(
                "initial guess must be finite, got [{}, {}].",
                initial_guess[0], initial_guess[1]
            )));
        }
        if target.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::InvalidSettings(format!(
                "target equilibrium must be finite, got [{}, {}].",
                target[0], target[1]
            )));
        }

        let tolerance = Vector2::from(settings.tolerance);
        let termination = if within_tolerance(&initial_guess, &target, &tolerance) {
            info!("initial guess already within tolerance of the equilibrium");
            Some(Termination::Converged)
        } else {
            None
        };

        Ok(Self {
            system,
            target,
            tolerance,
            max_steps: settings.max_steps,
            state: initial_guess,
            iterations: 0,
            trace: Vec::new(),
            termination,
        })
    }

    /// Performs one update unless the solve has already terminated.
    pub fn step(&mut self) -> SolverResult<Option<Termination>> {
        if let Some(termination) = self.termination {
            return Ok(Some(termination));
        }

        let next = newton_step(&self.system, &self.state, self.iterations + 1)?;
        self.iterations += 1;
        if next.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::NonFiniteState {
                iteration: self.iterations,
                state: to_array(&next),
            });
        }
        self.state = next;
        self.trace.push(to_array(&next));
        debug!(iteration = self.iterations, x = next[0], y = next[1], "newton iterate");

        let termination = if is_zero_vector(&self.state) {
            warn!(
                iteration = self.iterations,
                "trivial solution found, try different initial values"
            );
            Some(Termination::Degenerate)
        } else if within_tolerance(&self.state, &self.target, &self.tolerance) {
            info!(
                iterations = self.iterations,
                x = self.state[0],
                y = self.state[1],
                "converged"
            );
            Some(Termination::Converged)
        } else if self.iterations >= self.max_steps {
            warn!(max_steps = self.max_steps, "iteration cap reached without convergence");
            Some(Termination::CapExhausted)
        } else {
            None
        };

        self.termination = termination;
        Ok(termination)
    }

    /// Runs at most `batch_size` updates.
    pub fn run_steps(&mut self, batch_size: usize) -> SolverResult<Option<Termination>> {
        for _ in 0..batch_size {
            if self.step()?.is_some() {
                break;
            }
        }
        Ok(self.termination)
    }

    /// Runs until the solve terminates.
    pub fn run(&mut self) -> SolverResult<Termination> {
        loop {
            if let Some(termination) = self.step()? {
                return Ok(termination);
            }
        }
    }

    pub fn is_done(&self) -> bool {
        self.termination.is_some()
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn state(&self) -> Vector2<f64> {
        self.state
    }

    pub fn target(&self) -> Vector2<f64> {
        self.target
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn trace(&self) -> &[[f64; 2]] {
        &self.trace
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    pub fn residual_norm(&self) -> f64 {
        self.system.residual(&self.state).norm()
    }

    pub fn progress(&self) -> SolverProgress {
        SolverProgress {
            done: self.is_done(),
            iterations: self.iterations,
            max_steps: self.max_steps,
            state: to_array(&self.state),
            residual_norm: self.residual_norm(),
            termination: self.termination,
        }
    }

    /// Builds the report, or `None` while the solve is still running.
    pub fn report(&self) -> Option<EquilibriumReport> {
        let termination = self.termination?;
        let error = (self.state - self.target).abs();
        Some(EquilibriumReport {
            termination,
            state: to_array(&self.state),
            target: to_array(&self.target),
            iterations: self.iterations,
            residual_norm: self.residual_norm(),
            error: to_array(&error),
            trace: self.trace.clone(),
        })
    }

    /// Consumes the solver, handing back the solver itself while it is
    /// still running.
    pub fn into_report(self) -> Result<EquilibriumReport, Self> {
        match self.report() {
            Some(report) => Ok(report),
            None => Err(self),
        }
    }
}

/// Runs Newton–Raphson from `initial_guess` until it converges on `target`,
/// degenerates to the origin, or exhausts `settings.max_steps`.
pub fn solve_equilibrium<S: PlanarSystem>(
    system: S,
    target: Vector2<f64>,
    initial_guess: Vector2<f64>,
    settings: NewtonSettings,
) -> SolverResult<EquilibriumReport> {
    let mut solver = EquilibriumSolver::new(system, target, initial_guess, settings)?;
    solver.run()?;
    solver.report().ok_or_else(|| {
        SolverError::InvalidSettings("solver stopped without a termination reason.".into())
    })
}

/// Solves for the Lotka–Volterra coexistence point, using the analytic
/// equilibrium `(gamma/delta, alpha/beta)` as the convergence target.
pub fn solve_lotka_volterra(
    params: LotkaVolterraParams,
    initial_guess: Vector2<f64>,
    settings: NewtonSettings,
) -> SolverResult<EquilibriumReport> {
    let system = LotkaVolterra::new(params)?;
    solve_equilibrium(system, params.coexistence_equilibrium(), initial_guess, settings)
}

fn to_array(v: &Vector2<f64>) -> [f64; 2] {
    [v[0], v[1]]
}
