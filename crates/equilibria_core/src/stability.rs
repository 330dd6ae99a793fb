//! Linear stability of planar equilibria from the trace and determinant of
//! the Jacobian.

use crate::linalg::determinant_2x2;
use crate::traits::PlanarSystem;
use nalgebra::{Matrix2, Vector2};
use num_complex::Complex;
use serde::{Deserialize, Serialize};

/// Relative threshold below which trace or determinant count as zero.
const ZERO_THRESHOLD: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StabilityKind {
    StableNode,
    UnstableNode,
    Saddle,
    StableFocus,
    UnstableFocus,
    /// Purely imaginary pair; linearization predicts closed orbits.
    Center,
    /// Zero eigenvalue.
    NonHyperbolic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityReport {
    pub kind: StabilityKind,
    pub eigenvalues: [Complex<f64>; 2],
    pub trace: f64,
    pub determinant: f64,
}

/// Eigenvalues `tr/2 ± sqrt((tr/2)² - det)`.
pub fn eigenvalues_2x2(jacobian: &Matrix2<f64>) -> [Complex<f64>; 2] {
    let half_trace = jacobian.trace() / 2.0;
    let discriminant = half_trace * half_trace - determinant_2x2(jacobian);
    let root = Complex::new(discriminant, 0.0).sqrt();
    let center = Complex::new(half_trace, 0.0);
    [center + root, center - root]
}

pub fn classify_jacobian(jacobian: &Matrix2<f64>) -> StabilityReport {
    let trace = jacobian.trace();
    let determinant = determinant_2x2(jacobian);
    let scale = jacobian.amax().max(f64::MIN_POSITIVE);
    let trace_is_zero = trace.abs() <= ZERO_THRESHOLD * scale;
    let det_is_zero = determinant.abs() <= ZERO_THRESHOLD * scale * scale;

    let kind = if det_is_zero {
        StabilityKind::NonHyperbolic
    } else if determinant < 0.0 {
        StabilityKind::Saddle
    } else if trace_is_zero {
        StabilityKind::Center
    } else if trace * trace < 4.0 * determinant {
        if trace < 0.0 {
            StabilityKind::StableFocus
        } else {
            StabilityKind::UnstableFocus
        }
    } else if trace < 0.0 {
        StabilityKind::StableNode
    } else {
        StabilityKind::UnstableNode
    };

    StabilityReport {
        kind,
        eigenvalues: eigenvalues_2x2(jacobian),
        trace,
        determinant,
    }
}

/// Classifies the fixed point of `system` located at `state`.
pub fn classify_equilibrium<S: PlanarSystem>(
    system: &S,
    state: &Vector2<f64>,
) -> StabilityReport {
    classify_jacobian(&system.jacobian(state))
}
