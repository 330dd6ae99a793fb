//! Closed-form helpers for 2×2 systems.

use nalgebra::{Matrix2, Vector2};

/// `a*d - b*c` for `[[a, b], [c, d]]`.
pub fn determinant_2x2(m: &Matrix2<f64>) -> f64 {
    m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]
}

/// Explicit inverse `1/det · [[d, -b], [-c, a]]`.
///
/// Returns `None` when the determinant is zero or not finite.
pub fn invert_2x2(m: &Matrix2<f64>) -> Option<Matrix2<f64>> {
    let det = determinant_2x2(m);
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let (a, b, c, d) = (m[(0, 0)], m[(0, 1)], m[(1, 0)], m[(1, 1)]);
    let adjugate = Matrix2::new(d, -b, -c, a);
    Some(adjugate * (1.0 / det))
}

/// True when every component of `value` is within its tolerance of `target`.
pub fn within_tolerance(
    value: &Vector2<f64>,
    target: &Vector2<f64>,
    tolerance: &Vector2<f64>,
) -> bool {
    (value - target)
        .iter()
        .zip(tolerance.iter())
        .all(|(diff, tol)| diff.abs() <= *tol)
}

/// True when both components are exactly zero; `-0.0` counts as zero.
pub fn is_zero_vector(value: &Vector2<f64>) -> bool {
    value.iter().all(|v| *v == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn determinant_matches_hand_computation() {
        let m = Matrix2::new(3.0, 8.0, 4.0, 6.0);
        assert_eq!(determinant_2x2(&m), -14.0);
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        let m = Matrix2::new(4.0, 7.0, 2.0, 6.0);
        let inv = invert_2x2(&m).expect("matrix is invertible");
        let product = m * inv;
        assert!((product - Matrix2::identity()).iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn inverse_rejects_singular_matrix() {
        let m = Matrix2::new(1.0, 2.0, 2.0, 4.0);
        assert!(invert_2x2(&m).is_none());
    }

    #[test]
    fn inverse_rejects_non_finite_determinant() {
        let m = Matrix2::new(f64::NAN, 0.0, 0.0, 1.0);
        assert!(invert_2x2(&m).is_none());
    }

    #[test]
    fn tolerance_check_is_per_component() {
        let target = Vector2::new(2000.0, 25.0);
        let tol = Vector2::new(0.01, 0.01);
        assert!(within_tolerance(&Vector2::new(2000.005, 24.995), &target, &tol));
        assert!(!within_tolerance(&Vector2::new(2000.005, 25.5), &target, &tol));
        assert!(!within_tolerance(&Vector2::new(1999.0, 25.0), &target, &tol));
    }

    #[test]
    fn zero_vector_detection_ignores_sign() {
        assert!(is_zero_vector(&Vector2::new(0.0, -0.0)));
        assert!(!is_zero_vector(&Vector2::new(0.0, 1e-300)));
    }
}
