//! Geometry aliases and small helpers shared across the workspace.

use nalgebra::Matrix3;

/// A position in the detector frame (cm).
pub type Point3 = nalgebra::Point3<f64>;

/// A displacement or momentum vector.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Symmetric 3×3 position covariance (cm²).
pub type Covariance3 = Matrix3<f64>;

/// Returns `vᵀ · C · v`.
#[inline]
#[must_use]
pub fn similarity(cov: &Covariance3, v: &Vector3) -> f64 {
    v.dot(&(cov * v))
}

/// Distance from the z axis.
#[inline]
#[must_use]
pub fn transverse_radius(p: &Point3) -> f64 {
    p.x.hypot(p.y)
}

/// Projects a vector onto the transverse plane.
#[inline]
#[must_use]
pub fn transverse(v: &Vector3) -> Vector3 {
    Vector3::new(v.x, v.y, 0.0)
}

/// Averages a matrix with its transpose.
#[inline]
#[must_use]
pub fn symmetrize(cov: &Covariance3) -> Covariance3 {
    (cov + cov.transpose()) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_similarity_diagonal() {
        let cov = Covariance3::from_diagonal(&Vector3::new(1.0, 4.0, 9.0));
        let v = Vector3::new(1.0, 1.0, 1.0);
        assert_relative_eq!(similarity(&cov, &v), 14.0);
    }

    #[test]
    fn test_transverse_radius() {
        assert_relative_eq!(transverse_radius(&Point3::new(3.0, 4.0, 100.0)), 5.0);
    }

    #[test]
    fn test_symmetrize() {
        let m = Covariance3::new(1.0, 2.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        let s = symmetrize(&m);
        assert_relative_eq!(s[(0, 1)], 1.0);
        assert_relative_eq!(s[(1, 0)], 1.0);
    }
}
