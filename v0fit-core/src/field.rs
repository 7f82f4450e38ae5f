//! Magnetic field access.

use crate::geometry::{Point3, Vector3};

/// Read-only magnetic field map.
///
/// Implementations must be shareable across threads; the V0 finder queries
/// the field concurrently when pair enumeration runs in parallel.
pub trait MagneticField: Send + Sync {
    /// Field vector at `point`, in Tesla.
    fn in_tesla(&self, point: &Point3) -> Vector3;

    /// Longitudinal field component at `point`, in Tesla.
    #[inline]
    fn bz(&self, point: &Point3) -> f64 {
        self.in_tesla(point).z
    }
}

/// Solenoid field that is constant and parallel to z everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformMagneticField {
    bz: f64,
}

impl UniformMagneticField {
    /// Creates a field of `bz` Tesla along z. Zero gives straight tracks.
    #[must_use]
    pub fn new(bz: f64) -> Self {
        Self { bz }
    }
}

impl MagneticField for UniformMagneticField {
    #[inline]
    fn in_tesla(&self, _point: &Point3) -> Vector3 {
        Vector3::new(0.0, 0.0, self.bz)
    }
}
