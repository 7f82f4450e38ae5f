//! Luminous region description.

use crate::geometry::{symmetrize, Covariance3, Point3, Vector3};
use nalgebra::Rotation3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The beamspot: a tilted line with a transverse profile and a longitudinal
/// extent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BeamSpot {
    /// Position at the centre of the luminous region (cm).
    pub position: Point3,
    /// Longitudinal RMS of the luminous region (cm).
    pub sigma_z: f64,
    /// Beam slope dx/dz.
    pub dxdz: f64,
    /// Beam slope dy/dz.
    pub dydz: f64,
    /// Transverse beam width along x (cm).
    pub beam_width_x: f64,
    /// Transverse beam width along y (cm).
    pub beam_width_y: f64,
    /// Uncertainty on `position` (cm²).
    pub covariance: Covariance3,
}

impl BeamSpot {
    /// Creates an untilted, point-like beamspot at `position`.
    #[must_use]
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            sigma_z: 0.0,
            dxdz: 0.0,
            dydz: 0.0,
            beam_width_x: 0.0,
            beam_width_y: 0.0,
            covariance: Covariance3::zeros(),
        }
    }

    /// Sets the beam slopes.
    #[must_use]
    pub fn with_slopes(mut self, dxdz: f64, dydz: f64) -> Self {
        self.dxdz = dxdz;
        self.dydz = dydz;
        self
    }

    /// Sets the luminous-region widths.
    #[must_use]
    pub fn with_widths(mut self, beam_width_x: f64, beam_width_y: f64, sigma_z: f64) -> Self {
        self.beam_width_x = beam_width_x;
        self.beam_width_y = beam_width_y;
        self.sigma_z = sigma_z;
        self
    }

    /// Sets the position uncertainty.
    #[must_use]
    pub fn with_covariance(mut self, covariance: Covariance3) -> Self {
        self.covariance = covariance;
        self
    }

    /// Point of the beam line at height `z`.
    #[must_use]
    pub fn position_at(&self, z: f64) -> Point3 {
        let dz = z - self.position.z;
        Point3::new(
            self.position.x + self.dxdz * dz,
            self.position.y + self.dydz * dz,
            z,
        )
    }

    /// Covariance of the luminous region in the global frame.
    ///
    /// The diagonal width matrix lives in the beam frame and is rotated so its
    /// z axis follows `(dxdz, dydz, 1)`; the position uncertainty is added on top.
    #[must_use]
    pub fn rotated_covariance3d(&self) -> Covariance3 {
        let beam_axis = Vector3::new(self.dxdz, self.dydz, 1.0);
        let rotation = Rotation3::rotation_between(&Vector3::z(), &beam_axis)
            .unwrap_or_else(Rotation3::identity);
        let widths = Covariance3::from_diagonal(&Vector3::new(
            self.beam_width_x * self.beam_width_x,
            self.beam_width_y * self.beam_width_y,
            self.sigma_z * self.sigma_z,
        ));
        let r = rotation.matrix();
        symmetrize(&(r * widths * r.transpose() + self.covariance))
    }
}
