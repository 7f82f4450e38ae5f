//! Reconstructed charged-particle tracks.

use crate::beamspot::BeamSpot;
use crate::geometry::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A reconstructed track.
///
/// The track is described at its reference point, the point of closest
/// approach to the beam line, by the momentum there and its charge. Impact
/// parameters relative to other points use the usual linear approximation
/// around the reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Track {
    /// Electric charge in units of e (±1 for real tracks).
    pub charge: i8,
    /// Reference point (cm).
    pub reference_point: Point3,
    /// Momentum at the reference point (GeV).
    pub momentum: Vector3,
    /// Fit chi-square.
    pub chi2: f64,
    /// Fit degrees of freedom.
    pub ndof: f64,
    /// Number of valid hits on the track.
    pub valid_hits: u32,
    /// Uncertainty on the transverse impact parameter (cm).
    pub dxy_error: f64,
    /// Uncertainty on the longitudinal impact parameter (cm).
    pub dz_error: f64,
}

impl Track {
    /// Creates a track with a perfect fit and no hits or errors set.
    #[must_use]
    pub fn new(charge: i8, reference_point: Point3, momentum: Vector3) -> Self {
        Self {
            charge,
            reference_point,
            momentum,
            chi2: 0.0,
            ndof: 1.0,
            valid_hits: 0,
            dxy_error: 0.0,
            dz_error: 0.0,
        }
    }

    /// Sets the fit quality.
    #[must_use]
    pub fn with_fit_quality(mut self, chi2: f64, ndof: f64) -> Self {
        self.chi2 = chi2;
        self.ndof = ndof;
        self
    }

    /// Sets the number of valid hits.
    #[must_use]
    pub fn with_valid_hits(mut self, valid_hits: u32) -> Self {
        self.valid_hits = valid_hits;
        self
    }

    /// Sets the impact parameter uncertainties.
    #[must_use]
    pub fn with_impact_errors(mut self, dxy_error: f64, dz_error: f64) -> Self {
        self.dxy_error = dxy_error;
        self.dz_error = dz_error;
        self
    }

    /// Transverse momentum.
    #[inline]
    #[must_use]
    pub fn pt(&self) -> f64 {
        self.momentum.x.hypot(self.momentum.y)
    }

    /// Momentum magnitude.
    #[inline]
    #[must_use]
    pub fn p(&self) -> f64 {
        self.momentum.norm()
    }

    /// Chi-square per degree of freedom; a zero-ndof fit is heavily penalised.
    #[must_use]
    pub fn normalized_chi2(&self) -> f64 {
        if self.ndof == 0.0 {
            self.chi2 * 1e6
        } else {
            self.chi2 / self.ndof
        }
    }

    /// Signed transverse impact parameter with respect to `point`.
    #[must_use]
    pub fn dxy(&self, point: &Point3) -> f64 {
        let v = self.reference_point;
        let p = self.momentum;
        (-(v.x - point.x) * p.y + (v.y - point.y) * p.x) / self.pt()
    }

    /// Transverse impact parameter with respect to the beam line, evaluated at
    /// the z of the track reference point.
    #[must_use]
    pub fn dxy_beamspot(&self, beamspot: &BeamSpot) -> f64 {
        self.dxy(&beamspot.position_at(self.reference_point.z))
    }

    /// Longitudinal impact parameter with respect to `point`.
    #[must_use]
    pub fn dz(&self, point: &Point3) -> f64 {
        let v = self.reference_point;
        let p = self.momentum;
        let pt = self.pt();
        (v.z - point.z) - ((v.x - point.x) * p.x + (v.y - point.y) * p.y) / pt * (p.z / pt)
    }
}
