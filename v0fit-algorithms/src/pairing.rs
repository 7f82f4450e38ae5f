//! Opposite-sign pairing and the geometric gate run before any vertex fit.

use crate::preselection::PreselectedTrack;
use crate::statistics::Rejection;
use v0fit_core::geometry::transverse_radius;
use v0fit_core::kinematics::pair_mass;
use v0fit_core::pdg::PION_MASS;
use v0fit_core::{Point3, V0FitterConfig};
use v0fit_vertexing::{closest_approach, TrajectoryState};

/// Radius of the fiducial tracker cylinder (cm).
pub const FIDUCIAL_RADIUS: f64 = 120.0;
/// Half-length of the fiducial tracker cylinder (cm).
pub const FIDUCIAL_HALF_LENGTH: f64 = 300.0;

/// Two preselected tracks labelled by charge.
#[derive(Debug, Clone, Copy)]
pub struct ChargedPair<'a> {
    /// Positive daughter.
    pub positive: &'a PreselectedTrack,
    /// Negative daughter.
    pub negative: &'a PreselectedTrack,
}

impl<'a> ChargedPair<'a> {
    /// Labels two tracks; `None` unless one is positive and the other negative.
    #[must_use]
    pub fn new(a: &'a PreselectedTrack, b: &'a PreselectedTrack) -> Option<Self> {
        match (a.charge().signum(), b.charge().signum()) {
            (1, -1) => Some(Self {
                positive: a,
                negative: b,
            }),
            (-1, 1) => Some(Self {
                positive: b,
                negative: a,
            }),
            _ => None,
        }
    }

    /// Input indices as (positive, negative).
    #[must_use]
    pub fn indices(&self) -> (usize, usize) {
        (self.positive.index, self.negative.index)
    }
}

/// Where two tracks meet, with their states there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairCrossing {
    /// Midpoint of the closest-approach points.
    pub crossing_point: Point3,
    /// Distance of closest approach (cm).
    pub distance: f64,
    /// Positive track at the crossing point.
    pub positive: TrajectoryState,
    /// Negative track at the crossing point.
    pub negative: TrajectoryState,
}

impl PairCrossing {
    /// Invariant mass of the pair at the crossing point, both taken as pions.
    #[must_use]
    pub fn pion_pair_mass(&self) -> f64 {
        pair_mass(
            &self.positive.momentum,
            PION_MASS,
            &self.negative.momentum,
            PION_MASS,
        )
    }
}

/// True if `point` lies inside the fiducial cylinder.
#[must_use]
pub fn inside_fiducial_volume(point: &Point3) -> bool {
    transverse_radius(point) <= FIDUCIAL_RADIUS && point.z.abs() <= FIDUCIAL_HALF_LENGTH
}

/// Cheap geometric cuts applied to a pair before fitting it.
#[derive(Debug, Clone, Copy)]
pub struct GeometricGate<'a> {
    config: &'a V0FitterConfig,
}

impl<'a> GeometricGate<'a> {
    /// Creates the gate.
    #[must_use]
    pub fn new(config: &'a V0FitterConfig) -> Self {
        Self { config }
    }

    /// Runs the gates in order and stops at the first failure.
    ///
    /// # Errors
    /// Returns the [`Rejection`] of the first failing gate.
    pub fn check(&self, pair: &ChargedPair<'_>) -> Result<PairCrossing, Rejection> {
        let pos = &pair.positive.transient;
        let neg = &pair.negative.transient;

        let (pos_impact, neg_impact) = pos
            .impact_point_state()
            .zip(neg.impact_point_state())
            .ok_or(Rejection::InvalidImpactState)?;

        let approach =
            closest_approach(&pos_impact, &neg_impact).ok_or(Rejection::ClosestApproachFailed)?;
        if !(approach.distance <= self.config.tk_dca_cut) {
            return Err(Rejection::DistanceOfClosestApproach);
        }

        let crossing_point = approach.crossing_point;
        if !inside_fiducial_volume(&crossing_point) {
            return Err(Rejection::OutsideFiducialVolume);
        }

        let (positive, negative) = pos
            .state_closest_to_point(&crossing_point)
            .zip(neg.state_closest_to_point(&crossing_point))
            .ok_or(Rejection::InvalidCrossingState)?;

        if positive.momentum.dot(&negative.momentum) < 0.0 {
            let (i, j) = pair.indices();
            log::trace!("tracks {i} and {j} leave the crossing point in opposite hemispheres");
        }

        let crossing = PairCrossing {
            crossing_point,
            distance: approach.distance,
            positive,
            negative,
        };
        if !(crossing.pion_pair_mass() <= self.config.m_pipi_cut) {
            return Err(Rejection::PionPairMass);
        }
        Ok(crossing)
    }
}
