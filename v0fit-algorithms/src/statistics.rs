//! Cut-flow bookkeeping for one event.

use std::collections::BTreeMap;
use std::fmt;
use v0fit_core::ParticleId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Why a track pair was abandoned.
///
/// Rejections are ordinary outcomes of the selection, not errors; they are
/// only counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rejection {
    /// A daughter has no valid state at its impact point.
    InvalidImpactState,
    /// The transverse closest approach could not be computed.
    ClosestApproachFailed,
    /// Distance of closest approach above `tkDCACut`.
    DistanceOfClosestApproach,
    /// Crossing point outside the tracker volume.
    OutsideFiducialVolume,
    /// A daughter has no valid state at the crossing point.
    InvalidCrossingState,
    /// Pion-pair mass at the crossing point above `mPiPiCut`.
    PionPairMass,
    /// The vertex fitter produced no valid vertex.
    VertexFitFailed,
    /// Vertex chi2/ndof above `vtxChi2Cut`.
    VertexChi2,
    /// Transverse decay-length significance not above `vtxDecaySigXYCut`.
    DecaySignificanceXY,
    /// 3D decay-length significance not above `vtxDecaySigXYZCut`.
    DecaySignificanceXYZ,
    /// Refitted tracks are not one positive and one negative.
    RefittedChargePartition,
    /// A daughter has no valid state at the fitted vertex.
    InvalidVertexState,
    /// Transverse pointing cosine below `cosThetaXYCut`.
    PointingAngleXY,
    /// 3D pointing cosine below `cosThetaXYZCut`.
    PointingAngleXYZ,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::InvalidImpactState => "invalid impact-point state",
            Self::ClosestApproachFailed => "closest approach failed",
            Self::DistanceOfClosestApproach => "DCA above cut",
            Self::OutsideFiducialVolume => "crossing point outside fiducial volume",
            Self::InvalidCrossingState => "invalid state at crossing point",
            Self::PionPairMass => "pion-pair mass above cut",
            Self::VertexFitFailed => "vertex fit failed",
            Self::VertexChi2 => "vertex chi2 above cut",
            Self::DecaySignificanceXY => "2D decay significance below cut",
            Self::DecaySignificanceXYZ => "3D decay significance below cut",
            Self::RefittedChargePartition => "ambiguous refitted-track charges",
            Self::InvalidVertexState => "invalid state at vertex",
            Self::PointingAngleXY => "2D pointing angle below cut",
            Self::PointingAngleXYZ => "3D pointing angle below cut",
        };
        f.write_str(reason)
    }
}

/// Counters describing what happened to the tracks and pairs of one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct V0FitStatistics {
    /// Tracks in the input collection.
    pub tracks_seen: usize,
    /// Tracks passing preselection.
    pub tracks_preselected: usize,
    /// Opposite-sign pairs entering the geometric gate.
    pub pairs_considered: usize,
    /// Same-sign pairs skipped before any gate.
    pub same_sign_pairs: usize,
    /// Vertex fits attempted.
    pub fits_performed: usize,
    /// Pairs passing every gate.
    pub pairs_accepted: usize,
    /// Abandoned pairs per reason.
    pub rejections: BTreeMap<Rejection, usize>,
    /// Emitted candidates per species.
    pub candidates: BTreeMap<ParticleId, usize>,
}

impl V0FitStatistics {
    /// Counts one abandoned pair.
    pub fn reject(&mut self, reason: Rejection) {
        *self.rejections.entry(reason).or_default() += 1;
    }

    /// Counts one emitted candidate.
    pub fn accept(&mut self, particle: ParticleId) {
        *self.candidates.entry(particle).or_default() += 1;
    }

    /// Number of pairs abandoned for `reason`.
    #[must_use]
    pub fn rejected(&self, reason: Rejection) -> usize {
        self.rejections.get(&reason).copied().unwrap_or(0)
    }

    /// Number of emitted candidates of `particle`.
    #[must_use]
    pub fn accepted(&self, particle: ParticleId) -> usize {
        self.candidates.get(&particle).copied().unwrap_or(0)
    }

    /// Total abandoned pairs.
    #[must_use]
    pub fn total_rejected(&self) -> usize {
        self.rejections.values().sum()
    }

    /// Adds the pair-level counters of `other`; track counters are per event
    /// and left untouched.
    pub fn merge_pairs(&mut self, other: &Self) {
        self.pairs_considered += other.pairs_considered;
        self.same_sign_pairs += other.same_sign_pairs;
        self.fits_performed += other.fits_performed;
        self.pairs_accepted += other.pairs_accepted;
        for (&reason, &count) in &other.rejections {
            *self.rejections.entry(reason).or_default() += count;
        }
        for (&particle, &count) in &other.candidates {
            *self.candidates.entry(particle).or_default() += count;
        }
    }
}
