//! v0fit-algorithms: V0 finding from pairs of reconstructed tracks.
//!
//! The pipeline, run per event by [`V0Fitter`]:
//! - **Preselection** - track quality and impact-parameter significance
//! - **Geometric gate** - opposite-sign pairs, closest approach, fiducial
//!   volume and pion-pair mass before any fit
//! - **Displacement gate** - vertex fit, decay-length significance and
//!   pointing angle with respect to the beamspot or primary vertex
//! - **Hypotheses** - K-short, Lambda / anti-Lambda and D0 / anti-D0 mass
//!   windows
//!
#![warn(missing_docs)]

mod displacement;
mod fitter;
mod hypothesis;
mod pairing;
mod preselection;
mod statistics;

pub use displacement::{
    decay_significance, partition_by_charge, pointing_cosine, DisplacedVertex, DisplacementGate,
};
pub use fitter::{V0Event, V0Fitter};
pub use hypothesis::HypothesisBuilder;
pub use pairing::{
    inside_fiducial_volume, ChargedPair, GeometricGate, PairCrossing, FIDUCIAL_HALF_LENGTH,
    FIDUCIAL_RADIUS,
};
pub use preselection::{PreselectedTrack, ReferencePoint, TrackPreselector};
pub use statistics::{Rejection, V0FitStatistics};

// Re-export the configuration consumed by the fitter
pub use v0fit_core::{V0Collections, V0FitterConfig, VertexFitterKind};
