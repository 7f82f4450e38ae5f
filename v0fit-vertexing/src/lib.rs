//! v0fit-vertexing: Trajectory states and two-track vertex fitting.
//!
//! This crate provides the services the V0 finder treats as black boxes:
//!
//! - [`TransientTrack`] - a track bound to the magnetic field, answering
//!   "where is the track, and with which momentum, closest to this point"
//! - [`closest_approach`] - transverse-plane closest approach of two
//!   trajectories
//! - [`VertexFitter`] - common vertex of a set of tracks, implemented by
//!   [`KalmanVertexFitter`] and [`AdaptiveVertexFitter`]
//!
//! Trajectories are helices in a solenoidal field; the field is sampled at
//! each track's reference point.

mod closest_approach;
mod error;
pub mod fit;
pub mod helix;
mod transient;

pub use closest_approach::{closest_approach, ClosestApproach};
pub use error::FitError;
pub use fit::{AdaptiveVertexFitter, KalmanVertexFitter, TransientVertex, VertexFitter};
pub use helix::Helix;
pub use transient::{TrajectoryState, TransientTrack};
