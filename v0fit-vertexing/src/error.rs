//! Vertex fit error types.

use thiserror::Error;

/// Reasons a vertex fit produces no valid vertex.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// Fewer tracks than a vertex needs.
    #[error("vertex fit needs at least 2 tracks, got {0}")]
    TooFewTracks(usize),

    /// A track has no valid state near the current vertex estimate.
    #[error("track has no valid trajectory state near the vertex estimate")]
    InvalidTrackState,

    /// A track has a zero or non-finite impact parameter error.
    #[error("track has unusable impact parameter errors")]
    InvalidTrackErrors,

    /// The weight matrix cannot be inverted (e.g. parallel tracks).
    #[error("vertex weight matrix is singular")]
    Singular,

    /// The position did not settle within the iteration limit.
    #[error("vertex fit did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },

    /// Track weights left no degrees of freedom.
    #[error("vertex fit has non-positive degrees of freedom: {ndof}")]
    Degenerate { ndof: f64 },
}
