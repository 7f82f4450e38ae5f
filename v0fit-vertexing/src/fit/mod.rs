//! Two-track (and n-track) vertex fitting.
//!
//! Both fitters share the same linearization: at the current vertex
//! estimate each track is replaced by its closest point and two measurement
//! directions perpendicular to its momentum,
//!
//! ```text
//! e1 = transverse, perpendicular to p      σ1 = dxy error
//! e2 = p̂ × e1                              σ2 = dz error · sin θ
//! ```
//!
//! giving each track an information matrix `G = e1e1ᵀ/σ1² + e2e2ᵀ/σ2²`.
//! The weighted least-squares vertex is `x = (Σ wG)⁻¹ Σ wG·a`, with
//! covariance `(Σ wG)⁻¹`. The estimate is relinearized until it settles.

mod adaptive;
mod kalman;

pub use adaptive::AdaptiveVertexFitter;
pub use kalman::KalmanVertexFitter;

use crate::closest_approach::closest_approach;
use crate::error::FitError;
use crate::transient::TransientTrack;
use nalgebra::Matrix3;
use v0fit_core::geometry::{similarity, symmetrize};
use v0fit_core::{Covariance3, Point3, Track, Vector3, Vertex};

/// Fits a common vertex to a set of tracks.
pub trait VertexFitter: Send + Sync {
    /// Algorithm name.
    fn name(&self) -> &'static str;

    /// Fits the vertex.
    ///
    /// # Errors
    /// Returns a [`FitError`] when no valid vertex can be produced.
    fn vertex(&self, tracks: &[TransientTrack]) -> Result<TransientVertex, FitError>;
}

/// A fitted vertex with the tracks that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientVertex {
    vertex: Vertex,
    weights: Vec<f64>,
    refitted_tracks: Vec<TransientTrack>,
}

impl TransientVertex {
    /// Fitted vertex.
    #[must_use]
    pub fn vertex(&self) -> &Vertex {
        &self.vertex
    }

    /// Fitted position.
    #[must_use]
    pub fn position(&self) -> Point3 {
        self.vertex.position
    }

    /// Position covariance.
    #[must_use]
    pub fn covariance(&self) -> Covariance3 {
        self.vertex.covariance
    }

    /// Chi-square per degree of freedom.
    #[must_use]
    pub fn normalized_chi2(&self) -> f64 {
        self.vertex.normalized_chi2()
    }

    /// Per-track weights, in input order (all 1 for the Kalman fitter).
    #[must_use]
    pub fn track_weights(&self) -> &[f64] {
        &self.weights
    }

    /// True if the fitter produced refitted tracks.
    #[must_use]
    pub fn has_refitted_tracks(&self) -> bool {
        !self.refitted_tracks.is_empty()
    }

    /// Tracks re-expressed at the vertex, in input order.
    #[must_use]
    pub fn refitted_tracks(&self) -> &[TransientTrack] {
        &self.refitted_tracks
    }
}

/// A track linearized around a vertex estimate.
struct LinearizedTrack {
    point: Point3,
    information: Matrix3<f64>,
}

impl LinearizedTrack {
    fn new(track: &TransientTrack, around: &Point3) -> Result<Self, FitError> {
        let state = track
            .state_closest_to_point(around)
            .ok_or(FitError::InvalidTrackState)?;
        let p = state.momentum;
        let pt = p.x.hypot(p.y);
        let sigma_t = track.track().dxy_error;
        let sigma_l = track.track().dz_error * pt / p.norm();
        if !(sigma_t > 0.0 && sigma_l > 0.0 && sigma_t.is_finite() && sigma_l.is_finite()) {
            return Err(FitError::InvalidTrackErrors);
        }

        let e1 = Vector3::new(-p.y / pt, p.x / pt, 0.0);
        let e2 = p.normalize().cross(&e1);
        let information = e1 * e1.transpose() / (sigma_t * sigma_t)
            + e2 * e2.transpose() / (sigma_l * sigma_l);
        Ok(Self {
            point: state.position,
            information,
        })
    }

    fn chi2(&self, vertex: &Point3) -> f64 {
        similarity(&self.information, &(vertex - self.point))
    }
}

fn linearize(tracks: &[TransientTrack], around: &Point3) -> Result<Vec<LinearizedTrack>, FitError> {
    tracks
        .iter()
        .map(|track| LinearizedTrack::new(track, around))
        .collect()
}

/// Weighted least-squares vertex and its covariance.
fn solve(tracks: &[LinearizedTrack], weights: &[f64]) -> Result<(Point3, Covariance3), FitError> {
    let mut total = Matrix3::zeros();
    let mut rhs = Vector3::zeros();
    for (track, &w) in tracks.iter().zip(weights) {
        let g = track.information * w;
        rhs += g * track.point.coords;
        total += g;
    }
    let covariance = total.try_inverse().ok_or(FitError::Singular)?;
    let position = covariance * rhs;
    if !position.iter().chain(covariance.iter()).all(|v| v.is_finite()) {
        return Err(FitError::Singular);
    }
    Ok((Point3::from(position), symmetrize(&covariance)))
}

/// Starting point: closest approach of the first two tracks, else the mean
/// reference point.
fn seed(tracks: &[TransientTrack]) -> Point3 {
    let crossing = match tracks {
        [a, b, ..] => a
            .impact_point_state()
            .zip(b.impact_point_state())
            .and_then(|(sa, sb)| closest_approach(&sa, &sb))
            .map(|ca| ca.crossing_point),
        _ => None,
    };
    crossing.unwrap_or_else(|| {
        let sum = tracks
            .iter()
            .fold(Vector3::zeros(), |acc, t| acc + t.track().reference_point.coords);
        #[allow(clippy::cast_precision_loss)]
        let count = tracks.len().max(1) as f64;
        Point3::from(sum / count)
    })
}

/// Re-expresses a track at its point closest to the vertex.
fn refit_track(track: &TransientTrack, vertex: &Point3) -> Result<TransientTrack, FitError> {
    let state = track
        .state_closest_to_point(vertex)
        .ok_or(FitError::InvalidTrackState)?;
    let refitted = Track {
        reference_point: state.position,
        momentum: state.momentum,
        ..*track.track()
    };
    Ok(TransientTrack::with_bz(refitted, track.bz()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::helix::Helix;

    /// A track passing exactly through `vertex` with `momentum` there,
    /// described at its point closest to the z axis.
    pub fn track_through(vertex: Point3, momentum: Vector3, charge: i8, bz: f64) -> TransientTrack {
        let helix = Helix::new(vertex, &momentum, charge, bz).unwrap();
        let s = helix.path_to_transverse_point(0.0, 0.0).unwrap();
        let track = Track::new(charge, helix.position_at(s), helix.momentum_at(s))
            .with_impact_errors(0.01, 0.02)
            .with_fit_quality(10.0, 10.0)
            .with_valid_hits(12);
        TransientTrack::with_bz(track, bz)
    }
}
