//! Least-squares vertex fit with unit track weights.

use super::{linearize, refit_track, seed, solve, TransientVertex, VertexFitter};
use crate::error::FitError;
use crate::transient::TransientTrack;
use v0fit_core::Vertex;

/// Iterative linearized least-squares vertex fitter.
///
/// Every track carries full weight. With `refit` enabled the fitted vertex
/// also carries each track re-expressed at its point closest to the vertex.
#[derive(Debug, Clone)]
pub struct KalmanVertexFitter {
    refit: bool,
    max_iterations: usize,
    tolerance: f64,
}

impl KalmanVertexFitter {
    /// Creates a fitter; `refit` controls refitted-track production.
    #[must_use]
    pub fn new(refit: bool) -> Self {
        Self {
            refit,
            max_iterations: 10,
            tolerance: 1e-4,
        }
    }

    /// Sets the iteration limit.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the position shift (cm) below which the fit is converged.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Default for KalmanVertexFitter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl VertexFitter for KalmanVertexFitter {
    fn name(&self) -> &'static str {
        "Kalman"
    }

    fn vertex(&self, tracks: &[TransientTrack]) -> Result<TransientVertex, FitError> {
        if tracks.len() < 2 {
            return Err(FitError::TooFewTracks(tracks.len()));
        }
        let weights = vec![1.0; tracks.len()];
        let mut position = seed(tracks);

        for iteration in 1..=self.max_iterations {
            let linearized = linearize(tracks, &position)?;
            let (next, covariance) = solve(&linearized, &weights)?;
            let shift = (next - position).norm();
            position = next;
            if shift >= self.tolerance {
                continue;
            }

            let chi2 = linearized.iter().map(|t| t.chi2(&position)).sum();
            #[allow(clippy::cast_precision_loss)]
            let ndof = 2.0 * tracks.len() as f64 - 3.0;
            let refitted_tracks = if self.refit {
                tracks
                    .iter()
                    .map(|t| refit_track(t, &position))
                    .collect::<Result<Vec<_>, _>>()?
            } else {
                Vec::new()
            };
            log::trace!("Kalman fit converged after {iteration} iterations, chi2 = {chi2:.3}");
            return Ok(TransientVertex {
                vertex: Vertex::new(position, covariance, chi2, ndof),
                weights,
                refitted_tracks,
            });
        }

        Err(FitError::NotConverged {
            iterations: self.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::track_through;
    use super::*;
    use approx::assert_relative_eq;
    use v0fit_core::{Point3, Vector3};

    #[test]
    fn test_recovers_common_vertex() {
        let vertex = Point3::new(6.0, 2.0, -3.0);
        let tracks = [
            track_through(vertex, Vector3::new(1.5, 0.6, 0.4), 1, 3.8),
            track_through(vertex, Vector3::new(1.1, 0.1, -0.2), -1, 3.8),
        ];
        let fitted = KalmanVertexFitter::new(false).vertex(&tracks).unwrap();
        assert_relative_eq!((fitted.position() - vertex).norm(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(fitted.vertex().ndof, 1.0);
        assert!(fitted.normalized_chi2() < 1e-6);
        assert!(!fitted.has_refitted_tracks());
    }

    #[test]
    fn test_covariance_is_symmetric_positive() {
        let vertex = Point3::new(6.0, 2.0, -3.0);
        let tracks = [
            track_through(vertex, Vector3::new(1.5, 0.6, 0.4), 1, 3.8),
            track_through(vertex, Vector3::new(1.1, -0.3, -0.2), -1, 3.8),
        ];
        let fitted = KalmanVertexFitter::new(false).vertex(&tracks).unwrap();
        let cov = fitted.covariance();
        assert_relative_eq!(cov, cov.transpose());
        let eigen = cov.symmetric_eigenvalues();
        assert!(eigen.iter().all(|&l| l > 0.0));
    }

    #[test]
    fn test_refitted_tracks_sit_at_vertex() {
        let vertex = Point3::new(6.0, 2.0, -3.0);
        let tracks = [
            track_through(vertex, Vector3::new(1.5, 0.6, 0.4), 1, 3.8),
            track_through(vertex, Vector3::new(1.1, 0.1, -0.2), -1, 3.8),
        ];
        let fitted = KalmanVertexFitter::new(true).vertex(&tracks).unwrap();
        assert_eq!(fitted.refitted_tracks().len(), 2);
        let refitted = &fitted.refitted_tracks()[0];
        assert_eq!(refitted.charge(), 1);
        assert_relative_eq!((refitted.track().reference_point - vertex).norm(), 0.0, epsilon = 1e-5);
        assert_relative_eq!(refitted.track().momentum, Vector3::new(1.5, 0.6, 0.4), epsilon = 1e-5);
    }

    #[test]
    fn test_iteration_limit_reports_not_converged() {
        let vertex = Point3::new(6.0, 2.0, -3.0);
        let tracks = [
            track_through(vertex, Vector3::new(1.5, 0.6, 0.4), 1, 3.8),
            track_through(vertex, Vector3::new(1.1, 0.1, -0.2), -1, 3.8),
        ];
        // A zero tolerance can never be undercut.
        let err = KalmanVertexFitter::new(false)
            .with_tolerance(0.0)
            .with_max_iterations(3)
            .vertex(&tracks)
            .unwrap_err();
        assert_eq!(err, FitError::NotConverged { iterations: 3 });

        let fitted = KalmanVertexFitter::new(false)
            .with_max_iterations(50)
            .with_tolerance(1e-6)
            .vertex(&tracks)
            .unwrap();
        assert_relative_eq!((fitted.position() - vertex).norm(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_parallel_tracks_are_singular() {
        let tracks = [
            track_through(Point3::new(5.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0), 1, 0.0),
            track_through(Point3::new(5.0, 1.0, 0.0), Vector3::new(1.0, 0.0, 0.0), -1, 0.0),
        ];
        let err = KalmanVertexFitter::new(false).vertex(&tracks).unwrap_err();
        assert_eq!(err, FitError::Singular);
    }

    #[test]
    fn test_single_track_is_rejected() {
        let tracks = [track_through(Point3::new(5.0, 0.0, 0.0), Vector3::new(1.0, 0.2, 0.0), 1, 3.8)];
        assert_eq!(
            KalmanVertexFitter::default().vertex(&tracks).unwrap_err(),
            FitError::TooFewTracks(1)
        );
    }
}
