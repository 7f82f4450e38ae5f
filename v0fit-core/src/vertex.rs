//! Fitted vertices.

use crate::geometry::{Covariance3, Point3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A vertex: position with covariance and fit quality.
///
/// Used both for primary vertices supplied with the event and for the decay
/// vertex stored on each V0 candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// Position (cm).
    pub position: Point3,
    /// Position covariance (cm²).
    pub covariance: Covariance3,
    /// Fit chi-square.
    pub chi2: f64,
    /// Fit degrees of freedom (may be fractional for adaptive fits).
    pub ndof: f64,
}

impl Vertex {
    /// Creates a vertex.
    #[must_use]
    pub fn new(position: Point3, covariance: Covariance3, chi2: f64, ndof: f64) -> Self {
        Self {
            position,
            covariance,
            chi2,
            ndof,
        }
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
}
