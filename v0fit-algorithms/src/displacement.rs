//! Vertex fit of a pair and the displacement / pointing gates.

use crate::pairing::ChargedPair;
use crate::preselection::ReferencePoint;
use crate::statistics::Rejection;
use v0fit_core::geometry::{similarity, transverse};
use v0fit_core::{Covariance3, Point3, V0FitterConfig, Vector3, Vertex};
use v0fit_vertexing::{TransientTrack, TransientVertex, VertexFitter};

/// Significance of a displacement given its covariance.
///
/// The error is the covariance projected onto the displacement direction,
/// `sqrt(dᵀCd) / |d|`. A zero (or non-finite) displacement has significance 0.
#[must_use]
pub fn decay_significance(displacement: &Vector3, covariance: &Covariance3) -> f64 {
    let distance = displacement.norm();
    if !(distance > 0.0 && distance.is_finite()) {
        return 0.0;
    }
    let error = similarity(covariance, displacement).sqrt() / distance;
    distance / error
}

/// Cosine of the angle between a displacement and a momentum.
///
/// NaN when either vector is null.
#[must_use]
pub fn pointing_cosine(displacement: &Vector3, momentum: &Vector3) -> f64 {
    displacement.dot(momentum) / (displacement.norm() * momentum.norm())
}

/// A pair that survived the fit and every displacement gate.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplacedVertex {
    /// Fitted decay vertex.
    pub vertex: Vertex,
    /// Positive daughter momentum at the vertex.
    pub positive_momentum: Vector3,
    /// Negative daughter momentum at the vertex.
    pub negative_momentum: Vector3,
    /// Transverse decay-length significance.
    pub significance_xy: f64,
    /// 3D decay-length significance.
    pub significance_xyz: f64,
    /// Transverse pointing cosine.
    pub cos_theta_xy: f64,
    /// 3D pointing cosine.
    pub cos_theta_xyz: f64,
}

impl DisplacedVertex {
    /// Decay vertex position.
    #[must_use]
    pub fn position(&self) -> Point3 {
        self.vertex.position
    }
}

/// Splits refitted tracks into exactly one positive and one negative.
///
/// # Errors
/// [`Rejection::RefittedChargePartition`] when the split is not one of each.
pub fn partition_by_charge(
    tracks: &[TransientTrack],
) -> Result<(&TransientTrack, &TransientTrack), Rejection> {
    let mut positives = tracks.iter().filter(|t| t.charge() > 0);
    let mut negatives = tracks.iter().filter(|t| t.charge() < 0);
    match (positives.next(), positives.next(), negatives.next(), negatives.next()) {
        (Some(pos), None, Some(neg), None) => Ok((pos, neg)),
        _ => Err(Rejection::RefittedChargePartition),
    }
}

/// Fits the pair vertex and applies the chi-square, decay-significance and
/// pointing-angle cuts with respect to the reference point.
pub struct DisplacementGate<'a> {
    config: &'a V0FitterConfig,
    reference: &'a ReferencePoint,
    fitter: &'a dyn VertexFitter,
}

impl<'a> DisplacementGate<'a> {
    /// Creates the gate.
    #[must_use]
    pub fn new(
        config: &'a V0FitterConfig,
        reference: &'a ReferencePoint,
        fitter: &'a dyn VertexFitter,
    ) -> Self {
        Self {
            config,
            reference,
            fitter,
        }
    }

    /// Fits the vertex only.
    ///
    /// # Errors
    /// [`Rejection::VertexFitFailed`] if the fitter fails, and
    /// [`Rejection::VertexChi2`] above the chi-square cut.
    pub fn fit(&self, pair: &ChargedPair<'_>) -> Result<TransientVertex, Rejection> {
        let tracks = [pair.positive.transient.clone(), pair.negative.transient.clone()];
        let fitted = self.fitter.vertex(&tracks).map_err(|err| {
            let (i, j) = pair.indices();
            log::debug!("{} fit of tracks {i} and {j} failed: {err}", self.fitter.name());
            Rejection::VertexFitFailed
        })?;
        if !(fitted.normalized_chi2() <= self.config.vtx_chi2_cut) {
            return Err(Rejection::VertexChi2);
        }
        Ok(fitted)
    }

    /// Fits the pair and applies every displacement gate.
    ///
    /// # Errors
    /// The [`Rejection`] of the first failing gate.
    pub fn check(&self, pair: &ChargedPair<'_>) -> Result<DisplacedVertex, Rejection> {
        let fitted = self.fit(pair)?;
        let position = fitted.position();
        let total = self.reference.covariance + fitted.covariance();
        let displacement = position - self.reference.position;

        let significance_xy = decay_significance(&transverse(&displacement), &total);
        if !(significance_xy > self.config.vtx_decay_sig_xy_cut) {
            return Err(Rejection::DecaySignificanceXY);
        }
        let significance_xyz = decay_significance(&displacement, &total);
        if !(significance_xyz >= self.config.vtx_decay_sig_xyz_cut) {
            return Err(Rejection::DecaySignificanceXYZ);
        }

        let (positive_momentum, negative_momentum) = self.daughter_momenta(pair, &fitted)?;
        let momentum = positive_momentum + negative_momentum;

        let cos_theta_xy = pointing_cosine(&transverse(&displacement), &transverse(&momentum));
        if !(cos_theta_xy >= self.config.cos_theta_xy_cut) {
            return Err(Rejection::PointingAngleXY);
        }
        let cos_theta_xyz = pointing_cosine(&displacement, &momentum);
        if !(cos_theta_xyz >= self.config.cos_theta_xyz_cut) {
            return Err(Rejection::PointingAngleXYZ);
        }

        Ok(DisplacedVertex {
            vertex: *fitted.vertex(),
            positive_momentum,
            negative_momentum,
            significance_xy,
            significance_xyz,
            cos_theta_xy,
            cos_theta_xyz,
        })
    }

    fn daughter_momenta(
        &self,
        pair: &ChargedPair<'_>,
        fitted: &TransientVertex,
    ) -> Result<(Vector3, Vector3), Rejection> {
        let use_refitted =
            self.config.effective_use_ref_tracks() && fitted.refitted_tracks().len() >= 2;
        let (pos, neg) = if use_refitted {
            partition_by_charge(fitted.refitted_tracks())?
        } else {
            (&pair.positive.transient, &pair.negative.transient)
        };
        let position = fitted.position();
        let (pos_state, neg_state) = pos
            .state_closest_to_point(&position)
            .zip(neg.state_closest_to_point(&position))
            .ok_or(Rejection::InvalidVertexState)?;
        Ok((pos_state.momentum, neg_state.momentum))
    }
}
