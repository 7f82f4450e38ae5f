//! Mass hypotheses and candidate assembly.

use crate::displacement::DisplacedVertex;
use crate::pairing::ChargedPair;
use v0fit_core::{ParticleId, RecoChargedCandidate, V0FitterConfig, VertexCompositeCandidate};

/// Builds candidates for every enabled species whose mass falls in its window.
#[derive(Debug, Clone, Copy)]
pub struct HypothesisBuilder<'a> {
    config: &'a V0FitterConfig,
}

impl<'a> HypothesisBuilder<'a> {
    /// Creates the builder.
    #[must_use]
    pub fn new(config: &'a V0FitterConfig) -> Self {
        Self { config }
    }

    /// Species attempted for a pair, in output order.
    ///
    /// Only one of Lambda and anti-Lambda is tried: the heavier daughter
    /// (proton) is assumed to be the faster one. Both D0 charge states are
    /// tried.
    #[must_use]
    pub fn hypotheses(&self, displaced: &DisplacedVertex) -> Vec<ParticleId> {
        let mut species = Vec::with_capacity(4);
        if self.config.do_kshorts {
            species.push(ParticleId::KShort);
        }
        if self.config.do_lambdas {
            if displaced.positive_momentum.norm_squared() > displaced.negative_momentum.norm_squared()
            {
                species.push(ParticleId::Lambda);
            } else {
                species.push(ParticleId::AntiLambda);
            }
        }
        if self.config.do_d0s {
            species.push(ParticleId::D0);
            species.push(ParticleId::AntiD0);
        }
        species
    }

    /// Candidate for one species, `None` outside the mass window.
    #[must_use]
    pub fn candidate(
        &self,
        particle: ParticleId,
        pair: &ChargedPair<'_>,
        displaced: &DisplacedVertex,
    ) -> Option<VertexCompositeCandidate> {
        let (positive_mass, negative_mass) = particle.daughter_masses();
        let position = displaced.position();
        let positive = RecoChargedCandidate::new(
            pair.positive.charge(),
            &displaced.positive_momentum,
            positive_mass,
            position,
            pair.positive.index,
        );
        let negative = RecoChargedCandidate::new(
            pair.negative.charge(),
            &displaced.negative_momentum,
            negative_mass,
            position,
            pair.negative.index,
        );
        // The baryon leads in anti-Lambda, as in Lambda.
        let daughters = match particle {
            ParticleId::AntiLambda => [negative, positive],
            _ => [positive, negative],
        };
        let candidate = VertexCompositeCandidate::new(particle, displaced.vertex, daughters);

        let nominal = particle.nominal_mass();
        let cut = self.config.mass_cut(particle);
        let mass = candidate.mass();
        if nominal - cut < mass && mass < nominal + cut {
            Some(candidate)
        } else {
            log::trace!("{particle:?} hypothesis rejected: mass {mass:.4} GeV");
            None
        }
    }

    /// All accepted candidates for a pair, in output order.
    #[must_use]
    pub fn build(
        &self,
        pair: &ChargedPair<'_>,
        displaced: &DisplacedVertex,
    ) -> Vec<VertexCompositeCandidate> {
        self.hypotheses(displaced)
            .into_iter()
            .filter_map(|particle| self.candidate(particle, pair, displaced))
            .collect()
    }
}
