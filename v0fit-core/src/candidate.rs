//! V0 candidates and their daughters.

use crate::geometry::{Point3, Vector3};
use crate::kinematics::LorentzVector;
use crate::pdg::ParticleId;
use crate::vertex::Vertex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A charged daughter: one input track under a mass assumption.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecoChargedCandidate {
    /// Charge (±1).
    pub charge: i8,
    /// Four-momentum at the decay vertex.
    pub p4: LorentzVector,
    /// Origin vertex (cm).
    pub vertex: Point3,
    /// Index of the track in the input collection.
    pub track_index: usize,
}

impl RecoChargedCandidate {
    /// Creates a daughter from its momentum and assumed mass.
    #[must_use]
    pub fn new(
        charge: i8,
        momentum: &Vector3,
        mass: f64,
        vertex: Point3,
        track_index: usize,
    ) -> Self {
        Self {
            charge,
            p4: LorentzVector::from_momentum_and_mass(momentum, mass),
            vertex,
            track_index,
        }
    }
}

/// A two-track composite candidate with its decay vertex.
///
/// The four-momentum is always the sum of the two daughters' four-momenta;
/// it is computed on construction and cannot be set independently.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexCompositeCandidate {
    particle: ParticleId,
    p4: LorentzVector,
    vertex: Vertex,
    daughters: [RecoChargedCandidate; 2],
}

impl VertexCompositeCandidate {
    /// Assembles a candidate from its decay vertex and daughters.
    #[must_use]
    pub fn new(particle: ParticleId, vertex: Vertex, daughters: [RecoChargedCandidate; 2]) -> Self {
        let p4 = daughters.iter().map(|d| d.p4).sum();
        Self {
            particle,
            p4,
            vertex,
            daughters,
        }
    }

    /// Reconstructed species.
    #[must_use]
    pub fn particle(&self) -> ParticleId {
        self.particle
    }

    /// Signed PDG code of the species.
    #[must_use]
    pub fn pdg_id(&self) -> i32 {
        self.particle.pdg_id()
    }

    /// Four-momentum (sum of daughters).
    #[must_use]
    pub fn p4(&self) -> LorentzVector {
        self.p4
    }

    /// Invariant mass (GeV).
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.p4.mass()
    }

    /// Decay vertex.
    #[must_use]
    pub fn vertex(&self) -> &Vertex {
        &self.vertex
    }

    /// Daughters in (first, second) order as assembled.
    #[must_use]
    pub fn daughters(&self) -> &[RecoChargedCandidate; 2] {
        &self.daughters
    }

    /// Total charge of the daughters.
    #[must_use]
    pub fn charge(&self) -> i32 {
        self.daughters.iter().map(|d| i32::from(d.charge)).sum()
    }
}

/// Output collections of one event.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct V0Collections {
    /// K-short candidates.
    pub kshorts: Vec<VertexCompositeCandidate>,
    /// Lambda and anti-Lambda candidates.
    pub lambdas: Vec<VertexCompositeCandidate>,
    /// D0 and anti-D0 candidates.
    pub d0s: Vec<VertexCompositeCandidate>,
}

impl V0Collections {
    /// Creates empty collections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes a candidate to the collection of its species family.
    pub fn push(&mut self, candidate: VertexCompositeCandidate) {
        match candidate.particle() {
            ParticleId::KShort => self.kshorts.push(candidate),
            ParticleId::Lambda | ParticleId::AntiLambda => self.lambdas.push(candidate),
            ParticleId::D0 | ParticleId::AntiD0 => self.d0s.push(candidate),
        }
    }

    /// Moves all candidates of `other` to the end of the matching collections.
    pub fn append(&mut self, other: &mut Self) {
        self.kshorts.append(&mut other.kshorts);
        self.lambdas.append(&mut other.lambdas);
        self.d0s.append(&mut other.d0s);
    }

    /// Total number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kshorts.len() + self.lambdas.len() + self.d0s.len()
    }

    /// Returns true if no candidate was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over all candidates: K-shorts, then Lambdas, then D0s.
    pub fn iter(&self) -> impl Iterator<Item = &VertexCompositeCandidate> {
        self.kshorts
            .iter()
            .chain(self.lambdas.iter())
            .chain(self.d0s.iter())
    }
}
