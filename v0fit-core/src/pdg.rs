//! Particle masses and identifiers (PDG conventions).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Charged pion mass (GeV).
pub const PION_MASS: f64 = 0.139_570_18;
/// Charged kaon mass (GeV).
pub const KAON_MASS: f64 = 0.493_667;
/// Proton mass (GeV).
pub const PROTON_MASS: f64 = 0.938_272_046;
/// Neutral short-lived kaon mass (GeV).
pub const KSHORT_MASS: f64 = 0.497_614;
/// Lambda baryon mass (GeV).
pub const LAMBDA_MASS: f64 = 1.115_683;
/// Neutral D meson mass (GeV).
pub const D0_MASS: f64 = 1.864_84;

/// Species a V0 candidate may be reconstructed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParticleId {
    /// K⁰_S → π⁺π⁻.
    KShort,
    /// Λ → pπ⁻.
    Lambda,
    /// Λ̄ → p̄π⁺.
    AntiLambda,
    /// D⁰ → K⁻π⁺.
    D0,
    /// D̄⁰ → K⁺π⁻.
    AntiD0,
}

impl ParticleId {
    /// All species, in output order.
    pub const ALL: [Self; 5] = [
        Self::KShort,
        Self::Lambda,
        Self::AntiLambda,
        Self::D0,
        Self::AntiD0,
    ];

    /// Signed PDG Monte Carlo code.
    #[must_use]
    pub fn pdg_id(self) -> i32 {
        match self {
            Self::KShort => 310,
            Self::Lambda => 3122,
            Self::AntiLambda => -3122,
            Self::D0 => 421,
            Self::AntiD0 => -421,
        }
    }

    /// Looks a species up by its PDG code.
    #[must_use]
    pub fn from_pdg_id(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.pdg_id() == code)
    }

    /// Nominal mass of the species; particle and antiparticle share it.
    #[must_use]
    pub fn nominal_mass(self) -> f64 {
        match self {
            Self::KShort => KSHORT_MASS,
            Self::Lambda | Self::AntiLambda => LAMBDA_MASS,
            Self::D0 | Self::AntiD0 => D0_MASS,
        }
    }

    /// Daughter masses as (positive track, negative track).
    #[must_use]
    pub fn daughter_masses(self) -> (f64, f64) {
        match self {
            Self::KShort => (PION_MASS, PION_MASS),
            Self::Lambda => (PROTON_MASS, PION_MASS),
            Self::AntiLambda => (PION_MASS, PROTON_MASS),
            Self::D0 => (PION_MASS, KAON_MASS),
            Self::AntiD0 => (KAON_MASS, PION_MASS),
        }
    }
}
