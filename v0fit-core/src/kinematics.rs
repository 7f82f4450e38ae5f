//! Four-momentum arithmetic.

use crate::geometry::Vector3;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Four-momentum `(px, py, pz, E)` in GeV.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LorentzVector {
    /// Momentum x component.
    pub px: f64,
    /// Momentum y component.
    pub py: f64,
    /// Momentum z component.
    pub pz: f64,
    /// Energy.
    pub e: f64,
}

impl LorentzVector {
    /// Creates a four-momentum from its components.
    #[inline]
    #[must_use]
    pub fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Creates the four-momentum of a particle of mass `mass` with momentum `p`.
    #[inline]
    #[must_use]
    pub fn from_momentum_and_mass(p: &Vector3, mass: f64) -> Self {
        Self::new(p.x, p.y, p.z, energy(p, mass))
    }

    /// Three-momentum part.
    #[inline]
    #[must_use]
    pub fn momentum(&self) -> Vector3 {
        Vector3::new(self.px, self.py, self.pz)
    }

    /// Squared three-momentum magnitude.
    #[inline]
    #[must_use]
    pub fn p2(&self) -> f64 {
        self.px * self.px + self.py * self.py + self.pz * self.pz
    }

    /// Transverse momentum.
    #[inline]
    #[must_use]
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Invariant mass squared; may be slightly negative from rounding.
    #[inline]
    #[must_use]
    pub fn mass2(&self) -> f64 {
        self.e * self.e - self.p2()
    }

    /// Invariant mass. Space-like vectors return the negated root of `-m²`.
    #[must_use]
    pub fn mass(&self) -> f64 {
        let m2 = self.mass2();
        if m2 >= 0.0 {
            m2.sqrt()
        } else {
            -(-m2).sqrt()
        }
    }
}

/// Energy `sqrt(|p|² + m²)`.
#[inline]
#[must_use]
pub fn energy(p: &Vector3, mass: f64) -> f64 {
    (p.norm_squared() + mass * mass).sqrt()
}

/// Invariant mass of two particles with the given momenta and mass assumptions.
#[must_use]
pub fn pair_mass(p1: &Vector3, m1: f64, p2: &Vector3, m2: f64) -> f64 {
    (LorentzVector::from_momentum_and_mass(p1, m1) + LorentzVector::from_momentum_and_mass(p2, m2))
        .mass()
}

impl Add for LorentzVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.px + rhs.px,
            self.py + rhs.py,
            self.pz + rhs.pz,
            self.e + rhs.e,
        )
    }
}

impl AddAssign for LorentzVector {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for LorentzVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a LorentzVector> for LorentzVector {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
