//! Charged-particle helices in a solenoidal field.
//!
//! A track of charge `q` and transverse momentum `pt` in a field `Bz` bends
//! with signed curvature
//!
//! ```text
//! κ = -q · c · Bz / pt        c = 0.00299792458 GeV / (T · cm)
//! ```
//!
//! and, parameterised by the transverse path length `s`,
//!
//! ```text
//! φ(s) = φ0 + κ s
//! x(s) = x0 + s · cos(φ0 + κs/2) · sinc(κs/2)
//! y(s) = y0 + s · sin(φ0 + κs/2) · sinc(κs/2)
//! z(s) = z0 + s · pz / pt
//! ```
//!
//! which reduces to a straight line for `κ = 0` without special casing.

use nalgebra::Vector2;
use std::f64::consts::PI;
use v0fit_core::{Point3, Vector3};

/// `c` in GeV / (T · cm).
pub const CURVATURE_CONSTANT: f64 = 0.002_997_924_58;

/// Below this curvature (1/cm) a trajectory is handled as a straight line.
const STRAIGHT_CURVATURE: f64 = 1e-9;

/// Transverse projection of a curved trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Centre in the transverse plane.
    pub centre: Vector2<f64>,
    /// Radius (cm).
    pub radius: f64,
}

/// Transverse projection of a straight trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// A point on the line.
    pub point: Vector2<f64>,
    /// Unit direction.
    pub direction: Vector2<f64>,
}

/// A helix defined by a point on it, the momentum there and the curvature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helix {
    origin: Point3,
    phi0: f64,
    pt: f64,
    pz: f64,
    kappa: f64,
}

impl Helix {
    /// Builds the helix through `position` with `momentum` for a particle of
    /// `charge` in a longitudinal field `bz` (Tesla).
    ///
    /// Returns `None` for tracks without transverse momentum or with
    /// non-finite inputs.
    #[must_use]
    pub fn new(position: Point3, momentum: &Vector3, charge: i8, bz: f64) -> Option<Self> {
        let pt = momentum.x.hypot(momentum.y);
        if !(pt > 0.0 && pt.is_finite() && momentum.z.is_finite() && bz.is_finite()) {
            return None;
        }
        if !position.coords.iter().all(|c| c.is_finite()) {
            return None;
        }
        Some(Self {
            origin: position,
            phi0: momentum.y.atan2(momentum.x),
            pt,
            pz: momentum.z,
            kappa: -f64::from(charge) * CURVATURE_CONSTANT * bz / pt,
        })
    }

    /// Signed curvature (1/cm); negative for clockwise motion seen from +z.
    #[inline]
    #[must_use]
    pub fn curvature(&self) -> f64 {
        self.kappa
    }

    /// True if the trajectory is handled as a straight line.
    #[inline]
    #[must_use]
    pub fn is_straight(&self) -> bool {
        self.kappa.abs() < STRAIGHT_CURVATURE
    }

    /// Position after a transverse path length `s`.
    #[must_use]
    pub fn position_at(&self, s: f64) -> Point3 {
        let half = 0.5 * self.kappa * s;
        let chord = s * sinc(half);
        let phi_mid = self.phi0 + half;
        Point3::new(
            self.origin.x + chord * phi_mid.cos(),
            self.origin.y + chord * phi_mid.sin(),
            self.origin.z + s * self.pz / self.pt,
        )
    }

    /// Momentum after a transverse path length `s`.
    #[must_use]
    pub fn momentum_at(&self, s: f64) -> Vector3 {
        let phi = self.phi0 + self.kappa * s;
        Vector3::new(self.pt * phi.cos(), self.pt * phi.sin(), self.pz)
    }

    /// Transverse circle, or `None` for straight trajectories.
    #[must_use]
    pub fn circle(&self) -> Option<Circle> {
        if self.is_straight() {
            return None;
        }
        Some(Circle {
            centre: Vector2::new(
                self.origin.x - self.phi0.sin() / self.kappa,
                self.origin.y + self.phi0.cos() / self.kappa,
            ),
            radius: 1.0 / self.kappa.abs(),
        })
    }

    /// Transverse line through the origin point along the initial direction.
    #[must_use]
    pub fn tangent_line(&self) -> Line {
        Line {
            point: Vector2::new(self.origin.x, self.origin.y),
            direction: Vector2::new(self.phi0.cos(), self.phi0.sin()),
        }
    }

    /// Transverse path length to the point of the trajectory closest to
    /// `(x, y)` in the transverse plane, choosing the shortest arc.
    ///
    /// Returns `None` when the point sits on the circle centre, where every
    /// point of the circle is equally close.
    #[must_use]
    pub fn path_to_transverse_point(&self, x: f64, y: f64) -> Option<f64> {
        let Some(circle) = self.circle() else {
            let line = self.tangent_line();
            return Some((Vector2::new(x, y) - line.point).dot(&line.direction));
        };
        let d = Vector2::new(x, y) - circle.centre;
        let norm = d.norm();
        if !(norm > 0.0) {
            return None;
        }
        let sign = self.kappa.signum();
        let phi = (sign * d.x).atan2(-sign * d.y);
        let s = wrap_angle(phi - self.phi0) / self.kappa;
        s.is_finite().then_some(s)
    }
}

/// `sin(x) / x`, continuous at zero.
#[inline]
fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-6 {
        1.0 - x * x / 6.0
    } else {
        x.sin() / x
    }
}

/// Wraps an angle into `(-π, π]`.
#[inline]
fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}
