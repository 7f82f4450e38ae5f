//! Event builders shared by the integration tests.
#![allow(dead_code)]

use v0fit_core::{BeamSpot, Covariance3, Point3, Track, Vector3};
use v0fit_vertexing::Helix;

/// Beamspot at the origin with a realistic luminous region.
pub fn beamspot() -> BeamSpot {
    BeamSpot::new(Point3::origin())
        .with_widths(0.0015, 0.0015, 5.0)
        .with_covariance(Covariance3::from_diagonal(&Vector3::new(1e-8, 1e-8, 1e-4)))
}

/// A well-measured track passing exactly through `vertex` with `momentum`
/// there, stored at its point closest to the z axis.
pub fn track_through(vertex: Point3, momentum: Vector3, charge: i8, bz: f64) -> Track {
    let helix = Helix::new(vertex, &momentum, charge, bz).unwrap();
    let s = helix.path_to_transverse_point(0.0, 0.0).unwrap();
    Track::new(charge, helix.position_at(s), helix.momentum_at(s))
        .with_fit_quality(12.0, 12.0)
        .with_valid_hits(14)
        .with_impact_errors(0.01, 0.02)
}

/// A track from the beam line, failing the impact-significance cut.
pub fn prompt_track(charge: i8, momentum: Vector3) -> Track {
    Track::new(charge, Point3::origin(), momentum)
        .with_fit_quality(12.0, 12.0)
        .with_valid_hits(14)
        .with_impact_errors(0.01, 0.02)
}

/// Daughter momenta `p± = (px, ±b, pz)` with invariant mass `mass` when both
/// are given mass `m`.
pub fn equal_mass_pair(mass: f64, m: f64, px: f64, pz: f64) -> (Vector3, Vector3) {
    let b = (mass * mass / 4.0 - m * m).sqrt();
    (Vector3::new(px, b, pz), Vector3::new(px, -b, pz))
}

/// Two-body decay at rest along ±y, boosted along x to momentum `p`.
/// Returns (positive, negative) daughter momenta.
pub fn boosted_decay(mass: f64, m_pos: f64, m_neg: f64, p: f64) -> (Vector3, Vector3) {
    let m2 = mass * mass;
    let p_star = ((m2 - (m_pos + m_neg).powi(2)) * (m2 - (m_pos - m_neg).powi(2))).sqrt()
        / (2.0 * mass);
    let e_pos = (m2 + m_pos * m_pos - m_neg * m_neg) / (2.0 * mass);
    let e_neg = mass - e_pos;
    let gamma_beta = p / mass;
    (
        Vector3::new(gamma_beta * e_pos, p_star, 0.0),
        Vector3::new(gamma_beta * e_neg, -p_star, 0.0),
    )
}

/// Momenta `(px, ±b, 0)` of equal magnitude whose invariant mass under
/// (`m_pos`, `m_neg`) is `mass`; found by bisection on `b`.
pub fn symmetric_pair(mass: f64, m_pos: f64, m_neg: f64, px: f64) -> (Vector3, Vector3) {
    let pair_mass = |b: f64| {
        let p2 = px * px + b * b;
        let e = (p2 + m_pos * m_pos).sqrt() + (p2 + m_neg * m_neg).sqrt();
        (e * e - 4.0 * px * px).sqrt()
    };
    let (mut lo, mut hi) = (0.0, 10.0);
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if pair_mass(mid) < mass {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let b = 0.5 * (lo + hi);
    (Vector3::new(px, b, 0.0), Vector3::new(px, -b, 0.0))
}
