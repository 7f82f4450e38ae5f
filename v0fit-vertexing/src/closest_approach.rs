//! Closest approach of two trajectories in the transverse plane.
//!
//! The transverse projections (circles, or lines for straight tracks) are
//! intersected. With two intersections the one whose 3D points are closer
//! wins; without intersection the points facing each other along the line
//! of centres are used. The transverse solutions are then lifted back onto
//! each helix to obtain 3D points.

use crate::helix::{Circle, Helix, Line};
use crate::transient::TrajectoryState;
use nalgebra::Vector2;
use v0fit_core::Point3;

type Vec2 = Vector2<f64>;

/// Result of a successful closest-approach computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestApproach {
    /// Point on the first trajectory.
    pub first: Point3,
    /// Point on the second trajectory.
    pub second: Point3,
    /// Midpoint of the two points.
    pub crossing_point: Point3,
    /// 3D distance between the two points (cm).
    pub distance: f64,
}

/// Computes the closest approach between two trajectory states.
///
/// Returns `None` when either state cannot be propagated, the trajectories
/// are parallel lines or concentric circles, or no point can be lifted back
/// onto the helices.
#[must_use]
pub fn closest_approach(a: &TrajectoryState, b: &TrajectoryState) -> Option<ClosestApproach> {
    let ha = a.helix()?;
    let hb = b.helix()?;

    let candidates = match (ha.circle(), hb.circle()) {
        (None, None) => line_line(&ha.tangent_line(), &hb.tangent_line()),
        (None, Some(cb)) => line_circle(&ha.tangent_line(), &cb),
        (Some(ca), None) => line_circle(&hb.tangent_line(), &ca)
            .into_iter()
            .map(|(on_line, on_circle)| (on_circle, on_line))
            .collect(),
        (Some(ca), Some(cb)) => circle_circle(&ca, &cb),
    };

    candidates
        .into_iter()
        .filter_map(|(ta, tb)| lift(&ha, &hb, ta, tb))
        .min_by(|x, y| x.distance.total_cmp(&y.distance))
}

fn lift(ha: &Helix, hb: &Helix, ta: Vec2, tb: Vec2) -> Option<ClosestApproach> {
    let first = ha.position_at(ha.path_to_transverse_point(ta.x, ta.y)?);
    let second = hb.position_at(hb.path_to_transverse_point(tb.x, tb.y)?);
    let distance = (first - second).norm();
    distance.is_finite().then(|| ClosestApproach {
        first,
        second,
        crossing_point: nalgebra::center(&first, &second),
        distance,
    })
}

fn line_line(a: &Line, b: &Line) -> Vec<(Vec2, Vec2)> {
    let cross = a.direction.perp(&b.direction);
    if cross.abs() < 1e-12 {
        return Vec::new();
    }
    let t = (b.point - a.point).perp(&b.direction) / cross;
    let x = a.point + a.direction * t;
    vec![(x, x)]
}

/// Pairs are (point on line, point on circle).
fn line_circle(line: &Line, circle: &Circle) -> Vec<(Vec2, Vec2)> {
    let foot = line.point + line.direction * (circle.centre - line.point).dot(&line.direction);
    let to_foot = foot - circle.centre;
    let h = to_foot.norm();
    if h <= circle.radius {
        let half_chord = (circle.radius * circle.radius - h * h).sqrt();
        let p1 = foot + line.direction * half_chord;
        let p2 = foot - line.direction * half_chord;
        vec![(p1, p1), (p2, p2)]
    } else {
        vec![(foot, circle.centre + to_foot * (circle.radius / h))]
    }
}

fn circle_circle(a: &Circle, b: &Circle) -> Vec<(Vec2, Vec2)> {
    let delta = b.centre - a.centre;
    let d = delta.norm();
    if d < 1e-12 {
        return Vec::new();
    }
    let u = delta / d;
    let (r1, r2) = (a.radius, b.radius);

    if d > r1 + r2 {
        return vec![(a.centre + u * r1, b.centre - u * r2)];
    }
    if d < (r1 - r2).abs() {
        return if r1 > r2 {
            vec![(a.centre + u * r1, b.centre + u * r2)]
        } else {
            vec![(a.centre - u * r1, b.centre - u * r2)]
        };
    }

    let along = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h = (r1 * r1 - along * along).max(0.0).sqrt();
    let base = a.centre + u * along;
    let normal = Vec2::new(-u.y, u.x);
    let p1 = base + normal * h;
    let p2 = base - normal * h;
    vec![(p1, p1), (p2, p2)]
}
