//! Tracks bound to the magnetic field.

use crate::helix::Helix;
use v0fit_core::{MagneticField, Point3, Track, Vector3};

/// Position and momentum of a charged particle at one point of its trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryState {
    /// Position (cm).
    pub position: Point3,
    /// Momentum at `position` (GeV).
    pub momentum: Vector3,
    /// Charge (±1, 0 for neutral).
    pub charge: i8,
    /// Longitudinal field used to propagate the state (T).
    pub bz: f64,
}

impl TrajectoryState {
    /// Helix through this state, if it has transverse momentum.
    #[must_use]
    pub fn helix(&self) -> Option<Helix> {
        Helix::new(self.position, &self.momentum, self.charge, self.bz)
    }

    fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|c| c.is_finite())
            && self.momentum.iter().all(|c| c.is_finite())
    }
}

/// A track together with the field it bends in.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientTrack {
    track: Track,
    bz: f64,
    helix: Option<Helix>,
}

impl TransientTrack {
    /// Binds `track` to `field`, sampled at the track reference point.
    #[must_use]
    pub fn new(track: Track, field: &dyn MagneticField) -> Self {
        Self::with_bz(track, field.bz(&track.reference_point))
    }

    /// Binds `track` to a fixed longitudinal field.
    #[must_use]
    pub fn with_bz(track: Track, bz: f64) -> Self {
        let helix = Helix::new(track.reference_point, &track.momentum, track.charge, bz);
        Self { track, bz, helix }
    }

    /// The underlying track.
    #[must_use]
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Track charge.
    #[must_use]
    pub fn charge(&self) -> i8 {
        self.track.charge
    }

    /// Field the track was bound to (T).
    #[must_use]
    pub fn bz(&self) -> f64 {
        self.bz
    }

    /// State at the track reference point.
    #[must_use]
    pub fn initial_state(&self) -> Option<TrajectoryState> {
        self.helix.map(|_| self.state(self.track.reference_point, self.track.momentum))
    }

    /// State closest to the nominal interaction point `(0, 0, 0)`.
    #[must_use]
    pub fn impact_point_state(&self) -> Option<TrajectoryState> {
        self.state_closest_to_point(&Point3::origin())
    }

    /// State at the point of the trajectory closest to `point` in the
    /// transverse plane.
    ///
    /// Returns `None` if the track cannot be propagated (no transverse
    /// momentum) or the closest point is undefined.
    #[must_use]
    pub fn state_closest_to_point(&self, point: &Point3) -> Option<TrajectoryState> {
        let helix = self.helix?;
        let s = helix.path_to_transverse_point(point.x, point.y)?;
        let state = self.state(helix.position_at(s), helix.momentum_at(s));
        state.is_finite().then_some(state)
    }

    fn state(&self, position: Point3, momentum: Vector3) -> TrajectoryState {
        TrajectoryState {
            position,
            momentum,
            charge: self.track.charge,
            bz: self.bz,
        }
    }
}
