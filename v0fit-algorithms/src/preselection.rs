//! Track quality and impact-parameter preselection.

use v0fit_core::{BeamSpot, Covariance3, MagneticField, Point3, Track, V0FitterConfig, Vertex};
use v0fit_vertexing::TransientTrack;

/// Point the decay displacement is measured from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    /// Position (cm).
    pub position: Point3,
    /// Position covariance (cm²).
    pub covariance: Covariance3,
}

impl ReferencePoint {
    /// Beamspot centre with the rotated luminous-region covariance.
    #[must_use]
    pub fn from_beamspot(beamspot: &BeamSpot) -> Self {
        Self {
            position: beamspot.position,
            covariance: beamspot.rotated_covariance3d(),
        }
    }

    /// A primary vertex.
    #[must_use]
    pub fn from_vertex(vertex: &Vertex) -> Self {
        Self {
            position: vertex.position,
            covariance: vertex.covariance,
        }
    }
}

/// A track that passed preselection, with its index in the input collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PreselectedTrack {
    /// Index in the input track collection.
    pub index: usize,
    /// The track bound to the magnetic field.
    pub transient: TransientTrack,
}

impl PreselectedTrack {
    /// The input track.
    #[must_use]
    pub fn track(&self) -> &Track {
        self.transient.track()
    }

    /// Track charge.
    #[must_use]
    pub fn charge(&self) -> i8 {
        self.transient.charge()
    }
}

/// Applies the per-track quality and impact-significance cuts.
///
/// Impact parameters are taken with respect to the beamspot (transverse one
/// following the beam slopes) unless `useVertex` is set, in which case the
/// primary vertex is used. Every comparison is written so that a NaN fails it.
#[derive(Debug, Clone, Copy)]
pub struct TrackPreselector<'a> {
    config: &'a V0FitterConfig,
    beamspot: &'a BeamSpot,
    primary_vertex: Option<&'a Vertex>,
}

impl<'a> TrackPreselector<'a> {
    /// Creates a preselector; `primary_vertex` is only consulted with `useVertex`.
    #[must_use]
    pub fn new(
        config: &'a V0FitterConfig,
        beamspot: &'a BeamSpot,
        primary_vertex: Option<&'a Vertex>,
    ) -> Self {
        Self {
            config,
            beamspot,
            primary_vertex,
        }
    }

    fn vertex(&self) -> Option<&Vertex> {
        self.primary_vertex.filter(|_| self.config.use_vertex)
    }

    /// Transverse impact-parameter significance.
    #[must_use]
    pub fn ip_significance_xy(&self, track: &Track) -> f64 {
        let dxy = match self.vertex() {
            Some(vertex) => track.dxy(&vertex.position),
            None => track.dxy_beamspot(self.beamspot),
        };
        dxy.abs() / track.dxy_error
    }

    /// Longitudinal impact-parameter significance.
    #[must_use]
    pub fn ip_significance_z(&self, track: &Track) -> f64 {
        let position = self.vertex().map_or(self.beamspot.position, |v| v.position);
        track.dz(&position).abs() / track.dz_error
    }

    /// True if `track` passes every cut.
    #[must_use]
    pub fn accepts(&self, track: &Track) -> bool {
        let config = self.config;
        track.normalized_chi2() < config.tk_chi2_cut
            && track.valid_hits >= config.tk_nhits_cut
            && track.pt() > config.tk_pt_cut
            && self.ip_significance_xy(track) > config.tk_ip_sig_xy_cut
            && self.ip_significance_z(track) > config.tk_ip_sig_z_cut
    }

    /// Accepted tracks, in input order, bound to `field`.
    #[must_use]
    pub fn preselect(&self, tracks: &[Track], field: &dyn MagneticField) -> Vec<PreselectedTrack> {
        tracks
            .iter()
            .enumerate()
            .filter(|(index, track)| {
                let accepted = self.accepts(track);
                if !accepted {
                    log::trace!("track {index} fails preselection");
                }
                accepted
            })
            .map(|(index, track)| PreselectedTrack {
                index,
                transient: TransientTrack::new(*track, field),
            })
            .collect()
    }
}
