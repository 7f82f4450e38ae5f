//! Event-level V0 finding.

use crate::displacement::DisplacementGate;
use crate::hypothesis::HypothesisBuilder;
use crate::pairing::{ChargedPair, GeometricGate};
use crate::preselection::{PreselectedTrack, ReferencePoint, TrackPreselector};
use crate::statistics::V0FitStatistics;
use rayon::prelude::*;
use v0fit_core::{
    BeamSpot, Error, MagneticField, Result, Track, V0Collections, V0FitterConfig, Vertex,
    VertexCompositeCandidate, VertexFitterKind,
};
use v0fit_vertexing::{AdaptiveVertexFitter, KalmanVertexFitter, VertexFitter};

/// Inputs of one event.
#[derive(Clone, Copy)]
pub struct V0Event<'a> {
    /// Reconstructed tracks.
    pub tracks: &'a [Track],
    /// Beamspot.
    pub beamspot: &'a BeamSpot,
    /// Primary vertices; the first one is used with `useVertex`.
    pub primary_vertices: &'a [Vertex],
    /// Magnetic field.
    pub field: &'a dyn MagneticField,
}

impl<'a> V0Event<'a> {
    /// Bundles the inputs of one event.
    #[must_use]
    pub fn new(
        tracks: &'a [Track],
        beamspot: &'a BeamSpot,
        primary_vertices: &'a [Vertex],
        field: &'a dyn MagneticField,
    ) -> Self {
        Self {
            tracks,
            beamspot,
            primary_vertices,
            field,
        }
    }
}

/// Finds K-short, Lambda and D0 candidates among track pairs.
///
/// The fitter holds only immutable configuration and can be shared across
/// threads and events.
pub struct V0Fitter {
    config: V0FitterConfig,
    vertex_fitter: Box<dyn VertexFitter>,
}

impl V0Fitter {
    /// Creates a fitter with the vertex fitter selected by the configuration.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] if the configuration is invalid.
    pub fn new(config: V0FitterConfig) -> Result<Self> {
        config.validate()?;
        let vertex_fitter: Box<dyn VertexFitter> = match config.fitter_kind() {
            VertexFitterKind::Kalman => {
                Box::new(KalmanVertexFitter::new(config.effective_use_ref_tracks()))
            }
            VertexFitterKind::Adaptive => Box::new(AdaptiveVertexFitter::new()),
        };
        if config.use_ref_tracks && !config.effective_use_ref_tracks() {
            log::warn!("useRefTracks ignored: the adaptive fitter provides no refitted tracks");
        }
        Ok(Self {
            config,
            vertex_fitter,
        })
    }

    /// Replaces the vertex fitter.
    #[must_use]
    pub fn with_vertex_fitter(mut self, fitter: impl VertexFitter + 'static) -> Self {
        self.vertex_fitter = Box::new(fitter);
        self
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &V0FitterConfig {
        &self.config
    }

    /// Name of the vertex fitter in use.
    #[must_use]
    pub fn vertex_fitter_name(&self) -> &'static str {
        self.vertex_fitter.name()
    }

    /// Finds all candidates of one event.
    ///
    /// # Errors
    /// Returns [`Error::MissingPrimaryVertex`] when `useVertex` is set and
    /// the event has no primary vertex.
    pub fn fit_all(&self, event: &V0Event<'_>) -> Result<V0Collections> {
        self.fit_all_with_statistics(event).map(|(collections, _)| collections)
    }

    /// Like [`fit_all`](Self::fit_all), also returning the cut flow.
    ///
    /// # Errors
    /// Returns [`Error::MissingPrimaryVertex`] when `useVertex` is set and
    /// the event has no primary vertex.
    pub fn fit_all_with_statistics(
        &self,
        event: &V0Event<'_>,
    ) -> Result<(V0Collections, V0FitStatistics)> {
        let mut stats = V0FitStatistics {
            tracks_seen: event.tracks.len(),
            ..V0FitStatistics::default()
        };
        let mut collections = V0Collections::new();
        if event.tracks.len() < 2 {
            return Ok((collections, stats));
        }

        let primary_vertex = if self.config.use_vertex {
            Some(event.primary_vertices.first().ok_or(Error::MissingPrimaryVertex)?)
        } else {
            None
        };
        let reference = primary_vertex.map_or_else(
            || ReferencePoint::from_beamspot(event.beamspot),
            ReferencePoint::from_vertex,
        );

        let tracks = TrackPreselector::new(&self.config, event.beamspot, primary_vertex)
            .preselect(event.tracks, event.field);
        stats.tracks_preselected = tracks.len();
        log::debug!(
            "{} of {} tracks preselected",
            tracks.len(),
            event.tracks.len()
        );

        let row = |i: usize| self.process_row(&tracks, i, &reference);
        let rows: Vec<(Vec<VertexCompositeCandidate>, V0FitStatistics)> = if self.config.parallel {
            (0..tracks.len()).into_par_iter().map(row).collect()
        } else {
            (0..tracks.len()).map(row).collect()
        };
        for (candidates, row_stats) in rows {
            for candidate in candidates {
                collections.push(candidate);
            }
            stats.merge_pairs(&row_stats);
        }

        log::debug!(
            "found {} K-short, {} Lambda and {} D0 candidates",
            collections.kshorts.len(),
            collections.lambdas.len(),
            collections.d0s.len()
        );
        Ok((collections, stats))
    }

    /// Pairs track `i` with every later track.
    fn process_row(
        &self,
        tracks: &[PreselectedTrack],
        i: usize,
        reference: &ReferencePoint,
    ) -> (Vec<VertexCompositeCandidate>, V0FitStatistics) {
        let geometric = GeometricGate::new(&self.config);
        let displacement = DisplacementGate::new(&self.config, reference, self.vertex_fitter.as_ref());
        let hypotheses = HypothesisBuilder::new(&self.config);

        let mut candidates = Vec::new();
        let mut stats = V0FitStatistics::default();
        for other in &tracks[i + 1..] {
            let Some(pair) = ChargedPair::new(&tracks[i], other) else {
                stats.same_sign_pairs += 1;
                continue;
            };
            stats.pairs_considered += 1;
            let (pos, neg) = pair.indices();

            if let Err(reason) = geometric.check(&pair) {
                log::debug!("pair ({pos}, {neg}) rejected: {reason}");
                stats.reject(reason);
                continue;
            }
            stats.fits_performed += 1;
            let displaced = match displacement.check(&pair) {
                Ok(displaced) => displaced,
                Err(reason) => {
                    log::debug!("pair ({pos}, {neg}) rejected: {reason}");
                    stats.reject(reason);
                    continue;
                }
            };
            stats.pairs_accepted += 1;

            for candidate in hypotheses.build(&pair, &displaced) {
                stats.accept(candidate.particle());
                candidates.push(candidate);
            }
        }
        (candidates, stats)
    }
}
