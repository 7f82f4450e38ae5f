#![allow(clippy::uninlined_format_args)]
mod common;

use approx::assert_relative_eq;
use common::{beamspot, boosted_decay, equal_mass_pair, prompt_track, symmetric_pair, track_through};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use v0fit_algorithms::{
    ChargedPair, DisplacementGate, ReferencePoint, Rejection, TrackPreselector, V0Event, V0Fitter,
};
use v0fit_core::pdg::{D0_MASS, KAON_MASS, KSHORT_MASS, LAMBDA_MASS, PION_MASS, PROTON_MASS};
use v0fit_core::{
    LorentzVector, ParticleId, Point3, Track, UniformMagneticField, V0Collections, V0FitterConfig,
    Vector3, Vertex, VertexFitterKind,
};
use v0fit_vertexing::{FitError, KalmanVertexFitter, TransientTrack, TransientVertex, VertexFitter};

fn run(config: V0FitterConfig, tracks: &[Track], bz: f64) -> V0Collections {
    let fitter = V0Fitter::new(config).unwrap();
    let bs = beamspot();
    let field = UniformMagneticField::new(bz);
    fitter.fit_all(&V0Event::new(tracks, &bs, &[], &field)).unwrap()
}

fn kshort_tracks(bz: f64) -> Vec<Track> {
    let vertex = Point3::new(5.0, 0.0, 1.0);
    let (p_pos, p_neg) = equal_mass_pair(KSHORT_MASS, PION_MASS, 1.0, 0.3);
    vec![
        track_through(vertex, p_pos, 1, bz),
        track_through(vertex, p_neg, -1, bz),
    ]
}

fn rotate_z(v: Vector3, angle: f64) -> Vector3 {
    let (s, c) = angle.sin_cos();
    Vector3::new(c * v.x - s * v.y, s * v.x + c * v.y, v.z)
}

/// A K-short, a Lambda at right angles to it, and two prompt tracks.
fn busy_event() -> Vec<Track> {
    let bz = 3.8;
    let mut tracks = kshort_tracks(bz);
    let lambda_vertex = Point3::new(0.0, 6.0, 2.0);
    let (proton, pion) = boosted_decay(LAMBDA_MASS, PROTON_MASS, PION_MASS, 4.0);
    let quarter = std::f64::consts::FRAC_PI_2;
    tracks.push(prompt_track(1, Vector3::new(0.5, 0.5, 0.1)));
    tracks.push(track_through(lambda_vertex, rotate_z(proton, quarter), 1, bz));
    tracks.push(prompt_track(-1, Vector3::new(-0.7, 0.2, 0.3)));
    tracks.push(track_through(lambda_vertex, rotate_z(pion, quarter), -1, bz));
    tracks
}

struct CountingFitter {
    calls: Arc<AtomicUsize>,
    inner: KalmanVertexFitter,
}

impl VertexFitter for CountingFitter {
    fn name(&self) -> &'static str {
        "Counting"
    }

    fn vertex(&self, tracks: &[TransientTrack]) -> Result<TransientVertex, FitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.vertex(tracks)
    }
}

#[test]
fn test_clean_kshort_without_field() {
    let vertex = Point3::new(3.0, 0.0, 0.0);
    let (p_pos, p_neg) = equal_mass_pair(KSHORT_MASS, PION_MASS, 1.0, 0.0);
    let tracks = [
        track_through(vertex, p_pos, 1, 0.0),
        track_through(vertex, p_neg, -1, 0.0),
    ];
    let found = run(V0FitterConfig::default(), &tracks, 0.0);

    assert_eq!(found.kshorts.len(), 1);
    assert!(found.lambdas.is_empty());
    assert!(found.d0s.is_empty());
    let ks = &found.kshorts[0];
    assert_eq!(ks.pdg_id(), 310);
    assert_relative_eq!(ks.mass(), KSHORT_MASS, epsilon = 1e-9);
    assert_relative_eq!((ks.vertex().position - vertex).norm(), 0.0, epsilon = 1e-6);
    let indices: Vec<usize> = ks.daughters().iter().map(|d| d.track_index).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn test_clean_kshort_in_field() {
    let found = run(V0FitterConfig::default(), &kshort_tracks(3.8), 3.8);
    assert_eq!(found.kshorts.len(), 1);
    let ks = &found.kshorts[0];
    assert_relative_eq!(ks.mass(), KSHORT_MASS, epsilon = 1e-5);
    assert_relative_eq!(
        (ks.vertex().position - Point3::new(5.0, 0.0, 1.0)).norm(),
        0.0,
        epsilon = 1e-5
    );
    assert!(ks.vertex().normalized_chi2() < 1e-3);
}

#[test]
fn test_same_sign_pair_gives_nothing() {
    let vertex = Point3::new(5.0, 0.0, 1.0);
    let (p_a, p_b) = equal_mass_pair(KSHORT_MASS, PION_MASS, 1.0, 0.3);
    let tracks = [
        track_through(vertex, p_a, 1, 3.8),
        track_through(vertex, p_b, 1, 3.8),
    ];
    let fitter = V0Fitter::new(V0FitterConfig::default()).unwrap();
    let bs = beamspot();
    let field = UniformMagneticField::new(3.8);
    let (found, stats) = fitter
        .fit_all_with_statistics(&V0Event::new(&tracks, &bs, &[], &field))
        .unwrap();
    assert!(found.is_empty());
    assert_eq!(stats.tracks_preselected, 2);
    assert_eq!(stats.same_sign_pairs, 1);
    assert_eq!(stats.pairs_considered, 0);
    assert_eq!(stats.fits_performed, 0);
}

#[test]
fn test_fewer_than_two_tracks_never_fit() {
    let calls = Arc::new(AtomicUsize::new(0));
    let fitter = V0Fitter::new(V0FitterConfig::default())
        .unwrap()
        .with_vertex_fitter(CountingFitter {
            calls: Arc::clone(&calls),
            inner: KalmanVertexFitter::new(true),
        });
    let bs = beamspot();
    let field = UniformMagneticField::new(3.8);
    let tracks = kshort_tracks(3.8);

    for n in 0..2 {
        let event = V0Event::new(&tracks[..n], &bs, &[], &field);
        let (found, stats) = fitter.fit_all_with_statistics(&event).unwrap();
        assert!(found.is_empty());
        assert_eq!(stats.tracks_seen, n);
        assert_eq!(stats.fits_performed, 0);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let found = fitter.fit_all(&V0Event::new(&tracks, &bs, &[], &field)).unwrap();
    assert_eq!(found.kshorts.len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_repeated_runs_are_identical() {
    let tracks = busy_event();
    let first = run(V0FitterConfig::default(), &tracks, 3.8);
    let second = run(V0FitterConfig::default(), &tracks, 3.8);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_parallel_matches_serial() {
    let tracks = busy_event();
    let parallel = run(V0FitterConfig::default().with_parallel(true), &tracks, 3.8);
    let serial = run(V0FitterConfig::default().with_parallel(false), &tracks, 3.8);
    assert_eq!(parallel, serial);
}

#[test]
fn test_track_order_does_not_matter() {
    let tracks = busy_event();
    let n = tracks.len();
    let reversed: Vec<Track> = tracks.iter().rev().copied().collect();

    let key = |found: &V0Collections, original: &dyn Fn(usize) -> usize| {
        let mut keys: Vec<(i32, usize, usize, u64)> = found
            .iter()
            .map(|c| {
                let [a, b] = c.daughters();
                (
                    c.pdg_id(),
                    original(a.track_index),
                    original(b.track_index),
                    c.mass().to_bits(),
                )
            })
            .collect();
        keys.sort_unstable();
        keys
    };

    let forward = run(V0FitterConfig::default(), &tracks, 3.8);
    let backward = run(V0FitterConfig::default(), &reversed, 3.8);
    assert_eq!(
        key(&forward, &|i| i),
        key(&backward, &|i| n - 1 - i)
    );
}

#[test]
fn test_lambda_or_anti_lambda_per_pair() {
    let vertex = Point3::new(5.0, 0.0, 0.0);

    let (proton, pion) = boosted_decay(LAMBDA_MASS, PROTON_MASS, PION_MASS, 4.0);
    let tracks = [
        track_through(vertex, proton, 1, 3.8),
        track_through(vertex, pion, -1, 3.8),
    ];
    let found = run(V0FitterConfig::default(), &tracks, 3.8);
    assert_eq!(found.lambdas.len(), 1);
    let lambda = &found.lambdas[0];
    assert_eq!(lambda.particle(), ParticleId::Lambda);
    assert_relative_eq!(lambda.mass(), LAMBDA_MASS, epsilon = 1e-5);
    assert_eq!(lambda.daughters()[0].charge, 1);
    assert_relative_eq!(lambda.daughters()[0].p4.mass(), PROTON_MASS, epsilon = 1e-9);

    let (pion, antiproton) = boosted_decay(LAMBDA_MASS, PION_MASS, PROTON_MASS, 4.0);
    let tracks = [
        track_through(vertex, pion, 1, 3.8),
        track_through(vertex, antiproton, -1, 3.8),
    ];
    let found = run(V0FitterConfig::default(), &tracks, 3.8);
    assert_eq!(found.lambdas.len(), 1);
    assert_eq!(found.lambdas[0].particle(), ParticleId::AntiLambda);
    assert_eq!(found.lambdas[0].daughters()[0].charge, -1);
}

#[test]
fn test_d0_charge_states_evaluated_independently() {
    let config = V0FitterConfig {
        m_pipi_cut: 5.0,
        d0_mass_cut: 0.005,
        ..V0FitterConfig::default()
    }
    .with_channels(false, false, true);
    let vertex = Point3::new(5.0, 0.0, 0.0);

    // Equal momenta: swapping the kaon and pion assignments leaves the mass unchanged.
    let (pion, kaon) = symmetric_pair(D0_MASS, PION_MASS, KAON_MASS, 2.0);
    let tracks = [
        track_through(vertex, pion, 1, 3.8),
        track_through(vertex, kaon, -1, 3.8),
    ];
    let found = run(config.clone(), &tracks, 3.8);
    let species: Vec<ParticleId> = found.d0s.iter().map(|c| c.particle()).collect();
    assert_eq!(species, vec![ParticleId::D0, ParticleId::AntiD0]);

    // A boosted decay: the swapped assignment falls outside the window.
    let (pion, kaon) = boosted_decay(D0_MASS, PION_MASS, KAON_MASS, 5.0);
    let tracks = [
        track_through(vertex, pion, 1, 3.8),
        track_through(vertex, kaon, -1, 3.8),
    ];
    let found = run(config, &tracks, 3.8);
    let species: Vec<ParticleId> = found.d0s.iter().map(|c| c.particle()).collect();
    assert_eq!(species, vec![ParticleId::D0]);
    assert_relative_eq!(found.d0s[0].mass(), D0_MASS, epsilon = 1e-5);
}

#[test]
fn test_candidates_are_consistent() {
    let config = V0FitterConfig::default().with_channels(true, true, true);
    let found = run(config.clone(), &busy_event(), 3.8);
    assert!(found.len() >= 2);
    for candidate in found.iter() {
        let sum: LorentzVector = candidate.daughters().iter().map(|d| d.p4).sum();
        assert_eq!(candidate.p4(), sum);
        let particle = candidate.particle();
        assert!((candidate.mass() - particle.nominal_mass()).abs() <= config.mass_cut(particle));
        for daughter in candidate.daughters() {
            assert_eq!(daughter.vertex, candidate.vertex().position);
        }
    }
}

#[test]
fn test_significance_equal_to_cut_is_rejected() {
    let tracks = kshort_tracks(3.8);
    let bs = beamspot();
    let field = UniformMagneticField::new(3.8);

    let probe = V0FitterConfig::default();
    let selected = TrackPreselector::new(&probe, &bs, None).preselect(&tracks, &field);
    let pair = ChargedPair::new(&selected[0], &selected[1]).unwrap();
    let reference = ReferencePoint::from_beamspot(&bs);
    let kalman = KalmanVertexFitter::new(true);
    let significance = DisplacementGate::new(&probe, &reference, &kalman)
        .check(&pair)
        .unwrap()
        .significance_xy;

    let at_cut = V0FitterConfig {
        vtx_decay_sig_xy_cut: significance,
        ..V0FitterConfig::default()
    };
    let (found, stats) = V0Fitter::new(at_cut)
        .unwrap()
        .fit_all_with_statistics(&V0Event::new(&tracks, &bs, &[], &field))
        .unwrap();
    assert!(found.is_empty());
    assert_eq!(stats.rejected(Rejection::DecaySignificanceXY), 1);

    let below_cut = V0FitterConfig {
        vtx_decay_sig_xy_cut: significance * (1.0 - 1e-9),
        ..V0FitterConfig::default()
    };
    assert_eq!(run(below_cut, &tracks, 3.8).kshorts.len(), 1);
}

#[test]
fn test_significance_xyz_equal_to_cut_is_kept() {
    let tracks = kshort_tracks(3.8);
    let bs = beamspot();
    let field = UniformMagneticField::new(3.8);

    let open = V0FitterConfig::default();
    let selected = TrackPreselector::new(&open, &bs, None).preselect(&tracks, &field);
    let pair = ChargedPair::new(&selected[0], &selected[1]).unwrap();
    let reference = ReferencePoint::from_beamspot(&bs);
    let kalman = KalmanVertexFitter::new(true);
    let significance = DisplacementGate::new(&open, &reference, &kalman)
        .check(&pair)
        .unwrap()
        .significance_xyz;

    let at_cut = V0FitterConfig {
        vtx_decay_sig_xyz_cut: significance,
        ..V0FitterConfig::default()
    };
    let (found, stats) = V0Fitter::new(at_cut)
        .unwrap()
        .fit_all_with_statistics(&V0Event::new(&tracks, &bs, &[], &field))
        .unwrap();
    assert_eq!(found.kshorts.len(), 1);
    assert_eq!(stats.rejected(Rejection::DecaySignificanceXYZ), 0);

    let above_cut = V0FitterConfig {
        vtx_decay_sig_xyz_cut: significance * (1.0 + 1e-9),
        ..V0FitterConfig::default()
    };
    assert!(run(above_cut, &tracks, 3.8).kshorts.is_empty());
}

#[test]
fn test_adaptive_fitter_finds_same_kshort() {
    let tracks = kshort_tracks(3.8);
    let kalman = run(V0FitterConfig::default(), &tracks, 3.8);
    let adaptive = run(
        V0FitterConfig::default().with_fitter(VertexFitterKind::Adaptive),
        &tracks,
        3.8,
    );
    assert_eq!(kalman.kshorts.len(), 1);
    assert_eq!(adaptive.kshorts.len(), 1);
    let (k, a) = (&kalman.kshorts[0], &adaptive.kshorts[0]);
    assert_relative_eq!(k.mass(), a.mass(), epsilon = 1e-6);
    assert_relative_eq!((k.vertex().position - a.vertex().position).norm(), 0.0, epsilon = 1e-6);
    assert!(a.vertex().ndof < k.vertex().ndof);
}

#[test]
fn test_primary_vertex_reference() {
    let tracks = kshort_tracks(3.8);
    let bs = beamspot();
    let field = UniformMagneticField::new(3.8);
    let pv = Vertex::new(
        Point3::new(0.0, 0.0, 0.2),
        v0fit_core::Covariance3::identity() * 1e-6,
        20.0,
        25.0,
    );
    let fitter = V0Fitter::new(V0FitterConfig::default().with_use_vertex(true)).unwrap();
    let found = fitter
        .fit_all(&V0Event::new(&tracks, &bs, &[pv], &field))
        .unwrap();
    assert_eq!(found.kshorts.len(), 1);
}
