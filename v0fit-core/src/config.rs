//! V0 finder configuration.

use crate::error::{Error, Result};
use crate::pdg::ParticleId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vertex fitting algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VertexFitterKind {
    /// Least-squares Kalman-style fit; can produce refitted tracks.
    Kalman,
    /// Annealed, outlier-downweighting fit; never produces refitted tracks.
    Adaptive,
}

/// Configuration for the V0 finder. Fixed for a whole run.
///
/// Field names deserialize from the producer parameter names
/// (`tkChi2Cut`, `vtxDecaySigXYCut`, ...); absent keys keep their defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct V0FitterConfig {
    /// Use the first primary vertex instead of the beamspot as reference.
    #[cfg_attr(feature = "serde", serde(rename = "useVertex"))]
    pub use_vertex: bool,
    /// Kalman fitter if true, adaptive fitter otherwise.
    #[cfg_attr(feature = "serde", serde(rename = "vertexFitter"))]
    pub vertex_fitter: bool,
    /// Take daughter momenta from refitted tracks (Kalman fitter only).
    #[cfg_attr(feature = "serde", serde(rename = "useRefTracks"))]
    pub use_ref_tracks: bool,

    /// Reconstruct K-shorts.
    #[cfg_attr(feature = "serde", serde(rename = "doKShorts"))]
    pub do_kshorts: bool,
    /// Reconstruct Lambdas and anti-Lambdas.
    #[cfg_attr(feature = "serde", serde(rename = "doLambdas"))]
    pub do_lambdas: bool,
    /// Reconstruct D0s and anti-D0s.
    #[cfg_attr(feature = "serde", serde(rename = "doD0s"))]
    pub do_d0s: bool,

    /// Maximum track chi-square per degree of freedom.
    #[cfg_attr(feature = "serde", serde(rename = "tkChi2Cut"))]
    pub tk_chi2_cut: f64,
    /// Minimum number of valid hits.
    #[cfg_attr(feature = "serde", serde(rename = "tkNHitsCut"))]
    pub tk_nhits_cut: u32,
    /// Minimum transverse momentum (GeV).
    #[cfg_attr(feature = "serde", serde(rename = "tkPtCut"))]
    pub tk_pt_cut: f64,
    /// Minimum transverse impact parameter significance.
    #[cfg_attr(feature = "serde", serde(rename = "tkIPSigXYCut"))]
    pub tk_ip_sig_xy_cut: f64,
    /// Minimum longitudinal impact parameter significance.
    #[cfg_attr(feature = "serde", serde(rename = "tkIPSigZCut"))]
    pub tk_ip_sig_z_cut: f64,

    /// Maximum vertex chi-square per degree of freedom.
    #[cfg_attr(feature = "serde", serde(rename = "vtxChi2Cut"))]
    pub vtx_chi2_cut: f64,
    /// Minimum 3D decay length significance.
    #[cfg_attr(feature = "serde", serde(rename = "vtxDecaySigXYZCut"))]
    pub vtx_decay_sig_xyz_cut: f64,
    /// Minimum transverse decay length significance.
    #[cfg_attr(feature = "serde", serde(rename = "vtxDecaySigXYCut"))]
    pub vtx_decay_sig_xy_cut: f64,

    /// Maximum distance of closest approach between the two tracks (cm).
    #[cfg_attr(feature = "serde", serde(rename = "tkDCACut"))]
    pub tk_dca_cut: f64,
    /// Maximum pion-pair invariant mass at the crossing point (GeV).
    #[cfg_attr(feature = "serde", serde(rename = "mPiPiCut"))]
    pub m_pipi_cut: f64,
    /// Accepted for compatibility with existing parameter sets; not applied.
    #[cfg_attr(feature = "serde", serde(rename = "innerHitPosCut"))]
    pub inner_hit_pos_cut: f64,
    /// Minimum cosine of the transverse pointing angle.
    #[cfg_attr(feature = "serde", serde(rename = "cosThetaXYCut"))]
    pub cos_theta_xy_cut: f64,
    /// Minimum cosine of the 3D pointing angle.
    #[cfg_attr(feature = "serde", serde(rename = "cosThetaXYZCut"))]
    pub cos_theta_xyz_cut: f64,

    /// Half-width of the K-short mass window (GeV).
    #[cfg_attr(feature = "serde", serde(rename = "kShortMassCut"))]
    pub kshort_mass_cut: f64,
    /// Half-width of the Lambda mass window (GeV).
    #[cfg_attr(feature = "serde", serde(rename = "lambdaMassCut"))]
    pub lambda_mass_cut: f64,
    /// Half-width of the D0 mass window (GeV).
    #[cfg_attr(feature = "serde", serde(rename = "D0MassCut"))]
    pub d0_mass_cut: f64,

    /// Fan pair enumeration out over the rayon pool. Output order is unchanged.
    pub parallel: bool,
}

impl Default for V0FitterConfig {
    fn default() -> Self {
        Self {
            use_vertex: false,
            vertex_fitter: true,
            use_ref_tracks: true,
            do_kshorts: true,
            do_lambdas: true,
            do_d0s: false,
            tk_chi2_cut: 10.0,
            tk_nhits_cut: 7,
            tk_pt_cut: 0.35,
            tk_ip_sig_xy_cut: 2.0,
            tk_ip_sig_z_cut: -1.0,
            vtx_chi2_cut: 6.63,
            vtx_decay_sig_xyz_cut: -1.0,
            vtx_decay_sig_xy_cut: 10.0,
            tk_dca_cut: 1.0,
            m_pipi_cut: 0.6,
            inner_hit_pos_cut: 4.0,
            cos_theta_xy_cut: 0.998,
            cos_theta_xyz_cut: -2.0,
            kshort_mass_cut: 0.07,
            lambda_mass_cut: 0.05,
            d0_mass_cut: 0.2,
            parallel: true,
        }
    }
}

impl V0FitterConfig {
    /// Creates a configuration with default cuts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the primary vertex (true) or the beamspot (false) as reference.
    #[must_use]
    pub fn with_use_vertex(mut self, use_vertex: bool) -> Self {
        self.use_vertex = use_vertex;
        self
    }

    /// Selects the vertex fitter.
    #[must_use]
    pub fn with_fitter(mut self, kind: VertexFitterKind) -> Self {
        self.vertex_fitter = kind == VertexFitterKind::Kalman;
        self
    }

    /// Sets whether refitted tracks provide the daughter momenta.
    #[must_use]
    pub fn with_use_ref_tracks(mut self, use_ref_tracks: bool) -> Self {
        self.use_ref_tracks = use_ref_tracks;
        self
    }

    /// Enables or disables the three reconstruction channels.
    #[must_use]
    pub fn with_channels(mut self, kshorts: bool, lambdas: bool, d0s: bool) -> Self {
        self.do_kshorts = kshorts;
        self.do_lambdas = lambdas;
        self.do_d0s = d0s;
        self
    }

    /// Sets whether pairs are processed on the rayon pool.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Fitter selected by `vertex_fitter`.
    #[must_use]
    pub fn fitter_kind(&self) -> VertexFitterKind {
        if self.vertex_fitter {
            VertexFitterKind::Kalman
        } else {
            VertexFitterKind::Adaptive
        }
    }

    /// Whether refitted tracks are actually used; the adaptive fitter never
    /// provides them.
    #[must_use]
    pub fn effective_use_ref_tracks(&self) -> bool {
        self.use_ref_tracks && self.vertex_fitter
    }

    /// Mass-window half-width for a species.
    #[must_use]
    pub fn mass_cut(&self, particle: ParticleId) -> f64 {
        match particle {
            ParticleId::KShort => self.kshort_mass_cut,
            ParticleId::Lambda | ParticleId::AntiLambda => self.lambda_mass_cut,
            ParticleId::D0 | ParticleId::AntiD0 => self.d0_mass_cut,
        }
    }

    /// Checks that every cut is a usable number.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] for NaN or infinite cuts, and for
    /// negative DCA or mass-window cuts.
    pub fn validate(&self) -> Result<()> {
        let cuts = [
            ("tkChi2Cut", self.tk_chi2_cut),
            ("tkPtCut", self.tk_pt_cut),
            ("tkIPSigXYCut", self.tk_ip_sig_xy_cut),
            ("tkIPSigZCut", self.tk_ip_sig_z_cut),
            ("vtxChi2Cut", self.vtx_chi2_cut),
            ("vtxDecaySigXYZCut", self.vtx_decay_sig_xyz_cut),
            ("vtxDecaySigXYCut", self.vtx_decay_sig_xy_cut),
            ("tkDCACut", self.tk_dca_cut),
            ("mPiPiCut", self.m_pipi_cut),
            ("innerHitPosCut", self.inner_hit_pos_cut),
            ("cosThetaXYCut", self.cos_theta_xy_cut),
            ("cosThetaXYZCut", self.cos_theta_xyz_cut),
            ("kShortMassCut", self.kshort_mass_cut),
            ("lambdaMassCut", self.lambda_mass_cut),
            ("D0MassCut", self.d0_mass_cut),
        ];
        if let Some((name, value)) = cuts.iter().find(|(_, value)| !value.is_finite()) {
            return Err(Error::ConfigError(format!("{name} must be finite, got {value}")));
        }
        let non_negative = [
            ("tkDCACut", self.tk_dca_cut),
            ("kShortMassCut", self.kshort_mass_cut),
            ("lambdaMassCut", self.lambda_mass_cut),
            ("D0MassCut", self.d0_mass_cut),
        ];
        if let Some((name, value)) = non_negative.iter().find(|(_, value)| *value < 0.0) {
            return Err(Error::ConfigError(format!("{name} must not be negative, got {value}")));
        }
        Ok(())
    }
}
