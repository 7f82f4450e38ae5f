//! Deterministic-annealing vertex fit with soft track weights.

use super::{linearize, seed, solve, TransientVertex, VertexFitter};
use crate::error::FitError;
use crate::transient::TransientTrack;
use v0fit_core::Vertex;

/// Adaptive vertex fitter.
///
/// Each track gets a weight
///
/// ```text
/// w = 1 / (1 + exp((χ² − χ²cut) / 2T))
/// ```
///
/// recomputed at every iteration while the temperature `T` is lowered
/// through the annealing schedule. Tracks far from the vertex fade out
/// instead of pulling it. No refitted tracks are produced.
#[derive(Debug, Clone)]
pub struct AdaptiveVertexFitter {
    temperatures: Vec<f64>,
    chi2_cut: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl Default for AdaptiveVertexFitter {
    fn default() -> Self {
        Self {
            temperatures: vec![256.0, 64.0, 16.0, 4.0, 1.0],
            chi2_cut: 9.0,
            max_iterations: 10,
            tolerance: 1e-4,
        }
    }
}

impl AdaptiveVertexFitter {
    /// Creates a fitter with the standard annealing schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chi-square at which a track weight drops to one half.
    #[must_use]
    pub fn with_chi2_cut(mut self, chi2_cut: f64) -> Self {
        self.chi2_cut = chi2_cut;
        self
    }

    /// Sets the annealing schedule; the last entry is the final temperature.
    #[must_use]
    pub fn with_temperatures(mut self, temperatures: Vec<f64>) -> Self {
        self.temperatures = temperatures;
        self
    }

    fn weight(&self, chi2: f64, temperature: f64) -> f64 {
        1.0 / (1.0 + ((chi2 - self.chi2_cut) / (2.0 * temperature)).exp())
    }
}

impl VertexFitter for AdaptiveVertexFitter {
    fn name(&self) -> &'static str {
        "Adaptive"
    }

    fn vertex(&self, tracks: &[TransientTrack]) -> Result<TransientVertex, FitError> {
        if tracks.len() < 2 {
            return Err(FitError::TooFewTracks(tracks.len()));
        }
        let final_temperature = self.temperatures.last().copied().unwrap_or(1.0);
        let mut position = seed(tracks);

        for &temperature in &self.temperatures {
            for _ in 0..self.max_iterations {
                let linearized = linearize(tracks, &position)?;
                let weights: Vec<f64> = linearized
                    .iter()
                    .map(|t| self.weight(t.chi2(&position), temperature))
                    .collect();
                let (next, _) = solve(&linearized, &weights)?;
                let shift = (next - position).norm();
                position = next;
                if shift < self.tolerance {
                    break;
                }
            }
        }

        let linearized = linearize(tracks, &position)?;
        let weights: Vec<f64> = linearized
            .iter()
            .map(|t| self.weight(t.chi2(&position), final_temperature))
            .collect();
        let (position, covariance) = solve(&linearized, &weights)?;
        let chi2 = linearized
            .iter()
            .zip(&weights)
            .map(|(t, w)| w * t.chi2(&position))
            .sum();
        let ndof = 2.0 * weights.iter().sum::<f64>() - 3.0;
        if ndof <= 0.0 {
            return Err(FitError::Degenerate { ndof });
        }

        log::trace!("adaptive fit weights {weights:?}, chi2 = {chi2:.3}, ndof = {ndof:.3}");
        Ok(TransientVertex {
            vertex: Vertex::new(position, covariance, chi2, ndof),
            weights,
            refitted_tracks: Vec::new(),
        })
    }
}
