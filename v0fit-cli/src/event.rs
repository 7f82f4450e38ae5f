//! JSON event and configuration files.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use v0fit_algorithms::V0Event;
use v0fit_core::{BeamSpot, Track, UniformMagneticField, V0FitterConfig, Vertex};

/// One event as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Longitudinal magnetic field (Tesla).
    pub bz: f64,
    pub beamspot: BeamSpot,
    #[serde(default)]
    pub primary_vertices: Vec<Vertex>,
    pub tracks: Vec<Track>,
}

impl Event {
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn field(&self) -> UniformMagneticField {
        UniformMagneticField::new(self.bz)
    }

    /// Borrows the event as fitter input.
    pub fn as_input<'a>(&'a self, field: &'a UniformMagneticField) -> V0Event<'a> {
        V0Event::new(&self.tracks, &self.beamspot, &self.primary_vertices, field)
    }

    /// Number of positive and negative tracks.
    pub fn charge_counts(&self) -> (usize, usize) {
        let positive = self.tracks.iter().filter(|t| t.charge > 0).count();
        let negative = self.tracks.iter().filter(|t| t.charge < 0).count();
        (positive, negative)
    }
}

/// Reads a configuration file; missing keys keep their defaults.
pub fn load_config(path: &Path) -> Result<V0FitterConfig> {
    let reader = BufReader::new(File::open(path)?);
    let config: V0FitterConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}
