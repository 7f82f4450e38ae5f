//! v0fit-core: Core types for two-track V0 reconstruction.
//!
//! This crate provides the event data model consumed and produced by the
//! V0 finder: reconstructed tracks, the beamspot, primary vertices, the
//! magnetic-field accessor, Lorentz vectors and composite candidates.
//!
//! Units are centimetres for lengths, GeV for energies and momenta and
//! Tesla for the magnetic field.
//!

pub mod beamspot;
pub mod candidate;
pub mod config;
pub mod error;
pub mod field;
pub mod geometry;
pub mod kinematics;
pub mod pdg;
pub mod track;
pub mod vertex;

pub use beamspot::BeamSpot;
pub use candidate::{RecoChargedCandidate, V0Collections, VertexCompositeCandidate};
pub use config::{V0FitterConfig, VertexFitterKind};
pub use error::{Error, Result};
pub use field::{MagneticField, UniformMagneticField};
pub use geometry::{Covariance3, Point3, Vector3};
pub use kinematics::LorentzVector;
pub use pdg::ParticleId;
pub use track::Track;
pub use vertex::Vertex;
