//! OpenAPI to Go client generator.
//!
//! This module parses OpenAPI 3.x documents and generates Go code with:
//! - One model file per schema reachable from the emitted operations
//! - A client with one method per in-scope operation

pub mod config;
mod emitter;
pub mod error;
pub mod ir;
pub mod spec;

pub use config::{GeneratorConfig, PathFilter, Preset, SchemaSource};
pub use emitter::{Artifact, GeneratedArtifacts, generate};
pub use error::GenerateError;
