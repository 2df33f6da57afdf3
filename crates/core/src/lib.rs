//! Core of the `specgen` OpenAPI to Go client generator.
//!
//! The crate is pure: callers hand in the OpenAPI document text and a
//! [`GeneratorConfig`], and get back the Go sources to write. Fetching the
//! document and persisting the artifacts are left to the caller.
//!
//! ```no_run
//! use specgen_core::{GeneratorConfig, Preset, generate};
//!
//! # fn run(spec_json: &str) -> Result<(), specgen_core::GenerateError> {
//! let artifacts = generate(spec_json, &GeneratorConfig::preset(Preset::Full))?;
//! for artifact in artifacts.iter() {
//!     println!("{}", artifact.path.display());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

pub mod openapi;

pub use openapi::config::{NamingConfig, OutputConfig, Rewrite};
pub use openapi::{
    Artifact, GenerateError, GeneratedArtifacts, GeneratorConfig, PathFilter, Preset,
    SchemaSource, generate,
};
