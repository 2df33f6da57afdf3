//! Go client emitter for OpenAPI specifications.
//!
//! This module is a thin wrapper around the IR-based code generation.
//! The pipeline is:
//! 1. Parse: OpenAPI JSON -> OpenApiSpec
//! 2. Normalize: OpenApiSpec -> ApiIR (schema resolution and operation extraction)
//! 3. Codegen: ApiIR -> GoFile per artifact (Go AST)
//! 4. Emit: GoFile -> String (via Emit trait)

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::openapi::config::GeneratorConfig;
use crate::openapi::error::GenerateError;
use crate::openapi::ir::{Emit, codegen_client, codegen_models, normalize_spec};
use crate::openapi::spec::OpenApiSpec;

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the output root.
    pub path: PathBuf,
    /// File contents.
    pub contents: String,
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct GeneratedArtifacts {
    /// Model files, in type name order.
    pub models: Vec<Artifact>,
    /// The client file.
    pub client: Artifact,
    /// Number of client methods.
    pub method_count: usize,
}

impl GeneratedArtifacts {
    /// All artifacts, models first.
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.models.iter().chain(std::iter::once(&self.client))
    }
}

/// Generate Go models and client from an OpenAPI JSON string.
pub fn generate(
    openapi_json: &str,
    config: &GeneratorConfig,
) -> Result<GeneratedArtifacts, GenerateError> {
    config.output.validate()?;

    // Parse OpenAPI spec
    let spec = OpenApiSpec::from_json(openapi_json)?;
    debug!(paths = spec.paths.len(), "Parsed OpenAPI spec");

    // Normalize to API IR (all OpenAPI logic resolved here)
    let api_ir = normalize_spec(&spec, config)?;

    // Generate Go AST and emit to strings
    let models_dir = Path::new(&config.output.models_dir);
    let models = codegen_models(&api_ir, config)
        .into_iter()
        .map(|(file_name, file)| Artifact {
            path: models_dir.join(file_name),
            contents: file.emit(),
        })
        .collect::<Vec<_>>();
    let client = Artifact {
        path: PathBuf::from(&config.output.client_file),
        contents: codegen_client(&api_ir, config).emit(),
    };

    info!(
        models = models.len(),
        methods = api_ir.operations.len(),
        "Generated Go client"
    );

    Ok(GeneratedArtifacts {
        models,
        client,
        method_count: api_ir.operations.len(),
    })
}
