//! `specgen generate`: fetch, generate, write.

use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::debug;

use specgen_core::{GeneratorConfig, Preset, generate};

use crate::cli::run_cli_async;
use crate::source::load_spec;
use crate::writer::write_artifacts;

/// Where the producing service serves its document during local development.
pub const DEFAULT_SPEC_LOCATION: &str = "http://localhost:10001/openapi/json";

/// Built-in generator configuration to start from.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetArg {
    /// Inline `$id` schemas, `/v1` and `/otel` paths
    Full,
    /// Component table, fixed list of exact paths
    Narrow,
}

impl From<PresetArg> for Preset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Full => Preset::Full,
            PresetArg::Narrow => Preset::Narrow,
        }
    }
}

/// Arguments of `specgen generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// OpenAPI document: an http(s) URL or a local file path
    #[arg(value_name = "SPEC", default_value = DEFAULT_SPEC_LOCATION)]
    pub spec: String,
    /// Directory the artifact paths are resolved against
    #[arg(long = "out-dir", value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,
    /// Built-in configuration
    #[arg(long, value_enum, default_value_t = PresetArg::Full)]
    pub preset: PresetArg,
    /// TOML generator configuration; replaces the preset
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Run the subcommand and return its exit code.
pub async fn run(args: GenerateArgs) -> i32 {
    run_cli_async(|| run_inner(args)).await
}

async fn run_inner(args: GenerateArgs) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => load_config(path).await?,
        None => GeneratorConfig::preset(args.preset.into()),
    };
    debug!(schema_source = ?config.schema_source, "Resolved generator configuration.");

    let spec_json = load_spec(&args.spec).await?;
    let artifacts = generate(&spec_json, &config)
        .map_err(|err| format!("Failed to generate client: {err}"))?;

    write_artifacts(&args.out_dir, &config, &artifacts)?;

    println!(
        "generated {} models and client with {} methods",
        artifacts.models.len(),
        artifacts.method_count
    );
    Ok(())
}

/// Read a TOML generator configuration. Missing keys take the `full` preset's values.
///
/// Output paths that would leave the output directory are rejected.
pub async fn load_config(path: &Path) -> Result<GeneratorConfig, String> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| format!("Failed to read config file {}: {err}", path.display()))?;
    let config: GeneratorConfig = toml::from_str(&contents)
        .map_err(|err| format!("Failed to parse config file {}: {err}", path.display()))?;
    config
        .output
        .validate()
        .map_err(|err| format!("Invalid config file {}: {err}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use specgen_core::{PathFilter, SchemaSource};

    #[tokio::test]
    async fn test_load_config_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("specgen.toml");
        std::fs::write(
            &path,
            r#"
schema_source = "component_table"
tenant_header = "X-Tenant"

[path_filter]
exact = ["/save_scorer/"]

[response_overrides]
"POST /save_scorer/" = "SaveResult"

[output]
models_dir = "gen/models"
"#,
        )
        .unwrap();

        let config = load_config(&path).await.unwrap();
        assert_eq!(config.schema_source, SchemaSource::ComponentTable);
        assert_eq!(config.path_filter, PathFilter::Exact(vec!["/save_scorer/".into()]));
        assert_eq!(config.tenant_header, "X-Tenant");
        assert_eq!(config.output.models_dir, "gen/models");
        assert_eq!(config.output.client_file, "internal/api/client.go");
        assert_eq!(
            config.response_overrides.get("POST /save_scorer/"),
            Some(&"SaveResult".to_string())
        );
    }

    #[tokio::test]
    async fn test_load_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "schema_source = 3").unwrap();

        let err = load_config(&path).await.unwrap_err();
        assert!(err.starts_with("Failed to parse config file"), "{err}");
        assert!(err.contains("broken.toml"), "{err}");
    }

    #[tokio::test]
    async fn test_load_config_rejects_escaping_models_dir() {
        let dir = tempfile::tempdir().unwrap();
        for models_dir in ["", "/tmp/models", "../models", "gen/../../models"] {
            let path = dir.path().join("specgen.toml");
            std::fs::write(&path, format!("[output]\nmodels_dir = {models_dir:?}\n")).unwrap();

            let err = load_config(&path).await.unwrap_err();
            assert!(err.starts_with("Invalid config file"), "{models_dir:?}: {err}");
            assert!(err.contains("models_dir"), "{err}");
        }
    }
}
