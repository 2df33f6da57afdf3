//! Generator configuration.
//!
//! One generation core serves every document flavor; the differences between
//! them (how schemas are named, which operations are emitted, per-operation
//! fallback types, output layout) live here as data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path};

use super::error::GenerateError;

/// Where named schemas come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaSource {
    /// Every schema node in the document carrying a `$id` (first occurrence wins).
    DeclaredIds,
    /// The `components.schemas` table, keyed by name.
    ComponentTable,
}

/// Which paths are in scope for emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathFilter {
    /// Paths starting with any of these prefixes.
    Prefixes(Vec<String>),
    /// Exactly these paths.
    Exact(Vec<String>),
}

impl PathFilter {
    /// Whether `path` is selected.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathFilter::Prefixes(prefixes) => prefixes.iter().any(|p| path.starts_with(p.as_str())),
            PathFilter::Exact(paths) => paths.iter().any(|p| p == path),
        }
    }
}

/// One ordered regex substitution applied to snake-cased operation ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewrite {
    /// Regex pattern.
    pub pattern: String,
    /// Replacement, `${1}` style group references allowed.
    pub replacement: String,
}

impl Rewrite {
    fn new(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

/// Method naming rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Leading path segment dropped from path-derived method names.
    pub path_prefix: Option<String>,
    /// Substitutions applied, in order, to snake-cased operation ids.
    pub operation_id_rewrites: Vec<Rewrite>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            path_prefix: Some("v1".to_string()),
            operation_id_rewrites: vec![
                Rewrite::new(r"^(get|post|put|patch|delete)_v1_", "${1}_"),
                Rewrite::new(r"_by_project_id", ""),
            ],
        }
    }
}

/// Where and how artifacts are laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory of model files, relative to the output root.
    pub models_dir: String,
    /// Client file, relative to the output root.
    pub client_file: String,
    /// Go package name of the models.
    pub models_package: String,
    /// Go package name of the client.
    pub client_package: String,
    /// Go import path of the models package.
    pub models_import: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            models_dir: "internal/api/models".to_string(),
            client_file: "internal/api/client.go".to_string(),
            models_package: "models".to_string(),
            client_package: "api".to_string(),
            models_import: "github.com/JudgmentLabs/judgeval-go/internal/api/models".to_string(),
        }
    }
}

impl OutputConfig {
    /// Check that artifact locations stay inside the output root.
    ///
    /// The models directory is cleared before writing, so it must be a
    /// non-empty relative path without `..` components; the client file
    /// follows the same rule.
    pub fn validate(&self) -> Result<(), GenerateError> {
        check_relative("models_dir", &self.models_dir)?;
        check_relative("client_file", &self.client_file)
    }
}

fn check_relative(field: &'static str, path: &str) -> Result<(), GenerateError> {
    let invalid = |reason: &'static str| GenerateError::InvalidOutputPath {
        field,
        path: path.to_string(),
        reason,
    };
    if path.trim().is_empty() {
        return Err(invalid("must not be empty"));
    }
    let path_ref = Path::new(path);
    if path_ref.is_absolute() || path.starts_with(['/', '\\']) {
        return Err(invalid("must be relative"));
    }
    for component in path_ref.components() {
        match component {
            Component::ParentDir => return Err(invalid("must not contain '..'")),
            Component::RootDir | Component::Prefix(_) => return Err(invalid("must be relative")),
            Component::CurDir | Component::Normal(_) => {}
        }
    }
    if path_ref.components().all(|c| c == Component::CurDir) {
        return Err(invalid("must not be the output root"));
    }
    Ok(())
}

/// Built-in configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Inline `$id` schemas, `/v1` and `/otel` prefix allowlist.
    Full,
    /// Component table, fixed exact-path allowlist.
    Narrow,
}

/// Complete generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Naming convention of the input document.
    pub schema_source: SchemaSource,
    /// Operations in scope.
    pub path_filter: PathFilter,
    /// `"VERB path"` -> schema name, used when no success schema is declared.
    pub response_overrides: BTreeMap<String, String>,
    /// Method naming rules.
    pub naming: NamingConfig,
    /// Artifact layout.
    pub output: OutputConfig,
    /// Header carrying the organization identifier.
    pub tenant_header: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::preset(Preset::Full)
    }
}

impl GeneratorConfig {
    /// Build one of the built-in configurations.
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Full => Self {
                schema_source: SchemaSource::DeclaredIds,
                path_filter: PathFilter::Prefixes(vec!["/v1".to_string(), "/otel".to_string()]),
                response_overrides: BTreeMap::new(),
                naming: NamingConfig::default(),
                output: OutputConfig::default(),
                tenant_header: "X-Organization-Id".to_string(),
            },
            Preset::Narrow => Self {
                schema_source: SchemaSource::ComponentTable,
                path_filter: PathFilter::Exact(
                    [
                        "/add_to_run_eval_queue/",
                        "/log_eval_results/",
                        "/fetch_experiment_run/",
                        "/scorer_exists/",
                        "/save_scorer/",
                        "/fetch_scorers/",
                        "/projects/resolve/",
                    ]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                ),
                response_overrides: BTreeMap::from([(
                    "POST /add_to_run_eval_queue/".to_string(),
                    "EvalResults".to_string(),
                )]),
                naming: NamingConfig::default(),
                output: OutputConfig {
                    models_import: "github.com/JudgmentLabs/judgeval-go/pkg/internal/api/models"
                        .to_string(),
                    models_dir: "pkg/internal/api/models".to_string(),
                    client_file: "pkg/internal/api/client.go".to_string(),
                    ..OutputConfig::default()
                },
                tenant_header: "X-Organization-Id".to_string(),
            },
        }
    }

    /// Override key for an operation.
    pub fn override_key(method: &str, path: &str) -> String {
        format!("{method} {path}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_filter() {
        let filter = PathFilter::Prefixes(vec!["/v1".into(), "/otel".into()]);
        assert!(filter.matches("/v1/projects"));
        assert!(filter.matches("/otel/v1/traces"));
        assert!(!filter.matches("/health"));
    }

    #[test]
    fn test_exact_filter() {
        let filter = PathFilter::Exact(vec!["/save_scorer/".into()]);
        assert!(filter.matches("/save_scorer/"));
        assert!(!filter.matches("/save_scorer"));
        assert!(!filter.matches("/save_scorer/extra"));
    }

    #[test]
    fn test_narrow_preset_override() {
        let config = GeneratorConfig::preset(Preset::Narrow);
        assert_eq!(config.schema_source, SchemaSource::ComponentTable);
        assert_eq!(
            config
                .response_overrides
                .get(&GeneratorConfig::override_key("POST", "/add_to_run_eval_queue/")),
            Some(&"EvalResults".to_string())
        );
    }

    #[test]
    fn test_default_is_full_preset() {
        assert_eq!(GeneratorConfig::default(), GeneratorConfig::preset(Preset::Full));
    }

    #[test]
    fn test_output_paths_must_stay_inside_root() {
        assert!(OutputConfig::default().validate().is_ok());
        assert!(GeneratorConfig::preset(Preset::Narrow).output.validate().is_ok());

        for (models_dir, reason) in [
            ("", "must not be empty"),
            ("/var/models", "must be relative"),
            ("../models", "must not contain '..'"),
            ("gen/../../models", "must not contain '..'"),
            (".", "must not be the output root"),
        ] {
            let output = OutputConfig {
                models_dir: models_dir.to_string(),
                ..OutputConfig::default()
            };
            match output.validate() {
                Err(GenerateError::InvalidOutputPath { field, reason: got, .. }) => {
                    assert_eq!(field, "models_dir");
                    assert_eq!(got, reason, "{models_dir:?}");
                }
                other => panic!("{models_dir:?} accepted: {other:?}"),
            }
        }

        let output = OutputConfig {
            client_file: "../client.go".to_string(),
            ..OutputConfig::default()
        };
        assert!(matches!(
            output.validate(),
            Err(GenerateError::InvalidOutputPath { field: "client_file", .. })
        ));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: GeneratorConfig = serde_json::from_str(
            r#"{"schema_source": "component_table", "path_filter": {"exact": ["/a/"]}}"#,
        )
        .unwrap();
        assert_eq!(config.schema_source, SchemaSource::ComponentTable);
        assert_eq!(config.path_filter, PathFilter::Exact(vec!["/a/".into()]));
        assert_eq!(config.tenant_header, "X-Organization-Id");
        assert_eq!(config.naming.operation_id_rewrites.len(), 2);
    }
}
