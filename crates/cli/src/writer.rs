//! Persisting generated artifacts.

use std::fs;
use std::path::Path;
use tracing::debug;

use specgen_core::{GeneratedArtifacts, GeneratorConfig};

/// Write every artifact under `out_dir`.
///
/// The models directory is removed first so schemas that disappeared from the
/// document do not leave stale files behind. Output paths that are empty,
/// absolute or contain `..` are refused before anything is touched.
pub fn write_artifacts(
    out_dir: &Path,
    config: &GeneratorConfig,
    artifacts: &GeneratedArtifacts,
) -> Result<(), String> {
    config.output.validate().map_err(|err| err.to_string())?;

    let models_dir = out_dir.join(&config.output.models_dir);
    if models_dir.exists() {
        debug!(models_dir = %models_dir.display(), "Clearing existing models directory.");
        fs::remove_dir_all(&models_dir)
            .map_err(|err| format!("Failed to clear models directory: {err}"))?;
    }
    fs::create_dir_all(&models_dir)
        .map_err(|err| format!("Failed to create models directory: {err}"))?;

    for artifact in artifacts.iter() {
        let path = out_dir.join(&artifact.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| format!("Failed to create {}: {err}", parent.display()))?;
        }
        fs::write(&path, &artifact.contents)
            .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
        debug!(path = %path.display(), bytes = artifact.contents.len(), "Wrote artifact.");
    }

    Ok(())
}
