//! Retrieval of the OpenAPI document.

use std::path::Path;
use tracing::{debug, info};

/// Whether `location` should be fetched over the network.
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Load the document text from an http(s) URL or a local file.
pub async fn load_spec(location: &str) -> Result<String, String> {
    if is_remote(location) {
        fetch_spec(location).await
    } else {
        read_spec(Path::new(location)).await
    }
}

async fn fetch_spec(url: &str) -> Result<String, String> {
    info!(%url, "Fetching OpenAPI spec.");
    let response = reqwest::get(url)
        .await
        .map_err(|err| format!("Failed to fetch spec from {url}: {err}"))?;

    if !response.status().is_success() {
        return Err(format!(
            "Failed to fetch spec from {url}: HTTP {}",
            response.status()
        ));
    }

    let body = response
        .text()
        .await
        .map_err(|err| format!("Failed to read spec response: {err}"))?;
    debug!(spec_len = body.len(), "Fetched OpenAPI spec.");
    Ok(body)
}

async fn read_spec(path: &Path) -> Result<String, String> {
    debug!(path = %path.display(), "Reading OpenAPI spec file.");
    tokio::fs::read_to_string(path)
        .await
        .map_err(|err| format!("Failed to read spec file {}: {err}", path.display()))
}
