//! Design document loading.

use std::path::Path;

use eyre::{Context, Result, bail};
use trestle_design::ApiDefinition;

/// Load a raw API description from a JSON or TOML design document.
pub fn load_design(path: &Path) -> Result<ApiDefinition> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read '{}'", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .wrap_err_with(|| format!("failed to parse '{}'", path.display())),
        Some("toml") => toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse '{}'", path.display())),
        _ => bail!(
            "unsupported design document '{}' (expected a .json or .toml file)",
            path.display()
        ),
    }
}
