//! Loading description files from disk.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use super::types::RepositoryDescription;

/// Load one description file. The format follows the extension.
pub fn load_description(path: &Path) -> Result<RepositoryDescription> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read description: {}", path.display()))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse description: {}", path.display())),
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("failed to parse description: {}", path.display())),
        _ => bail!(
            "unknown description format: {} (expected .json or .toml)",
            path.display()
        ),
    }
}

/// Expand file paths and glob patterns to the matching files.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let direct = PathBuf::from(pattern);
        if direct.is_file() {
            files.push(direct);
            continue;
        }

        for entry in glob::glob(pattern)
            .with_context(|| format!("invalid input pattern: {}", pattern))?
        {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        files.push(path);
                    }
                }
                Err(e) => {
                    tracing::warn!("glob error: {}", e);
                }
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Load every description matched by `patterns`.
pub fn load_all(patterns: &[String]) -> Result<Vec<RepositoryDescription>> {
    let files = expand_inputs(patterns)?;
    if files.is_empty() {
        bail!("no description files matched: {}", patterns.join(", "));
    }

    files
        .iter()
        .map(|path| {
            tracing::debug!("Loading {}", path.display());
            load_description(path)
        })
        .collect()
}
