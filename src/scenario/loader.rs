//! Scenario file discovery and parsing
//!
//! Every folder is searched (non-recursively) for `*.yaml` files, then `*.yml`
//! files, each group in name order. A file holds a `tests:` list; scenarios keep
//! their file order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::model::Scenario;
use crate::config::read_limited;
use crate::errors::ScenaristError;

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    tests: Vec<Scenario>,
}

/// List scenario files in `folders`, skipping `exclude` (usually the config file)
pub fn discover_files(
    folders: &[PathBuf],
    exclude: Option<&Path>,
) -> Result<Vec<PathBuf>, ScenaristError> {
    let excluded = exclude.and_then(|p| p.canonicalize().ok());
    let mut files = Vec::new();

    for folder in folders {
        let entries = std::fs::read_dir(folder).map_err(|e| {
            ScenaristError::Load(format!("Failed to read folder {}: {}", folder.display(), e))
        })?;

        let mut yaml = Vec::new();
        let mut yml = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            match path.extension().and_then(|e| e.to_str()) {
                Some("yaml") => yaml.push(path),
                Some("yml") => yml.push(path),
                _ => {}
            }
        }
        yaml.sort();
        yml.sort();

        for path in yaml.into_iter().chain(yml) {
            if excluded.is_some() && path.canonicalize().ok() == excluded {
                debug!(file = %path.display(), "Skipping config file");
                continue;
            }
            files.push(path);
        }
    }

    Ok(files)
}

/// Parse one scenario file
pub fn load_file(path: &Path) -> Result<Vec<Scenario>, ScenaristError> {
    let content = read_limited(path).map_err(|e| {
        ScenaristError::Load(format!("Failed to read scenario file {}: {}", path.display(), e))
    })?;

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let file: ScenarioFile = serde_yaml::from_str(&content).map_err(|e| {
        ScenaristError::Load(format!("Failed to parse scenario file {}: {}", path.display(), e))
    })?;

    Ok(file.tests)
}

/// Load every scenario from `folders` in load order
///
/// Rejects unnamed scenarios and duplicate names. Dependency checks are left to
/// the resolver.
pub fn load_scenarios(
    folders: &[PathBuf],
    exclude: Option<&Path>,
) -> Result<Vec<Scenario>, ScenaristError> {
    let mut scenarios = Vec::new();
    let mut origins: HashMap<String, PathBuf> = HashMap::new();

    for path in discover_files(folders, exclude)? {
        let loaded = load_file(&path)?;
        debug!(file = %path.display(), count = loaded.len(), "Loaded scenario file");

        for scenario in loaded {
            if scenario.name.trim().is_empty() {
                return Err(ScenaristError::Load(format!(
                    "Scenario without a name in {}",
                    path.display()
                )));
            }
            if let Some(first) = origins.get(&scenario.name) {
                return Err(ScenaristError::Load(format!(
                    "Duplicate scenario name '{}' in {} (first defined in {})",
                    scenario.name,
                    path.display(),
                    first.display()
                )));
            }
            origins.insert(scenario.name.clone(), path.clone());
            scenarios.push(scenario);
        }
    }

    Ok(scenarios)
}
