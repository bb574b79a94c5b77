//! Suite definition loading and discovery.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use stratus_meta::Suite;
use tracing::{info, warn};

const SUITE_EXTENSION: &str = "json";

/// Collects the names of every suite definition file in `suites_dir`.
///
/// Used when no suites are selected on the command line.
pub fn discover_suites(suites_dir: &Path) -> Result<Vec<String>> {
    info!("no suites were given, compiling a list of all suites");
    let mut names = Vec::new();
    for entry in fs::read_dir(suites_dir)? {
        let path = entry?.path();
        let is_suite = path
            .extension()
            .is_some_and(|ext| ext == SUITE_EXTENSION);
        if is_suite {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                info!(suite = stem, "adding suite definition file");
                names.push(stem.to_string());
            }
        }
    }
    if names.is_empty() {
        return Err(Error::NoSuites(suites_dir.to_path_buf()));
    }
    names.sort_unstable();
    Ok(names)
}

/// Loads the named suite definition files.
///
/// Falls back to the legacy `suite_<name>` filename convention before
/// giving up on a missing suite.
pub fn load_suites(suites_dir: &Path, names: &[String]) -> Result<Vec<Suite>> {
    let mut suites = Vec::new();
    for name in names {
        let mut path = suites_dir.join(format!("{name}.{SUITE_EXTENSION}"));
        if !path.exists() {
            let legacy = suites_dir.join(format!("suite_{name}.{SUITE_EXTENSION}"));
            if legacy.exists() {
                warn!(
                    file = %legacy.display(),
                    "parsing suite definition file using legacy naming convention"
                );
                path = legacy;
            } else {
                return Err(Error::SuiteNotFound(path));
            }
        }
        info!(file = %path.display(), "parsing suite definition file");
        let text = fs::read_to_string(&path)?;
        let suite: Suite = serde_json::from_str(&text).map_err(|source| Error::Json {
            path: path.clone(),
            source,
        })?;
        suites.push(suite);
    }
    Ok(suites)
}
