//! Prebuild configuration.
//!
//! The configuration file is host-model specific JSON naming the variable
//! and scheme table files, the suites directory, and the output fragment
//! paths. Output paths may embed a `{build_dir}` placeholder which is
//! substituted from the command line or the config's own default.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use stratus_meta::ConventionTable;

const BUILD_DIR_PLACEHOLDER: &str = "{build_dir}";

/// Paths of one emitted fragment family (schemes or typedefs).
#[derive(Debug, Clone, Deserialize)]
pub struct FragmentPaths {
    pub makefile: String,
    pub cmakefile: String,
    pub sourcefile: String,
}

impl FragmentPaths {
    fn substituted(&self, build_dir: &str) -> ResolvedFragmentPaths {
        let expand = |path: &str| PathBuf::from(path.replace(BUILD_DIR_PLACEHOLDER, build_dir));
        ResolvedFragmentPaths {
            makefile: expand(&self.makefile),
            cmakefile: expand(&self.cmakefile),
            sourcefile: expand(&self.sourcefile),
        }
    }
}

/// Fragment paths after placeholder substitution.
#[derive(Debug, Clone)]
pub struct ResolvedFragmentPaths {
    pub makefile: PathBuf,
    pub cmakefile: PathBuf,
    pub sourcefile: PathBuf,
}

impl ResolvedFragmentPaths {
    pub fn all(&self) -> [&Path; 3] {
        [&self.makefile, &self.cmakefile, &self.sourcefile]
    }
}

/// Raw configuration as read from disk.
#[derive(Debug, Clone, Deserialize)]
struct RawConfig {
    host_model: String,
    variable_table_files: Vec<PathBuf>,
    scheme_table_files: Vec<PathBuf>,
    suites_dir: PathBuf,
    #[serde(default)]
    build_dir: Option<String>,
    schemes: FragmentPaths,
    typedefs: FragmentPaths,
    #[serde(default)]
    conventions: Option<ConventionTable>,
}

/// Validated configuration with all placeholders substituted.
#[derive(Debug, Clone)]
pub struct Config {
    pub host_model: String,
    pub variable_table_files: Vec<PathBuf>,
    pub scheme_table_files: Vec<PathBuf>,
    pub suites_dir: PathBuf,
    pub schemes: ResolvedFragmentPaths,
    pub typedefs: ResolvedFragmentPaths,
    pub conventions: ConventionTable,
}

impl Config {
    /// Loads the configuration, substituting `{build_dir}`.
    ///
    /// `builddir` from the command line wins over the config's default;
    /// having neither while output paths use the placeholder is an error.
    pub fn load(path: &Path, builddir: Option<&str>) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|_| Error::Config(format!("configuration file {} not found", path.display())))?;
        let raw: RawConfig = serde_json::from_str(&text).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let build_dir = match (builddir, raw.build_dir.as_deref()) {
            (Some(dir), _) => dir.to_string(),
            (None, Some(dir)) => {
                tracing::info!(
                    build_dir = dir,
                    "build directory not specified on command line, using config default"
                );
                dir.to_string()
            }
            (None, None) => {
                let uses_placeholder = [&raw.schemes, &raw.typedefs].iter().any(|paths| {
                    [&paths.makefile, &paths.cmakefile, &paths.sourcefile]
                        .iter()
                        .any(|p| p.contains(BUILD_DIR_PLACEHOLDER))
                });
                if uses_placeholder {
                    return Err(Error::Config(
                        "output paths use {build_dir} but no build directory is configured"
                            .to_string(),
                    ));
                }
                String::new()
            }
        };

        Ok(Config {
            host_model: raw.host_model,
            variable_table_files: raw.variable_table_files,
            scheme_table_files: raw.scheme_table_files,
            suites_dir: raw.suites_dir,
            schemes: raw.schemes.substituted(&build_dir),
            typedefs: raw.typedefs.substituted(&build_dir),
            conventions: raw.conventions.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn config_json() -> String {
        r#"{
            "host_model": "maritime",
            "variable_table_files": ["host/host_data.json"],
            "scheme_table_files": ["physics/sea_spray.json"],
            "suites_dir": "suites",
            "build_dir": "build",
            "schemes": {
                "makefile": "{build_dir}/STRATUS_SCHEMES.mk",
                "cmakefile": "{build_dir}/STRATUS_SCHEMES.cmake",
                "sourcefile": "{build_dir}/STRATUS_SCHEMES.sh"
            },
            "typedefs": {
                "makefile": "{build_dir}/STRATUS_TYPEDEFS.mk",
                "cmakefile": "{build_dir}/STRATUS_TYPEDEFS.cmake",
                "sourcefile": "{build_dir}/STRATUS_TYPEDEFS.sh"
            }
        }"#
        .to_string()
    }

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("prebuild_config.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_build_dir_from_config_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, &config_json());
        let config = Config::load(&path, None).unwrap();
        assert_eq!(config.schemes.makefile, PathBuf::from("build/STRATUS_SCHEMES.mk"));
    }

    #[test]
    fn test_command_line_build_dir_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, &config_json());
        let config = Config::load(&path, Some("out/release")).unwrap();
        assert_eq!(
            config.typedefs.sourcefile,
            PathBuf::from("out/release/STRATUS_TYPEDEFS.sh")
        );
    }

    #[test]
    fn test_missing_build_dir_with_placeholder_fails() {
        let dir = tempfile::tempdir().unwrap();
        let contents = config_json().replace("\"build_dir\": \"build\",", "");
        let path = write_config(&dir, &contents);
        let err = Config::load(&path, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::load(Path::new("/nonexistent/prebuild.json"), None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
