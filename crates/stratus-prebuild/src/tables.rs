//! Structured table loading.
//!
//! The raw metadata tables are parsed out of the host and scheme sources
//! by an external tool; this module loads its structured JSON output and
//! merges the per-file pools. Paths are threaded explicitly; nothing here
//! depends on the process working directory.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use stratus_meta::{DependencyMap, Var, VarPool};
use stratus_resolve::SchemeTables;
use tracing::info;

/// One host-side variable table file.
#[derive(Debug, Deserialize)]
struct VariableTableFile {
    variables: Vec<Var>,
    /// Module name -> extra source files required by that module.
    #[serde(default)]
    dependencies: IndexMap<String, Vec<PathBuf>>,
}

/// One scheme entry within a scheme table file.
#[derive(Debug, Deserialize)]
struct SchemeEntry {
    name: String,
    #[serde(default)]
    arguments: Vec<String>,
    #[serde(default)]
    dependencies: Vec<PathBuf>,
}

/// One scheme-side table file, describing one scheme source file.
#[derive(Debug, Deserialize)]
struct SchemeTableFile {
    /// The scheme source file the table was extracted from.
    source: PathBuf,
    variables: Vec<Var>,
    schemes: Vec<SchemeEntry>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Merges `incoming` into `pool`.
///
/// All records of one standard name are mutually compatible, so only the
/// first record on each side is tested; incompatible duplicates across
/// files are fatal.
pub fn merge_pools(pool: &mut VarPool, incoming: VarPool) -> Result<()> {
    for (standard_name, records) in incoming {
        match pool.get_mut(&standard_name) {
            Some(existing) => {
                if !existing[0].compatible(&records[0]) {
                    return Err(Error::IncompatibleTables {
                        standard_name,
                        first: existing[0].describe(),
                        second: records[0].describe(),
                    });
                }
                existing.extend(records);
            }
            None => {
                pool.insert(standard_name, records);
            }
        }
    }
    Ok(())
}

fn pool_of(variables: Vec<Var>) -> VarPool {
    let mut pool = VarPool::new();
    for var in variables {
        pool.entry(var.standard_name.clone()).or_default().push(var);
    }
    pool
}

/// Loads and merges the host-side variable definition tables.
pub fn load_variable_tables(files: &[PathBuf]) -> Result<(VarPool, DependencyMap)> {
    info!("loading metadata tables for variables provided by the host model");
    let mut defined = VarPool::new();
    let mut dependencies = DependencyMap::new();
    for file in files {
        let table: VariableTableFile = read_json(file)?;
        merge_pools(&mut defined, pool_of(table.variables))?;
        for (module, paths) in table.dependencies {
            dependencies.entry(module).or_default().extend(paths);
        }
    }
    Ok((defined, dependencies))
}

/// Loads and merges the scheme-side tables.
pub fn load_scheme_tables(files: &[PathBuf]) -> Result<SchemeTables> {
    info!("loading metadata tables in physics scheme files");
    let mut tables = SchemeTables::default();
    for file in files {
        let table: SchemeTableFile = read_json(file)?;
        merge_pools(&mut tables.variables, pool_of(table.variables))?;
        for scheme in table.schemes {
            tables
                .locations
                .insert(scheme.name.clone(), table.source.clone());
            tables
                .dependencies
                .insert(scheme.name.clone(), scheme.dependencies);
            tables.arguments.insert(scheme.name, scheme.arguments);
        }
    }
    Ok(tables)
}
