//! Compile-set assembly.
//!
//! Flattens the scheme files and both dependency maps into one
//! deduplicated, sorted list of source paths for the build-fragment
//! emitter. Deduplication is by exact path identity; no two distinct
//! paths are ever merged.

use std::collections::BTreeSet;
use std::path::PathBuf;
use stratus_meta::{DependencyMap, SchemeLocationMap};

/// Union of scheme files and all dependency lists, sorted.
pub fn assemble(
    locations: &SchemeLocationMap,
    scheme_dependencies: &DependencyMap,
    host_dependencies: &DependencyMap,
) -> Vec<PathBuf> {
    let mut paths: BTreeSet<PathBuf> = BTreeSet::new();
    paths.extend(locations.values().cloned());
    paths.extend(scheme_dependencies.values().flatten().cloned());
    paths.extend(host_dependencies.values().flatten().cloned());
    paths.into_iter().collect()
}
