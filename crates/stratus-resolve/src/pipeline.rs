//! Prebuild pipeline: orchestrates the resolution phases.
//!
//! Phase order: suite pre-check, reachability filtering, framework
//! variable injection, naming-convention normalization of the defined
//! pool, resolution, compile-set assembly, typedef discovery. Every phase
//! returns an explicit outcome and the pipeline aborts at the first
//! failing phase; no partial output survives a failure.

use crate::compile_set;
use crate::diag::Diagnostic;
use crate::engine::{self, Resolution};
use crate::filter::{self, SchemeTables};
use crate::normalize::Normalizer;
use crate::typedefs;
use std::path::PathBuf;
use stratus_meta::{framework, ArgumentMap, ConventionTable, DependencyMap, Suite, VarPool};
use tracing::{debug, info};

/// Everything the resolution core consumes, produced by the table-parsing
/// and suite-loading collaborators.
#[derive(Debug, Clone, Default)]
pub struct PrebuildInput {
    /// Host-side variable definitions.
    pub defined: VarPool,
    /// Host-side extra source files per module.
    pub host_dependencies: DependencyMap,
    /// Scheme-side tables (requests, arguments, dependencies, locations).
    pub schemes: SchemeTables,
    /// Selected execution plans.
    pub suites: Vec<Suite>,
    /// Optional naming-convention table; empty means all modules use the
    /// direct convention.
    pub conventions: ConventionTable,
}

/// Everything the emission collaborators consume.
#[derive(Debug, Clone, Default)]
pub struct PrebuildOutput {
    /// Resolved requested pool plus required host modules and warnings.
    pub resolution: Resolution,
    /// Ordered argument lists of the reachable schemes.
    pub arguments: ArgumentMap,
    /// Deduplicated, sorted list of scheme and dependency source files.
    pub compile_set: Vec<PathBuf>,
    /// Host modules providing derived-type and kind definitions.
    pub typedef_modules: Vec<String>,
}

/// Adds the framework-internal variables to the requested pool.
///
/// Runs after filtering so injected records can never be filtered away.
fn inject_framework_variables(pool: &mut VarPool) {
    for var in framework::mandatory_variables() {
        if !pool.contains_key(&var.standard_name) {
            debug!(
                variable = var.standard_name.as_str(),
                "injecting framework variable"
            );
            pool.insert(var.standard_name.clone(), vec![var]);
        }
    }
}

/// Runs the full resolution pipeline.
pub fn run(input: PrebuildInput) -> Result<PrebuildOutput, Vec<Diagnostic>> {
    let PrebuildInput {
        mut defined,
        host_dependencies,
        schemes,
        suites,
        conventions,
    } = input;

    info!("checking for existence of schemes in suites");
    filter::check_schemes_in_suites(&schemes.arguments, &suites)?;

    info!("filtering metadata against selected suites");
    let mut filtered = filter::filter_reachable(&schemes, &suites);
    inject_framework_variables(&mut filtered.variables);

    info!("normalizing storage references of defined variables");
    Normalizer::new(&conventions).normalize(&mut defined)?;

    info!("comparing metadata for requested and provided variables");
    let resolution = engine::resolve(&defined, filtered.variables)?;

    let compile_set = compile_set::assemble(
        &filtered.locations,
        &filtered.dependencies,
        &host_dependencies,
    );
    let typedef_modules = typedefs::typedef_modules(&defined)?;

    info!(
        variables = resolution.variables.len(),
        modules = resolution.modules.len(),
        files = compile_set.len(),
        "prebuild resolution completed"
    );

    Ok(PrebuildOutput {
        resolution,
        arguments: filtered.arguments,
        compile_set,
        typedef_modules,
    })
}
