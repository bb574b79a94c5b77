//! Reachability filtering against the selected suites.
//!
//! Only variables requested by a subroutine some suite actually calls, and
//! only schemes some suite actually invokes, take part in resolution and
//! compilation. A standard name stays if any one of its requesting records
//! is reachable; the name then keeps all of its records.

use crate::diag::{Diagnostic, DiagnosticKind};
use std::collections::BTreeSet;
use stratus_meta::{stages, ArgumentMap, DependencyMap, SchemeLocationMap, Suite, VarPool};
use tracing::{debug, info};

/// Scheme-side tables, filtered together since they share the scheme-name
/// keyspace.
#[derive(Debug, Clone, Default)]
pub struct SchemeTables {
    pub variables: VarPool,
    pub arguments: ArgumentMap,
    pub dependencies: DependencyMap,
    pub locations: SchemeLocationMap,
}

/// Verifies every scheme a suite invokes exists in the scheme tables.
///
/// Runs against the unfiltered argument map, and reports every offending
/// (scheme, suite) pair before failing.
pub fn check_schemes_in_suites(
    arguments: &ArgumentMap,
    suites: &[Suite],
) -> Result<(), Vec<Diagnostic>> {
    let mut errors = Vec::new();
    for suite in suites {
        for scheme in suite.schemes_called() {
            if !arguments.contains_key(scheme) {
                errors.push(Diagnostic::error(
                    DiagnosticKind::MissingScheme,
                    format!("scheme '{}' in suite '{}' cannot be found", scheme, suite.name),
                ));
            }
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Filters the scheme tables down to what the suites reach.
pub fn filter_reachable(tables: &SchemeTables, suites: &[Suite]) -> SchemeTables {
    let subroutines_called: BTreeSet<String> = suites
        .iter()
        .flat_map(|suite| suite.subroutines_called())
        .collect();
    let schemes_called: BTreeSet<&str> = suites
        .iter()
        .flat_map(|suite| suite.schemes_called())
        .collect();

    let mut filtered = SchemeTables::default();

    let mut names: Vec<&String> = tables.variables.keys().collect();
    names.sort_unstable();
    for name in names {
        let records = &tables.variables[name];
        let keep = records.iter().any(|var| {
            var.container
                .subroutine()
                .is_some_and(|subroutine| subroutines_called.contains(&stages::abbreviate(subroutine)))
        });
        if keep {
            filtered.variables.insert(name.clone(), records.clone());
        } else {
            info!(variable = name.as_str(), "filtering out unreachable variable");
        }
    }

    for (scheme, arguments) in &tables.arguments {
        if schemes_called.contains(scheme.as_str()) {
            filtered.arguments.insert(scheme.clone(), arguments.clone());
        } else {
            debug!(scheme = scheme.as_str(), "filtering out unreachable scheme");
        }
    }
    for (scheme, dependencies) in &tables.dependencies {
        if schemes_called.contains(scheme.as_str()) {
            filtered
                .dependencies
                .insert(scheme.clone(), dependencies.clone());
        }
    }
    for (scheme, location) in &tables.locations {
        if schemes_called.contains(scheme.as_str()) {
            filtered.locations.insert(scheme.clone(), location.clone());
        }
    }

    filtered
}
