//! Naming-convention normalizer for defined-side storage references.
//!
//! Host modules listed in the [`ConventionTable`] declare their variables
//! in the dimension-deferring convention: array dimensions are written as
//! standard names of other variables, and the storage reference lacks its
//! derived-type qualifier. This pass lowers every such record to the
//! direct convention: each symbolic dimension is replaced by the (itself
//! normalized) storage reference of the variable it names, and the
//! configured reference prefix is prepended.
//!
//! Dimension references form a directed graph over standard names. The
//! walk memoizes fully resolved names and tracks the in-progress chain
//! explicitly: revisiting a memoized name short-circuits (which also makes
//! repeated normalization a fixed point), and a chain that re-enters
//! itself is rejected as a cyclic-dimension error instead of recursing
//! unboundedly.

use crate::diag::{Diagnostic, DiagnosticKind};
use std::collections::HashSet;
use stratus_meta::{ConventionTable, VarPool};
use tracing::debug;

/// Splits `foo(:,a,1:n)` into `foo` and `(:,a,1:n)`.
///
/// Scans from the end of the string for the balanced outermost pair of
/// parentheses; returns `None` when the name carries no array reference.
pub fn split_array_reference(local_name: &str) -> Option<(&str, &str)> {
    if !local_name.ends_with(')') {
        return None;
    }
    let mut depth = 0usize;
    for (i, c) in local_name.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&local_name[..i], &local_name[i..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Lowers defined-side records to the direct naming convention.
///
/// The memo of resolved standard names persists across calls, so a pool
/// already normalized by this instance passes through unchanged.
pub struct Normalizer<'a> {
    table: &'a ConventionTable,
    resolved: HashSet<String>,
}

impl<'a> Normalizer<'a> {
    pub fn new(table: &'a ConventionTable) -> Self {
        Self {
            table,
            resolved: HashSet::new(),
        }
    }

    /// Normalizes every record of the defined pool.
    ///
    /// Standard names are visited in lexicographic order so diagnostics
    /// are reproducible across runs. Fails fast on the first error.
    pub fn normalize(&mut self, pool: &mut VarPool) -> Result<(), Vec<Diagnostic>> {
        let mut names: Vec<String> = pool.keys().cloned().collect();
        names.sort_unstable();
        for name in names {
            self.resolve_local_name(pool, &name, &mut Vec::new())
                .map_err(|diag| vec![diag])?;
        }
        Ok(())
    }

    /// Resolves the direct-convention storage reference of one standard
    /// name, updating the pool entry and returning the resolved reference.
    fn resolve_local_name(
        &mut self,
        pool: &mut VarPool,
        standard_name: &str,
        chain: &mut Vec<String>,
    ) -> Result<String, Diagnostic> {
        let Some(records) = pool.get(standard_name) else {
            return Err(Diagnostic::error(
                DiagnosticKind::MissingDefinition,
                format!(
                    "dimension '{}' referenced by '{}' has no defining record",
                    standard_name,
                    chain.last().map(String::as_str).unwrap_or("<root>"),
                ),
            ));
        };
        let var = &records[0];
        let local_name = var.local_name.clone();

        if self.resolved.contains(standard_name) {
            return Ok(local_name);
        }
        if chain.iter().any(|name| name == standard_name) {
            chain.push(standard_name.to_string());
            return Err(Diagnostic::error(
                DiagnosticKind::CyclicDimension,
                format!("dimension reference chain {}", chain.join(" -> ")),
            ));
        }

        let Some(module) = var.container.module_name().map(str::to_string) else {
            return Err(Diagnostic::error(
                DiagnosticKind::MissingModuleSegment,
                format!(
                    "variable '{}' has no module segment: {}",
                    standard_name,
                    var.describe()
                ),
            ));
        };

        // Modules outside the table use the direct convention throughout.
        if !self.table.contains_module(&module) {
            self.resolved.insert(standard_name.to_string());
            return Ok(local_name);
        }

        // Module-level variables key the table by the module name itself.
        let type_name = var
            .container
            .type_name()
            .unwrap_or(module.as_str())
            .to_string();
        let Some(prefix) = self.table.prefix(&module, &type_name).map(str::to_string) else {
            return Err(Diagnostic::error(
                DiagnosticKind::ConfigurationGap,
                format!(
                    "module '{}' uses the deferred-dimension convention, but type '{}' is not configured",
                    module, type_name
                ),
            ));
        };

        chain.push(standard_name.to_string());
        let mut composed = local_name.clone();
        if let Some((var_part, array_reference)) = split_array_reference(&local_name) {
            let interior = array_reference
                .strip_prefix('(')
                .and_then(|s| s.strip_suffix(')'))
                .unwrap_or("");
            let mut indices = Vec::new();
            for index_range in interior.split(',') {
                let index_range = index_range.trim();
                // Full-range dimensions pass through untouched.
                if index_range == ":" {
                    indices.push(index_range.to_string());
                    continue;
                }
                let mut bounds = Vec::new();
                for dimension in index_range.split(':') {
                    let dimension = dimension.trim();
                    if dimension.parse::<i64>().is_ok() {
                        bounds.push(dimension.to_string());
                        continue;
                    }
                    let bound = self.resolve_local_name(pool, dimension, chain)?;
                    debug!(
                        dimension,
                        resolved = bound.as_str(),
                        "lowered symbolic dimension"
                    );
                    bounds.push(bound);
                }
                indices.push(bounds.join(":"));
            }
            composed = format!("{}({})", var_part, indices.join(","));
        }
        chain.pop();

        let direct = if prefix.is_empty() {
            composed
        } else {
            format!("{}%{}", prefix, composed)
        };

        if let Some(records) = pool.get_mut(standard_name) {
            for record in records {
                record.local_name = direct.clone();
            }
        }
        self.resolved.insert(standard_name.to_string());
        Ok(direct)
    }
}
