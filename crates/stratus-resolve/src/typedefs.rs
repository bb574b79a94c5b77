//! Typedef module discovery.
//!
//! The generated glue code needs the host Fortran modules that define
//! derived types and kind constants. A defined record describes a derived
//! type when its type is not one of the standard types and equals its own
//! standard name; it describes a kind constant when its standard name
//! starts with `kind_`, its type is `integer`, and its units are `none`.

use crate::diag::{Diagnostic, DiagnosticKind};
use stratus_meta::VarPool;

const STANDARD_TYPES: &[&str] = &["character", "integer", "logical", "real"];

const KIND_PREFIX: &str = "kind_";

/// Collects `<module>.mod` names (lowercase, sorted) for every derived
/// type and kind definition in the defined pool.
pub fn typedef_modules(defined: &VarPool) -> Result<Vec<String>, Vec<Diagnostic>> {
    let mut errors = Vec::new();
    let mut modules = Vec::new();

    let mut names: Vec<&String> = defined.keys().collect();
    names.sort_unstable();
    for name in names {
        let var = &defined[name][0];
        let is_derived_type =
            !STANDARD_TYPES.contains(&var.ty.as_str()) && var.ty == var.standard_name;
        let is_kind = var.standard_name.starts_with(KIND_PREFIX)
            && var.ty == "integer"
            && var.units == "none";
        if !is_derived_type && !is_kind {
            continue;
        }
        let Some(module) = var.container.module_name() else {
            errors.push(Diagnostic::error(
                DiagnosticKind::MissingModuleSegment,
                format!(
                    "invalid {} definition for '{}': {}",
                    if is_derived_type { "type" } else { "kind" },
                    var.standard_name,
                    var.describe()
                ),
            ));
            continue;
        };
        let module_file = format!("{}.mod", module.to_lowercase());
        if !modules.contains(&module_file) {
            modules.push(module_file);
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    modules.sort_unstable();
    Ok(modules)
}
