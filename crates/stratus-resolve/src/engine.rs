//! Resolution engine: binds requested variables to host definitions.
//!
//! For every standard name in the filtered requested pool the engine finds
//! the unique compatible defining record, registers per-intent unit
//! conversions, checks conditional-allocation consistency, computes the
//! storage target, and propagates concrete character lengths. Standard
//! names are processed in lexicographic order so diagnostics and the
//! required-module list are reproducible across runs.

use crate::diag::{Diagnostic, DiagnosticKind};
use crate::units;
use stratus_meta::{Intent, SegmentKind, Var, VarPool, CHARACTER_TYPE};
use tracing::{debug, warn};

/// Result of a successful resolution.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// The requested pool with targets, conversions, and concrete
    /// character lengths filled in.
    pub variables: VarPool,
    /// Host modules the generated code must use, deduplicated and sorted.
    pub modules: Vec<String>,
    /// Non-fatal diagnostics (allocation mismatches).
    pub warnings: Vec<Diagnostic>,
}

fn requested_by(records: &[Var]) -> String {
    records
        .iter()
        .map(|var| var.container.to_string())
        .collect::<Vec<_>>()
        .join(" & ")
}

/// Resolves the requested pool against the defined pool.
pub fn resolve(defined: &VarPool, requested: VarPool) -> Result<Resolution, Vec<Diagnostic>> {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut modules = Vec::new();
    let mut variables = VarPool::new();

    let mut names: Vec<String> = requested.keys().cloned().collect();
    names.sort_unstable();

    let mut requested = requested;
    for name in names {
        let Some(mut records) = requested.shift_remove(&name) else {
            continue;
        };

        // Existence
        let Some(definitions) = defined.get(&name) else {
            errors.push(Diagnostic::error(
                DiagnosticKind::MissingDefinition,
                format!(
                    "variable '{}' requested by {} not provided by the model",
                    name,
                    requested_by(&records)
                ),
            ));
            continue;
        };

        // Uniqueness
        if definitions.len() > 1 {
            let provided_by = requested_by(definitions);
            errors.push(Diagnostic::error(
                DiagnosticKind::AmbiguousDefinition,
                format!(
                    "variable '{}' requested by {} cannot be identified unambiguously; multiple definitions in {}",
                    name,
                    requested_by(&records),
                    provided_by
                ),
            ));
            continue;
        }
        let definition = &definitions[0];

        // Compatibility. All requesting records of one name are mutually
        // compatible (enforced when the tables were merged), so testing
        // the first against the unique definition suffices.
        if !records[0].compatible(definition) {
            errors.push(Diagnostic::error(
                DiagnosticKind::IncompatibleAttributes,
                format!(
                    "incompatible entries in metadata for variable '{}':\n    provided:  {}\n    requested: {}",
                    name,
                    definition.describe(),
                    records[0].describe()
                ),
            ));
            continue;
        }

        // Unit reconciliation, independently per requesting record.
        let mut units_ok = true;
        for var in &mut records {
            if var.units == definition.units {
                continue;
            }
            debug!(
                variable = name.as_str(),
                container = %var.container,
                from = var.units.as_str(),
                to = definition.units.as_str(),
                "registering unit conversion"
            );
            let needs_incoming = matches!(var.intent, Intent::In | Intent::InOut);
            let needs_outgoing = matches!(var.intent, Intent::Out | Intent::InOut);
            let incoming = needs_incoming
                .then(|| units::conversion(&var.units, &definition.units))
                .flatten();
            let outgoing = needs_outgoing
                .then(|| units::conversion(&definition.units, &var.units))
                .flatten();
            if (needs_incoming && incoming.is_none()) || (needs_outgoing && outgoing.is_none()) {
                errors.push(Diagnostic::error(
                    DiagnosticKind::UnknownUnit,
                    format!(
                        "no conversion between units '{}' and '{}' for variable '{}' in {}",
                        var.units, definition.units, name, var.container
                    ),
                ));
                units_ok = false;
                continue;
            }
            var.conversions.incoming = incoming;
            var.conversions.outgoing = outgoing;
        }
        if !units_ok {
            continue;
        }

        // Conditional-allocation consistency. Both directions are
        // deliberately warnings, not failures.
        if !definition.unconditional() {
            for var in &records {
                if !var.optional {
                    let diag = Diagnostic::warning(
                        DiagnosticKind::AllocationMismatch,
                        format!(
                            "conditionally allocated host-model variable '{}' is not optional in {}",
                            name, var.container
                        ),
                    );
                    warn!("{}", diag);
                    warnings.push(diag);
                }
            }
        } else {
            for var in &records {
                if var.optional {
                    let diag = Diagnostic::warning(
                        DiagnosticKind::AllocationMismatch,
                        format!(
                            "unconditionally allocated host-model variable '{}' is optional in {}",
                            name, var.container
                        ),
                    );
                    warn!("{}", diag);
                    warnings.push(diag);
                }
            }
        }

        // Target and required modules from the defining container.
        let mut container_ok = true;
        for segment in definition.container.segments() {
            match segment.kind {
                SegmentKind::Module => modules.push(segment.name.clone()),
                SegmentKind::Type => {}
                other => {
                    errors.push(Diagnostic::error(
                        DiagnosticKind::UnknownSegmentKind,
                        format!(
                            "unknown identifier '{}' in container of defined variable '{}'",
                            other.token(),
                            name
                        ),
                    ));
                    container_ok = false;
                }
            }
        }
        if !container_ok {
            continue;
        }
        let target = definition.local_name.clone();

        for var in &mut records {
            var.target = Some(target.clone());
            debug!(
                variable = name.as_str(),
                container = %var.container,
                target = target.as_str(),
                "matched requested variable to target"
            );
            // Fill assumed character lengths from the definition.
            if definition.ty == CHARACTER_TYPE && var.assumed_len() {
                debug!(
                    variable = name.as_str(),
                    kind = definition.kind.as_str(),
                    "updating assumed character length"
                );
                var.kind = definition.kind.clone();
            }
        }

        variables.insert(name, records);
    }

    if !errors.is_empty() {
        errors.extend(warnings);
        return Err(errors);
    }

    modules.sort_unstable();
    modules.dedup();

    Ok(Resolution {
        variables,
        modules,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stratus_meta::{Container, Conversions, Intent};

    fn var(standard_name: &str, units: &str, intent: Intent, container: Container) -> Var {
        Var {
            standard_name: standard_name.to_string(),
            local_name: standard_name.to_string(),
            container,
            ty: "real".to_string(),
            kind: "kind_phys".to_string(),
            units: units.to_string(),
            rank: 0,
            dimensions: Vec::new(),
            intent,
            optional: false,
            active: "true".to_string(),
            target: None,
            conversions: Conversions::default(),
        }
    }

    fn defined(standard_name: &str, units: &str) -> Var {
        let mut v = var(
            standard_name,
            units,
            Intent::In,
            Container::module_type("host_data", "state_t"),
        );
        v.local_name = format!("state%{}", standard_name);
        v
    }

    fn requested(standard_name: &str, units: &str, intent: Intent) -> Var {
        var(
            standard_name,
            units,
            intent,
            Container::module_subroutine("sea_spray", "sea_spray_run"),
        )
    }

    fn pool_of(vars: Vec<Var>) -> VarPool {
        let mut pool = VarPool::new();
        for v in vars {
            pool.entry(v.standard_name.clone()).or_default().push(v);
        }
        pool
    }

    #[test]
    fn test_missing_definition() {
        let defined_pool = VarPool::new();
        let requested_pool = pool_of(vec![requested("air_temperature", "K", Intent::In)]);
        let errors = resolve(&defined_pool, requested_pool).unwrap_err();
        assert_eq!(errors[0].kind, DiagnosticKind::MissingDefinition);
        assert!(errors[0].message.contains("air_temperature"));
        assert!(errors[0].message.contains("sea_spray_run"));
    }

    #[test]
    fn test_ambiguous_definition() {
        let defined_pool = pool_of(vec![
            defined("air_temperature", "K"),
            defined("air_temperature", "K"),
        ]);
        let requested_pool = pool_of(vec![requested("air_temperature", "K", Intent::In)]);
        let errors = resolve(&defined_pool, requested_pool).unwrap_err();
        assert_eq!(errors[0].kind, DiagnosticKind::AmbiguousDefinition);
    }

    #[test]
    fn test_single_definition_resolves() {
        let defined_pool = pool_of(vec![defined("air_temperature", "K")]);
        let requested_pool = pool_of(vec![requested("air_temperature", "K", Intent::In)]);
        let resolution = resolve(&defined_pool, requested_pool).unwrap();
        let record = &resolution.variables["air_temperature"][0];
        assert_eq!(record.target.as_deref(), Some("state%air_temperature"));
        assert!(record.conversions.is_empty());
        assert_eq!(resolution.modules, vec!["host_data".to_string()]);
    }

    #[test]
    fn test_incompatible_rank() {
        let defined_pool = pool_of(vec![defined("air_temperature", "K")]);
        let mut req = requested("air_temperature", "K", Intent::In);
        req.rank = 2;
        let errors = resolve(&defined_pool, pool_of(vec![req])).unwrap_err();
        assert_eq!(errors[0].kind, DiagnosticKind::IncompatibleAttributes);
        assert!(errors[0].message.contains("provided"));
        assert!(errors[0].message.contains("requested"));
    }

    #[test]
    fn test_intent_in_registers_incoming_conversion() {
        let defined_pool = pool_of(vec![defined("cloud_depth", "m")]);
        let requested_pool = pool_of(vec![requested("cloud_depth", "km", Intent::In)]);
        let resolution = resolve(&defined_pool, requested_pool).unwrap();
        let record = &resolution.variables["cloud_depth"][0];
        let incoming = record.conversions.incoming.as_ref().unwrap();
        assert_eq!(incoming.factor, 1000.0);
        assert!(record.conversions.outgoing.is_none());
    }

    #[test]
    fn test_intent_inout_registers_both_directions() {
        let defined_pool = pool_of(vec![defined("cloud_depth", "m")]);
        let requested_pool = pool_of(vec![requested("cloud_depth", "km", Intent::InOut)]);
        let resolution = resolve(&defined_pool, requested_pool).unwrap();
        let record = &resolution.variables["cloud_depth"][0];
        assert_eq!(record.conversions.incoming.as_ref().unwrap().factor, 1000.0);
        assert_eq!(record.conversions.outgoing.as_ref().unwrap().factor, 0.001);
    }

    #[test]
    fn test_intent_out_registers_outgoing_only() {
        let defined_pool = pool_of(vec![defined("cloud_depth", "m")]);
        let requested_pool = pool_of(vec![requested("cloud_depth", "km", Intent::Out)]);
        let resolution = resolve(&defined_pool, requested_pool).unwrap();
        let record = &resolution.variables["cloud_depth"][0];
        assert!(record.conversions.incoming.is_none());
        assert_eq!(record.conversions.outgoing.as_ref().unwrap().factor, 0.001);
    }

    #[test]
    fn test_unknown_unit_pair_is_fatal() {
        let defined_pool = pool_of(vec![defined("cloud_depth", "m")]);
        let requested_pool = pool_of(vec![requested("cloud_depth", "K", Intent::In)]);
        let errors = resolve(&defined_pool, requested_pool).unwrap_err();
        assert_eq!(errors[0].kind, DiagnosticKind::UnknownUnit);
    }

    #[test]
    fn test_conditional_allocation_warns_but_resolves() {
        let mut def = defined("cloud_depth", "m");
        def.active = "(do_deep_convection)".to_string();
        let defined_pool = pool_of(vec![def]);
        let requested_pool = pool_of(vec![requested("cloud_depth", "m", Intent::In)]);
        let resolution = resolve(&defined_pool, requested_pool).unwrap();
        assert_eq!(resolution.warnings.len(), 1);
        assert_eq!(resolution.warnings[0].kind, DiagnosticKind::AllocationMismatch);
        assert_eq!(resolution.warnings[0].severity, crate::diag::Severity::Warning);
    }

    #[test]
    fn test_optional_request_of_unconditional_variable_warns() {
        let defined_pool = pool_of(vec![defined("cloud_depth", "m")]);
        let mut req = requested("cloud_depth", "m", Intent::In);
        req.optional = true;
        let resolution = resolve(&defined_pool, pool_of(vec![req])).unwrap();
        assert_eq!(resolution.warnings.len(), 1);
    }

    #[test]
    fn test_subroutine_segment_in_definition_is_fatal() {
        let mut def = defined("cloud_depth", "m");
        def.container = Container::module_subroutine("host_data", "host_init");
        let defined_pool = pool_of(vec![def]);
        let requested_pool = pool_of(vec![requested("cloud_depth", "m", Intent::In)]);
        let errors = resolve(&defined_pool, requested_pool).unwrap_err();
        assert_eq!(errors[0].kind, DiagnosticKind::UnknownSegmentKind);
    }

    #[test]
    fn test_modules_deduplicated_and_sorted() {
        let mut second = defined("surface_pressure", "Pa");
        second.container = Container::module("aerosol_data");
        let defined_pool = pool_of(vec![defined("air_temperature", "K"), second]);
        let requested_pool = pool_of(vec![
            requested("surface_pressure", "Pa", Intent::In),
            requested("air_temperature", "K", Intent::In),
        ]);
        let resolution = resolve(&defined_pool, requested_pool).unwrap();
        assert_eq!(
            resolution.modules,
            vec!["aerosol_data".to_string(), "host_data".to_string()]
        );
    }

    #[test]
    fn test_same_module_contributes_once() {
        let defined_pool = pool_of(vec![
            defined("air_temperature", "K"),
            defined("surface_pressure", "Pa"),
        ]);
        let requested_pool = pool_of(vec![
            requested("air_temperature", "K", Intent::In),
            requested("surface_pressure", "Pa", Intent::In),
        ]);
        let resolution = resolve(&defined_pool, requested_pool).unwrap();
        assert_eq!(resolution.modules, vec!["host_data".to_string()]);
    }

    #[test]
    fn test_assumed_character_length_filled_in() {
        let mut def = defined("log_filename", "none");
        def.ty = CHARACTER_TYPE.to_string();
        def.kind = "len=256".to_string();
        let defined_pool = pool_of(vec![def]);
        let mut req = requested("log_filename", "none", Intent::In);
        req.ty = CHARACTER_TYPE.to_string();
        req.kind = "len=*".to_string();
        let resolution = resolve(&defined_pool, pool_of(vec![req])).unwrap();
        assert_eq!(resolution.variables["log_filename"][0].kind, "len=256");
    }

    #[test]
    fn test_target_propagated_to_every_requester() {
        let defined_pool = pool_of(vec![defined("air_temperature", "K")]);
        let mut second = requested("air_temperature", "K", Intent::In);
        second.container = Container::module_subroutine("wave_drag", "wave_drag_run");
        let requested_pool = pool_of(vec![
            requested("air_temperature", "K", Intent::In),
            second,
        ]);
        let resolution = resolve(&defined_pool, requested_pool).unwrap();
        for record in &resolution.variables["air_temperature"] {
            assert_eq!(record.target.as_deref(), Some("state%air_temperature"));
        }
    }
}
