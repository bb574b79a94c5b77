//! Variable records: the unit of metadata on both sides of resolution.
//!
//! A [`Var`] describes one variable as seen from one location: either a
//! host-side definition or a scheme-side request. The standard name is the
//! only join key between the two namespaces. Requesting records are
//! enriched in place during resolution (target, conversions, concrete
//! character length); defining records are read-only after
//! naming-convention normalization.

use crate::container::Container;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Character length specifier meaning "assumed, filled in at resolution".
pub const ASSUMED_LEN: &str = "len=*";

/// `active` attribute value meaning "unconditionally allocated".
pub const ACTIVE_UNCONDITIONAL: &str = "true";

/// The character type name; its kind carries a length spec instead of a
/// numeric precision.
pub const CHARACTER_TYPE: &str = "character";

/// Data-flow direction of a requested variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    In,
    Out,
    InOut,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Intent::In => "in",
            Intent::Out => "out",
            Intent::InOut => "inout",
        };
        f.write_str(text)
    }
}

/// A pure unit-to-unit transform, applied as `y = factor * x + offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub factor: f64,
    pub offset: f64,
}

impl Conversion {
    /// Applies the transform to a value.
    pub fn apply(&self, value: f64) -> f64 {
        self.factor * value + self.offset
    }

    /// Composes two transforms: `self` first, then `next`.
    pub fn then(&self, next: &Conversion) -> Conversion {
        Conversion {
            from: self.from.clone(),
            to: next.to.clone(),
            factor: next.factor * self.factor,
            offset: next.factor * self.offset + next.offset,
        }
    }
}

/// Unit conversions registered on a requesting record.
///
/// `incoming` converts values from the requester's units to the defined
/// units; `outgoing` converts defined units back to the requester's.
/// Which of the two is registered depends on the record's intent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversions {
    pub incoming: Option<Conversion>,
    pub outgoing: Option<Conversion>,
}

impl Conversions {
    pub fn is_empty(&self) -> bool {
        self.incoming.is_none() && self.outgoing.is_none()
    }
}

/// One variable record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Var {
    pub standard_name: String,
    pub local_name: String,
    pub container: Container,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub kind: String,
    pub units: String,
    #[serde(default)]
    pub rank: usize,
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default = "Intent::default_in")]
    pub intent: Intent,
    #[serde(default)]
    pub optional: bool,
    #[serde(default = "default_active")]
    pub active: String,
    /// Fully qualified storage reference; populated by resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Registered unit conversions; populated by resolution.
    #[serde(default, skip_serializing_if = "Conversions::is_empty")]
    pub conversions: Conversions,
}

fn default_active() -> String {
    ACTIVE_UNCONDITIONAL.to_string()
}

impl Intent {
    fn default_in() -> Self {
        Intent::In
    }
}

impl Var {
    /// Whether the defining side allocates this variable unconditionally.
    pub fn unconditional(&self) -> bool {
        self.active == ACTIVE_UNCONDITIONAL
    }

    /// Whether this record's kind is the assumed character length.
    pub fn assumed_len(&self) -> bool {
        self.ty == CHARACTER_TYPE && self.kind == ASSUMED_LEN
    }

    /// Compatibility between a requesting and a defining record.
    ///
    /// Type, kind, and rank must agree; units are reconciled separately
    /// through conversions. For character data an assumed length on either
    /// side matches any concrete length.
    pub fn compatible(&self, other: &Var) -> bool {
        if self.ty != other.ty || self.rank != other.rank {
            return false;
        }
        if self.kind == other.kind {
            return true;
        }
        self.ty == CHARACTER_TYPE && (self.kind == ASSUMED_LEN || other.kind == ASSUMED_LEN)
    }

    /// One-line attribute dump for diagnostics.
    pub fn describe(&self) -> String {
        format!(
            "{} [local_name={}, type={}, kind={}, units={}, rank={}, intent={}, optional={}, active={}, container={}]",
            self.standard_name,
            self.local_name,
            self.ty,
            self.kind,
            self.units,
            self.rank,
            self.intent,
            self.optional,
            self.active,
            self.container,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn real_var(standard_name: &str, kind: &str, rank: usize) -> Var {
        Var {
            standard_name: standard_name.to_string(),
            local_name: standard_name.to_string(),
            container: Container::module("host_data"),
            ty: "real".to_string(),
            kind: kind.to_string(),
            units: "m".to_string(),
            rank,
            dimensions: Vec::new(),
            intent: Intent::In,
            optional: false,
            active: ACTIVE_UNCONDITIONAL.to_string(),
            target: None,
            conversions: Conversions::default(),
        }
    }

    #[test]
    fn test_compatible_same_attributes() {
        let a = real_var("air_temperature", "kind_phys", 2);
        let b = real_var("air_temperature", "kind_phys", 2);
        assert!(a.compatible(&b));
    }

    #[test]
    fn test_incompatible_rank() {
        let a = real_var("air_temperature", "kind_phys", 2);
        let b = real_var("air_temperature", "kind_phys", 1);
        assert!(!a.compatible(&b));
    }

    #[test]
    fn test_incompatible_kind() {
        let a = real_var("air_temperature", "kind_phys", 2);
        let b = real_var("air_temperature", "kind_dyn", 2);
        assert!(!a.compatible(&b));
    }

    #[test]
    fn test_assumed_len_matches_any_concrete_len() {
        let mut requested = real_var("log_filename", ASSUMED_LEN, 0);
        requested.ty = CHARACTER_TYPE.to_string();
        let mut defined = real_var("log_filename", "len=256", 0);
        defined.ty = CHARACTER_TYPE.to_string();
        assert!(requested.compatible(&defined));
        assert!(defined.compatible(&requested));
    }

    #[test]
    fn test_conversion_apply_and_compose() {
        let km_to_m = Conversion {
            from: "km".to_string(),
            to: "m".to_string(),
            factor: 1000.0,
            offset: 0.0,
        };
        let m_to_mm = Conversion {
            from: "m".to_string(),
            to: "mm".to_string(),
            factor: 1000.0,
            offset: 0.0,
        };
        assert_eq!(km_to_m.apply(2.0), 2000.0);
        let km_to_mm = km_to_m.then(&m_to_mm);
        assert_eq!(km_to_mm.factor, 1_000_000.0);
        assert_eq!(km_to_mm.from, "km");
        assert_eq!(km_to_mm.to, "mm");
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "standard_name": "air_pressure",
            "local_name": "pres",
            "container": "MODULE_host_data",
            "type": "real",
            "kind": "kind_phys",
            "units": "Pa"
        }"#;
        let var: Var = serde_json::from_str(json).unwrap();
        assert_eq!(var.rank, 0);
        assert!(!var.optional);
        assert!(var.unconditional());
        assert_eq!(var.intent, Intent::In);
        assert!(var.target.is_none());
    }
}
