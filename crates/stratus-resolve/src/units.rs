//! Unit registry and conversion lookup.
//!
//! Unit reconciliation between a requesting and a defining record needs a
//! pure, deterministic transform per (from-unit, to-unit) pair. A unit
//! string resolves to a dimension class plus an affine mapping onto that
//! class's canonical unit; two units convert iff they share a class.
//!
//! Resolution strategy, in order:
//!
//! 1. Exact match against the reserved unit table (so `m` is meter, never
//!    milli-something).
//! 2. SI prefix decomposition (longest prefixes first, `da` before `d`),
//!    scaling the base unit; affine units never take prefixes.

use stratus_meta::Conversion;

/// Dimension class of a unit; compatibility tag only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Length,
    Mass,
    Time,
    Temperature,
    Pressure,
    Energy,
    Power,
    Force,
    Amount,
    Frequency,
    Dimensionless,
}

/// A resolved unit: affine mapping `canonical = scale * value + offset`
/// onto the class's canonical unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitValue {
    pub dimension: Dimension,
    pub scale: f64,
    pub offset: f64,
}

impl UnitValue {
    const fn linear(dimension: Dimension, scale: f64) -> Self {
        Self {
            dimension,
            scale,
            offset: 0.0,
        }
    }

    fn is_affine(&self) -> bool {
        self.offset != 0.0
    }
}

/// SI metric prefixes with their scale factors.
///
/// Ordered by scale for deterministic iteration; ASCII `u` is accepted as
/// fallback for `μ` (micro).
const SI_PREFIXES: &[(&str, i32)] = &[
    ("Y", 24),
    ("Z", 21),
    ("E", 18),
    ("P", 15),
    ("T", 12),
    ("G", 9),
    ("M", 6),
    ("k", 3),
    ("h", 2),
    ("da", 1),
    ("d", -1),
    ("c", -2),
    ("m", -3),
    ("u", -6),
    ("n", -9),
    ("p", -12),
    ("f", -15),
];

/// Units that must NOT be decomposed with prefix parsing.
///
/// Checked before attempting prefix decomposition to avoid ambiguity
/// (e.g. `m` = meter, not milli-something; `Pa` = pascal, not peta-a).
const RESERVED_UNITS: &[&str] = &[
    "m", "kg", "s", "K", "Pa", "mol", "g", "N", "J", "W", "Hz", "day", "h", "min", "degC", "degF",
    "count", "1", "none", "percent",
];

/// Exact-match unit table (no prefix decomposition).
fn try_exact_unit(name: &str) -> Option<UnitValue> {
    let unit = match name {
        // Dimensionless spellings used across the metadata tables
        "1" | "none" | "count" | "flag" | "index" => {
            UnitValue::linear(Dimension::Dimensionless, 1.0)
        }
        "percent" => UnitValue::linear(Dimension::Dimensionless, 1e-2),
        "ppmv" => UnitValue::linear(Dimension::Dimensionless, 1e-6),

        // SI base and derived units
        "m" => UnitValue::linear(Dimension::Length, 1.0),
        "kg" => UnitValue::linear(Dimension::Mass, 1.0),
        "g" => UnitValue::linear(Dimension::Mass, 1e-3),
        "s" => UnitValue::linear(Dimension::Time, 1.0),
        "K" => UnitValue::linear(Dimension::Temperature, 1.0),
        "Pa" => UnitValue::linear(Dimension::Pressure, 1.0),
        "mb" | "hPa" => UnitValue::linear(Dimension::Pressure, 100.0),
        "J" => UnitValue::linear(Dimension::Energy, 1.0),
        "W" => UnitValue::linear(Dimension::Power, 1.0),
        "N" => UnitValue::linear(Dimension::Force, 1.0),
        "mol" => UnitValue::linear(Dimension::Amount, 1.0),
        "Hz" => UnitValue::linear(Dimension::Frequency, 1.0),

        // Non-SI time units
        "min" => UnitValue::linear(Dimension::Time, 60.0),
        "h" => UnitValue::linear(Dimension::Time, 3600.0),
        "day" => UnitValue::linear(Dimension::Time, 86400.0),

        // Affine temperature units
        "degC" => UnitValue {
            dimension: Dimension::Temperature,
            scale: 1.0,
            offset: 273.15,
        },
        "degF" => UnitValue {
            dimension: Dimension::Temperature,
            scale: 5.0 / 9.0,
            offset: 459.67 * 5.0 / 9.0,
        },

        _ => return None,
    };
    Some(unit)
}

/// Try to split a unit name into an SI prefix and a base unit.
///
/// Two-character prefixes are tried before one-character ones so `da`
/// never parses as deci-a.
fn try_parse_prefix(name: &str) -> Option<(f64, &str)> {
    if name.len() > 2 {
        if let Some(&(_, exp)) = SI_PREFIXES
            .iter()
            .find(|(p, _)| p.len() == 2 && name.starts_with(p))
        {
            return Some((10.0_f64.powi(exp), &name[2..]));
        }
    }
    if name.len() > 1 {
        if let Some(&(_, exp)) = SI_PREFIXES
            .iter()
            .find(|(p, _)| p.len() == 1 && name.starts_with(p))
        {
            return Some((10.0_f64.powi(exp), &name[1..]));
        }
    }
    None
}

/// Resolves a unit string to its dimension class and canonical mapping.
pub fn resolve_unit(name: &str) -> Option<UnitValue> {
    if let Some(unit) = try_exact_unit(name) {
        return Some(unit);
    }
    if !RESERVED_UNITS.contains(&name) {
        if let Some((prefix_scale, base_name)) = try_parse_prefix(name) {
            if let Some(base) = try_exact_unit(base_name) {
                if !base.is_affine() {
                    return Some(UnitValue::linear(base.dimension, base.scale * prefix_scale));
                }
            }
        }
    }
    None
}

/// Looks up the conversion from one unit string to another.
///
/// Defined iff both units resolve and share a dimension class. The result
/// applies as `to_value = factor * from_value + offset`; conversions
/// compose via [`Conversion::then`].
pub fn conversion(from: &str, to: &str) -> Option<Conversion> {
    let from_unit = resolve_unit(from)?;
    let to_unit = resolve_unit(to)?;
    if from_unit.dimension != to_unit.dimension {
        return None;
    }
    Some(Conversion {
        from: from.to_string(),
        to: to.to_string(),
        factor: from_unit.scale / to_unit.scale,
        offset: (from_unit.offset - to_unit.offset) / to_unit.scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reserved_units_resolve_exactly() {
        assert_eq!(resolve_unit("m").unwrap().dimension, Dimension::Length);
        assert_eq!(resolve_unit("mol").unwrap().dimension, Dimension::Amount);
        assert_eq!(resolve_unit("Pa").unwrap().dimension, Dimension::Pressure);
        // 'm' must be meter with scale 1, never milli-anything.
        assert_eq!(resolve_unit("m").unwrap().scale, 1.0);
    }

    #[test]
    fn test_prefix_decomposition() {
        let km = resolve_unit("km").unwrap();
        assert_eq!(km.dimension, Dimension::Length);
        assert_eq!(km.scale, 1000.0);

        let hpa = resolve_unit("hPa").unwrap();
        assert_eq!(hpa.scale, 100.0);

        let mm = resolve_unit("mm").unwrap();
        assert_eq!(mm.scale, 1e-3);
    }

    #[test]
    fn test_affine_units_take_no_prefix() {
        assert!(resolve_unit("kdegC").is_none());
    }

    #[test]
    fn test_unknown_unit() {
        assert!(resolve_unit("furlong").is_none());
    }

    #[test]
    fn test_conversion_km_to_m() {
        let conv = conversion("km", "m").unwrap();
        assert_eq!(conv.factor, 1000.0);
        assert_eq!(conv.offset, 0.0);
        assert_eq!(conv.apply(2.5), 2500.0);
    }

    #[test]
    fn test_conversion_degc_to_kelvin() {
        let conv = conversion("degC", "K").unwrap();
        assert_eq!(conv.factor, 1.0);
        assert_eq!(conv.offset, 273.15);
        assert_eq!(conv.apply(0.0), 273.15);
    }

    #[test]
    fn test_conversion_kelvin_to_degc() {
        let conv = conversion("K", "degC").unwrap();
        assert_eq!(conv.apply(273.15), 0.0);
    }

    #[test]
    fn test_conversion_degf_to_kelvin() {
        let conv = conversion("degF", "K").unwrap();
        // 32 degF = 273.15 K
        assert!((conv.apply(32.0) - 273.15).abs() < 1e-9);
    }

    #[test]
    fn test_conversion_across_dimensions_fails() {
        assert!(conversion("m", "K").is_none());
        assert!(conversion("kg", "s").is_none());
    }

    #[test]
    fn test_conversion_composes() {
        let km_to_m = conversion("km", "m").unwrap();
        let m_to_cm = conversion("m", "cm").unwrap();
        let km_to_cm = km_to_m.then(&m_to_cm);
        assert!((km_to_cm.apply(1.0) - 1e5).abs() < 1e-6);
    }

    #[test]
    fn test_conversion_is_deterministic() {
        assert_eq!(conversion("mb", "Pa"), conversion("mb", "Pa"));
    }
}
