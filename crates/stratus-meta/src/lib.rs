// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Metadata records and execution-plan types for the Stratus prebuild engine.
//!
//! This crate defines the data model shared by the resolution core and the
//! driver: variable records, the container codec, suites, the
//! naming-convention table, and the framework-internal variables.

pub mod container;
pub mod convention;
pub mod framework;
pub mod stages;
pub mod suite;
pub mod var;

pub use container::{Container, ContainerError, Segment, SegmentKind};
pub use convention::ConventionTable;
pub use suite::{Group, Subcycle, Suite};
pub use var::{
    Conversion, Conversions, Intent, Var, ACTIVE_UNCONDITIONAL, ASSUMED_LEN, CHARACTER_TYPE,
};

use indexmap::IndexMap;
use std::path::PathBuf;

/// Pool of variable records keyed by standard name.
///
/// The defined pool holds exactly one record per standard name (enforced
/// during resolution); the requested pool holds one record per requesting
/// subroutine.
pub type VarPool = IndexMap<String, Vec<Var>>;

/// Extra source files required per scheme or per host module.
pub type DependencyMap = IndexMap<String, Vec<PathBuf>>;

/// Ordered argument list per scheme.
pub type ArgumentMap = IndexMap<String, Vec<String>>;

/// Declaring source file per scheme.
pub type SchemeLocationMap = IndexMap<String, PathBuf>;
