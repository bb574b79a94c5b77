//! Execution plans: suites of groups, subcycles, and schemes.
//!
//! A suite is one valid run configuration. For reachability filtering it
//! derives two closure sets: every scheme it invokes, and every generated
//! subroutine identifier it calls (scheme name crossed with the
//! abbreviated stage suffixes).

use crate::stages::STAGES;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Innermost unit of a group: a loop over an ordered scheme list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcycle {
    #[serde(default = "default_loop_count")]
    pub loop_count: u32,
    pub schemes: Vec<String>,
}

fn default_loop_count() -> u32 {
    1
}

/// Named ordered list of subcycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub subcycles: Vec<Subcycle>,
}

/// One execution plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suite {
    pub name: String,
    pub groups: Vec<Group>,
}

impl Suite {
    /// Every scheme name invoked anywhere in the suite.
    pub fn schemes_called(&self) -> BTreeSet<&str> {
        self.groups
            .iter()
            .flat_map(|group| &group.subcycles)
            .flat_map(|subcycle| &subcycle.schemes)
            .map(String::as_str)
            .collect()
    }

    /// Every generated subroutine identifier invoked by the suite,
    /// with abbreviated stage suffixes.
    pub fn subroutines_called(&self) -> BTreeSet<String> {
        let mut subroutines = BTreeSet::new();
        for scheme in self.schemes_called() {
            for (_, short) in STAGES {
                subroutines.insert(format!("{}_{}", scheme, short));
            }
        }
        subroutines
    }
}
