//! Framework-internal variables injected into every resolved pool.

use crate::container::Container;
use crate::var::{Conversions, Intent, Var, ACTIVE_UNCONDITIONAL, ASSUMED_LEN, CHARACTER_TYPE};

/// Standard name of the error message every scheme interaction reports.
pub const ERROR_MESSAGE: &str = "stratus_error_message";

/// Standard name of the error code every scheme interaction reports.
pub const ERROR_CODE: &str = "stratus_error_code";

/// Requested-side records for the mandatory error-handling variables.
pub fn mandatory_variables() -> Vec<Var> {
    vec![
        Var {
            standard_name: ERROR_MESSAGE.to_string(),
            local_name: "errmsg".to_string(),
            container: Container::module("stratus_types"),
            ty: CHARACTER_TYPE.to_string(),
            kind: ASSUMED_LEN.to_string(),
            units: "none".to_string(),
            rank: 0,
            dimensions: Vec::new(),
            intent: Intent::Out,
            optional: false,
            active: ACTIVE_UNCONDITIONAL.to_string(),
            target: None,
            conversions: Conversions::default(),
        },
        Var {
            standard_name: ERROR_CODE.to_string(),
            local_name: "ierr".to_string(),
            container: Container::module("stratus_types"),
            ty: "integer".to_string(),
            kind: String::new(),
            units: "1".to_string(),
            rank: 0,
            dimensions: Vec::new(),
            intent: Intent::Out,
            optional: false,
            active: ACTIVE_UNCONDITIONAL.to_string(),
            target: None,
            conversions: Conversions::default(),
        },
    ]
}
