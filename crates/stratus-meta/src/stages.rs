//! Execution-stage names and their abbreviated forms.
//!
//! Subroutine names embed the stage they implement (`<scheme>_run`,
//! `<scheme>_timestep_init`, ...). Generated subroutine identifiers use
//! abbreviated stage suffixes to stay within Fortran's name-length limit.
//! `timestep_init` and `timestep_finalize` must come first so that the
//! substring replacement never picks `init` out of `xyz_timestep_init`.

/// Ordered (long name, abbreviated suffix) pairs.
pub const STAGES: &[(&str, &str)] = &[
    ("timestep_init", "tsinit"),
    ("timestep_finalize", "tsfinal"),
    ("init", "init"),
    ("run", "run"),
    ("finalize", "final"),
];

/// Replaces any recognized long stage substring with its short form.
pub fn abbreviate(subroutine: &str) -> String {
    let mut name = subroutine.to_string();
    for (long, short) in STAGES {
        name = name.replace(long, short);
    }
    name
}
