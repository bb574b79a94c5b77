//! Build-fragment rendering and emission.
//!
//! Each fragment family (schemes, typedefs) is emitted in three flavors
//! consumed by different host build systems: a Makefile snippet, a CMake
//! snippet, and a shell sourcefile.

use crate::artifact;
use crate::config::ResolvedFragmentPaths;
use crate::error::Result;
use tracing::info;

/// `VAR = \` followed by one tab-indented item per line.
pub fn render_makefile(variable: &str, items: &[String]) -> String {
    let mut text = format!("{variable} = \\\n");
    for (i, item) in items.iter().enumerate() {
        let terminator = if i + 1 == items.len() { "\n" } else { " \\\n" };
        text.push_str(&format!("\t{item}{terminator}"));
    }
    text
}

/// `set(VAR ...)` with one item per line.
pub fn render_cmakefile(variable: &str, items: &[String]) -> String {
    let mut text = format!("set({variable}\n");
    for item in items {
        text.push_str(&format!("  {item}\n"));
    }
    text.push_str(")\n");
    text
}

/// `export VAR="..."` with space-separated items.
pub fn render_sourcefile(variable: &str, items: &[String]) -> String {
    format!("export {variable}=\"{}\"\n", items.join(" "))
}

/// Writes one fragment family; items must already be sorted.
pub fn emit_fragments(
    paths: &ResolvedFragmentPaths,
    variable: &str,
    items: &[String],
) -> Result<()> {
    artifact::write_if_changed(&paths.makefile, &render_makefile(variable, items))?;
    artifact::write_if_changed(&paths.cmakefile, &render_cmakefile(variable, items))?;
    artifact::write_if_changed(&paths.sourcefile, &render_sourcefile(variable, items))?;
    info!(
        count = items.len(),
        makefile = %paths.makefile.display(),
        cmakefile = %paths.cmakefile.display(),
        sourcefile = %paths.sourcefile.display(),
        "emitted build fragments"
    );
    Ok(())
}
