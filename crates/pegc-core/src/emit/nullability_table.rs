//! Emission of the nullable-rule-name table, sorted lexicographically for
//! reproducible output (see DESIGN.md's resolution of the specification's
//! open question on table ordering).

use indexmap::IndexSet;

use super::layout::Writer;

pub fn emit_nullability_table(w: &mut Writer, nullable: &IndexSet<String>) {
    let mut names: Vec<&str> = nullable.iter().map(String::as_str).collect();
    names.sort_unstable();

    w.line("#[allow(dead_code)]");
    w.line("pub static NULLABLE_RULES: &[&str] = &[");
    w.indented(|w| {
        for name in &names {
            w.line(format!("{name:?},"));
        }
    });
    w.line("];");
    w.blank();
}
