//! Identifier mangling for emitted Rust source: case normalization and
//! reserved-word quoting. Styled after this lineage's `to_pascal_case`/
//! `to_snake_case` utility pair, extended with a raw-identifier escape
//! hatch for names a grammar author picked that collide with Rust
//! keywords or use this language's `:` rule-namespace separator.

const RESERVED: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try", "union",
];

/// Converts an arbitrary grammar rule name (which may contain `:` and mixed
/// case) into a valid, lowercase Rust identifier fragment.
///
/// ```
/// assert_eq!(pegc_core::emit::naming::to_snake_case("ns:RuleName"), "ns_rule_name");
/// ```
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c == ':' || c == '-' {
            out.push('_');
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// Converts a rule name to the PascalCase form used for its AST variant.
///
/// ```
/// assert_eq!(pegc_core::emit::naming::to_pascal_case("ns:rule_name"), "NsRuleName");
/// ```
pub fn to_pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_boundary = true;
    for c in name.chars() {
        if c == ':' || c == '_' || c == '-' {
            at_boundary = true;
            continue;
        }
        if at_boundary {
            out.extend(c.to_uppercase());
            at_boundary = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Mangles a rule name into the generated parser-function identifier. The
/// `parse_` prefix means collisions with bare keywords cannot occur here —
/// the function exists mainly so every call site goes through one place.
pub fn rule_fn_name(name: &str) -> String {
    format!("parse_{}", to_snake_case(name))
}

/// Mangles a rule name into its AST enum variant name, appending an
/// underscore on the rare case a grammar's own name normalizes to a
/// keyword that also happens to be valid PascalCase (`Self`, `Crate`):
/// `Self`/`self`/`super`/`crate`/`extern` cannot be escaped with Rust's
/// `r#` raw-identifier syntax, so a suffix is used instead of quoting.
pub fn variant_name(name: &str) -> String {
    let pascal = to_pascal_case(name);
    if RESERVED.iter().any(|r| r.eq_ignore_ascii_case(&pascal)) {
        format!("{pascal}_")
    } else {
        pascal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_splits_namespace_and_case() {
        assert_eq!(to_snake_case("http:Method"), "http_method");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn pascal_case_capitalizes_each_segment() {
        assert_eq!(to_pascal_case("http:method_name"), "HttpMethodName");
    }

    #[test]
    fn rule_fn_name_always_avoids_keyword_collision() {
        assert_eq!(rule_fn_name("type"), "parse_type");
        assert_eq!(rule_fn_name("greeting"), "parse_greeting");
    }

    #[test]
    fn variant_name_suffixes_on_keyword_collision() {
        assert_eq!(variant_name("self"), "Self_");
        assert_eq!(variant_name("greeting"), "Greeting");
    }
}
