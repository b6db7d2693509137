//! Bootstrap parser failure reporting: turns the furthest-reaching
//! [`crate::runtime::Failure`] entries into a deduplicated expectation set.

use crate::runtime::Failure;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected input at byte {pos}, expected {}", expected.join(" or "))]
pub struct ParseError {
    pub pos: usize,
    pub expected: Vec<String>,
}

/// Maps an innermost rule name (the one active when a failure occurred) to
/// a human expectation, per the fixed table in the external-interface
/// contract. Rules not named here fall back to a generic message built from
/// the rule name itself.
fn expectation_for_rule(rule: &str) -> Option<&'static str> {
    Some(match rule {
        "grammar" | "header" => "'PEG'",
        "definition" => "'void', 'leaf' or identifier",
        "start_expr" => "expression",
        "attribute" => "'void' or 'leaf'",
        "expression" => "expression",
        "sequence" => "sequence",
        "prefix" => "'&', '!' or primary",
        "suffix" => "primary",
        "primary" => "identifier, '(', literal, class or '.'",
        "literal" => "literal",
        "class" => "'['",
        "range" => "character",
        "identifier" => "identifier",
        "char" => "character",
        _ => return None,
    })
}

/// Builds a [`ParseError`] from the furthest-reaching failures recorded by
/// the parse state, deduplicating the resulting expectation messages.
pub fn furthest_error(failures: &[Failure]) -> ParseError {
    let pos = failures.first().map(|f| f.pos).unwrap_or(0);
    let mut expected: Vec<String> = Vec::new();
    for failure in failures {
        let message = failure
            .rule_stack
            .last()
            .and_then(|rule| expectation_for_rule(rule))
            .map(str::to_string)
            .unwrap_or_else(|| "more input".to_string());
        if !expected.contains(&message) {
            expected.push(message);
        }
    }
    if expected.is_empty() {
        expected.push("more input".to_string());
    }
    ParseError { pos, expected }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::FailureKind;

    #[test]
    fn dedups_identical_expectations() {
        let failures = vec![
            Failure { kind: FailureKind::UnexpectedChar, pos: 5, rule_stack: vec!["definition"] },
            Failure { kind: FailureKind::UnexpectedChar, pos: 5, rule_stack: vec!["definition"] },
        ];
        let err = furthest_error(&failures);
        assert_eq!(err.expected, vec!["'void', 'leaf' or identifier".to_string()]);
    }
}
