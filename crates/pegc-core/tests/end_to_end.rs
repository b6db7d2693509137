//! End-to-end compile scenarios, one per testable property enumerated in
//! the expanded specification: trivial identity, direct and indirect left
//! recursion, nullable-star rejection, undefined identifier, and
//! character-class ranges.

use indoc::indoc;

#[test]
fn trivial_grammar_compiles_cleanly() {
    let src = indoc! {"
        PEG trivial(greeting)
        greeting <- 'hello';
        END;
    "};
    let out = pegc_core::compile(src).expect("trivial grammar should compile");
    assert!(out.contains("fn parse_greeting"));
    assert!(out.contains("pub fn parse(source: &str)"));
}

#[test]
fn direct_left_recursion_is_rejected() {
    let src = indoc! {"
        PEG g(r)
        r <- r 'a' / 'b';
        END;
    "};
    let err = pegc_core::compile(src).expect_err("direct left recursion must fail checks");
    match err {
        pegc_core::Error::CheckFailed(diags) => assert!(diags.has_errors()),
        other => panic!("expected CheckFailed, got {other:?}"),
    }
}

#[test]
fn indirect_left_recursion_is_rejected() {
    let src = indoc! {"
        PEG g(a)
        a <- b 'x';
        b <- a 'y' / 'z';
        END;
    "};
    let err = pegc_core::compile(src).expect_err("indirect left recursion must fail checks");
    assert!(matches!(err, pegc_core::Error::CheckFailed(_)));
}

#[test]
fn nullable_star_operand_is_rejected() {
    let src = indoc! {"
        PEG g(r)
        r <- ('a'?)*;
        END;
    "};
    let err = pegc_core::compile(src).expect_err("greedy repetition over a nullable operand must fail");
    match err {
        pegc_core::Error::CheckFailed(diags) => assert!(diags.has_errors()),
        other => panic!("expected CheckFailed, got {other:?}"),
    }
}

#[test]
fn undefined_identifier_is_rejected() {
    let src = indoc! {"
        PEG g(r)
        r <- missing_rule;
        END;
    "};
    let err = pegc_core::compile(src).expect_err("reference to an undefined rule must fail checks");
    assert!(matches!(err, pegc_core::Error::CheckFailed(_)));
}

#[test]
fn character_class_ranges_are_emitted() {
    let src = indoc! {"
        PEG g(digits)
        leaf: digits <- [0-9]+;
        END;
    "};
    let out = pegc_core::compile(src).expect("class grammar should compile");
    assert!(out.contains("char_class"));
    assert!(out.contains("(48, 57)"));
}

#[test]
fn diagnostics_render_with_source_context() {
    let src = indoc! {"
        PEG g(r)
        r <- missing_rule;
        END;
    "};
    let err = pegc_core::compile(src).unwrap_err();
    let pegc_core::Error::CheckFailed(diags) = err else { panic!("expected CheckFailed") };
    let rendered = diags.printer(src).render();
    assert!(rendered.contains("missing_rule") || rendered.to_lowercase().contains("undefined"));
}

#[test]
fn character_property_predicate_compiles_and_emits_is_alpha() {
    let src = indoc! {"
        PEG g(word)
        word <- alpha+;
        END;
    "};
    let out = pegc_core::compile(src).expect("a grammar using a reserved property name should compile");
    assert!(out.contains("is_alpha"));
}

#[test]
fn rule_unreachable_from_start_does_not_fail_the_check() {
    let src = indoc! {"
        PEG g(r)
        r <- 'a';
        dead <- dead;
        END;
    "};
    pegc_core::compile(src).expect("a left-recursive rule unreachable from the start must not fail checks");
}

#[test]
fn start_expression_is_inlined_without_a_synthetic_rule() {
    let src = indoc! {"
        PEG greet(greeting)
        greeting <- 'hi';
        END;
    "};
    let out = pegc_core::compile(src).expect("trivial grammar should compile");
    assert!(!out.contains("fn parse_greet("));
    assert!(!out.contains("Greet"));
}
