//! Grammar-level tests through the public API: dialect detection, error
//! reporting and the canonical text round trip.

use proptest::prelude::*;
use tagrule_core::{
    parse, parse_with, BinaryOp, Clause, Expression, ParseOptions, RuleForm, UnaryOp, Value,
};

#[test]
fn simple_expression_with_every_operator_class() {
    let form = parse("!(#1 + #2 * 3 ^ 2 >= 10) || #3 != \"off\" && -#4 < 0").unwrap();
    assert_eq!(form.kind(), "simple");
    let RuleForm::Simple(expr) = form else {
        panic!("expected simple form");
    };
    assert!(matches!(
        expr,
        Expression::Binary {
            op: BinaryOp::Or,
            ..
        }
    ));
    assert_eq!(expr.tag_ids().into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
}

#[test]
fn end_to_end_rule_parses_into_two_clauses() {
    let form = parse("(#100 > 50) & (#101 = true)[WARN],true[OK]").unwrap();
    assert_eq!(form.kind(), "guarded");
    let clauses = form.clauses();
    assert_eq!(clauses.len(), 2);
    assert_eq!(clauses[0].result, Value::from("WARN"));
    assert_eq!(clauses[1].condition, Expression::Literal(Value::Bool(true)));
}

#[test]
fn invalid_aware_rule_keeps_the_keyword() {
    let form = parse("(#1 = $INVALID)[BAD],true[OK]").unwrap();
    assert!(form.clauses()[0].condition.uses_invalid_keyword());
    assert!(!form.clauses()[1].condition.uses_invalid_keyword());
}

#[test]
fn multi_return_rule_expands_shared_results() {
    let form = parse("(#1 = 1) | (#1 = 2)[LOW],true[HIGH]").unwrap();
    assert_eq!(form.kind(), "multi-return");
    let results: Vec<&Value> = form.clauses().iter().map(|c| &c.result).collect();
    assert_eq!(
        results,
        vec![
            &Value::from("LOW"),
            &Value::from("LOW"),
            &Value::from("HIGH")
        ]
    );
}

#[test]
fn clause_results_take_their_literal_kind() {
    let form = parse("(#1 > 1)[2.5],(#1 > 0)[true],(#1 < 0)[\"-1\"],true[-3]").unwrap();
    let results: Vec<Value> = form.clauses().iter().map(|c| c.result.clone()).collect();
    assert_eq!(
        results,
        vec![
            Value::Number(2.5),
            Value::Bool(true),
            Value::from("-1"),
            Value::Number(-3.0),
        ]
    );
}

#[test]
fn format_errors_report_position_and_reason() {
    let cases = [
        ("", 0, "empty expression"),
        ("#1 > ", 5, "missing operand"),
        ("(#1 > 2", 0, "unbalanced parentheses"),
        ("#1 = \"on", 5, "unterminated string"),
        ("#1 + ()", 6, "empty parentheses"),
        ("true[1] false[2]", 8, "between clauses"),
    ];
    for (text, position, reason) in cases {
        let err = parse(text).unwrap_err();
        assert_eq!(err.position, position, "position for {:?}", text);
        assert!(
            err.message.contains(reason),
            "message for {:?} was {:?}",
            text,
            err.message
        );
        assert!(err.to_string().contains(&format!("position {}", position)));
    }
}

#[test]
fn lenient_and_strict_lexing() {
    let lenient = parse("#1 > 10 @").unwrap();
    assert_eq!(lenient, parse("#1 > 10").unwrap());

    let err = parse_with("#1 > 10 @", &ParseOptions::strict()).unwrap_err();
    assert_eq!(err.position, 8);
}

#[test]
fn rule_form_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RuleForm>();
}

#[test]
fn round_trip_of_known_rules() {
    let rules = [
        "(#100 + #101) / 2",
        "#1 > 10",
        "-(#1 - -2) ^ 2 ^ 0.5",
        "!(#4 = $INVALID) & #5",
        "(#1 < 10)[1],true[0]",
        "(#100 > 50) & (#101 = true)[WARN],true[OK]",
        "(#1 = 1) | (#1 = 2)[LOW],true[HIGH]",
        "(#1 = \"a[b]\")[\"x,y\"],true[\"TRUE\"]",
        "true[1e999]",
        "(#1 > 0)[1e308],true[-1e999]",
    ];
    for rule in rules {
        let form = parse(rule).unwrap();
        let text = form.to_string();
        assert_eq!(parse(&text).unwrap(), form, "{} -> {}", rule, text);
    }
}

#[test]
fn overflowing_numbers_never_become_infinity() {
    let err = parse("#1 > 1e999").unwrap_err();
    assert_eq!(err.position, 5);
    assert!(err.message.contains("out of range"));

    // A result too large for a number stays the text the author wrote.
    let form = parse("true[1e999]").unwrap();
    assert_eq!(form.clauses()[0].result, Value::Str("1e999".to_string()));
    assert_eq!(form.to_string(), "true[1e999]");
}

// ── Property: canonical text parses back to the same form ──────────

fn leaf() -> impl Strategy<Value = Expression> {
    prop_oneof![
        (0u32..10_000).prop_map(|n| Expression::Literal(Value::Number(f64::from(n)))),
        (0u32..1_000).prop_map(|n| Expression::Literal(Value::Number(f64::from(n) / 8.0))),
        any::<bool>().prop_map(|b| Expression::Literal(Value::Bool(b))),
        "[a-z ]{0,8}".prop_map(|s| Expression::Literal(Value::Str(s))),
        (1i64..100_000).prop_map(Expression::TagRef),
        Just(Expression::InvalidMarker),
    ]
}

fn unary_op() -> impl Strategy<Value = UnaryOp> {
    prop_oneof![Just(UnaryOp::Not), Just(UnaryOp::Negate)]
}

fn binary_op() -> impl Strategy<Value = BinaryOp> {
    prop_oneof![
        Just(BinaryOp::Add),
        Just(BinaryOp::Sub),
        Just(BinaryOp::Mul),
        Just(BinaryOp::Div),
        Just(BinaryOp::Pow),
        Just(BinaryOp::Lt),
        Just(BinaryOp::Le),
        Just(BinaryOp::Gt),
        Just(BinaryOp::Ge),
        Just(BinaryOp::Eq),
        Just(BinaryOp::Ne),
        Just(BinaryOp::And),
        Just(BinaryOp::Or),
    ]
}

fn expression() -> impl Strategy<Value = Expression> {
    leaf().prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (unary_op(), inner.clone()).prop_map(|(op, e)| Expression::unary(op, e)),
            (binary_op(), inner.clone(), inner).prop_map(|(op, l, r)| Expression::binary(op, l, r)),
        ]
    })
}

fn result_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-500i32..500).prop_map(|n| Value::Number(f64::from(n))),
        any::<bool>().prop_map(Value::Bool),
        "[A-Za-z][A-Za-z0-9 ]{0,6}".prop_map(Value::Str),
        "[0-9]{1,3}".prop_map(Value::Str),
    ]
}

fn clause() -> impl Strategy<Value = Clause> {
    (expression(), result_value()).prop_map(|(condition, result)| Clause { condition, result })
}

fn rule_form() -> impl Strategy<Value = RuleForm> {
    prop_oneof![
        expression().prop_map(RuleForm::Simple),
        prop::collection::vec(clause(), 1..4).prop_map(RuleForm::Guarded),
        prop::collection::vec(clause(), 2..4).prop_map(RuleForm::MultiReturn),
    ]
}

proptest! {
    #[test]
    fn canonical_text_round_trips(form in rule_form()) {
        let text = form.to_string();
        let reparsed = parse(&text);
        prop_assert!(reparsed.is_ok(), "{} failed: {:?}", text, reparsed);
        prop_assert_eq!(reparsed.unwrap(), form);
    }

    #[test]
    fn canonical_text_is_a_fixed_point(form in rule_form()) {
        let once = form.to_string();
        let twice = parse(&once).unwrap().to_string();
        prop_assert_eq!(once, twice);
    }
}
