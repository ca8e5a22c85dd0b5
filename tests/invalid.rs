use cart_eligibility::{self as ce, Context, EvalError, Evaluator, Modifier};
use serde_json::json;

#[test]
fn test_unknown_modifier() {
    let err = ce::is_eligible(&json!({"x": 1}), &json!({"x": {"foo": 1}})).unwrap_err();
    assert_eq!(err, EvalError::UnknownModifier("foo".into()));
    assert_eq!(err.to_string(), "unknown modifier => foo");
}

#[test]
fn test_unknown_modifier_inside_combinator() {
    let err = ce::is_eligible(&json!({"x": 1}), &json!({"x": {"or": {"gt": 5, "eq": 1}}}))
        .unwrap_err();
    assert_eq!(err, EvalError::UnknownModifier("eq".into()));
}

// A missing path is a failed criterion, not an error.
#[test]
fn test_missing_value_is_not_an_error() {
    let out = ce::is_eligible(&json!({"x": 1}), &json!({"y": {"foo": 1}}));
    assert_eq!(out, Ok(false));
}

#[test]
fn test_empty_modifier_mapping() {
    let err = ce::is_eligible(&json!({"x": 1}), &json!({"x": {}})).unwrap_err();
    assert_eq!(err, EvalError::EmptyCriterion);
}

#[test]
fn test_bad_operands() {
    let err = ce::is_eligible(&json!({"x": 1}), &json!({"x": {"in": 1}})).unwrap_err();
    assert!(matches!(err, EvalError::InvalidOperand { modifier: Modifier::In, .. }));

    let err = ce::is_eligible(&json!({"x": 1}), &json!({"x": {"or": 1}})).unwrap_err();
    assert!(matches!(err, EvalError::InvalidOperand { modifier: Modifier::Or, .. }));
    assert!(err.to_string().starts_with("invalid operand for `or`"));
}

#[test]
fn test_criteria_must_be_a_mapping() {
    let err = ce::is_eligible(&json!({"x": 1}), &json!("x")).unwrap_err();
    assert!(matches!(err, EvalError::InvalidCriteria(_)));
}

#[test]
fn test_depth_limit() {
    let mut criterion = json!({"gt": 0});
    for _ in 0..5 {
        criterion = json!({"and": criterion});
    }
    let criteria = json!({"x": criterion});
    let record = json!({"x": 1});

    let tight = Evaluator::new(Context::default().with_max_depth(4));
    assert_eq!(tight.is_eligible(&record, &criteria), Err(EvalError::DepthExceeded(4)));

    let roomy = Evaluator::new(Context::default().with_max_depth(5));
    assert_eq!(roomy.is_eligible(&record, &criteria), Ok(true));
}

#[test]
fn test_deep_nesting_is_unbounded_by_default() {
    let mut criterion = json!({"gt": 0});
    for _ in 0..40 {
        criterion = json!({"and": criterion});
    }
    let criteria = json!({"x": criterion});
    assert_eq!(ce::is_eligible(&json!({"x": 1}), &criteria), Ok(true));
}

#[test]
fn test_in_on_empty_sequence_is_false() {
    let out = ce::is_eligible(&json!({"tags": []}), &json!({"tags": {"in": 5}}));
    assert_eq!(out, Ok(false));
    let out = ce::is_eligible(&json!({"items": []}), &json!({"items.sku": {"in": {"a": 1}}}));
    assert_eq!(out, Ok(false));
}
