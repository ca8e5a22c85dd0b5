//! Value coercion and comparison.
//!
//! Three comparisons are used by the evaluator and all of them live here:
//! - [`loose_eq`] for a scalar record value against a literal criterion,
//!   with type coercion (`"30"` equals `30`, `true` equals `1`).
//! - [`strict_eq`] for membership checks (array literals, `in`), no coercion.
//! - [`cmp_values`] for the ordering modifiers.

use std::cmp::Ordering;

use itertools::Itertools;
use serde_json::Value;

use crate::path::Resolved;

/// A value reduced to a scalar, the form coercing comparisons work on.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Primitive {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

const OBJECT_TAG: &str = "[object Object]";

pub(crate) fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_compound(v: &Value) -> bool {
    matches!(v, Value::Array(_) | Value::Object(_))
}

fn is_compound_resolved(r: &Resolved) -> bool {
    match r {
        Resolved::Found(v) => is_compound(v),
        Resolved::Computed(v) => is_compound(v),
        Resolved::Projection(_) => true,
        Resolved::Missing => false,
    }
}

/// Arrays flatten to their comma-joined elements, mappings to a fixed tag.
pub(crate) fn value_primitive(v: &Value) -> Primitive {
    match v {
        Value::Null => Primitive::Null,
        Value::Bool(b) => Primitive::Bool(*b),
        Value::Number(n) => Primitive::Number(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => Primitive::Str(s.clone()),
        Value::Array(items) => Primitive::Str(items.iter().map(joined_value).join(",")),
        Value::Object(_) => Primitive::Str(OBJECT_TAG.to_string()),
    }
}

pub(crate) fn to_primitive(r: &Resolved) -> Primitive {
    match r {
        Resolved::Missing => Primitive::Undefined,
        Resolved::Found(v) => value_primitive(v),
        Resolved::Computed(v) => value_primitive(v),
        Resolved::Projection(items) => Primitive::Str(items.iter().map(joined_element).join(",")),
    }
}

// null and missing elements leave an empty slot when joined
fn joined_value(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        other => primitive_to_string(&value_primitive(other)),
    }
}

fn joined_element(r: &Resolved) -> String {
    match r {
        Resolved::Missing => String::new(),
        Resolved::Found(v) => joined_value(v),
        Resolved::Computed(v) => joined_value(v),
        Resolved::Projection(items) => items.iter().map(joined_element).join(","),
    }
}

pub(crate) fn primitive_to_string(p: &Primitive) -> String {
    match p {
        Primitive::Undefined => "undefined".to_string(),
        Primitive::Null => "null".to_string(),
        Primitive::Bool(b) => b.to_string(),
        Primitive::Number(n) => number_to_string(*n),
        Primitive::Str(s) => s.clone(),
    }
}

/// Plain decimals for magnitudes in `[1e-6, 1e21)`, exponent form with an
/// explicit sign (`1e+21`, `1.5e-7`) outside it.
fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let exp = format!("{n:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        }
    } else {
        n.to_string()
    }
}

pub(crate) fn to_number(p: &Primitive) -> f64 {
    match p {
        Primitive::Undefined => f64::NAN,
        Primitive::Null => 0.0,
        Primitive::Bool(b) => bool_to_number(*b),
        Primitive::Number(n) => *n,
        Primitive::Str(s) => string_to_number(s),
    }
}

fn bool_to_number(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

/// Numeric reading of a string: surrounding whitespace is ignored, the empty
/// string is zero, hex literals are accepted, anything unparsable is NaN.
pub(crate) fn string_to_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map(|v| v as f64).unwrap_or(f64::NAN);
    }
    // f64::from_str also takes "inf"/"nan" spellings, which are not numbers here
    if t.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') {
        return f64::NAN;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}

fn primitive_loose_eq(a: &Primitive, b: &Primitive) -> bool {
    use Primitive::*;
    match (a, b) {
        (Undefined | Null, Undefined | Null) => true,
        (Undefined | Null, _) | (_, Undefined | Null) => false,
        (Bool(x), Bool(y)) => x == y,
        (Str(x), Str(y)) => x == y,
        (Number(x), Number(y)) => x == y,
        (Number(x), Str(s)) | (Str(s), Number(x)) => *x == string_to_number(s),
        (Bool(x), other) | (other, Bool(x)) => {
            primitive_loose_eq(&Number(bool_to_number(*x)), other)
        }
    }
}

/// Coercing equality between a resolved record value and a literal.
///
/// Two compound values compare structurally. Otherwise both sides are
/// reduced to primitives: `null` only equals `null`, booleans become 0/1,
/// and a number against a string compares the string's numeric reading.
pub fn loose_eq(left: &Resolved, right: &Value) -> bool {
    if is_compound_resolved(left) && is_compound(right) {
        return strict_eq(left, right);
    }
    primitive_loose_eq(&to_primitive(left), &value_primitive(right))
}

/// Equality without coercion. Numbers compare by value (`1 == 1.0`),
/// arrays and mappings compare structurally, a missing value equals nothing.
pub fn strict_eq(left: &Resolved, right: &Value) -> bool {
    match left {
        Resolved::Missing => false,
        Resolved::Found(v) => values_strict_eq(v, right),
        Resolved::Computed(v) => values_strict_eq(v, right),
        Resolved::Projection(items) => match right {
            Value::Array(other) => {
                items.len() == other.len()
                    && items.iter().zip(other).all(|(l, r)| strict_eq(l, r))
            }
            _ => false,
        },
    }
}

fn values_strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(fx), Some(fy)) => fx == fy,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_strict_eq(x, y))
        }
        (Value::Object(xm), Value::Object(ym)) => {
            xm.len() == ym.len()
                && xm
                    .iter()
                    .all(|(k, x)| ym.get(k).is_some_and(|y| values_strict_eq(x, y)))
        }
        _ => a == b,
    }
}

/// Ordering of a record value against an operand, or `None` when the two
/// are not comparable (either side has no numeric reading).
///
/// Two strings compare by UTF-16 code units; everything else compares as
/// numbers.
pub fn compare(left: &Resolved, right: &Value) -> Option<Ordering> {
    let l = to_primitive(left);
    let r = value_primitive(right);
    if let (Primitive::Str(a), Primitive::Str(b)) = (&l, &r) {
        return Some(a.encode_utf16().cmp(b.encode_utf16()));
    }
    to_number(&l).partial_cmp(&to_number(&r))
}

/// Apply `pred_on_ord` to the ordering of `a` against `b`; incomparable
/// values never satisfy an ordering modifier.
pub fn cmp_values<F>(a: &Resolved, b: &Value, pred_on_ord: F) -> bool
where
    F: Fn(Ordering) -> bool,
{
    compare(a, b).is_some_and(pred_on_ord)
}
