use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{trace, warn};

use crate::comparison::{cmp_values, primitive_to_string, strict_eq, to_primitive, value_kind};
use crate::context::Context;
use crate::errors::{EvalError, Result};
use crate::path::Resolved;

/// The closed set of operators a criterion mapping can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Gt,
    Lt,
    Gte,
    Lte,
    In,
    And,
    Or,
}

static MODIFIER_TABLE: [(&str, Modifier); 7] = [
    ("gt", Modifier::Gt),
    ("lt", Modifier::Lt),
    ("gte", Modifier::Gte),
    ("lte", Modifier::Lte),
    ("in", Modifier::In),
    ("and", Modifier::And),
    ("or", Modifier::Or),
];

impl Modifier {
    pub fn all() -> impl Iterator<Item = Modifier> {
        MODIFIER_TABLE.iter().map(|(_, m)| *m)
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        MODIFIER_TABLE
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, m)| *m)
    }

    pub fn tag(self) -> &'static str {
        match self {
            Modifier::Gt => "gt",
            Modifier::Lt => "lt",
            Modifier::Gte => "gte",
            Modifier::Lte => "lte",
            Modifier::In => "in",
            Modifier::And => "and",
            Modifier::Or => "or",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Modifier {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        Modifier::from_tag(s).ok_or_else(|| EvalError::UnknownModifier(s.to_string()))
    }
}

/// Apply a criterion mapping such as `{"gt": 5}` to an already resolved value.
///
/// Only the first entry counts; any further entries are ignored.
pub(crate) fn apply_criteria(
    value: &Resolved,
    criterion: &Map<String, Value>,
    ctx: &Context,
    depth: usize,
) -> Result<bool> {
    let (tag, operand) = criterion.iter().next().ok_or(EvalError::EmptyCriterion)?;
    if criterion.len() > 1 {
        warn!(
            modifier = %tag,
            ignored = %criterion.keys().skip(1).join(", "),
            "criterion mapping has extra entries; only the first is applied"
        );
    }
    apply_entry(tag, operand, value, ctx, depth)
}

fn apply_entry(
    tag: &str,
    operand: &Value,
    value: &Resolved,
    ctx: &Context,
    depth: usize,
) -> Result<bool> {
    let modifier: Modifier = tag.parse()?;
    let outcome = match modifier {
        Modifier::Gt => cmp_values(value, operand, |o| o == Ordering::Greater),
        Modifier::Lt => cmp_values(value, operand, |o| o == Ordering::Less),
        Modifier::Gte => cmp_values(value, operand, |o| o != Ordering::Less),
        Modifier::Lte => cmp_values(value, operand, |o| o != Ordering::Greater),
        Modifier::In => contained_in(value, operand)?,
        Modifier::And | Modifier::Or => combine(modifier, value, operand, ctx, depth)?,
    };
    trace!(%modifier, %operand, outcome, "applied modifier");
    Ok(outcome)
}

/// `and`/`or`: every entry of the operand mapping is applied to the same
/// value, nothing is re-resolved through the record.
fn combine(
    modifier: Modifier,
    value: &Resolved,
    operand: &Value,
    ctx: &Context,
    depth: usize,
) -> Result<bool> {
    if let Some(max_depth) = ctx.max_depth {
        if depth >= max_depth {
            return Err(EvalError::DepthExceeded(max_depth));
        }
    }
    let fragment = operand.as_object().ok_or_else(|| EvalError::InvalidOperand {
        modifier,
        reason: format!("expected a mapping, got {}", value_kind(operand)),
    })?;
    for (tag, sub) in fragment {
        let passed = apply_entry(tag, sub, value, ctx, depth + 1)?;
        match modifier {
            Modifier::And if !passed => return Ok(false),
            Modifier::Or if passed => return Ok(true),
            _ => {}
        }
    }
    Ok(modifier == Modifier::And)
}

/// `in`: a sequence value passes when any of its elements is in the operand.
fn contained_in(value: &Resolved, operand: &Value) -> Result<bool> {
    let is_member = |candidate: &Resolved| -> Result<bool> {
        match operand {
            Value::Array(options) => Ok(options.iter().any(|o| strict_eq(candidate, o))),
            Value::String(haystack) => {
                Ok(haystack.contains(primitive_to_string(&to_primitive(candidate)).as_str()))
            }
            other => Err(EvalError::InvalidOperand {
                modifier: Modifier::In,
                reason: format!("expected an array or string, got {}", value_kind(other)),
            }),
        }
    };
    if value.is_sequence() {
        for element in value.elements() {
            if is_member(&element)? {
                return Ok(true);
            }
        }
        Ok(false)
    } else {
        is_member(value)
    }
}
