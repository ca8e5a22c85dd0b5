pub mod context;
pub mod errors;
pub mod modifier;
mod comparison;
mod path;

use serde_json::Value;
use tracing::debug;

use comparison::{loose_eq, strict_eq, value_kind};

pub use context::Context;
pub use errors::{EvalError, Result};
pub use modifier::Modifier;

/// Decides whether a record (a cart, an order, ...) satisfies a criteria
/// document.
///
/// A criteria document maps dotted paths to either a literal or a single
/// entry modifier mapping:
///
/// ```
/// use serde_json::json;
///
/// let cart = json!({"total": 120, "items": [{"sku": "A"}, {"sku": "B"}]});
/// let criteria = json!({"total": {"gt": 100}, "items.sku": "B"});
/// assert!(cart_eligibility::is_eligible(&cart, &criteria).unwrap());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Evaluator {
    ctx: Context,
}

impl Evaluator {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Every top-level entry must pass; the first failing entry stops the
    /// walk. A path that is missing (or `null`) in the record fails its entry.
    pub fn is_eligible(&self, record: &Value, criteria: &Value) -> Result<bool> {
        let criteria = criteria.as_object().ok_or_else(|| {
            EvalError::InvalidCriteria(format!("expected a mapping, got {}", value_kind(criteria)))
        })?;

        for (key, expected) in criteria {
            let resolved = path::resolve(key, record);
            if resolved.is_absent() {
                debug!(path = %key, "value missing from record");
                return Ok(false);
            }

            let passed = match expected {
                Value::Object(criterion) => {
                    modifier::apply_criteria(&resolved, criterion, &self.ctx, 0)?
                }
                literal if resolved.is_sequence() => resolved
                    .elements()
                    .iter()
                    .any(|element| strict_eq(element, literal)),
                literal => loose_eq(&resolved, literal),
            };

            if !passed {
                debug!(path = %key, %expected, "criterion not satisfied");
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Convenience: evaluate with the default context.
pub fn is_eligible(record: &Value, criteria: &Value) -> Result<bool> {
    Evaluator::default().is_eligible(record, criteria)
}
