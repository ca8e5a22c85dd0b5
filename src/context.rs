use serde::{Deserialize, Serialize};

/// Evaluation knobs shared by every call made through an `Evaluator`.
///
/// Deserializable so a host can keep it next to its criteria documents;
/// missing fields take their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    /// How deep `and`/`or` combinators may nest before evaluation bails out.
    /// Unbounded when `None`.
    pub max_depth: Option<usize>,
}

impl Context {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
