//! Stimulus input normalization.
//!
//! Evaluation accepts a single stimulus or an ordered batch; both are
//! normalized into a uniform sequence before traversal.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One stimulus or an ordered batch of stimuli.
///
/// Deserializes untagged: a JSON sequence becomes a batch, any other value a
/// single stimulus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stimuli {
    Batch(Vec<Value>),
    Single(Value),
}

impl Stimuli {
    /// Normalize into a uniform sequence (a single value becomes a
    /// one-element batch).
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            Stimuli::Single(value) => vec![value],
            Stimuli::Batch(values) => values,
        }
    }
}

impl From<Value> for Stimuli {
    fn from(value: Value) -> Self {
        Stimuli::Single(value)
    }
}

impl From<Vec<Value>> for Stimuli {
    fn from(values: Vec<Value>) -> Self {
        Stimuli::Batch(values)
    }
}

impl From<&str> for Stimuli {
    fn from(value: &str) -> Self {
        Stimuli::Single(Value::String(value.to_string()))
    }
}

impl From<String> for Stimuli {
    fn from(value: String) -> Self {
        Stimuli::Single(Value::String(value))
    }
}
