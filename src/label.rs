//! Comparable label values extracted from annotation features.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::position::SpanTarget;

/// The value an annotator assigned for one feature at one position.
///
/// `Null` stands for "no value": the feature is unset, unknown to the schema,
/// or the annotator has no instance there.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LabelValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Span(SpanTarget),
    /// Sorted labels of a multi-valued feature
    Multi(Vec<LabelValue>),
}

impl LabelValue {
    pub fn is_null(&self) -> bool {
        matches!(self, LabelValue::Null)
    }

    /// Build a multi-value, sorted so that filler order does not matter.
    pub fn multi(mut values: Vec<LabelValue>) -> Self {
        values.sort();
        LabelValue::Multi(values)
    }
}

impl Default for LabelValue {
    fn default() -> Self {
        LabelValue::Null
    }
}

impl fmt::Display for LabelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelValue::Null => f.write_str("<null>"),
            LabelValue::Bool(value) => write!(f, "{}", value),
            LabelValue::Int(value) => write!(f, "{}", value),
            LabelValue::Str(value) => f.write_str(value),
            LabelValue::Span(target) => write!(f, "{}", target),
            LabelValue::Multi(values) => {
                f.write_str("[")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
        }
    }
}
