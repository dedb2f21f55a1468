//! Link-compare policy for multi-valued slot features.

use serde::{Deserialize, Serialize};

use crate::label::LabelValue;
use crate::position::SpanTarget;

/// Selects which half of a slot filler is compared as its label.
///
/// The policy also fixes the canonical order in which fillers are assigned to
/// slot sub-positions: fillers are ordered by their label first, so two hosts
/// with the same multiset of labels line up ordinal by ordinal whatever the
/// uncompared half says. The number of sub-positions per host is the same
/// under both policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkCompareBehavior {
    /// The target a slot points at is the label; the role is ignored.
    #[default]
    LinkTargetAsLabel,
    /// The role name is the label; the target is ignored.
    LinkRoleAsLabel,
}

impl LinkCompareBehavior {
    /// Label of one slot filler.
    pub fn slot_label(self, role: &str, target: Option<&SpanTarget>) -> LabelValue {
        match self {
            LinkCompareBehavior::LinkTargetAsLabel => target
                .cloned()
                .map(LabelValue::Span)
                .unwrap_or(LabelValue::Null),
            LinkCompareBehavior::LinkRoleAsLabel => LabelValue::Str(role.to_string()),
        }
    }

    /// Sort fillers into the canonical slot order for this policy: by label,
    /// then by the ignored half.
    pub fn canonical_order(self, fillers: &mut [(String, Option<SpanTarget>)]) {
        match self {
            LinkCompareBehavior::LinkTargetAsLabel => {
                fillers.sort_by(|a, b| (&a.1, &a.0).cmp(&(&b.1, &b.0)))
            }
            LinkCompareBehavior::LinkRoleAsLabel => fillers.sort(),
        }
    }
}
