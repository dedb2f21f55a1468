//! Annotator-independent identity of "where" an annotation sits.
//!
//! A [`Position`] is computed from types, offsets and slot ordinals only, so
//! two annotators' instances of the same unit land on equal positions. The
//! derived ordering is total and is what gives diff output a stable order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cas::Annotation;

/// Offset-derived identity of a span, used for relation endpoints and link targets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpanTarget {
    pub begin: usize,
    pub end: usize,
    pub type_name: String,
}

impl SpanTarget {
    pub fn new(type_name: impl Into<String>, begin: usize, end: usize) -> Self {
        Self {
            begin,
            end,
            type_name: type_name.into(),
        }
    }

    pub fn of(annotation: &Annotation) -> Self {
        Self::new(annotation.type_name.clone(), annotation.begin, annotation.end)
    }
}

impl fmt::Display for SpanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}-{}]", self.type_name, self.begin, self.end)
    }
}

/// What a position is anchored on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Anchor {
    Span { begin: usize, end: usize },
    Relation { dependent: SpanTarget, governor: SpanTarget },
}

/// Sub-position introduced by the `index`-th filler of a slot feature.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkSlot {
    pub feature: String,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Index of the source document in the per-annotator document lists
    pub doc: usize,
    pub type_name: String,
    pub anchor: Anchor,
    /// `None` for the host annotation itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<LinkSlot>,
}

impl Position {
    pub fn span(doc: usize, type_name: impl Into<String>, begin: usize, end: usize) -> Self {
        Self {
            doc,
            type_name: type_name.into(),
            anchor: Anchor::Span { begin, end },
            slot: None,
        }
    }

    pub fn relation(
        doc: usize,
        type_name: impl Into<String>,
        governor: SpanTarget,
        dependent: SpanTarget,
    ) -> Self {
        Self {
            doc,
            type_name: type_name.into(),
            anchor: Anchor::Relation {
                dependent,
                governor,
            },
            slot: None,
        }
    }

    /// Sub-position for the `index`-th slot of `feature` on this host.
    pub fn with_slot(&self, feature: impl Into<String>, index: usize) -> Self {
        Self {
            slot: Some(LinkSlot {
                feature: feature.into(),
                index,
            }),
            ..self.clone()
        }
    }

    /// The host position a slot sub-position belongs to.
    pub fn host(&self) -> Self {
        Self {
            slot: None,
            ..self.clone()
        }
    }

    pub fn is_link_position(&self) -> bool {
        self.slot.is_some()
    }

    pub fn link_feature(&self) -> Option<&str> {
        self.slot.as_ref().map(|slot| slot.feature.as_str())
    }

    /// Offsets of a span-anchored position.
    pub fn span_offsets(&self) -> Option<(usize, usize)> {
        match self.anchor {
            Anchor::Span { begin, end } => Some((begin, end)),
            Anchor::Relation { .. } => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.doc, self.type_name)?;
        match &self.anchor {
            Anchor::Span { begin, end } => write!(f, "[{}-{}]", begin, end)?,
            Anchor::Relation {
                dependent,
                governor,
            } => write!(f, "[{} -> {}]", governor, dependent)?,
        }
        if let Some(slot) = &self.slot {
            write!(f, " {}#{}", slot.feature, slot.index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_offsets_give_equal_positions() {
        assert_eq!(Position::span(0, "POS", 4, 9), Position::span(0, "POS", 4, 9));
        assert_ne!(Position::span(0, "POS", 4, 9), Position::span(0, "POS", 4, 10));
        assert_ne!(Position::span(0, "POS", 4, 9), Position::span(1, "POS", 4, 9));
        assert_ne!(Position::span(0, "POS", 4, 9), Position::span(0, "Lemma", 4, 9));
    }

    #[test]
    fn zero_length_spans_are_positions() {
        let empty = Position::span(0, "Marker", 7, 7);
        assert_eq!(empty.span_offsets(), Some((7, 7)));
        assert!(empty < Position::span(0, "Marker", 7, 8));
    }

    #[test]
    fn host_sorts_before_its_slots() {
        let host = Position::span(0, "Event", 0, 5);
        let first = host.with_slot("args", 0);
        let second = host.with_slot("args", 1);

        let mut positions = vec![second.clone(), first.clone(), host.clone()];
        positions.sort();
        assert_eq!(positions, vec![host.clone(), first.clone(), second]);
        assert_eq!(first.host(), host);
        assert_eq!(first.link_feature(), Some("args"));
    }

    #[test]
    fn relation_positions_compare_endpoints() {
        let gov = SpanTarget::new("Token", 5, 10);
        let dep = SpanTarget::new("Token", 0, 4);
        let a = Position::relation(0, "Dependency", gov.clone(), dep.clone());
        let b = Position::relation(0, "Dependency", gov.clone(), SpanTarget::new("Token", 11, 15));

        assert_eq!(a, Position::relation(0, "Dependency", gov, dep));
        assert_ne!(a, b);
        assert_eq!(a.span_offsets(), None);
    }

    #[test]
    fn display_is_compact() {
        let host = Position::span(2, "Event", 0, 5);
        assert_eq!(host.to_string(), "#2 Event[0-5]");
        assert_eq!(host.with_slot("args", 1).to_string(), "#2 Event[0-5] args#1");

        let rel = Position::relation(
            0,
            "Dependency",
            SpanTarget::new("Token", 5, 10),
            SpanTarget::new("Token", 0, 4),
        );
        assert_eq!(rel.to_string(), "#0 Dependency[Token[5-10] -> Token[0-4]]");
    }
}
