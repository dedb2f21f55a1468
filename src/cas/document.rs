//! Per-annotator annotation documents.
//!
//! An [`AnnotationDocument`] is the read-only snapshot the diff consumes: the
//! annotations one annotator produced on one source document, in the order
//! they were created. Identifiers are handed out in insertion order, so
//! comparing two [`AnnotationId`]s compares their arrival order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an annotation within its document (insertion index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnnotationId(pub u32);

impl AnnotationId {
    /// Id for the annotation stored at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` does not fit in a `u32`.
    pub fn from_index(index: usize) -> Self {
        AnnotationId(u32::try_from(index).expect("a document holds at most u32::MAX annotations"))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// One filler of a slot feature: a role name pointing at another annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub role: String,
    pub target: AnnotationId,
}

impl LinkEntry {
    pub fn new(role: impl Into<String>, target: AnnotationId) -> Self {
        Self {
            role: role.into(),
            target,
        }
    }
}

/// Value of a named feature on an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureValue {
    Str(String),
    Int(i64),
    Bool(bool),
    /// Reference to another annotation in the same document
    Ref(AnnotationId),
    /// Multi-valued slot feature
    Links(Vec<LinkEntry>),
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Str(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Str(value)
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        FeatureValue::Int(value)
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Bool(value)
    }
}

impl From<AnnotationId> for FeatureValue {
    fn from(value: AnnotationId) -> Self {
        FeatureValue::Ref(value)
    }
}

/// A typed annotation covering `begin..end` (character offsets).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub type_name: String,
    pub begin: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, FeatureValue>,
}

impl Annotation {
    pub fn feature(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(name)
    }

    /// Slot fillers of a link feature, empty when the feature is unset or not a link.
    pub fn links(&self, name: &str) -> &[LinkEntry] {
        match self.features.get(name) {
            Some(FeatureValue::Links(links)) => links,
            _ => &[],
        }
    }

    /// Target of a reference feature such as a relation endpoint.
    pub fn reference(&self, name: &str) -> Option<AnnotationId> {
        match self.features.get(name) {
            Some(FeatureValue::Ref(id)) => Some(*id),
            _ => None,
        }
    }
}

/// All annotations one annotator made on one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    annotations: Vec<Annotation>,
}

impl AnnotationDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the source text. Offsets are not validated against it.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Covered text of an annotation, if the document carries its text.
    pub fn covered_text(&self, annotation: &Annotation) -> Option<&str> {
        self.text
            .as_deref()
            .and_then(|text| text.get(annotation.begin..annotation.end))
    }

    pub fn add_span(&mut self, type_name: impl Into<String>, begin: usize, end: usize) -> AnnotationId {
        let id = AnnotationId::from_index(self.annotations.len());
        self.annotations.push(Annotation {
            id,
            type_name: type_name.into(),
            begin,
            end,
            features: BTreeMap::new(),
        });
        id
    }

    /// Add a relation between two existing annotations.
    ///
    /// The relation covers the offsets of its dependent, the usual convention
    /// for dependency-style relations. Returns `None` and adds nothing when
    /// either endpoint is not in this document.
    pub fn add_relation(
        &mut self,
        type_name: impl Into<String>,
        governor_feature: &str,
        governor: AnnotationId,
        dependent_feature: &str,
        dependent: AnnotationId,
    ) -> Option<AnnotationId> {
        self.get(governor)?;
        let (begin, end) = self
            .get(dependent)
            .map(|annotation| (annotation.begin, annotation.end))?;
        let id = self.add_span(type_name, begin, end);
        self.set_feature(id, governor_feature, governor);
        self.set_feature(id, dependent_feature, dependent);
        Some(id)
    }

    pub fn set_feature(
        &mut self,
        id: AnnotationId,
        name: &str,
        value: impl Into<FeatureValue>,
    ) -> &mut Self {
        if let Some(annotation) = self.annotations.get_mut(id.index()) {
            annotation.features.insert(name.to_string(), value.into());
        }
        self
    }

    /// Append a slot filler to a link feature, creating the feature if needed.
    pub fn add_link(
        &mut self,
        id: AnnotationId,
        feature: &str,
        role: impl Into<String>,
        target: AnnotationId,
    ) -> &mut Self {
        if let Some(annotation) = self.annotations.get_mut(id.index()) {
            let entry = LinkEntry::new(role, target);
            match annotation.features.get_mut(feature) {
                Some(FeatureValue::Links(links)) => links.push(entry),
                _ => {
                    annotation
                        .features
                        .insert(feature.to_string(), FeatureValue::Links(vec![entry]));
                }
            }
        }
        self
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(id.index())
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Annotations of one type in arrival order.
    pub fn select<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.annotations
            .iter()
            .filter(move |annotation| annotation.type_name == type_name)
    }

    /// Stack rank of every annotation, indexed by [`AnnotationId::index`].
    ///
    /// The rank counts same-type annotations created earlier at identical
    /// offsets, so the first-created instance of a stack has rank zero.
    pub fn stack_ranks(&self) -> Vec<usize> {
        let mut seen: BTreeMap<(&str, usize, usize), usize> = BTreeMap::new();
        self.annotations
            .iter()
            .map(|annotation| {
                let count = seen
                    .entry((annotation.type_name.as_str(), annotation.begin, annotation.end))
                    .or_insert(0);
                let rank = *count;
                *count += 1;
                rank
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
