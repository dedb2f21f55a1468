//! Per annotation-kind strategies for deriving positions and labels.
//!
//! The set of kinds is closed: [`DiffAdapter`] is either a span adapter or a
//! relation adapter, and the alignment engine matches on it exhaustively.
//! Feature names are resolved against the [`TypeSchema`] when an adapter is
//! built; features the schema does not declare are remembered and always
//! compare as [`LabelValue::Null`].

use std::collections::BTreeSet;

use tracing::warn;

use crate::cas::{Annotation, AnnotationDocument, FeatureValue, RelationEndpoints, TypeSchema};
use crate::errors::DiffError;
use crate::label::LabelValue;
use crate::link_compare::LinkCompareBehavior;
use crate::position::{Position, SpanTarget};

/// One slot filler expanded into its own sub-position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedSlot {
    pub position: Position,
    pub role: String,
    pub target: Option<SpanTarget>,
    /// Label under the active link-compare policy
    pub label: LabelValue,
}

#[derive(Debug, Clone)]
pub enum DiffAdapter {
    Span(SpanDiffAdapter),
    Relation(RelationDiffAdapter),
}

impl DiffAdapter {
    /// Build the adapter kind the schema calls for.
    ///
    /// Relation schemas get a relation adapter, which does not support link
    /// features.
    pub fn for_type(
        schema: &TypeSchema,
        label_features: &[&str],
        link_features: &[&str],
    ) -> Result<Self, DiffError> {
        if schema.is_relation() {
            if let Some(feature) = link_features.first() {
                return Err(DiffError::UnknownLinkFeature {
                    type_name: schema.name.clone(),
                    feature: feature.to_string(),
                });
            }
            RelationDiffAdapter::new(schema, label_features).map(DiffAdapter::Relation)
        } else {
            SpanDiffAdapter::new(schema, label_features, link_features).map(DiffAdapter::Span)
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            DiffAdapter::Span(adapter) => &adapter.type_name,
            DiffAdapter::Relation(adapter) => &adapter.type_name,
        }
    }

    /// Features compared at host positions.
    pub fn label_features(&self) -> &[String] {
        match self {
            DiffAdapter::Span(adapter) => &adapter.label_features,
            DiffAdapter::Relation(adapter) => &adapter.label_features,
        }
    }

    /// Slot features expanded into sub-positions.
    pub fn link_features(&self) -> &[String] {
        match self {
            DiffAdapter::Span(adapter) => &adapter.link_features,
            DiffAdapter::Relation(_) => &[],
        }
    }

    pub fn is_link_feature(&self, feature: &str) -> bool {
        self.link_features().iter().any(|name| name == feature)
    }

    /// Position of an annotation in document `doc`.
    ///
    /// `None` for relations whose endpoints cannot be resolved.
    pub fn extract_position(
        &self,
        doc: usize,
        annotation: &Annotation,
        document: &AnnotationDocument,
    ) -> Option<Position> {
        match self {
            DiffAdapter::Span(adapter) => Some(adapter.position(doc, annotation)),
            DiffAdapter::Relation(adapter) => adapter.position(doc, annotation, document),
        }
    }

    /// Label of `feature` on an annotation; multi-valued for slot features.
    pub fn extract_label(
        &self,
        annotation: &Annotation,
        document: &AnnotationDocument,
        feature: &str,
        link_compare: LinkCompareBehavior,
    ) -> LabelValue {
        let undeclared = match self {
            DiffAdapter::Span(adapter) => &adapter.undeclared,
            DiffAdapter::Relation(adapter) => &adapter.undeclared,
        };
        if undeclared.contains(feature) {
            return LabelValue::Null;
        }
        feature_label(annotation, document, feature, link_compare)
    }

    /// Sub-positions for every filler of every configured slot feature.
    pub fn expand_link_features(
        &self,
        annotation: &Annotation,
        document: &AnnotationDocument,
        host: &Position,
        link_compare: LinkCompareBehavior,
    ) -> Vec<ExpandedSlot> {
        match self {
            DiffAdapter::Span(adapter) => adapter.expand(annotation, document, host, link_compare),
            DiffAdapter::Relation(_) => Vec::new(),
        }
    }

    /// Endpoint instances of a relation, `None` for spans.
    pub fn endpoints_of<'d>(
        &self,
        annotation: &Annotation,
        document: &'d AnnotationDocument,
    ) -> Option<(&'d Annotation, &'d Annotation)> {
        match self {
            DiffAdapter::Span(_) => None,
            DiffAdapter::Relation(adapter) => adapter.endpoints_of(annotation, document),
        }
    }
}

impl From<SpanDiffAdapter> for DiffAdapter {
    fn from(adapter: SpanDiffAdapter) -> Self {
        DiffAdapter::Span(adapter)
    }
}

impl From<RelationDiffAdapter> for DiffAdapter {
    fn from(adapter: RelationDiffAdapter) -> Self {
        DiffAdapter::Relation(adapter)
    }
}

/// Adapter for span annotations, position `(type, begin, end)`.
#[derive(Debug, Clone)]
pub struct SpanDiffAdapter {
    type_name: String,
    label_features: Vec<String>,
    link_features: Vec<String>,
    undeclared: BTreeSet<String>,
}

impl SpanDiffAdapter {
    pub fn new(
        schema: &TypeSchema,
        label_features: &[&str],
        link_features: &[&str],
    ) -> Result<Self, DiffError> {
        let mut links = Vec::new();
        for &feature in link_features {
            if schema.link_feature(feature).is_none() {
                return Err(DiffError::UnknownLinkFeature {
                    type_name: schema.name.clone(),
                    feature: feature.to_string(),
                });
            }
            if label_features.contains(&feature) {
                return Err(DiffError::AmbiguousFeature {
                    type_name: schema.name.clone(),
                    feature: feature.to_string(),
                });
            }
            push_unique(&mut links, feature);
        }

        let (labels, undeclared) = resolve_label_features(schema, label_features);
        Ok(Self {
            type_name: schema.name.clone(),
            label_features: labels,
            link_features: links,
            undeclared,
        })
    }

    fn position(&self, doc: usize, annotation: &Annotation) -> Position {
        Position::span(doc, self.type_name.clone(), annotation.begin, annotation.end)
    }

    fn expand(
        &self,
        annotation: &Annotation,
        document: &AnnotationDocument,
        host: &Position,
        link_compare: LinkCompareBehavior,
    ) -> Vec<ExpandedSlot> {
        let mut slots = Vec::new();
        for feature in &self.link_features {
            let mut fillers: Vec<(String, Option<SpanTarget>)> = annotation
                .links(feature)
                .iter()
                .map(|link| (link.role.clone(), document.get(link.target).map(SpanTarget::of)))
                .collect();
            link_compare.canonical_order(&mut fillers);

            for (index, (role, target)) in fillers.into_iter().enumerate() {
                let label = link_compare.slot_label(&role, target.as_ref());
                slots.push(ExpandedSlot {
                    position: host.with_slot(feature.clone(), index),
                    role,
                    target,
                    label,
                });
            }
        }
        slots
    }
}

/// Adapter for relations, position `(type, governor, dependent)`.
///
/// Endpoints are resolved through the reference features the schema names.
/// The position only records the endpoints' offsets, so relations attached to
/// different stacked spans at identical offsets share a position.
#[derive(Debug, Clone)]
pub struct RelationDiffAdapter {
    type_name: String,
    endpoints: RelationEndpoints,
    label_features: Vec<String>,
    undeclared: BTreeSet<String>,
}

impl RelationDiffAdapter {
    pub fn new(schema: &TypeSchema, label_features: &[&str]) -> Result<Self, DiffError> {
        let endpoints = schema
            .endpoints()
            .cloned()
            .ok_or_else(|| DiffError::MissingEndpoints {
                type_name: schema.name.clone(),
            })?;

        if let Some(feature) = label_features.iter().find(|f| endpoints.contains(f)) {
            return Err(DiffError::EndpointConflict {
                type_name: schema.name.clone(),
                feature: feature.to_string(),
            });
        }

        let (labels, undeclared) = resolve_label_features(schema, label_features);
        Ok(Self {
            type_name: schema.name.clone(),
            endpoints,
            label_features: labels,
            undeclared,
        })
    }

    pub fn endpoints(&self) -> &RelationEndpoints {
        &self.endpoints
    }

    fn endpoints_of<'d>(
        &self,
        annotation: &Annotation,
        document: &'d AnnotationDocument,
    ) -> Option<(&'d Annotation, &'d Annotation)> {
        let governor = annotation
            .reference(&self.endpoints.governor)
            .and_then(|id| document.get(id))?;
        let dependent = annotation
            .reference(&self.endpoints.dependent)
            .and_then(|id| document.get(id))?;
        Some((governor, dependent))
    }

    fn position(
        &self,
        doc: usize,
        annotation: &Annotation,
        document: &AnnotationDocument,
    ) -> Option<Position> {
        let (governor, dependent) = self.endpoints_of(annotation, document)?;
        Some(Position::relation(
            doc,
            self.type_name.clone(),
            SpanTarget::of(governor),
            SpanTarget::of(dependent),
        ))
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|existing| existing == name) {
        names.push(name.to_string());
    }
}

fn resolve_label_features(
    schema: &TypeSchema,
    label_features: &[&str],
) -> (Vec<String>, BTreeSet<String>) {
    let mut labels = Vec::new();
    let mut undeclared = BTreeSet::new();
    for &feature in label_features {
        if !schema.has_feature(feature) {
            warn!(
                type_name = %schema.name,
                feature,
                "feature not declared in schema; its values compare as null"
            );
            undeclared.insert(feature.to_string());
        }
        push_unique(&mut labels, feature);
    }
    (labels, undeclared)
}

fn feature_label(
    annotation: &Annotation,
    document: &AnnotationDocument,
    feature: &str,
    link_compare: LinkCompareBehavior,
) -> LabelValue {
    match annotation.feature(feature) {
        None => LabelValue::Null,
        Some(FeatureValue::Str(value)) => LabelValue::Str(value.clone()),
        Some(FeatureValue::Int(value)) => LabelValue::Int(*value),
        Some(FeatureValue::Bool(value)) => LabelValue::Bool(*value),
        Some(FeatureValue::Ref(id)) => document
            .get(*id)
            .map(|target| LabelValue::Span(SpanTarget::of(target)))
            .unwrap_or(LabelValue::Null),
        Some(FeatureValue::Links(links)) if links.is_empty() => LabelValue::Null,
        Some(FeatureValue::Links(links)) => LabelValue::multi(
            links
                .iter()
                .map(|link| {
                    let target = document.get(link.target).map(SpanTarget::of);
                    link_compare.slot_label(&link.role, target.as_ref())
                })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_schema() -> TypeSchema {
        TypeSchema::span("Event")
            .with_feature("value")
            .with_link_feature("args", "Entity")
    }

    #[test]
    fn span_position_comes_from_offsets() {
        let adapter = DiffAdapter::for_type(&event_schema(), &["value"], &["args"]).unwrap();
        let mut doc = AnnotationDocument::new();
        let id = doc.add_span("Event", 3, 8);

        let position = adapter.extract_position(1, doc.get(id).unwrap(), &doc);
        assert_eq!(position, Some(Position::span(1, "Event", 3, 8)));
    }

    #[test]
    fn missing_feature_is_null() {
        let adapter = DiffAdapter::for_type(&event_schema(), &["value", "polarity"], &[]).unwrap();
        let mut doc = AnnotationDocument::new();
        let id = doc.add_span("Event", 0, 4);
        doc.set_feature(id, "polarity", "neg");
        let annotation = doc.get(id).unwrap();

        let policy = LinkCompareBehavior::default();
        assert!(adapter.extract_label(annotation, &doc, "value", policy).is_null());
        // declared on the instance but not in the schema
        assert!(adapter.extract_label(annotation, &doc, "polarity", policy).is_null());
    }

    #[test]
    fn expansion_yields_one_slot_per_filler() {
        let adapter = DiffAdapter::for_type(&event_schema(), &["value"], &["args"]).unwrap();
        let mut doc = AnnotationDocument::new();
        let host = doc.add_span("Event", 0, 4);
        let a = doc.add_span("Entity", 5, 8);
        let b = doc.add_span("Entity", 9, 12);
        doc.add_link(host, "args", "theme", b).add_link(host, "args", "agent", a);

        let annotation = doc.get(host).unwrap();
        let host_pos = adapter.extract_position(0, annotation, &doc).unwrap();
        let slots = adapter.expand_link_features(
            annotation,
            &doc,
            &host_pos,
            LinkCompareBehavior::LinkTargetAsLabel,
        );

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].position, host_pos.with_slot("args", 0));
        assert_eq!(slots[0].role, "agent");
        assert_eq!(slots[0].label, LabelValue::Span(SpanTarget::new("Entity", 5, 8)));
        assert_eq!(slots[1].role, "theme");
    }

    #[test]
    fn relation_position_uses_endpoint_offsets() {
        let schema = TypeSchema::relation("Dependency", "Governor", "Dependent")
            .with_feature("DependencyType");
        let adapter = DiffAdapter::for_type(&schema, &["DependencyType"], &[]).unwrap();

        let mut doc = AnnotationDocument::new();
        let john = doc.add_span("Token", 0, 4);
        let loves = doc.add_span("Token", 5, 10);
        let rel = doc
            .add_relation("Dependency", "Governor", loves, "Dependent", john)
            .unwrap();

        let position = adapter.extract_position(0, doc.get(rel).unwrap(), &doc).unwrap();
        assert_eq!(
            position,
            Position::relation(
                0,
                "Dependency",
                SpanTarget::new("Token", 5, 10),
                SpanTarget::new("Token", 0, 4)
            )
        );
    }

    #[test]
    fn relation_without_endpoints_has_no_position() {
        let schema = TypeSchema::relation("Dependency", "Governor", "Dependent");
        let adapter = DiffAdapter::for_type(&schema, &[], &[]).unwrap();
        let mut doc = AnnotationDocument::new();
        let dangling = doc.add_span("Dependency", 0, 4);

        assert!(adapter.extract_position(0, doc.get(dangling).unwrap(), &doc).is_none());
    }

    #[test]
    fn configuration_errors() {
        let relation = TypeSchema::relation("Dependency", "Governor", "Dependent");
        assert!(matches!(
            RelationDiffAdapter::new(&relation, &["Governor"]),
            Err(DiffError::EndpointConflict { .. })
        ));
        assert!(matches!(
            RelationDiffAdapter::new(&TypeSchema::span("POS"), &[]),
            Err(DiffError::MissingEndpoints { .. })
        ));
        assert!(matches!(
            SpanDiffAdapter::new(&event_schema(), &[], &["value"]),
            Err(DiffError::UnknownLinkFeature { .. })
        ));
        assert!(matches!(
            SpanDiffAdapter::new(&event_schema(), &["args"], &["args"]),
            Err(DiffError::AmbiguousFeature { .. })
        ));
        assert!(matches!(
            DiffAdapter::for_type(&relation, &[], &["args"]),
            Err(DiffError::UnknownLinkFeature { .. })
        ));
    }
}
