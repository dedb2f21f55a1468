//! Alignment of annotations across annotators.
//!
//! [`CasDiff`] scans every annotator's documents, maps each annotation (and
//! each slot filler of a configured link feature) to a [`Position`], and
//! groups the resulting configurations by position. A run is a pure function
//! of its input: all intermediate state lives in the call, and ordered maps
//! keep the output independent of hash or arrival order.
//!
//! ## Example
//!
//! ```
//! use layered_diff::{
//!     AnnotationDocument, AnnotatorDocuments, CasDiff, DiffAdapter, LinkCompareBehavior,
//!     TypeSchema,
//! };
//!
//! let schema = TypeSchema::span("POS").with_feature("PosValue");
//! let adapter = DiffAdapter::for_type(&schema, &["PosValue"], &[]).unwrap();
//! let diff = CasDiff::new(&["POS"], vec![adapter], LinkCompareBehavior::default()).unwrap();
//!
//! let mut alice = AnnotationDocument::new();
//! let token = alice.add_span("POS", 0, 4);
//! alice.set_feature(token, "PosValue", "NN");
//! let bob = alice.clone();
//!
//! let mut documents = AnnotatorDocuments::new();
//! documents.insert("alice".to_string(), vec![Some(alice)]);
//! documents.insert("bob".to_string(), vec![Some(bob)]);
//!
//! let result = diff.run(&documents);
//! assert_eq!(result.size(), 1);
//! assert!(result.differing_sets().is_empty());
//! ```

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace, warn};

use crate::adapter::DiffAdapter;
use crate::cas::{Annotation, AnnotationDocument, AnnotationId};
use crate::diff_result::{
    AnnotationRef, Configuration, ConfigurationSet, DiffResult, EndpointResolution, SlotFiller,
};
use crate::errors::DiffError;
use crate::link_compare::LinkCompareBehavior;
use crate::position::Position;

/// Per-annotator document lists; index `i` in every list is the same source document.
///
/// `None` marks a document the annotator has no data for.
pub type AnnotatorDocuments = BTreeMap<String, Vec<Option<AnnotationDocument>>>;

/// A configured diff: which types to align, how, and under which link policy.
#[derive(Debug, Clone)]
pub struct CasDiff {
    entry_types: Vec<String>,
    adapters: BTreeMap<String, DiffAdapter>,
    link_compare: LinkCompareBehavior,
}

impl CasDiff {
    /// Every entry type needs exactly one adapter; adapters for other types are kept unused.
    pub fn new(
        entry_types: &[&str],
        adapters: Vec<DiffAdapter>,
        link_compare: LinkCompareBehavior,
    ) -> Result<Self, DiffError> {
        let mut by_type = BTreeMap::new();
        for adapter in adapters {
            let type_name = adapter.type_name().to_string();
            if by_type.insert(type_name.clone(), adapter).is_some() {
                return Err(DiffError::DuplicateAdapter { type_name });
            }
        }

        let mut types: Vec<String> = Vec::new();
        for &type_name in entry_types {
            if !by_type.contains_key(type_name) {
                return Err(DiffError::MissingAdapter {
                    type_name: type_name.to_string(),
                });
            }
            if !types.iter().any(|existing| existing == type_name) {
                types.push(type_name.to_string());
            }
        }

        Ok(Self {
            entry_types: types,
            adapters: by_type,
            link_compare,
        })
    }

    pub fn entry_types(&self) -> &[String] {
        &self.entry_types
    }

    pub fn adapter(&self, type_name: &str) -> Option<&DiffAdapter> {
        self.adapters.get(type_name)
    }

    pub fn link_compare(&self) -> LinkCompareBehavior {
        self.link_compare
    }

    /// Same diff with another link-compare policy.
    pub fn with_link_compare(mut self, link_compare: LinkCompareBehavior) -> Self {
        self.link_compare = link_compare;
        self
    }

    /// Align all documents and group them into configuration sets.
    pub fn run(&self, documents: &AnnotatorDocuments) -> DiffResult {
        let mut groups: BTreeMap<Position, Vec<Configuration>> = BTreeMap::new();
        let mut coverage: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();

        for (annotator, docs) in documents {
            for (doc_idx, document) in docs.iter().enumerate() {
                let document = match document {
                    Some(document) => document,
                    None => continue,
                };
                coverage
                    .entry(doc_idx)
                    .or_default()
                    .insert(annotator.clone());

                let source = SourceDocument {
                    annotator,
                    doc: doc_idx,
                    document,
                    stack_ranks: document.stack_ranks(),
                };
                for type_name in &self.entry_types {
                    let adapter = &self.adapters[type_name];
                    for annotation in document.select(type_name) {
                        self.emit(adapter, &source, annotation, &mut groups);
                    }
                }
            }
        }

        let sets: Vec<ConfigurationSet> = groups
            .into_iter()
            .map(|(position, configurations)| {
                let features = self.compared_features(&position);
                ConfigurationSet::new(position, features, configurations)
            })
            .collect();

        let result = DiffResult::new(
            documents.keys().cloned().collect(),
            coverage,
            self.link_compare,
            sets,
        );

        debug!(
            annotators = result.annotators().len(),
            entry_types = ?self.entry_types,
            link_compare = ?self.link_compare,
            sets = result.size(),
            differing = result.differing_sets().len(),
            incomplete = result.incomplete_sets().len(),
            "diff complete"
        );

        result
    }

    fn compared_features(&self, position: &Position) -> Vec<String> {
        match position.link_feature() {
            Some(feature) => vec![feature.to_string()],
            None => self
                .adapters
                .get(&position.type_name)
                .map(|adapter| adapter.label_features().to_vec())
                .unwrap_or_default(),
        }
    }

    fn emit(
        &self,
        adapter: &DiffAdapter,
        source_doc: &SourceDocument<'_>,
        annotation: &Annotation,
        groups: &mut BTreeMap<Position, Vec<Configuration>>,
    ) {
        let SourceDocument {
            annotator,
            doc: doc_idx,
            document,
            ..
        } = *source_doc;
        let position = match adapter.extract_position(doc_idx, annotation, document) {
            Some(position) => position,
            None => {
                warn!(
                    annotator,
                    doc = doc_idx,
                    annotation = %annotation.id,
                    type_name = %annotation.type_name,
                    "relation endpoints do not resolve; annotation skipped"
                );
                return;
            }
        };

        let source = AnnotationRef {
            doc: doc_idx,
            id: annotation.id,
        };
        let stack_rank = source_doc.stack_rank(annotation.id);

        for slot in adapter.expand_link_features(annotation, document, &position, self.link_compare) {
            trace!(annotator, position = %slot.position, role = %slot.role, "slot filler");
            let feature = slot
                .position
                .link_feature()
                .unwrap_or_default()
                .to_string();
            let mut labels = BTreeMap::new();
            labels.insert(feature, slot.label);
            groups.entry(slot.position).or_default().push(Configuration {
                annotator: annotator.to_string(),
                source,
                stack_rank,
                slot: Some(SlotFiller {
                    role: slot.role,
                    target: slot.target,
                }),
                endpoints: None,
                labels,
            });
        }

        let endpoints = adapter
            .endpoints_of(annotation, document)
            .map(|(governor, dependent)| EndpointResolution {
                governor: AnnotationRef {
                    doc: doc_idx,
                    id: governor.id,
                },
                governor_stack_rank: source_doc.stack_rank(governor.id),
                dependent: AnnotationRef {
                    doc: doc_idx,
                    id: dependent.id,
                },
                dependent_stack_rank: source_doc.stack_rank(dependent.id),
            });

        let labels = adapter
            .label_features()
            .iter()
            .map(|feature| {
                let label = adapter.extract_label(annotation, document, feature, self.link_compare);
                (feature.clone(), label)
            })
            .collect();

        groups.entry(position).or_default().push(Configuration {
            annotator: annotator.to_string(),
            source,
            stack_rank,
            slot: None,
            endpoints,
            labels,
        });
    }
}

/// One annotator's document being scanned, with its stack ranks computed once.
struct SourceDocument<'a> {
    annotator: &'a str,
    doc: usize,
    document: &'a AnnotationDocument,
    stack_ranks: Vec<usize>,
}

impl SourceDocument<'_> {
    fn stack_rank(&self, id: AnnotationId) -> usize {
        self.stack_ranks.get(id.index()).copied().unwrap_or(0)
    }
}

/// One-shot diff: configure and run in a single call.
pub fn do_diff(
    entry_types: &[&str],
    adapters: Vec<DiffAdapter>,
    link_compare: LinkCompareBehavior,
    documents: &AnnotatorDocuments,
) -> Result<DiffResult, DiffError> {
    CasDiff::new(entry_types, adapters, link_compare).map(|diff| diff.run(documents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cas::TypeSchema;

    fn pos_adapter() -> DiffAdapter {
        DiffAdapter::for_type(&TypeSchema::span("POS").with_feature("PosValue"), &["PosValue"], &[])
            .unwrap()
    }

    #[test]
    fn every_entry_type_needs_an_adapter() {
        let err = CasDiff::new(&["POS", "Lemma"], vec![pos_adapter()], LinkCompareBehavior::default())
            .unwrap_err();
        assert!(matches!(err, DiffError::MissingAdapter { ref type_name } if type_name == "Lemma"));
    }

    #[test]
    fn duplicate_adapters_are_rejected() {
        let err = CasDiff::new(
            &["POS"],
            vec![pos_adapter(), pos_adapter()],
            LinkCompareBehavior::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DiffError::DuplicateAdapter { .. }));
    }

    #[test]
    fn duplicate_entry_types_are_scanned_once() {
        let diff = CasDiff::new(&["POS", "POS"], vec![pos_adapter()], LinkCompareBehavior::default())
            .unwrap();
        assert_eq!(diff.entry_types(), &["POS".to_string()]);
    }

    #[test]
    fn no_data_yields_empty_result() {
        let diff = CasDiff::new(&["POS"], vec![pos_adapter()], LinkCompareBehavior::default())
            .unwrap();
        let result = diff.run(&AnnotatorDocuments::new());
        assert_eq!(result.size(), 0);
        assert!(result.differing_sets().is_empty());
        assert!(result.incomplete_sets().is_empty());
    }

    #[test]
    fn types_outside_entry_types_are_ignored() {
        let diff = CasDiff::new(&["POS"], vec![pos_adapter()], LinkCompareBehavior::default())
            .unwrap();
        let mut doc = AnnotationDocument::new();
        doc.add_span("POS", 0, 3);
        doc.add_span("Lemma", 0, 3);

        let mut documents = AnnotatorDocuments::new();
        documents.insert("alice".into(), vec![Some(doc)]);

        let result = diff.run(&documents);
        assert_eq!(result.size(), 1);
        assert_eq!(result.size_of("Lemma"), 0);
    }
}
