//! Shared builders for the scenario tests.

use crate::{
    AnnotationDocument, AnnotationId, AnnotatorDocuments, CasDiff, DiffAdapter,
    LinkCompareBehavior, TypeSchema, TypeSystem,
};

pub const SENTENCE: &str = "The quick brown fox jumps over the lazy dog while the farmer , who lives nearby , watches the animals from his old wooden porch .";

pub const SENTENCE_TAGS: [&str; 26] = [
    "DT", "JJ", "JJ", "NN", "VBZ", "IN", "DT", "JJ", "NN", "IN", "DT", "NN", ",", "WP", "VBZ",
    "RB", ",", "VBZ", "DT", "NNS", "IN", "PRP$", "JJ", "JJ", "NN", ".",
];

pub fn type_system() -> TypeSystem {
    TypeSystem::new()
        .with_type(TypeSchema::span("POS").with_feature("PosValue"))
        .with_type(TypeSchema::span("NamedEntity").with_feature("value"))
        .with_type(
            TypeSchema::span("SemPred")
                .with_feature("category")
                .with_link_feature("args", "NamedEntity")
                .with_link_feature("modifiers", "NamedEntity"),
        )
        .with_type(
            TypeSchema::relation("Relation", "Governor", "Dependent").with_feature("label"),
        )
}

pub fn adapter(type_name: &str, labels: &[&str], links: &[&str]) -> DiffAdapter {
    let types = type_system();
    DiffAdapter::for_type(types.get(type_name).unwrap(), labels, links).unwrap()
}

pub fn pos_diff() -> CasDiff {
    CasDiff::new(
        &["POS"],
        vec![adapter("POS", &["PosValue"], &[])],
        LinkCompareBehavior::default(),
    )
    .unwrap()
}

pub fn sem_pred_diff(link_compare: LinkCompareBehavior) -> CasDiff {
    CasDiff::new(
        &["SemPred"],
        vec![adapter("SemPred", &["category"], &["args", "modifiers"])],
        link_compare,
    )
    .unwrap()
}

pub fn relation_diff() -> CasDiff {
    CasDiff::new(
        &["Relation"],
        vec![adapter("Relation", &["label"], &[])],
        LinkCompareBehavior::default(),
    )
    .unwrap()
}

/// Byte offsets of the whitespace-separated tokens of `text`.
pub fn token_offsets(text: &str) -> Vec<(usize, usize)> {
    let mut offsets = Vec::new();
    let mut start = None;
    for (idx, ch) in text.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(begin)) => {
                offsets.push((begin, idx));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(begin) = start {
        offsets.push((begin, text.len()));
    }
    offsets
}

/// The sentence with one POS annotation per token.
pub fn tagged_sentence(tags: &[&str]) -> AnnotationDocument {
    let mut doc = AnnotationDocument::new().with_text(SENTENCE);
    for (&(begin, end), &tag) in token_offsets(SENTENCE).iter().zip(tags) {
        let id = doc.add_span("POS", begin, end);
        doc.set_feature(id, "PosValue", tag);
    }
    doc
}

pub fn pos_document(tokens: &[(usize, usize, &str)]) -> AnnotationDocument {
    let mut doc = AnnotationDocument::new();
    for &(begin, end, tag) in tokens {
        let id = doc.add_span("POS", begin, end);
        doc.set_feature(id, "PosValue", tag);
    }
    doc
}

pub fn entity(doc: &mut AnnotationDocument, begin: usize, end: usize, value: &str) -> AnnotationId {
    let id = doc.add_span("NamedEntity", begin, end);
    doc.set_feature(id, "value", value);
    id
}

pub fn relation(
    doc: &mut AnnotationDocument,
    governor: AnnotationId,
    dependent: AnnotationId,
    label: &str,
) -> AnnotationId {
    let id = doc
        .add_relation("Relation", "Governor", governor, "Dependent", dependent)
        .unwrap();
    doc.set_feature(id, "label", label);
    id
}

pub fn single(entries: Vec<(&str, AnnotationDocument)>) -> AnnotatorDocuments {
    entries
        .into_iter()
        .map(|(annotator, doc)| (annotator.to_string(), vec![Some(doc)]))
        .collect()
}

pub fn multi(entries: Vec<(&str, Vec<Option<AnnotationDocument>>)>) -> AnnotatorDocuments {
    entries
        .into_iter()
        .map(|(annotator, docs)| (annotator.to_string(), docs))
        .collect()
}
