use super::fixtures::*;
use crate::{AnnotationDocument, AnnotatorDocuments, DiffDisplay, LabelValue, Position};

#[test]
fn no_annotators_no_sets() {
    let result = pos_diff().run(&AnnotatorDocuments::new());
    assert_eq!(result.size(), 0);
    assert!(result.annotators().is_empty());
}

#[test]
fn two_empty_documents() {
    let documents = single(vec![
        ("alice", AnnotationDocument::new()),
        ("bob", AnnotationDocument::new()),
    ]);
    let result = pos_diff().run(&documents);
    assert_eq!(result.size(), 0);
    assert!(result.differing_sets().is_empty());
    assert!(result.incomplete_sets().is_empty());
    assert!(result.has_data("alice", 0));
}

#[test]
fn single_shared_instance() {
    let doc = pos_document(&[(0, 4, "NN")]);
    let documents = single(vec![("alice", doc.clone()), ("bob", doc)]);
    let result = pos_diff().run(&documents);

    assert_eq!(result.size(), 1);
    let set = &result.configuration_sets()[0];
    assert_eq!(set.position(), &Position::span(0, "POS", 0, 4));
    assert_eq!(set.len(), 2);
    assert!(result.is_complete(set));
    assert!(set.is_agreement());
    assert_eq!(set.features(), &["PosValue".to_string()]);
}

#[test]
fn identical_annotators_agree_everywhere() {
    let documents = single(vec![
        ("alice", tagged_sentence(&SENTENCE_TAGS)),
        ("bob", tagged_sentence(&SENTENCE_TAGS)),
        ("carol", tagged_sentence(&SENTENCE_TAGS)),
    ]);
    let result = pos_diff().run(&documents);

    assert_eq!(result.size(), 26);
    assert!(result.differing_sets().is_empty());
    assert!(result.incomplete_sets().is_empty());
    assert!(result
        .configuration_sets()
        .iter()
        .all(|set| set.len() == 3));
}

#[test]
fn one_tag_changed_in_a_long_sentence() {
    let mut changed = SENTENCE_TAGS;
    changed[15] = "JJ";
    let documents = single(vec![
        ("alice", tagged_sentence(&SENTENCE_TAGS)),
        ("bob", tagged_sentence(&changed)),
    ]);
    let result = pos_diff().run(&documents);

    assert_eq!(result.size(), 26);
    assert_eq!(result.incomplete_sets().len(), 0);

    let differing = result.differing_sets();
    assert_eq!(differing.len(), 1);
    let set = differing[0];
    let (begin, end) = set.position().span_offsets().unwrap();
    assert_eq!(&SENTENCE[begin..end], "nearby");
    assert_eq!(
        set.values("PosValue").into_iter().cloned().collect::<Vec<_>>(),
        vec![LabelValue::Str("JJ".into()), LabelValue::Str("RB".into())]
    );
}

#[test]
fn missing_annotation_makes_set_incomplete() {
    let documents = single(vec![
        ("alice", pos_document(&[(0, 3, "DT")])),
        ("bob", pos_document(&[(0, 3, "DT"), (4, 9, "NN")])),
    ]);
    let result = pos_diff().run(&documents);

    assert_eq!(result.size(), 2);
    let incomplete = result.incomplete_sets();
    assert_eq!(incomplete.len(), 1);
    assert_eq!(incomplete[0].position(), &Position::span(0, "POS", 4, 9));
    // a lone configuration has nothing to disagree with
    assert!(result.differing_sets().is_empty());
}

#[test]
fn empty_document_is_data_but_missing_document_is_not() {
    let annotated = pos_document(&[(0, 3, "DT")]);

    let with_empty = single(vec![
        ("alice", AnnotationDocument::new()),
        ("bob", annotated.clone()),
    ]);
    assert_eq!(pos_diff().run(&with_empty).incomplete_sets().len(), 1);

    let with_none = multi(vec![
        ("alice", vec![None]),
        ("bob", vec![Some(annotated)]),
    ]);
    let result = pos_diff().run(&with_none);
    assert!(result.incomplete_sets().is_empty());
    assert_eq!(result.annotators(), &["alice".to_string(), "bob".to_string()]);
}

#[test]
fn different_offsets_are_different_positions() {
    let documents = single(vec![
        ("alice", pos_document(&[(0, 5, "NN")])),
        ("bob", pos_document(&[(0, 4, "NN")])),
    ]);
    let result = pos_diff().run(&documents);
    assert_eq!(result.size(), 2);
    assert_eq!(result.incomplete_sets().len(), 2);
}

#[test]
fn zero_length_spans_are_positions() {
    let documents = single(vec![
        ("alice", pos_document(&[(7, 7, "-NONE-")])),
        ("bob", pos_document(&[(7, 7, "-NONE-")])),
    ]);
    let result = pos_diff().run(&documents);
    assert_eq!(result.size(), 1);
    assert!(result.get(&Position::span(0, "POS", 7, 7)).is_some());
}

#[test]
fn stacked_spans_share_a_set() {
    let documents = single(vec![
        ("alice", pos_document(&[(0, 3, "DT"), (0, 3, "NN")])),
        ("bob", pos_document(&[(0, 3, "DT")])),
    ]);
    let result = pos_diff().run(&documents);

    assert_eq!(result.size(), 1);
    let set = &result.configuration_sets()[0];
    assert_eq!(set.len(), 3);
    assert!(set.has_stacking());
    assert!(!set.is_agreement());
    let ranks: Vec<usize> = set.configurations_of("alice").map(|c| c.stack_rank).collect();
    assert_eq!(ranks, vec![0, 1]);
    assert_eq!(result.stacked_sets().len(), 1);
}

#[test]
fn large_documents_with_scattered_stacks() {
    let mut tokens = Vec::new();
    for i in 0..20_000 {
        tokens.push((i * 2, i * 2 + 1, "NN"));
        if i % 10 == 0 {
            tokens.push((i * 2, i * 2 + 1, "VB"));
            tokens.push((i * 2, i * 2 + 1, "JJ"));
        }
    }
    let doc = pos_document(&tokens);
    let documents = single(vec![("alice", doc.clone()), ("bob", doc)]);
    let result = pos_diff().run(&documents);

    assert_eq!(result.size(), 20_000);
    assert_eq!(result.stacked_sets().len(), 2_000);
    assert!(result.incomplete_sets().is_empty());

    let last = result.get(&Position::span(0, "POS", 39_980, 39_981)).unwrap();
    let ranks: Vec<usize> = last.configurations_of("bob").map(|c| c.stack_rank).collect();
    assert_eq!(ranks, vec![0, 1, 2]);
}

#[test]
fn missing_label_feature_compares_as_null() {
    let mut bare = AnnotationDocument::new();
    bare.add_span("POS", 0, 3);
    let documents = single(vec![
        ("alice", bare),
        ("bob", pos_document(&[(0, 3, "DT")])),
    ]);
    let result = pos_diff().run(&documents);

    let set = &result.configuration_sets()[0];
    assert!(!set.is_agreement());
    assert!(set.values("PosValue").contains(&LabelValue::Null));
}

#[test]
fn runs_are_deterministic() {
    let mut changed = SENTENCE_TAGS;
    changed[3] = "NNP";
    let documents = single(vec![
        ("alice", tagged_sentence(&SENTENCE_TAGS)),
        ("bob", tagged_sentence(&changed)),
    ]);
    let diff = pos_diff();

    let first = diff.run(&documents);
    let second = diff.run(&documents);
    assert_eq!(first, second);
    assert_eq!(first.to_json_string(), second.to_json_string());
    assert!(first.positions().zip(first.positions().skip(1)).all(|(a, b)| a < b));
}

#[test]
fn ron_output_names_positions() {
    let documents = single(vec![("alice", pos_document(&[(0, 3, "DT")]))]);
    let ron = pos_diff().run(&documents).to_ron_string().unwrap();
    assert!(ron.contains("type_name: \"POS\""));
    assert!(ron.contains("\"DT\""));
}

#[test]
fn display_lists_every_set() {
    let documents = single(vec![
        ("alice", pos_document(&[(0, 3, "DT"), (4, 9, "JJ")])),
        ("bob", pos_document(&[(0, 3, "DT"), (4, 9, "NN"), (10, 13, "NN")])),
    ]);
    let result = pos_diff().run(&documents);

    insta::assert_snapshot!(DiffDisplay::new(&result).to_string(), @r###"
    #0 POS[0-3]  complete  agree
      alice a0 PosValue=DT
      bob a0 PosValue=DT
    #0 POS[4-9]  complete  DIFF
      alice a1 PosValue=JJ
      bob a1 PosValue=NN
    #0 POS[10-13]  incomplete  agree
      bob a2 PosValue=NN
    "###);

    insta::assert_snapshot!(DiffDisplay::new(&result).only_differing().to_string(), @r###"
    #0 POS[4-9]  complete  DIFF
      alice a1 PosValue=JJ
      bob a1 PosValue=NN
    "###);
}
