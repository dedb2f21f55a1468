//! Configuration sets and the diff result built from them.
//!
//! A [`ConfigurationSet`] gathers every annotator's contribution at one
//! [`Position`]. The [`DiffResult`] stores the sets in position order and
//! derives all counts (differing, incomplete, stacked) from them on demand.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::cas::AnnotationId;
use crate::label::LabelValue;
use crate::link_compare::LinkCompareBehavior;
use crate::position::{Position, SpanTarget};

static NULL_LABEL: LabelValue = LabelValue::Null;

/// Handle to the source annotation of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AnnotationRef {
    pub doc: usize,
    pub id: AnnotationId,
}

/// The slot filler behind a configuration at a slot sub-position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotFiller {
    pub role: String,
    pub target: Option<SpanTarget>,
}

/// Which span instances a relation's endpoints resolved to.
///
/// Stack ranks count same-type spans created earlier at identical offsets,
/// so `0` means the first-created of a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EndpointResolution {
    pub governor: AnnotationRef,
    pub governor_stack_rank: usize,
    pub dependent: AnnotationRef,
    pub dependent_stack_rank: usize,
}

/// One annotator's contribution at one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    pub annotator: String,
    pub source: AnnotationRef,
    /// Rank among the annotator's same-type annotations at identical offsets
    pub stack_rank: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<SlotFiller>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<EndpointResolution>,
    /// Compared labels, keyed by feature name
    pub labels: BTreeMap<String, LabelValue>,
}

impl Configuration {
    /// Label for a feature, `Null` when the feature is not compared here.
    pub fn label(&self, feature: &str) -> &LabelValue {
        self.labels.get(feature).unwrap_or(&NULL_LABEL)
    }

    fn sort_key(&self) -> (&str, AnnotationRef) {
        (&self.annotator, self.source)
    }
}

/// All configurations sharing one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationSet {
    position: Position,
    features: Vec<String>,
    configurations: Vec<Configuration>,
}

impl ConfigurationSet {
    /// Configurations are put in `(annotator, arrival)` order.
    pub(crate) fn new(
        position: Position,
        features: Vec<String>,
        mut configurations: Vec<Configuration>,
    ) -> Self {
        debug_assert!(!configurations.is_empty());
        configurations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Self {
            position,
            features,
            configurations,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Features whose labels are compared in this set.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Annotators contributing at least one configuration.
    pub fn annotators(&self) -> BTreeSet<&str> {
        self.configurations
            .iter()
            .map(|cfg| cfg.annotator.as_str())
            .collect()
    }

    pub fn configurations_of<'a>(
        &'a self,
        annotator: &'a str,
    ) -> impl Iterator<Item = &'a Configuration> + 'a {
        self.configurations
            .iter()
            .filter(move |cfg| cfg.annotator == annotator)
    }

    /// Distinct labels contributed for a feature, one per configuration.
    pub fn values(&self, feature: &str) -> BTreeSet<&LabelValue> {
        self.configurations
            .iter()
            .map(|cfg| cfg.label(feature))
            .collect()
    }

    pub fn is_agreement_on(&self, feature: &str) -> bool {
        self.values(feature).len() <= 1
    }

    /// True when every compared feature has a single distinct label.
    pub fn is_agreement(&self) -> bool {
        self.features
            .iter()
            .all(|feature| self.is_agreement_on(feature))
    }

    /// True when some annotator contributes more than one configuration.
    pub fn has_stacking(&self) -> bool {
        self.configurations
            .windows(2)
            .any(|pair| pair[0].annotator == pair[1].annotator)
    }
}

/// Counts derived from a [`DiffResult`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub total: usize,
    pub per_type: BTreeMap<String, usize>,
    pub differing: usize,
    pub incomplete: usize,
    pub stacked: usize,
}

/// All configuration sets of one diff run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    annotators: Vec<String>,
    /// Document index -> annotators with a (possibly empty) document there
    coverage: BTreeMap<usize, BTreeSet<String>>,
    link_compare: LinkCompareBehavior,
    sets: Vec<ConfigurationSet>,
}

impl DiffResult {
    pub(crate) fn new(
        annotators: Vec<String>,
        coverage: BTreeMap<usize, BTreeSet<String>>,
        link_compare: LinkCompareBehavior,
        mut sets: Vec<ConfigurationSet>,
    ) -> Self {
        sets.sort_by(|a, b| a.position.cmp(&b.position));
        Self {
            annotators,
            coverage,
            link_compare,
            sets,
        }
    }

    /// Every annotator of the input, including those without any document.
    pub fn annotators(&self) -> &[String] {
        &self.annotators
    }

    /// Annotators with a non-null document at index `doc`.
    pub fn annotators_with_data(&self, doc: usize) -> impl Iterator<Item = &str> {
        self.coverage
            .get(&doc)
            .into_iter()
            .flat_map(|annotators| annotators.iter().map(String::as_str))
    }

    pub fn has_data(&self, annotator: &str, doc: usize) -> bool {
        self.coverage
            .get(&doc)
            .map_or(false, |annotators| annotators.contains(annotator))
    }

    pub fn link_compare(&self) -> LinkCompareBehavior {
        self.link_compare
    }

    pub fn size(&self) -> usize {
        self.sets.len()
    }

    pub fn size_of(&self, type_name: &str) -> usize {
        self.sets_of_type(type_name).count()
    }

    /// Sets in position order.
    pub fn configuration_sets(&self) -> &[ConfigurationSet] {
        &self.sets
    }

    pub fn sets_of_type<'a>(
        &'a self,
        type_name: &'a str,
    ) -> impl Iterator<Item = &'a ConfigurationSet> + 'a {
        self.sets
            .iter()
            .filter(move |set| set.position.type_name == type_name)
    }

    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.sets.iter().map(|set| &set.position)
    }

    pub fn get(&self, position: &Position) -> Option<&ConfigurationSet> {
        self.sets
            .binary_search_by(|set| set.position.cmp(position))
            .ok()
            .map(|idx| &self.sets[idx])
    }

    /// Complete when every annotator with data for the set's document contributed.
    pub fn is_complete(&self, set: &ConfigurationSet) -> bool {
        let present = set.annotators();
        self.annotators_with_data(set.position.doc)
            .all(|annotator| present.contains(annotator))
    }

    pub fn is_agreement(&self, set: &ConfigurationSet) -> bool {
        set.is_agreement()
    }

    pub fn is_agreement_on(&self, set: &ConfigurationSet, feature: &str) -> bool {
        set.is_agreement_on(feature)
    }

    /// Sets where some compared feature has more than one distinct label.
    pub fn differing_sets(&self) -> Vec<&ConfigurationSet> {
        self.sets.iter().filter(|set| !set.is_agreement()).collect()
    }

    /// Sets where the given feature has more than one distinct label.
    pub fn differing_sets_on(&self, feature: &str) -> Vec<&ConfigurationSet> {
        self.sets
            .iter()
            .filter(|set| !set.is_agreement_on(feature))
            .collect()
    }

    pub fn incomplete_sets(&self) -> Vec<&ConfigurationSet> {
        self.sets.iter().filter(|set| !self.is_complete(set)).collect()
    }

    /// Sets where at least one annotator stacked several instances.
    pub fn stacked_sets(&self) -> Vec<&ConfigurationSet> {
        self.sets.iter().filter(|set| set.has_stacking()).collect()
    }

    pub fn summary(&self) -> DiffSummary {
        let mut per_type = BTreeMap::new();
        for set in &self.sets {
            *per_type.entry(set.position.type_name.clone()).or_insert(0) += 1;
        }
        DiffSummary {
            total: self.size(),
            per_type,
            differing: self.differing_sets().len(),
            incomplete: self.incomplete_sets().len(),
            stacked: self.stacked_sets().len(),
        }
    }

    /// Serialize to a RON string.
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(8)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, config)
    }

    /// Convert to a pretty-printed JSON string.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).expect("diff result always serializes")
    }
}
