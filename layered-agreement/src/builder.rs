//! Turning configuration sets into a coding study.
//!
//! Each configuration set of the requested type that compares the requested
//! feature becomes one candidate item, keyed by its position. Items are
//! sorted into the breakdown buckets while the study is built, so callers can
//! see why a set did or did not contribute.

use serde::{Deserialize, Serialize};
use tracing::debug;

use layered_diff::{Configuration, ConfigurationSet, DiffResult, LabelValue, Position};

use crate::errors::AgreementError;
use crate::study::{Category, CodingStudy};

/// What to do with sets where an annotator stacked several configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackingPolicy {
    /// Use the annotator's earliest configuration.
    #[default]
    FirstByArrival,
    /// Leave the set out of the study.
    ExcludeStacked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AgreementOptions {
    /// Drop items that are incomplete by position or by label
    pub exclude_incomplete: bool,
    pub stacking: StackingPolicy,
}

impl AgreementOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exclude_incomplete(mut self, exclude: bool) -> Self {
        self.exclude_incomplete = exclude;
        self
    }

    pub fn with_stacking(mut self, stacking: StackingPolicy) -> Self {
        self.stacking = stacking;
        self
    }
}

/// Where the candidate sets of a study went.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudyBreakdown {
    pub total_set_count: usize,
    /// No annotator assigned a label
    pub irrelevant_sets: Vec<Position>,
    /// An annotator with data for the document contributed nothing
    pub incomplete_by_position: Vec<Position>,
    /// An annotator contributed a configuration without a label
    pub incomplete_by_label: Vec<Position>,
    /// Relevant sets with at least two distinct labels
    pub sets_with_differences: Vec<Position>,
    /// Sets where an annotator contributed more than one configuration
    pub plurality_sets: Vec<Position>,
}

impl StudyBreakdown {
    pub fn relevant_set_count(&self) -> usize {
        self.total_set_count - self.irrelevant_sets.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudyOutcome {
    pub study: CodingStudy,
    pub breakdown: StudyBreakdown,
}

/// Build the coding study for one feature of one type.
///
/// Link features yield one item per slot sub-position; any other feature
/// one item per host position. Every annotator of the diff gets a unit, in
/// the diff's annotator order.
pub fn make_coding_study(
    diff: &DiffResult,
    type_name: &str,
    feature: &str,
    options: &AgreementOptions,
) -> Result<StudyOutcome, AgreementError> {
    let annotators = diff.annotators().to_vec();
    let mut study = CodingStudy::new(annotators.clone());
    let mut breakdown = StudyBreakdown::default();

    let mut typed = 0;
    for set in diff.sets_of_type(type_name) {
        typed += 1;
        if !set.features().iter().any(|compared| compared == feature) {
            continue;
        }
        breakdown.total_set_count += 1;
        let position = set.position();

        let stacked = set.has_stacking();
        if stacked {
            breakdown.plurality_sets.push(position.clone());
        }

        let selected: Vec<Option<&Configuration>> = annotators
            .iter()
            .map(|annotator| select(set, annotator))
            .collect();
        let units: Vec<Option<Category>> = selected
            .iter()
            .map(|config| config.and_then(|config| category(config.label(feature))))
            .collect();

        if units.iter().all(Option::is_none) {
            breakdown.irrelevant_sets.push(position.clone());
            continue;
        }

        let missing_position = annotators
            .iter()
            .zip(&selected)
            .any(|(annotator, config)| config.is_none() && diff.has_data(annotator, position.doc));
        if missing_position {
            breakdown.incomplete_by_position.push(position.clone());
        }

        let missing_label = selected
            .iter()
            .flatten()
            .any(|config| config.label(feature).is_null());
        if missing_label {
            breakdown.incomplete_by_label.push(position.clone());
        }

        let mut distinct: Vec<&Category> = units.iter().flatten().collect();
        distinct.sort();
        distinct.dedup();
        if distinct.len() > 1 {
            breakdown.sets_with_differences.push(position.clone());
        }

        if stacked && options.stacking == StackingPolicy::ExcludeStacked {
            continue;
        }
        if options.exclude_incomplete && (missing_position || missing_label) {
            continue;
        }
        study.add_item(position.to_string(), units);
    }

    if typed > 0 && breakdown.total_set_count == 0 {
        return Err(AgreementError::UnknownFeature {
            type_name: type_name.to_string(),
            feature: feature.to_string(),
        });
    }

    debug!(
        type_name,
        feature,
        sets = breakdown.total_set_count,
        items = study.item_count(),
        irrelevant = breakdown.irrelevant_sets.len(),
        incomplete_by_position = breakdown.incomplete_by_position.len(),
        incomplete_by_label = breakdown.incomplete_by_label.len(),
        plurality = breakdown.plurality_sets.len(),
        "coding study built"
    );

    Ok(StudyOutcome { study, breakdown })
}

/// The annotator's earliest configuration; configurations are kept in arrival order.
fn select<'s>(set: &'s ConfigurationSet, annotator: &str) -> Option<&'s Configuration> {
    set.configurations()
        .iter()
        .find(|config| config.annotator == annotator)
}

fn category(label: &LabelValue) -> Option<Category> {
    if label.is_null() {
        None
    } else {
        Some(Category(label.to_string()))
    }
}
