//! The outcome of one agreement calculation, with the study and breakdown it was computed from.

use serde::Serialize;

use layered_diff::Position;

use crate::builder::StudyBreakdown;
use crate::measures::Coefficient;
use crate::study::CodingStudy;

/// Agreement on one feature of one type, with the study it was computed on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgreementResult {
    pub type_name: String,
    pub feature: String,
    pub measure: &'static str,
    pub coefficient: Coefficient,
    pub breakdown: StudyBreakdown,
    pub study: CodingStudy,
}

impl AgreementResult {
    /// The coefficient value; NaN when undefined.
    pub fn agreement(&self) -> f64 {
        self.coefficient.value
    }

    pub fn total_set_count(&self) -> usize {
        self.breakdown.total_set_count
    }

    pub fn relevant_set_count(&self) -> usize {
        self.breakdown.relevant_set_count()
    }

    pub fn irrelevant_sets(&self) -> &[Position] {
        &self.breakdown.irrelevant_sets
    }

    pub fn incomplete_sets_by_position(&self) -> &[Position] {
        &self.breakdown.incomplete_by_position
    }

    pub fn incomplete_sets_by_label(&self) -> &[Position] {
        &self.breakdown.incomplete_by_label
    }

    pub fn sets_with_differences(&self) -> &[Position] {
        &self.breakdown.sets_with_differences
    }

    pub fn plurality_sets(&self) -> &[Position] {
        &self.breakdown.plurality_sets
    }

    pub fn category_count(&self) -> usize {
        self.study.categories().len()
    }

    pub fn is_all_null(&self) -> bool {
        self.study.is_all_null()
    }

    pub fn study(&self) -> &CodingStudy {
        &self.study
    }

    /// Convert to a pretty-printed JSON string. Undefined coefficients become `null`.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).expect("agreement result always serializes")
    }
}
