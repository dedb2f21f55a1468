//! Chance-corrected agreement coefficients over a [`CodingStudy`].
//!
//! Measures only see the study; they know nothing about diffs or positions.

mod cohen_kappa;
mod krippendorff_alpha;

use serde::{Deserialize, Serialize};

pub use cohen_kappa::CohenKappa;
pub use krippendorff_alpha::KrippendorffAlpha;

use crate::errors::AgreementError;
use crate::study::CodingStudy;

/// A coefficient with the observed and expected terms it was derived from.
///
/// All three values are NaN when the coefficient is undefined for the study.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coefficient {
    pub value: f64,
    /// Observed agreement (kappa) or disagreement (alpha)
    pub observed: f64,
    /// Agreement or disagreement expected by chance
    pub expected: f64,
    /// Items that entered the computation
    pub item_count: usize,
}

impl Coefficient {
    pub fn undefined(item_count: usize) -> Self {
        Self {
            value: f64::NAN,
            observed: f64::NAN,
            expected: f64::NAN,
            item_count,
        }
    }

    pub fn is_defined(&self) -> bool {
        !self.value.is_nan()
    }
}

pub trait AgreementMeasure {
    fn name(&self) -> &'static str;

    fn calculate(&self, study: &CodingStudy) -> Result<Coefficient, AgreementError>;
}

/// Selectable measure, e.g. from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    CohenKappa,
    #[default]
    KrippendorffAlphaNominal,
}

impl MeasureKind {
    pub fn measure(self) -> Box<dyn AgreementMeasure> {
        match self {
            MeasureKind::CohenKappa => Box::new(CohenKappa),
            MeasureKind::KrippendorffAlphaNominal => Box::new(KrippendorffAlpha),
        }
    }

    pub fn name(self) -> &'static str {
        self.measure().name()
    }
}
