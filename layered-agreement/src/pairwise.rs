//! Agreement for every pair of annotators.

use std::collections::BTreeMap;

use crate::errors::AgreementError;
use crate::measures::{AgreementMeasure, Coefficient};
use crate::study::CodingStudy;

#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseAgreement {
    pub annotators: Vec<String>,
    /// Keyed by `(a, b)` with `a` before `b` in annotator order
    pub cells: BTreeMap<(String, String), Coefficient>,
}

impl PairwiseAgreement {
    /// Coefficient for a pair, in either order.
    pub fn get(&self, a: &str, b: &str) -> Option<&Coefficient> {
        self.cells
            .get(&(a.to_string(), b.to_string()))
            .or_else(|| self.cells.get(&(b.to_string(), a.to_string())))
    }

    /// Mean over the defined coefficients, NaN when there are none.
    pub fn mean(&self) -> f64 {
        let defined: Vec<f64> = self
            .cells
            .values()
            .filter(|coefficient| coefficient.is_defined())
            .map(|coefficient| coefficient.value)
            .collect();
        if defined.is_empty() {
            return f64::NAN;
        }
        defined.iter().sum::<f64>() / defined.len() as f64
    }
}

/// Run `measure` on the two-annotator sub-study of every annotator pair.
pub fn pairwise_agreement(
    study: &CodingStudy,
    measure: &dyn AgreementMeasure,
) -> Result<PairwiseAgreement, AgreementError> {
    let annotators = study.annotators().to_vec();
    let mut cells = BTreeMap::new();
    for (idx, a) in annotators.iter().enumerate() {
        for b in &annotators[idx + 1..] {
            let coefficient = measure.calculate(&study.pair(a, b))?;
            cells.insert((a.clone(), b.clone()), coefficient);
        }
    }
    Ok(PairwiseAgreement { annotators, cells })
}
