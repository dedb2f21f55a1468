use std::collections::BTreeMap;

use super::{AgreementMeasure, Coefficient};
use crate::errors::AgreementError;
use crate::study::{Category, CodingStudy};

/// Cohen's kappa for exactly two annotators.
///
/// Every item counts. A `None` unit is treated as its own (empty) category,
/// so one annotator labelling an item the other left empty is a disagreement.
#[derive(Debug, Clone, Copy, Default)]
pub struct CohenKappa;

impl AgreementMeasure for CohenKappa {
    fn name(&self) -> &'static str {
        "cohen_kappa"
    }

    fn calculate(&self, study: &CodingStudy) -> Result<Coefficient, AgreementError> {
        let annotators = study.annotator_count();
        if annotators > 2 {
            return Err(AgreementError::AnnotatorCount {
                measure: self.name(),
                expected: 2,
                found: annotators,
            });
        }
        let total = study.item_count();
        if annotators < 2 || total == 0 {
            return Ok(Coefficient::undefined(total));
        }

        // category -> (first rater count, second rater count)
        let mut marginals: BTreeMap<Option<&Category>, (usize, usize)> = BTreeMap::new();
        let mut agreed = 0usize;
        for item in study.items() {
            let first = item.units[0].as_ref();
            let second = item.units[1].as_ref();
            if first == second {
                agreed += 1;
            }
            marginals.entry(first).or_default().0 += 1;
            marginals.entry(second).or_default().1 += 1;
        }

        let n = total as f64;
        let observed = agreed as f64 / n;
        let expected: f64 = marginals
            .values()
            .map(|&(a, b)| (a as f64 / n) * (b as f64 / n))
            .sum();

        if (1.0 - expected).abs() < f64::EPSILON {
            return Ok(Coefficient {
                value: f64::NAN,
                observed,
                expected,
                item_count: total,
            });
        }

        Ok(Coefficient {
            value: (observed - expected) / (1.0 - expected),
            observed,
            expected,
            item_count: total,
        })
    }
}
