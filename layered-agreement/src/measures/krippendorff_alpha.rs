use std::collections::BTreeMap;

use tracing::trace;

use super::{AgreementMeasure, Coefficient};
use crate::errors::AgreementError;
use crate::study::{Category, CodingStudy};

/// Krippendorff's alpha with the nominal distance metric.
///
/// Works for any number of annotators. `None` units are missing values, and
/// only items with at least two assigned values are pairable. With the
/// coincidence matrix `o`, its marginals `n_c` and `n = Σ n_c`:
///
/// ```text
/// α = 1 − (n − 1) · Σ_{c≠k} o_ck / Σ_{c≠k} n_c · n_k
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KrippendorffAlpha;

/// Coincidences of one study.
#[derive(Debug, Default)]
struct Coincidences<'a> {
    /// `o_ck`, symmetric
    matrix: BTreeMap<(&'a Category, &'a Category), f64>,
    /// `n_c`
    marginals: BTreeMap<&'a Category, f64>,
    pairable_items: usize,
}

impl<'a> Coincidences<'a> {
    fn of(study: &'a CodingStudy) -> Self {
        let mut coincidences = Coincidences::default();
        for item in study.items() {
            let mut counts: BTreeMap<&Category, usize> = BTreeMap::new();
            for category in item.assigned() {
                *counts.entry(category).or_insert(0) += 1;
            }
            let m: usize = counts.values().sum();
            if m < 2 {
                continue;
            }
            coincidences.pairable_items += 1;

            let weight = 1.0 / (m - 1) as f64;
            for (&c, &count_c) in &counts {
                *coincidences.marginals.entry(c).or_insert(0.0) += count_c as f64;
                for (&k, &count_k) in &counts {
                    let pairs = if c == k {
                        count_c * (count_c - 1)
                    } else {
                        count_c * count_k
                    };
                    *coincidences.matrix.entry((c, k)).or_insert(0.0) += pairs as f64 * weight;
                }
            }
        }
        coincidences
    }

    fn total(&self) -> f64 {
        self.marginals.values().sum()
    }

    fn observed_disagreement(&self) -> f64 {
        self.matrix
            .iter()
            .filter(|((c, k), _)| c != k)
            .map(|(_, value)| value)
            .sum()
    }

    fn expected_disagreement(&self) -> f64 {
        let total = self.total();
        let same: f64 = self.marginals.values().map(|n_c| n_c * n_c).sum();
        total * total - same
    }
}

impl AgreementMeasure for KrippendorffAlpha {
    fn name(&self) -> &'static str {
        "krippendorff_alpha_nominal"
    }

    fn calculate(&self, study: &CodingStudy) -> Result<Coefficient, AgreementError> {
        let coincidences = Coincidences::of(study);
        let n = coincidences.total();
        let items = coincidences.pairable_items;
        trace!(
            items,
            pairable_values = n,
            categories = coincidences.marginals.len(),
            "coincidence matrix"
        );
        if items == 0 {
            return Ok(Coefficient::undefined(0));
        }

        let observed = coincidences.observed_disagreement();
        let expected = coincidences.expected_disagreement();
        // normalized so that both are per pairable value
        let observed_rate = observed / n;
        let expected_rate = expected / (n * (n - 1.0));
        if expected == 0.0 {
            return Ok(Coefficient {
                value: f64::NAN,
                observed: observed_rate,
                expected: expected_rate,
                item_count: items,
            });
        }

        Ok(Coefficient {
            value: 1.0 - (n - 1.0) * observed / expected,
            observed: observed_rate,
            expected: expected_rate,
            item_count: items,
        })
    }
}
