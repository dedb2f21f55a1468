#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Inter-annotator agreement on top of `layered-diff`.
//!
//! A [`DiffResult`] is turned into a [`CodingStudy`] for one feature of one
//! type, and a chance-corrected measure is computed on it.
//!
//! ```
//! # use layered_diff::DiffResult;
//! # fn report(diff: &DiffResult) -> Result<(), layered_agreement::AgreementError> {
//! use layered_agreement::{calculate_agreement, AgreementConfig, MeasureKind};
//!
//! let config = AgreementConfig::default().with_measure(MeasureKind::CohenKappa);
//! let result = calculate_agreement(diff, "POS", "PosValue", &config)?;
//! println!("{} over {} sets", result.agreement(), result.relevant_set_count());
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;
mod errors;
pub mod measures;
mod pairwise;
mod result;
mod study;

use tracing::debug;

use layered_diff::DiffResult;

pub use builder::{
    make_coding_study, AgreementOptions, StackingPolicy, StudyBreakdown, StudyOutcome,
};
pub use config::AgreementConfig;
pub use errors::AgreementError;
pub use measures::{AgreementMeasure, Coefficient, CohenKappa, KrippendorffAlpha, MeasureKind};
pub use pairwise::{pairwise_agreement, PairwiseAgreement};
pub use result::AgreementResult;
pub use study::{Category, CodingItem, CodingStudy};

/// Build the study for `feature` of `type_name` and compute the configured measure.
pub fn calculate_agreement(
    diff: &DiffResult,
    type_name: &str,
    feature: &str,
    config: &AgreementConfig,
) -> Result<AgreementResult, AgreementError> {
    let measure = config.measure.measure();
    agreement_with(diff, type_name, feature, &config.options(), measure.as_ref())
}

pub fn cohen_kappa_agreement(
    diff: &DiffResult,
    type_name: &str,
    feature: &str,
    options: &AgreementOptions,
) -> Result<AgreementResult, AgreementError> {
    agreement_with(diff, type_name, feature, options, &CohenKappa)
}

pub fn krippendorff_alpha_agreement(
    diff: &DiffResult,
    type_name: &str,
    feature: &str,
    options: &AgreementOptions,
) -> Result<AgreementResult, AgreementError> {
    agreement_with(diff, type_name, feature, options, &KrippendorffAlpha)
}

fn agreement_with(
    diff: &DiffResult,
    type_name: &str,
    feature: &str,
    options: &AgreementOptions,
    measure: &dyn AgreementMeasure,
) -> Result<AgreementResult, AgreementError> {
    let StudyOutcome { study, breakdown } = make_coding_study(diff, type_name, feature, options)?;
    let coefficient = measure.calculate(&study)?;

    debug!(
        type_name,
        feature,
        measure = measure.name(),
        value = coefficient.value,
        items = coefficient.item_count,
        "agreement calculated"
    );

    Ok(AgreementResult {
        type_name: type_name.to_string(),
        feature: feature.to_string(),
        measure: measure.name(),
        coefficient,
        breakdown,
        study,
    })
}
