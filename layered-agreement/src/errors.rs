//! Error types for agreement calculation.

use thiserror::Error;

/// Errors raised while configuring or running an agreement measure.
///
/// Degenerate studies (no items, a single category, nothing pairable) are not
/// errors; the coefficient is NaN instead.
#[derive(Debug, Error)]
pub enum AgreementError {
    /// The measure is only defined for a fixed number of annotators.
    #[error("{measure} needs exactly {expected} annotators, the study has {found}")]
    AnnotatorCount {
        measure: &'static str,
        expected: usize,
        found: usize,
    },

    /// The feature is neither a label feature nor a link feature of the type.
    #[error("feature `{feature}` is not compared for type `{type_name}`")]
    UnknownFeature { type_name: String, feature: String },

    /// Configuration could not be parsed.
    #[error("invalid agreement configuration: {message}")]
    Config { message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
