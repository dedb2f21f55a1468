//! Error types for diff configuration.
//!
//! Only contract violations detected while building adapters or a
//! [`CasDiff`](crate::CasDiff) are errors. Missing, incomplete or ambiguous
//! annotation data is reported through the diff result instead.

use thiserror::Error;

/// Errors raised while configuring a diff.
#[derive(Debug, Error)]
pub enum DiffError {
    /// An entry type has no adapter.
    #[error("no diff adapter configured for entry type `{type_name}`")]
    MissingAdapter { type_name: String },

    /// Two adapters were configured for the same type.
    #[error("more than one diff adapter configured for type `{type_name}`")]
    DuplicateAdapter { type_name: String },

    /// The type is not declared in the type system.
    #[error("type `{type_name}` is not declared in the type system")]
    UnknownType { type_name: String },

    /// A relation adapter was requested for a type without endpoint features.
    #[error("type `{type_name}` declares no governor/dependent endpoint features")]
    MissingEndpoints { type_name: String },

    /// A label feature is one of the relation's endpoint features.
    #[error("feature `{feature}` of `{type_name}` is a relation endpoint and cannot be compared as a label")]
    EndpointConflict { type_name: String, feature: String },

    /// A configured link feature is not a link feature in the schema.
    #[error("`{feature}` is not a link feature of `{type_name}`")]
    UnknownLinkFeature { type_name: String, feature: String },

    /// A feature is configured both as a label and as a link feature.
    #[error("feature `{feature}` of `{type_name}` is configured both as label and as link feature")]
    AmbiguousFeature { type_name: String, feature: String },

    /// Configuration could not be read or parsed.
    #[error("invalid diff configuration: {message}")]
    Config { message: String },
}
