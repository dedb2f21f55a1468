#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Annotation alignment across annotators.
//!
//! Given the same document annotated independently by several annotators,
//! this crate aligns annotations that refer to the same unit and groups them
//! into configuration sets that can be inspected for disagreement or fed to
//! agreement statistics (see the `layered-agreement` crate).
//!
//! ## Core Types
//!
//! - [`AnnotationDocument`] / [`TypeSchema`] - input annotations and their schema
//! - [`Position`] - annotator-independent identity of an annotation slot
//! - [`DiffAdapter`] - span and relation strategies for positions and labels
//! - [`LinkCompareBehavior`] - whether slot roles or slot targets are compared
//! - [`CasDiff`] - the alignment engine
//! - [`DiffResult`] / [`ConfigurationSet`] - aligned output
//!
//! ## Data flow
//!
//! ```text
//! {annotator -> [document?]} ──CasDiff(adapters, policy)──> DiffResult
//!     DiffResult ──(type, feature)──> coding study ──> agreement
//! ```

mod adapter;
pub mod cas;
mod cas_diff;
mod config;
mod diff_result;
mod display;
mod errors;
mod label;
mod link_compare;
mod position;

pub use adapter::{DiffAdapter, ExpandedSlot, RelationDiffAdapter, SpanDiffAdapter};
pub use cas::{
    Annotation, AnnotationDocument, AnnotationId, FeatureValue, LinkEntry, LinkFeatureSpec,
    RelationEndpoints, TypeSchema, TypeSystem,
};
pub use cas_diff::{do_diff, AnnotatorDocuments, CasDiff};
pub use config::{AdapterConfig, DiffConfig};
pub use diff_result::{
    AnnotationRef, Configuration, ConfigurationSet, DiffResult, DiffSummary, EndpointResolution,
    SlotFiller,
};
pub use display::DiffDisplay;
pub use errors::DiffError;
pub use label::LabelValue;
pub use link_compare::LinkCompareBehavior;
pub use position::{Anchor, LinkSlot, Position, SpanTarget};
