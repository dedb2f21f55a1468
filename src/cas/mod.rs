//! Input model: annotation documents and the type schema describing them.

mod document;
pub mod schema;

pub use document::{Annotation, AnnotationDocument, AnnotationId, FeatureValue, LinkEntry};
pub use schema::{LinkFeatureSpec, RelationEndpoints, TypeSchema, TypeSystem};
