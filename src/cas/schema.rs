//! Type/feature schema consumed by the diff adapters.
//!
//! Adapters resolve feature names against a [`TypeSchema`] once, when they
//! are constructed. Nothing in the alignment loop looks names up again.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Declaration of a multi-valued slot feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFeatureSpec {
    pub name: String,
    /// Type of the annotations slot fillers point at
    pub target_type: String,
}

/// The two reference features that name a relation's endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEndpoints {
    pub governor: String,
    pub dependent: String,
}

impl RelationEndpoints {
    pub fn contains(&self, feature: &str) -> bool {
        self.governor == feature || self.dependent == feature
    }
}

/// Schema of one annotation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSchema {
    pub name: String,
    #[serde(default)]
    features: BTreeSet<String>,
    #[serde(default)]
    link_features: BTreeMap<String, LinkFeatureSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    endpoints: Option<RelationEndpoints>,
}

impl TypeSchema {
    /// Schema of a span type with no features yet.
    pub fn span(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            features: BTreeSet::new(),
            link_features: BTreeMap::new(),
            endpoints: None,
        }
    }

    /// Schema of a relation type whose endpoints live in the two named features.
    pub fn relation(
        name: impl Into<String>,
        governor_feature: impl Into<String>,
        dependent_feature: impl Into<String>,
    ) -> Self {
        let endpoints = RelationEndpoints {
            governor: governor_feature.into(),
            dependent: dependent_feature.into(),
        };
        let mut schema = Self::span(name);
        schema.features.insert(endpoints.governor.clone());
        schema.features.insert(endpoints.dependent.clone());
        schema.endpoints = Some(endpoints);
        schema
    }

    pub fn with_feature(mut self, name: impl Into<String>) -> Self {
        self.features.insert(name.into());
        self
    }

    pub fn with_link_feature(mut self, name: impl Into<String>, target_type: impl Into<String>) -> Self {
        let name = name.into();
        self.link_features.insert(
            name.clone(),
            LinkFeatureSpec {
                name,
                target_type: target_type.into(),
            },
        );
        self
    }

    /// True for plain and link features alike.
    pub fn has_feature(&self, name: &str) -> bool {
        self.features.contains(name) || self.link_features.contains_key(name)
    }

    pub fn link_feature(&self, name: &str) -> Option<&LinkFeatureSpec> {
        self.link_features.get(name)
    }

    pub fn link_features(&self) -> impl Iterator<Item = &LinkFeatureSpec> {
        self.link_features.values()
    }

    pub fn endpoints(&self) -> Option<&RelationEndpoints> {
        self.endpoints.as_ref()
    }

    pub fn is_relation(&self) -> bool {
        self.endpoints.is_some()
    }
}

/// Collection of type schemas keyed by type name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSystem {
    types: BTreeMap<String, TypeSchema>,
}

impl TypeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, schema: TypeSchema) -> Self {
        self.add_type(schema);
        self
    }

    pub fn add_type(&mut self, schema: TypeSchema) {
        self.types.insert(schema.name.clone(), schema);
    }

    pub fn get(&self, name: &str) -> Option<&TypeSchema> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeSchema> {
        self.types.values()
    }
}
