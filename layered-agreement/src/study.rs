//! Coding studies: the rater-by-item tables agreement measures consume.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A nominal category assigned by one annotator to one item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Category(pub String);

impl Category {
    pub fn new(value: impl Into<String>) -> Self {
        Category(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category(value.to_string())
    }
}

/// One coded unit: one slot per study annotator, `None` for no category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingItem {
    pub key: String,
    pub units: Vec<Option<Category>>,
}

impl CodingItem {
    /// Categories that were actually assigned.
    pub fn assigned(&self) -> impl Iterator<Item = &Category> {
        self.units.iter().flatten()
    }

    pub fn is_all_null(&self) -> bool {
        self.units.iter().all(Option::is_none)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingStudy {
    annotators: Vec<String>,
    items: Vec<CodingItem>,
}

impl CodingStudy {
    pub fn new(annotators: Vec<String>) -> Self {
        Self {
            annotators,
            items: Vec::new(),
        }
    }

    /// Append an item.
    ///
    /// # Panics
    ///
    /// Panics when `units` does not have one entry per annotator.
    pub fn add_item(&mut self, key: impl Into<String>, units: Vec<Option<Category>>) {
        assert_eq!(
            units.len(),
            self.annotators.len(),
            "coding item needs one unit per annotator"
        );
        self.items.push(CodingItem {
            key: key.into(),
            units,
        });
    }

    pub fn annotators(&self) -> &[String] {
        &self.annotators
    }

    pub fn items(&self) -> &[CodingItem] {
        &self.items
    }

    pub fn annotator_count(&self) -> usize {
        self.annotators.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Distinct assigned categories, sorted.
    pub fn categories(&self) -> BTreeSet<&Category> {
        self.items.iter().flat_map(|item| item.assigned()).collect()
    }

    /// True when no item carries any category (also for an empty study).
    pub fn is_all_null(&self) -> bool {
        self.items.iter().all(CodingItem::is_all_null)
    }

    pub fn annotator_index(&self, annotator: &str) -> Option<usize> {
        self.annotators.iter().position(|name| name == annotator)
    }

    /// Two-annotator sub-study over the same items.
    ///
    /// An annotator missing from this study contributes `None` everywhere.
    pub fn pair(&self, a: &str, b: &str) -> CodingStudy {
        let first = self.annotator_index(a);
        let second = self.annotator_index(b);
        let unit = |item: &CodingItem, idx: Option<usize>| {
            idx.and_then(|idx| item.units[idx].clone())
        };

        CodingStudy {
            annotators: vec![a.to_string(), b.to_string()],
            items: self
                .items
                .iter()
                .map(|item| CodingItem {
                    key: item.key.clone(),
                    units: vec![unit(item, first), unit(item, second)],
                })
                .collect(),
        }
    }

    /// Serialize to a RON string.
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, config)
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).expect("coding study always serializes")
    }
}
