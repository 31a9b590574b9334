//! Attribute schema shared by a dataset and all of its partitions.

use serde::{Deserialize, Serialize};

/// A named categorical dimension with an ordered domain of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub values: Vec<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Returns the domain value at `index`, if declared.
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Returns the domain index of `value`, if declared.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }
}

/// Ordered attributes plus an optional class attribute.
///
/// The class attribute is only set after mining, when the collected rules are
/// reinterpreted in class-association mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    relation: String,
    attributes: Vec<Attribute>,
    class_index: Option<usize>,
}

impl Schema {
    pub fn new(relation: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            relation: relation.into(),
            attributes,
            class_index: None,
        }
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn attribute(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    /// Index of the attribute called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    /// Name of the value `value` of attribute `attribute`.
    pub fn value_name(&self, attribute: usize, value: usize) -> Option<&str> {
        self.attribute(attribute).and_then(|a| a.value(value))
    }

    pub fn class_index(&self) -> Option<usize> {
        self.class_index
    }

    /// Returns the class attribute, if one is designated.
    pub fn class_attribute(&self) -> Option<&Attribute> {
        self.class_index.and_then(|i| self.attributes.get(i))
    }

    /// Returns a copy of this schema with the class attribute designated.
    ///
    /// Indices past the last attribute are ignored and leave the class unset.
    pub fn with_class_index(&self, class_index: Option<usize>) -> Self {
        let class_index = class_index.filter(|&i| i < self.attributes.len());
        Self {
            relation: self.relation.clone(),
            attributes: self.attributes.clone(),
            class_index,
        }
    }
}
