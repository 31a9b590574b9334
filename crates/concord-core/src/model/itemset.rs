//! Sparse itemsets and the rules built from them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sparse assignment of attribute index → value index.
///
/// Attributes without an entry are unconstrained. Equality is structural:
/// two itemsets are equal iff they assign the same values to the same
/// attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Itemset {
    items: BTreeMap<usize, usize>,
}

impl Itemset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an itemset from `(attribute, value)` pairs; later pairs win.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        Self {
            items: pairs.into_iter().collect(),
        }
    }

    /// Assigns `value` to `attribute`, returning the previous assignment.
    pub fn insert(&mut self, attribute: usize, value: usize) -> Option<usize> {
        self.items.insert(attribute, value)
    }

    /// Value assigned to `attribute`, or `None` when unconstrained.
    pub fn get(&self, attribute: usize) -> Option<usize> {
        self.items.get(&attribute).copied()
    }

    pub fn contains_attribute(&self, attribute: usize) -> bool {
        self.items.contains_key(&attribute)
    }

    /// Number of assigned attributes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Assigned `(attribute, value)` pairs in attribute order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.items.iter().map(|(&a, &v)| (a, v))
    }
}

/// An antecedent itemset implying a consequent itemset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
}

impl Rule {
    pub fn new(antecedent: Itemset, consequent: Itemset) -> Self {
        Self {
            antecedent,
            consequent,
        }
    }
}
