//! Ranked consensus output.

use serde::{Deserialize, Serialize};

/// A canonical rule string and the number of run pairs that agreed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusEntry {
    pub rule: String,
    pub votes: usize,
}

impl ConsensusEntry {
    pub fn new(rule: impl Into<String>, votes: usize) -> Self {
        Self {
            rule: rule.into(),
            votes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_rule_and_votes() {
        let entry = ConsensusEntry::new("a=x  ==>  b=y ", 2);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({ "rule": "a=x  ==>  b=y ", "votes": 2 }));
    }
}
