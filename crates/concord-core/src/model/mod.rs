//! Data model: schema, dataset, itemsets, rules, and mining results.

pub mod consensus;
pub mod dataset;
pub mod itemset;
pub mod params;
pub mod run;
pub mod schema;

pub use consensus::ConsensusEntry;
pub use dataset::{Dataset, Partition, Row};
pub use itemset::{Itemset, Rule};
pub use params::{class_index_from_user, MetricType, MiningParameters};
pub use run::{MinedRun, RunResult};
pub use schema::{Attribute, Schema};
