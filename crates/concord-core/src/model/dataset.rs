//! In-memory datasets and their contiguous partitions.

use std::sync::Arc;

use super::Schema;
use crate::errors::DatasetError;

/// One value index (or missing) per schema attribute.
pub type Row = Vec<Option<usize>>;

/// Ordered rows over a shared schema.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Arc<Schema>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Builds a dataset, checking every row against the schema.
    pub fn new(schema: Schema, rows: Vec<Row>) -> Result<Self, DatasetError> {
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != schema.num_attributes() {
                return Err(DatasetError::RowWidth {
                    row: row_idx,
                    expected: schema.num_attributes(),
                    found: row.len(),
                });
            }
            for (attr_idx, value) in row.iter().enumerate() {
                let Some(value) = *value else { continue };
                let attribute = &schema.attributes()[attr_idx];
                if value >= attribute.values.len() {
                    return Err(DatasetError::ValueOutOfRange {
                        row: row_idx,
                        attribute: attribute.name.clone(),
                        value,
                    });
                }
            }
        }
        Ok(Self {
            schema: Arc::new(schema),
            rows,
        })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A contiguous block of a dataset's rows, owned by the job that mines it.
#[derive(Debug, Clone)]
pub struct Partition {
    index: usize,
    schema: Arc<Schema>,
    rows: Vec<Row>,
}

impl Partition {
    pub fn new(index: usize, schema: Arc<Schema>, rows: Vec<Row>) -> Self {
        Self {
            index,
            schema,
            rows,
        }
    }

    /// 0-based position of this partition in the split.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attribute;

    fn schema() -> Schema {
        Schema::new(
            "t",
            vec![
                Attribute::new("a", vec!["x".into(), "y".into()]),
                Attribute::new("b", vec!["z".into()]),
            ],
        )
    }

    #[test]
    fn accepts_rows_with_missing_values() {
        let ds = Dataset::new(schema(), vec![vec![Some(1), None], vec![None, Some(0)]]).unwrap();
        assert_eq!(ds.num_rows(), 2);
    }

    #[test]
    fn rejects_wrong_row_width() {
        let err = Dataset::new(schema(), vec![vec![Some(0)]]).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::RowWidth {
                row: 0,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn rejects_undeclared_value_index() {
        let err = Dataset::new(schema(), vec![vec![Some(0), Some(3)]]).unwrap_err();
        assert!(matches!(err, DatasetError::ValueOutOfRange { value: 3, .. }));
    }
}
