//! Feature frames: ordered named columns over one or more rows.
//!
//! Column order is load-bearing. Models were fit on a specific column
//! order, and a silently reordered frame produces silently wrong
//! predictions, so every subsetting operation here either preserves the
//! requested order exactly or fails loudly.

use std::collections::HashMap;

use inhibryx_common::{InhibryxError, Result};

/// A small column-ordered numeric table.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    /// Row-major values; each row has `columns.len()` entries.
    rows: Vec<Vec<f64>>,
}

impl FeatureFrame {
    /// Build a single-row frame from (name, value) pairs, preserving
    /// pair order as column order.
    pub fn from_row(pairs: Vec<(String, f64)>) -> Self {
        let columns: Vec<String> = pairs.iter().map(|(n, _)| n.clone()).collect();
        let row: Vec<f64> = pairs.iter().map(|(_, v)| *v).collect();
        Self::new(columns, vec![row])
    }

    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Self { columns, index, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Value at (row, column name).
    pub fn get(&self, row: usize, name: &str) -> Option<f64> {
        let &col = self.index.get(name)?;
        self.rows.get(row).map(|r| r[col])
    }

    /// Subset and reorder columns to exactly `selected`. Any selected
    /// name absent from this frame is a `FeatureMismatch` error listing
    /// every missing column.
    pub fn select(&self, selected: &[String]) -> Result<FeatureFrame> {
        let missing: Vec<String> = selected
            .iter()
            .filter(|name| !self.index.contains_key(*name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(InhibryxError::FeatureMismatch(missing));
        }

        let positions: Vec<usize> = selected.iter().map(|n| self.index[n]).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| positions.iter().map(|&p| row[p]).collect())
            .collect();
        Ok(FeatureFrame::new(selected.to_vec(), rows))
    }

    /// Append the rows of `other`, which must have identical columns.
    pub fn stack(&mut self, other: FeatureFrame) -> Result<()> {
        if other.columns != self.columns {
            return Err(InhibryxError::FeatureMismatch(
                other
                    .columns
                    .iter()
                    .filter(|c| !self.index.contains_key(*c))
                    .cloned()
                    .collect(),
            ));
        }
        self.rows.extend(other.rows);
        Ok(())
    }
}
