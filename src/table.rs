//! Searchable reference tables (tool lists, task owners, comparisons).

use serde::{Deserialize, Serialize};

use crate::ir::{Diagram, DiagramNode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("a table needs at least one column")]
    NoColumns,
    #[error("row {index} has {found} cells but the table has {expected} columns")]
    RaggedRow {
        index: usize,
        found: usize,
        expected: usize,
    },
    #[error("unknown column {0:?}")]
    UnknownColumn(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ReferenceTable {
    pub fn new<I, S>(columns: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(TableError::NoColumns);
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    pub fn push_row<I, S>(&mut self, row: I) -> Result<(), TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();
        if row.len() != self.columns.len() {
            return Err(TableError::RaggedRow {
                index: self.rows.len(),
                found: row.len(),
                expected: self.columns.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Rows with any cell containing `query`, ignoring case. A blank query keeps every row.
    pub fn filter(&self, query: &str) -> ReferenceTable {
        let needle = query.trim().to_lowercase();
        let rows = self
            .rows
            .iter()
            .filter(|row| {
                needle.is_empty() || row.iter().any(|cell| cell.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        ReferenceTable {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Lays the table out as a grid: one row lane per key value, one column lane
    /// per remaining column. Blank cells are left for the grid to fill with placeholders.
    pub fn to_grid_diagram(&self, key_column: &str) -> Result<Diagram, TableError> {
        let key = self
            .column_index(key_column)
            .ok_or_else(|| TableError::UnknownColumn(key_column.to_string()))?;
        let columns: Vec<&str> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != key)
            .map(|(_, column)| column.as_str())
            .collect();
        let rows: Vec<&str> = self.rows.iter().map(|row| row[key].as_str()).collect();

        let mut nodes = Vec::new();
        for row in &self.rows {
            let lane = &row[key];
            for (idx, value) in row.iter().enumerate() {
                if idx == key || value.trim().is_empty() {
                    continue;
                }
                let column = &self.columns[idx];
                nodes.push(
                    DiagramNode::new(&format!("{lane} / {column}"), [value.as_str()])
                        .in_cell(column, lane),
                );
            }
        }
        Ok(Diagram::grid(&columns, &rows, nodes))
    }
}
