//! Ordered registry of columns

use super::column::Column;
use crate::inference::InferenceError;

/// Columns in source order. Positions are unique and contiguous from 0.
#[derive(Debug, Clone, Default)]
pub struct ColumnCollection {
    items: Vec<Column>,
}

impl ColumnCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column; its position must be the next free index
    pub fn add(&mut self, column: Column) -> Result<(), InferenceError> {
        if column.position() != self.items.len() {
            return Err(InferenceError::InvalidState(format!(
                "column '{}' has position {}, expected {}",
                column.name(),
                column.position(),
                self.items.len()
            )));
        }
        self.items.push(column);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Column> {
        self.items.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut Column> {
        self.items.get_mut(position)
    }

    /// First column with this name
    pub fn get_by_name(&self, name: &str) -> Option<&Column> {
        self.items.iter().find(|c| c.name() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Column> {
        self.items.iter_mut()
    }

    pub fn names(&self) -> Vec<String> {
        self.items.iter().map(|c| c.name().to_string()).collect()
    }
}

impl<'a> IntoIterator for &'a ColumnCollection {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
