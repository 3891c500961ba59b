//! Column domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::TaskId;

/// Opaque column identifier. The default board uses readable slugs
/// (`todo`, `in-progress`, `done`); added columns get UUID strings.
pub type ColumnId = String;

/// A named, ordered bucket of task ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    /// Display order within the column. No duplicates.
    pub task_ids: Vec<TaskId>,
}

impl Column {
    /// Creates an empty column with a freshly generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), title)
    }

    /// Creates an empty column with a caller-provided id.
    pub fn with_id(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            task_ids: Vec::new(),
        }
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.task_ids.iter().any(|id| id == task_id)
    }

    pub fn position_of(&self, task_id: &str) -> Option<usize> {
        self.task_ids.iter().position(|id| id == task_id)
    }

    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }

    /// Removes every occurrence of `task_id`; returns whether anything was removed.
    pub(crate) fn detach(&mut self, task_id: &str) -> bool {
        let before = self.task_ids.len();
        self.task_ids.retain(|id| id != task_id);
        self.task_ids.len() != before
    }

    /// Inserts at `index`, clamped to the current length.
    pub(crate) fn insert_at(&mut self, index: usize, task_id: TaskId) {
        let index = index.min(self.task_ids.len());
        self.task_ids.insert(index, task_id);
    }
}
