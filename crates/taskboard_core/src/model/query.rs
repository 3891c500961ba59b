//! Task filtering for search bars and per-column views.

use super::board::Board;
use super::column::ColumnId;
use super::task::Task;

/// Filter over one board snapshot.
///
/// An empty `text` matches every task. Matching is case-insensitive over
/// title and description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub text: String,
    pub column: Option<ColumnId>,
}

impl TaskQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            column: None,
        }
    }

    pub fn in_column(mut self, column_id: impl Into<ColumnId>) -> Self {
        self.column = Some(column_id.into());
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(column_id) = &self.column {
            if &task.status != column_id {
                return false;
            }
        }
        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
    }
}

impl Board {
    /// Returns matching tasks in display order: column by column, then by
    /// position inside each column.
    pub fn search(&self, query: &TaskQuery) -> Vec<&Task> {
        self.columns
            .iter()
            .filter(|column| query.column.as_ref().map_or(true, |id| &column.id == id))
            .flat_map(|column| column.task_ids.iter())
            .filter_map(|task_id| self.tasks.get(task_id))
            .filter(|task| query.matches(task))
            .collect()
    }
}
