//! Result of one store mutation.

use crate::model::column::ColumnId;
use crate::model::task::TaskId;
use std::fmt::{Display, Formatter};

/// Why a mutation left the board untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    TaskNotFound(TaskId),
    ColumnNotFound(ColumnId),
    /// `move_task` named a source column that does not list the task.
    TaskNotInColumn { task_id: TaskId, column_id: ColumnId },
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::ColumnNotFound(id) => write!(f, "column not found: {id}"),
            Self::TaskNotInColumn { task_id, column_id } => {
                write!(f, "task {task_id} is not listed in column {column_id}")
            }
        }
    }
}

impl SkipReason {
    pub(crate) fn code(&self) -> &'static str {
        match self {
            Self::TaskNotFound(_) => "task_not_found",
            Self::ColumnNotFound(_) => "column_not_found",
            Self::TaskNotInColumn { .. } => "task_not_in_column",
        }
    }
}

/// Applied with a value, or skipped with the missing reference.
///
/// Skipping is not an error: the snapshot is unchanged, observers are not
/// notified, and nothing is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T = ()> {
    Applied(T),
    Skipped(SkipReason),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Applied(_) => None,
            Self::Skipped(reason) => Some(reason),
        }
    }
}
