//! Board snapshot aggregate.
//!
//! # Responsibility
//! - Hold one consistent version of all columns and tasks.
//! - Validate cross-entity invariants for hydrated or hand-built boards.
//!
//! # Invariants
//! - Every listed task id exists in `tasks`.
//! - Every task is listed exactly once, in the column named by its `status`.
//! - Column ids are unique; task map keys equal `task.id`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

use super::column::{Column, ColumnId};
use super::task::{Task, TaskId};

pub const DEFAULT_COLUMNS: [(&str, &str); 3] = [
    ("todo", "To Do"),
    ("in-progress", "In Progress"),
    ("done", "Done"),
];

/// One immutable-by-convention version of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub tasks: BTreeMap<TaskId, Task>,
    /// Display order.
    pub columns: Vec<Column>,
}

/// Invariant violations detected by [`Board::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardValidationError {
    DuplicateColumn(ColumnId),
    /// Map key differs from the task's own `id`.
    TaskKeyMismatch { key: TaskId, id: TaskId },
    /// A column lists an id with no task record.
    DanglingTaskRef { column_id: ColumnId, task_id: TaskId },
    /// The same task id is listed more than once across all columns.
    DuplicateMembership(TaskId),
    /// A task's status names a column that does not list it.
    StatusMismatch {
        task_id: TaskId,
        status: ColumnId,
        listed_in: Option<ColumnId>,
    },
}

impl Display for BoardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateColumn(id) => write!(f, "duplicate column id: {id}"),
            Self::TaskKeyMismatch { key, id } => {
                write!(f, "task stored under key `{key}` carries id `{id}`")
            }
            Self::DanglingTaskRef { column_id, task_id } => {
                write!(f, "column {column_id} lists unknown task {task_id}")
            }
            Self::DuplicateMembership(id) => write!(f, "task {id} is listed more than once"),
            Self::StatusMismatch {
                task_id,
                status,
                listed_in,
            } => match listed_in {
                Some(column_id) => write!(
                    f,
                    "task {task_id} has status `{status}` but is listed in column {column_id}"
                ),
                None => write!(
                    f,
                    "task {task_id} has status `{status}` but is not listed in any column"
                ),
            },
        }
    }
}

impl Error for BoardValidationError {}

impl Board {
    /// The fallback board: three empty workflow columns, no tasks.
    pub fn default_board() -> Self {
        Self {
            tasks: BTreeMap::new(),
            columns: DEFAULT_COLUMNS
                .iter()
                .map(|(id, title)| Column::with_id(*id, *title))
                .collect(),
        }
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == column_id)
    }

    pub(crate) fn column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| column.id == column_id)
    }

    pub fn has_column(&self, column_id: &str) -> bool {
        self.column(column_id).is_some()
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.get(task_id)
    }

    /// Column currently listing `task_id`, found by membership rather than
    /// by the task's `status`.
    pub fn column_of(&self, task_id: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.contains(task_id))
    }

    /// Tasks of one column in display order. Empty for unknown columns.
    pub fn column_tasks(&self, column_id: &str) -> Vec<&Task> {
        self.column(column_id)
            .map(|column| {
                column
                    .task_ids
                    .iter()
                    .filter_map(|task_id| self.tasks.get(task_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Checks every cross-entity invariant; returns the first violation.
    pub fn validate(&self) -> Result<(), BoardValidationError> {
        let mut column_ids = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if !column_ids.insert(column.id.as_str()) {
                return Err(BoardValidationError::DuplicateColumn(column.id.clone()));
            }
        }

        for (key, task) in &self.tasks {
            if key != &task.id {
                return Err(BoardValidationError::TaskKeyMismatch {
                    key: key.clone(),
                    id: task.id.clone(),
                });
            }
        }

        let mut listed_in: HashMap<&str, &str> = HashMap::with_capacity(self.tasks.len());
        for column in &self.columns {
            for task_id in &column.task_ids {
                if !self.tasks.contains_key(task_id) {
                    return Err(BoardValidationError::DanglingTaskRef {
                        column_id: column.id.clone(),
                        task_id: task_id.clone(),
                    });
                }
                if listed_in
                    .insert(task_id.as_str(), column.id.as_str())
                    .is_some()
                {
                    return Err(BoardValidationError::DuplicateMembership(task_id.clone()));
                }
            }
        }

        for task in self.tasks.values() {
            let column_id = listed_in.get(task.id.as_str()).copied();
            if column_id != Some(task.status.as_str()) {
                return Err(BoardValidationError::StatusMismatch {
                    task_id: task.id.clone(),
                    status: task.status.clone(),
                    listed_in: column_id.map(str::to_string),
                });
            }
        }

        Ok(())
    }

    /// Rewrites an inconsistent board into one that passes [`Self::validate`],
    /// keeping as many tasks as possible. Returns the number of fixes made.
    ///
    /// - Later columns reusing an earlier id are dropped.
    /// - A task stored under a different key takes the key as its id.
    /// - Dangling and repeated listings are dropped; the first listing wins.
    /// - A task whose status names an existing column moves to that column's
    ///   tail. Otherwise its status follows the column listing it.
    /// - An unlisted task with an unknown status lands in the first column,
    ///   or is dropped when the board has no columns.
    pub fn repair(&mut self) -> usize {
        let mut fixes = 0;

        let mut column_ids = HashSet::with_capacity(self.columns.len());
        let before = self.columns.len();
        self.columns.retain(|column| column_ids.insert(column.id.clone()));
        fixes += before - self.columns.len();

        for (key, task) in self.tasks.iter_mut() {
            if key != &task.id {
                task.id = key.clone();
                fixes += 1;
            }
        }

        let mut listed_in: HashMap<TaskId, ColumnId> = HashMap::with_capacity(self.tasks.len());
        for column in &mut self.columns {
            let before = column.task_ids.len();
            let tasks = &self.tasks;
            column.task_ids.retain(|task_id| {
                tasks.contains_key(task_id)
                    && listed_in
                        .insert(task_id.clone(), column.id.clone())
                        .is_none()
            });
            fixes += before - column.task_ids.len();
        }

        let fallback = self.columns.first().map(|column| column.id.clone());
        let mut orphans = Vec::new();
        for task in self.tasks.values_mut() {
            let listed = listed_in.get(&task.id);
            if listed == Some(&task.status) {
                continue;
            }
            fixes += 1;

            if column_ids.contains(&task.status) {
                if let Some(column_id) = listed {
                    if let Some(column) = self.columns.iter_mut().find(|c| &c.id == column_id) {
                        column.detach(&task.id);
                    }
                }
                if let Some(column) = self.columns.iter_mut().find(|c| c.id == task.status) {
                    column.task_ids.push(task.id.clone());
                }
            } else if let Some(column_id) = listed {
                task.status = column_id.clone();
            } else if let Some(column_id) = &fallback {
                task.status = column_id.clone();
                if let Some(column) = self.columns.first_mut() {
                    column.task_ids.push(task.id.clone());
                }
            } else {
                orphans.push(task.id.clone());
            }
        }
        for task_id in orphans {
            self.tasks.remove(&task_id);
        }

        fixes
    }
}
