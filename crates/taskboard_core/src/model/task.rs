//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its partial-update shape.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `status` names the column whose `task_ids` lists this task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::column::ColumnId;

/// Opaque task identifier.
///
/// Kept as a string alias: persisted boards written by older clients carry
/// arbitrary string ids, not only UUIDs.
pub type TaskId = String;

/// One unit of work on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Display title. Not validated here; callers trim and reject blanks.
    pub title: String,
    pub description: String,
    /// Id of the owning column.
    pub status: ColumnId,
    /// Serialized as RFC 3339 (`createdAt`).
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task with a freshly generated id and the current time.
    pub fn new(
        status: impl Into<ColumnId>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::with_id(
            generate_task_id(),
            status,
            title,
            description,
            Utc::now(),
        )
    }

    /// Creates a task with caller-provided identity and creation time.
    ///
    /// Used by hydration fixtures and import paths.
    pub fn with_id(
        id: impl Into<TaskId>,
        status: impl Into<ColumnId>,
        title: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            status: status.into(),
            created_at,
        }
    }

    /// Returns a copy with `patch` merged in. Identity and creation time are
    /// never touched.
    pub fn merged(&self, patch: &TaskPatch) -> Self {
        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = title.clone();
        }
        if let Some(description) = &patch.description {
            next.description = description.clone();
        }
        if let Some(status) = &patch.status {
            next.status = status.clone();
        }
        next
    }
}

/// Partial update for `BoardStore::update_task`.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Moving a task by editing its status re-homes it to the tail of the
    /// target column.
    pub status: Option<ColumnId>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<ColumnId>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Returns whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

pub(crate) fn generate_task_id() -> TaskId {
    Uuid::new_v4().to_string()
}
