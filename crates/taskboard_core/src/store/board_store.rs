//! Board state store.
//!
//! # Responsibility
//! - Own the current board snapshot and the medium it persists to.
//! - Apply task/column mutations as whole-snapshot replacements.
//! - Notify observers and persist after every applied mutation.
//!
//! # Invariants
//! - A mutation either swaps in one new consistent snapshot or leaves the
//!   current one untouched; readers never see a partial board.
//! - Persistence failures are logged and never roll back the snapshot.
//! - Absent or unparseable entries fall back to the default board. A parsed
//!   but inconsistent entry is repaired, never discarded. Neither case is
//!   surfaced to callers.

use crate::config::StoreConfig;
use crate::model::board::Board;
use crate::model::column::{Column, ColumnId};
use crate::model::task::{Task, TaskId, TaskPatch};
use crate::storage::KeyValueStore;
use crate::store::observer::{BoardObserver, Observers, SubscriptionId};
use crate::store::outcome::{Outcome, SkipReason};
use crate::store::snapshot::{encode_board, parse_board};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Instant;

/// Where the append/splice variants of a move put the task.
#[derive(Debug, Clone, Copy)]
enum Placement {
    Tail,
    Index(usize),
}

/// Explicitly constructed board store over one key-value medium.
pub struct BoardStore<S: KeyValueStore> {
    storage: S,
    config: StoreConfig,
    board: Option<Arc<Board>>,
    observers: Observers,
}

impl<S: KeyValueStore> BoardStore<S> {
    /// Creates an un-hydrated store. Nothing is read until [`Self::initialize`]
    /// or the first read/mutation.
    pub fn new(storage: S, config: StoreConfig) -> Self {
        Self {
            storage,
            config,
            board: None,
            observers: Observers::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn is_initialized(&self) -> bool {
        self.board.is_some()
    }

    /// Hydrates from the medium, falling back to the default board.
    ///
    /// Idempotent: a hydrated store keeps its current snapshot.
    pub fn initialize(&mut self) -> Arc<Board> {
        if let Some(board) = &self.board {
            return Arc::clone(board);
        }
        let board = Arc::new(self.hydrate());
        self.board = Some(Arc::clone(&board));
        board
    }

    /// Drops observers and the in-memory snapshot. Persisted data stays; a
    /// later access hydrates again.
    pub fn dispose(&mut self) {
        info!(
            "event=board_dispose module=store status=ok observers={}",
            self.observers.len()
        );
        self.observers.clear();
        self.board = None;
    }

    /// Current snapshot. Holding the returned `Arc` pins that version.
    pub fn snapshot(&mut self) -> Arc<Board> {
        self.initialize()
    }

    pub fn subscribe(&mut self, observer: impl BoardObserver + 'static) -> SubscriptionId {
        self.observers.add(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(id)
    }

    /// Replaces the board with the default one and removes the persisted
    /// entry, so a fresh store over the same medium hydrates the default too.
    pub fn reset(&mut self) {
        let board = Arc::new(Board::default_board());
        self.board = Some(Arc::clone(&board));
        info!("event=board_reset module=store status=ok");
        self.observers.notify(&board);

        let key = self.config.storage_key.as_str();
        if let Err(err) = self.storage.remove(key) {
            error!(
                "event=board_reset module=store status=error error_code=remove_failed key={key} error={err}"
            );
        }
    }

    /// Creates a task at the tail of `column_id`.
    pub fn add_task(
        &mut self,
        column_id: &str,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Outcome<TaskId> {
        let task = Task::new(column_id, title, description);
        let task_id = task.id.clone();
        self.apply("add_task", |board| {
            let column = board
                .column_mut(column_id)
                .ok_or_else(|| SkipReason::ColumnNotFound(column_id.to_string()))?;
            column.task_ids.push(task.id.clone());
            board.tasks.insert(task.id.clone(), task);
            Ok(task_id)
        })
    }

    /// Merges `patch` into a task. A changed `status` re-homes the task to the
    /// tail of the target column.
    ///
    /// A status naming an unknown column skips the whole patch, so a task can
    /// never point at a column that does not list it.
    pub fn update_task(&mut self, task_id: &str, patch: TaskPatch) -> Outcome {
        self.apply("update_task", |board| {
            let current = board
                .tasks
                .get(task_id)
                .ok_or_else(|| SkipReason::TaskNotFound(task_id.to_string()))?;
            if let Some(status) = &patch.status {
                if !board.has_column(status) {
                    return Err(SkipReason::ColumnNotFound(status.clone()));
                }
            }

            let updated = current.merged(&patch);
            let listed_in = board.column_of(task_id).map(|column| column.id.clone());
            if listed_in.as_deref() != Some(updated.status.as_str()) {
                for column in &mut board.columns {
                    column.detach(task_id);
                }
                if let Some(target) = board.column_mut(&updated.status) {
                    target.task_ids.push(task_id.to_string());
                }
            }
            board.tasks.insert(task_id.to_string(), updated);
            Ok(())
        })
    }

    /// Removes a task from the map and from every column listing it.
    pub fn delete_task(&mut self, task_id: &str) -> Outcome {
        self.apply("delete_task", |board| {
            board
                .tasks
                .remove(task_id)
                .ok_or_else(|| SkipReason::TaskNotFound(task_id.to_string()))?;
            for column in &mut board.columns {
                column.detach(task_id);
            }
            Ok(())
        })
    }

    /// Moves a task from `source` to the tail of `destination`.
    pub fn move_task(&mut self, task_id: &str, source: &str, destination: &str) -> Outcome {
        self.relocate("move_task", task_id, source, destination, Placement::Tail)
    }

    /// Moves a task from `source` into `destination` at `index`, clamped to
    /// the destination length after removal. With `source == destination`
    /// this reorders inside one column.
    pub fn move_task_to(
        &mut self,
        task_id: &str,
        source: &str,
        destination: &str,
        index: usize,
    ) -> Outcome {
        self.relocate(
            "move_task_to",
            task_id,
            source,
            destination,
            Placement::Index(index),
        )
    }

    /// Appends an empty column.
    pub fn add_column(&mut self, title: impl Into<String>) -> Outcome<ColumnId> {
        let column = Column::new(title);
        self.apply("add_column", |board| {
            let column_id = column.id.clone();
            board.columns.push(column);
            Ok(column_id)
        })
    }

    /// Removes a column and every task whose status names it.
    ///
    /// The last column may be deleted; keeping at least one is a caller guard.
    pub fn delete_column(&mut self, column_id: &str) -> Outcome {
        self.apply("delete_column", |board| {
            let position = board
                .columns
                .iter()
                .position(|column| column.id == column_id)
                .ok_or_else(|| SkipReason::ColumnNotFound(column_id.to_string()))?;
            let removed = board.columns.remove(position);
            board.tasks.retain(|_, task| task.status != column_id);
            debug!(
                "event=column_cascade module=store column_id={} removed_tasks={}",
                removed.id,
                removed.task_ids.len()
            );
            Ok(())
        })
    }

    fn relocate(
        &mut self,
        operation: &'static str,
        task_id: &str,
        source: &str,
        destination: &str,
        placement: Placement,
    ) -> Outcome {
        self.apply(operation, |board| {
            if !board.has_column(source) {
                return Err(SkipReason::ColumnNotFound(source.to_string()));
            }
            if !board.has_column(destination) {
                return Err(SkipReason::ColumnNotFound(destination.to_string()));
            }
            if !board.tasks.contains_key(task_id) {
                return Err(SkipReason::TaskNotFound(task_id.to_string()));
            }

            let from = board
                .column_mut(source)
                .ok_or_else(|| SkipReason::ColumnNotFound(source.to_string()))?;
            if !from.detach(task_id) {
                return Err(SkipReason::TaskNotInColumn {
                    task_id: task_id.to_string(),
                    column_id: source.to_string(),
                });
            }

            let to = board
                .column_mut(destination)
                .ok_or_else(|| SkipReason::ColumnNotFound(destination.to_string()))?;
            match placement {
                Placement::Tail => to.task_ids.push(task_id.to_string()),
                Placement::Index(index) => to.insert_at(index, task_id.to_string()),
            }

            if let Some(task) = board.tasks.get_mut(task_id) {
                task.status = destination.to_string();
            }
            Ok(())
        })
    }

    /// Runs `mutate` on a private copy of the current board and swaps it in on
    /// success. A skipped mutation drops the copy.
    fn apply<T>(
        &mut self,
        operation: &'static str,
        mutate: impl FnOnce(&mut Board) -> Result<T, SkipReason>,
    ) -> Outcome<T> {
        let current = self.initialize();
        let mut next = Board::clone(&current);

        let value = match mutate(&mut next) {
            Ok(value) => value,
            Err(reason) => {
                debug!(
                    "event=board_mutation module=store op={operation} status=skipped reason={}",
                    reason.code()
                );
                return Outcome::Skipped(reason);
            }
        };

        debug_assert!(next.validate().is_ok(), "{operation} broke board invariants");

        let next = Arc::new(next);
        self.board = Some(Arc::clone(&next));
        info!(
            "event=board_mutation module=store op={operation} status=ok tasks={} columns={}",
            next.task_count(),
            next.columns.len()
        );

        self.observers.notify(&next);
        self.persist(&next);
        Outcome::Applied(value)
    }

    fn hydrate(&self) -> Board {
        let started_at = Instant::now();
        let key = self.config.storage_key.as_str();

        let bytes = match self.storage.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!("event=board_hydrate module=store status=default reason=absent key={key}");
                return Board::default_board();
            }
            Err(err) => {
                warn!(
                    "event=board_hydrate module=store status=fallback reason=read_failed key={key} error={err}"
                );
                return Board::default_board();
            }
        };

        match parse_board(&bytes) {
            Ok(mut board) => {
                if let Err(violation) = board.validate() {
                    let fixes = board.repair();
                    warn!(
                        "event=board_hydrate module=store status=repaired key={key} fixes={fixes} first_violation={violation}"
                    );
                }
                info!(
                    "event=board_hydrate module=store status=ok key={key} tasks={} columns={} duration_ms={}",
                    board.task_count(),
                    board.columns.len(),
                    started_at.elapsed().as_millis()
                );
                board
            }
            Err(err) => {
                warn!(
                    "event=board_hydrate module=store status=fallback reason=decode_failed key={key} error={err}"
                );
                Board::default_board()
            }
        }
    }

    fn persist(&self, board: &Board) {
        let key = self.config.storage_key.as_str();
        let bytes = match encode_board(board) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(
                    "event=board_persist module=store status=error error_code=encode_failed key={key} error={err}"
                );
                return;
            }
        };
        match self.storage.set(key, &bytes) {
            Ok(()) => debug!(
                "event=board_persist module=store status=ok key={key} bytes={}",
                bytes.len()
            ),
            Err(err) => error!(
                "event=board_persist module=store status=error error_code=write_failed key={key} error={err}"
            ),
        }
    }
}
