//! Snapshot change notification.

use crate::model::board::Board;
use std::sync::Arc;

/// Receives every new snapshot produced by an applied mutation.
pub trait BoardObserver {
    fn board_changed(&mut self, board: &Arc<Board>);
}

impl<F> BoardObserver for F
where
    F: FnMut(&Arc<Board>),
{
    fn board_changed(&mut self, board: &Arc<Board>) {
        self(board)
    }
}

/// Handle returned by `BoardStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Box<dyn BoardObserver>)>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, observer: Box<dyn BoardObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn notify(&mut self, board: &Arc<Board>) {
        for (_, observer) in &mut self.entries {
            observer.board_changed(board);
        }
    }
}
