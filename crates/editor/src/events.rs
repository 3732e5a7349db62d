//! Change notifications for views attached to the tree model.
//!
//! Every mutation that changes a row count is bracketed by
//! [`ModelEvent::BeginChange`] and [`ModelEvent::EndChange`]. Between the
//! two the model is in flux; after `EndChange` row counts are consistent
//! again.

use crossbeam_channel::Sender;

use crate::index::{Column, NodeIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Rows `first..=last` below `parent` are being inserted
    InsertRows,
    /// Rows `first..=last` below `parent` are being removed
    RemoveRows,
    /// Rows are being reordered; counts stay the same
    Layout,
    /// Everything is being replaced
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    BeginChange {
        kind: ChangeKind,
        /// `None` is the root
        parent: Option<NodeIndex>,
        first: usize,
        last: usize,
    },
    EndChange {
        kind: ChangeKind,
    },
    DataChanged {
        index: NodeIndex,
        column: Column,
    },
}

/// Receives model events, in order, as they happen.
pub trait ModelObserver {
    fn notify(&mut self, event: &ModelEvent);
}

impl ModelObserver for Sender<ModelEvent> {
    fn notify(&mut self, event: &ModelEvent) {
        // A dropped receiver just means nobody listens any more.
        let _ = self.send(event.clone());
    }
}
