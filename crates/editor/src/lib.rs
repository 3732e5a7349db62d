//! # Bitflag Editor
//!
//! An editable two-level tree over a [`FlagScheme`](bitflag_core::FlagScheme):
//! parameters are the root rows, their states the child rows.
//!
//! The model is meant for one editing thread. Views attach as
//! [`ModelObserver`]s (a `crossbeam_channel::Sender<ModelEvent>` works out
//! of the box) and receive begin/end brackets around every change of a row
//! count.
//!
//! ```ignore
//! use bitflag_editor::{FlagTreeModel, NodeIndex, Column, CheckState};
//!
//! let (tx, rx) = crossbeam_channel::unbounded();
//! let mut model = FlagTreeModel::new();
//! model.subscribe(tx);
//! model.set_scheme(&scheme);
//! model.set_data(NodeIndex::Parameter(0), Column::BitPosition, "2-3");
//! model.set_check_state(NodeIndex::Parameter(0), CheckState::Checked);
//! let edited = model.to_scheme();
//! ```

mod events;
mod index;
mod model;

pub use events::{ChangeKind, ModelEvent, ModelObserver};
pub use index::{CheckState, Column, ItemFlags, NodeIndex};
pub use model::{compare_parameters, EditorOptions, FlagTreeModel};
