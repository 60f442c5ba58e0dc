//! # Modwatch Tracker
//!
//! Time-bounded member state for Modwatch: timed mutes and activity
//! accounting.
//!
//! All state lives in a [`TemporalStore`] owned by a [`Tracker`]. Command
//! handlers and event hooks go through the [`Tracker`] only. A single
//! [`Reconciler`] task sweeps the store on a fixed interval, expiring mutes,
//! marking silent members inactive, rolling over daily/weekly/monthly
//! counters and accruing active time. A [`SnapshotWriter`] task persists the
//! store whenever it changes. [`TrackerService`] wires these together and
//! owns their shutdown.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod error;
pub mod period;
pub mod persistence;
pub mod ports;
pub mod reconciler;
pub mod record;
pub mod service;
pub mod settings;
pub mod store;
pub mod tracker;

pub use clock::*;
pub use error::*;
pub use period::*;
pub use persistence::*;
pub use ports::*;
pub use reconciler::*;
pub use record::*;
pub use service::*;
pub use settings::*;
pub use store::*;
pub use tracker::*;
