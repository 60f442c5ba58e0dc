//! # Modwatch Bot
//!
//! Discord moderation bot with timed mutes and member activity accounting.
//!
//! This is the main binary crate that wires the tracker service to a Discord
//! client using the Poise framework, and owns graceful shutdown.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bot;
pub mod error;
pub mod notifier;

pub use bot::*;
pub use error::*;
pub use notifier::*;
