//! # Modwatch Commands
//!
//! Discord slash commands for Modwatch using the Poise framework.
//!
//! Commands change state only through the [`Tracker`](modwatch_tracker::Tracker)
//! held in [`Data`]. Each command builds its reply with a plain `render_*`
//! function so the wording can be tested without a gateway connection.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod about;
pub mod activity;
pub mod config;
pub mod framework;
pub mod mute;
pub mod unmute;
pub mod uptime;

pub use framework::*;
