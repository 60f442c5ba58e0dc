//! # Modwatch Common
//!
//! Shared types, utilities, and common functionality for Modwatch.
//!
//! This crate provides the identifier newtypes, the workspace error type,
//! duration parsing for moderator input, and the tracing bootstrap used by
//! the bot binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::*;
pub use logging::*;
pub use types::*;
pub use utils::*;
