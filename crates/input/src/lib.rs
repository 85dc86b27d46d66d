//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::Command`] and provides
//! [`ReleaseTimeout`] for terminals without key-release events. Auto-repeat
//! itself lives in the session.

pub mod map;
pub mod release;

pub use blockfall_types as types;

pub use map::{map_key, should_quit};
pub use release::{ReleaseTimeout, DEFAULT_KEY_RELEASE_TIMEOUT};
