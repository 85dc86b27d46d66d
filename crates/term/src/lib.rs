//! Terminal "game renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal gameplay.
//! It avoids widget toolkits and instead renders a session into a simple
//! framebuffer that is diffed and flushed to the terminal.
//!
//! - [`fb`]: framebuffer and styles
//! - [`field_view`]: session → framebuffer (pure, testable)
//! - [`renderer`]: framebuffer → terminal

pub mod fb;
pub mod field_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{CellStyle, FrameBuffer, Glyph, Rgb};
pub use field_view::{FieldView, RunStats, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
