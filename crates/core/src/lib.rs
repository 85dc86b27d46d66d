//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the game rules, state management, and simulation logic.
//! It has no dependencies on terminals or I/O apart from loading a rules file,
//! so the same session runs under the terminal runner, in tests and in
//! benchmarks.
//!
//! # Module Structure
//!
//! - [`grid`]: bounds-safe cell grid used for the field and for piece shapes
//! - [`piece`]: tetromino shapes, bounding-box rotation and kick offsets
//! - [`source`]: piece sources, including the seeded 7-bag
//! - [`bus`]: synchronous notification fan-out
//! - [`rules`]: tunable scores and timings, loadable from JSON
//! - [`scoring`]: line clear and drop scoring helpers
//! - [`session`]: the game state machine
//!
//! # Example
//!
//! ```
//! use blockfall_core::Session;
//! use blockfall_core::types::Command;
//!
//! let mut session = Session::new(12345, 1);
//! session.update(0.0);
//!
//! session.handle(Command::MoveRight(true));
//! session.handle(Command::MoveRight(false));
//! session.handle(Command::RotateRight);
//! session.handle(Command::HardDrop);
//!
//! // Hard drop awards points per row
//! assert!(session.score() > 0);
//! ```
//!
//! # Timing
//!
//! Call [`Session::update`] every frame with the elapsed seconds. Gravity,
//! lock delay and auto-repeat all accumulate that time; the intervals shrink
//! as the level rises (see [`Timing`]).

pub mod bus;
pub mod grid;
pub mod piece;
pub mod rules;
pub mod scoring;
pub mod session;
pub mod source;

pub use blockfall_types as types;

pub use bus::{ListenerId, NotificationBus};
pub use grid::Grid;
pub use piece::{KickTable, Piece};
pub use rules::{Rules, RulesError, Timing};
pub use session::{CommandSender, Session, SessionState, MAX_DEFERRED_PER_CALL};
pub use source::{PieceSource, SevenBag, SimpleRng};
