//! Synthesised key releases for terminals without release events.
//!
//! Without the keyboard enhancement protocol a terminal only reports presses,
//! and a held key arrives as a stream of presses from the OS auto-repeat.
//! [`ReleaseTimeout`] swallows those repeats while a key counts as held and
//! reports a release once the key has been quiet for the timeout.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;

use crate::types::Command;

// Short enough that a single tap doesn't become a sustained hold.
pub const DEFAULT_KEY_RELEASE_TIMEOUT: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeldKey {
    Left,
    Right,
    SoftDrop,
}

impl HeldKey {
    const ALL: [HeldKey; 3] = [HeldKey::Left, HeldKey::Right, HeldKey::SoftDrop];

    fn of(command: Command) -> Option<(HeldKey, bool)> {
        match command {
            Command::MoveLeft(pressed) => Some((HeldKey::Left, pressed)),
            Command::MoveRight(pressed) => Some((HeldKey::Right, pressed)),
            Command::SoftDrop(pressed) => Some((HeldKey::SoftDrop, pressed)),
            _ => None,
        }
    }

    fn release(self) -> Command {
        match self {
            HeldKey::Left => Command::MoveLeft(false),
            HeldKey::Right => Command::MoveRight(false),
            HeldKey::SoftDrop => Command::SoftDrop(false),
        }
    }

    fn index(self) -> usize {
        match self {
            HeldKey::Left => 0,
            HeldKey::Right => 1,
            HeldKey::SoftDrop => 2,
        }
    }
}

/// Tracks when each held key was last seen.
#[derive(Debug, Clone)]
pub struct ReleaseTimeout {
    last_seen: [Option<Instant>; 3],
    timeout: Duration,
}

impl Default for ReleaseTimeout {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_RELEASE_TIMEOUT)
    }
}

impl ReleaseTimeout {
    pub fn new(timeout: Duration) -> Self {
        Self {
            last_seen: [None; 3],
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Pass a mapped command through. Returns None for a repeated press of a
    /// key that is already held.
    pub fn filter(&mut self, command: Command, now: Instant) -> Option<Command> {
        let Some((key, pressed)) = HeldKey::of(command) else {
            return Some(command);
        };
        let slot = &mut self.last_seen[key.index()];
        if !pressed {
            *slot = None;
            return Some(command);
        }
        let already_held = slot.is_some();
        *slot = Some(now);
        if already_held {
            None
        } else {
            Some(command)
        }
    }

    /// Releases for held keys that have been quiet longer than the timeout.
    pub fn expire(&mut self, now: Instant) -> ArrayVec<Command, 3> {
        let mut releases = ArrayVec::new();
        for key in HeldKey::ALL {
            let slot = &mut self.last_seen[key.index()];
            if let Some(seen) = *slot {
                if now.saturating_duration_since(seen) > self.timeout {
                    *slot = None;
                    releases.push(key.release());
                }
            }
        }
        releases
    }
}
