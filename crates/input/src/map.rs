//! Key mapping from terminal events to session commands.
//!
//! Movement and soft drop keys map on both press and release so the session
//! can track held keys. Everything else only maps on press. Repeat events are
//! dropped; the session runs its own auto-repeat.

use crate::types::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a key event to a command.
pub fn map_key(key: KeyEvent) -> Option<Command> {
    let pressed = match key.kind {
        KeyEventKind::Press => true,
        KeyEventKind::Release => false,
        KeyEventKind::Repeat => return None,
    };

    let code = match key.code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };

    let held = match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Some(Command::MoveLeft(pressed)),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => {
            Some(Command::MoveRight(pressed))
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Some(Command::SoftDrop(pressed)),
        _ => None,
    };
    if held.is_some() {
        return held;
    }
    if !pressed {
        return None;
    }

    match code {
        // Rotation
        KeyCode::Up | KeyCode::Char('x') | KeyCode::Char('e') | KeyCode::Char('k') => {
            Some(Command::RotateRight)
        }
        KeyCode::Char('z') | KeyCode::Char('y') => Some(Command::RotateLeft),

        // Actions
        KeyCode::Char(' ') | KeyCode::Char('w') => Some(Command::HardDrop),
        KeyCode::Char('c') if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Hold)
        }
        KeyCode::Char('p') => Some(Command::Pause),
        KeyCode::Char('u') => Some(Command::Unpause),
        KeyCode::Char('r') => Some(Command::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }
    }

    fn repeat(code: KeyCode) -> KeyEvent {
        KeyEvent {
            kind: KeyEventKind::Repeat,
            ..release(code)
        }
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Left)),
            Some(Command::MoveLeft(true))
        );
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('D'))),
            Some(Command::MoveRight(true))
        );
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('j'))),
            Some(Command::SoftDrop(true))
        );
    }

    #[test]
    fn test_movement_releases() {
        assert_eq!(map_key(release(KeyCode::Left)), Some(Command::MoveLeft(false)));
        assert_eq!(
            map_key(release(KeyCode::Char('l'))),
            Some(Command::MoveRight(false))
        );
        assert_eq!(map_key(release(KeyCode::Down)), Some(Command::SoftDrop(false)));
    }

    #[test]
    fn test_rotation_keys() {
        for c in [KeyCode::Up, KeyCode::Char('x'), KeyCode::Char('E'), KeyCode::Char('k')] {
            assert_eq!(map_key(KeyEvent::from(c)), Some(Command::RotateRight));
        }
        for c in [KeyCode::Char('z'), KeyCode::Char('Y')] {
            assert_eq!(map_key(KeyEvent::from(c)), Some(Command::RotateLeft));
        }
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char(' '))),
            Some(Command::HardDrop)
        );
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('w'))),
            Some(Command::HardDrop)
        );
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('c'))), Some(Command::Hold));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char('p'))), Some(Command::Pause));
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('u'))),
            Some(Command::Unpause)
        );
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('R'))),
            Some(Command::Restart)
        );
    }

    #[test]
    fn test_only_held_keys_map_on_release() {
        assert_eq!(map_key(release(KeyCode::Char(' '))), None);
        assert_eq!(map_key(release(KeyCode::Char('p'))), None);
    }

    #[test]
    fn test_repeats_are_ignored() {
        assert_eq!(map_key(repeat(KeyCode::Left)), None);
        assert_eq!(map_key(repeat(KeyCode::Up)), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
        assert!(!should_quit(release(KeyCode::Char('q'))));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            None
        );
    }
}
