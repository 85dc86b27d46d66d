//! Input tests - key mapping and synthesised releases

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

use blockfall::input::{map_key, should_quit, ReleaseTimeout};
use blockfall::types::Command;

fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind,
        state: KeyEventState::NONE,
    }
}

fn press(code: KeyCode) -> KeyEvent {
    key(code, KeyEventKind::Press)
}

fn release(code: KeyCode) -> KeyEvent {
    key(code, KeyEventKind::Release)
}

#[test]
fn test_movement_keys_map_press_and_release() {
    for code in [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('h')] {
        assert_eq!(map_key(press(code)), Some(Command::MoveLeft(true)));
        assert_eq!(map_key(release(code)), Some(Command::MoveLeft(false)));
    }
    for code in [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('l')] {
        assert_eq!(map_key(press(code)), Some(Command::MoveRight(true)));
        assert_eq!(map_key(release(code)), Some(Command::MoveRight(false)));
    }
    for code in [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('j')] {
        assert_eq!(map_key(press(code)), Some(Command::SoftDrop(true)));
        assert_eq!(map_key(release(code)), Some(Command::SoftDrop(false)));
    }
}

#[test]
fn test_action_keys_map_on_press_only() {
    let cases = [
        (KeyCode::Up, Command::RotateRight),
        (KeyCode::Char('x'), Command::RotateRight),
        (KeyCode::Char('k'), Command::RotateRight),
        (KeyCode::Char('z'), Command::RotateLeft),
        (KeyCode::Char('y'), Command::RotateLeft),
        (KeyCode::Char(' '), Command::HardDrop),
        (KeyCode::Char('w'), Command::HardDrop),
        (KeyCode::Char('c'), Command::Hold),
        (KeyCode::Char('p'), Command::Pause),
        (KeyCode::Char('u'), Command::Unpause),
        (KeyCode::Char('r'), Command::Restart),
    ];
    for (code, command) in cases {
        assert_eq!(map_key(press(code)), Some(command), "{code:?}");
        assert_eq!(map_key(release(code)), None, "{code:?}");
    }
}

#[test]
fn test_uppercase_maps_like_lowercase() {
    assert_eq!(map_key(press(KeyCode::Char('A'))), Some(Command::MoveLeft(true)));
    assert_eq!(map_key(press(KeyCode::Char('R'))), Some(Command::Restart));
}

#[test]
fn test_repeat_events_are_ignored() {
    assert_eq!(map_key(key(KeyCode::Left, KeyEventKind::Repeat)), None);
    assert_eq!(map_key(key(KeyCode::Char(' '), KeyEventKind::Repeat)), None);
}

#[test]
fn test_unbound_keys_map_to_nothing() {
    assert_eq!(map_key(press(KeyCode::Char('m'))), None);
    assert_eq!(map_key(press(KeyCode::Enter)), None);
}

#[test]
fn test_quit_keys() {
    assert!(should_quit(press(KeyCode::Char('q'))));
    assert!(!should_quit(release(KeyCode::Char('q'))));

    let ctrl_c = KeyEvent {
        modifiers: KeyModifiers::CONTROL,
        ..press(KeyCode::Char('c'))
    };
    assert!(should_quit(ctrl_c));
    assert_eq!(map_key(ctrl_c), None);
    assert!(!should_quit(press(KeyCode::Char('c'))));
}

#[test]
fn test_release_timeout_turns_repeats_into_a_hold() {
    let mut releases = ReleaseTimeout::new(Duration::from_millis(100));
    let t0 = Instant::now();
    let mut applied = Vec::new();

    for ms in [0, 30, 60, 90] {
        let at = t0 + Duration::from_millis(ms);
        if let Some(command) = releases.filter(Command::MoveLeft(true), at) {
            applied.push(command);
        }
        applied.extend(releases.expire(at));
    }
    applied.extend(releases.expire(t0 + Duration::from_millis(250)));

    assert_eq!(
        applied,
        vec![Command::MoveLeft(true), Command::MoveLeft(false)]
    );
}
