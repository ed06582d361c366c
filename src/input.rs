//! Key bindings per game.

use crate::GameKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    RotateCw,
    RotateCcw,
    SoftDrop,
    HardDrop,
    Restart,
    Pause,
    Quit,
    None,
}

/// Map a key event to an action for the given game.
pub fn key_to_action(key: KeyEvent, game: GameKind) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Action::Quit,
            _ => Action::None,
        };
    }
    match code {
        KeyCode::Esc => return Action::Quit,
        KeyCode::Char('p' | 'P') => return Action::Pause,
        _ => {}
    }
    match game {
        GameKind::Tetris => match code {
            KeyCode::Left => Action::MoveLeft,
            KeyCode::Right => Action::MoveRight,
            KeyCode::Down => Action::SoftDrop,
            KeyCode::Up | KeyCode::Char('w' | 'W') => Action::RotateCw,
            KeyCode::Char('q' | 'Q') => Action::RotateCcw,
            KeyCode::Char(' ') => Action::HardDrop,
            _ => Action::None,
        },
        GameKind::Snake => match code {
            KeyCode::Left => Action::MoveLeft,
            KeyCode::Right => Action::MoveRight,
            KeyCode::Up => Action::MoveUp,
            KeyCode::Down => Action::MoveDown,
            KeyCode::Char(' ') | KeyCode::Enter => Action::Restart,
            _ => Action::None,
        },
        GameKind::Pong => match code {
            KeyCode::Up => Action::MoveUp,
            KeyCode::Down => Action::MoveDown,
            _ => Action::None,
        },
    }
}
