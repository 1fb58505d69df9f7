use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    TogglePause,
    Start,
    Restart,
    Menu,
    Quit,
}

impl Command {
    /// Maps a key press to a command. Letters are matched case-insensitively;
    /// anything unrecognised yields `None`.
    pub fn from_key_event(ev: &KeyEvent) -> Option<Command> {
        if is_ctrl_c(ev) {
            return Some(Command::Quit);
        }

        let cmd = match ev.code {
            KeyCode::Up => Command::Move(Direction::Up),
            KeyCode::Down => Command::Move(Direction::Down),
            KeyCode::Left => Command::Move(Direction::Left),
            KeyCode::Right => Command::Move(Direction::Right),
            KeyCode::Esc => Command::TogglePause,
            KeyCode::Enter => Command::Start,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => Command::Move(Direction::Up),
                'a' => Command::Move(Direction::Left),
                's' => Command::Move(Direction::Down),
                'd' => Command::Move(Direction::Right),
                'p' => Command::TogglePause,
                ' ' => Command::Start,
                'r' => Command::Restart,
                'm' => Command::Menu,
                'q' => Command::Quit,
                _ => return None,
            },
            _ => return None,
        };

        Some(cmd)
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers, .. } if modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_in_either_case() {
        let pairs = [
            (KeyCode::Up, Direction::Up),
            (KeyCode::Char('w'), Direction::Up),
            (KeyCode::Char('W'), Direction::Up),
            (KeyCode::Down, Direction::Down),
            (KeyCode::Char('s'), Direction::Down),
            (KeyCode::Char('S'), Direction::Down),
            (KeyCode::Left, Direction::Left),
            (KeyCode::Char('a'), Direction::Left),
            (KeyCode::Char('A'), Direction::Left),
            (KeyCode::Right, Direction::Right),
            (KeyCode::Char('d'), Direction::Right),
            (KeyCode::Char('D'), Direction::Right),
        ];

        for &(code, dir) in pairs.iter() {
            assert_eq!(Command::from_key_event(&key(code)), Some(Command::Move(dir)));
        }
    }

    #[test]
    fn control_keys() {
        assert_eq!(Command::from_key_event(&key(KeyCode::Esc)), Some(Command::TogglePause));
        assert_eq!(Command::from_key_event(&key(KeyCode::Char('P'))), Some(Command::TogglePause));
        assert_eq!(Command::from_key_event(&key(KeyCode::Enter)), Some(Command::Start));
        assert_eq!(Command::from_key_event(&key(KeyCode::Char('r'))), Some(Command::Restart));
        assert_eq!(Command::from_key_event(&key(KeyCode::Char('m'))), Some(Command::Menu));
        assert_eq!(Command::from_key_event(&key(KeyCode::Char('q'))), Some(Command::Quit));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Command::from_key_event(&ctrl_c), Some(Command::Quit));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        assert_eq!(Command::from_key_event(&key(KeyCode::Char('x'))), None);
        assert_eq!(Command::from_key_event(&key(KeyCode::Char('c'))), None);
        assert_eq!(Command::from_key_event(&key(KeyCode::Tab)), None);
    }
}
