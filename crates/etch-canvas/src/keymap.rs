//! Keystroke → action mapping.
//!
//! | Key                        | Action                          |
//! |----------------------------|---------------------------------|
//! | `←` `↓` `↑` `→`            | move left / down / up / right   |
//! | `h` `j` `k` `l`            | same, Vim-style                 |
//! | `y` `u` `b` `n`            | diagonals (eight-way mode only) |
//! | `c` `C`                    | clear the drawing               |
//! | `q` `Q` `Esc` `Ctrl+C`     | quit                            |
//! | anything else              | ignored                         |
//!
//! Letter bindings only fire without Ctrl/Alt held, so `Alt+q` doesn't quit
//! and `Ctrl+h` doesn't move. Arrow keys fire with any modifiers (terminals
//! disagree on what Shift+arrow means, and the user clearly wants to move).
//!
//! A [`Keymap`] is fixed once built: mapping the same key always gives the
//! same [`Action`].

use etch_term::input::{KeyCode, KeyEvent, Modifiers};

use crate::position::Delta;

/// What the render loop should do with a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Step the cursor.
    Move(Delta),
    /// Erase the trail, keep the cursor.
    Clear,
    /// End the session.
    Terminate,
    /// Not a binding. Do nothing.
    Ignore,
}

/// Which directions the cursor can step in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Movement {
    /// Up, down, left, right.
    #[default]
    FourWay,
    /// The four compass directions plus the four diagonals.
    EightWay,
}

/// The key bindings for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Keymap {
    movement: Movement,
}

impl Keymap {
    #[must_use]
    pub const fn new(movement: Movement) -> Self {
        Self { movement }
    }

    /// Classify one keystroke.
    #[must_use]
    pub fn map_event(&self, event: &KeyEvent) -> Action {
        match event.code {
            KeyCode::Up => Action::Move(Delta::UP),
            KeyCode::Down => Action::Move(Delta::DOWN),
            KeyCode::Left => Action::Move(Delta::LEFT),
            KeyCode::Right => Action::Move(Delta::RIGHT),
            KeyCode::Escape => Action::Terminate,
            KeyCode::Char('c') if event.modifiers.contains(Modifiers::CTRL) => Action::Terminate,
            KeyCode::Char(ch) if !event.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) => {
                self.map_char(ch)
            }
            _ => Action::Ignore,
        }
    }

    fn map_char(self, ch: char) -> Action {
        match ch {
            'q' | 'Q' => Action::Terminate,
            'c' | 'C' => Action::Clear,
            'h' => Action::Move(Delta::LEFT),
            'j' => Action::Move(Delta::DOWN),
            'k' => Action::Move(Delta::UP),
            'l' => Action::Move(Delta::RIGHT),
            'y' | 'u' | 'b' | 'n' if self.movement == Movement::EightWay => match ch {
                'y' => Action::Move(Delta::UP_LEFT),
                'u' => Action::Move(Delta::UP_RIGHT),
                'b' => Action::Move(Delta::DOWN_LEFT),
                _ => Action::Move(Delta::DOWN_RIGHT),
            },
            _ => Action::Ignore,
        }
    }

    /// One-line summary of the bindings, for the help line.
    #[must_use]
    pub const fn help_text(&self) -> &'static str {
        match self.movement {
            Movement::FourWay => {
                "Arrows or h/j/k/l to draw. c clears the drawing. q or Esc quits."
            }
            Movement::EightWay => {
                "Arrows or h/j/k/l (y/u/b/n diagonals) to draw. c clears the drawing. q or Esc quits."
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn four() -> Keymap {
        Keymap::new(Movement::FourWay)
    }

    fn eight() -> Keymap {
        Keymap::new(Movement::EightWay)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    #[test]
    fn default_is_four_way() {
        assert_eq!(Keymap::default(), Keymap::new(Movement::FourWay));
    }

    #[test]
    fn arrows_move() {
        let km = four();
        assert_eq!(km.map_event(&key(KeyCode::Up)), Action::Move(Delta::UP));
        assert_eq!(km.map_event(&key(KeyCode::Down)), Action::Move(Delta::DOWN));
        assert_eq!(km.map_event(&key(KeyCode::Left)), Action::Move(Delta::LEFT));
        assert_eq!(km.map_event(&key(KeyCode::Right)), Action::Move(Delta::RIGHT));
    }

    #[test]
    fn arrows_move_with_modifiers() {
        let shifted = KeyEvent::with(KeyCode::Right, Modifiers::SHIFT);
        assert_eq!(four().map_event(&shifted), Action::Move(Delta::RIGHT));
    }

    #[test]
    fn vim_keys_move() {
        let km = four();
        assert_eq!(km.map_event(&KeyEvent::char('h')), Action::Move(Delta::LEFT));
        assert_eq!(km.map_event(&KeyEvent::char('j')), Action::Move(Delta::DOWN));
        assert_eq!(km.map_event(&KeyEvent::char('k')), Action::Move(Delta::UP));
        assert_eq!(km.map_event(&KeyEvent::char('l')), Action::Move(Delta::RIGHT));
    }

    #[test]
    fn quit_keys_terminate() {
        let km = four();
        assert_eq!(km.map_event(&KeyEvent::char('q')), Action::Terminate);
        assert_eq!(km.map_event(&KeyEvent::char('Q')), Action::Terminate);
        assert_eq!(km.map_event(&key(KeyCode::Escape)), Action::Terminate);
        assert_eq!(km.map_event(&KeyEvent::ctrl('c')), Action::Terminate);
    }

    #[test]
    fn clear_keys() {
        assert_eq!(four().map_event(&KeyEvent::char('c')), Action::Clear);
        assert_eq!(four().map_event(&KeyEvent::char('C')), Action::Clear);
    }

    #[test]
    fn modified_letters_are_ignored() {
        let km = four();
        assert_eq!(
            km.map_event(&KeyEvent::with(KeyCode::Char('q'), Modifiers::ALT)),
            Action::Ignore
        );
        assert_eq!(km.map_event(&KeyEvent::ctrl('h')), Action::Ignore);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let km = four();
        for event in [
            KeyEvent::char('x'),
            KeyEvent::char('H'),
            KeyEvent::char(' '),
            key(KeyCode::Enter),
            key(KeyCode::Tab),
            key(KeyCode::F(1)),
            key(KeyCode::PageUp),
        ] {
            assert_eq!(km.map_event(&event), Action::Ignore, "{event:?}");
        }
    }

    #[test]
    fn diagonals_ignored_in_four_way() {
        let km = four();
        for ch in ['y', 'u', 'b', 'n'] {
            assert_eq!(km.map_event(&KeyEvent::char(ch)), Action::Ignore);
        }
    }

    #[test]
    fn diagonals_move_in_eight_way() {
        let km = eight();
        assert_eq!(km.map_event(&KeyEvent::char('y')), Action::Move(Delta::UP_LEFT));
        assert_eq!(km.map_event(&KeyEvent::char('u')), Action::Move(Delta::UP_RIGHT));
        assert_eq!(km.map_event(&KeyEvent::char('b')), Action::Move(Delta::DOWN_LEFT));
        assert_eq!(km.map_event(&KeyEvent::char('n')), Action::Move(Delta::DOWN_RIGHT));
    }

    #[test]
    fn eight_way_keeps_orthogonal_bindings() {
        assert_eq!(eight().map_event(&KeyEvent::char('l')), Action::Move(Delta::RIGHT));
        assert_eq!(eight().map_event(&key(KeyCode::Up)), Action::Move(Delta::UP));
    }

    #[test]
    fn mapping_is_pure() {
        let km = eight();
        let events = [
            KeyEvent::char('j'),
            KeyEvent::char('z'),
            KeyEvent::char('q'),
            key(KeyCode::Left),
            KeyEvent::char('n'),
        ];
        let first: Vec<Action> = events.iter().map(|e| km.map_event(e)).collect();
        for _ in 0..10 {
            let again: Vec<Action> = events.iter().map(|e| km.map_event(e)).collect();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn help_text_mentions_quit() {
        assert!(four().help_text().contains("quits"));
        assert!(eight().help_text().contains("diagonals"));
        assert!(!four().help_text().contains("diagonals"));
    }
}
