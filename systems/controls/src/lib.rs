#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure controls system that turns polled key state into world commands.
//!
//! Adapters poll their input device once per frame, describe the keys held
//! down as a [`FrameInput`], and hand it to [`Controls::handle`] together with
//! the events the world broadcast since the previous frame. The system keeps
//! track of whether the round has ended: while it has, steering is suspended
//! and only restart requests are forwarded.

use snake_duel_core::{Command, Event, Heading, SnakeId};

/// Physical keys the default bindings recognise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// `W`, steers snake one up.
    W,
    /// `A`, steers snake one left.
    A,
    /// `S`, steers snake one down.
    S,
    /// `D`, steers snake one right.
    D,
    /// Up arrow, steers snake two up.
    ArrowUp,
    /// Left arrow, steers snake two left.
    ArrowLeft,
    /// Down arrow, steers snake two down.
    ArrowDown,
    /// Right arrow, steers snake two right.
    ArrowRight,
    /// Enter, requests a new round once the current one is over.
    Enter,
}

impl Key {
    /// Resolves a key from its lowercase name, e.g. `"w"` or `"up"`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.trim().to_ascii_lowercase().as_str() {
            "w" => Self::W,
            "a" => Self::A,
            "s" => Self::S,
            "d" => Self::D,
            "up" => Self::ArrowUp,
            "left" => Self::ArrowLeft,
            "down" => Self::ArrowDown,
            "right" => Self::ArrowRight,
            "enter" | "return" => Self::Enter,
            _ => return None,
        };
        Some(key)
    }
}

/// Directional keys held by one player during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    /// Whether the player's up key is held.
    pub up: bool,
    /// Whether the player's down key is held.
    pub down: bool,
    /// Whether the player's left key is held.
    pub left: bool,
    /// Whether the player's right key is held.
    pub right: bool,
}

impl KeyState {
    /// Heading requested by the held keys.
    ///
    /// Only one heading is produced per frame; when several keys are held the
    /// first of up, down, left, right wins.
    #[must_use]
    pub fn heading(&self) -> Option<Heading> {
        if self.up {
            Some(Heading::Up)
        } else if self.down {
            Some(Heading::Down)
        } else if self.left {
            Some(Heading::Left)
        } else if self.right {
            Some(Heading::Right)
        } else {
            None
        }
    }
}

/// Input snapshot gathered by adapters before updating the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Held directional keys per snake, in [`SnakeId::ALL`] order.
    pub players: [KeyState; 2],
    /// Whether the restart key is held.
    pub restart: bool,
}

impl FrameInput {
    /// Builds a frame from held keys using the default two-player bindings:
    /// WASD steers snake one and the arrow keys steer snake two.
    #[must_use]
    pub fn from_keys(keys: &[Key]) -> Self {
        let mut input = Self::default();
        for key in keys {
            let [one, two] = &mut input.players;
            match key {
                Key::W => one.up = true,
                Key::A => one.left = true,
                Key::S => one.down = true,
                Key::D => one.right = true,
                Key::ArrowUp => two.up = true,
                Key::ArrowLeft => two.left = true,
                Key::ArrowDown => two.down = true,
                Key::ArrowRight => two.right = true,
                Key::Enter => input.restart = true,
            }
        }
        input
    }

    /// Held keys of a single snake.
    #[must_use]
    pub fn player(&self, snake: SnakeId) -> KeyState {
        self.players[snake.index()]
    }
}

/// Pure system that reacts to world events and emits steering commands.
#[derive(Debug, Default)]
pub struct Controls {
    round_over: bool,
}

impl Controls {
    /// Consumes world events and the frame's input to emit commands.
    pub fn handle(&mut self, events: &[Event], input: &FrameInput, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::RoundEnded { .. } => self.round_over = true,
                Event::RoundStarted { .. } => self.round_over = false,
                _ => {}
            }
        }

        if self.round_over {
            if input.restart {
                out.push(Command::RequestRestart);
            }
            return;
        }

        for snake in SnakeId::ALL {
            if let Some(heading) = input.player(snake).heading() {
                out.push(Command::SetHeading { snake, heading });
            }
        }
    }

    /// Reports whether the last observed round has ended.
    #[must_use]
    pub fn round_over(&self) -> bool {
        self.round_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_keys_take_priority() {
        let state = KeyState {
            up: false,
            down: true,
            left: true,
            right: true,
        };
        assert_eq!(state.heading(), Some(Heading::Down));
        assert_eq!(KeyState::default().heading(), None);
    }

    #[test]
    fn key_names_resolve_case_insensitively() {
        assert_eq!(Key::from_name("W"), Some(Key::W));
        assert_eq!(Key::from_name(" left "), Some(Key::ArrowLeft));
        assert_eq!(Key::from_name("return"), Some(Key::Enter));
        assert_eq!(Key::from_name("space"), None);
    }

    #[test]
    fn default_bindings_split_players() {
        let input = FrameInput::from_keys(&[Key::D, Key::ArrowUp, Key::Enter]);
        assert!(input.player(SnakeId::One).right);
        assert!(input.player(SnakeId::Two).up);
        assert!(input.restart);
    }
}
