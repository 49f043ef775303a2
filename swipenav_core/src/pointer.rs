use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Button {
    Left,
    Right,
    Middle,
    Other(u8),
}

impl Default for Button {
    fn default() -> Self {
        Self::Right
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Button::Left => f.write_str("left"),
            Button::Right => f.write_str("right"),
            Button::Middle => f.write_str("middle"),
            Button::Other(code) => write!(f, "{}", code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseButtonError(String);

impl fmt::Display for ParseButtonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid button: {:?} (expected left, right, middle or a button number)",
            self.0
        )
    }
}

impl std::error::Error for ParseButtonError {}

impl FromStr for Button {
    type Err = ParseButtonError;

    /// Accepts `left`, `right`, `middle` or a raw button number
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Button::Left),
            "right" => Ok(Button::Right),
            "middle" => Ok(Button::Middle),
            other => other
                .parse()
                .map(Button::Other)
                .map_err(|_| ParseButtonError(s.to_owned())),
        }
    }
}

/// A pointer event in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { button: Button, x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { button: Button, x: f64, y: f64 },
}
