//! Pointer events typed (or piped) in as text, one per line:
//!
//! ```text
//! down right 0 0
//! move 0 -100
//! move 100 -100
//! up right 100 -100
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::{
    error::Error,
    io::{self, BufRead, StdinLock, Write},
};
use swipenav_core::{Button, Machine, PointerEvent};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum MachineError {
    #[error("end of input")]
    Eof,

    #[error("unable to read input: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {reason}: {text:?}")]
    Parse {
        line: usize,
        text: String,
        reason: &'static str,
    },
}

/// Reads pointer events from lines of text
pub struct TextMachine<R> {
    reader: R,
    /// Prompt before each line and keep prompting on bad input
    interactive: bool,
    line: usize,
}

impl TextMachine<StdinLock<'static>> {
    /// Prompt the user for events on stdin
    pub fn stdin() -> Self {
        Self {
            reader: io::stdin().lock(),
            interactive: true,
            line: 0,
        }
    }
}

impl<R: BufRead> TextMachine<R> {
    /// Replay events from a reader. Malformed lines are errors.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            interactive: false,
            line: 0,
        }
    }

    fn read_event(&mut self) -> Result<PointerEvent, MachineError> {
        loop {
            if self.interactive {
                // prompt the user to provide an event
                print!("Pointer> ");
                io::stdout().flush()?;
            }

            let mut input = String::new();
            // blocks until input is read
            if self.reader.read_line(&mut input)? == 0 {
                return Err(MachineError::Eof);
            }
            self.line += 1;

            match parse_line(&input) {
                Ok(Some(event)) => return Ok(event),
                Ok(None) => continue,
                Err(reason) => {
                    let err = MachineError::Parse {
                        line: self.line,
                        text: input.trim().to_owned(),
                        reason,
                    };
                    if self.interactive {
                        warn!("{}", err);
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }
}

impl<R: BufRead> Machine for TextMachine<R> {
    fn read(&mut self) -> Result<PointerEvent, Box<dyn Error>> {
        Ok(self.read_event()?)
    }
}

/// Parse one line into an event. Ok(None) for lines with nothing to parse.
pub fn parse_line(line: &str) -> Result<Option<PointerEvent>, &'static str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let event = match words.as_slice() {
        ["move", x, y] => PointerEvent::Move {
            x: parse_coord(x)?,
            y: parse_coord(y)?,
        },
        ["down", button, x, y] => PointerEvent::Down {
            button: parse_button(button)?,
            x: parse_coord(x)?,
            y: parse_coord(y)?,
        },
        ["up", button, x, y] => PointerEvent::Up {
            button: parse_button(button)?,
            x: parse_coord(x)?,
            y: parse_coord(y)?,
        },
        ["move", ..] | ["down", ..] | ["up", ..] => return Err("wrong number of fields"),
        _ => return Err("expected down, move or up"),
    };
    Ok(Some(event))
}

fn parse_coord(s: &str) -> Result<f64, &'static str> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err("invalid coordinate"),
    }
}

fn parse_button(s: &str) -> Result<Button, &'static str> {
    s.parse().map_err(|_| "invalid button")
}
