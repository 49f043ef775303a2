use std::error::Error;

mod action;
mod direction;
mod dispatcher;
mod gesture;
mod pointer;
mod session;
mod sink;

pub use action::{Action, ActionSurface, Controller, Key, Keymap, Modifier, Shortcut, SpecialKey};
pub use direction::{Direction, ParseDirectionError};
pub use dispatcher::ActionMap;
pub use gesture::{Gesture, ParseGestureError};
pub use pointer::{Button, ParseButtonError, PointerEvent};
pub use session::{GestureSession, Outcome};
pub use sink::{FeedbackSink, NullFeedback, NullTrail, TrailRecorder, TrailSink};

/// Classification of a pointer stroke into a gesture
///
/// A stroke is one `start`, any number of `add_point` and one `end`. Calling `start` again
/// discards whatever was recorded so far.
pub trait Recognizer {
    fn start(&mut self, x: f64, y: f64);
    fn add_point(&mut self, x: f64, y: f64);
    /// Classifies the stroke and consumes it
    fn end(&mut self) -> Option<Gesture>;

    /// The classification so far, without consuming the stroke
    fn current(&self) -> Option<Gesture> {
        None
    }
}

/// A source of pointer events (mouse hook or equivalent)
pub trait Machine {
    /// Waits until a new pointer event is read
    fn read(&mut self) -> Result<PointerEvent, Box<dyn Error>>;

    /// Hands a trigger click that the machine kept from the system back to it, for a stroke
    /// that turned out not to be a gesture. Machines that hold nothing back ignore this.
    fn release_click(&mut self, _button: Button) {}
}
