use swipenav_core::{Action, FeedbackSink, Gesture};
use tracing::{debug, info};

/// Shown when a stroke did not produce a usable gesture
const NO_GESTURE: &str = "✕";

/// Reports gestures through the log
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn preview(&mut self, gesture: Option<Gesture>) {
        debug!("drawing {}", arrows(gesture));
    }

    fn show(&mut self, gesture: Option<Gesture>, action: Option<Action>) {
        info!("{}", render(gesture, action));
    }
}

fn arrows(gesture: Option<Gesture>) -> String {
    gesture.map_or_else(|| NO_GESTURE.to_owned(), |g| g.arrows())
}

/// Arrows followed by the action's description, or just the cross if nothing happens
pub fn render(gesture: Option<Gesture>, action: Option<Action>) -> String {
    match (gesture, action) {
        (Some(g), Some(a)) => format!("{}  {}", g.arrows(), a.description()),
        (Some(g), None) => format!("{}  (unbound)", g.arrows()),
        (None, _) => NO_GESTURE.to_owned(),
    }
}
