use crate::{Action, Gesture};
use std::{cell::RefCell, rc::Rc};

/// Receives the result of each gesture to show it to the user
pub trait FeedbackSink {
    /// Called while the trigger is held whenever the gesture recognized so far changes
    fn preview(&mut self, _gesture: Option<Gesture>) {}

    /// Called once the trigger is released
    fn show(&mut self, gesture: Option<Gesture>, action: Option<Action>);
}

/// Receives the raw points of a stroke, for drawing a trail behind the cursor
pub trait TrailSink {
    fn begin(&mut self, x: f64, y: f64);
    fn extend(&mut self, x: f64, y: f64);
    fn finish(&mut self);
}

pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn show(&mut self, _gesture: Option<Gesture>, _action: Option<Action>) {}
}

pub struct NullTrail;

impl TrailSink for NullTrail {
    fn begin(&mut self, _x: f64, _y: f64) {}
    fn extend(&mut self, _x: f64, _y: f64) {}
    fn finish(&mut self) {}
}

/// Keeps the points of the most recent stroke
///
/// Clones share the same points, so a clone can be handed to a session and the first one read
/// back after the stroke finishes.
#[derive(Debug, Clone, Default)]
pub struct TrailRecorder {
    points: Rc<RefCell<Vec<(f64, f64)>>>,
}

impl TrailRecorder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.points.borrow().clone()
    }
}

impl TrailSink for TrailRecorder {
    fn begin(&mut self, x: f64, y: f64) {
        let mut points = self.points.borrow_mut();
        points.clear();
        points.push((x, y));
    }

    fn extend(&mut self, x: f64, y: f64) {
        self.points.borrow_mut().push((x, y));
    }

    fn finish(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_clones_share_points() {
        let recorder = TrailRecorder::new();
        let mut handle = recorder.clone();
        handle.begin(1.0, 2.0);
        handle.extend(3.0, 4.0);
        handle.finish();
        assert_eq!(recorder.points(), vec![(1.0, 2.0), (3.0, 4.0)]);

        handle.begin(0.0, 0.0);
        assert_eq!(recorder.points(), vec![(0.0, 0.0)]);
    }
}
