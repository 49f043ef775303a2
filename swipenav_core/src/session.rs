use crate::{
    Action, ActionMap, ActionSurface, Button, FeedbackSink, Gesture, NullFeedback, NullTrail,
    PointerEvent, Recognizer, TrailSink,
};
use tracing::{debug, trace};

/// What happened to the session after an event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Event was not part of a gesture
    Ignored,
    Started,
    Tracking,
    Finished {
        gesture: Option<Gesture>,
        action: Option<Action>,
    },
}

/// One gesture-capable context (such as a window) and its recognizer
///
/// The session only reacts to the trigger button. Pressing it starts a gesture, moving the
/// pointer feeds the recognizer and releasing it runs the recognized gesture's action.
pub struct GestureSession {
    trigger: Button,
    recognizer: Box<dyn Recognizer>,
    action_map: ActionMap,
    feedback: Box<dyn FeedbackSink>,
    trail: Box<dyn TrailSink>,
    active: bool,
    preview: Option<Gesture>,
}

impl GestureSession {
    pub fn new(recognizer: Box<dyn Recognizer>, action_map: ActionMap) -> Self {
        Self {
            trigger: Button::default(),
            recognizer,
            action_map,
            feedback: Box::new(NullFeedback),
            trail: Box::new(NullTrail),
            active: false,
            preview: None,
        }
    }

    pub fn with_trigger(mut self, trigger: Button) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_feedback(mut self, feedback: Box<dyn FeedbackSink>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_trail(mut self, trail: Box<dyn TrailSink>) -> Self {
        self.trail = trail;
        self
    }

    pub fn trigger(&self) -> Button {
        self.trigger
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn action_map(&self) -> &ActionMap {
        &self.action_map
    }

    /// Handle a pointer event, performing an action on the surface when a gesture completes
    pub fn handle<S: ActionSurface + ?Sized>(
        &mut self,
        event: PointerEvent,
        surface: &mut S,
    ) -> Outcome {
        match event {
            PointerEvent::Down { button, x, y } if button == self.trigger => {
                if self.active {
                    debug!("trigger pressed again before release, restarting gesture");
                }
                self.recognizer.start(x, y);
                self.trail.begin(x, y);
                self.active = true;
                self.preview = None;
                Outcome::Started
            }
            PointerEvent::Move { x, y } if self.active => {
                self.recognizer.add_point(x, y);
                self.trail.extend(x, y);

                let current = self.recognizer.current();
                if current != self.preview {
                    trace!("gesture so far: {:?}", current);
                    self.preview = current;
                    self.feedback.preview(current);
                }
                Outcome::Tracking
            }
            PointerEvent::Up { button, .. } if button == self.trigger && self.active => {
                self.active = false;
                self.preview = None;
                self.trail.finish();

                let gesture = self.recognizer.end();
                let action = self.action_map.execute(gesture, surface);
                self.feedback.show(gesture, action);
                Outcome::Finished { gesture, action }
            }
            _ => Outcome::Ignored,
        }
    }
}
