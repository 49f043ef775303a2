//! Recognizers that turn a pointer stroke into a gesture.
//!
//! [`SegmentRecognizer`] is deterministic and needs no training. [`TemplateRecognizer`] matches
//! strokes against recorded examples instead. Both produce a plain [`Gesture`], so whatever
//! runs the gesture does not need to know which one was used.
//!
//! [`Gesture`]: swipenav_core::Gesture

mod segment;
mod template;

pub use segment::{classify, SegmentRecognizer, DEFAULT_THRESHOLD};
pub use template::{
    Template, TemplateError, TemplateRecognizer, TemplateSet, DEFAULT_MIN_SCORE,
};
