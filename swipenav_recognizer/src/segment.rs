use swipenav_core::{Direction, Gesture, Recognizer};
use tracing::trace;

/// Movement (in pixels) along one axis needed for a segment. Larger than hand tremor, smaller
/// than a deliberate swipe.
pub const DEFAULT_THRESHOLD: f64 = 75.0;

/// Shortest back-and-forth sequence that counts as a repeat gesture
const MIN_REPEAT_SEGMENTS: usize = 4;

/// Recognizes a stroke as a sequence of straight up/down/left/right segments.
///
/// Each segment is measured from the anchor, which is where the previous segment was detected.
/// A sample only counts when it has moved past the threshold along exactly one axis, so
/// diagonal motion never produces a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRecognizer {
    threshold: f64,
    segments: Vec<Direction>,
    anchor_x: f64,
    anchor_y: f64,
}

impl Default for SegmentRecognizer {
    fn default() -> Self {
        Self::with_threshold(DEFAULT_THRESHOLD)
    }
}

impl SegmentRecognizer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            segments: vec![],
            anchor_x: 0.0,
            anchor_y: 0.0,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Segments detected since the last `start`. No two adjacent segments are equal.
    pub fn segments(&self) -> &[Direction] {
        &self.segments
    }

    pub fn anchor(&self) -> (f64, f64) {
        (self.anchor_x, self.anchor_y)
    }

    fn classify_displacement(&self, dx: f64, dy: f64) -> Option<Direction> {
        let t = self.threshold;
        if dx.abs() > t && dy.abs() < t {
            Some(if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else if dy.abs() > t && dx.abs() < t {
            // screen coordinates grow downwards
            Some(if dy > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            })
        } else {
            None
        }
    }
}

/// Whether the segments are at least `MIN_REPEAT_SEGMENTS` long and alternate between the two
/// directions of one axis
fn is_repeat(segments: &[Direction], on_axis: fn(Direction) -> bool) -> bool {
    segments.len() >= MIN_REPEAT_SEGMENTS
        && segments.iter().all(|d| on_axis(*d))
        && segments.windows(2).all(|w| w[0] != w[1])
}

/// Classify a segment sequence. The first two segments decide a compound gesture; any
/// further segments only matter for the repeat test.
pub fn classify(segments: &[Direction]) -> Option<Gesture> {
    match segments {
        [] => None,
        _ if is_repeat(segments, Direction::is_vertical) => Some(Gesture::UpDownRepeat),
        _ if is_repeat(segments, Direction::is_horizontal) => Some(Gesture::LeftRightRepeat),
        [only] => Some(Gesture::Simple(*only)),
        [first, second, ..] => Gesture::compound(*first, *second),
    }
}

impl Recognizer for SegmentRecognizer {
    fn start(&mut self, x: f64, y: f64) {
        self.segments.clear();
        self.anchor_x = x;
        self.anchor_y = y;
    }

    fn add_point(&mut self, x: f64, y: f64) {
        let direction = match self.classify_displacement(x - self.anchor_x, y - self.anchor_y) {
            Some(d) => d,
            None => return,
        };

        // continuing in the same direction keeps the anchor where the segment began
        if self.segments.last() == Some(&direction) {
            return;
        }

        trace!("segment {} at ({}, {})", direction, x, y);
        self.segments.push(direction);
        self.anchor_x = x;
        self.anchor_y = y;
    }

    fn end(&mut self) -> Option<Gesture> {
        let segments = std::mem::take(&mut self.segments);
        classify(&segments)
    }

    fn current(&self) -> Option<Gesture> {
        classify(&self.segments)
    }
}
