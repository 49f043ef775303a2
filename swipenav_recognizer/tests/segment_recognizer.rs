use swipenav_core::{Direction, Direction::*, Gesture, Recognizer};
use swipenav_recognizer::SegmentRecognizer;

/// Black box for testing the recognizer with whole strokes
struct Blackbox {
    recognizer: SegmentRecognizer,
    x: f64,
    y: f64,
}

impl Blackbox {
    /// Start a stroke at the origin
    fn new() -> Self {
        let mut recognizer = SegmentRecognizer::new();
        recognizer.start(0.0, 0.0);
        Self {
            recognizer,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Move the pointer by a relative offset in several small samples, the way a real mouse
    /// reports movement
    fn drag(mut self, dx: f64, dy: f64) -> Self {
        const STEPS: usize = 10;
        let (start_x, start_y) = (self.x, self.y);
        for i in 1..=STEPS {
            let t = i as f64 / STEPS as f64;
            self.recognizer.add_point(start_x + t * dx, start_y + t * dy);
        }
        self.x += dx;
        self.y += dy;
        self
    }

    /// One segment's worth of movement in a direction
    fn swipe(self, direction: Direction) -> Self {
        match direction {
            Left => self.drag(-120.0, 0.0),
            Right => self.drag(120.0, 0.0),
            Up => self.drag(0.0, -120.0),
            Down => self.drag(0.0, 120.0),
        }
    }

    fn swipes(self, directions: &[Direction]) -> Self {
        directions.iter().fold(self, |b, d| b.swipe(*d))
    }

    fn segments(&self) -> Vec<Direction> {
        self.recognizer.segments().to_vec()
    }

    /// Expect that releasing the trigger now produces the gesture
    fn expect(mut self, gesture: Option<Gesture>) {
        assert_eq!(self.recognizer.end(), gesture);
    }

    fn expect_str(self, gesture: &str) {
        let gesture = gesture.parse().expect("bad gesture in test");
        self.expect(Some(gesture))
    }
}

#[test]
fn no_movement() {
    Blackbox::new().expect(None);
}

#[test]
fn small_movement() {
    Blackbox::new().drag(40.0, -30.0).drag(-60.0, 10.0).expect(None);
}

#[test]
fn single_direction() {
    Blackbox::new().swipe(Right).expect_str("right");
    Blackbox::new().swipe(Left).expect_str("left");
    Blackbox::new().swipe(Up).expect_str("up");
    Blackbox::new().swipe(Down).expect_str("down");
}

#[test]
fn long_swipe_is_one_segment() {
    let b = Blackbox::new().drag(900.0, 20.0);
    assert_eq!(b.segments(), vec![Right]);
    b.expect_str("right");
}

#[test]
fn worked_example_right() {
    let mut r = SegmentRecognizer::new();
    r.start(0.0, 0.0);
    r.add_point(100.0, 0.0);
    assert_eq!(r.end(), Some(Gesture::Simple(Right)));
}

#[test]
fn worked_example_up_right() {
    let mut r = SegmentRecognizer::new();
    r.start(0.0, 0.0);
    r.add_point(0.0, -100.0);
    r.add_point(100.0, -100.0);
    assert_eq!(r.end(), Some(Gesture::Compound(Up, Right)));
}

#[test]
fn worked_example_diagonal() {
    let mut r = SegmentRecognizer::new();
    r.start(0.0, 0.0);
    r.add_point(80.0, 80.0);
    assert_eq!(r.end(), None);
}

#[test]
fn every_compound() {
    for first in Direction::ALL.iter() {
        for second in Direction::ALL.iter() {
            if first == second {
                continue;
            }
            Blackbox::new()
                .swipes(&[*first, *second])
                .expect(Some(Gesture::Compound(*first, *second)));
        }
    }
}

#[test]
fn three_segments_truncate_to_two() {
    Blackbox::new().swipes(&[Down, Right, Up]).expect_str("down+right");
    Blackbox::new().swipes(&[Left, Up, Right]).expect_str("left+up");
}

#[test]
fn truncation_matches_first_two() {
    let strokes: &[&[Direction]] = &[
        &[Up, Left, Down],
        &[Right, Down, Left, Up],
        &[Up, Down, Up, Left],
        &[Left, Right, Left, Right, Down],
        &[Down, Left, Down, Left, Down],
    ];
    for stroke in strokes {
        let full = {
            let mut b = Blackbox::new().swipes(stroke);
            b.recognizer.end()
        };
        let truncated = {
            let mut b = Blackbox::new().swipes(&stroke[..2]);
            b.recognizer.end()
        };
        assert_eq!(full, truncated, "{:?}", stroke);
    }
}

#[test]
fn short_alternation_is_compound() {
    Blackbox::new().swipes(&[Up, Down]).expect_str("up+down");
    Blackbox::new().swipes(&[Up, Down, Up]).expect_str("up+down");
    Blackbox::new().swipes(&[Left, Right, Left]).expect_str("left+right");
}

#[test]
fn up_down_repeat() {
    Blackbox::new()
        .swipes(&[Up, Down, Up, Down])
        .expect_str("UD_REPEAT");
    Blackbox::new()
        .swipes(&[Down, Up, Down, Up, Down, Up])
        .expect(Some(Gesture::UpDownRepeat));
}

#[test]
fn left_right_repeat() {
    Blackbox::new()
        .swipes(&[Left, Right, Left, Right])
        .expect_str("LR_REPEAT");
    Blackbox::new()
        .swipes(&[Right, Left, Right, Left, Right])
        .expect(Some(Gesture::LeftRightRepeat));
}

#[test]
fn broken_alternation_is_not_a_repeat() {
    Blackbox::new()
        .swipes(&[Up, Down, Up, Down, Right])
        .expect_str("up+down");
    Blackbox::new()
        .swipes(&[Right, Up, Down, Up, Down])
        .expect_str("right+up");
}

#[test]
fn worked_example_repeat() {
    let mut r = SegmentRecognizer::new();
    r.start(0.0, 0.0);
    r.add_point(0.0, -100.0);
    r.add_point(0.0, 0.0);
    r.add_point(0.0, -100.0);
    r.add_point(0.0, 0.0);
    assert_eq!(r.segments(), &[Up, Down, Up, Down]);
    assert_eq!(r.end(), Some(Gesture::UpDownRepeat));
}

#[test]
fn repeated_start_resets() {
    let mut b = Blackbox::new().swipes(&[Up, Left]);
    b.recognizer.start(10.0, 10.0);
    b.recognizer.start(20.0, 20.0);
    assert!(b.recognizer.segments().is_empty());
    assert_eq!(b.recognizer.anchor(), (20.0, 20.0));
    b.expect(None);
}

#[test]
fn reusable_across_strokes() {
    let mut r = SegmentRecognizer::new();
    for _ in 0..3 {
        r.start(0.0, 0.0);
        r.add_point(0.0, 100.0);
        r.add_point(100.0, 100.0);
        assert_eq!(r.end(), Some(Gesture::Compound(Down, Right)));

        r.start(0.0, 0.0);
        r.add_point(-100.0, 0.0);
        assert_eq!(r.end(), Some(Gesture::Simple(Left)));
    }
}

#[test]
fn jitter_never_duplicates_segments() {
    // a wobbly path: mostly rightwards with vertical noise and backtracking
    let mut b = Blackbox::new();
    let mut x = 0.0;
    for i in 0..400 {
        x += if i % 7 == 0 { -9.0 } else { 6.0 };
        let y = ((i * 37) % 50) as f64 - 25.0;
        b.recognizer.add_point(x, y);
        let segments = b.recognizer.segments();
        assert!(segments.windows(2).all(|w| w[0] != w[1]));
    }
    assert_eq!(b.segments(), vec![Right]);
    b.expect_str("right");
}

#[test]
fn diagonal_stroke_is_ignored() {
    Blackbox::new().drag(300.0, 300.0).expect(None);
    Blackbox::new().drag(-200.0, 200.0).expect(None);
}
