//! Trainable recognizer that compares a stroke against stored example strokes.
//!
//! Strokes are normalized the way the $-family recognizers do it: resampled into equally
//! spaced points, scaled into the unit box with the aspect ratio kept, then moved so their
//! centroid is at the origin. Points are compared in order, so a stroke drawn upwards does not
//! match a template drawn downwards.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use swipenav_core::{Gesture, Recognizer};
use thiserror::Error;
use tracing::{debug, warn};

/// Number of points every stroke is resampled to
const SAMPLING_RESOLUTION: usize = 32;
/// Largest possible distance between two points of a normalized stroke that have the same index
/// (half the diagonal of the unit box)
const HALF_DIAGONAL: f64 = 0.5 * std::f64::consts::SQRT_2;
/// Minimum similarity score for a match to be accepted
pub const DEFAULT_MIN_SCORE: f64 = 0.8;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unable to read or write templates: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid template file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stroke for {0} is too short to use as a template")]
    Degenerate(Gesture),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

impl Point {
    fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An example stroke labelled with the gesture it stands for. Points are stored raw.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Template {
    pub gesture: Gesture,
    pub points: Vec<(f64, f64)>,
}

/// A collection of templates as saved on disk
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TemplateSet(pub Vec<Template>);

impl TemplateSet {
    pub fn from_json(raw: &str) -> Result<Self, TemplateError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load templates from a file. A missing file is an empty set.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), TemplateError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn push(&mut self, gesture: Gesture, points: Vec<(f64, f64)>) {
        self.0.push(Template { gesture, points });
    }
}

/// Nearest-neighbour matcher over a set of example strokes
#[derive(Debug, Clone)]
pub struct TemplateRecognizer {
    min_score: f64,
    templates: Vec<(Gesture, Vec<Point>)>,
    stroke: Vec<Point>,
}

impl Default for TemplateRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SCORE)
    }
}

impl TemplateRecognizer {
    pub fn new(min_score: f64) -> Self {
        Self {
            min_score,
            templates: vec![],
            stroke: vec![],
        }
    }

    /// Create a recognizer trained with every usable template in the set
    pub fn from_set(set: &TemplateSet, min_score: f64) -> Self {
        let mut recognizer = Self::new(min_score);
        for template in &set.0 {
            if let Err(e) = recognizer.add_template(template.gesture, &template.points) {
                warn!("skipping template: {}", e);
            }
        }
        recognizer
    }

    /// Train the recognizer with another example of a gesture
    pub fn add_template(
        &mut self,
        gesture: Gesture,
        points: &[(f64, f64)],
    ) -> Result<(), TemplateError> {
        let points: Vec<Point> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        let normalized = normalize(&points).ok_or(TemplateError::Degenerate(gesture))?;
        self.templates.push((gesture, normalized));
        Ok(())
    }

    /// The stored templates in training order, as normalized points
    pub fn templates(&self) -> impl Iterator<Item = (Gesture, Vec<(f64, f64)>)> + '_ {
        self.templates
            .iter()
            .map(|(gesture, points)| (*gesture, points.iter().map(|p| (p.x, p.y)).collect()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// The closest template's gesture and its score in [0, 1], regardless of the minimum score
    pub fn best_match(&self, points: &[(f64, f64)]) -> Option<(Gesture, f64)> {
        let points: Vec<Point> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        self.best_match_points(&points)
    }

    fn best_match_points(&self, points: &[Point]) -> Option<(Gesture, f64)> {
        let candidate = normalize(points)?;
        let mut best: Option<(Gesture, f64)> = None;
        for (gesture, template) in &self.templates {
            let distance = path_distance(&candidate, template);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((*gesture, distance));
            }
        }
        best.map(|(gesture, distance)| (gesture, (1.0 - distance / HALF_DIAGONAL).max(0.0)))
    }
}

impl Recognizer for TemplateRecognizer {
    fn start(&mut self, x: f64, y: f64) {
        self.stroke.clear();
        self.stroke.push(Point::new(x, y));
    }

    fn add_point(&mut self, x: f64, y: f64) {
        self.stroke.push(Point::new(x, y));
    }

    fn end(&mut self) -> Option<Gesture> {
        let stroke = std::mem::take(&mut self.stroke);
        let (gesture, score) = self.best_match_points(&stroke)?;
        if score >= self.min_score {
            debug!("matched {} with score {:.3}", gesture, score);
            Some(gesture)
        } else {
            debug!(
                "closest template {} scored {:.3}, below {:.3}",
                gesture, score, self.min_score
            );
            None
        }
    }
}

/// Resample, scale and translate a stroke. None if the stroke has no length.
fn normalize(points: &[Point]) -> Option<Vec<Point>> {
    if points.len() < 2 || path_length(points) == 0.0 {
        return None;
    }
    let points = resample(points, SAMPLING_RESOLUTION);
    let points = scale(&points);
    let c = centroid(&points);
    Some(
        points
            .iter()
            .map(|p| Point::new(p.x - c.x, p.y - c.y))
            .collect(),
    )
}

fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// Resample the path into n equally spaced points
fn resample(points: &[Point], n: usize) -> Vec<Point> {
    let interval = path_length(points) / (n - 1) as f64;
    let mut resampled = Vec::with_capacity(n);
    resampled.push(points[0]);

    let mut prev = points[0];
    let mut covered = 0.0;
    let mut i = 1;
    while i < points.len() && resampled.len() < n {
        let next = points[i];
        let dist = prev.distance(&next);
        if dist > 0.0 && covered + dist >= interval {
            let t = (interval - covered) / dist;
            let q = Point::new(prev.x + t * (next.x - prev.x), prev.y + t * (next.y - prev.y));
            resampled.push(q);
            // the rest of this piece starts at the new point
            prev = q;
            covered = 0.0;
        } else {
            covered += dist;
            prev = next;
            i += 1;
        }
    }

    // rounding can leave us one short of the final point
    let last = points[points.len() - 1];
    while resampled.len() < n {
        resampled.push(last);
    }
    resampled
}

/// Scale uniformly so the larger side of the bounding box becomes 1
fn scale(points: &[Point]) -> Vec<Point> {
    let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
    let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let size = (max_x - min_x).max(max_y - min_y);
    points
        .iter()
        .map(|p| Point::new((p.x - min_x) / size, (p.y - min_y) / size))
        .collect()
}

fn centroid(points: &[Point]) -> Point {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Mean distance between points with the same index
fn path_distance(a: &[Point], b: &[Point]) -> f64 {
    let total: f64 = a.iter().zip(b).map(|(p, q)| p.distance(q)).sum();
    total / a.len() as f64
}
