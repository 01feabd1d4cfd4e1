//! Common Types and Constants
//!
//! Shared data structures used across the sampler, scorer and mastery modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Number of parametric steps per cubic segment (t advances by 1/50 = 0.02)
pub const CUBIC_STEPS: u32 = 50;

/// Completion percentage at which a glyph counts as traced
pub const COMPLETION_THRESHOLD: u8 = 85;

/// Trailing window of attempts considered for mastery
pub const MASTERY_WINDOW: usize = 3;

/// Minimum accuracy every attempt in the window must reach
pub const MASTERY_ACCURACY: f64 = 90.0;

/// Sensitivity bounds (1 = loosest tolerance, 10 = tightest)
pub const MIN_SENSITIVITY: u8 = 1;
pub const MAX_SENSITIVITY: u8 = 10;
pub const DEFAULT_SENSITIVITY: u8 = 5;

// ==================== Geometry ====================

/// Device-independent 2D coordinate
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Sampled point of the reference path
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePoint {
    pub x: f64,
    pub y: f64,
    /// Set on points emitted by a move command (start of a sub-path)
    #[serde(default)]
    pub is_start: bool,
}

impl ReferencePoint {
    pub fn start(p: Point) -> Self {
        Self { x: p.x, y: p.y, is_start: true }
    }

    pub fn on_path(p: Point) -> Self {
        Self { x: p.x, y: p.y, is_start: false }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

// ==================== Outline ====================

/// One drawing command of a glyph outline.
///
/// `relative` commands add their operands to the current position before use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PathCommand {
    MoveTo { to: Point, relative: bool },
    LineTo { to: Point, relative: bool },
    CubicTo {
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
        relative: bool,
    },
}

/// Immutable glyph description handed to the sampler
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphOutline {
    pub id: String,
    pub commands: Vec<PathCommand>,
    #[serde(default)]
    pub guide_dots: Vec<Point>,
    #[serde(default)]
    pub start_point: Option<Point>,
}

// ==================== Mastery ====================

/// Outcome of one finished tracing attempt
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Accuracy percentage [0, 100]
    pub accuracy: f64,
    /// Time spent on the attempt in milliseconds
    #[serde(rename = "timeTaken")]
    pub duration_ms: u64,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

/// Learning record of a single glyph
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphProgress {
    pub attempts: Vec<AttemptRecord>,
    pub best_accuracy: f64,
    pub mastered: bool,
    #[serde(rename = "firstAttemptDate")]
    pub first_attempt: DateTime<Utc>,
}

impl GlyphProgress {
    pub fn new(first_attempt: DateTime<Utc>) -> Self {
        Self {
            attempts: Vec::new(),
            best_accuracy: 0.0,
            mastered: false,
            first_attempt,
        }
    }

    pub fn last_attempt(&self) -> Option<&AttemptRecord> {
        self.attempts.last()
    }
}

/// Aggregate of one glyph's attempts
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphStatistics {
    pub attempts: usize,
    pub average_accuracy: f64,
    pub best_accuracy: f64,
    pub mastered: bool,
    pub last_attempt: Option<DateTime<Utc>>,
}

/// Aggregate over every recorded attempt
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_attempts: usize,
    pub average_accuracy: f64,
    pub glyphs_practiced: usize,
    pub glyphs_mastered: usize,
    pub total_practice_ms: u64,
    pub per_glyph: std::collections::BTreeMap<String, GlyphStatistics>,
}
