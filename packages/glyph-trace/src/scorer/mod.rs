//! Trace Scorer
//!
//! Holds the reference path of the loaded glyph and the user's strokes, and
//! turns pointer samples into a completion percentage.
//!
//! Session flow:
//! - `load_glyph` flattens the outline and clears all mutable state
//! - `begin_stroke` / `extend_stroke` / `end_stroke` follow one pointer gesture
//!   (`Idle -> Tracing -> Idle`, repeatable within a session)
//! - `reset` clears progress but keeps the reference path
//!
//! Matching: a reference point is traced once any user sample lies strictly
//! closer than `(11 - sensitivity) * 2`. Traced points stay traced until
//! reset or reload, so completion never decreases within a session.

mod traced_set;

pub use traced_set::TracedSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::GlyphCatalog;
use crate::sampler::PathSampler;
use crate::sanitize::clamp_sensitivity;
use crate::settings::TracingSettings;
use crate::types::{GlyphOutline, Point, ReferencePoint, COMPLETION_THRESHOLD};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TraceError {
    #[error("glyph not found: {0}")]
    NotFound(String),
}

pub type TraceResult<T> = Result<T, TraceError>;

/// Pointer gesture state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrokeState {
    #[default]
    Idle,
    Tracing,
}

/// Read-only view handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSnapshot {
    pub glyph_id: Option<String>,
    pub reference: Vec<ReferencePoint>,
    pub user_path: Vec<Point>,
    pub traced: Vec<bool>,
    pub completion: u8,
    pub hint_active: bool,
    pub state: StrokeState,
    pub guide_dots: Vec<Point>,
    pub start_point: Option<Point>,
}

/// `round(100 * traced / total)` in [0, 100]; an empty path scores 0
pub fn completion_percentage(traced: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (traced as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

pub struct TraceScorer {
    catalog: GlyphCatalog,
    settings: TracingSettings,
    sampler: PathSampler,

    glyph: Option<GlyphOutline>,
    reference: Vec<ReferencePoint>,

    user_path: Vec<Point>,
    /// Samples of `user_path` already checked against the reference
    checked: usize,
    traced: TracedSet,
    completion: u8,

    state: StrokeState,
    hint_active: bool,
    started_at: Option<DateTime<Utc>>,
}

impl TraceScorer {
    pub fn new(catalog: GlyphCatalog, settings: TracingSettings) -> Self {
        Self {
            catalog,
            settings,
            sampler: PathSampler::new(),
            glyph: None,
            reference: Vec::new(),
            user_path: Vec::new(),
            checked: 0,
            traced: TracedSet::default(),
            completion: 0,
            state: StrokeState::Idle,
            hint_active: false,
            started_at: None,
        }
    }

    // ========== Session ==========

    /// Load a glyph from the catalog and start a fresh session.
    ///
    /// On `NotFound` the current session is left untouched.
    pub fn load_glyph(&mut self, glyph_id: &str) -> TraceResult<()> {
        self.load_glyph_at(glyph_id, Utc::now())
    }

    pub fn load_glyph_at(&mut self, glyph_id: &str, now: DateTime<Utc>) -> TraceResult<()> {
        let Some(outline) = self.catalog.get(glyph_id) else {
            warn!(glyph_id = %glyph_id, "Glyph not found in catalog");
            return Err(TraceError::NotFound(glyph_id.to_string()));
        };

        let reference = self.sampler.flatten(outline);
        debug!(
            glyph_id = %glyph_id,
            reference_points = reference.len(),
            "Glyph loaded"
        );

        self.glyph = Some(outline.clone());
        self.traced = TracedSet::with_capacity(reference.len());
        self.reference = reference;
        self.user_path.clear();
        self.checked = 0;
        self.completion = 0;
        self.state = StrokeState::Idle;
        self.hint_active = false;
        self.started_at = Some(now);
        Ok(())
    }

    /// Clear strokes and progress, keep the loaded reference path.
    ///
    /// An active stroke stays active; only `end_stroke` leaves `Tracing`.
    pub fn reset(&mut self) {
        self.user_path.clear();
        self.checked = 0;
        self.traced.clear();
        self.completion = 0;
        self.hint_active = false;
    }

    pub fn show_hint(&mut self) {
        self.hint_active = true;
    }

    // ========== Strokes ==========

    pub fn begin_stroke(&mut self, x: f64, y: f64) {
        self.state = StrokeState::Tracing;
        self.user_path.clear();
        self.user_path.push(Point::new(x, y));
        self.checked = 0;
        debug!(x, y, "Stroke started");
    }

    /// Append a sample to the active stroke; ignored while idle
    pub fn extend_stroke(&mut self, x: f64, y: f64) {
        if self.state != StrokeState::Tracing {
            return;
        }
        self.user_path.push(Point::new(x, y));
        self.match_new_samples();
        self.completion = completion_percentage(self.traced.len(), self.reference.len());
    }

    /// Finish the active stroke; the user path stays visible
    pub fn end_stroke(&mut self) {
        if self.state == StrokeState::Tracing {
            debug!(
                samples = self.user_path.len(),
                completion = self.completion,
                "Stroke ended"
            );
        }
        self.state = StrokeState::Idle;
    }

    /// Check every sample not yet seen against the untraced reference points.
    ///
    /// Earlier samples cannot match anything new, so the result equals a full
    /// re-scan of the stroke.
    fn match_new_samples(&mut self) {
        let tolerance = self.settings.tolerance();
        for sample in &self.user_path[self.checked..] {
            let hits: Vec<usize> = self
                .traced
                .unmatched()
                .filter(|&i| self.reference[i].point().distance(sample) < tolerance)
                .collect();
            for i in hits {
                self.traced.insert(i);
            }
        }
        self.checked = self.user_path.len();
    }

    // ========== Queries ==========

    pub fn completion(&self) -> u8 {
        self.completion
    }

    pub fn is_complete(&self) -> bool {
        self.completion >= COMPLETION_THRESHOLD
    }

    /// Same value as completion once any sample exists, 0 before that
    pub fn accuracy(&self) -> u8 {
        if self.user_path.is_empty() {
            0
        } else {
            self.completion
        }
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_tracing(&self) -> bool {
        self.state == StrokeState::Tracing
    }

    pub fn hint_active(&self) -> bool {
        self.hint_active
    }

    pub fn glyph(&self) -> Option<&GlyphOutline> {
        self.glyph.as_ref()
    }

    pub fn reference(&self) -> &[ReferencePoint] {
        &self.reference
    }

    pub fn user_path(&self) -> &[Point] {
        &self.user_path
    }

    pub fn traced(&self) -> &TracedSet {
        &self.traced
    }

    pub fn catalog(&self) -> &GlyphCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &TracingSettings {
        &self.settings
    }

    pub fn tolerance(&self) -> f64 {
        self.settings.tolerance()
    }

    /// Change sensitivity (clamped to 1..=10). The active stroke is re-checked
    /// with the new tolerance on its next extension.
    pub fn set_sensitivity(&mut self, sensitivity: u8) {
        self.settings.sensitivity = clamp_sensitivity(sensitivity);
        self.checked = 0;
    }

    /// Milliseconds since the glyph was loaded (0 when nothing is loaded)
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms_at(Utc::now())
    }

    pub fn elapsed_ms_at(&self, now: DateTime<Utc>) -> u64 {
        self.started_at
            .map(|start| (now - start).num_milliseconds().max(0) as u64)
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> TraceSnapshot {
        TraceSnapshot {
            glyph_id: self.glyph.as_ref().map(|g| g.id.clone()),
            reference: self.reference.clone(),
            user_path: self.user_path.clone(),
            traced: self.traced.as_flags().to_vec(),
            completion: self.completion,
            hint_active: self.hint_active,
            state: self.state,
            guide_dots: self
                .glyph
                .as_ref()
                .map(|g| g.guide_dots.clone())
                .unwrap_or_default(),
            start_point: self.glyph.as_ref().and_then(|g| g.start_point),
        }
    }
}
