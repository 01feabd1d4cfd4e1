//! Stroke replay
//!
//! Feeds recorded strokes through a scorer the same way a pointer adapter
//! would, then records the attempt.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use glyph_trace::{
    CatalogError, GlyphCatalog, KeyValueStore, MasteryTracker, Point, StoreError, TraceError,
    TraceScorer,
};

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ReplayResult<T> = Result<T, ReplayError>;

/// One recorded pointer gesture
pub type Stroke = Vec<Point>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub glyph_id: String,
    pub completion: u8,
    pub accuracy: u8,
    pub complete: bool,
    pub duration_ms: u64,
    pub mastered: bool,
    pub best_accuracy: f64,
}

pub fn read_file(path: &Path) -> ReplayResult<String> {
    std::fs::read_to_string(path).map_err(|source| ReplayError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_catalog(path: &Path) -> ReplayResult<GlyphCatalog> {
    Ok(GlyphCatalog::from_json(&read_file(path)?)?)
}

/// Parse `[[{x,y}, ...], ...]`; empty strokes are skipped
pub fn parse_strokes(json: &str) -> ReplayResult<Vec<Stroke>> {
    let strokes: Vec<Stroke> = serde_json::from_str(json)?;
    Ok(strokes.into_iter().filter(|s| !s.is_empty()).collect())
}

/// Load `glyph_id`, replay every stroke, then record the attempt
pub fn replay<S: KeyValueStore>(
    scorer: &mut TraceScorer,
    tracker: &mut MasteryTracker<S>,
    glyph_id: &str,
    strokes: &[Stroke],
) -> ReplayResult<ReplayReport> {
    scorer.load_glyph(glyph_id)?;

    for stroke in strokes {
        let Some((first, rest)) = stroke.split_first() else {
            continue;
        };
        scorer.begin_stroke(first.x, first.y);
        for p in rest {
            scorer.extend_stroke(p.x, p.y);
        }
        scorer.end_stroke();
    }

    let accuracy = scorer.accuracy();
    let duration_ms = scorer.elapsed_ms();
    let progress = tracker.record_attempt(glyph_id, f64::from(accuracy), duration_ms);

    let report = ReplayReport {
        glyph_id: glyph_id.to_string(),
        completion: scorer.completion(),
        accuracy,
        complete: scorer.is_complete(),
        duration_ms,
        mastered: progress.mastered,
        best_accuracy: progress.best_accuracy,
    };

    info!(
        glyph_id = %glyph_id,
        strokes = strokes.len(),
        completion = report.completion,
        mastered = report.mastered,
        "Replay finished"
    );

    Ok(report)
}
