//! # glyph-trace - glyph tracing core
//!
//! Pure Rust engine behind an interactive letter-tracing surface:
//!
//! - **Path Sampler** - flattens move/line/cubic outlines into reference points
//! - **Trace Scorer** - tolerance-band matching of pointer samples, live completion
//! - **Mastery Tracker** - per-glyph attempt history with streak-based mastery
//!
//! Rendering, input devices and the storage medium stay outside: callers feed
//! normalized coordinates in, read snapshots back, and inject a
//! [`KeyValueStore`] for persistence.
//!
//! ## Modules
//!
//! - [`sampler`] - path-data parsing and Bézier flattening
//! - [`scorer`] - stroke state machine and completion scoring
//! - [`mastery`] - attempt history, mastery flag, statistics
//! - [`catalog`] - glyph records and lookup
//! - [`settings`] - sensitivity and presentation flags
//! - [`storage`] - key-value persistence backends
//! - [`sanitize`] - operand filtering and value clamping
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use glyph_trace::{GlyphCatalog, MasteryTracker, MemoryStore, TraceScorer, TracingSettings};
//!
//! let catalog = GlyphCatalog::from_json(
//!     r#"[{"id": "alif", "svgPath": "M 150 50 L 150 250"}]"#,
//! ).unwrap();
//! let mut scorer = TraceScorer::new(catalog, TracingSettings::default());
//! scorer.load_glyph("alif").unwrap();
//!
//! scorer.begin_stroke(150.0, 52.0);
//! scorer.extend_stroke(150.0, 248.0);
//! scorer.end_stroke();
//! assert!(scorer.is_complete());
//!
//! let mut tracker = MasteryTracker::new(MemoryStore::new());
//! tracker.record_attempt("alif", f64::from(scorer.accuracy()), scorer.elapsed_ms());
//! assert_eq!(tracker.glyph_progress("alif").unwrap().attempts.len(), 1);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod catalog;
pub mod mastery;
pub mod sampler;
pub mod sanitize;
pub mod scorer;
pub mod settings;
pub mod storage;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use catalog::{CatalogError, GlyphCatalog, GlyphRecord};
pub use mastery::{MasteryTracker, ProgressMap, DEFAULT_PROGRESS_KEY};
pub use sampler::{parse_path_data, PathSampler};
pub use scorer::{StrokeState, TraceError, TraceScorer, TraceSnapshot, TracedSet};
pub use settings::{SettingsError, TracingSettings};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
