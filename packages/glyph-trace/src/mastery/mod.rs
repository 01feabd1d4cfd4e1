//! Mastery Tracker
//!
//! Durable per-glyph learning record built from finished tracing attempts.
//!
//! Rules:
//! - `best_accuracy` is the maximum accuracy ever recorded for the glyph
//! - a glyph becomes mastered once its last `MASTERY_WINDOW` attempts all
//!   reach `MASTERY_ACCURACY`; the flag is never cleared afterwards
//!
//! The whole mapping is written to the injected [`KeyValueStore`] after every
//! recorded attempt. Load and save failures are logged and remembered, never
//! propagated: the in-memory mapping stays authoritative for the session.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::sanitize::sanitize_accuracy;
use crate::storage::{KeyValueStore, StoreError};
use crate::types::{
    AttemptRecord, GlyphProgress, GlyphStatistics, Statistics, MASTERY_ACCURACY, MASTERY_WINDOW,
};

/// Storage key used when none is configured
pub const DEFAULT_PROGRESS_KEY: &str = "letterTracingProgress";

pub type ProgressMap = BTreeMap<String, GlyphProgress>;

/// Whether the trailing window of `attempts` qualifies for mastery
pub fn meets_mastery(attempts: &[AttemptRecord]) -> bool {
    if attempts.len() < MASTERY_WINDOW {
        return false;
    }
    attempts[attempts.len() - MASTERY_WINDOW..]
        .iter()
        .all(|a| a.accuracy >= MASTERY_ACCURACY)
}

pub struct MasteryTracker<S: KeyValueStore> {
    store: S,
    key: String,
    progress: ProgressMap,
    last_persist_error: Option<String>,
}

impl<S: KeyValueStore> MasteryTracker<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_PROGRESS_KEY)
    }

    /// Build a tracker over `store`, reading the mapping stored under `key`.
    ///
    /// Missing or unreadable data yields an empty mapping.
    pub fn with_key(store: S, key: &str) -> Self {
        let mut tracker = Self {
            store,
            key: key.to_string(),
            progress: ProgressMap::new(),
            last_persist_error: None,
        };

        match tracker.load() {
            Ok(progress) => {
                debug!(key = %tracker.key, glyphs = progress.len(), "Progress loaded");
                tracker.progress = progress;
            }
            Err(e) => {
                warn!(key = %tracker.key, error = %e, "Failed to load progress, starting empty");
                tracker.last_persist_error = Some(e.to_string());
            }
        }

        tracker
    }

    fn load(&self) -> Result<ProgressMap, StoreError> {
        match self.store.get(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(ProgressMap::new()),
        }
    }

    fn save(&mut self) {
        let result = serde_json::to_string(&self.progress)
            .map_err(StoreError::from)
            .and_then(|raw| self.store.set(&self.key, &raw));

        match result {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to save progress");
                self.last_persist_error = Some(e.to_string());
            }
        }
    }

    // ========== Recording ==========

    /// Append an attempt stamped with the current time
    pub fn record_attempt(&mut self, glyph_id: &str, accuracy: f64, duration_ms: u64) -> &GlyphProgress {
        self.record_attempt_at(glyph_id, accuracy, duration_ms, Utc::now())
    }

    pub fn record_attempt_at(
        &mut self,
        glyph_id: &str,
        accuracy: f64,
        duration_ms: u64,
        now: DateTime<Utc>,
    ) -> &GlyphProgress {
        let accuracy = sanitize_accuracy(accuracy);

        let entry = self
            .progress
            .entry(glyph_id.to_string())
            .or_insert_with(|| GlyphProgress::new(now));

        entry.attempts.push(AttemptRecord {
            accuracy,
            duration_ms,
            timestamp: now,
        });
        entry.best_accuracy = entry.best_accuracy.max(accuracy);

        if !entry.mastered && meets_mastery(&entry.attempts) {
            entry.mastered = true;
            info!(
                glyph_id = %glyph_id,
                attempts = entry.attempts.len(),
                "Glyph mastered"
            );
        }

        self.save();
        &self.progress[glyph_id]
    }

    // ========== Queries ==========

    pub fn glyph_progress(&self, glyph_id: &str) -> Option<&GlyphProgress> {
        self.progress.get(glyph_id)
    }

    pub fn all_progress(&self) -> &ProgressMap {
        &self.progress
    }

    pub fn is_mastered(&self, glyph_id: &str) -> bool {
        self.progress.get(glyph_id).is_some_and(|p| p.mastered)
    }

    /// Error message of the most recent failed load/save, cleared by the
    /// next successful save
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Aggregate every attempt across all glyphs
    pub fn statistics(&self) -> Statistics {
        let all: Vec<&AttemptRecord> = self
            .progress
            .values()
            .flat_map(|p| p.attempts.iter())
            .collect();

        let total_attempts = all.len();
        let average_accuracy = mean(all.iter().map(|a| a.accuracy));
        let total_practice_ms = all.iter().map(|a| a.duration_ms).sum();

        let per_glyph = self
            .progress
            .iter()
            .map(|(id, p)| {
                let stats = GlyphStatistics {
                    attempts: p.attempts.len(),
                    average_accuracy: mean(p.attempts.iter().map(|a| a.accuracy)),
                    best_accuracy: p.best_accuracy,
                    mastered: p.mastered,
                    last_attempt: p.last_attempt().map(|a| a.timestamp),
                };
                (id.clone(), stats)
            })
            .collect();

        Statistics {
            total_attempts,
            average_accuracy,
            glyphs_practiced: self.progress.values().filter(|p| !p.attempts.is_empty()).count(),
            glyphs_mastered: self.progress.values().filter(|p| p.mastered).count(),
            total_practice_ms,
            per_glyph,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StoreResult};
    use chrono::Duration;

    /// Store whose writes always fail
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "quota exceeded",
            )))
        }
    }

    fn tracker() -> MasteryTracker<MemoryStore> {
        MasteryTracker::new(MemoryStore::new())
    }

    #[test]
    fn test_first_attempt_creates_progress() {
        let mut tracker = tracker();
        let now = Utc::now();
        let progress = tracker.record_attempt_at("alif", 75.0, 3000, now);
        assert_eq!(progress.attempts.len(), 1);
        assert_eq!(progress.first_attempt, now);
        assert_eq!(progress.attempts[0].timestamp, now);
        assert_eq!(progress.best_accuracy, 75.0);
        assert!(!progress.mastered);
    }

    #[test]
    fn test_first_attempt_date_is_kept() {
        let mut tracker = tracker();
        let t0 = Utc::now();
        tracker.record_attempt_at("alif", 50.0, 1000, t0);
        let progress = tracker.record_attempt_at("alif", 60.0, 1000, t0 + Duration::minutes(5));
        assert_eq!(progress.first_attempt, t0);
    }

    #[test]
    fn test_best_accuracy_is_max() {
        let mut tracker = tracker();
        for acc in [40.0, 70.0, 55.0] {
            tracker.record_attempt("ba", acc, 1000);
        }
        assert_eq!(tracker.glyph_progress("ba").unwrap().best_accuracy, 70.0);
    }

    #[test]
    fn test_mastery_requires_three_high_attempts() {
        let mut tracker = tracker();
        tracker.record_attempt("ta", 95.0, 1000);
        tracker.record_attempt("ta", 96.0, 1000);
        assert!(!tracker.is_mastered("ta"));
        tracker.record_attempt("ta", 90.0, 1000);
        assert!(tracker.is_mastered("ta"));
    }

    #[test]
    fn test_mastery_broken_streak() {
        let mut tracker = tracker();
        for acc in [92.0, 80.0, 95.0] {
            tracker.record_attempt("tha", acc, 1000);
        }
        assert!(!tracker.is_mastered("tha"));
    }

    #[test]
    fn test_mastery_uses_trailing_window() {
        let mut tracker = tracker();
        for acc in [50.0, 91.0, 92.0, 93.0] {
            tracker.record_attempt("jeem", acc, 1000);
        }
        assert!(tracker.is_mastered("jeem"));
    }

    #[test]
    fn test_mastery_is_monotonic() {
        let mut tracker = tracker();
        for acc in [90.0, 90.0, 90.0, 10.0, 20.0] {
            tracker.record_attempt("ha", acc, 1000);
        }
        assert!(tracker.is_mastered("ha"));
    }

    #[test]
    fn test_accuracy_is_sanitized() {
        let mut tracker = tracker();
        let progress = tracker.record_attempt("kha", 140.0, 10);
        assert_eq!(progress.attempts[0].accuracy, 100.0);
        let progress = tracker.record_attempt("kha", f64::NAN, 10);
        assert_eq!(progress.attempts[1].accuracy, 0.0);
    }

    #[test]
    fn test_unknown_glyph_progress() {
        let tracker = tracker();
        assert!(tracker.glyph_progress("dal").is_none());
        assert!(!tracker.is_mastered("dal"));
        assert!(tracker.all_progress().is_empty());
    }

    #[test]
    fn test_every_attempt_is_persisted() {
        let mut tracker = tracker();
        tracker.record_attempt("alif", 88.0, 2000);
        let raw = tracker.store().get(DEFAULT_PROGRESS_KEY).unwrap().unwrap();
        let stored: ProgressMap = serde_json::from_str(&raw).unwrap();
        assert_eq!(&stored, tracker.all_progress());
    }

    #[test]
    fn test_loads_existing_progress() {
        let mut first = tracker();
        first.record_attempt("alif", 88.0, 2000);
        let store = first.into_store();

        let second = MasteryTracker::new(store);
        assert_eq!(second.glyph_progress("alif").unwrap().attempts.len(), 1);
        assert!(second.last_persist_error().is_none());
    }

    #[test]
    fn test_corrupt_blob_starts_empty() {
        let store = MemoryStore::with_entry(DEFAULT_PROGRESS_KEY, "{broken");
        let mut tracker = MasteryTracker::new(store);
        assert!(tracker.all_progress().is_empty());
        assert!(tracker.last_persist_error().is_some());

        // the next save overwrites the corrupt value
        tracker.record_attempt("alif", 70.0, 1000);
        assert!(tracker.last_persist_error().is_none());
    }

    #[test]
    fn test_custom_key() {
        let mut tracker = MasteryTracker::with_key(MemoryStore::new(), "other");
        tracker.record_attempt("alif", 70.0, 1000);
        assert!(tracker.store().get("other").unwrap().is_some());
        assert!(tracker.store().get(DEFAULT_PROGRESS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_save_failure_is_not_fatal() {
        let mut tracker = MasteryTracker::new(FailingStore);
        let progress = tracker.record_attempt("alif", 91.0, 1000);
        assert_eq!(progress.attempts.len(), 1);
        assert!(tracker
            .last_persist_error()
            .is_some_and(|e| e.contains("quota exceeded")));
        assert_eq!(tracker.glyph_progress("alif").unwrap().best_accuracy, 91.0);
    }

    #[test]
    fn test_statistics_empty() {
        let stats = tracker().statistics();
        assert_eq!(stats.total_attempts, 0);
        assert_eq!(stats.average_accuracy, 0.0);
        assert!(stats.per_glyph.is_empty());
    }

    #[test]
    fn test_statistics_aggregates() {
        let mut tracker = tracker();
        let t0 = Utc::now();
        tracker.record_attempt_at("alif", 90.0, 1000, t0);
        tracker.record_attempt_at("alif", 95.0, 1500, t0);
        tracker.record_attempt_at("alif", 100.0, 500, t0);
        tracker.record_attempt_at("ba", 40.0, 2000, t0 + Duration::seconds(3));

        let stats = tracker.statistics();
        assert_eq!(stats.total_attempts, 4);
        assert!((stats.average_accuracy - 81.25).abs() < 1e-9);
        assert_eq!(stats.glyphs_practiced, 2);
        assert_eq!(stats.glyphs_mastered, 1);
        assert_eq!(stats.total_practice_ms, 5000);

        let alif = &stats.per_glyph["alif"];
        assert_eq!(alif.attempts, 3);
        assert!((alif.average_accuracy - 95.0).abs() < 1e-9);
        assert!(alif.mastered);

        let ba = &stats.per_glyph["ba"];
        assert_eq!(ba.best_accuracy, 40.0);
        assert_eq!(ba.last_attempt, Some(t0 + Duration::seconds(3)));
    }

    #[test]
    fn test_meets_mastery() {
        let at = |accuracy| AttemptRecord {
            accuracy,
            duration_ms: 0,
            timestamp: Utc::now(),
        };
        assert!(!meets_mastery(&[]));
        assert!(!meets_mastery(&[at(100.0), at(100.0)]));
        assert!(meets_mastery(&[at(92.0), at(95.0), at(90.0)]));
        assert!(!meets_mastery(&[at(92.0), at(89.9), at(95.0)]));
    }
}
