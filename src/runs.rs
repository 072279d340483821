//! Run history
//!
//! Finished runs are appended to a single JSON document, most recent first.
//! The recorder scores each new run with the skill predictor using the
//! averages of the previous runs before storing it.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError, load_json, save_json};
use crate::predictor::{SkillFeatures, SkillModel, SkillPredictor};
use crate::sim::RunStats;

/// Number of previous runs averaged for a prediction
pub const PREDICTION_WINDOW: usize = 10;

/// Difficulty label stored on every record
pub const DEFAULT_DIFFICULTY: &str = "Normal";

/// A stored run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Synthetic id, unique within the store
    pub id: u64,
    /// Unix timestamp (ms) when the run ended
    pub timestamp: f64,
    pub score: u32,
    pub distance: f64,
    pub duration: f64,
    pub obstacles_hit: u32,
    pub difficulty: String,
    pub predicted_skill: String,
    pub predicted_next_distance: f64,
}

impl RunRecord {
    /// Back to the in-game summary shape
    pub fn to_stats(&self) -> RunStats {
        RunStats {
            score: self.score,
            distance: self.distance,
            obstacles_hit: self.obstacles_hit,
            duration: self.duration,
            predicted_skill: Some(self.predicted_skill.clone()),
            predicted_next_distance: Some(self.predicted_next_distance),
        }
    }
}

/// A run waiting to be stored (the repository assigns the id)
#[derive(Debug, Clone, PartialEq)]
pub struct NewRun {
    pub timestamp: f64,
    pub stats: RunStats,
    pub difficulty: String,
}

/// Append-only run storage
pub trait RunRepository {
    /// Store a run and return the stored record
    fn append(&mut self, run: NewRun) -> Result<RunRecord, StoreError>;

    /// Up to `n` runs, newest first; an unreadable store yields nothing
    fn query_recent(&self, n: usize) -> Vec<RunRecord>;

    /// Remove every stored run
    fn delete_all(&mut self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RunLog {
    next_id: u64,
    /// Sorted by timestamp, newest first
    records: Vec<RunRecord>,
}

/// `RunRepository` on top of any key/value store
#[derive(Debug, Clone)]
pub struct StoredRuns<S> {
    store: S,
}

impl<S: KeyValueStore> StoredRuns<S> {
    const STORAGE_KEY: &'static str = "runs";

    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn load(&self) -> Result<RunLog, StoreError> {
        Ok(load_json(&self.store, Self::STORAGE_KEY)?.unwrap_or_default())
    }

    /// Load for a write; an undecodable log is replaced by the next save
    fn load_or_reset(&self) -> Result<RunLog, StoreError> {
        match self.load() {
            Err(StoreError::Serde { source, .. }) => {
                log::warn!("Run history unreadable, starting fresh: {source}");
                Ok(RunLog::default())
            }
            other => other,
        }
    }
}

impl<S: KeyValueStore> RunRepository for StoredRuns<S> {
    fn append(&mut self, run: NewRun) -> Result<RunRecord, StoreError> {
        let mut log = self.load_or_reset()?;
        log.next_id = log.next_id.max(1);

        let record = RunRecord {
            id: log.next_id,
            timestamp: run.timestamp,
            score: run.stats.score,
            distance: run.stats.distance,
            duration: run.stats.duration,
            obstacles_hit: run.stats.obstacles_hit,
            difficulty: run.difficulty,
            predicted_skill: run.stats.predicted_skill.unwrap_or_default(),
            predicted_next_distance: run.stats.predicted_next_distance.unwrap_or_default(),
        };
        log.next_id += 1;

        // Find insertion point (sorted descending by timestamp)
        let pos = log
            .records
            .iter()
            .position(|r| record.timestamp > r.timestamp)
            .unwrap_or(log.records.len());
        log.records.insert(pos, record.clone());

        save_json(&mut self.store, Self::STORAGE_KEY, &log)?;
        log::info!("Run {} saved ({} total)", record.id, log.records.len());
        Ok(record)
    }

    fn query_recent(&self, n: usize) -> Vec<RunRecord> {
        match self.load() {
            Ok(mut log) => {
                log.records.truncate(n);
                log.records
            }
            Err(e) => {
                log::error!("Failed to fetch runs: {e}");
                Vec::new()
            }
        }
    }

    fn delete_all(&mut self) -> Result<(), StoreError> {
        self.store.remove(Self::STORAGE_KEY)?;
        log::info!("Cleared run history");
        Ok(())
    }
}

/// Mean of `values`, 0 for an empty slice
pub fn average_or_zero(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Model features from the most recent runs
pub fn features_from(recent: &[RunRecord]) -> SkillFeatures {
    SkillFeatures {
        avg_distance: average_or_zero(recent.iter().map(|r| r.distance)),
        avg_duration: average_or_zero(recent.iter().map(|r| r.duration)),
        avg_obstacles_hit: average_or_zero(recent.iter().map(|r| f64::from(r.obstacles_hit))),
        // Coins are tallied as run score
        avg_coins_collected: average_or_zero(recent.iter().map(|r| f64::from(r.score))),
        run_count: recent.len() as f64,
    }
}

/// Scores finished runs and stores them
pub struct RunRecorder<R, M> {
    runs: R,
    predictor: SkillPredictor<M>,
}

impl<R: RunRepository, M: SkillModel> RunRecorder<R, M> {
    pub fn new(runs: R, predictor: SkillPredictor<M>) -> Self {
        Self { runs, predictor }
    }

    pub fn runs(&self) -> &R {
        &self.runs
    }

    /// Predict from previous runs, then store this one
    ///
    /// A failed write is logged; the returned record still carries the
    /// prediction so the summary screen can show it.
    pub fn record(&mut self, stats: &RunStats, timestamp: f64) -> RunRecord {
        let previous = self.runs.query_recent(PREDICTION_WINDOW);
        let prediction = self.predictor.predict(&features_from(&previous));

        let mut stats = stats.clone();
        stats.predicted_skill = Some(prediction.skill.clone());
        stats.predicted_next_distance = Some(prediction.predicted_distance);

        let run = NewRun {
            timestamp,
            stats,
            difficulty: DEFAULT_DIFFICULTY.to_string(),
        };

        match self.runs.append(run.clone()) {
            Ok(record) => record,
            Err(e) => {
                log::error!("Failed to save run: {e}");
                RunRecord {
                    id: 0,
                    timestamp,
                    score: run.stats.score,
                    distance: run.stats.distance,
                    duration: run.stats.duration,
                    obstacles_hit: run.stats.obstacles_hit,
                    difficulty: run.difficulty,
                    predicted_skill: prediction.skill,
                    predicted_next_distance: prediction.predicted_distance,
                }
            }
        }
    }
}

/// Format a timestamp relative to `now` (both Unix ms)
pub fn format_relative(timestamp: f64, now: f64) -> String {
    let diff_secs = (now - timestamp) / 1000.0;
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
