//! Run logs: the persisted unit of output for one strategy run.
//!
//! One pretty-printed JSON document per run, named
//! `<strategy>_logs_<YYYYMMDD_HHMMSS>.json`, holding overall and
//! per-category accuracy, the API-call count and every question's debate
//! transcript.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::metrics::{compute_category_stats, overall_accuracy, CategoryStats, EvaluationRecord};
use crate::question::QuestionId;
use crate::transcript::StrategyResult;

/// `strftime` layout of the run timestamp, also used in file names.
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Errors from persisting or loading run logs.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create results directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("serialize failed: {0}")]
    Serialize(serde_json::Error),

    #[error("invalid run log {path}: {source}")]
    Deserialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Transcript entry for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub question_id: QuestionId,
    pub category: String,
    pub strategy: String,
    pub final_answer: Option<u8>,
    pub correct_answer: Option<u8>,
    /// Rendered transcript or `"<stage> failed"`.
    pub debate_process: String,
    /// ISO-8601 local time the question finished.
    pub timestamp: String,
}

impl LogEntry {
    pub fn new(
        question_id: QuestionId,
        category: impl Into<String>,
        strategy: impl Into<String>,
        result: &StrategyResult,
        correct_answer: Option<u8>,
        at: DateTime<Local>,
    ) -> Self {
        Self {
            question_id,
            category: category.into(),
            strategy: strategy.into(),
            final_answer: result.final_answer,
            correct_answer,
            debate_process: result.debate_log.clone(),
            timestamp: at.naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        }
    }
}

/// Persisted output of one strategy run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
    pub strategy: String,
    pub accuracy: f64,
    pub total_questions: usize,
    pub api_calls: u64,
    /// Run time in [`RUN_TIMESTAMP_FORMAT`].
    pub timestamp: String,
    pub category_stats: CategoryStats,
    pub logs: Vec<LogEntry>,
    /// Per-question scoring records; empty in logs written without them.
    #[serde(default)]
    pub results: Vec<EvaluationRecord>,
}

impl RunLog {
    /// Assemble a run log; accuracy and category stats are derived from
    /// `results` so they always agree with the records.
    pub fn new(
        strategy: impl Into<String>,
        results: Vec<EvaluationRecord>,
        logs: Vec<LogEntry>,
        api_calls: u64,
        at: DateTime<Local>,
    ) -> Self {
        Self {
            strategy: strategy.into(),
            accuracy: overall_accuracy(&results),
            total_questions: results.len(),
            api_calls,
            timestamp: at.format(RUN_TIMESTAMP_FORMAT).to_string(),
            category_stats: compute_category_stats(&results),
            logs,
            results,
        }
    }

    /// `<strategy>_logs_<timestamp>.json`
    pub fn file_name(&self) -> String {
        format!("{}_logs_{}.json", self.strategy, self.timestamp)
    }

    pub fn to_json(&self) -> Result<String, SinkError> {
        serde_json::to_string_pretty(self).map_err(SinkError::Serialize)
    }

    /// Load a run log written by [`JsonRunLogSink`].
    pub fn load(path: &Path) -> Result<Self, SinkError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SinkError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| SinkError::Deserialize {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Destination for finished run logs.
pub trait ResultSink {
    /// Persist a run log, returning where it was written.
    fn persist(&self, log: &RunLog) -> Result<PathBuf, SinkError>;
}

/// Writes run logs as JSON files into a results directory.
#[derive(Debug, Clone)]
pub struct JsonRunLogSink {
    dir: PathBuf,
}

impl JsonRunLogSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ResultSink for JsonRunLogSink {
    fn persist(&self, log: &RunLog) -> Result<PathBuf, SinkError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| SinkError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(log.file_name());
        let json = log.to_json()?;
        std::fs::write(&path, json).map_err(|source| SinkError::Write {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), strategy = %log.strategy, "Run log saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 12, 4, 21, 25, 52).unwrap()
    }

    fn sample_log() -> RunLog {
        let results = vec![
            EvaluationRecord::new(
                QuestionId::Number(0),
                "math",
                Some(2),
                Some(2),
                Duration::from_millis(900),
            ),
            EvaluationRecord::new(
                QuestionId::Number(1),
                "law",
                None,
                Some(5),
                Duration::from_millis(400),
            ),
        ];
        let logs = vec![
            LogEntry::new(
                QuestionId::Number(0),
                "math",
                "som",
                &StrategyResult {
                    final_answer: Some(2),
                    debate_log: "QUESTION:\n...".into(),
                },
                Some(2),
                fixed_time(),
            ),
            LogEntry::new(
                QuestionId::Number(1),
                "law",
                "som",
                &StrategyResult::failed("Expert"),
                Some(5),
                fixed_time(),
            ),
        ];
        RunLog::new("som", results, logs, 6, fixed_time())
    }

    #[test]
    fn test_file_name_convention() {
        assert_eq!(sample_log().file_name(), "som_logs_20251204_212552.json");
    }

    #[test]
    fn test_derived_fields() {
        let log = sample_log();
        assert_eq!(log.total_questions, 2);
        assert!((log.accuracy - 0.5).abs() < 1e-9);
        assert_eq!(log.category_stats["math"].correct, 1);
        assert_eq!(log.category_stats["law"].correct, 0);
        assert_eq!(log.logs[1].debate_process, "Expert failed");
    }

    #[test]
    fn test_entry_timestamp_is_iso() {
        let log = sample_log();
        assert_eq!(log.logs[0].timestamp, "2025-12-04T21:25:52.000000");
    }

    #[test]
    fn test_json_has_document_keys() {
        let json = sample_log().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for key in [
            "strategy",
            "accuracy",
            "total_questions",
            "api_calls",
            "timestamp",
            "category_stats",
            "logs",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        let entry = &value["logs"][0];
        for key in [
            "question_id",
            "category",
            "strategy",
            "final_answer",
            "correct_answer",
            "debate_process",
            "timestamp",
        ] {
            assert!(entry.get(key).is_some(), "missing log entry key {}", key);
        }
        assert_eq!(value["category_stats"]["math"]["total"], 1);
        assert_eq!(value["logs"][1]["final_answer"], serde_json::Value::Null);
    }

    #[test]
    fn test_load_without_results_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.json");
        std::fs::write(
            &path,
            r#"{"strategy":"single_agent","accuracy":1.0,"total_questions":1,
                "api_calls":1,"timestamp":"20251204_212552",
                "category_stats":{"math":{"total":1,"correct":1,"accuracy":1.0}},
                "logs":[]}"#,
        )
        .unwrap();
        let log = RunLog::load(&path).unwrap();
        assert!(log.results.is_empty());
        assert_eq!(log.api_calls, 1);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            RunLog::load(&path),
            Err(SinkError::Deserialize { .. })
        ));
    }
}
