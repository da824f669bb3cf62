//! Scoring core for multi-agent debate benchmarks.
//!
//! Everything here is deterministic and free of network I/O:
//! - [`question`]: question records and the prompt-facing formatter
//! - [`extract`]: `FINAL_ANSWER:` parsing with a last-isolated-digit fallback
//! - [`transcript`]: debate transcripts and per-question strategy results
//! - [`metrics`]: evaluation records, category stats and run summaries
//! - [`run_log`]: the persisted JSON run log and its file sink
//! - [`compare`]: cross-strategy comparison of saved run logs

#![allow(clippy::uninlined_format_args)]

pub mod compare;
pub mod extract;
pub mod metrics;
pub mod question;
pub mod run_log;
pub mod transcript;

pub use compare::{StrategyComparison, StrategyRow, BASELINE_STRATEGY};
pub use extract::{extract_final_answer, extract_with_rule, ExtractionRule};
pub use metrics::{
    compute_category_stats, is_correct, overall_accuracy, CategoryStat, CategoryStats,
    EvaluationRecord, RunSummary,
};
pub use question::{format_question, QuestionId, QuestionRecord, UNKNOWN_CATEGORY};
pub use run_log::{JsonRunLogSink, LogEntry, ResultSink, RunLog, SinkError, RUN_TIMESTAMP_FORMAT};
pub use transcript::{StrategyResult, Transcript, TranscriptEntry};
