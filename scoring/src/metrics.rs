//! Evaluation records and accuracy aggregation.
//!
//! Per-question [`EvaluationRecord`]s are folded into overall accuracy,
//! per-category [`CategoryStats`] and a [`RunSummary`] carrying latency and
//! API-call cost for one strategy run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::question::QuestionId;

/// Scoring outcome for a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub question_id: QuestionId,
    pub category: String,
    /// Option chosen by the strategy, if any.
    pub model_answer: Option<u8>,
    /// Ground-truth option, if the dataset provides one.
    pub correct_answer: Option<u8>,
    /// True iff both answers are present and equal.
    pub is_correct: bool,
    /// Wall-clock seconds spent in the strategy, rounded to 2 decimals.
    pub response_time: f64,
}

impl EvaluationRecord {
    /// Score one question. Correctness is derived, never supplied.
    pub fn new(
        question_id: QuestionId,
        category: impl Into<String>,
        model_answer: Option<u8>,
        correct_answer: Option<u8>,
        elapsed: Duration,
    ) -> Self {
        Self {
            question_id,
            category: category.into(),
            model_answer,
            correct_answer,
            is_correct: is_correct(model_answer, correct_answer),
            response_time: round_secs(elapsed),
        }
    }

    /// Whether the strategy produced any answer at all.
    pub fn answered(&self) -> bool {
        self.model_answer.is_some()
    }
}

/// An answer is correct only when both sides are present and equal.
pub fn is_correct(model_answer: Option<u8>, correct_answer: Option<u8>) -> bool {
    matches!((model_answer, correct_answer), (Some(m), Some(c)) if m == c)
}

fn round_secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

/// Accuracy bucket for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub total: usize,
    pub correct: usize,
    /// `correct / total`, or 0 when `total` is 0.
    pub accuracy: f64,
}

impl CategoryStat {
    fn from_counts(total: usize, correct: usize) -> Self {
        Self {
            total,
            correct,
            accuracy: ratio(correct, total),
        }
    }
}

/// Category name → accuracy bucket, ordered by category name.
pub type CategoryStats = BTreeMap<String, CategoryStat>;

/// Fold records into per-category accuracy.
pub fn compute_category_stats(records: &[EvaluationRecord]) -> CategoryStats {
    let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for record in records {
        let entry = counts.entry(record.category.clone()).or_insert((0, 0));
        entry.0 += 1;
        if record.is_correct {
            entry.1 += 1;
        }
    }

    counts
        .into_iter()
        .map(|(category, (total, correct))| (category, CategoryStat::from_counts(total, correct)))
        .collect()
}

/// Overall accuracy: correct / total, 0 for an empty run.
pub fn overall_accuracy(records: &[EvaluationRecord]) -> f64 {
    let correct = records.iter().filter(|r| r.is_correct).count();
    ratio(correct, records.len())
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Aggregated statistics for one strategy run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub strategy: String,
    pub total_questions: usize,
    pub correct: usize,
    pub accuracy: f64,
    /// Questions for which no answer was produced (call failure or no digit).
    pub unanswered: usize,
    /// Latency percentiles over per-question response times.
    pub latency_p50: Duration,
    pub latency_p95: Duration,
    pub latency_max: Duration,
    pub latency_total: Duration,
    /// Successful gateway calls counted during the run.
    pub api_calls: u64,
    pub api_calls_per_question: f64,
    /// Gateway calls that failed; they cost a request but yield no text.
    pub failed_calls: u64,
    /// `api_calls + failed_calls`.
    pub attempts: u64,
    pub category_stats: CategoryStats,
}

impl RunSummary {
    /// Summarize a run from its per-question records.
    pub fn from_records(strategy: &str, records: &[EvaluationRecord], api_calls: u64) -> Self {
        let n = records.len();
        let correct = records.iter().filter(|r| r.is_correct).count();
        let unanswered = records.iter().filter(|r| !r.answered()).count();

        let mut durations: Vec<Duration> = records
            .iter()
            .map(|r| Duration::from_secs_f64(r.response_time.max(0.0)))
            .collect();
        durations.sort();
        let latency_total = durations.iter().sum();

        let api_calls_per_question = if n == 0 {
            0.0
        } else {
            api_calls as f64 / n as f64
        };

        Self {
            strategy: strategy.to_string(),
            total_questions: n,
            correct,
            accuracy: ratio(correct, n),
            unanswered,
            latency_p50: percentile_duration(&durations, 50),
            latency_p95: percentile_duration(&durations, 95),
            latency_max: durations.last().copied().unwrap_or(Duration::ZERO),
            latency_total,
            api_calls,
            api_calls_per_question,
            failed_calls: 0,
            attempts: api_calls,
            category_stats: compute_category_stats(records),
        }
    }

    /// Record failed gateway calls alongside the successful ones.
    pub fn with_failed_calls(mut self, failed_calls: u64) -> Self {
        self.failed_calls = failed_calls;
        self.attempts = self.api_calls + failed_calls;
        self
    }

    /// Format as a markdown summary report.
    pub fn format_report(&self) -> String {
        let mut report = String::new();

        report.push_str(&format!("# {} Evaluation\n\n", title_case(&self.strategy)));

        report.push_str("## Summary\n\n");
        report.push_str(&format!(
            "| Metric | Value |\n\
             |--------|-------|\n\
             | Correct | {}/{} |\n\
             | Accuracy | {:.2}% |\n\
             | Unanswered | {} |\n\
             | API Calls | {} |\n\
             | API Calls / Question | {:.2} |\n\
             | Failed Calls | {} |\n\
             | Attempts | {} |\n\n",
            self.correct,
            self.total_questions,
            self.accuracy * 100.0,
            self.unanswered,
            self.api_calls,
            self.api_calls_per_question,
            self.failed_calls,
            self.attempts,
        ));

        report.push_str("## Latency\n\n");
        report.push_str(&format!(
            "- p50: {:.2}s\n\
             - p95: {:.2}s\n\
             - max: {:.2}s\n\
             - total: {:.1}s\n\n",
            self.latency_p50.as_secs_f64(),
            self.latency_p95.as_secs_f64(),
            self.latency_max.as_secs_f64(),
            self.latency_total.as_secs_f64(),
        ));

        if !self.category_stats.is_empty() {
            report.push_str("## Accuracy by Category\n\n");
            report.push_str("| Category | Correct | Accuracy |\n|----------|---------|----------|\n");
            let mut rows: Vec<(&String, &CategoryStat)> = self.category_stats.iter().collect();
            // Best category first; ties keep name order.
            rows.sort_by(|a, b| b.1.accuracy.total_cmp(&a.1.accuracy));
            for (category, stat) in rows {
                report.push_str(&format!(
                    "| {} | {}/{} | {:.2}% |\n",
                    category,
                    stat.correct,
                    stat.total,
                    stat.accuracy * 100.0
                ));
            }
            report.push('\n');
        }

        report
    }
}

/// `angel_demon` → `Angel Demon`.
pub(crate) fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compute the p-th percentile from a sorted slice of Duration.
fn percentile_duration(sorted: &[Duration], p: usize) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = (p * sorted.len() / 100).min(sorted.len() - 1);
    sorted[idx]
}
