//! Evaluation loop: runs one strategy over a dataset, scores each answer
//! and optionally persists the run log.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use scoring::{
    CategoryStats, EvaluationRecord, JsonRunLogSink, LogEntry, ResultSink, RunLog, RunSummary,
};
use tracing::{info, warn};

use crate::config::EvaluationSettings;
use crate::dataset::Dataset;
use crate::errors::EvalError;
use crate::gateway::GatewayClient;
use crate::strategies::{Strategy, StrategyKind};

/// Outcome of one strategy over one dataset.
#[derive(Debug)]
pub struct EvaluationRun {
    pub strategy: StrategyKind,
    pub accuracy: f64,
    pub records: Vec<EvaluationRecord>,
    pub logs: Vec<LogEntry>,
    pub category_stats: CategoryStats,
    /// Successful gateway calls made during this run.
    pub api_calls: u64,
    /// Gateway calls that failed during this run.
    pub failed_calls: u64,
    pub elapsed: Duration,
    /// Where the run log was written, if saving was enabled.
    pub saved_to: Option<PathBuf>,
    /// Set when saving was enabled and the sink failed. The scores above
    /// are still complete.
    pub save_error: Option<EvalError>,
}

impl EvaluationRun {
    pub fn total_questions(&self) -> usize {
        self.records.len()
    }

    pub fn correct(&self) -> usize {
        self.records.iter().filter(|r| r.is_correct).count()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_records(self.strategy.as_str(), &self.records, self.api_calls)
            .with_failed_calls(self.failed_calls)
    }
}

/// Sequential evaluator. One question at a time, with a fixed pause
/// between questions.
pub struct Evaluator {
    client: Arc<GatewayClient>,
    request_delay: Duration,
    max_questions: Option<usize>,
    sink: Option<Box<dyn ResultSink + Send + Sync>>,
}

impl Evaluator {
    /// An evaluator that keeps results in memory only.
    pub fn new(client: Arc<GatewayClient>, request_delay: Duration) -> Self {
        Self {
            client,
            request_delay,
            max_questions: None,
            sink: None,
        }
    }

    /// Evaluator configured from settings; saves JSON run logs into
    /// `results_dir` when `save_results` is set.
    pub fn from_settings(client: Arc<GatewayClient>, settings: &EvaluationSettings) -> Self {
        let evaluator = Self::new(client, settings.request_delay());
        if settings.save_results {
            evaluator.with_sink(JsonRunLogSink::new(settings.results_dir.clone()))
        } else {
            evaluator
        }
    }

    pub fn with_sink(mut self, sink: impl ResultSink + Send + Sync + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Evaluate only the first `n` questions. `None` or 0 means all.
    pub fn with_max_questions(mut self, n: Option<usize>) -> Self {
        self.max_questions = n;
        self
    }

    /// Evaluate every question. Never fails: a sink error is carried on
    /// the returned run in `save_error`.
    pub async fn run(&self, strategy: &dyn Strategy, dataset: &Dataset) -> EvaluationRun {
        let kind = strategy.kind();
        let questions = match self.max_questions {
            Some(n) if n > 0 && n < dataset.len() => &dataset.records()[..n],
            _ => dataset.records(),
        };
        let total = questions.len();

        info!(
            strategy = %kind,
            dataset = dataset.name(),
            questions = total,
            "Starting evaluation"
        );

        let calls_before = self.client.api_calls();
        let failures_before = self.client.failed_calls();
        let started = Instant::now();
        let mut records = Vec::with_capacity(total);
        let mut logs = Vec::with_capacity(total);

        for (index, question) in questions.iter().enumerate() {
            let question_id = question.id_or_position(index);

            let question_started = Instant::now();
            let result = strategy.decide(question).await;
            let question_elapsed = question_started.elapsed();

            let record = EvaluationRecord::new(
                question_id.clone(),
                question.category.as_str(),
                result.final_answer,
                question.answer_index,
                question_elapsed,
            );
            info!(
                strategy = %kind,
                question = index + 1,
                total,
                category = %record.category,
                model_answer = ?record.model_answer,
                correct_answer = ?record.correct_answer,
                correct = record.is_correct,
                elapsed_secs = record.response_time,
                "Question evaluated"
            );

            logs.push(LogEntry::new(
                question_id,
                question.category.as_str(),
                kind.as_str(),
                &result,
                question.answer_index,
                Local::now(),
            ));
            records.push(record);

            if index + 1 < total && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        let api_calls = self.client.api_calls().saturating_sub(calls_before);
        let failed_calls = self.client.failed_calls().saturating_sub(failures_before);
        let elapsed = started.elapsed();
        let run_log = RunLog::new(kind.as_str(), records, logs, api_calls, Local::now());

        info!(
            strategy = %kind,
            accuracy = run_log.accuracy,
            api_calls,
            failed_calls,
            elapsed_secs = elapsed.as_secs_f64(),
            "Evaluation complete"
        );

        let (saved_to, save_error) = match self.sink.as_ref().map(|sink| sink.persist(&run_log)) {
            Some(Ok(path)) => (Some(path), None),
            Some(Err(e)) => {
                warn!(strategy = %kind, error = %e, "Failed to save run log");
                (None, Some(EvalError::from(e)))
            }
            None => (None, None),
        };

        EvaluationRun {
            strategy: kind,
            accuracy: run_log.accuracy,
            records: run_log.results,
            logs: run_log.logs,
            category_stats: run_log.category_stats,
            api_calls,
            failed_calls,
            elapsed,
            saved_to,
            save_error,
        }
    }
}
