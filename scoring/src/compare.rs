//! Cross-strategy comparison of saved run logs.
//!
//! Puts accuracy next to API-call cost for each strategy and lays out a
//! category × strategy accuracy matrix. The `single_agent` run, when present,
//! is the baseline that other strategies are measured against.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::metrics::title_case;
use crate::run_log::RunLog;

/// Strategy name treated as the comparison baseline.
pub const BASELINE_STRATEGY: &str = "single_agent";

/// One strategy's headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRow {
    pub strategy: String,
    pub accuracy: f64,
    pub total_questions: usize,
    pub api_calls: u64,
    pub api_calls_per_question: f64,
    /// Accuracy points (percent) bought per API call per question.
    pub accuracy_per_call: f64,
    /// Accuracy minus the baseline's accuracy, when a baseline run is loaded.
    pub delta_vs_baseline: Option<f64>,
}

/// Comparison across several run logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub rows: Vec<StrategyRow>,
    /// Every category seen in any run, sorted.
    pub categories: Vec<String>,
    /// `matrix[row][category]` is the accuracy, or `None` if the run lacks it.
    pub matrix: Vec<Vec<Option<f64>>>,
}

impl StrategyComparison {
    /// Build a comparison; rows keep the order of `logs`.
    pub fn from_logs(logs: &[RunLog]) -> Self {
        let baseline = logs
            .iter()
            .find(|l| l.strategy == BASELINE_STRATEGY)
            .map(|l| l.accuracy);

        let rows = logs
            .iter()
            .map(|log| {
                let api_calls_per_question = if log.total_questions == 0 {
                    0.0
                } else {
                    log.api_calls as f64 / log.total_questions as f64
                };
                let accuracy_per_call = if api_calls_per_question > 0.0 {
                    log.accuracy * 100.0 / api_calls_per_question
                } else {
                    0.0
                };
                StrategyRow {
                    strategy: log.strategy.clone(),
                    accuracy: log.accuracy,
                    total_questions: log.total_questions,
                    api_calls: log.api_calls,
                    api_calls_per_question,
                    accuracy_per_call,
                    delta_vs_baseline: baseline.map(|b| log.accuracy - b),
                }
            })
            .collect();

        let categories: Vec<String> = logs
            .iter()
            .flat_map(|l| l.category_stats.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let matrix = logs
            .iter()
            .map(|log| {
                categories
                    .iter()
                    .map(|c| log.category_stats.get(c).map(|s| s.accuracy))
                    .collect()
            })
            .collect();

        Self {
            rows,
            categories,
            matrix,
        }
    }

    /// The strategy with the highest accuracy.
    pub fn best(&self) -> Option<&StrategyRow> {
        self.rows
            .iter()
            .max_by(|a, b| a.accuracy.total_cmp(&b.accuracy))
    }

    /// Format as a markdown comparison report.
    pub fn format_report(&self) -> String {
        let mut report = String::new();

        report.push_str("# Multi-Agent Strategy Comparison\n\n");

        report.push_str("## Accuracy vs Cost\n\n");
        report.push_str(
            "| Strategy | Accuracy | Questions | API Calls | Calls / Question | Accuracy / Call | vs Baseline |\n",
        );
        report.push_str(
            "|----------|----------|-----------|-----------|------------------|-----------------|-------------|\n",
        );
        for row in &self.rows {
            let delta = match row.delta_vs_baseline {
                Some(d) => format!("{:+.2}%", d * 100.0),
                None => "-".to_string(),
            };
            report.push_str(&format!(
                "| {} | {:.2}% | {} | {} | {:.2} | {:.2} | {} |\n",
                title_case(&row.strategy),
                row.accuracy * 100.0,
                row.total_questions,
                row.api_calls,
                row.api_calls_per_question,
                row.accuracy_per_call,
                delta
            ));
        }
        report.push('\n');

        if let Some(best) = self.best() {
            report.push_str(&format!(
                "Best accuracy: {} ({:.2}%)\n\n",
                title_case(&best.strategy),
                best.accuracy * 100.0
            ));
        }

        if !self.categories.is_empty() {
            report.push_str("## Accuracy by Category\n\n");
            report.push_str("| Category |");
            for row in &self.rows {
                report.push_str(&format!(" {} |", title_case(&row.strategy)));
            }
            report.push_str("\n|----------|");
            for _ in &self.rows {
                report.push_str("------|");
            }
            report.push('\n');

            for (ci, category) in self.categories.iter().enumerate() {
                report.push_str(&format!("| {} |", category));
                for cells in &self.matrix {
                    match cells[ci] {
                        Some(acc) => report.push_str(&format!(" {:.1}% |", acc * 100.0)),
                        None => report.push_str(" - |"),
                    }
                }
                report.push('\n');
            }
            report.push('\n');
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::EvaluationRecord;
    use crate::question::QuestionId;
    use chrono::{Local, TimeZone};
    use std::time::Duration;

    fn run(strategy: &str, outcomes: &[(&str, bool)], api_calls: u64) -> RunLog {
        let results = outcomes
            .iter()
            .enumerate()
            .map(|(i, (cat, ok))| {
                EvaluationRecord::new(
                    QuestionId::Number(i as u64),
                    *cat,
                    Some(if *ok { 1 } else { 0 }),
                    Some(1),
                    Duration::from_millis(10),
                )
            })
            .collect();
        let at = Local.with_ymd_and_hms(2025, 12, 5, 2, 13, 40).unwrap();
        RunLog::new(strategy, results, vec![], api_calls, at)
    }

    #[test]
    fn test_rows_and_baseline_delta() {
        let logs = vec![
            run("single_agent", &[("math", true), ("law", false)], 2),
            run("chateval", &[("math", true), ("law", true)], 14),
        ];
        let cmp = StrategyComparison::from_logs(&logs);

        assert_eq!(cmp.rows.len(), 2);
        assert!((cmp.rows[1].api_calls_per_question - 7.0).abs() < 1e-9);
        assert!((cmp.rows[0].accuracy_per_call - 50.0).abs() < 1e-9);
        assert_eq!(cmp.rows[0].delta_vs_baseline, Some(0.0));
        assert!((cmp.rows[1].delta_vs_baseline.unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(cmp.best().unwrap().strategy, "chateval");
    }

    #[test]
    fn test_no_baseline() {
        let logs = vec![run("som", &[("math", true)], 5)];
        let cmp = StrategyComparison::from_logs(&logs);
        assert_eq!(cmp.rows[0].delta_vs_baseline, None);
        assert!(cmp.format_report().contains("| - |"));
    }

    #[test]
    fn test_category_matrix_marks_missing() {
        let logs = vec![
            run("som", &[("math", true)], 5),
            run("angel_demon", &[("law", false)], 7),
        ];
        let cmp = StrategyComparison::from_logs(&logs);
        assert_eq!(cmp.categories, vec!["law".to_string(), "math".to_string()]);
        assert_eq!(cmp.matrix[0], vec![None, Some(1.0)]);
        assert_eq!(cmp.matrix[1], vec![Some(0.0), None]);

        let report = cmp.format_report();
        assert!(report.contains("| Category | Som | Angel Demon |"));
        assert!(report.contains("| law | - | 0.0% |"));
        assert!(report.contains("| math | 100.0% | - |"));
    }

    #[test]
    fn test_empty() {
        let cmp = StrategyComparison::from_logs(&[]);
        assert!(cmp.best().is_none());
        assert!(cmp.format_report().starts_with("# Multi-Agent Strategy Comparison"));
    }
}
