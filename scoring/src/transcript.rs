//! Debate transcripts and per-question strategy results.

use serde::{Deserialize, Serialize};

/// One entry of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptEntry {
    /// A banner separating phases, e.g. `ROUND 2: DEFENSE & COUNTER`.
    Heading { text: String },
    /// Verbatim output of one speaker.
    Turn { speaker: String, content: String },
}

impl TranscriptEntry {
    fn render(&self) -> String {
        match self {
            Self::Heading { text } => text.clone(),
            Self::Turn { speaker, content } => format!("{}:\n{}", speaker, content),
        }
    }
}

/// Ordered, append-only record of a strategy run.
///
/// Content is stored verbatim; rendering joins entries with a blank line so
/// stage boundaries stay visible in the persisted log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a phase banner.
    pub fn heading(&mut self, text: impl Into<String>) -> &mut Self {
        self.entries.push(TranscriptEntry::Heading { text: text.into() });
        self
    }

    /// Append a speaker's output.
    pub fn turn(&mut self, speaker: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.entries.push(TranscriptEntry::Turn {
            speaker: speaker.into(),
            content: content.into(),
        });
        self
    }

    /// Render the human-readable debate log.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(TranscriptEntry::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Outcome of running one strategy on one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyResult {
    /// Chosen option index; `None` when a call failed or nothing parsed.
    pub final_answer: Option<u8>,
    /// Rendered transcript, or `"<stage> failed"` when the protocol aborted.
    pub debate_log: String,
}

impl StrategyResult {
    /// A protocol that ran to completion.
    pub fn decided(final_answer: Option<u8>, transcript: &Transcript) -> Self {
        Self {
            final_answer,
            debate_log: transcript.render(),
        }
    }

    /// A protocol aborted because the named stage's call failed.
    pub fn failed(stage: &str) -> Self {
        Self {
            final_answer: None,
            debate_log: format!("{} failed", stage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_joins_with_blank_lines() {
        let mut t = Transcript::new();
        t.turn("QUESTION", "Q?")
            .heading("ROUND 1: INITIAL POSITIONS")
            .turn("ANGEL (Initial Analysis)", "I think 2");
        assert_eq!(
            t.render(),
            "QUESTION:\nQ?\n\nROUND 1: INITIAL POSITIONS\n\nANGEL (Initial Analysis):\nI think 2"
        );
    }

    #[test]
    fn test_content_kept_verbatim() {
        let raw = "  line one\n\n\tline two  \n";
        let mut t = Transcript::new();
        t.turn("AGENT", raw);
        assert_eq!(t.render(), format!("AGENT:\n{}", raw));
    }

    #[test]
    fn test_empty_transcript() {
        assert_eq!(Transcript::new().render(), "");
    }

    #[test]
    fn test_failed_result() {
        let r = StrategyResult::failed("Demon Round 1");
        assert_eq!(r.debate_log, "Demon Round 1 failed");
        assert_eq!(r.final_answer, None);
    }

    #[test]
    fn test_decided_result() {
        let mut t = Transcript::new();
        t.turn("MODERATOR (Final Decision)", "FINAL_ANSWER: 4");
        let r = StrategyResult::decided(Some(4), &t);
        assert_eq!(r.final_answer, Some(4));
        assert_eq!(r.debate_log, "MODERATOR (Final Decision):\nFINAL_ANSWER: 4");
    }
}
