//! Question records and the prompt-facing question formatter.

use serde::{Deserialize, Serialize};

/// Category assigned to records that arrive without one.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Identifier of a question as it appears in the source dataset.
///
/// MMLU-Pro uses integer ids; other sources use strings. Serialized
/// untagged so logs keep the dataset's own representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for QuestionId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// A multiple-choice question.
///
/// The option index is the answer label: option `i` is answered by the
/// integer `i`, so `answer_index` refers directly into `options`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Dataset identifier; falls back to the positional index when absent.
    #[serde(default, alias = "question_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<QuestionId>,
    /// Question stem.
    pub question: String,
    /// Answer options in dataset order.
    pub options: Vec<String>,
    /// Subject label used for stratified accuracy.
    #[serde(default = "default_category")]
    pub category: String,
    /// Ground-truth option index, if known.
    #[serde(default)]
    pub answer_index: Option<u8>,
}

fn default_category() -> String {
    UNKNOWN_CATEGORY.to_string()
}

impl QuestionRecord {
    /// Create a record with no id, the unknown category and no ground truth.
    pub fn new(question: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            id: None,
            question: question.into(),
            options,
            category: default_category(),
            answer_index: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<QuestionId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_answer(mut self, answer_index: u8) -> Self {
        self.answer_index = Some(answer_index);
        self
    }

    /// The record's id, or its position in the dataset when it has none.
    pub fn id_or_position(&self, position: usize) -> QuestionId {
        self.id
            .clone()
            .unwrap_or(QuestionId::Number(position as u64))
    }

    /// Render this question as prompt text. See [`format_question`].
    pub fn formatted(&self) -> String {
        format_question(self)
    }
}

/// Render a question into the text block embedded in every prompt.
///
/// ```text
/// QUESTION: <stem>
///
/// OPTIONS:
/// 0. <option 0>
/// 1. <option 1>
/// ```
///
/// Every option line is newline-terminated and labeled with its 0-based
/// index, the same integer the model must answer with.
pub fn format_question(question: &QuestionRecord) -> String {
    let mut formatted = format!("QUESTION: {}\n\nOPTIONS:\n", question.question);
    for (i, option) in question.options.iter().enumerate() {
        formatted.push_str(&format!("{}. {}\n", i, option));
    }
    formatted
}
