//! Final-answer extraction from free-text model output.
//!
//! Models are asked to end with `FINAL_ANSWER: <digit>` but drift, so the
//! extractor falls back to the last standalone digit in the text. Accuracy
//! numbers depend directly on these rules.

use regex::Regex;
use std::sync::LazyLock;

/// `FINAL_ANSWER:` (any case), optional whitespace, then the answer digit.
static FINAL_ANSWER_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)FINAL_ANSWER:\s*([0-9])").expect("FINAL_ANSWER_TAG regex should compile")
});

/// A digit with a word boundary on both sides: `4` in "option 4." matches,
/// the digits of `2024`, `a7` or `x_5` do not.
static ISOLATED_DIGIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([0-9])\b").expect("ISOLATED_DIGIT regex should compile")
});

/// Which rule produced an extracted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRule {
    /// Found a `FINAL_ANSWER:` tag.
    Tagged,
    /// Fell back to the last isolated digit.
    LastIsolatedDigit,
}

/// Extract the chosen option index (0-9) from a model response.
///
/// Returns `None` for empty or absent input and when no digit can be found.
pub fn extract_final_answer(response: Option<&str>) -> Option<u8> {
    extract_with_rule(response).map(|(answer, _)| answer)
}

/// Like [`extract_final_answer`], also reporting which rule matched.
pub fn extract_with_rule(response: Option<&str>) -> Option<(u8, ExtractionRule)> {
    let text = response?.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = FINAL_ANSWER_TAG.captures(text) {
        return digit_value(&caps[1]).map(|d| (d, ExtractionRule::Tagged));
    }

    ISOLATED_DIGIT
        .captures_iter(text)
        .last()
        .and_then(|caps| digit_value(&caps[1]))
        .map(|d| (d, ExtractionRule::LastIsolatedDigit))
}

fn digit_value(s: &str) -> Option<u8> {
    s.chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as u8)
}
