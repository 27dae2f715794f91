use crate::domain::model::SentenceParts;
use crate::utils::error::{Result, TrainerError};
use regex::Regex;

/// Case-insensitive, word-bounded match of a conjugated form, so that
/// "work" does not match inside "working".
#[derive(Debug, Clone)]
pub struct TermMatcher {
    regex: Regex,
}

/// A sentence cut around the matched form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSentence {
    pub parts: SentenceParts,
    /// Matched text with the sentence's own casing.
    pub matched: String,
}

impl TermMatcher {
    pub fn new(term: &str) -> Result<Self> {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(term.trim()));
        let regex = Regex::new(&pattern).map_err(|e| TrainerError::ConfigError {
            message: format!("cannot build matcher for '{}': {}", term, e),
        })?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, sentence: &str) -> bool {
        self.regex.is_match(sentence)
    }

    pub fn split(&self, sentence: &str) -> Option<SplitSentence> {
        let m = self.regex.find(sentence)?;
        Some(SplitSentence {
            parts: SentenceParts::new(&sentence[..m.start()], &sentence[m.end()..]),
            matched: m.as_str().to_string(),
        })
    }
}

/// Splits on the first literal occurrence of `answer`. When it is missing the
/// whole sentence, minus any trace of the answer, goes after the blank.
pub fn split_on_answer(sentence: &str, answer: &str) -> SentenceParts {
    if !answer.is_empty() {
        if let Some((before, after)) = sentence.split_once(answer) {
            return SentenceParts::new(before, after);
        }
    }
    let rest = if answer.is_empty() {
        sentence.trim().to_string()
    } else {
        sentence.replacen(answer, "", 1).trim().to_string()
    };
    SentenceParts::new("", format!(" {}", rest))
}
