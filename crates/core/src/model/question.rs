use std::collections::{BTreeSet, HashSet};
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyPrompt,

    #[error("question must have at least one option")]
    NoOptions,

    #[error("option key cannot be empty")]
    EmptyOptionKey,

    #[error("duplicate option key: {0}")]
    DuplicateOptionKey(String),

    #[error("correct answer must name at least one option")]
    EmptyCorrectAnswer,

    #[error("correct answer {0} is not one of the options")]
    UnknownCorrectKey(String),
}

//
// ─── OPTION KEYS ───────────────────────────────────────────────────────────────
//

/// Short label of an answer option, e.g. `"A"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionKey(String);

impl OptionKey {
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyOptionKey` for blank keys.
    pub fn new(key: impl Into<String>) -> Result<Self, QuestionError> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(QuestionError::EmptyOptionKey);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One selectable option of a question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOption {
    key: OptionKey,
    text: String,
}

impl AnswerOption {
    #[must_use]
    pub fn new(key: OptionKey, text: impl Into<String>) -> Self {
        Self {
            key,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &OptionKey {
        &self.key
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

//
// ─── CORRECT ANSWER ────────────────────────────────────────────────────────────
//

/// The correct response of a question.
///
/// `Multiple` models multi-response questions. A session records one key per
/// question, so a `Multiple` answer is only matched when the set holds exactly
/// that key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerKey {
    Single(OptionKey),
    Multiple(BTreeSet<OptionKey>),
}

impl AnswerKey {
    /// Builds an answer key from one or more option keys.
    ///
    /// A single key collapses to `AnswerKey::Single`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyCorrectAnswer` when no keys are given.
    pub fn from_keys(keys: impl IntoIterator<Item = OptionKey>) -> Result<Self, QuestionError> {
        let mut set: BTreeSet<OptionKey> = keys.into_iter().collect();
        match set.len() {
            0 => Err(QuestionError::EmptyCorrectAnswer),
            1 => Ok(Self::Single(set.pop_first().ok_or(QuestionError::EmptyCorrectAnswer)?)),
            _ => Ok(Self::Multiple(set)),
        }
    }

    /// Exact-match comparison against the recorded selection. No partial credit.
    #[must_use]
    pub fn is_matched_by(&self, selected: Option<&OptionKey>) -> bool {
        let Some(selected) = selected else {
            return false;
        };
        match self {
            Self::Single(key) => key == selected,
            Self::Multiple(keys) => keys.len() == 1 && keys.contains(selected),
        }
    }

    pub fn keys(&self) -> Box<dyn Iterator<Item = &OptionKey> + '_> {
        match self {
            Self::Single(key) => Box::new(std::iter::once(key)),
            Self::Multiple(keys) => Box::new(keys.iter()),
        }
    }

    #[must_use]
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .keys()
            .map(OptionKey::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// An immutable bank question with display-ordered options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<AnswerOption>,
    correct: AnswerKey,
}

impl Question {
    /// Create a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, there are no options, option
    /// keys repeat, or the correct answer references a missing option.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<AnswerOption>,
        correct: AnswerKey,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(option.key()) {
                return Err(QuestionError::DuplicateOptionKey(option.key().to_string()));
            }
        }
        if let Some(missing) = correct.keys().find(|key| !seen.contains(key)) {
            return Err(QuestionError::UnknownCorrectKey(missing.to_string()));
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> &AnswerKey {
        &self.correct
    }

    /// Looks up an option by its key label.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.key().as_str() == key)
    }

    #[must_use]
    pub fn is_correct(&self, selected: Option<&OptionKey>) -> bool {
        self.correct.is_matched_by(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> OptionKey {
        OptionKey::new(k).unwrap()
    }

    fn options(keys: &[&str]) -> Vec<AnswerOption> {
        keys.iter()
            .map(|k| AnswerOption::new(key(k), format!("Option {k}")))
            .collect()
    }

    #[test]
    fn keeps_option_order() {
        let q = Question::new(
            QuestionId::new("q1").unwrap(),
            "Pick one",
            options(&["C", "A", "B"]),
            AnswerKey::Single(key("A")),
        )
        .unwrap();
        let order: Vec<_> = q.options().iter().map(|o| o.key().as_str()).collect();
        assert_eq!(order, ["C", "A", "B"]);
        assert_eq!(q.option("B").unwrap().text(), "Option B");
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = Question::new(
            QuestionId::new("q1").unwrap(),
            "Pick one",
            options(&["A", "A"]),
            AnswerKey::Single(key("A")),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOptionKey("A".into()));
    }

    #[test]
    fn rejects_correct_key_outside_options() {
        let err = Question::new(
            QuestionId::new("q1").unwrap(),
            "Pick one",
            options(&["A", "B"]),
            AnswerKey::Single(key("D")),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::UnknownCorrectKey("D".into()));
    }

    #[test]
    fn rejects_blank_prompt_and_empty_options() {
        let id = QuestionId::new("q1").unwrap();
        assert_eq!(
            Question::new(id.clone(), " ", options(&["A"]), AnswerKey::Single(key("A")))
                .unwrap_err(),
            QuestionError::EmptyPrompt
        );
        assert_eq!(
            Question::new(id, "Prompt", Vec::new(), AnswerKey::Single(key("A"))).unwrap_err(),
            QuestionError::NoOptions
        );
    }

    #[test]
    fn answer_key_collapses_single_and_formats() {
        let single = AnswerKey::from_keys([key("B")]).unwrap();
        assert_eq!(single, AnswerKey::Single(key("B")));
        let multi = AnswerKey::from_keys([key("C"), key("A")]).unwrap();
        assert!(multi.is_multiple());
        assert_eq!(multi.to_string(), "A, C");
        assert_eq!(
            AnswerKey::from_keys(Vec::new()).unwrap_err(),
            QuestionError::EmptyCorrectAnswer
        );
    }

    #[test]
    fn multi_response_needs_exact_set() {
        let multi = AnswerKey::from_keys([key("A"), key("C")]).unwrap();
        assert!(!multi.is_matched_by(Some(&key("A"))));
        assert!(!multi.is_matched_by(None));
        let single = AnswerKey::Single(key("A"));
        assert!(single.is_matched_by(Some(&key("A"))));
        assert!(!single.is_matched_by(Some(&key("B"))));
    }
}
