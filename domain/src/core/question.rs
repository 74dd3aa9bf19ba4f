//! Question value object

use serde::{Deserialize, Serialize};

/// Identifier of an ingested question.
///
/// Assigned sequentially in input order, so it doubles as the question's
/// first-seen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(usize);

impl QuestionId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the question in the original input.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// A question to be grouped and analyzed (Value Object)
///
/// The text is kept verbatim; it is never normalized or rewritten once
/// ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    text: String,
}

impl Question {
    /// Create a new question
    pub fn new(id: QuestionId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// Build questions from raw texts, numbering them in input order.
    pub fn from_texts<I, S>(texts: I) -> Vec<Question>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Question::new(QuestionId::new(i), text))
            .collect()
    }

    pub fn id(&self) -> QuestionId {
        self.id
    }

    /// Get the question text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume and return the inner text
    pub fn into_text(self) -> String {
        self.text
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_creation() {
        let q = Question::new(QuestionId::new(3), "What is Rust?");
        assert_eq!(q.text(), "What is Rust?");
        assert_eq!(q.id().index(), 3);
    }

    #[test]
    fn test_from_texts_numbers_in_input_order() {
        let questions = Question::from_texts(["first", "second", "third"]);
        let ids: Vec<usize> = questions.iter().map(|q| q.id().index()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(questions[1].text(), "second");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(QuestionId::new(7).to_string(), "q7");
    }
}
