//! Groups of similar questions

use crate::core::question::{Question, QuestionId};
use serde::Serialize;

/// A labelled group of similar questions.
///
/// Questions keep their first-seen input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    label: usize,
    questions: Vec<Question>,
}

impl Group {
    pub fn new(label: usize, questions: Vec<Question>) -> Self {
        Self { label, questions }
    }

    pub fn label(&self) -> usize {
        self.label
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Question texts in input order.
    pub fn texts(&self) -> Vec<&str> {
        self.questions.iter().map(Question::text).collect()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// A partition of the input questions into non-overlapping groups.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Partition {
    groups: Vec<Group>,
}

impl Partition {
    /// Build a partition from clusters of indices into `questions`.
    ///
    /// Labels are assigned `0..k` in the order the clusters are given.
    pub(crate) fn from_clusters(questions: &[Question], clusters: &[Vec<usize>]) -> Self {
        let groups = clusters
            .iter()
            .enumerate()
            .map(|(label, members)| {
                let questions = members.iter().map(|&i| questions[i].clone()).collect();
                Group::new(label, questions)
            })
            .collect();
        Self { groups }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, label: usize) -> Option<&Group> {
        self.groups.iter().find(|g| g.label == label)
    }

    /// Label of the group holding `id`, if any.
    pub fn label_of(&self, id: QuestionId) -> Option<usize> {
        self.groups
            .iter()
            .find(|g| g.questions.iter().any(|q| q.id() == id))
            .map(Group::label)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of questions across all groups.
    pub fn question_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }
}
