use std::collections::HashSet;

use chrono::NaiveDate;
use rand::{seq::SliceRandom, Rng};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleShape {
    pub categories: usize,
    pub words_per_category: usize,
}

impl Default for PuzzleShape {
    fn default() -> Self {
        Self {
            categories: 4,
            words_per_category: 4,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("expected {expected} categories, found {actual}")]
    CategoryCount { expected: usize, actual: usize },

    #[error("category {category:?} has {actual} members, expected {expected}")]
    MemberCount {
        category: String,
        expected: usize,
        actual: usize,
    },

    #[error("category name is blank")]
    BlankName,

    #[error("word {word:?} appears more than once")]
    DuplicateWord { word: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub members: Vec<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, members: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    fn member_set(&self) -> HashSet<&str> {
        self.members.iter().map(String::as_str).collect()
    }
}

/// A puzzle as handed out by the store. Only `categories` matters for
/// checking answers; the rest is display metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub id: u64,
    pub date: NaiveDate,
    pub title: String,
    pub difficulty: String,
    pub categories: Vec<Category>,
}

impl Puzzle {
    /// Checks the invariants the verifier and hint generator rely on: fixed
    /// category and member counts, and every word used exactly once.
    pub fn validate(&self, shape: &PuzzleShape) -> Result<(), PuzzleError> {
        if self.categories.len() != shape.categories {
            return Err(PuzzleError::CategoryCount {
                expected: shape.categories,
                actual: self.categories.len(),
            });
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(PuzzleError::BlankName);
            }
            if category.members.len() != shape.words_per_category {
                return Err(PuzzleError::MemberCount {
                    category: category.name.clone(),
                    expected: shape.words_per_category,
                    actual: category.members.len(),
                });
            }
            for word in &category.members {
                if !seen.insert(word.as_str()) {
                    return Err(PuzzleError::DuplicateWord { word: word.clone() });
                }
            }
        }

        Ok(())
    }

    pub fn all_words(&self) -> Vec<String> {
        self.categories
            .iter()
            .flat_map(|category| category.members.iter().cloned())
            .collect()
    }

    /// Board order for display. Has no bearing on verification.
    pub fn shuffled_words<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let mut words = self.all_words();
        words.shuffle(rng);
        words
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    groups: Vec<Vec<String>>,
}

impl Submission {
    pub fn new(groups: Vec<Vec<String>>) -> Self {
        Self { groups }
    }

    /// Reads a submission from untrusted JSON. Anything that is not an array
    /// of arrays of strings is skipped and logged instead of rejected.
    pub fn from_json(value: &Value) -> Self {
        let Some(raw_groups) = value.as_array() else {
            if !value.is_null() {
                tracing::warn!(kind = json_kind(value), "Submission is not a list, treating as empty");
            }
            return Self::default();
        };

        let mut groups = Vec::with_capacity(raw_groups.len());
        for (index, raw_group) in raw_groups.iter().enumerate() {
            let Some(raw_words) = raw_group.as_array() else {
                tracing::warn!(index, kind = json_kind(raw_group), "Skipping malformed submission group");
                continue;
            };

            // A group with any non-string entry is not the group the player
            // picked, so none of it is kept.
            let group: Option<Vec<String>> = raw_words
                .iter()
                .map(|raw_word| raw_word.as_str().map(str::to_string))
                .collect();
            match group {
                Some(group) => groups.push(group),
                None => {
                    let kind = raw_words
                        .iter()
                        .find(|raw_word| !raw_word.is_string())
                        .map_or("unknown", json_kind);
                    tracing::warn!(index, kind, "Skipping submission group with non-string entry");
                }
            }
        }

        Self { groups }
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }
}

impl From<Vec<Vec<String>>> for Submission {
    fn from(groups: Vec<Vec<String>>) -> Self {
        Self::new(groups)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    pub correct: bool,
    /// Names of the categories found in the submission, in puzzle order.
    pub matched: Vec<String>,
}

/// Compares a submission against the hidden grouping. Groups are compared as
/// unordered sets of exact strings; empty groups, extra groups and repeats
/// are ignored, and the submission is correct once every category has been
/// matched.
pub fn grade(submission: &Submission, puzzle: &Puzzle) -> Grade {
    let candidates: Vec<HashSet<&str>> = submission
        .groups()
        .iter()
        .filter(|group| !group.is_empty())
        .map(|group| group.iter().map(String::as_str).collect())
        .collect();

    let matched: Vec<String> = puzzle
        .categories
        .iter()
        .filter(|category| {
            let truth = category.member_set();
            candidates.iter().any(|candidate| *candidate == truth)
        })
        .map(|category| category.name.clone())
        .collect();

    Grade {
        correct: matched.len() == puzzle.categories.len(),
        matched,
    }
}

pub fn verify(submission: &Submission, puzzle: &Puzzle) -> bool {
    grade(submission, puzzle).correct
}
