use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Language the question bank falls back to when a requested translation
/// is missing.
pub const DEFAULT_LANGUAGE: &str = "de";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Single,
    Multiple,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// Anything the bank stores that is not one of the known values.
    /// Scoring treats this the same as "not hard".
    #[serde(other)]
    Unspecified,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Unspecified => "unspecified",
        }
    }
}

/// Text stored per language code ("de", "en", "tr", ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(pub BTreeMap<String, String>);

impl LocalizedText {
    pub fn resolve(&self, language: &str) -> &str {
        self.0
            .get(language)
            .or_else(|| self.0.get(DEFAULT_LANGUAGE))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// An option list stored per language code. All languages must carry the
/// same number of entries so answer indices stay meaningful.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedList(pub BTreeMap<String, Vec<String>>);

impl LocalizedList {
    pub fn resolve(&self, language: &str) -> &[String] {
        self.0
            .get(language)
            .or_else(|| self.0.get(DEFAULT_LANGUAGE))
            .or_else(|| self.0.values().next())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: LocalizedText,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub options: LocalizedList,
    pub correct_answer: Vec<usize>,
    pub explanation: LocalizedText,
    pub topic: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum QuestionInvalid {
    #[error("question {id}: options are empty")]
    NoOptions { id: String },
    #[error("question {id}: option lists differ in length across languages")]
    UnevenOptions { id: String },
    #[error("question {id}: single-select must have exactly one correct index")]
    SingleCardinality { id: String },
    #[error("question {id}: multi-select must have at least one correct index")]
    MultipleCardinality { id: String },
    #[error("question {id}: correct index {index} out of range (options: {len})")]
    IndexOutOfRange { id: String, index: usize, len: usize },
    #[error("question {id}: duplicate correct index {index}")]
    DuplicateIndex { id: String, index: usize },
}

impl Question {
    /// Number of answer options, taken from the default-language list.
    pub fn option_count(&self) -> usize {
        self.options.resolve(DEFAULT_LANGUAGE).len()
    }

    /// Checks the bank invariants before a question is accepted into the
    /// store. Open questions carry no selectable answer, so cardinality
    /// rules only apply to single/multiple.
    pub fn validate(&self) -> Result<(), QuestionInvalid> {
        let len = self.option_count();
        if len == 0 && self.kind != QuestionType::Open {
            return Err(QuestionInvalid::NoOptions {
                id: self.id.clone(),
            });
        }
        if self.options.0.values().any(|list| list.len() != len) {
            return Err(QuestionInvalid::UnevenOptions {
                id: self.id.clone(),
            });
        }

        let mut seen = BTreeSet::new();
        for &index in &self.correct_answer {
            if index >= len {
                return Err(QuestionInvalid::IndexOutOfRange {
                    id: self.id.clone(),
                    index,
                    len,
                });
            }
            if !seen.insert(index) {
                return Err(QuestionInvalid::DuplicateIndex {
                    id: self.id.clone(),
                    index,
                });
            }
        }

        match self.kind {
            QuestionType::Single if self.correct_answer.len() != 1 => {
                Err(QuestionInvalid::SingleCardinality {
                    id: self.id.clone(),
                })
            }
            QuestionType::Multiple if self.correct_answer.is_empty() => {
                Err(QuestionInvalid::MultipleCardinality {
                    id: self.id.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Renders the question in the requested language.
    ///
    /// Existing clients read `correct_answer` straight out of the list
    /// payload for single/multiple questions, so it stays in the response
    /// even though it hands out the answer. Open questions omit it.
    pub fn localize(&self, language: &str) -> QuestionView {
        let correct_answer = match self.kind {
            QuestionType::Open => None,
            _ => Some(self.correct_answer.clone()),
        };

        QuestionView {
            id: self.id.clone(),
            question: self.question.resolve(language).to_string(),
            kind: self.kind,
            options: self.options.resolve(language).to_vec(),
            correct_answer,
            explanation: self.explanation.resolve(language).to_string(),
            topic: self.topic.clone(),
            difficulty: self.difficulty,
            image: self.image.clone(),
        }
    }
}

/// A question rendered into a single language for the HTTP surface.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<Vec<usize>>,
    pub explanation: String,
    pub topic: String,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
