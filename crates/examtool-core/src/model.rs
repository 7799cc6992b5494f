//! Core data model types for examtool.
//!
//! The serialized form matches what the import workflow sends to the exam
//! service: an ordered list of section objects, each carrying its questions
//! and their options.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// An exam: sections in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Exam {
    pub sections: Vec<Section>,
}

impl Exam {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Total number of questions across all sections.
    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    /// Iterate over every question in section order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }

    /// Load a previously parsed exam from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read exam file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse exam JSON: {}", path.display()))
    }

    /// Serialize the exam as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize exam")
    }
}

/// A top-level grouping of questions, optionally sampled by lottery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Plain-text title. The exam service does not accept markup here.
    pub name: String,
    /// Plain-text description, one `\n`-terminated line per source line.
    #[serde(default)]
    pub description: String,
    /// Whether lottery sampling is on. Absent means off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lottery_on: Option<bool>,
    /// How many questions each exam-taker gets when lottery is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lottery_item_count: Option<u32>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Section {
    /// Create an empty section. A lottery count turns the lottery on.
    pub fn new(name: impl Into<String>, lottery_item_count: Option<u32>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            lottery_on: lottery_item_count.map(|_| true),
            lottery_item_count,
            questions: Vec::new(),
        }
    }

    pub fn is_lottery(&self) -> bool {
        self.lottery_on.unwrap_or(false)
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Accumulated source markup of the question body.
    #[serde(rename = "typst", default)]
    pub raw_body: String,
    #[serde(default)]
    pub options: Vec<ExamOption>,
    /// `raw_body` after the rendering pass.
    #[serde(rename = "html", default)]
    pub rendered_body: String,
    /// Max score override; the importer falls back to its configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
}

impl Question {
    pub fn has_correct_option(&self) -> bool {
        self.options.iter().any(|o| o.correct)
    }
}

/// One selectable answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamOption {
    #[serde(rename = "option")]
    pub text: String,
    #[serde(rename = "correctOption", default)]
    pub correct: bool,
}

impl ExamOption {
    pub fn new(text: impl Into<String>, correct: bool) -> Self {
        Self {
            text: text.into(),
            correct,
        }
    }
}
