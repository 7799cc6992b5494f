//! Question payloads for the create/edit question endpoints.
//!
//! Two scoring modes exist on the service side:
//! - single correct: set `correctOption` on exactly one option, leave
//!   `defaultScore` unset;
//! - many correct: set `defaultScore` per option, leave `correctOption` unset.

use serde::{Deserialize, Serialize};

use examtool_core::ExamOption;

use crate::error::ClientError;

/// Tag carried by every question examtool creates.
pub const GENERATED_TAG: &str = "examtool_generated";

/// Question type sent to the service. Only multiple choice is supported.
pub const MULTIPLE_CHOICE: &str = "MultipleChoiceQuestion";

/// Per-exam tag, so an import can find and delete its own questions.
pub fn exam_tag(exam_id: u64) -> String {
    format!("examtool_{exam_id}")
}

/// A partially specified option, as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionInput {
    /// Id of the option being replaced (edit only).
    #[serde(default)]
    pub id: Option<u64>,
    pub option: String,
    #[serde(default)]
    pub correct_option: Option<bool>,
    #[serde(default)]
    pub default_score: Option<f64>,
}

impl From<&ExamOption> for OptionInput {
    fn from(option: &ExamOption) -> Self {
        Self {
            id: None,
            option: option.text.clone(),
            correct_option: Some(option.correct),
            default_score: None,
        }
    }
}

/// A fully populated option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub option: String,
    pub correct_option: bool,
    pub default_score: f64,
}

/// Fill in the defaults for unset option fields: not correct, score 0.
pub fn build_option(input: OptionInput) -> OptionData {
    OptionData {
        id: input.id,
        option: input.option,
        correct_option: input.correct_option.unwrap_or(false),
        default_score: input.default_score.unwrap_or(0.0),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRef {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub name: String,
}

/// Body of the create/edit question endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionData {
    #[serde(rename = "type")]
    pub kind: String,
    pub default_max_score: u32,
    /// Question body as HTML.
    pub question: String,
    pub question_owners: Vec<OwnerRef>,
    pub tags: Vec<TagRef>,
    pub options: Vec<OptionData>,
}

impl QuestionData {
    /// The same question with option ids attached, in order. Extra ids or
    /// options are dropped.
    pub fn with_option_ids(&self, ids: &[u64]) -> Self {
        let options = self
            .options
            .iter()
            .zip(ids)
            .map(|(option, id)| OptionData {
                id: Some(*id),
                ..option.clone()
            })
            .collect();
        Self {
            options,
            ..self.clone()
        }
    }

    /// Tag names, generated tag included.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }
}

/// Build a multiple-choice question owned by `owner_id`.
///
/// The generated tag is always first, followed by `tags`.
pub fn build_question(
    owner_id: u64,
    default_max_score: u32,
    question: impl Into<String>,
    options: Vec<OptionInput>,
    tags: &[String],
) -> Result<QuestionData, ClientError> {
    if options.len() < 2 {
        return Err(ClientError::InvalidQuestion(format!(
            "needs at least 2 options, got {}",
            options.len()
        )));
    }

    let tags = std::iter::once(GENERATED_TAG.to_string())
        .chain(tags.iter().cloned())
        .map(|name| TagRef { name })
        .collect();

    Ok(QuestionData {
        kind: MULTIPLE_CHOICE.to_string(),
        default_max_score,
        question: question.into(),
        question_owners: vec![OwnerRef { id: owner_id }],
        tags,
        options: options.into_iter().map(build_option).collect(),
    })
}
