//! The exam service API surface.
//!
//! Responses are passed through as JSON values; only the import workflow
//! looks inside them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::payload::QuestionData;

/// Every call the exam service exposes to examtool.
///
/// Implemented over HTTP by [`HttpExamClient`](crate::http::HttpExamClient)
/// and in memory by [`MockExamApi`](crate::mock::MockExamApi).
#[async_trait]
pub trait ExamApi: Send + Sync {
    /// Exams the current user reviews.
    async fn get_exams(&self) -> Result<Value, ClientError>;

    /// A single exam, including its `examSections`.
    async fn get_exam(&self, exam_id: u64) -> Result<Value, ClientError>;

    /// Create an empty section. The response carries at least `id` and
    /// `sequenceNumber`; use [`edit_section`](Self::edit_section) to name it.
    async fn create_section(&self, exam_id: u64) -> Result<Value, ClientError>;

    async fn edit_section(
        &self,
        exam_id: u64,
        section_id: u64,
        edit: &SectionEdit,
    ) -> Result<Value, ClientError>;

    async fn delete_section(&self, exam_id: u64, section_id: u64) -> Result<(), ClientError>;

    /// Attach a bank question to a section.
    async fn add_question(
        &self,
        exam_id: u64,
        section_id: u64,
        sequence_number: u32,
        question_id: u64,
    ) -> Result<Value, ClientError>;

    /// Unlink a question from a section without deleting it.
    async fn remove_question(
        &self,
        exam_id: u64,
        section_id: u64,
        question_id: u64,
    ) -> Result<(), ClientError>;

    /// All questions in the question bank.
    async fn get_questions(&self) -> Result<Value, ClientError>;

    /// Create a bank question. Option texts with URI-sensitive characters
    /// get mangled here; re-send them through
    /// [`edit_question`](Self::edit_question).
    async fn create_question(&self, data: &QuestionData) -> Result<Value, ClientError>;

    /// Replace a bank question. Each option should carry the id of the
    /// option it replaces.
    async fn edit_question(
        &self,
        question_id: u64,
        data: &QuestionData,
    ) -> Result<Value, ClientError>;

    /// Delete a question from the bank and every section using it.
    async fn delete_question(&self, question_id: u64) -> Result<(), ClientError>;
}

/// Body of a section edit. The service replaces all four fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionEdit {
    pub name: String,
    pub description: String,
    pub lottery_on: bool,
    /// Sent as `null` when absent.
    pub lottery_item_count: Option<u32>,
}

impl From<&examtool_core::Section> for SectionEdit {
    fn from(section: &examtool_core::Section) -> Self {
        Self {
            name: section.name.clone(),
            description: section.description.clone(),
            lottery_on: section.is_lottery(),
            lottery_item_count: section.lottery_item_count,
        }
    }
}

/// Body of an add-question call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddQuestionBody {
    pub sequence_number: u32,
    /// The service expects the id as a string.
    pub questions: String,
}
