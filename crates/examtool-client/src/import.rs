//! Exam import: replace an exam's sections and questions with a parsed exam.
//!
//! The import is destructive. Every question examtool previously generated
//! for the exam is deleted from the bank, every section of the exam is
//! deleted, and then the parsed sections and questions are recreated in
//! order. Nothing is kept locally between runs; the tags on generated
//! questions are the only state.

use serde_json::Value;
use thiserror::Error;
use tracing::info;

use examtool_core::{validate_exam, Exam, Question, ValidationError};

use crate::api::{ExamApi, SectionEdit};
use crate::error::ClientError;
use crate::payload::{build_question, exam_tag, OptionInput, GENERATED_TAG};

/// Errors that abort an import.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The exam failed validation; nothing was sent to the service.
    #[error("exam is not valid for import:\n{}", format_issues(.0))]
    Invalid(Vec<ValidationError>),

    #[error(transparent)]
    Client(#[from] ClientError),

    /// A response lacked a field the import needs.
    #[error("unexpected response from {context}: missing `{field}`")]
    UnexpectedResponse {
        context: &'static str,
        field: &'static str,
    },
}

fn format_issues(issues: &[ValidationError]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {issue}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// What an import did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub questions_deleted: usize,
    pub sections_deleted: usize,
    pub sections_created: usize,
    pub questions_created: usize,
}

/// Replace the contents of exam `exam_id` with `exam`.
///
/// Questions without `points` score `default_max_score`. Question bodies are
/// sent as their rendered HTML.
pub async fn import_exam(
    api: &dyn ExamApi,
    exam_id: u64,
    owner_id: u64,
    exam: &Exam,
    default_max_score: u32,
) -> Result<ImportSummary, ImportError> {
    let issues = validate_exam(exam);
    if !issues.is_empty() {
        return Err(ImportError::Invalid(issues));
    }

    let mut summary = ImportSummary {
        questions_deleted: delete_exam_questions(api, exam_id).await?,
        sections_deleted: delete_sections(api, exam_id).await?,
        ..Default::default()
    };

    let tags = [exam_tag(exam_id)];
    let num_sections = exam.sections.len();

    for (si, section) in exam.sections.iter().enumerate() {
        info!("Creating section {}/{}", si + 1, num_sections);
        let created = api.create_section(exam_id).await?;
        let section_id = id_of(&created, "create_section")?;
        api.edit_section(exam_id, section_id, &SectionEdit::from(section))
            .await?;
        summary.sections_created += 1;

        let num_questions = section.questions.len();
        for (qi, question) in section.questions.iter().enumerate() {
            info!("Creating question {}/{}", qi + 1, num_questions);
            let question_id =
                create_question(api, owner_id, question, default_max_score, &tags).await?;
            api.add_question(exam_id, section_id, 0, question_id).await?;
            summary.questions_created += 1;
        }
    }

    info!(
        sections = summary.sections_created,
        questions = summary.questions_created,
        "import complete"
    );
    Ok(summary)
}

/// Create a bank question, then re-send it with the option ids the service
/// assigned.
///
/// The create endpoint mangles URI-sensitive characters in option texts; the
/// edit endpoint does not, so the edit restores the intended texts.
async fn create_question(
    api: &dyn ExamApi,
    owner_id: u64,
    question: &Question,
    default_max_score: u32,
    tags: &[String],
) -> Result<u64, ImportError> {
    let options = question.options.iter().map(OptionInput::from).collect();
    let data = build_question(
        owner_id,
        question.points.unwrap_or(default_max_score),
        question.rendered_body.clone(),
        options,
        tags,
    )?;

    let created = api.create_question(&data).await?;
    let question_id = id_of(&created, "create_question")?;
    let option_ids = created
        .get("options")
        .and_then(Value::as_array)
        .ok_or(ImportError::UnexpectedResponse {
            context: "create_question",
            field: "options",
        })?
        .iter()
        .map(|option| id_of(option, "create_question"))
        .collect::<Result<Vec<_>, _>>()?;

    api.edit_question(question_id, &data.with_option_ids(&option_ids))
        .await?;
    Ok(question_id)
}

/// Delete every bank question tagged both as generated and for `exam_id`.
pub async fn delete_exam_questions(api: &dyn ExamApi, exam_id: u64) -> Result<usize, ImportError> {
    let exam_tag = exam_tag(exam_id);
    let questions = api.get_questions().await?;
    let questions = questions
        .as_array()
        .ok_or(ImportError::UnexpectedResponse {
            context: "get_questions",
            field: "[]",
        })?;

    let mut deleted = 0;
    for question in questions {
        let tags = tag_names(question);
        if tags.contains(&GENERATED_TAG) && tags.contains(&exam_tag.as_str()) {
            let id = id_of(question, "get_questions")?;
            info!("Deleting question {id}");
            api.delete_question(id).await?;
            deleted += 1;
        }
    }
    Ok(deleted)
}

/// Delete every section of `exam_id`.
pub async fn delete_sections(api: &dyn ExamApi, exam_id: u64) -> Result<usize, ImportError> {
    info!("Deleting all sections from exam {exam_id}");
    let exam = api.get_exam(exam_id).await?;
    let sections = exam
        .get("examSections")
        .and_then(Value::as_array)
        .ok_or(ImportError::UnexpectedResponse {
            context: "get_exam",
            field: "examSections",
        })?;

    for section in sections {
        api.delete_section(exam_id, id_of(section, "get_exam")?)
            .await?;
    }
    Ok(sections.len())
}

fn id_of(value: &Value, context: &'static str) -> Result<u64, ImportError> {
    value
        .get("id")
        .and_then(Value::as_u64)
        .ok_or(ImportError::UnexpectedResponse {
            context,
            field: "id",
        })
}

fn tag_names(question: &Value) -> Vec<&str> {
    question
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(|tag| tag.get("name").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}
