//! Pass-through API commands: `get`, `add`, `edit`, `remove`, `delete`,
//! `create`. Responses are printed as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};

use examtool_client::{build_question, ExamApi, OptionInput, QuestionData, SectionEdit};

use super::{connect, print_json};
use crate::{AddSubject, CreateSubject, DeleteSubject, EditSubject, GetSubject, RemoveSubject};

pub async fn get(subject: GetSubject, config_path: Option<PathBuf>) -> Result<()> {
    let (_, client) = connect(config_path)?;
    let response = match subject {
        GetSubject::Exams => client.get_exams().await?,
        GetSubject::Exam { exam_id } => client.get_exam(exam_id).await?,
        GetSubject::Questions => client.get_questions().await?,
    };
    print_json(&response)
}

pub async fn add(subject: AddSubject, config_path: Option<PathBuf>) -> Result<()> {
    let (_, client) = connect(config_path)?;
    match subject {
        AddSubject::Question {
            exam_id,
            section_id,
            sequence_number,
            question_id,
        } => {
            let response = client
                .add_question(exam_id, section_id, sequence_number, question_id)
                .await?;
            print_json(&response)
        }
    }
}

pub async fn edit(subject: EditSubject, config_path: Option<PathBuf>) -> Result<()> {
    let (_, client) = connect(config_path)?;
    let response = match subject {
        EditSubject::Section {
            exam_id,
            section_id,
            name,
            description,
            lottery_on,
            lottery_item_count,
        } => {
            let edit = SectionEdit {
                name,
                description,
                lottery_on,
                lottery_item_count,
            };
            client.edit_section(exam_id, section_id, &edit).await?
        }
        EditSubject::Question {
            question_id,
            owner_id,
            default_max_score,
            question,
            options,
            tags,
        } => {
            let data = question_data(owner_id, default_max_score, question, &options, &tags)?;
            client.edit_question(question_id, &data).await?
        }
    };
    print_json(&response)
}

pub async fn remove(subject: RemoveSubject, config_path: Option<PathBuf>) -> Result<()> {
    let (_, client) = connect(config_path)?;
    match subject {
        RemoveSubject::Question {
            exam_id,
            section_id,
            question_id,
        } => client.remove_question(exam_id, section_id, question_id).await?,
    }
    Ok(())
}

pub async fn delete(subject: DeleteSubject, config_path: Option<PathBuf>) -> Result<()> {
    let (_, client) = connect(config_path)?;
    match subject {
        DeleteSubject::Section {
            exam_id,
            section_id,
        } => client.delete_section(exam_id, section_id).await?,
        DeleteSubject::Question { question_id } => client.delete_question(question_id).await?,
    }
    Ok(())
}

pub async fn create(subject: CreateSubject, config_path: Option<PathBuf>) -> Result<()> {
    let (_, client) = connect(config_path)?;
    let response = match subject {
        CreateSubject::Section { exam_id } => client.create_section(exam_id).await?,
        CreateSubject::Question {
            owner_id,
            default_max_score,
            question,
            options,
            tags,
        } => {
            let data = question_data(owner_id, default_max_score, question, &options, &tags)?;
            client.create_question(&data).await?
        }
    };
    print_json(&response)
}

/// Build a question payload from the JSON option and tag arguments.
fn question_data(
    owner_id: u64,
    default_max_score: u32,
    question: String,
    options_json: &str,
    tags_json: &str,
) -> Result<QuestionData> {
    let options: Vec<OptionInput> =
        serde_json::from_str(options_json).context("options must be a JSON list of options")?;
    let tags: Vec<String> =
        serde_json::from_str(tags_json).context("tags must be a JSON list of strings")?;
    Ok(build_question(
        owner_id,
        default_max_score,
        question,
        options,
        &tags,
    )?)
}
