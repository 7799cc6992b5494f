//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use examtool_client::{load_config_from, ExamtoolConfig, HttpExamClient};
use examtool_core::parser::parse_exam_file;
use examtool_core::{Exam, MarkdownRenderer, Renderer};

pub mod api;
pub mod import;
pub mod init;
pub mod parse;
pub mod validate;

/// Load the config and build an HTTP client from it.
fn connect(config_path: Option<PathBuf>) -> Result<(ExamtoolConfig, HttpExamClient)> {
    let config = load_config_from(config_path.as_deref())?;
    if !config.has_cookie() {
        tracing::warn!("no session cookie configured; set EXAM_COOKIE or `cookie` in examtool.toml");
    }
    let client = HttpExamClient::new(&config).context("failed to create exam service client")?;
    Ok((config, client))
}

/// Load an exam from a `.json` file written by `parse`, or from markup.
///
/// Questions loaded from JSON without an `html` body are rendered here.
fn load_exam(path: &Path) -> Result<Exam> {
    let renderer = MarkdownRenderer::new();

    if path.extension().is_some_and(|ext| ext == "json") {
        let mut exam = Exam::load_json(path)?;
        for question in exam
            .sections
            .iter_mut()
            .flat_map(|s| s.questions.iter_mut())
            .filter(|q| q.rendered_body.is_empty() && !q.raw_body.is_empty())
        {
            question.rendered_body = renderer.render(&question.raw_body)?;
        }
        Ok(exam)
    } else {
        parse_exam_file(path, &renderer)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
