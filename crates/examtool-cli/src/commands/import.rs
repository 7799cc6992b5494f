//! The `examtool import` command.

use std::path::PathBuf;

use anyhow::Result;

use examtool_client::import_exam;

use super::{connect, load_exam};

pub async fn execute(
    exam_id: u64,
    owner_id: u64,
    file: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    // Load the exam before connecting so bad input never reaches the service.
    let exam = load_exam(&file)?;
    let (config, client) = connect(config_path)?;

    let summary = import_exam(&client, exam_id, owner_id, &exam, config.default_max_score).await?;

    println!(
        "Imported {} section(s) and {} question(s) into exam {exam_id}",
        summary.sections_created, summary.questions_created
    );
    println!(
        "Deleted {} old section(s) and {} old question(s)",
        summary.sections_deleted, summary.questions_deleted
    );
    Ok(())
}
