//! The `examtool validate` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};

use examtool_core::{validate_exam, Exam};

use super::load_exam;

pub fn execute(file: PathBuf) -> Result<()> {
    let exam = load_exam(&file)?;

    println!(
        "Exam: {} ({} sections, {} questions)",
        file.display(),
        exam.sections.len(),
        exam.question_count()
    );
    println!("{}", summary_table(&exam));

    let issues = validate_exam(&exam);
    if issues.is_empty() {
        println!("Exam is valid.");
        return Ok(());
    }

    for issue in &issues {
        println!("  ERROR: {issue}");
    }
    anyhow::bail!("{} validation issue(s) found", issues.len())
}

fn summary_table(exam: &Exam) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Section", "Lottery", "Questions", "Options"]);

    for (i, section) in exam.sections.iter().enumerate() {
        let lottery = match section.lottery_item_count {
            Some(count) if section.is_lottery() => count.to_string(),
            _ => "-".to_string(),
        };
        let options = section
            .questions
            .iter()
            .map(|q| q.options.len().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            (i + 1).to_string(),
            section.name.clone(),
            lottery,
            section.questions.len().to_string(),
            options,
        ]);
    }
    table
}
