//! The `examtool parse` command.

use std::path::PathBuf;

use anyhow::Result;

use examtool_core::parser::parse_exam_file;
use examtool_core::MarkdownRenderer;

pub fn execute(path: PathBuf, pretty: bool) -> Result<()> {
    let exam = parse_exam_file(&path, &MarkdownRenderer::new())?;

    if pretty {
        println!("{}", exam.to_json_pretty()?);
    } else {
        super::print_json(&exam)?;
    }
    Ok(())
}
