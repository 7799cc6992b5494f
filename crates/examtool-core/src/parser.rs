//! Exam markup parser.
//!
//! The markup is line oriented:
//!
//! ```text
//! = Section title (lottery 2)
//! Section description.
//! == Question
//! Question body, rendered as markdown.
//! + An option (correct)
//! + Another option
//! ```
//!
//! Each line is classified on its own, then fed to a small state machine
//! that tracks the open section and question. Question bodies are rendered
//! in a separate pass once the whole structure is known.

use std::path::Path;

use anyhow::{Context, Result};

use crate::error::{ParseError, RenderError};
use crate::model::{Exam, ExamOption, Question, Section};
use crate::render::{MarkdownRenderer, Renderer};

const SECTION_MARKER: &str = "= ";
const QUESTION_MARKER: &str = "==";
const OPTION_MARKER: &str = "+ ";
const LOTTERY_PREFIX: &str = " (lottery ";
const CORRECT_SUFFIX: &str = " (correct)";

/// A classified markup line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `= Title` or `= Title (lottery N)`. `lottery` holds the raw digits.
    SectionHeader {
        title: &'a str,
        lottery: Option<&'a str>,
    },
    /// `== ...`; anything after the marker is ignored.
    QuestionHeader,
    /// `+ Text` or `+ Text (correct)`.
    Option { text: &'a str, correct: bool },
    /// Anything else.
    Body(&'a str),
}

/// Classify a single line. Patterns are tried in order: section header,
/// question header, option, body.
pub fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix(SECTION_MARKER) {
        if !rest.is_empty() {
            let (title, lottery) = split_lottery(rest);
            return Line::SectionHeader { title, lottery };
        }
    }

    if line.starts_with(QUESTION_MARKER) {
        return Line::QuestionHeader;
    }

    if let Some(rest) = line.strip_prefix(OPTION_MARKER) {
        if !rest.is_empty() {
            return match rest.strip_suffix(CORRECT_SUFFIX) {
                Some(text) if !text.is_empty() => Line::Option {
                    text,
                    correct: true,
                },
                _ => Line::Option {
                    text: rest,
                    correct: false,
                },
            };
        }
    }

    Line::Body(line)
}

/// Split `Title (lottery N)` into the title and the digits. The title must
/// stay non-empty, otherwise the whole text is the title.
fn split_lottery(rest: &str) -> (&str, Option<&str>) {
    if let Some(inner) = rest.strip_suffix(')') {
        if let Some(idx) = inner.rfind(LOTTERY_PREFIX) {
            let title = &inner[..idx];
            let digits = &inner[idx + LOTTERY_PREFIX.len()..];
            if !title.is_empty() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
            {
                return (title, Some(digits));
            }
        }
    }
    (rest, None)
}

/// The open section and question while walking the input.
///
/// A question is only ever open inside an open section.
#[derive(Debug, Default)]
struct ParserState {
    sections: Vec<Section>,
    section: Option<Section>,
    question: Option<Question>,
}

impl ParserState {
    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        match classify(line) {
            Line::SectionHeader { title, lottery } => {
                let count = lottery
                    .map(|digits| {
                        digits.parse::<u32>().map_err(|_| ParseError::LotteryCount {
                            line: line_no,
                            content: line.to_string(),
                        })
                    })
                    .transpose()?;
                self.close_section();
                self.section = Some(Section::new(title, count));
            }
            Line::QuestionHeader => {
                if self.section.is_none() {
                    return Err(ParseError::QuestionOutsideSection {
                        line: line_no,
                        content: line.to_string(),
                    });
                }
                self.close_question();
                self.question = Some(Question::default());
            }
            Line::Option { text, correct } => {
                let question =
                    self.question
                        .as_mut()
                        .ok_or_else(|| ParseError::OptionOutsideQuestion {
                            line: line_no,
                            content: line.to_string(),
                        })?;
                question.options.push(ExamOption::new(text, correct));
            }
            Line::Body(text) => {
                if let Some(question) = self.question.as_mut() {
                    push_line(&mut question.raw_body, text);
                } else if let Some(section) = self.section.as_mut() {
                    push_line(&mut section.description, text);
                }
                // Lines before the first section are dropped.
            }
        }
        Ok(())
    }

    fn close_question(&mut self) {
        if let Some(question) = self.question.take() {
            if let Some(section) = self.section.as_mut() {
                section.questions.push(question);
            }
        }
    }

    fn close_section(&mut self) {
        self.close_question();
        if let Some(section) = self.section.take() {
            self.sections.push(section);
        }
    }

    fn finish(mut self) -> Exam {
        self.close_section();
        Exam::new(self.sections)
    }
}

/// Line terminators recognised by the markup: `\n`, `\r\n`, a lone `\r`,
/// and the Unicode line and paragraph separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split `text` into lines without their terminators. A trailing terminator
/// does not produce an empty last line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some((idx, c)) = rest.char_indices().find(|&(_, c)| is_line_break(c)) else {
            let line = rest;
            rest = "";
            return Some(line);
        };
        let line = &rest[..idx];
        let mut next = idx + c.len_utf8();
        if c == '\r' && rest[next..].starts_with('\n') {
            next += 1;
        }
        rest = &rest[next..];
        Some(line)
    })
}

fn push_line(buf: &mut String, line: &str) {
    buf.push_str(line);
    buf.push('\n');
}

/// Run the structural pass only. `rendered_body` is left empty.
pub fn parse_structure(text: &str) -> Result<Exam, ParseError> {
    let mut state = ParserState::default();
    for (idx, line) in split_lines(text.trim()).enumerate() {
        state.feed(idx + 1, line)?;
    }
    let exam = state.finish();
    tracing::debug!(
        sections = exam.sections.len(),
        questions = exam.question_count(),
        "parsed exam structure"
    );
    Ok(exam)
}

/// Render every question body of `exam` in place.
pub fn render_exam<R>(exam: &mut Exam, renderer: &R) -> Result<(), RenderError>
where
    R: Renderer + ?Sized,
{
    for question in exam.sections.iter_mut().flat_map(|s| s.questions.iter_mut()) {
        question.rendered_body = renderer.render(&question.raw_body)?;
    }
    Ok(())
}

/// Parse exam markup and render its question bodies with `renderer`.
pub fn parse_exam<R>(text: &str, renderer: &R) -> Result<Exam, ParseError>
where
    R: Renderer + ?Sized,
{
    let mut exam = parse_structure(text)?;
    render_exam(&mut exam, renderer)?;
    Ok(exam)
}

/// Parse exam markup, rendering bodies as markdown.
pub fn parse_exam_markdown(text: &str) -> Result<Exam, ParseError> {
    parse_exam(text, &MarkdownRenderer::new())
}

/// Read and parse an exam markup file.
pub fn parse_exam_file<R>(path: &Path, renderer: &R) -> Result<Exam>
where
    R: Renderer + ?Sized,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exam markup: {}", path.display()))?;
    parse_exam(&content, renderer)
        .with_context(|| format!("failed to parse exam markup: {}", path.display()))
}
