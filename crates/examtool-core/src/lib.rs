//! examtool-core: exam model, markup parser, rendering and validation.
//!
//! This crate turns the plain-text exam markup into the structured exam
//! representation that the rest of examtool imports into the exam service.

pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod validation;

pub use error::{ParseError, RenderError};
pub use model::{Exam, ExamOption, Question, Section};
pub use parser::{parse_exam, parse_exam_markdown, parse_structure, render_exam};
pub use render::{MarkdownRenderer, Renderer};
pub use validation::{validate_exam, ValidationError};
