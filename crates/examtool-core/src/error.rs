//! Parser and renderer error types.

use thiserror::Error;

/// Errors that abort a markup parse.
///
/// Line numbers are 1-based and count lines after the input has been
/// trimmed of surrounding whitespace.
#[derive(Debug, Error)]
pub enum ParseError {
    /// An option line appeared while no question was open.
    #[error("line {line}: option `{content}` appears outside of a question")]
    OptionOutsideQuestion { line: usize, content: String },

    /// A question header appeared before the first section header.
    #[error("line {line}: question `{content}` appears before any section")]
    QuestionOutsideSection { line: usize, content: String },

    /// The lottery item count does not fit in a `u32`.
    #[error("line {line}: invalid lottery item count in `{content}`")]
    LotteryCount { line: usize, content: String },

    /// The rendering collaborator failed on a question body.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ParseError {
    /// Returns the offending line number, if the error is structural.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::OptionOutsideQuestion { line, .. }
            | ParseError::QuestionOutsideSection { line, .. }
            | ParseError::LotteryCount { line, .. } => Some(*line),
            ParseError::Render(_) => None,
        }
    }
}

/// A failure reported by a [`Renderer`](crate::render::Renderer).
#[derive(Debug, Error)]
#[error("failed to render question body: {message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
