//! Question body rendering.
//!
//! The exam service displays question bodies as HTML. Rendering is a pure
//! function of the body text; the parser calls it once per question after
//! the structural pass.

use pulldown_cmark::{html, Options, Parser};

use crate::error::RenderError;

/// Converts accumulated body markup into rich-text markup.
pub trait Renderer: Send + Sync {
    fn render(&self, source: &str) -> Result<String, RenderError>;
}

impl<F> Renderer for F
where
    F: Fn(&str) -> Result<String, RenderError> + Send + Sync,
{
    fn render(&self, source: &str) -> Result<String, RenderError> {
        self(source)
    }
}

/// CommonMark renderer (fenced code blocks included).
///
/// Trailing newlines are trimmed from the output, so `"p\n"` renders to
/// `"<p>p</p>"`.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            options: Options::empty(),
        }
    }

    /// Enable extra pulldown-cmark extensions (tables, strikethrough, ...).
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, source: &str) -> Result<String, RenderError> {
        let parser = Parser::new_ext(source, self.options);
        let mut out = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out.truncate(out.trim_end_matches('\n').len());
        Ok(out)
    }
}
