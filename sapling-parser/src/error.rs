use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for parser operations (boxed to keep the Ok path small).
pub type Result<T> = std::result::Result<T, Box<ParseError>>;

/// A syntax error with source context for miette rendering.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(sapling::parse), help("check the syntax near the highlighted span"))]
pub struct ParseError {
    #[source_code]
    src: NamedSource<String>,

    #[label("{message}")]
    span: SourceSpan,

    message: String,
}

impl ParseError {
    pub(crate) fn new(
        source: &str,
        filename: &str,
        offset: usize,
        len: usize,
        message: impl Into<String>,
    ) -> Box<Self> {
        // Clamp so an at-end-of-input error still labels something visible.
        let offset = offset.min(source.len().saturating_sub(1));
        let len = len.max(1).min(source.len() - offset).max(1);
        Box::new(Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::new(offset.into(), len),
            message: message.into(),
        })
    }

    /// The error message without source context.
    pub fn message(&self) -> &str {
        &self.message
    }
}
