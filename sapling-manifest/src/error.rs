use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for manifest operations (boxed to reduce size on stack).
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Errors raised while reading or validating a sapling.toml.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read {path}")]
    #[diagnostic(code(sapling::manifest::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid sapling.toml")]
    #[diagnostic(code(sapling::manifest::parse))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("syntax error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(sapling::manifest::validation))]
    Validation {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },
}

impl Error {
    pub(crate) fn parse(source: toml::de::Error, content: &str, filename: &str) -> Box<Self> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: NamedSource::new(filename, content.to_string()),
            span,
            source,
        })
    }

    pub(crate) fn validation(
        message: impl Into<String>,
        content: &str,
        filename: &str,
    ) -> Box<Self> {
        Box::new(Error::Validation {
            src: NamedSource::new(filename, content.to_string()),
            span: None,
            message: message.into(),
        })
    }
}
