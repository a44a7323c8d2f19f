//! Error classification.

use thiserror::Error;

/// Stable machine-readable classification of a transformation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A pass hook attempted asynchronous execution; fatal, indicates a
    /// pass/host compatibility mismatch, never retried.
    AsyncHookUnsupported,
    /// Unclassified failure during pass execution.
    Transform,
    /// Unclassified failure during code generation.
    Generate,
}

impl ErrorCode {
    /// The stable code string for programmatic branching.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AsyncHookUnsupported => "ASYNC_HOOK_UNSUPPORTED",
            ErrorCode::Transform => "TRANSFORM_ERROR",
            ErrorCode::Generate => "GENERATE_ERROR",
        }
    }
}

/// A classified transformation failure.
///
/// The message always begins with the originating file's name (or the
/// `<unknown>` placeholder); the code is stable across releases.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransformError {
    code: ErrorCode,
    message: String,
}

impl TransformError {
    pub(crate) fn new(
        filename: &str,
        code: ErrorCode,
        message: impl std::fmt::Display,
    ) -> Self {
        Self {
            code,
            message: format!("{filename}: {message}"),
        }
    }

    pub(crate) fn transform(filename: &str, message: impl std::fmt::Display) -> Self {
        Self::new(filename, ErrorCode::Transform, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
