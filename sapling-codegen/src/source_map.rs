//! Source-map structure.

use serde::{Deserialize, Serialize};

/// A generated-to-original position mapping at statement granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// 1-based line in the generated output.
    pub generated_line: u32,
    /// 0-based column in the generated output.
    pub generated_column: u32,
    /// 1-based line in the original source.
    pub original_line: u32,
}

/// A source map for one generated file.
///
/// Mappings are recorded per emitted statement that still knows its original
/// line; statements synthesized by passes carry no mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMap {
    pub version: u8,
    pub file: String,
    pub sources: Vec<String>,
    pub mappings: Vec<Mapping>,
}

impl SourceMap {
    pub fn new(file: impl Into<String>) -> Self {
        let file = file.into();
        Self {
            version: 3,
            sources: vec![file.clone()],
            file,
            mappings: Vec::new(),
        }
    }
}
