//! Working state for one compilation.

use indexmap::IndexMap;
use sapling_ast::Node;
use sapling_traverse::ScopeInfo;
use serde_json::Value;

use crate::{error::TransformError, options::Options};

/// Mutable working state for one compilation.
///
/// Exclusively owned by the orchestrator for the run's duration: every pass
/// mutates `ast` in place, code generation reads it, and the file is
/// discarded once the result is assembled.
#[derive(Debug, Clone)]
pub struct File {
    /// The tree. The same object is mutated by every pass group; there is no
    /// copying between groups.
    pub ast: Node,
    /// Declared bindings, built during normalization.
    pub scope: ScopeInfo,
    /// Effective per-file options.
    pub opts: Options,
    /// Metadata contributed by passes. Starts empty; a non-empty map makes
    /// the run ineligible for caching.
    pub metadata: IndexMap<String, Value>,
}

/// Build the working [`File`] for a run: parse the source (unless a
/// pre-parsed tree is supplied), analyze its scope, and attach the resolved
/// options verbatim.
pub fn normalize(
    options: &Options,
    source: &str,
    ast: Option<Node>,
) -> Result<File, TransformError> {
    let ast = match ast {
        Some(ast) => ast,
        None => sapling_parser::parse(source, options.display_name(), options.source_kind)
            .map_err(|err| TransformError::transform(options.display_name(), err.message()))?,
    };
    let scope = ScopeInfo::analyze(&ast);
    Ok(File {
        ast,
        scope,
        opts: options.clone(),
        metadata: IndexMap::new(),
    })
}

impl File {
    #[cfg(test)]
    pub(crate) fn for_tests(filename: &str) -> Self {
        let options = Options {
            filename: filename.to_string(),
            ..Options::default()
        };
        normalize(&options, "", None).expect("empty program normalizes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapling_ast::SourceKind;

    #[test]
    fn test_normalize_parses_and_analyzes() {
        let options = Options {
            filename: "input.sl".to_string(),
            ..Options::default()
        };
        let file = normalize(&options, "let x = 1;", None).unwrap();
        assert!(file.scope.has_binding("x"));
        assert_eq!(file.ast.source_kind(), Some(SourceKind::Module));
        assert!(file.metadata.is_empty());
        assert_eq!(file.opts, options);
    }

    #[test]
    fn test_normalize_accepts_preparsed_ast() {
        let ast = sapling_parser::parse("let y = 2;", "pre.sl", SourceKind::Module).unwrap();
        let file = normalize(&Options::default(), "ignored source", Some(ast)).unwrap();
        assert!(file.scope.has_binding("y"));
    }

    #[test]
    fn test_normalize_reports_parse_failures() {
        let err = normalize(&Options::default(), "let = ;", None).unwrap_err();
        assert!(err.to_string().starts_with("<unknown>:"));
    }
}
