//! Resolved configuration.

use sapling_ast::SourceKind;
use serde::Serialize;
use serde_json::Value;

use crate::pass::PassGroup;

/// Global options for one compilation request.
///
/// Already resolved: every field has its effective value. Created once per
/// request and read-only thereafter; [`crate::normalize`] copies it verbatim
/// onto the [`crate::File`], so a mid-run difference between the two means a
/// pass mutated the file's options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Options {
    /// Name of the file being transformed, used in diagnostics and maps.
    pub filename: String,
    /// Whether to emit code (and a map, when `source_map` is set).
    pub code: bool,
    /// Whether to return the mutated tree to the caller.
    pub ast: bool,
    /// Whether to build a source map during generation.
    pub source_map: bool,
    /// Whether merged visitor handlers are wrapped to name the failing pass.
    pub wrap_pass_visitors: bool,
    /// Module kind the program is parsed under.
    pub source_kind: SourceKind,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            filename: String::new(),
            code: true,
            ast: false,
            source_map: true,
            wrap_pass_visitors: true,
            source_kind: SourceKind::Module,
        }
    }
}

impl Options {
    /// The filename, or a placeholder for error messages when unset.
    pub fn display_name(&self) -> &str {
        if self.filename.is_empty() {
            "<unknown>"
        } else {
            &self.filename
        }
    }
}

/// The immutable configuration for one compilation request: global options
/// plus the ordered pass groups.
#[derive(Clone, Debug, Default)]
pub struct ResolvedConfig {
    pub options: Options,
    pub pass_groups: Vec<PassGroup>,
}

impl ResolvedConfig {
    pub fn new(options: Options, pass_groups: Vec<PassGroup>) -> Self {
        Self {
            options,
            pass_groups,
        }
    }

    /// Canonical serialization of this configuration, used as fingerprint
    /// material. A pure function of the configuration's values: two configs
    /// with equal options and equal `(key, options)` pass lists produce
    /// byte-identical material regardless of object identity.
    pub fn fingerprint_material(&self) -> String {
        config_material(&self.options, &self.pass_groups)
    }
}

/// Build canonical fingerprint material from options and pass groups.
///
/// Pass options are canonicalized (object keys sorted recursively) so that
/// re-serializing equal values yields identical bytes.
pub(crate) fn config_material(options: &Options, groups: &[PassGroup]) -> String {
    #[derive(Serialize)]
    struct Material<'a> {
        options: &'a Options,
        passes: Vec<Vec<(String, Value)>>,
    }

    let passes = groups
        .iter()
        .map(|group| {
            group
                .passes
                .iter()
                .map(|pass| (pass.key().to_string(), canonicalize(&pass.options())))
                .collect()
        })
        .collect();

    let material = Material { options, passes };
    serde_json::to_string(&material).expect("config material serialization cannot fail")
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by_key(|(key, _)| key.as_str());
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, inner)| (key.clone(), canonicalize(inner)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
