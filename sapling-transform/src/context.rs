//! Per-pass, per-group state.

use indexmap::IndexMap;
use serde_json::Value;

use crate::{file::File, options::Options};

/// State container for one pass within one pass group.
///
/// Created fresh for every (pass, group) pairing on every run and dropped
/// when the group finishes; nothing in it survives into the next group.
/// Handlers and hooks receive it as an explicit `&mut` argument.
///
/// Metadata written through [`PassContext::add_metadata`] is staged here and
/// folded into [`File::metadata`] by the executor when the group completes,
/// since the traversal holds the tree mutably and the context cannot also
/// borrow the file.
#[derive(Debug, Clone)]
pub struct PassContext {
    /// Identity key of the owning pass.
    pub key: String,
    /// The owning pass's options.
    pub opts: Value,
    /// Name of the file being transformed.
    pub filename: String,
    /// Snapshot of the file's effective options.
    pub file_opts: Options,
    /// Metadata contributed by this pass, staged for the file.
    pub metadata: IndexMap<String, Value>,
    scratch: IndexMap<String, Value>,
}

impl PassContext {
    /// Build a fresh context bound to a file and a pass.
    pub fn new(file: &File, key: impl Into<String>, opts: Value) -> Self {
        Self {
            key: key.into(),
            opts,
            filename: file.opts.filename.clone(),
            file_opts: file.opts.clone(),
            metadata: IndexMap::new(),
            scratch: IndexMap::new(),
        }
    }

    /// Record metadata to be folded into the file when the group completes.
    pub fn add_metadata(&mut self, key: impl Into<String>, value: Value) {
        self.metadata.insert(key.into(), value);
    }

    /// Private scratch state; dies with the context.
    pub fn set_scratch(&mut self, key: impl Into<String>, value: Value) {
        self.scratch.insert(key.into(), value);
    }

    pub fn scratch(&self, key: &str) -> Option<&Value> {
        self.scratch.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_stages_metadata() {
        let file = File::for_tests("a.sl");
        let mut cx = PassContext::new(&file, "demo", json!({"level": 2}));
        assert_eq!(cx.filename, "a.sl");
        assert_eq!(cx.opts["level"], 2);
        assert!(cx.metadata.is_empty());

        cx.add_metadata("seen", json!(true));
        assert_eq!(cx.metadata.len(), 1);
    }

    #[test]
    fn test_scratch_round_trip() {
        let file = File::for_tests("a.sl");
        let mut cx = PassContext::new(&file, "demo", Value::Null);
        assert!(cx.scratch("marker").is_none());
        cx.set_scratch("marker", json!(7));
        assert_eq!(cx.scratch("marker"), Some(&json!(7)));
    }
}
