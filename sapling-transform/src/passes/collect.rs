//! Declaration metadata collection.

use sapling_traverse::Visitor;
use serde_json::json;

use crate::{
    context::PassContext,
    file::File,
    pass::{HookAction, Pass},
};

/// Records the file's declared binding names into run metadata.
///
/// Because it contributes metadata, any run containing this pass is
/// excluded from the build cache: metadata is not persisted and a cached
/// replay could not reproduce it.
pub struct CollectDeclarationsPass;

impl Pass for CollectDeclarationsPass {
    fn key(&self) -> &str {
        "collect-declarations"
    }

    fn visitor(&self) -> Visitor<PassContext> {
        Visitor::new()
    }

    fn post(&self, cx: &mut PassContext, file: &mut File) -> HookAction {
        let names: Vec<&str> = file.scope.names().collect();
        cx.add_metadata("declarations", json!(names));
        HookAction::done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_hook_stages_declarations() {
        let options = crate::Options::default();
        let mut file = crate::normalize(&options, "let x = 1;\nlet y = 2;", None).unwrap();
        let pass = CollectDeclarationsPass;
        let mut cx = PassContext::new(&file, pass.key(), pass.options());
        assert!(matches!(pass.post(&mut cx, &mut file), HookAction::Complete(Ok(()))));
        assert_eq!(cx.metadata["declarations"], json!(["x", "y"]));
    }
}
