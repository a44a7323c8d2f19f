//! Debug-call removal.

use sapling_ast::{Node, NodeKind};
use sapling_traverse::{ScopeInfo, Visitor};

use crate::{context::PassContext, pass::Pass};

/// Removes `debug(...)` expression statements from program and function
/// bodies.
pub struct StripDebugPass;

impl Pass for StripDebugPass {
    fn key(&self) -> &str {
        "strip-debug"
    }

    fn visitor(&self) -> Visitor<PassContext> {
        fn strip(
            _cx: &mut PassContext,
            node: &mut Node,
            _scope: &mut ScopeInfo,
        ) -> eyre::Result<()> {
            if let Node::Program { body, .. } | Node::FnDecl { body, .. } = node {
                body.retain(|stmt| !is_debug_call(stmt));
            }
            Ok(())
        }
        Visitor::new()
            .on(NodeKind::Program, strip)
            .on(NodeKind::FnDecl, strip)
    }
}

fn is_debug_call(stmt: &Node) -> bool {
    let Node::ExprStmt { expr, .. } = stmt else {
        return false;
    };
    let Node::Call { callee, .. } = expr.as_ref() else {
        return false;
    };
    matches!(callee.as_ref(), Node::Ident { name } if name == "debug")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapling_ast::SourceKind;

    #[test]
    fn test_detects_debug_statements() {
        let program = sapling_parser::parse(
            "debug(1);\nlet x = 1;\nlog(2);",
            "test.sl",
            SourceKind::Module,
        )
        .unwrap();
        let Node::Program { body, .. } = &program else {
            panic!("expected program");
        };
        assert!(is_debug_call(&body[0]));
        assert!(!is_debug_call(&body[1]));
        assert!(!is_debug_call(&body[2]));
    }
}
