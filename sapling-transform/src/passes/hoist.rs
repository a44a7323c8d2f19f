//! The implicit block-hoisting pass.

use sapling_ast::{Node, NodeKind};
use sapling_traverse::Visitor;

use crate::{context::PassContext, pass::Pass};

/// Moves hoistable declarations (imports, function declarations) to the top
/// of their enclosing body, preserving relative order within each class.
///
/// Appended automatically to every pass group by
/// [`crate::PassGroup::execution_plan`]; it never needs to be configured
/// explicitly.
pub struct BlockHoistPass;

impl Pass for BlockHoistPass {
    fn key(&self) -> &str {
        "block-hoisting"
    }

    fn visitor(&self) -> Visitor<PassContext> {
        fn hoist(
            _cx: &mut PassContext,
            node: &mut Node,
            _scope: &mut sapling_traverse::ScopeInfo,
        ) -> eyre::Result<()> {
            if let Node::Program { body, .. } | Node::FnDecl { body, .. } = node {
                hoist_body(body);
            }
            Ok(())
        }
        Visitor::new()
            .on(NodeKind::Program, hoist)
            .on(NodeKind::FnDecl, hoist)
    }
}

/// Stable partition: hoistable statements first, everything else after.
fn hoist_body(body: &mut Vec<Node>) {
    let (hoisted, rest): (Vec<Node>, Vec<Node>) =
        std::mem::take(body).into_iter().partition(Node::is_hoistable);
    body.extend(hoisted);
    body.extend(rest);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapling_ast::SourceKind;

    #[test]
    fn test_hoist_is_stable() {
        let mut program = sapling_parser::parse(
            "let a = 1;\nimport { x } from \"m\";\nlet b = 2;\nfunction f() { return 0; }",
            "test.sl",
            SourceKind::Module,
        )
        .unwrap();
        if let Node::Program { body, .. } = &mut program {
            hoist_body(body);
            let kinds: Vec<NodeKind> = body.iter().map(Node::kind).collect();
            assert_eq!(
                kinds,
                vec![
                    NodeKind::ImportDecl,
                    NodeKind::FnDecl,
                    NodeKind::VarDecl,
                    NodeKind::VarDecl,
                ]
            );
        } else {
            panic!("expected program");
        }
    }
}
