//! Numeric constant folding.

use sapling_ast::{BinaryOp, Node, NodeKind};
use sapling_traverse::{ScopeInfo, Visitor};

use crate::{context::PassContext, pass::Pass};

/// Folds binary expressions over numeric literals into literals.
///
/// Folding recurses through the operands, so a whole constant subtree
/// collapses the first time its root is visited.
pub struct ConstantFoldPass;

impl Pass for ConstantFoldPass {
    fn key(&self) -> &str {
        "constant-fold"
    }

    fn visitor(&self) -> Visitor<PassContext> {
        fn visit(
            _cx: &mut PassContext,
            node: &mut Node,
            _scope: &mut ScopeInfo,
        ) -> eyre::Result<()> {
            fold(node);
            Ok(())
        }
        Visitor::new().on(NodeKind::Binary, visit)
    }
}

fn fold(node: &mut Node) {
    if let Node::Binary { op, left, right } = node {
        fold(left);
        fold(right);
        if let (Node::Number { value: l }, Node::Number { value: r }) =
            (left.as_ref(), right.as_ref())
        {
            let value = match op {
                BinaryOp::Add => l + r,
                BinaryOp::Sub => l - r,
                BinaryOp::Mul => l * r,
                BinaryOp::Div => l / r,
                // Comparisons produce booleans; leave them to runtime.
                BinaryOp::Eq | BinaryOp::Lt | BinaryOp::Gt => return,
            };
            *node = Node::Number { value };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(op: BinaryOp, left: Node, right: Node) -> Node {
        Node::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[test]
    fn test_folds_nested_constants() {
        let mut node = binary(
            BinaryOp::Mul,
            binary(
                BinaryOp::Add,
                Node::Number { value: 1.0 },
                Node::Number { value: 2.0 },
            ),
            Node::Number { value: 3.0 },
        );
        fold(&mut node);
        assert_eq!(node, Node::Number { value: 9.0 });
    }

    #[test]
    fn test_leaves_identifiers_alone() {
        let mut node = binary(
            BinaryOp::Add,
            Node::Ident { name: "a".into() },
            Node::Number { value: 2.0 },
        );
        fold(&mut node);
        assert!(matches!(node, Node::Binary { .. }));
    }

    #[test]
    fn test_leaves_comparisons_alone() {
        let mut node = binary(
            BinaryOp::Lt,
            Node::Number { value: 1.0 },
            Node::Number { value: 2.0 },
        );
        fold(&mut node);
        assert!(matches!(node, Node::Binary { .. }));
    }
}
