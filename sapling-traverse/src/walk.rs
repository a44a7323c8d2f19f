//! Single-pass tree walk.

use eyre::Result;
use sapling_ast::Node;

use crate::{scope::ScopeInfo, visitor::MergedVisitor};

/// Walk the tree once, pre-order, invoking every matching handler per node.
///
/// The tree is mutated in place. Handlers may rewrite the node they receive
/// (including replacing it with a different kind); children are visited as
/// they exist after the node's own handlers have run. The first handler
/// error aborts the walk.
pub fn traverse<C>(
    root: &mut Node,
    merged: &MergedVisitor<C>,
    contexts: &mut [C],
    scope: &mut ScopeInfo,
) -> Result<()> {
    visit(root, merged, contexts, scope)
}

fn visit<C>(
    node: &mut Node,
    merged: &MergedVisitor<C>,
    contexts: &mut [C],
    scope: &mut ScopeInfo,
) -> Result<()> {
    merged.dispatch(node, contexts, scope)?;

    match node {
        Node::Program { body, .. } | Node::FnDecl { body, .. } => {
            for child in body {
                visit(child, merged, contexts, scope)?;
            }
        }
        Node::VarDecl { init, .. } => {
            if let Some(init) = init {
                visit(init, merged, contexts, scope)?;
            }
        }
        Node::Return { arg, .. } => {
            if let Some(arg) = arg {
                visit(arg, merged, contexts, scope)?;
            }
        }
        Node::ExprStmt { expr, .. } => visit(expr, merged, contexts, scope)?,
        Node::Binary { left, right, .. } => {
            visit(left, merged, contexts, scope)?;
            visit(right, merged, contexts, scope)?;
        }
        Node::Call { callee, args } => {
            visit(callee, merged, contexts, scope)?;
            for arg in args {
                visit(arg, merged, contexts, scope)?;
            }
        }
        Node::Assign { target, value } => {
            visit(target, merged, contexts, scope)?;
            visit(value, merged, contexts, scope)?;
        }
        Node::ImportDecl { .. }
        | Node::Ident { .. }
        | Node::Number { .. }
        | Node::Str { .. }
        | Node::Bool { .. } => {}
    }
    Ok(())
}
