//! Identifier renaming.

use sapling_ast::{Node, NodeKind};
use sapling_traverse::{ScopeInfo, Visitor};
use serde_json::{Value, json};

use crate::{context::PassContext, pass::Pass};

/// Renames one identifier everywhere: references, declarations, parameters,
/// and import bindings. Updates the file's scope as it goes.
pub struct RenameIdentifierPass {
    from: String,
    to: String,
}

impl RenameIdentifierPass {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Pass for RenameIdentifierPass {
    fn key(&self) -> &str {
        "rename-identifier"
    }

    fn options(&self) -> Value {
        json!({ "from": self.from, "to": self.to })
    }

    fn visitor(&self) -> Visitor<PassContext> {
        let rename = {
            let from = self.from.clone();
            let to = self.to.clone();
            move |_cx: &mut PassContext, node: &mut Node, scope: &mut ScopeInfo| {
                rename_in_node(node, &from, &to, scope);
                Ok(())
            }
        };
        Visitor::new()
            .on(NodeKind::Ident, rename.clone())
            .on(NodeKind::VarDecl, rename.clone())
            .on(NodeKind::FnDecl, rename.clone())
            .on(NodeKind::ImportDecl, rename)
    }
}

fn rename_in_node(node: &mut Node, from: &str, to: &str, scope: &mut ScopeInfo) {
    match node {
        Node::Ident { name } if name == from => *name = to.to_string(),
        Node::VarDecl { name, .. } if name == from => {
            *name = to.to_string();
            scope.rename(from, to);
        }
        Node::FnDecl { name, params, .. } => {
            if name == from {
                *name = to.to_string();
                scope.rename(from, to);
            }
            for param in params.iter_mut().filter(|p| *p == from) {
                *param = to.to_string();
                scope.rename(from, to);
            }
        }
        Node::ImportDecl { names, .. } => {
            for name in names.iter_mut().filter(|n| *n == from) {
                *name = to.to_string();
                scope.rename(from, to);
            }
        }
        _ => {}
    }
}
