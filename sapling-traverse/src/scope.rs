//! Binding collection.

use indexmap::IndexMap;
use sapling_ast::{DeclKind, Node};

/// Declared bindings of a program, in declaration order.
///
/// Built once during normalization and kept alongside the tree for the whole
/// run. Passes that rename bindings are expected to update it via
/// [`ScopeInfo::rename`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeInfo {
    bindings: IndexMap<String, Binding>,
}

/// What introduced a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Decl(DeclKind),
    Function,
    Import,
    Param,
}

impl ScopeInfo {
    /// Collect the declared bindings of a tree.
    pub fn analyze(root: &Node) -> Self {
        let mut scope = Self::default();
        scope.collect(root);
        scope
    }

    fn collect(&mut self, node: &Node) {
        match node {
            Node::Program { body, .. } => {
                for stmt in body {
                    self.collect(stmt);
                }
            }
            Node::VarDecl { kind, name, .. } => {
                self.bindings.insert(name.clone(), Binding::Decl(*kind));
            }
            Node::FnDecl { name, params, body, .. } => {
                self.bindings.insert(name.clone(), Binding::Function);
                for param in params {
                    self.bindings.insert(param.clone(), Binding::Param);
                }
                for stmt in body {
                    self.collect(stmt);
                }
            }
            Node::ImportDecl { names, .. } => {
                for name in names {
                    self.bindings.insert(name.clone(), Binding::Import);
                }
            }
            _ => {}
        }
    }

    /// Whether a name is bound.
    pub fn has_binding(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Rename a binding, keeping its origin and its declaration-order slot.
    /// No-op if the name is unbound.
    pub fn rename(&mut self, from: &str, to: &str) {
        if self.bindings.contains_key(from) {
            self.bindings = self
                .bindings
                .iter()
                .map(|(name, binding)| {
                    if name == from {
                        (to.to_string(), *binding)
                    } else {
                        (name.clone(), *binding)
                    }
                })
                .collect();
        }
    }

    /// Declared names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
