//! Visitor descriptors and merging.

use std::sync::Arc;

use eyre::Result;
use indexmap::IndexMap;
use sapling_ast::{Node, NodeKind};

use crate::scope::ScopeInfo;

/// A node handler bound to a caller-supplied context type.
///
/// Handlers receive their context explicitly; there is no implicit receiver.
pub type Handler<C> = Arc<dyn Fn(&mut C, &mut Node, &mut ScopeInfo) -> Result<()> + Send + Sync>;

/// A visitor descriptor: an ordered mapping of node kind to handler.
pub struct Visitor<C> {
    handlers: IndexMap<NodeKind, Handler<C>>,
}

impl<C> Visitor<C> {
    pub fn new() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// Register a handler for a node kind. Last registration wins within a
    /// single descriptor; ordering across descriptors is handled by
    /// [`merge_visitors`].
    pub fn on<F>(mut self, kind: NodeKind, handler: F) -> Self
    where
        F: Fn(&mut C, &mut Node, &mut ScopeInfo) -> Result<()> + Send + Sync + 'static,
    {
        self.handlers.insert(kind, Arc::new(handler));
        self
    }

    /// The handler for a node kind, if any.
    pub fn handler(&self, kind: NodeKind) -> Option<&Handler<C>> {
        self.handlers.get(&kind)
    }

    /// Node kinds this descriptor handles, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = NodeKind> + '_ {
        self.handlers.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<C> Default for Visitor<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for Visitor<C> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

/// N visitor descriptors merged into one traversal request.
///
/// Entry order is descriptor order: when several descriptors handle the same
/// node kind, their handlers fire in the order the descriptors were merged.
pub struct MergedVisitor<C> {
    entries: Vec<MergedEntry<C>>,
    wrap: bool,
}

struct MergedEntry<C> {
    label: String,
    visitor: Visitor<C>,
}

/// Merge labeled visitor descriptors into a single traversal request.
///
/// `wrap` enables wrapping handler errors with the owning descriptor's label,
/// so a failure names the pass it came from.
pub fn merge_visitors<C>(labeled: Vec<(String, Visitor<C>)>, wrap: bool) -> MergedVisitor<C> {
    MergedVisitor {
        entries: labeled
            .into_iter()
            .map(|(label, visitor)| MergedEntry { label, visitor })
            .collect(),
        wrap,
    }
}

impl<C> MergedVisitor<C> {
    /// Number of merged descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke every matching handler for one node, in descriptor order.
    ///
    /// `contexts` is parallel to the merged descriptors: entry `i` runs
    /// against `contexts[i]`.
    pub(crate) fn dispatch(
        &self,
        node: &mut Node,
        contexts: &mut [C],
        scope: &mut ScopeInfo,
    ) -> Result<()> {
        debug_assert_eq!(self.entries.len(), contexts.len());
        let kind = node.kind();
        for (entry, context) in self.entries.iter().zip(contexts.iter_mut()) {
            if let Some(handler) = entry.visitor.handler(kind) {
                let result = handler(context, node, scope);
                if self.wrap {
                    result.map_err(|err| {
                        err.wrap_err(format!("pass `{}` failed on {}", entry.label, kind.as_str()))
                    })?;
                } else {
                    result?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_preserves_descriptor_order() {
        let first: Visitor<Vec<&'static str>> =
            Visitor::new().on(NodeKind::Ident, |log: &mut Vec<&'static str>, _, _| {
                log.push("first");
                Ok(())
            });
        let second: Visitor<Vec<&'static str>> =
            Visitor::new().on(NodeKind::Ident, |log: &mut Vec<&'static str>, _, _| {
                log.push("second");
                Ok(())
            });

        let merged = merge_visitors(
            vec![("a".to_string(), first), ("b".to_string(), second)],
            false,
        );
        let mut contexts = vec![Vec::new(), Vec::new()];
        let mut node = Node::Ident { name: "x".into() };
        let mut scope = ScopeInfo::default();
        merged
            .dispatch(&mut node, &mut contexts, &mut scope)
            .unwrap();
        assert_eq!(contexts[0], vec!["first"]);
        assert_eq!(contexts[1], vec!["second"]);
    }

    #[test]
    fn test_wrap_names_the_failing_pass() {
        let failing: Visitor<()> = Visitor::new().on(NodeKind::Ident, |_: &mut (), _, _| {
            Err(eyre::eyre!("boom"))
        });
        let merged = merge_visitors(vec![("broken-pass".to_string(), failing)], true);
        let mut contexts = vec![()];
        let mut node = Node::Ident { name: "x".into() };
        let mut scope = ScopeInfo::default();
        let err = merged
            .dispatch(&mut node, &mut contexts, &mut scope)
            .unwrap_err();
        assert!(format!("{err:#}").contains("broken-pass"));
    }
}
