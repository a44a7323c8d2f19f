//! Visitor merging and tree traversal for the Sapling source transformer.
//!
//! This crate provides the traversal capability consumed by the pipeline
//! executor: N visitor descriptors (one per pass) are merged into a single
//! [`MergedVisitor`] and the tree is walked exactly once, with every matching
//! handler invoked in descriptor order against its own context.

mod scope;
mod visitor;
mod walk;

pub use scope::ScopeInfo;
pub use visitor::{Handler, MergedVisitor, Visitor, merge_visitors};
pub use walk::traverse;
