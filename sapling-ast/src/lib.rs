//! AST node types for the Sapling source transformer.
//!
//! This crate provides the tree representation shared by the parser, the
//! traversal engine, the transformation passes, and the code generator.
//! The types are plain serde data:
//!
//! ```text
//! source text → sapling-parser → sapling-ast (Node) → passes → codegen
//! ```
//!
//! Every pass in the pipeline mutates the same [`Node`] tree in place; there
//! is no copying between pass groups.

mod node;

pub use node::{BinaryOp, DeclKind, Node, NodeKind, SourceKind};
