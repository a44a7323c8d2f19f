//! Code and source-map generation for the Sapling source transformer.
//!
//! Consumes a finished [`sapling_ast::Node`] tree (read-only) and emits
//! source text plus an optional statement-granularity source map. Output is
//! deterministic: the same tree and options always produce identical bytes.

mod printer;
mod source_map;

pub use printer::{GenOptions, Generated, generate};
pub use source_map::{Mapping, SourceMap};
