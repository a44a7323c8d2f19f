//! Pass pipeline, build cache, and transformation orchestrator for Sapling.
//!
//! This crate is the core of the transformer. Given a parsed program and an
//! ordered configuration of passes it:
//!
//! - sequences pass visitors into traversal groups and runs them over the
//!   tree with strict pre → traverse → post ordering ([`pipeline`]),
//! - memoizes whole transformation runs on disk keyed by a content
//!   fingerprint of (configuration, source text) ([`cache`]),
//! - classifies and annotates every failure before it reaches the caller
//!   ([`TransformError`]).
//!
//! The top-level entry point is [`Transformer::transform`]; a callback-based
//! deferred form with identical semantics is [`Transformer::transform_deferred`].

mod cache;
mod context;
mod error;
mod file;
mod options;
mod pass;
pub mod passes;
mod pipeline;
mod transform;

pub use cache::{CacheEntry, CacheStore, Fingerprint, SkipReason, store_eligibility};
pub use context::PassContext;
pub use error::{ErrorCode, TransformError};
pub use file::{File, normalize};
pub use options::{Options, ResolvedConfig};
pub use pass::{HookAction, HookPhase, Pass, PassGroup};
pub use pipeline::{PipelineError, run_pass_groups};
pub use transform::{RunCounters, TransformOutput, Transformer};
