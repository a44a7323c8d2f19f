//! Pass trait and pass groups.

use std::sync::Arc;

use serde_json::Value;

use crate::{context::PassContext, file::File, passes::BlockHoistPass};

/// Result of a `pre`/`post` hook.
///
/// A hook either completed synchronously or attempted to defer its work.
/// Deferral is a variant, not a runtime shape probe, so the executor's
/// synchronous-hook contract is enforced by the type system: any
/// [`HookAction::Deferred`] fails the pipeline with
/// [`crate::ErrorCode::AsyncHookUnsupported`].
pub enum HookAction {
    /// The hook ran to completion (successfully or not).
    Complete(eyre::Result<()>),
    /// The hook attempted asynchronous execution.
    Deferred,
}

impl HookAction {
    /// A successfully completed hook.
    pub fn done() -> Self {
        HookAction::Complete(Ok(()))
    }
}

/// Which hook phase is executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    Pre,
    Post,
}

impl HookPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookPhase::Pre => "pre",
            HookPhase::Post => "post",
        }
    }
}

impl std::fmt::Display for HookPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transformation pass.
///
/// A pass contributes a visitor descriptor merged into its group's single
/// traversal, plus optional `pre`/`post` hooks that run before and after the
/// traversal. Hooks and handlers receive their [`PassContext`] as an explicit
/// argument; the context is created fresh for every (pass, group) pairing on
/// every run and does not outlive the group.
pub trait Pass: Send + Sync {
    /// Opaque identity key of this pass, also its fingerprint identity.
    fn key(&self) -> &str;

    /// The pass's configured options, serialized into fingerprint material.
    fn options(&self) -> Value {
        Value::Null
    }

    /// The visitor descriptor merged into the group traversal.
    fn visitor(&self) -> sapling_traverse::Visitor<PassContext>;

    /// Runs before the group's traversal, in descriptor order.
    fn pre(&self, _cx: &mut PassContext, _file: &mut File) -> HookAction {
        HookAction::done()
    }

    /// Runs after the group's traversal, in descriptor order.
    fn post(&self, _cx: &mut PassContext, _file: &mut File) -> HookAction {
        HookAction::done()
    }
}

/// An ordered group of passes whose visitors share one traversal.
#[derive(Clone, Debug, Default)]
pub struct PassGroup {
    pub passes: Vec<Arc<dyn Pass>>,
}

impl std::fmt::Debug for dyn Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pass").field("key", &self.key()).finish()
    }
}

impl PassGroup {
    pub fn new(passes: Vec<Arc<dyn Pass>>) -> Self {
        Self { passes }
    }

    /// The passes the executor will actually run for this group: the
    /// configured passes followed by the implicit block-hoisting pass.
    ///
    /// Every group performs a structural hoisting pass without having to
    /// declare it; the extension is an explicit construction step so callers
    /// and tests can inspect the planned list.
    pub fn execution_plan(&self) -> Vec<Arc<dyn Pass>> {
        let mut planned = self.passes.clone();
        planned.push(Arc::new(BlockHoistPass));
        planned
    }
}
