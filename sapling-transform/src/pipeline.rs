//! Pass pipeline executor.
//!
//! Runs the configuration's pass groups over a [`File`] strictly in order.
//! Per group: build the execution plan (configured passes plus the implicit
//! block-hoisting pass), construct fresh contexts, run `pre` hooks in
//! descriptor order, walk the tree exactly once with all visitors merged,
//! run `post` hooks, then fold staged metadata into the file. Group *i + 1*
//! never starts before group *i* finishes completely.
//!
//! The executor is fail-fast and classifies nothing except the async-hook
//! violation; the orchestrator annotates everything else.

use std::sync::Arc;

use sapling_traverse::merge_visitors;
use thiserror::Error;

use crate::{
    context::PassContext,
    file::File,
    options::Options,
    pass::{HookAction, HookPhase, Pass, PassGroup},
};

/// A pipeline failure, before orchestrator classification.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A hook returned [`HookAction::Deferred`]. Hard compatibility
    /// violation: hooks must complete synchronously.
    #[error("{phase} hook of pass `{pass}` attempted asynchronous execution")]
    AsyncHook { pass: String, phase: HookPhase },

    /// A hook or visitor handler failed.
    #[error(transparent)]
    Pass(#[from] eyre::Report),
}

/// Mutate the file's tree in place by running every pass group in
/// configuration order.
pub fn run_pass_groups(
    file: &mut File,
    groups: &[PassGroup],
    options: &Options,
) -> Result<(), PipelineError> {
    for group in groups {
        run_group(file, group, options)?;
    }
    Ok(())
}

fn run_group(file: &mut File, group: &PassGroup, options: &Options) -> Result<(), PipelineError> {
    let planned = group.execution_plan();

    // One fresh context per planned pass; none survive the group.
    let mut contexts: Vec<PassContext> = planned
        .iter()
        .map(|pass| PassContext::new(file, pass.key(), pass.options()))
        .collect();

    run_hooks(HookPhase::Pre, &planned, &mut contexts, file)?;

    let labeled = planned
        .iter()
        .map(|pass| (pass.key().to_string(), pass.visitor()))
        .collect();
    let merged = merge_visitors(labeled, options.wrap_pass_visitors);
    {
        let File { ast, scope, .. } = &mut *file;
        sapling_traverse::traverse(ast, &merged, &mut contexts, scope)?;
    }

    run_hooks(HookPhase::Post, &planned, &mut contexts, file)?;

    for context in contexts {
        file.metadata.extend(context.metadata);
    }
    Ok(())
}

fn run_hooks(
    phase: HookPhase,
    planned: &[Arc<dyn Pass>],
    contexts: &mut [PassContext],
    file: &mut File,
) -> Result<(), PipelineError> {
    for (pass, context) in planned.iter().zip(contexts.iter_mut()) {
        let action = match phase {
            HookPhase::Pre => pass.pre(context, file),
            HookPhase::Post => pass.post(context, file),
        };
        match action {
            HookAction::Complete(Ok(())) => {}
            HookAction::Complete(Err(err)) => return Err(PipelineError::Pass(err)),
            HookAction::Deferred => {
                return Err(PipelineError::AsyncHook {
                    pass: pass.key().to_string(),
                    phase,
                });
            }
        }
    }
    Ok(())
}
