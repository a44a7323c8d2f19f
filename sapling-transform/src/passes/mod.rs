//! Built-in passes and the pass registry.

mod collect;
mod fold;
mod hoist;
mod rename;
mod strip;

use std::sync::Arc;

use eyre::{Result, bail};
use serde_json::Value;

pub use collect::CollectDeclarationsPass;
pub use fold::ConstantFoldPass;
pub use hoist::BlockHoistPass;
pub use rename::RenameIdentifierPass;
pub use strip::StripDebugPass;

use crate::pass::Pass;

/// Names resolvable through [`resolve`], in listing order.
pub const KNOWN_PASSES: &[&str] = &[
    "block-hoisting",
    "collect-declarations",
    "constant-fold",
    "rename-identifier",
    "strip-debug",
];

/// Resolve a configured pass name and options into a pass instance.
pub fn resolve(name: &str, options: &Value) -> Result<Arc<dyn Pass>> {
    match name {
        "block-hoisting" => Ok(Arc::new(BlockHoistPass)),
        "collect-declarations" => Ok(Arc::new(CollectDeclarationsPass)),
        "constant-fold" => Ok(Arc::new(ConstantFoldPass)),
        "strip-debug" => Ok(Arc::new(StripDebugPass)),
        "rename-identifier" => {
            let from = options
                .get("from")
                .and_then(Value::as_str)
                .ok_or_else(|| eyre::eyre!("pass `rename-identifier` requires string option `from`"))?;
            let to = options
                .get("to")
                .and_then(Value::as_str)
                .ok_or_else(|| eyre::eyre!("pass `rename-identifier` requires string option `to`"))?;
            Ok(Arc::new(RenameIdentifierPass::new(from, to)))
        }
        other => bail!(
            "unknown pass `{other}`; known passes: {}",
            KNOWN_PASSES.join(", ")
        ),
    }
}
