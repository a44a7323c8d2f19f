//! `sapling.toml` parsing and validation.
//!
//! The manifest declares the global transform options, the cache settings,
//! and the ordered pass groups. It is pure data: pass names are validated
//! for shape here, and bound to pass implementations by the CLI.
//!
//! ```toml
//! [options]
//! source-map = true
//!
//! [cache]
//! enabled = true
//! dir = ".sapling/cache"
//!
//! [[pass-group]]
//! passes = [
//!     { name = "rename-identifier", options = { from = "x", to = "y" } },
//!     { name = "constant-fold" },
//! ]
//! ```

mod error;
mod manifest;

pub use error::{Error, Result};
pub use manifest::{CacheConfig, Manifest, OptionsConfig, PassGroupConfig, PassSpec};
