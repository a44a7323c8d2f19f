//! Content-addressed build cache.
//!
//! Whole transformation runs are memoized on disk: the fingerprint is a pure
//! function of (canonical configuration serialization, source text), and an
//! entry stores exactly two artifacts, the generated code and its source map.
//! Runs that produce any other observable state (metadata, a returned tree,
//! a non-default source kind) are skipped rather than partially persisted.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use sapling_ast::SourceKind;
use sapling_codegen::SourceMap;
use xxhash_rust::xxh64::Xxh64;

use crate::transform::TransformOutput;

/// A deterministic cache key over (configuration, source text).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hash the canonical configuration material and the source text.
    ///
    /// The material is length-prefixed before concatenation so that moving
    /// bytes between the two fields can never produce the same digest.
    pub fn compute(config_material: &str, source: &str) -> Self {
        let mut hasher = Xxh64::new(0);
        hasher.update(&(config_material.len() as u64).to_le_bytes());
        hasher.update(config_material.as_bytes());
        hasher.update(source.as_bytes());
        Self(format!("{:016x}", hasher.digest()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted (code, map) pair. Immutable once written: a later run with an
/// identical fingerprint reads back byte-identical code.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub code: String,
    pub map: SourceMap,
}

/// Why a freshly computed result was not persisted.
///
/// Skips are outcomes, never errors; the caller still receives the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The resolved options changed between fingerprinting and storing
    /// (a pass mutated the file's options mid-run).
    ConfigChanged,
    /// Passes contributed metadata, which the cache does not persist.
    MetadataPresent,
    /// The tree is being returned to the caller; cached replay could not
    /// reconstruct it.
    AstReturned,
    /// The program's module kind is not the expected default kind.
    NonDefaultSourceKind,
    /// Code emission or source mapping was disabled, leaving no complete
    /// code/map pair to persist.
    ArtifactsMissing,
}

/// Decide whether a freshly computed result may be persisted.
///
/// `material_at_fingerprint` is the canonical configuration serialization
/// hashed into the fingerprint; `material_now` is recomputed from the
/// post-run, fully resolved options (the canonical choice for the
/// invalidation key). Any divergence means a pass mutated options mid-run.
pub fn store_eligibility(
    result: &TransformOutput,
    material_at_fingerprint: &str,
    material_now: &str,
) -> Result<(), SkipReason> {
    if material_now != material_at_fingerprint {
        return Err(SkipReason::ConfigChanged);
    }
    if !result.metadata.is_empty() {
        return Err(SkipReason::MetadataPresent);
    }
    if result.ast.is_some() {
        return Err(SkipReason::AstReturned);
    }
    if result.source_kind != SourceKind::default() {
        return Err(SkipReason::NonDefaultSourceKind);
    }
    if result.code.is_none() || result.map.is_none() {
        return Err(SkipReason::ArtifactsMissing);
    }
    Ok(())
}

/// Handle to the on-disk store.
///
/// Created explicitly by the orchestrator's owner; its lifecycle is tied to
/// the [`crate::Transformer`], not process startup. The backing directory is
/// shared process-wide: concurrent writers of the same fingerprint race
/// benignly because entries are idempotent.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Open (creating if absent) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let root = dir.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up an entry. Absence or unreadability of either record is a
    /// miss, never an error.
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Option<CacheEntry> {
        let code = fs::read_to_string(self.record_path(fingerprint, "code")).ok()?;
        let map_bytes = fs::read_to_string(self.record_path(fingerprint, "map")).ok()?;
        let map: SourceMap = serde_json::from_str(&map_bytes).ok()?;
        Some(CacheEntry { code, map })
    }

    /// Persist an entry under its fingerprint.
    pub fn store(&self, fingerprint: &Fingerprint, entry: &CacheEntry) -> io::Result<()> {
        let map_bytes = serde_json::to_string(&entry.map)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(self.record_path(fingerprint, "code"), &entry.code)?;
        fs::write(self.record_path(fingerprint, "map"), map_bytes)?;
        Ok(())
    }

    fn record_path(&self, fingerprint: &Fingerprint, kind: &str) -> PathBuf {
        self.root.join(format!("{fingerprint}.{kind}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = Fingerprint::compute("{\"options\":{}}", "let x = 1;");
        let b = Fingerprint::compute("{\"options\":{}}", "let x = 1;");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_sensitivity() {
        let base = Fingerprint::compute("config", "source");
        assert_ne!(base, Fingerprint::compute("config", "sourc e"));
        assert_ne!(base, Fingerprint::compute("confib", "source"));
        // Field boundary cannot be shifted.
        assert_ne!(base, Fingerprint::compute("configs", "ource"));
    }

    #[test]
    fn test_lookup_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::open(dir.path().join("cache")).unwrap();
        let fingerprint = Fingerprint::compute("c", "s");
        assert!(store.lookup(&fingerprint).is_none());
    }

    #[test]
    fn test_store_then_lookup_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::open(dir.path()).unwrap();
        let fingerprint = Fingerprint::compute("c", "s");
        let entry = CacheEntry {
            code: "let y = 1;\n".to_string(),
            map: SourceMap::new("a.sl"),
        };
        store.store(&fingerprint, &entry).unwrap();
        assert_eq!(store.lookup(&fingerprint), Some(entry));
    }

    #[test]
    fn test_corrupt_map_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::open(dir.path()).unwrap();
        let fingerprint = Fingerprint::compute("c", "s");
        std::fs::write(store.record_path(&fingerprint, "code"), "code").unwrap();
        std::fs::write(store.record_path(&fingerprint, "map"), "not json").unwrap();
        assert!(store.lookup(&fingerprint).is_none());
    }
}
