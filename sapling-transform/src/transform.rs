//! Transformation orchestrator.

use std::sync::atomic::{AtomicUsize, Ordering};

use indexmap::IndexMap;
use sapling_ast::{Node, SourceKind};
use sapling_codegen::{GenOptions, SourceMap, generate};
use serde_json::Value;

use crate::{
    cache::{CacheEntry, CacheStore, Fingerprint, store_eligibility},
    error::{ErrorCode, TransformError},
    file::normalize,
    options::{ResolvedConfig, config_material},
    pipeline::{PipelineError, run_pass_groups},
};

/// The result of one transformation.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// Metadata accumulated by passes; empty on a cache hit.
    pub metadata: IndexMap<String, Value>,
    /// The effective options the run finished with.
    pub options: crate::Options,
    /// The mutated tree, present only when `options.ast` was set.
    pub ast: Option<Node>,
    /// Generated code, absent when code emission was disabled.
    pub code: Option<String>,
    /// Source map, absent when code emission or mapping was disabled.
    pub map: Option<SourceMap>,
    /// The program's module kind.
    pub source_kind: SourceKind,
}

/// Counters observable across runs of one [`Transformer`].
///
/// They make cache behavior verifiable from the outside: a cache hit leaves
/// `pipeline_runs` and `codegen_runs` untouched.
#[derive(Debug, Default)]
pub struct RunCounters {
    pub pipeline_runs: AtomicUsize,
    pub codegen_runs: AtomicUsize,
    pub cache_hits: AtomicUsize,
    pub cache_stores: AtomicUsize,
    pub cache_skips: AtomicUsize,
}

impl RunCounters {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

/// Top-level entry point: cache lookup, normalization, pipeline execution,
/// code generation, result assembly, cache write-back.
///
/// One `Transformer` may serve many compilations; the cache store handle is
/// created with the transformer and shared by all of them. Each compilation
/// is fully synchronous and exclusively owns its working state.
#[derive(Debug, Default)]
pub struct Transformer {
    cache: Option<CacheStore>,
    /// Run counters; see [`RunCounters`].
    pub counters: RunCounters,
}

impl Transformer {
    /// A transformer with caching disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transformer backed by an on-disk cache store.
    pub fn with_cache(store: CacheStore) -> Self {
        Self {
            cache: Some(store),
            counters: RunCounters::default(),
        }
    }

    /// Transform `source` under `config`, optionally reusing a pre-parsed
    /// tree instead of parsing.
    pub fn transform(
        &self,
        config: &ResolvedConfig,
        source: &str,
        ast: Option<Node>,
    ) -> Result<TransformOutput, TransformError> {
        let material = config.fingerprint_material();
        let fingerprint = Fingerprint::compute(&material, source);

        if let Some(entry) = self.cache.as_ref().and_then(|c| c.lookup(&fingerprint)) {
            RunCounters::bump(&self.counters.cache_hits);
            return Ok(TransformOutput {
                metadata: IndexMap::new(),
                options: config.options.clone(),
                ast: None,
                code: Some(entry.code),
                map: Some(entry.map),
                source_kind: SourceKind::default(),
            });
        }

        let mut file = normalize(&config.options, source, ast)?;
        let filename = file.opts.display_name().to_string();

        RunCounters::bump(&self.counters.pipeline_runs);
        run_pass_groups(&mut file, &config.pass_groups, &config.options).map_err(|err| {
            match err {
                PipelineError::AsyncHook { .. } => {
                    TransformError::new(&filename, ErrorCode::AsyncHookUnsupported, err)
                }
                PipelineError::Pass(report) => {
                    TransformError::new(&filename, ErrorCode::Transform, format!("{report:#}"))
                }
            }
        })?;

        let (code, map) = if file.opts.code {
            RunCounters::bump(&self.counters.codegen_runs);
            let generated = generate(
                &file.ast,
                &GenOptions {
                    filename: filename.clone(),
                    source_map: file.opts.source_map,
                    ..GenOptions::default()
                },
            )
            .map_err(|report| {
                TransformError::new(&filename, ErrorCode::Generate, format!("{report:#}"))
            })?;
            (Some(generated.code), generated.map)
        } else {
            (None, None)
        };

        let source_kind = file.ast.source_kind().unwrap_or_default();
        let output = TransformOutput {
            metadata: file.metadata.clone(),
            options: file.opts.clone(),
            ast: file.opts.ast.then(|| file.ast.clone()),
            code,
            map,
            source_kind,
        };

        if let Some(cache) = &self.cache {
            let material_now = config_material(&file.opts, &config.pass_groups);
            match store_eligibility(&output, &material, &material_now) {
                Ok(()) => {
                    let entry = CacheEntry {
                        // Eligibility guarantees both artifacts exist.
                        code: output.code.clone().unwrap_or_default(),
                        map: output.map.clone().unwrap_or_else(|| SourceMap::new(&filename)),
                    };
                    match cache.store(&fingerprint, &entry) {
                        Ok(()) => RunCounters::bump(&self.counters.cache_stores),
                        // Storage unavailability is never fatal; the caller
                        // still gets the freshly computed result.
                        Err(_) => RunCounters::bump(&self.counters.cache_skips),
                    }
                }
                Err(_reason) => RunCounters::bump(&self.counters.cache_skips),
            }
        }

        Ok(output)
    }

    /// Deferred call form: identical semantics and identical classified
    /// errors, reported through `done`. No concurrency is introduced; the
    /// computation runs synchronously before this returns.
    pub fn transform_deferred<F>(
        &self,
        config: &ResolvedConfig,
        source: &str,
        ast: Option<Node>,
        done: F,
    ) where
        F: FnOnce(Result<TransformOutput, TransformError>),
    {
        done(self.transform(config, source, ast));
    }
}
