use std::{
    path::{Path, PathBuf},
    sync::{Arc, atomic::Ordering},
};

use clap::Args;
use eyre::{Context, Result, bail};
use sapling_ast::SourceKind;
use sapling_manifest::Manifest;
use sapling_transform::{CacheStore, Options, Pass, PassGroup, ResolvedConfig, Transformer, passes};

use super::UnwrapOrExit;

#[derive(Args)]
pub struct BuildCommand {
    /// Source file to transform
    pub input: PathBuf,

    /// Path to sapling.toml (defaults to ./sapling.toml)
    #[arg(short, long, default_value = "sapling.toml")]
    pub config: PathBuf,

    /// Write generated code here instead of stdout (source map lands at <OUT>.map)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Run without the build cache even when the manifest enables it
    #[arg(long)]
    pub no_cache: bool,
}

impl BuildCommand {
    pub fn run(&self) -> Result<()> {
        let manifest = Manifest::from_file(&self.config).unwrap_or_exit();
        let config = resolve_config(&manifest, &self.input.display().to_string())?;

        let source = std::fs::read_to_string(&self.input)
            .wrap_err_with(|| format!("failed to read {}", self.input.display()))?;

        let transformer = if manifest.cache.enabled && !self.no_cache {
            let dir = cache_dir(&self.config, &manifest);
            let store = CacheStore::open(&dir)
                .wrap_err_with(|| format!("failed to open cache at {}", dir.display()))?;
            Transformer::with_cache(store)
        } else {
            Transformer::new()
        };

        let output = transformer.transform(&config, &source, None)?;

        if let Some(code) = &output.code {
            match &self.out {
                Some(out) => {
                    std::fs::write(out, code)
                        .wrap_err_with(|| format!("failed to write {}", out.display()))?;
                    if let Some(map) = &output.map {
                        let map_path = sibling_with_suffix(out, ".map");
                        let json = serde_json::to_string(map)?;
                        std::fs::write(&map_path, json)
                            .wrap_err_with(|| format!("failed to write {}", map_path.display()))?;
                    }
                    println!("Wrote {}", out.display());
                }
                None => print!("{code}"),
            }
        }

        if let Some(ast) = &output.ast {
            match &self.out {
                Some(out) => {
                    let ast_path = sibling_with_suffix(out, ".ast.json");
                    std::fs::write(&ast_path, serde_json::to_string_pretty(ast)?)
                        .wrap_err_with(|| format!("failed to write {}", ast_path.display()))?;
                    println!("Wrote {}", ast_path.display());
                }
                None => eprintln!("note: pass --out to also write the transformed tree"),
            }
        }

        for (key, value) in &output.metadata {
            eprintln!("metadata {key}: {value}");
        }
        if transformer.counters.cache_hits.load(Ordering::SeqCst) > 0 {
            eprintln!("cache hit for {}", self.input.display());
        }

        Ok(())
    }
}

/// Cache directory, resolved relative to the manifest's location.
pub(crate) fn cache_dir(config_path: &Path, manifest: &Manifest) -> PathBuf {
    config_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join(&manifest.cache.dir)
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}

/// Bind the manifest's declared options and pass names to a runnable
/// configuration.
pub(crate) fn resolve_config(manifest: &Manifest, filename: &str) -> Result<ResolvedConfig> {
    let source_kind = match manifest.options.source_kind.as_str() {
        "module" => SourceKind::Module,
        "script" => SourceKind::Script,
        other => bail!("unsupported source-kind `{other}`"),
    };

    let options = Options {
        filename: filename.to_string(),
        code: manifest.options.code,
        ast: manifest.options.ast,
        source_map: manifest.options.source_map,
        wrap_pass_visitors: manifest.options.wrap_pass_visitors,
        source_kind,
    };

    let mut groups = Vec::with_capacity(manifest.pass_groups.len());
    for group in &manifest.pass_groups {
        let mut resolved: Vec<Arc<dyn Pass>> = Vec::with_capacity(group.passes.len());
        for spec in &group.passes {
            resolved.push(passes::resolve(&spec.name, &spec.options_json())?);
        }
        groups.push(PassGroup::new(resolved));
    }

    Ok(ResolvedConfig::new(options, groups))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_config_binds_passes() {
        let manifest: Manifest = r#"
            [options]
            source-kind = "script"
            ast = true

            [[pass-group]]
            passes = [
                { name = "rename-identifier", options = { from = "a", to = "b" } },
            ]

            [[pass-group]]
            passes = [{ name = "strip-debug" }]
        "#
        .parse()
        .unwrap();

        let config = resolve_config(&manifest, "input.sl").unwrap();
        assert_eq!(config.options.filename, "input.sl");
        assert_eq!(config.options.source_kind, SourceKind::Script);
        assert!(config.options.ast);
        assert_eq!(config.pass_groups.len(), 2);
        assert_eq!(config.pass_groups[0].passes[0].key(), "rename-identifier");
    }

    #[test]
    fn test_resolve_config_rejects_unknown_pass() {
        let manifest: Manifest = "[[pass-group]]\npasses = [{ name = \"minify\" }]"
            .parse()
            .unwrap();
        let err = resolve_config(&manifest, "input.sl").unwrap_err();
        assert!(err.to_string().contains("unknown pass"));
    }

    #[test]
    fn test_cache_dir_is_relative_to_manifest() {
        let manifest = Manifest::default();
        let dir = cache_dir(Path::new("project/sapling.toml"), &manifest);
        assert_eq!(dir, Path::new("project/.sapling/cache"));

        let bare = cache_dir(Path::new("sapling.toml"), &manifest);
        assert_eq!(bare, Path::new("./.sapling/cache"));
    }
}
