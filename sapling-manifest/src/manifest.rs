//! Manifest schema.

use std::{path::Path, str::FromStr};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Root manifest for sapling.toml.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Global transform options.
    #[serde(default)]
    pub options: OptionsConfig,

    /// Build cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Ordered pass groups; each group's visitors share one traversal.
    #[serde(default, rename = "pass-group")]
    pub pass_groups: Vec<PassGroupConfig>,
}

/// `[options]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct OptionsConfig {
    /// Whether to emit code.
    #[serde(default = "default_true")]
    pub code: bool,
    /// Whether to emit the transformed tree as JSON.
    #[serde(default)]
    pub ast: bool,
    /// Whether to build a source map.
    #[serde(default = "default_true")]
    pub source_map: bool,
    /// Module kind programs are parsed under: "module" or "script".
    #[serde(default = "default_source_kind")]
    pub source_kind: String,
    /// Whether handler failures are wrapped with the owning pass's name.
    #[serde(default = "default_true")]
    pub wrap_pass_visitors: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            code: true,
            ast: false,
            source_map: true,
            source_kind: default_source_kind(),
            wrap_pass_visitors: true,
        }
    }
}

/// `[cache]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Whether transformation runs are memoized on disk.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cache directory, relative to the manifest.
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_cache_dir(),
        }
    }
}

/// One `[[pass-group]]` entry.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PassGroupConfig {
    #[serde(default)]
    pub passes: Vec<PassSpec>,
}

/// A configured pass: a name plus free-form options.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PassSpec {
    pub name: String,
    #[serde(default)]
    pub options: Option<toml::Value>,
}

impl PassSpec {
    /// The pass options as JSON, for the pass registry.
    pub fn options_json(&self) -> serde_json::Value {
        self.options
            .as_ref()
            .and_then(|value| serde_json::to_value(value).ok())
            .unwrap_or(serde_json::Value::Null)
    }
}

fn default_true() -> bool {
    true
}

fn default_source_kind() -> String {
    "module".to_string()
}

fn default_cache_dir() -> String {
    ".sapling/cache".to_string()
}

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, "sapling.toml")
    }
}

impl Manifest {
    /// Parse a sapling.toml file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let manifest: Self =
            toml::from_str(content).map_err(|e| Error::parse(e, content, filename))?;
        manifest.validate(content, filename)?;
        Ok(manifest)
    }

    fn validate(&self, src: &str, filename: &str) -> Result<()> {
        match self.options.source_kind.as_str() {
            "module" | "script" => {}
            other => {
                return Err(Error::validation(
                    format!("invalid source-kind `{other}`; expected \"module\" or \"script\""),
                    src,
                    filename,
                ));
            }
        }
        for (index, group) in self.pass_groups.iter().enumerate() {
            for spec in &group.passes {
                if spec.name.is_empty() {
                    return Err(Error::validation(
                        format!("pass-group {index} contains a pass with an empty name"),
                        src,
                        filename,
                    ));
                }
                if !spec
                    .name
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
                {
                    return Err(Error::validation(
                        format!(
                            "invalid pass name `{}` in pass-group {index}; expected lowercase kebab-case",
                            spec.name
                        ),
                        src,
                        filename,
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Manifest {
        content.parse().expect("manifest should parse")
    }

    #[test]
    fn test_empty_manifest_uses_defaults() {
        let manifest = parse("");
        assert!(manifest.options.code);
        assert!(!manifest.options.ast);
        assert_eq!(manifest.options.source_kind, "module");
        assert!(manifest.cache.enabled);
        assert_eq!(manifest.cache.dir, ".sapling/cache");
        assert!(manifest.pass_groups.is_empty());
    }

    #[test]
    fn test_full_manifest() {
        let manifest = parse(
            r#"
            [options]
            source-map = false

            [cache]
            enabled = false
            dir = "target/transform-cache"

            [[pass-group]]
            passes = [
                { name = "rename-identifier", options = { from = "x", to = "y" } },
                { name = "constant-fold" },
            ]

            [[pass-group]]
            passes = [{ name = "strip-debug" }]
            "#,
        );
        assert!(!manifest.options.source_map);
        assert!(!manifest.cache.enabled);
        assert_eq!(manifest.pass_groups.len(), 2);

        let first = &manifest.pass_groups[0].passes[0];
        assert_eq!(first.name, "rename-identifier");
        assert_eq!(first.options_json()["from"], "x");

        let bare = &manifest.pass_groups[0].passes[1];
        assert_eq!(bare.options_json(), serde_json::Value::Null);
    }

    #[test]
    fn test_invalid_source_kind_rejected() {
        let err = Manifest::from_str_with_filename("[options]\nsource-kind = \"amd\"", "s.toml")
            .unwrap_err();
        assert!(err.to_string().contains("invalid source-kind"));
    }

    #[test]
    fn test_invalid_pass_name_rejected() {
        let err = Manifest::from_str_with_filename(
            "[[pass-group]]\npasses = [{ name = \"Rename\" }]",
            "s.toml",
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid pass name"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err =
            Manifest::from_str_with_filename("[options]\nminify = true", "s.toml").unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }
}
