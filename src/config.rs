//! Generator configuration
//!
//! Everything the generator needs to know about the upstream repository, the
//! SDK layout and the mirrored enums. The built-in defaults describe the Java
//! SDK; an `enum-mirror.toml` next to the working directory (or passed with
//! `--config`) can override any part of it.
//!
//! ```toml
//! [upstream]
//! default_ref = "v0.65.0"
//!
//! [naming.overrides]
//! UTIL_PRNG = "PRNG"
//!
//! [[targets]]
//! name = "FreezeType"
//! source_file = "freeze_type.proto"
//! source_enum = "FreezeType"
//! qualified_name = "com.hedera.hashgraph.sdk.proto.FreezeType"
//! ```
//!
//! Relative paths are resolved against the working directory.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::generator::{IdentifierNormalizer, OverrideTable, TextReplacements};

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "enum-mirror.toml";

/// Where the upstream schema comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Git remote of the consensus node repository
    pub remote: String,
    /// Local checkout directory
    pub checkout_dir: PathBuf,
    /// Ref checked out when none is given on the command line
    pub default_ref: String,
    /// Directory of the `.proto` files inside the checkout
    pub proto_subdir: PathBuf,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            remote: "https://github.com/hiero-ledger/hiero-consensus-node.git".to_string(),
            checkout_dir: PathBuf::from("hedera-protos-git"),
            default_ref: "v0.64.0".to_string(),
            proto_subdir: ["hapi", "hedera-protobuf-java-api", "src", "main", "proto", "services"]
                .iter()
                .collect(),
        }
    }
}

/// Where generated files go.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Package directory of the generated Java enums
    pub java_dir: PathBuf,
    /// Destination of the modified `.proto` copies
    pub proto_dir: PathBuf,
    /// Directory holding the `<Name>-<n>.txt` premade fragments
    pub premade_dir: PathBuf,
    /// Entries of `proto_dir` kept when it is cleared
    pub preserve: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let main: PathBuf = ["..", "sdk", "src", "main"].iter().collect();
        Self {
            java_dir: main.join("java").join("com").join("hedera").join("hashgraph").join("sdk"),
            proto_dir: main.join("proto"),
            premade_dir: PathBuf::from("premade"),
            preserve: Vec::new(),
        }
    }
}

/// Canonical-name overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NamingConfig {
    pub overrides: BTreeMap<String, String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            overrides: BTreeMap::from([("UTIL_PRNG".to_string(), "PRNG".to_string())]),
        }
    }
}

/// One mirrored enum.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetConfig {
    /// Java enum name; also the premade fragment prefix
    pub name: String,
    /// `.proto` file holding the source enum, relative to the proto directory
    pub source_file: PathBuf,
    /// Name of the enum in the `.proto` file
    pub source_enum: String,
    /// Java expression for the proto enum type (default: `source_enum`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    /// Whether the Java enum gets a `toString()` switch
    #[serde(default)]
    pub reverse_mapping: bool,
    /// Output file name inside `java_dir` (default: `<name>.java`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

impl TargetConfig {
    pub fn new(
        name: &str,
        source_file: &str,
        source_enum: &str,
        qualified_name: Option<&str>,
        reverse_mapping: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            source_file: PathBuf::from(source_file),
            source_enum: source_enum.to_string(),
            qualified_name: qualified_name.map(str::to_string),
            reverse_mapping,
            output_file: None,
        }
    }

    pub fn qualified_name(&self) -> &str {
        self.qualified_name.as_deref().unwrap_or(&self.source_enum)
    }

    pub fn output_file_name(&self) -> String {
        self.output_file
            .clone()
            .unwrap_or_else(|| format!("{}.java", self.name))
    }
}

/// Complete generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub upstream: UpstreamConfig,
    pub output: OutputConfig,
    pub naming: NamingConfig,
    /// Substitutions applied to documentation lines
    pub comment_replacements: Vec<(String, String)>,
    /// Substitutions applied to copied `.proto` files
    pub proto_replacements: Vec<(String, String)>,
    pub targets: Vec<TargetConfig>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let java_package = |from: &str, to: &str| {
            (
                format!("option java_package = \"{from}\";"),
                format!("option java_package = \"{to}\";"),
            )
        };
        Self {
            upstream: UpstreamConfig::default(),
            output: OutputConfig::default(),
            naming: NamingConfig::default(),
            comment_replacements: vec![
                ("&".to_string(), "and".to_string()),
                ("<tt>".to_string(), String::new()),
                ("</tt>".to_string(), String::new()),
            ],
            proto_replacements: vec![
                java_package(
                    "com.hederahashgraph.api.proto.java",
                    "com.hedera.hashgraph.sdk.proto",
                ),
                java_package(
                    "com.hederahashgraph.service.proto.java",
                    "com.hedera.hashgraph.sdk.proto",
                ),
                java_package(
                    "com.hedera.mirror.api.proto",
                    "com.hedera.hashgraph.sdk.proto.mirror",
                ),
            ],
            targets: vec![
                TargetConfig::new(
                    "RequestType",
                    "basic_types.proto",
                    "HederaFunctionality",
                    None,
                    true,
                ),
                TargetConfig::new(
                    "Status",
                    "response_code.proto",
                    "ResponseCodeEnum",
                    None,
                    false,
                ),
                TargetConfig::new("FeeDataType", "basic_types.proto", "SubType", None, true),
                TargetConfig::new(
                    "FreezeType",
                    "freeze_type.proto",
                    "FreezeType",
                    Some("com.hedera.hashgraph.sdk.proto.FreezeType"),
                    false,
                ),
            ],
        }
    }
}

impl GeneratorConfig {
    pub fn normalizer(&self) -> IdentifierNormalizer {
        IdentifierNormalizer::new(OverrideTable::new(
            self.naming
                .overrides
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        ))
    }

    pub fn comment_replacements(&self) -> TextReplacements {
        TextReplacements::new(self.comment_replacements.iter().cloned())
    }

    pub fn proto_replacements(&self) -> TextReplacements {
        TextReplacements::new(self.proto_replacements.iter().cloned())
    }

    /// Reject configurations the generator cannot run.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (i, target) in self.targets.iter().enumerate() {
            if target.name.trim().is_empty() {
                anyhow::bail!("targets[{i}]: name must not be empty");
            }
            if target.source_enum.trim().is_empty() {
                anyhow::bail!("target {}: source_enum must not be empty", target.name);
            }
        }
        Ok(())
    }

    /// Directories of this configuration resolved against `workdir`.
    pub fn paths(&self, workdir: &Path) -> ResolvedPaths {
        let checkout_dir = workdir.join(&self.upstream.checkout_dir);
        ResolvedPaths {
            proto_in: checkout_dir.join(&self.upstream.proto_subdir),
            checkout_dir,
            java_out: workdir.join(&self.output.java_dir),
            proto_out: workdir.join(&self.output.proto_dir),
            premade: workdir.join(&self.output.premade_dir),
        }
    }
}

/// Absolute (or workdir-relative) locations used during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub checkout_dir: PathBuf,
    pub proto_in: PathBuf,
    pub java_out: PathBuf,
    pub proto_out: PathBuf,
    pub premade: PathBuf,
}

/// Load a configuration file.
///
/// Fields missing from the file keep their defaults.
pub fn load_config(config_path: &Path) -> anyhow::Result<GeneratorConfig> {
    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let config: GeneratorConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config: {}", config_path.display()))?;
    Ok(config)
}

/// Resolve the config file path
///
/// Priority:
/// 1. Explicitly provided path (via CLI)
/// 2. `enum-mirror.toml` in the working directory
/// 3. None (built-in defaults)
pub fn resolve_config_path(explicit_path: Option<&Path>, workdir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        warn!(path = %path.display(), "Config file not found, falling back to auto-detection");
    }

    let detected = workdir.join(CONFIG_FILE_NAME);
    detected.exists().then_some(detected)
}

/// Load the resolved config, or the defaults when there is none.
pub fn load_or_default(
    explicit_path: Option<&Path>,
    workdir: &Path,
) -> anyhow::Result<GeneratorConfig> {
    match resolve_config_path(explicit_path, workdir) {
        Some(path) => load_config(&path),
        None => Ok(GeneratorConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::fs;

    #[test]
    fn test_default_targets() {
        let config = GeneratorConfig::default();
        let names: Vec<_> = config.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["RequestType", "Status", "FeeDataType", "FreezeType"]);

        let reverse: Vec<_> = config
            .targets
            .iter()
            .filter(|t| t.reverse_mapping)
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(reverse, ["RequestType", "FeeDataType"]);

        let freeze = &config.targets[3];
        assert_eq!(
            freeze.qualified_name(),
            "com.hedera.hashgraph.sdk.proto.FreezeType"
        );
        assert_eq!(config.targets[1].qualified_name(), "ResponseCodeEnum");
        assert_eq!(config.targets[1].output_file_name(), "Status.java");
    }

    #[test]
    fn test_default_normalizer_has_prng_override() {
        let config = GeneratorConfig::default();
        assert_eq!(config.normalizer().canonicalize("UtilPrng"), "PRNG");
        assert_eq!(config.comment_replacements().apply("a & b"), "a and b");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"
comment_replacements = [["&", "and"]]

[upstream]
default_ref = "v0.70.0"

[naming.overrides]
TOKEN_AIRDROP = "AIRDROP"
"#,
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.upstream.default_ref, "v0.70.0");
        assert_eq!(config.upstream.checkout_dir, PathBuf::from("hedera-protos-git"));
        assert_eq!(config.targets.len(), 4);
        assert_eq!(config.normalizer().canonicalize("TokenAirdrop"), "AIRDROP");
        assert_eq!(config.normalizer().canonicalize("UtilPrng"), "UTIL_PRNG");
        assert_eq!(config.comment_replacements().apply("<tt>x</tt>"), "<tt>x</tt>");
    }

    #[test]
    fn test_toml_targets_replace_defaults() {
        let toml = r#"
[[targets]]
name = "Status"
source_file = "response_code.proto"
source_enum = "ResponseCodeEnum"
reverse_mapping = true
output_file = "StatusCode.java"
"#;
        let config: GeneratorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.targets.len(), 1);
        assert!(config.targets[0].reverse_mapping);
        assert_eq!(config.targets[0].output_file_name(), "StatusCode.java");
    }

    #[test]
    fn test_invalid_target_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(
            &path,
            "[[targets]]\nname = \"X\"\nsource_file = \"x.proto\"\nsource_enum = \"\"\n",
        )
        .unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("source_enum"));
    }

    #[test]
    fn test_resolve_config_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_config_path(None, dir.path()).is_none());

        let detected = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&detected, "").unwrap();
        assert_eq!(resolve_config_path(None, dir.path()), Some(detected.clone()));

        let missing = dir.path().join("nope.toml");
        assert_eq!(
            resolve_config_path(Some(&missing), dir.path()),
            Some(detected)
        );
    }

    #[test]
    fn test_paths_resolve_against_workdir() {
        let config = GeneratorConfig::default();
        let paths = config.paths(Path::new("/work"));
        assert_eq!(paths.checkout_dir, PathBuf::from("/work/hedera-protos-git"));
        assert!(paths.proto_in.ends_with("proto/services"));
        assert!(paths.java_out.ends_with("com/hedera/hashgraph/sdk"));
        assert_eq!(paths.premade, PathBuf::from("/work/premade"));
    }
}
