//! Target generation
//!
//! Runs the scan / assemble / synthesize steps for every configured target.
//! Targets are independent: a missing source file or enum only empties that
//! target's dynamic slots, and the file is still written with its premade
//! content.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::assembler::TargetEnumSpec;
use super::comments::TextReplacements;
use super::naming::IdentifierNormalizer;
use super::scanner::{scan_enum, ScanEnd};
use super::synthesizer::{synthesize, write_output, PremadeStore};
use crate::config::{GeneratorConfig, ResolvedPaths, TargetConfig};

/// Outcome of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    pub name: String,
    pub output: PathBuf,
    /// Whether the source enum was found
    pub found: bool,
    pub members: usize,
}

/// Reads `.proto` sources once per run.
#[derive(Debug, Default)]
pub struct SourceCache {
    files: HashMap<PathBuf, Option<String>>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of `path`, or `None` (logged) if it cannot be read.
    pub fn get(&mut self, path: &Path) -> Option<&str> {
        self.files
            .entry(path.to_path_buf())
            .or_insert_with(|| match fs::read_to_string(path) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Source file could not be read");
                    None
                }
            })
            .as_deref()
    }
}

/// Build the slots of one target from the text of its source file.
///
/// Returns the finalized slots and whether the enum was found.
pub fn assemble_target(
    source: Option<&str>,
    target: &TargetConfig,
    normalizer: &IdentifierNormalizer,
    replacements: &TextReplacements,
) -> anyhow::Result<(TargetEnumSpec, bool)> {
    let mut spec = TargetEnumSpec::new(
        target.qualified_name(),
        target.reverse_mapping,
        replacements.clone(),
    );

    let scanned = source.and_then(|text| scan_enum(text, &target.source_enum, normalizer));
    let found = scanned.is_some();
    match scanned {
        Some((members, end)) => {
            if let Some(ScanEnd::UnterminatedComment { offset }) = end {
                debug!(java_enum = %target.name, offset, "Unterminated block comment, rest of body ignored");
            }
            for member in &members {
                spec.push_member(member)?;
            }
        }
        None if source.is_some() => {
            warn!(java_enum = %target.name, source_enum = %target.source_enum, "Enum not found in source file");
        }
        None => {}
    }

    spec.finalize();
    Ok((spec, found))
}

/// Generate one target and write it to `java_out`.
pub fn generate_target(
    target: &TargetConfig,
    paths: &ResolvedPaths,
    sources: &mut SourceCache,
    normalizer: &IdentifierNormalizer,
    replacements: &TextReplacements,
    premade: &mut PremadeStore,
) -> anyhow::Result<TargetReport> {
    let source_path = paths.proto_in.join(&target.source_file);
    let source = sources.get(&source_path);
    let (spec, found) = assemble_target(source, target, normalizer, replacements)?;

    let output = paths.java_out.join(target.output_file_name());
    let contents = synthesize(premade, &target.name, &spec);
    write_output(&output, &contents)?;

    info!(
        java_enum = %target.name,
        members = spec.member_count(),
        output = %output.display(),
        "Generated enum"
    );
    Ok(TargetReport {
        name: target.name.clone(),
        output,
        found,
        members: spec.member_count(),
    })
}

/// Generate every configured target, in order.
pub fn generate_enums(config: &GeneratorConfig, workdir: &Path) -> anyhow::Result<Vec<TargetReport>> {
    let paths = config.paths(workdir);
    let normalizer = config.normalizer();
    let replacements = config.comment_replacements();
    let mut premade = PremadeStore::new(&paths.premade);
    let mut sources = SourceCache::new();

    info!(
        targets = config.targets.len(),
        proto_dir = %paths.proto_in.display(),
        "Generating enums"
    );
    config
        .targets
        .iter()
        .map(|target| {
            generate_target(
                target,
                &paths,
                &mut sources,
                &normalizer,
                &replacements,
                &mut premade,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::generator::SlotKind;

    const SUBTYPE: &str = "enum SubType {\n    DEFAULT = 0; // the default\n    TOKEN_FUNGIBLE_COMMON = 1;\n}\n";

    #[test]
    fn test_assemble_found() {
        let target = TargetConfig::new("FeeDataType", "basic_types.proto", "SubType", None, true);
        let (spec, found) = assemble_target(
            Some(SUBTYPE),
            &target,
            &IdentifierNormalizer::default(),
            &TextReplacements::default(),
        )
        .unwrap();
        assert!(found);
        assert_eq!(spec.member_count(), 2);
        assert!(spec
            .slot_text(SlotKind::Declarations)
            .ends_with("    TOKEN_FUNGIBLE_COMMON(SubType.TOKEN_FUNGIBLE_COMMON);\n\n"));
        assert!(spec.slot_text(SlotKind::ReverseMapping).contains("case DEFAULT -> \"DEFAULT\";"));
    }

    #[test]
    fn test_assemble_missing_enum_and_file() {
        let target = TargetConfig::new("Status", "response_code.proto", "ResponseCodeEnum", None, false);
        let normalizer = IdentifierNormalizer::default();
        let replacements = TextReplacements::default();

        let (spec, found) = assemble_target(Some(SUBTYPE), &target, &normalizer, &replacements).unwrap();
        assert!(!found);
        assert_eq!(spec.member_count(), 0);
        assert!(spec.slot_text(SlotKind::Declarations).is_empty());

        let (spec, found) = assemble_target(None, &target, &normalizer, &replacements).unwrap();
        assert!(!found);
        assert_eq!(spec.member_count(), 0);
    }

    #[test]
    fn test_source_cache_reads_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("basic_types.proto");
        fs::write(&path, "first").unwrap();

        let mut cache = SourceCache::new();
        assert_eq!(cache.get(&path), Some("first"));
        fs::write(&path, "second").unwrap();
        assert_eq!(cache.get(&path), Some("first"));
        assert_eq!(cache.get(&dir.path().join("absent.proto")), None);
    }
}
