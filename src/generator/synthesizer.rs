//! Output synthesis
//!
//! A generated Java file is the premade (hand-written) fragments of its
//! target interleaved with the dynamic slots of its [`TargetEnumSpec`]:
//!
//! ```text
//! Name-0.txt  declarations  Name-2.txt  forward  Name-4.txt  [reverse  Name-6.txt]
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info, warn};

use super::assembler::{SlotKind, TargetEnumSpec};

/// One piece of a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Premade fragment `<name>-<n>.txt`
    Static(usize),
    /// A slot filled by the assembler
    Dynamic(SlotKind),
}

/// The section order for a target.
pub fn layout(reverse_mapping: bool) -> Vec<Section> {
    let mut sections = vec![
        Section::Static(0),
        Section::Dynamic(SlotKind::Declarations),
        Section::Static(2),
        Section::Dynamic(SlotKind::ForwardMapping),
        Section::Static(4),
    ];
    if reverse_mapping {
        sections.push(Section::Dynamic(SlotKind::ReverseMapping));
        sections.push(Section::Static(6));
    }
    sections
}

/// Loads premade fragments from a directory, reading each file at most once.
#[derive(Debug)]
pub struct PremadeStore {
    dir: PathBuf,
    cache: HashMap<(String, usize), String>,
}

impl PremadeStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of fragment `n` for `name`.
    pub fn fragment_path(&self, name: &str, n: usize) -> PathBuf {
        self.dir.join(format!("{name}-{n}.txt"))
    }

    /// Fragment `n` for `name`; empty (with a warning) if it cannot be read.
    pub fn fragment(&mut self, name: &str, n: usize) -> &str {
        let key = (name.to_string(), n);
        if !self.cache.contains_key(&key) {
            let text = self.read_fragment(name, n);
            self.cache.insert(key.clone(), text);
        }
        self.cache.get(&key).map_or("", String::as_str)
    }

    fn read_fragment(&self, name: &str, n: usize) -> String {
        let path = self.fragment_path(name, n);
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(path = %path.display(), bytes = text.len(), "Loaded premade fragment");
                text
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Premade fragment not found, using empty text");
                String::new()
            }
        }
    }

    /// Number of fragments read so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

/// Concatenate the sections of a target into the final file text.
pub fn synthesize(premade: &mut PremadeStore, name: &str, spec: &TargetEnumSpec) -> String {
    let mut out = String::new();
    for section in layout(spec.has_reverse_mapping()) {
        match section {
            Section::Static(n) => out.push_str(premade.fragment(name, n)),
            Section::Dynamic(kind) => out.push_str(spec.slot_text(kind)),
        }
    }
    out
}

/// Write a generated file in full, creating parent directories.
pub fn write_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory for {}", path.display()))?;
    }
    fs::write(path, contents)
        .with_context(|| format!("Failed to write generated file {}", path.display()))?;
    info!(path = %path.display(), bytes = contents.len(), "Wrote generated file");
    Ok(())
}
