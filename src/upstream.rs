//! # Upstream checkout
//!
//! Makes sure a checkout of the consensus node repository exists at the
//! requested ref before any generation runs. All work is delegated to the
//! `git` binary (override with `ENUM_MIRROR_GIT_BIN`).
//!
//! | Step                 | On failure                          |
//! |----------------------|-------------------------------------|
//! | `git clone`          | fatal                               |
//! | `git fetch`          | warning, continue with local state  |
//! | `git checkout <ref>` | fatal                               |
//! | `git pull --rebase`  | warning (only run for branches)     |

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{info, warn};

use crate::config::UpstreamConfig;

/// Environment variable naming the git binary.
pub const GIT_BIN_ENV: &str = "ENUM_MIRROR_GIT_BIN";

/// Version-sort suffixes so that `v1.0.0-rc1` sorts before `v1.0.0`.
const PRERELEASE_SUFFIXES: [&str; 3] = ["-alpha", "-beta", "-rc"];

/// Fatal failure while preparing the upstream checkout
#[derive(Debug)]
pub enum UpstreamError {
    /// The git binary could not be started
    Spawn {
        /// Command line that was attempted
        command: String,
        source: io::Error,
    },
    /// `git clone` exited unsuccessfully
    CloneFailed {
        remote: String,
        code: Option<i32>,
    },
    /// `git checkout` exited unsuccessfully
    CheckoutFailed {
        reference: String,
        code: Option<i32>,
    },
    /// A latest tag was requested but the repository has none
    NoTags,
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Spawn { command, source } => {
                write!(f, "failed to run `{command}`: {source}")
            }
            UpstreamError::CloneFailed { remote, code } => {
                write!(f, "failed to clone {remote} (exit code {})", fmt_code(*code))
            }
            UpstreamError::CheckoutFailed { reference, code } => {
                write!(
                    f,
                    "failed to checkout {reference} (exit code {})",
                    fmt_code(*code)
                )
            }
            UpstreamError::NoTags => write!(f, "upstream repository has no tags"),
        }
    }
}

impl std::error::Error for UpstreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpstreamError::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn fmt_code(code: Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// Which ref to check out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefSelection {
    /// The configured default ref
    Default,
    /// A branch or tag named on the command line
    Explicit(String),
    /// The newest tag by version sort
    LatestTag,
}

/// Thin wrapper over the git command line.
#[derive(Debug, Clone)]
pub struct GitClient {
    bin: PathBuf,
}

impl GitClient {
    /// Use `$ENUM_MIRROR_GIT_BIN`, or `git` from `PATH`.
    pub fn from_env() -> Self {
        let bin = std::env::var_os(GIT_BIN_ENV).map_or_else(|| PathBuf::from("git"), PathBuf::from);
        Self { bin }
    }

    pub fn with_binary(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    fn describe(args: &[&str]) -> String {
        format!("git {}", args.join(" "))
    }

    /// Run git in `dir`; `Ok(false)` means it ran and failed.
    pub fn run(&self, dir: &Path, args: &[&str]) -> Result<bool, UpstreamError> {
        Ok(self.status(dir, args)?.0)
    }

    fn status(&self, dir: &Path, args: &[&str]) -> Result<(bool, Option<i32>), UpstreamError> {
        let command = Self::describe(args);
        info!(command = %command, dir = %dir.display(), "Executing command");
        let status = Command::new(&self.bin)
            .args(args)
            .current_dir(dir)
            .status()
            .map_err(|source| UpstreamError::Spawn {
                command: command.clone(),
                source,
            })?;
        if !status.success() {
            warn!(command = %command, code = ?status.code(), "Command failed");
        }
        Ok((status.success(), status.code()))
    }

    fn stdout(&self, dir: &Path, args: &[&str]) -> Result<Option<String>, UpstreamError> {
        let output = Command::new(&self.bin)
            .args(args)
            .current_dir(dir)
            .stderr(Stdio::null())
            .output()
            .map_err(|source| UpstreamError::Spawn {
                command: Self::describe(args),
                source,
            })?;
        if !output.status.success() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }

    /// Whether `reference` names a local branch.
    pub fn is_branch(&self, repo: &Path, reference: &str) -> Result<bool, UpstreamError> {
        let listed = self.stdout(repo, &["branch", "--list", reference])?;
        Ok(listed.is_some_and(|out| !out.trim().is_empty()))
    }

    /// Newest tag by version sort, pre-releases ordered before releases.
    pub fn latest_tag(&self, repo: &Path) -> Result<Option<String>, UpstreamError> {
        let mut args: Vec<String> = Vec::new();
        for suffix in PRERELEASE_SUFFIXES {
            args.push("-c".to_string());
            args.push(format!("versionsort.suffix={suffix}"));
        }
        args.extend(["tag", "-l", "--sort=version:refname"].map(String::from));
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let listed = self.stdout(repo, &args)?;
        Ok(listed.and_then(|out| {
            out.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .next_back()
                .map(str::to_string)
        }))
    }
}

/// Clone, fetch and check out the upstream repository.
///
/// Returns the ref that was checked out.
pub fn ensure_upstream(
    git: &GitClient,
    config: &UpstreamConfig,
    workdir: &Path,
    selection: &RefSelection,
) -> Result<String, UpstreamError> {
    let checkout_dir = workdir.join(&config.checkout_dir);

    if checkout_dir.exists() {
        info!(dir = %checkout_dir.display(), "Detected existing protobufs");
    } else {
        info!(remote = %config.remote, "No protobufs detected, cloning");
        let target = checkout_dir.to_string_lossy().into_owned();
        let (ok, code) = git.status(workdir, &["clone", &config.remote, &target])?;
        if !ok {
            return Err(UpstreamError::CloneFailed {
                remote: config.remote.clone(),
                code,
            });
        }
    }

    if !git.run(&checkout_dir, &["fetch"])? {
        warn!("Failed to fetch updates, continuing with existing state");
    }

    let reference = match selection {
        RefSelection::Default => config.default_ref.clone(),
        RefSelection::Explicit(r) => r.clone(),
        RefSelection::LatestTag => git.latest_tag(&checkout_dir)?.ok_or(UpstreamError::NoTags)?,
    };

    info!(reference = %reference, "Checking out");
    let (ok, code) = git.status(&checkout_dir, &["checkout", &reference])?;
    if !ok {
        return Err(UpstreamError::CheckoutFailed { reference, code });
    }

    if git.is_branch(&checkout_dir, &reference)? && !git.run(&checkout_dir, &["pull", "--rebase"])? {
        warn!(reference = %reference, "Failed to pull latest changes, continuing with current state");
    }

    Ok(reference)
}
