//! # CLI Module
//!
//! Command-line interface of the `enum-mirror-gen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Check out the upstream schema, regenerate the Java enums and refresh the
//! SDK's `.proto` copies:
//!
//! ```bash
//! enum-mirror-gen generate v0.65.0
//! ```
//!
//! Options:
//! - `[REFERENCE]` - Branch or tag to check out (default from config)
//! - `--latest-tag` - Check out the newest tag instead
//! - `--config <FILE>` - Configuration file (default: `./enum-mirror.toml` if present)
//! - `--workdir <DIR>` - Base directory for relative paths (default: `.`)
//! - `--skip-fetch` - Use the existing checkout without running git
//! - `--skip-protos` - Leave the `.proto` output directory untouched
//!
//! ### `scan`
//!
//! Show what the scanner finds in one enum:
//!
//! ```bash
//! enum-mirror-gen scan --proto basic_types.proto --enum HederaFunctionality --json
//! ```
//!
//! ### `contract-params`
//!
//! Write the fixed-width integer methods of `ContractFunctionParameters`:
//!
//! ```bash
//! enum-mirror-gen contract-params --output output.txt
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use enum_mirror::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;


pub use commands::{format_members, run_cli, scan_file, Cli, Commands};
