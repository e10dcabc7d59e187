use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::config::{load_or_default, GeneratorConfig};
use crate::generator::{
    generate_contract_params, generate_enums, scan_enum, write_output, Member, ScanEnd,
};
use crate::protos::{clear_dir, copy_modified_protos};
use crate::upstream::{ensure_upstream, GitClient, RefSelection};

/// Command-line interface for the enum mirror
///
/// Keeps the SDK's Java enums and `.proto` copies in step with the upstream
/// schema.
#[derive(Parser)]
#[command(name = "enum-mirror-gen")]
#[command(about = "Mirror protobuf enums into the Java SDK", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check out the upstream schema and regenerate the Java enums and protos
    Generate {
        /// Branch or tag to check out (default: `upstream.default_ref`)
        #[arg(conflicts_with = "latest_tag")]
        reference: Option<String>,

        /// Path to the configuration file
        /// If not provided, `enum-mirror.toml` in the working directory is used when present
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory that relative paths are resolved against
        #[arg(short, long, default_value = ".")]
        workdir: PathBuf,

        /// Use the existing checkout as-is, without running git
        #[arg(long, default_value_t = false)]
        skip_fetch: bool,

        /// Check out the newest upstream tag
        #[arg(long, default_value_t = false)]
        latest_tag: bool,

        /// Do not clear and re-copy the `.proto` files
        #[arg(long, default_value_t = false)]
        skip_protos: bool,
    },
    /// Print the members of one enum in a `.proto` file
    Scan {
        /// The `.proto` file to read
        #[arg(short, long)]
        proto: PathBuf,

        /// Name of the enum
        #[arg(short = 'e', long = "enum")]
        enum_name: String,

        /// Configuration file supplying name overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print members as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Generate the fixed-width integer methods of `ContractFunctionParameters`
    ContractParams {
        /// Output file
        #[arg(short, long, default_value = "output.txt")]
        output: PathBuf,
    },
}

/// Run a parsed command line.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            reference,
            config,
            workdir,
            skip_fetch,
            latest_tag,
            skip_protos,
        } => {
            let config = load_or_default(config.as_deref(), &workdir)?;
            let selection = match (reference, latest_tag) {
                (_, true) => RefSelection::LatestTag,
                (Some(r), false) => RefSelection::Explicit(r),
                (None, false) => RefSelection::Default,
            };
            run_generate(&config, &workdir, (!skip_fetch).then_some(selection), skip_protos)
        }
        Commands::Scan {
            proto,
            enum_name,
            config,
            json,
        } => {
            let config = load_or_default(config.as_deref(), Path::new("."))?;
            let members = scan_file(&proto, &enum_name, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&members)?);
            } else {
                print!("{}", format_members(&members));
            }
            Ok(())
        }
        Commands::ContractParams { output } => {
            let text = generate_contract_params()?;
            write_output(&output, &text)?;
            println!("Wrote {}", output.display());
            Ok(())
        }
    }
}

/// Fetch (unless `selection` is `None`), generate the enums, then mirror the protos.
fn run_generate(
    config: &GeneratorConfig,
    workdir: &Path,
    selection: Option<RefSelection>,
    skip_protos: bool,
) -> anyhow::Result<()> {
    match selection {
        Some(selection) => {
            let git = GitClient::from_env();
            let reference = ensure_upstream(&git, &config.upstream, workdir, &selection)
                .context("Failed to prepare upstream checkout")?;
            info!(reference = %reference, "Upstream ready");
        }
        None => info!("Skipping upstream fetch"),
    }

    let reports = generate_enums(config, workdir)?;
    for report in &reports {
        if !report.found {
            warn!(java_enum = %report.name, "No members generated");
        }
        println!(
            "{}: {} members -> {}",
            report.name,
            report.members,
            report.output.display()
        );
    }

    if !skip_protos {
        let paths = config.paths(workdir);
        clear_dir(&paths.proto_out, &config.output.preserve)?;
        let replacements = config.proto_replacements();
        let copied = copy_modified_protos(&paths.proto_in, &paths.proto_out, &replacements)?;
        println!("protos: {copied} files -> {}", paths.proto_out.display());
    }
    Ok(())
}

/// Scan one enum from a file on disk.
pub fn scan_file(
    path: &Path,
    enum_name: &str,
    config: &GeneratorConfig,
) -> anyhow::Result<Vec<Member>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let normalizer = config.normalizer();
    let (members, end) = scan_enum(&text, enum_name, &normalizer)
        .with_context(|| format!("enum {enum_name} not found in {}", path.display()))?;
    if let Some(ScanEnd::UnterminatedComment { offset }) = end {
        warn!(offset, "Unterminated block comment, later members were not scanned");
    }
    Ok(members)
}

/// One line per member, doc lines indented below it.
pub fn format_members(members: &[Member]) -> String {
    let mut out = String::new();
    for member in members {
        out.push_str(&format!("{} -> {}\n", member.original_name, member.canonical_name));
        for line in &member.doc_lines {
            out.push_str(&format!("    // {line}\n"));
        }
    }
    out
}
