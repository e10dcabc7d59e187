use clap::Parser;
use enum_mirror::cli::{run_cli, Cli};
use enum_mirror::logging::{init_logging_with_config, LogConfig};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = init_logging_with_config(&LogConfig::from_env()) {
        eprintln!("warning: {err:#}");
    }
    if let Err(err) = run_cli(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
