//! WELD CLI - page component editor.
//!
//! Provides commands for:
//! - `components`: list the component catalog grouped by target
//! - `insert`: expand a component and insert it into a stored page
//! - `show`: print a page's serialized content
//! - `convert`: one-shot Markdown/HTML conversion

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ComponentsArgs, ConvertArgs, InsertArgs, ShowArgs};
use output::Output;
use weld_config::{CliSettings, Config};

/// WELD - page component editor.
#[derive(Parser)]
#[command(name = "weld", version, about)]
struct Cli {
    /// Filesystem store root (overrides config).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// HTTP backend base URL (overrides config).
    #[arg(long, global = true, env = "WELD_BASE_URL")]
    base_url: Option<String>,

    /// Enable info-level logging.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available components grouped by target.
    Components(ComponentsArgs),
    /// Insert a component into a stored page.
    Insert(InsertArgs),
    /// Print a page's serialized content.
    Show(ShowArgs),
    /// Convert between Markdown and HTML.
    Convert(ConvertArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = run(&cli, &output);
    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run(cli: &Cli, output: &Output) -> Result<(), error::CliError> {
    // `convert` is pure text transformation; it needs no store config.
    if let Commands::Convert(args) = &cli.command {
        return args.execute(output);
    }

    let settings = CliSettings {
        store_root: cli.root.clone(),
        base_url: cli.base_url.clone(),
    };
    let cwd = std::env::current_dir()?;
    let config = Config::load(&cwd, &settings)?;

    match &cli.command {
        Commands::Components(args) => args.execute(&config, output),
        Commands::Insert(args) => args.execute(&config, output),
        Commands::Show(args) => args.execute(&config, output),
        Commands::Convert(_) => unreachable!("handled above"),
    }
}
