//! CLI definitions and entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use super::commands;
use leakscan::config::Config;
use leakscan::output::OutputMode;

/// leakscan - Audit git history for leaked secrets
#[derive(Parser, Debug)]
#[command(
    name = "leakscan",
    version,
    about = "Audit git history for leaked secrets",
    long_about = "Walk every commit of a repository and check the text each commit introduces.\n\n\
                  Each commit is compared with every parent; added lines and the commit\n\
                  message are checked against an ordered rule list, first match wins.\n\n\
                  Exit status: 0 when clean, 1 when findings were reported, 2 on error."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: $LEAKSCAN_CONFIG, then ~/.leakscan/config.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a repository's full history
    Scan(ScanArgs),

    /// List the active rules in evaluation order
    Rules,

    /// Show version
    Version,
}

/// Arguments for `leakscan scan`
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Local repository path or remote URL
    pub repository: String,

    /// Skip `git gc` on the mirror after fetching
    #[arg(long)]
    pub no_gc: bool,

    /// Directory for remote mirrors (overrides config)
    #[arg(long, value_name = "DIR")]
    pub mirror_root: Option<PathBuf>,

    /// Per-file diff budget in milliseconds (overrides config)
    #[arg(long, value_name = "MS")]
    pub diff_timeout_ms: Option<u64>,
}

/// Run the CLI, returning the process exit status
pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Some(Command::Scan(args)) => {
            let config = Config::load(cli.config.as_deref())?;
            commands::scan(&args, &config, output_mode)
        },
        Some(Command::Rules) => {
            let config = Config::load(cli.config.as_deref())?;
            commands::rules(&config, output_mode)?;
            Ok(ExitCode::SUCCESS)
        },
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": leakscan::VERSION
                    })
                );
            } else {
                println!("leakscan v{}", leakscan::VERSION);
            }
            Ok(ExitCode::SUCCESS)
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": leakscan::VERSION,
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("leakscan v{}", leakscan::VERSION);
                println!("\nRun 'leakscan --help' for usage");
                println!("Run 'leakscan scan <repo>' to audit a repository");
            }
            Ok(ExitCode::SUCCESS)
        },
    }
}
