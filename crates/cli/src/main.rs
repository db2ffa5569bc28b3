mod commands;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use graphlang_core::Diagnostic;
use tracing_subscriber::EnvFilter;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// graphlang flow language toolchain.
#[derive(Parser)]
#[command(name = "graphlang", version, about = "graphlang flow language toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report lexical, syntax and semantic errors in a .graph file
    Check {
        /// Path to the .graph source file
        file: PathBuf,
    },

    /// Print the token stream of a .graph file
    Tokens {
        /// Path to the .graph source file
        file: PathBuf,
    },

    /// Flatten a .graph file into tree node records (JSON)
    Unfold {
        /// Path to the .graph source file
        file: PathBuf,
        /// First record id to assign
        #[arg(long, default_value = "0")]
        start_id: u64,
    },

    /// Rebuild a tree from tree node records
    Fold {
        /// Path to a JSON array of tree node records
        records: PathBuf,
        /// Print the tree as .graph source instead of JSON
        #[arg(long)]
        source: bool,
    },

    /// Reformat a .graph file into canonical source
    Print {
        /// Path to the .graph source file
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file } => {
            commands::check::cmd_check(&file, cli.output, cli.quiet);
        }
        Commands::Tokens { file } => {
            commands::tokens::cmd_tokens(&file, cli.output, cli.quiet);
        }
        Commands::Unfold { file, start_id } => {
            commands::unfold::cmd_unfold(&file, start_id, cli.output, cli.quiet);
        }
        Commands::Fold { records, source } => {
            commands::fold::cmd_fold(&records, source, cli.output, cli.quiet);
        }
        Commands::Print { file } => {
            commands::print::cmd_print(&file, cli.output, cli.quiet);
        }
    }
}

/// Read a file or report the I/O error and exit 1.
pub(crate) fn read_file(path: &Path, output: OutputFormat, quiet: bool) -> String {
    match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

/// Print source diagnostics for `file` to stderr.
pub(crate) fn report_diagnostics<'a>(
    file: &Path,
    diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
    output: OutputFormat,
    quiet: bool,
) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => {
            for d in diagnostics {
                eprintln!("{}:{}", file.display(), d);
            }
        }
        OutputFormat::Json => {
            let json: Vec<serde_json::Value> =
                diagnostics.into_iter().map(Diagnostic::to_json_value).collect();
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
    }
}
