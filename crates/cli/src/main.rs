mod commands;
mod grammar_file;
mod render;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use commands::{cmd_grammar, cmd_parse, cmd_tokens, ParseOptions};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Rule-driven parser for command-style languages.
#[derive(Parser)]
#[command(
    name = "dsltk",
    version,
    about = "Rule-driven parser for command-style languages"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Enable debug logging (per-rule match tracing with RUST_LOG=trace)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token sequence of a source file
    Tokens {
        /// Path to the source file
        file: PathBuf,
    },

    /// Parse a source file against a grammar
    Parse {
        /// Path to the source file
        file: PathBuf,
        /// Grammar file (.toml or .json)
        #[arg(long, short)]
        grammar: PathBuf,
        /// Skip unmatched tokens and report every error instead of stopping at the first
        #[arg(long)]
        recover: bool,
        /// Maximum number of errors collected with --recover
        #[arg(long, default_value_t = dsltk_core::DEFAULT_MAX_ERRORS)]
        max_errors: usize,
    },

    /// Load a grammar file, print its rules and lint warnings
    Grammar {
        /// Grammar file (.toml or .json)
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Tokens { file } => {
            cmd_tokens(&file, cli.output, cli.quiet);
        }
        Commands::Parse {
            file,
            grammar,
            recover,
            max_errors,
        } => {
            cmd_parse(ParseOptions {
                file: &file,
                grammar: &grammar,
                recover,
                max_errors,
                output: cli.output,
                quiet: cli.quiet,
            });
        }
        Commands::Grammar { file } => {
            cmd_grammar(&file, cli.output, cli.quiet);
        }
    }
}

/// Read a source file or exit with an error.
pub(crate) fn read_source(path: &Path, output: OutputFormat, quiet: bool) -> String {
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
