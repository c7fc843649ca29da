mod cli_utils;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use commands::{cmd_check, cmd_query, CheckArgs};

#[derive(Parser)]
#[command(name = "blockscan")]
#[command(
    about = "Whole-word denylist detection over text blocks",
    long_about = "blockscan - Whole-word denylist detection over text blocks\n\n\
    Splits input files into blocks on blank lines and flags every block that\n\
    contains a denylist phrase as a whole word (case-insensitive, whitespace\n\
    normalized). Three matchers run over the same blocks so their speed can be\n\
    compared and their answers cross-checked.\n\n\
    Matchers:\n\
      • automaton  Aho-Corasick trie with failure links\n\
      • index      token to phrase inverted index\n\
      • vector     16/32-byte lane comparison with boundary re-check\n\n\
    Examples:\n\
      blockscan check -d denylist.txt docs_a.txt docs_b.txt\n\
      blockscan check -d denylist.txt docs.txt --details --parallel\n\
      blockscan check -d denylist.txt docs.txt --format json\n\
      blockscan query -d denylist.txt 'Supplier: Acme Corp'\n\n\
    Set BLOCKSCAN_LOG=debug for build and timing logs on stderr."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check text files for denylisted phrases and compare the matchers
    Check {
        /// Denylist file, one phrase per line
        #[arg(short, long, value_name = "FILE")]
        denylist: PathBuf,

        /// Text files to check; blocks are separated by blank lines
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Matchers to run (comma-separated): automaton, index, vector, or all
        #[arg(short, long, default_value = "all")]
        matchers: String,

        /// Output format: table (default), json, or csv (one row per flagged block)
        #[arg(long, default_value = "table")]
        format: String,

        /// Run the matchers concurrently
        #[arg(short, long)]
        parallel: bool,

        /// Print every flagged block with the matched phrase highlighted
        #[arg(long)]
        details: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Check a single line of text against a denylist
    Query {
        /// Denylist file, one phrase per line
        #[arg(short, long, value_name = "FILE")]
        denylist: PathBuf,

        /// Text to check
        #[arg(value_name = "TEXT")]
        text: String,

        /// Matcher to use: automaton, index, or vector
        #[arg(short, long, default_value = "automaton")]
        matcher: String,

        /// Quiet mode - no output, only exit code (0 = match, 1 = no match)
        #[arg(short, long)]
        quiet: bool,
    },
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("BLOCKSCAN_LOG").unwrap_or_else(|_| EnvFilter::new("off"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            denylist,
            inputs,
            matchers,
            format,
            parallel,
            details,
            no_color,
        } => cmd_check(CheckArgs {
            denylist,
            inputs,
            matchers,
            format,
            parallel,
            details,
            no_color,
        }),
        Commands::Query {
            denylist,
            text,
            matcher,
            quiet,
        } => cmd_query(denylist, text, matcher, quiet),
    }
}
