mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Generate immutable PHP value objects from .datatypes definitions.
#[derive(Parser)]
#[command(
    name = "dtgen",
    version,
    about = "Generate immutable PHP value objects from .datatypes definitions"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log progress to stderr (overridden by RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse .datatypes input and write one PHP class per definition
    Generate {
        /// A .datatypes file, or a directory searched recursively
        input: PathBuf,
        /// Convention namespace the derivings are resolved in
        namespace: String,
        /// TOML file declaring additional convention namespaces
        #[arg(long)]
        conventions: Option<PathBuf>,
        /// composer.json whose psr-4/psr-0 maps decide output paths
        #[arg(long, default_value = "composer.json", conflicts_with = "out_dir")]
        composer: PathBuf,
        /// Write classes under this directory instead of composer paths
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Resolve and report output paths without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse a single .datatypes file and print its definitions as JSON
    Parse {
        /// Path to the .datatypes source file
        file: PathBuf,
    },

    /// List convention namespaces and their derivings
    Conventions {
        /// TOML file declaring additional convention namespaces
        #[arg(long)]
        conventions: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            input,
            namespace,
            conventions,
            composer,
            out_dir,
            dry_run,
        } => {
            commands::generate::cmd_generate(
                commands::generate::GenerateOptions {
                    input: &input,
                    namespace: &namespace,
                    conventions: conventions.as_deref(),
                    composer: &composer,
                    out_dir: out_dir.as_deref(),
                    dry_run,
                },
                cli.output,
                cli.quiet,
            );
        }
        Commands::Parse { file } => {
            commands::parse::cmd_parse(&file, cli.output, cli.quiet);
        }
        Commands::Conventions { conventions } => {
            commands::conventions::cmd_conventions(conventions.as_deref(), cli.output, cli.quiet);
        }
    }
}

/// Logs go to stderr; stdout carries command output only.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
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
