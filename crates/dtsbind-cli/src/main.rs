use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dtsbind::{handle_batch, handle_symbols, handle_translate, load_config};

#[derive(Parser)]
#[command(name = "dtsbind")]
#[command(about = "Generate Reason/BuckleScript bindings from parsed TypeScript declarations", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate one translation unit (JSON) into a Reason file
    Translate {
        /// Input translation unit
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Codegen configuration (TOML)
        #[arg(short, long, env = "DTSBIND_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Translate every unit in a directory
    Batch {
        /// Directory of translation units
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Directory for generated Reason files
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Codegen configuration (TOML)
        #[arg(short, long, env = "DTSBIND_CONFIG")]
        config: Option<PathBuf>,

        /// Skip failing units instead of stopping at the first one
        #[arg(short, long)]
        keep_going: bool,
    },

    /// Print the symbol table of a translation unit
    Symbols {
        /// Input translation unit
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the flags when set
    let level = if cli.debug {
        tracing::Level::TRACE
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Translate {
            input,
            output,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let compiled = handle_translate(&input, output.as_deref(), config)?;
            if output.is_none() {
                print!("{}", compiled.source);
            }
            Ok(())
        }
        Commands::Batch {
            input_dir,
            output_dir,
            config,
            keep_going,
        } => {
            let config = load_config(config.as_deref())?;
            let report = handle_batch(&input_dir, &output_dir, config, keep_going)?;
            if report.errors.has_errors() {
                bail!("{}", report.errors.format_summary());
            }
            info!("Generated {} file(s) in {:?}", report.written.len(), output_dir);
            Ok(())
        }
        Commands::Symbols { input } => {
            println!("{}", handle_symbols(&input)?);
            Ok(())
        }
    }
}
