//! bigmodel CLI - bind YAML model descriptors to configured sources

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use bigmodel::{bind, BindError, DynamicModel, FixSuggestion, RegistryConfig};

#[derive(Parser)]
#[command(name = "bigmodel")]
#[command(about = "bigmodel - bind model slots to named data sources")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind a model and report how many slots were bound
    Validate {
        /// Path to the registry config (.toml)
        #[arg(short, long)]
        config: PathBuf,

        /// Path to the model descriptor (.yaml)
        #[arg(short, long)]
        model: PathBuf,
    },

    /// Bind a model and print every slot value
    Resolve {
        /// Path to the registry config (.toml)
        #[arg(short, long)]
        config: PathBuf,

        /// Path to the model descriptor (.yaml)
        #[arg(short, long)]
        model: PathBuf,

        /// Disable caching regardless of config
        #[arg(long)]
        no_cache: bool,

        /// Number of times to read every slot
        #[arg(short, long, default_value_t = 1)]
        repeat: usize,
    },
}

fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so resolved values stay clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { config, model } => validate(&config, &model),
        Commands::Resolve {
            config,
            model,
            no_cache,
            repeat,
        } => resolve(&config, &model, no_cache, repeat),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn load(config: &Path, model: &Path, no_cache: bool) -> Result<DynamicModel, BindError> {
    let mut config = RegistryConfig::load(config)?.with_env()?;
    if no_cache {
        config.allow_cache = false;
    }
    let registry = config.into_registry();

    let mut model = DynamicModel::from_path(model)?;
    bind(&mut model, &registry)?;
    Ok(model)
}

fn validate(config: &Path, model_path: &Path) -> Result<(), BindError> {
    let model = load(config, model_path, false)?;

    println!(
        "{} Model is valid: {} ({} slots bound)",
        "✓".green(),
        model_path.display().to_string().cyan(),
        model.len()
    );
    Ok(())
}

fn resolve(config: &Path, model_path: &Path, no_cache: bool, repeat: usize) -> Result<(), BindError> {
    let model = load(config, model_path, no_cache)?;

    let mut first_error = None;
    for round in 0..repeat {
        if repeat > 1 {
            println!("{} round {}", "→".cyan(), round + 1);
        }
        for (name, value) in model.values() {
            match value {
                Ok(value) => println!("{} = {}", name.bold(), value),
                Err(e) => {
                    println!("{} = {}", name.bold(), "<error>".red());
                    first_error.get_or_insert(e);
                }
            }
        }
    }

    first_error.map_or(Ok(()), Err)
}
