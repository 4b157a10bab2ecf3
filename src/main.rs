//! Pokesay - Main entrypoint.
//!
//! Reads text from stdin, prints it in a speech bubble, and prints a pokemon
//! chosen at random (optionally by category or name) underneath. Also packs
//! art files into an index and inspects an existing index.

use clap::{Parser, Subcommand};
use pokesay_lib::bubble::SpeechBubble;
use pokesay_lib::config::{ConfigLoader, LogConfig, PokesayConfig, Validate, ENV_PREFIX};
use pokesay_lib::error::{
    ErrorContext, ErrorReporter, PokesayError, PokesayResult, TracingErrorReporter,
};
use pokesay_lib::pokedex::{
    ArtCodec, ArtStore, DirectoryArtStore, IndexBuilder, PokemonTrie, RandomSelector, ZstdCodec,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Command line arguments for pokesay.
#[derive(Parser, Debug)]
#[clap(name = "pokesay", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Path to the category index (overrides configuration)
    #[clap(long, value_parser)]
    index: Option<PathBuf>,

    /// Directory holding the compressed art (overrides configuration)
    #[clap(long, value_parser)]
    art_dir: Option<PathBuf>,

    /// The max speech bubble width
    #[clap(long)]
    width: Option<usize>,

    /// Disable text wrapping
    #[clap(long)]
    nowrap: bool,

    /// Replace any tab characters with N spaces
    #[clap(long)]
    tabwidth: Option<usize>,

    /// Do not replace tab characters
    #[clap(long)]
    notabspaces: bool,

    /// Run with the fastest possible configuration (--nowrap --notabspaces, random pokemon)
    #[clap(long)]
    fastest: bool,

    /// Choose a pokemon from categories matching this token
    #[clap(long)]
    category: Option<String>,

    /// Choose a pokemon whose name contains this token
    #[clap(long)]
    name: Option<String>,

    /// List all available categories
    #[clap(long)]
    category_list: bool,

    /// Command to execute
    #[clap(subcommand)]
    command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Pack a directory tree of art files into an index and art store
    Build {
        /// Directory of art files, one sub-directory per category level
        #[clap(short, long, value_parser)]
        source: PathBuf,

        /// Output directory (defaults to the configured art directory)
        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,
    },

    /// Print the category index as JSON
    Dump {
        /// Indent nested levels by N spaces instead of printing compactly
        #[clap(long)]
        indent: Option<usize>,
    },

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr
/// so that stdout only carries the bubble and the art.
fn init_logging(log: &LogConfig) -> PokesayResult<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_file(log.source_location)
        .with_line_number(log.source_location);

    let installed = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed
        .map_err(|e| PokesayError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

/// Applies command line overrides on top of the loaded configuration.
fn apply_overrides(config: &mut PokesayConfig, args: &Args) -> PokesayResult<()> {
    if let Some(width) = args.width {
        config.bubble.width = width;
    }
    if let Some(tab_width) = args.tabwidth {
        config.bubble.tab_width = tab_width;
    }
    if args.nowrap || args.fastest {
        config.bubble.no_wrap = true;
    }
    if args.notabspaces || args.fastest {
        config.bubble.no_tab_spaces = true;
    }
    if let Some(index) = &args.index {
        config.index.path = index.clone();
    }
    if let Some(art_dir) = &args.art_dir {
        config.index.art_dir = art_dir.clone();
    }

    config.validate()?;
    Ok(())
}

fn load_pokedex(config: &PokesayConfig) -> PokesayResult<PokemonTrie> {
    let pokedex = PokemonTrie::read_from_file(&config.index.path, config.index.max_index_bytes)?;
    info!(
        index = ?config.index.path,
        entries = pokedex.trie().len(),
        "loaded pokedex"
    );
    Ok(pokedex)
}

/// Default mode: bubble from stdin, then a chosen pokemon.
fn run_say(args: &Args, config: &PokesayConfig) -> PokesayResult<()> {
    let pokedex = load_pokedex(config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.category_list {
        for label in pokedex.category_labels() {
            writeln!(out, "{label}")?;
        }
        return Ok(());
    }

    let mut selector = RandomSelector;
    let chosen = match (&args.name, &args.category) {
        _ if args.fastest => pokedex.choose_by_category(None, &mut selector)?,
        (Some(name), _) => pokedex.choose_by_name(name, &mut selector)?,
        (None, category) => pokedex.choose_by_category(category.as_deref(), &mut selector)?,
    };

    SpeechBubble::from_config(&config.bubble).render(io::stdin().lock(), &mut out)?;

    let store = DirectoryArtStore::new(&config.index.art_dir, config.index.art_extension.clone());
    let art = ZstdCodec::new(config.index.compression_level)
        .decompress(&store.lookup(chosen.entry.index())?)?;

    writeln!(
        out,
        "{art}choice: {} / categories: {}",
        chosen.entry.value(),
        chosen.categories.join("/")
    )?;
    Ok(())
}

/// Wraps a failure with the component it came from and the file it concerns.
fn failure_context(error: PokesayError, config: &PokesayConfig) -> ErrorContext {
    let (component, details) = match &error {
        PokesayError::Config(_) => ("config", None),
        PokesayError::Index(_) => (
            "index",
            Some(format!("index file {}", config.index.path.display())),
        ),
        PokesayError::Art(_) => (
            "art",
            Some(format!("art directory {}", config.index.art_dir.display())),
        ),
        PokesayError::Build(_) => ("build", None),
        PokesayError::Io(_) | PokesayError::Custom(_) => ("pokesay", None),
    };

    let context = ErrorContext::new(error, component);
    match details {
        Some(details) => context.with_details(details),
        None => context,
    }
}

fn run(mut args: Args, mut config: PokesayConfig) -> Result<(), ErrorContext> {
    apply_overrides(&mut config, &args).map_err(|e| ErrorContext::new(e, "config"))?;
    let command = args.command.take();
    dispatch(&args, command, &config).map_err(|e| failure_context(e, &config))
}

fn dispatch(args: &Args, command: Option<Command>, config: &PokesayConfig) -> PokesayResult<()> {
    match command {
        None => run_say(args, config),
        Some(Command::Build { source, output }) => {
            let output = output.unwrap_or_else(|| config.index.art_dir.clone());
            info!("Building pokedex from {:?} into {:?}", source, output);

            let builder = IndexBuilder::new(
                ZstdCodec::new(config.index.compression_level),
                config.index.art_extension.clone(),
            );
            let summary = builder.build(&source, &output)?;

            println!(
                "Packed {} pokemon in {} categories into {}",
                summary.entries,
                summary.categories,
                summary.index_path.display()
            );
            Ok(())
        }
        Some(Command::Dump { indent }) => {
            let pokedex = load_pokedex(config)?;
            println!("{}", pokedex.trie().to_json(indent)?);
            Ok(())
        }
        Some(Command::GenConfig { output }) => {
            info!("Generating default configuration");
            let default_config = PokesayConfig::default();

            // Create parent directories if they don't exist
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = toml::to_string_pretty(&default_config)
                .map_err(|e| PokesayError::Custom(format!("Failed to serialize config: {e}")))?;
            std::fs::write(&output, toml)?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
    }
}

/// Main entry point for the application.
fn main() -> ExitCode {
    let args = Args::parse();

    let loaded = ConfigLoader::new(args.config.as_deref(), ENV_PREFIX).load();

    // Log with the configured settings when available, defaults otherwise
    let log = loaded
        .as_ref()
        .map(|config| config.log.clone())
        .unwrap_or_default();
    if let Err(e) = init_logging(&log) {
        eprintln!("{e}");
    }

    let result = loaded
        .map_err(|e| ErrorContext::new(PokesayError::from(e), "config"))
        .and_then(|config| run(args, config));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(context) => {
            TracingErrorReporter.report(context);
            ExitCode::FAILURE
        }
    }
}
