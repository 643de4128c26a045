use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kestrel_config::{Config, OutputFormat};
use kestrel_syntax::ast::printer::{to_source, tree_dump};
use kestrel_syntax::lexer::lex;
use kestrel_syntax::{Diagnostic, parse};

/// Exit status when the input parsed with errors.
const EXIT_SYNTAX_ERRORS: i32 = 1;
/// Exit status when the input or the config could not be read.
const EXIT_FAILURE: i32 = 2;

/// Tree rendering selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Tree,
    Source,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Tree => OutputFormat::Tree,
            Format::Source => OutputFormat::Source,
        }
    }
}

/// Parse Kestrel source files and report diagnostics.
#[derive(Parser)]
#[command(
    name = "kestrel",
    version,
    about = "Parse Kestrel source files and report diagnostics"
)]
struct Cli {
    /// Config file to use instead of ~/.config/kestrel/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log parser activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and print its syntax tree and diagnostics
    Parse {
        /// Path to the .kes source file
        file: PathBuf,
        /// How to print the tree (overrides the config file)
        #[arg(long, value_enum)]
        format: Option<Format>,
    },

    /// Print every token of a file, trivia included
    Tokens {
        /// Path to the .kes source file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            process::exit(EXIT_FAILURE);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Parse { file, format } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(format) = format {
                config.output.format = format.into();
            }
            cmd_parse(&file, &config)
        }
        Commands::Tokens { file } => cmd_tokens(&file),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            let path = Config::expand_path(path);
            log::debug!("using config file {}", path.display());
            Config::load_from_path(&path)?
        }
        None => Config::load()?,
    };
    Ok(config)
}

fn read_source(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}

fn cmd_parse(file: &Path, config: &Config) -> Result<i32> {
    let text = read_source(file)?;
    let result = parse(&text);
    log::debug!(
        "parsed {}: {} classes, {} diagnostics",
        file.display(),
        result.root.classes.len(),
        result.diagnostics.len()
    );

    match config.output.format {
        OutputFormat::Tree => print!("{}", tree_dump(&result.root)),
        OutputFormat::Source => print!("{}", to_source(&result.root)),
    }

    let shown: Vec<&Diagnostic> = result
        .diagnostics
        .iter()
        .filter(|d| d.is_error() || config.diagnostics.warnings)
        .collect();
    let limit = config.output.max_diagnostics;
    for diagnostic in shown.iter().take(limit) {
        eprintln!("{}:{}", file.display(), diagnostic);
    }
    if shown.len() > limit {
        eprintln!("... and {} more diagnostics", shown.len() - limit);
    }

    if result.has_errors() {
        Ok(EXIT_SYNTAX_ERRORS)
    } else {
        Ok(0)
    }
}

fn cmd_tokens(file: &Path) -> Result<i32> {
    let text = read_source(file)?;
    for token in lex(&text) {
        println!("{:?}@{} {:?}", token.kind, token.span, token.text);
    }
    Ok(0)
}
