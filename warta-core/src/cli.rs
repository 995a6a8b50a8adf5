//! Command-line interface.
//!
//! - `classify [TEXT]`: print each classifier's label for the text
//! - `preprocess [TEXT]`: print the normalized and stemmed text
//!
//! TEXT may be `-` for stdin. Without TEXT, stdin is read when it is piped,
//! otherwise a built-in headline is used.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::analyzer::{Preprocessor, Stemmer, TextNormalizer};
use crate::config::AppConfig;
use crate::logging::init_logging;
use crate::predictor::Predictor;
use crate::report::write_report;

/// Headline classified when no text is supplied.
pub const DEFAULT_TEXT: &str = "Merek Mobil Nasional Malaysia Luncurkan Mobil Listrik Pertama";

/// Indonesian news headline classifier
#[derive(Debug, Parser)]
#[command(name = "warta")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the model and vectorizer files
    #[arg(long, global = true)]
    pub artifacts_dir: Option<PathBuf>,

    /// Root word list for the stemmer, one word per line
    #[arg(long, global = true)]
    pub dictionary: Option<PathBuf>,

    /// Log filter, e.g. `info` or `warta_core=debug`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict a label with every classifier
    Classify(TextArgs),

    /// Show the text after normalization and stemming
    Preprocess(TextArgs),
}

#[derive(Debug, Args)]
pub struct TextArgs {
    /// Input text; `-` reads stdin
    pub text: Option<String>,
}

impl Cli {
    /// Loads the layered configuration and applies command-line overrides.
    pub fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref()).context("failed to load configuration")?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.artifacts_dir {
            config.artifacts.dir = dir.clone();
        }
        if let Some(path) = &self.dictionary {
            config.stemmer.dictionary = Some(path.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.load_config()?;
    init_logging(&config.logging).context("failed to initialize logging")?;

    match cli.command {
        Command::Classify(args) => classify(&config, args),
        Command::Preprocess(args) => preprocess(&config, args),
    }
}

fn classify(config: &AppConfig, args: TextArgs) -> anyhow::Result<()> {
    let text = read_text(args.text)?;
    let mut predictor = Predictor::from_config(config).context("failed to load artifacts")?;
    let predictions = predictor.classify(&text)?;

    let stdout = io::stdout();
    write_report(&mut stdout.lock(), &predictions)?;
    Ok(())
}

fn preprocess(config: &AppConfig, args: TextArgs) -> anyhow::Result<()> {
    let text = read_text(args.text)?;
    let stemmer = Stemmer::from_config(&config.stemmer)?;
    let mut pre = Preprocessor::new(TextNormalizer::new(config.normalizer), stemmer);
    println!("{}", pre.preprocess(&text));
    Ok(())
}

fn read_text(arg: Option<String>) -> io::Result<String> {
    match arg {
        Some(text) if text == "-" => read_stdin(),
        Some(text) => Ok(text),
        None if !io::stdin().is_terminal() => read_stdin(),
        None => Ok(DEFAULT_TEXT.to_owned()),
    }
}

fn read_stdin() -> io::Result<String> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text)
}
