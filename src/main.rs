// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use glossator::app_config::{self, Config, TranslationProvider};
use glossator::app_controller::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Ollama,
    OpenAI,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a plain-text document with glossary references
    Translate(TranslateArgs),

    /// Maintain the term glossary
    #[command(subcommand)]
    Glossary(GlossaryCommand),

    /// Check that the configured provider answers
    TestConnection,

    /// Generate shell completions for glossator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input document
    #[arg(value_name = "INPUT")]
    input_path: PathBuf,

    /// Source language (e.g. 'english')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language (e.g. 'chinese')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Output directory, defaults to the input's directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip term extraction before translating
    #[arg(long)]
    no_extract: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

#[derive(Subcommand, Debug)]
enum GlossaryCommand {
    /// Import a JSON array of {source_text, target_text} as user terms
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Export every entry of the language pair to JSON
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List entries resembling a term
    Similar {
        term: String,

        /// Similarity threshold in [0, 1]
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Extract terms from a document into the glossary without translating
    Extract {
        #[arg(value_name = "INPUT")]
        input_path: PathBuf,
    },

    /// Show entry counts and total usage
    Stats,
}

/// Glossator - glossary-driven document translation with LLMs
#[derive(Parser, Debug)]
#[command(name = "glossator")]
#[command(version)]
#[command(about = "Glossary-driven document translation with LLMs")]
#[command(long_about = "Glossator extracts domain terms into a glossary and uses them as references when translating documents with an LLM.

EXAMPLES:
    glossator translate report.txt                  # Translate using default config
    glossator translate -s english -t german doc.txt
    glossator translate --no-extract -f report.txt  # Reuse the glossary as is, overwrite outputs
    glossator glossary import terms.json            # Add user terms
    glossator glossary similar \"data platform\"
    glossator completions bash > glossator.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Translation provider to use
    #[arg(short, long, global = true, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// API key for the OpenAI-compatible provider
    #[arg(long, global = true, env = "GLOSSATOR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => " ",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace is the ceiling; the effective level is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "glossator", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Translate(args) => {
            if let Some(source_language) = args.source_language {
                config.source_language = source_language;
            }
            if let Some(target_language) = args.target_language {
                config.target_language = target_language;
            }
            if args.no_extract {
                config.translation.extract_terms = false;
            }

            if !args.input_path.is_file() {
                return Err(anyhow!("Input file does not exist: {:?}", args.input_path));
            }
            let output_dir = match args.output_dir {
                Some(dir) => dir,
                None => args.input_path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            };

            let controller = Controller::with_config(config)?;
            if let Some(report) = controller.run(&args.input_path, &output_dir, args.force_overwrite).await? {
                info!(
                    "Done: {} units, {} fallbacks, {}",
                    report.units,
                    report.fallbacks,
                    Controller::format_duration(report.elapsed)
                );
            }
        }
        Commands::Glossary(command) => run_glossary(command, config).await?,
        Commands::TestConnection => {
            Controller::with_config(config)?.test_connection().await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

// @loads: Config file plus global CLI overrides, and applies the log level
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)
        .with_context(|| format!("Failed to load config from {:?}", cli.config_path))?;

    if let Some(provider) = &cli.provider {
        config.provider.provider_type = provider.clone().into();
    }
    if let Some(model) = &cli.model {
        config.provider.model = model.clone();
    }
    if let Some(api_key) = &cli.api_key {
        config.provider.api_key = api_key.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    log::set_max_level(config.log_level.to_level_filter());
    Ok(config)
}

async fn run_glossary(command: GlossaryCommand, config: Config) -> Result<()> {
    let controller = Controller::with_config(config)?;

    match command {
        GlossaryCommand::Import { file } => {
            let summary = controller.import_glossary(&file).await?;
            println!(
                "Imported {} of {} entries ({} already present)",
                summary.inserted, summary.read, summary.skipped
            );
        }
        GlossaryCommand::Export { file } => {
            let count = controller.export_glossary(&file).await?;
            println!("Exported {} entries to {}", count, file.display());
        }
        GlossaryCommand::Similar { term, threshold } => {
            let similar = controller.similar_terms(&term, threshold).await?;
            if similar.is_empty() {
                warn!("No entries resemble '{}'", term);
            }
            for entry in similar {
                println!(
                    "{:.3}  {} -> {} ({})",
                    entry.score, entry.source_text, entry.target_text, entry.provenance
                );
            }
        }
        GlossaryCommand::Extract { input_path } => {
            let report = controller.extract_glossary(&input_path).await?;
            println!(
                "Extracted {} terms: {} new, {} already present",
                report.extracted, report.inserted, report.skipped
            );
        }
        GlossaryCommand::Stats => {
            println!("{}", controller.glossary_stats().await?);
        }
    }

    Ok(())
}
