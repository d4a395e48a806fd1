#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use doctran::app_config::{Config, LogLevel};
use doctran::app_controller::{Controller, DEFAULT_MIN_CONFIDENCE, RunOptions};
use doctran::language_utils;
use doctran::project::CategorySet;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate the project (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for doctran
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct TranslateArgs {
    /// Space separated language codes (e.g. "es fr ko"), or "all"
    #[arg(short, long)]
    language_codes: Option<String>,

    /// Root directory of the project
    #[arg(short, long, default_value = ".")]
    root_dir: PathBuf,

    /// Delete existing translations of these languages and translate everything again
    #[arg(short, long)]
    update: bool,

    /// Translate images
    #[arg(long)]
    images: bool,

    /// Translate markdown files
    #[arg(long)]
    markdown: bool,

    /// Translate notebooks
    #[arg(long)]
    notebook: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Retranslate files with a low confidence score
    #[arg(short = 'x', long)]
    fix: bool,

    /// Confidence threshold used by --fix
    #[arg(short = 'c', long, default_value_t = DEFAULT_MIN_CONFIDENCE)]
    min_confidence: f64,

    /// Fast mode for image translation
    #[arg(short, long)]
    fast: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Configuration file path
    #[arg(long, default_value = "doctran.json")]
    config: PathBuf,

    /// API key of the text translation backend
    #[arg(long, env = "DOCTRAN_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

/// doctran - translation orchestration for documentation projects
#[derive(Parser, Debug)]
#[command(name = "doctran")]
#[command(version)]
#[command(about = "Keeps translated copies of a documentation project in sync")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "doctran mirrors a documentation project into per-language translation trees and keeps them in sync with the sources.

EXAMPLES:
    doctran -l \"es fr\"                        # Translate markdown and notebooks
    doctran -l ko --markdown                  # Markdown files only
    doctran -l ko -u                          # Delete and retranslate everything for Korean
    doctran -l ko -x -c 0.8                   # Retranslate files scored below 0.8
    doctran -l all -y -r ./docs               # Every configured language, no prompts
    doctran completions bash > doctran.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in doctran.json by default. If the file does not
    exist, a default one is created. The API key may also be given through the
    DOCTRAN_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Prefix and ANSI color for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "1;31"),
            Level::Warn => ("WARN ", "1;33"),
            Level::Info => ("INFO ", "1;32"),
            Level::Debug => ("DEBUG", "1;36"),
            Level::Trace => ("TRACE", "1;35"),
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
            let (prefix, color) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, prefix, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "doctran", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.translate).await,
    }
}

/// Ask the user to type "yes"
fn confirm(question: &str) -> Result<bool> {
    print!("{} Type 'yes' to continue: ", question);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    if options.debug {
        log::set_max_level(LevelFilter::Debug);
    } else if let Some(level) = &options.log_level {
        log::set_max_level(LogLevel::from(level.clone()).to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config)?;
    if let Some(api_key) = &options.api_key {
        config.llm.api_key = api_key.clone();
    }
    if !options.debug && options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let requested = options
        .language_codes
        .as_deref()
        .ok_or_else(|| anyhow!("--language-codes is required, e.g. -l \"es fr\" or -l all"))?;

    let language_codes = if requested.trim().eq_ignore_ascii_case("all") {
        warn!("Translating all languages at once can take a significant amount of time on large projects.");
        if !options.yes && !confirm("Do you still want to proceed with translating all languages?")? {
            info!("Translation for 'all' languages cancelled.");
            return Ok(());
        }
        config.language_codes.clone()
    } else {
        language_utils::parse_language_list(requested)
    };

    if options.update {
        warn!(
            "The update command will delete all existing translations for '{}' and re-translate everything.",
            language_codes.join(" ")
        );
        if !options.yes && !confirm("Do you want to continue?")? {
            info!("Update cancelled by user.");
            return Ok(());
        }
    }

    let controller = Controller::with_config(config)?;
    let run = RunOptions {
        root_dir: options.root_dir.clone(),
        language_codes,
        categories: CategorySet {
            markdown: options.markdown,
            notebook: options.notebook,
            images: options.images,
        },
        update: options.update,
        fast_mode: options.fast,
        fix: options.fix,
        min_confidence: options.min_confidence,
    };

    let summary = controller.run(run).await?;
    if !summary.is_clean() {
        warn!("Finished with {} error(s); rerun to retry the failed files", summary.errors.len());
    }
    Ok(())
}
