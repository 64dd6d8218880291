// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{debug, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use vtt_translate::app_config::{self, Config, TrailingPolicy, TranslationProvider};
use vtt_translate::app_controller::Controller;
use vtt_translate::translation::{TranslationService, Translator};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    WorkersAi,
    Ollama,
    Anthropic,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::WorkersAi => TranslationProvider::WorkersAi,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
        }
    }
}

/// CLI Wrapper for TrailingPolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTrailingPolicy {
    Flush,
    Drop,
}

impl From<CliTrailingPolicy> for TrailingPolicy {
    fn from(cli_policy: CliTrailingPolicy) -> Self {
        match cli_policy {
            CliTrailingPolicy::Flush => TrailingPolicy::Flush,
            CliTrailingPolicy::Drop => TrailingPolicy::Drop,
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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Regroup and translate a caption track (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for vtt-translate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Caption track URL or file path (defaults to source_url from the config)
    #[arg(value_name = "SOURCE")]
    source: Option<String>,

    /// Output file; prints to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the provider
    #[arg(long, env = "VTT_TRANSLATE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Cloudflare account id (Workers AI)
    #[arg(long, env = "CLOUDFLARE_ACCOUNT_ID")]
    account_id: Option<String>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Regroup sentences without translating
    #[arg(long)]
    no_translate: bool,

    /// What to do with an unterminated sentence at the end of the track
    #[arg(long, value_enum)]
    trailing: Option<CliTrailingPolicy>,

    /// Cut a sentence once it spans this many cues
    #[arg(long)]
    max_pending_fragments: Option<usize>,
}

/// vtt-translate - sentence-aligned WebVTT caption translation
#[derive(Parser, Debug)]
#[command(name = "vtt-translate")]
#[command(version)]
#[command(about = "Regroup WebVTT captions into sentences and translate them")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "vtt-translate regroups WebVTT caption cues so each one ends on a sentence boundary, then translates every sentence with an AI provider.

EXAMPLES:
    vtt-translate https://example.com/en.vtt               # Translate with the default config
    vtt-translate en.vtt -o es.vtt                          # Write to a file
    vtt-translate -p ollama -t fr en.vtt                    # Use a local Ollama model, into French
    vtt-translate --no-translate en.vtt                     # Only regroup sentences
    vtt-translate completions bash > vtt-translate.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file does not exist,
    a default one is created.

SUPPORTED PROVIDERS:
    workers-ai - Cloudflare Workers AI m2m100 (requires API token and account id)
    ollama     - Local Ollama server
    anthropic  - Anthropic API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
}

// @struct: Colored stderr logger
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and label for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, label) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, label, record.args()
            );
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
            generate(shell, &mut cmd, "vtt-translate", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.translate).await,
    }
}

// Load the config file, or write a default one if it does not exist yet
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        Config::from_file(config_path)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save_to_file(config_path)?;
        Ok(config)
    }
}

fn apply_overrides(config: &mut Config, options: &TranslateArgs) {
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    let provider_config = config.translation.active_provider_config_mut();
    if let Some(model) = &options.model {
        provider_config.model = model.clone();
    }
    if let Some(api_key) = &options.api_key {
        provider_config.api_key = api_key.clone();
    }
    if let Some(account_id) = &options.account_id {
        provider_config.account_id = account_id.clone();
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(trailing) = &options.trailing {
        config.consolidation.trailing = trailing.clone().into();
    }
    if options.max_pending_fragments.is_some() {
        config.consolidation.max_pending_fragments = options.max_pending_fragments;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // Apply the command line log level before the config is read
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = load_config(&options.config_path)?;
    apply_overrides(&mut config, &options);
    log::set_max_level(level_filter(&config.log_level));

    config.validate()
        .context("Configuration validation failed")?;

    let source = options.source.clone()
        .or_else(|| config.source_url.clone())
        .ok_or_else(|| anyhow!("SOURCE is required when the config has no source_url"))?;

    let service = if options.no_translate {
        None
    } else {
        config.validate_translation()
            .context("Configuration validation failed")?;
        let service = TranslationService::new(config.translation.clone())?;
        if let Err(e) = service.test_connection().await {
            warn!("{} connection check failed: {}", config.translation.provider.display_name(), e);
        }
        Some(service)
    };

    let controller = Controller::with_config(config)?;
    let translator = service.as_ref().map(|s| s as &dyn Translator);

    controller.run(&source, options.output.as_deref(), translator, options.force_overwrite).await?;

    if let Some(service) = &service {
        let (hits, misses, hit_rate) = service.cache().stats();
        debug!("Translation cache: {} hits, {} misses ({:.0}% hit rate)", hits, misses, hit_rate * 100.0);
    }

    Ok(())
}
