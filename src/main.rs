// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::PathBuf;

use omstream::app_config::{self, Config, Voice};
use omstream::app_controller::Controller;

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

/// CLI Wrapper for Voice to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliVoice {
    Male,
    Female,
}

impl From<CliVoice> for Voice {
    fn from(cli_voice: CliVoice) -> Self {
        match cli_voice {
            CliVoice::Male => Voice::Male,
            CliVoice::Female => Voice::Female,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split the source document into chapters and write the structured content file
    Segment,

    /// Match catalog titles to existing audio files and update the audio map
    Map,

    /// Synthesize every catalog episode that has no audio file yet
    Generate,

    /// Print the audio file mapped to a title
    Resolve {
        /// Catalog title
        #[arg(value_name = "TITLE")]
        title: String,
    },

    /// Serve a title, synthesizing it on demand if needed
    Play {
        /// Catalog title
        #[arg(value_name = "TITLE")]
        title: String,

        /// Narration voice (defaults to the configured voice)
        #[arg(short, long, value_enum)]
        voice: Option<CliVoice>,
    },

    /// Generate shell completions for omstream
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// OmStream - narrated mythology episodes
#[derive(Parser, Debug)]
#[command(name = "omstream")]
#[command(version)]
#[command(about = "Chapter segmentation, title matching and narration for mythology episodes")]
#[command(long_about = "OmStream splits a marker-annotated mythology source into chapters, matches
catalog titles to chapters and audio files, and narrates missing episodes.

EXAMPLES:
    omstream segment                             # Write structured_content.json
    omstream map                                 # Refresh audio_map.json from the audio directory
    omstream generate                            # Narrate every missing episode
    omstream resolve \"8a. Kūrma Avatāra\"        # Show the mapped audio file
    omstream play \"Umā\" --voice female          # Serve or synthesize one episode
    omstream completions bash > omstream.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
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

#[tokio::main]
async fn main() -> Result<()> {
    // The logger admits every level; set_max_level does the filtering
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "omstream", &mut std::io::stdout());
        return Ok(());
    }

    // A command line level applies before the config file is read
    let cli_level: Option<app_config::LogLevel> = cli.log_level.clone().map(Into::into);
    if let Some(level) = &cli_level {
        log::set_max_level(level_filter(level));
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = cli_level {
        config.log_level = level;
    }
    log::set_max_level(level_filter(&config.log_level));

    let controller = Controller::with_config(config)?;
    run_command(&controller, cli.command).await
}

async fn run_command(controller: &Controller, command: Commands) -> Result<()> {
    match command {
        Commands::Segment => {
            let chapters = controller.segment()?;
            for block in chapters.iter() {
                info!("{} ({} words)", block.title, block.word_count);
            }
        }
        Commands::Map => {
            let report = controller.build_map(true)?;
            println!(
                "{} matched, {} unmatched",
                report.matched.len(),
                report.unmatched.len()
            );
        }
        Commands::Generate => {
            let report = controller.generate(true).await?;
            println!(
                "{} generated, {} existing, {} without content, {} failed",
                report.generated.len(),
                report.existing.len(),
                report.no_content.len(),
                report.failed.len()
            );
        }
        Commands::Resolve { title } => match controller.resolve(&title)? {
            Some(filename) => println!("{}", filename),
            None => {
                warn!("No audio mapped for '{}'", title);
                std::process::exit(1);
            }
        },
        Commands::Play { title, voice } => {
            let playback = controller.play(&title, voice.map(Voice::from)).await?;
            println!("{}", serde_json::to_string_pretty(&playback)?);
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
