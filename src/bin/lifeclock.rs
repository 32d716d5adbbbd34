//! CLI binary for lifeclock.
//!
//! Diagnostics go to stderr and to a daily log file so stdout stays free for
//! the countdown display.

use clap::{Parser, Subcommand};
use lifeclock::countdown::local_now;
use lifeclock::{
    AppSettings, ClockRuntime, ConfigStore, DisplayFrame, DisplaySink, SettingsInput, StorePaths,
    apply_settings, clock_dirs, compute_frame, rotate_now,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// lifeclock: life and event countdowns with a quote of the day.
#[derive(Parser)]
#[command(name = "lifeclock", version, about)]
struct Cli {
    /// Path to the TOML app settings file.
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Show the live countdowns until Ctrl+C.
    Run,

    /// Change countdown settings.
    Set {
        /// Birth date (YYYY-MM-DD).
        #[arg(long)]
        birth_date: Option<String>,
        /// Life expectancy in years.
        #[arg(long, allow_hyphen_values = true)]
        life_expectancy: Option<String>,
        /// Theme countdown label.
        #[arg(long)]
        theme_name: Option<String>,
        /// Theme end date (YYYY-MM-DD).
        #[arg(long)]
        theme_end_date: Option<String>,
    },

    /// Pick a new quote right away.
    NewQuote,

    /// Print the current countdowns once.
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = init_tracing();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => AppSettings::from_file(path)?,
        None => AppSettings::load_or_default(&clock_dirs::settings_file()),
    };

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(&settings).await,
        Command::Set {
            birth_date,
            life_expectancy,
            theme_name,
            theme_end_date,
        } => set(
            &settings,
            SettingsInput {
                birth_date,
                life_expectancy_years: life_expectancy,
                theme_name,
                theme_end_date,
            },
        ),
        Command::NewQuote => new_quote(&settings),
        Command::Show => {
            let store = ConfigStore::open(StorePaths::from_settings(&settings));
            print_frame(&compute_frame(&store.snapshot(), local_now()));
            Ok(())
        }
    }
}

/// Stderr plus a daily rolling file under `logs_dir()`.
///
/// The returned guard flushes the file writer on drop. If the log directory
/// cannot be used, logging continues on stderr alone.
fn init_tracing() -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lifeclock=info"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("lifeclock")
        .filename_suffix("log")
        .build(clock_dirs::logs_dir());

    match appender {
        Ok(appender) => {
            let (file_writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(file_writer),
                )
                .init();
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            tracing::warn!("file logging disabled: {e}");
            None
        }
    }
}

async fn run(settings: &AppSettings) -> anyhow::Result<()> {
    println!("lifeclock v{}", env!("CARGO_PKG_VERSION"));
    println!("Press Ctrl+C to quit.\n");

    let runtime = ClockRuntime::start(settings, TerminalSink::default()).await?;

    // Handle Ctrl+C
    let cancel = runtime.cancel_token();
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("received Ctrl+C, shutting down...");
        }
        _ = cancel.cancelled() => {}
    }

    runtime.shutdown().await;
    println!();
    Ok(())
}

fn set(settings: &AppSettings, input: SettingsInput) -> anyhow::Result<()> {
    if input.is_empty() {
        anyhow::bail!("nothing to change; pass at least one of --birth-date, --life-expectancy, --theme-name, --theme-end-date");
    }

    let store = ConfigStore::open(StorePaths::from_settings(settings));
    let targets = apply_settings(&store, &input)?;

    println!("Settings saved.");
    println!("  Life ends:  {}", targets.life_end);
    println!("  Theme ends: {}", targets.theme_end);
    Ok(())
}

fn new_quote(settings: &AppSettings) -> anyhow::Result<()> {
    let store = ConfigStore::open(StorePaths::from_settings(settings));
    let pool = store.load_quote_pool();
    let quote = rotate_now(&store, &pool, &mut rand::thread_rng())?;
    println!("{quote}");
    Ok(())
}

fn print_frame(frame: &DisplayFrame) {
    println!("⏳ {}", frame.life_countdown_text);
    println!("{}", frame.theme_title_text);
    println!("   {}", frame.theme_countdown_text);
    println!("\n{}", frame.current_quote);
}

/// Redraws the countdown line in place; prints the quote when it changes.
#[derive(Default)]
struct TerminalSink {
    last_quote: Option<String>,
}

impl DisplaySink for TerminalSink {
    fn deliver(&mut self, frame: DisplayFrame) -> bool {
        let mut out = std::io::stdout().lock();
        if self.last_quote.as_deref() != Some(frame.current_quote.as_str()) {
            if writeln!(out, "\r\n{}\n", frame.current_quote).is_err() {
                return false;
            }
            self.last_quote = Some(frame.current_quote);
        }
        write!(
            out,
            "\r⏳ {}   {} {}    ",
            frame.life_countdown_text, frame.theme_title_text, frame.theme_countdown_text
        )
        .and_then(|()| out.flush())
        .is_ok()
    }
}
