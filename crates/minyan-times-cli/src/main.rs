mod config;
mod files;

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use minyan_times::{
    collect_times, current_or_upcoming, format_listing, notifications_suppressed,
    parse_chat_command, upcoming, ChatCommand, MessageSink, TimeRangeCommand, TimesError,
    HELP_TEXT,
};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::files::{JsonCalendar, JsonLiturgical, StdoutSink};

#[derive(Parser)]
#[command(
    name = "minyan-times",
    version,
    about = "Resolve !times commands and check for Shabbat/Yom Tov"
)]
struct Cli {
    /// Path to a TOML config file (or set MINYAN_TIMES_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Treat this RFC 3339 instant as the current time
    #[arg(long, global = true, value_parser = parse_now)]
    now: Option<DateTime<FixedOffset>>,

    /// IANA time zone, overriding the config file
    #[arg(long, global = true)]
    tz: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a chat message and print the resulting command as JSON
    Parse {
        /// Message text; a leading `!times` is added when missing
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// List the calendar times a command asks for
    Times {
        /// Expression text; a leading `!times` is added when missing
        #[arg(num_args = 0..)]
        text: Vec<String>,
        /// JSON file of calendar events
        #[arg(long)]
        events: PathBuf,
        /// Print the events as JSON instead of the chat reply
        #[arg(long)]
        json: bool,
    },
    /// Print the current or next observance period as JSON
    Yomtov {
        /// JSON file of candle-lighting/havdalah times
        #[arg(long)]
        events: PathBuf,
    },
    /// Send the scheduled upcoming-times digest unless an observance is in progress
    Digest {
        /// JSON file of calendar events
        #[arg(long)]
        events: PathBuf,
        /// JSON file of candle-lighting/havdalah times
        #[arg(long)]
        liturgical: PathBuf,
    },
}

fn parse_now(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

/// Context shown to the user first, with the detailed error as its cause.
fn user_facing(err: TimesError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

/// Accept both `!times week` and a bare `week`.
fn as_chat_message(words: &[String]) -> String {
    let text = words.join(" ");
    if text.trim_start().starts_with('!') {
        text
    } else {
        format!("!times {text}")
    }
}

fn parse_times(words: &[String], now: &DateTime<Tz>) -> anyhow::Result<TimeRangeCommand> {
    match parse_chat_command(&as_chat_message(words), now).map_err(user_facing)? {
        Some(ChatCommand::Times(command)) => Ok(command),
        Some(ChatCommand::Help) => bail!("`!help` does not list times"),
        None => bail!("Not a command: {}", words.join(" ")),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(tz) = cli.tz {
        config.timezone = tz;
    }
    let tz = config.tz()?;
    let now = match cli.now {
        Some(now) => now.with_timezone(&tz),
        None => Utc::now().with_timezone(&tz),
    };
    let grace = config.grace()?;
    tracing::debug!(?config, %now, "starting");

    match cli.command {
        Commands::Parse { text } => {
            match parse_chat_command(&as_chat_message(&text), &now).map_err(user_facing)? {
                Some(ChatCommand::Times(command)) => {
                    println!("{}", serde_json::to_string_pretty(&command)?);
                }
                Some(ChatCommand::Help) => println!("{HELP_TEXT}"),
                None => bail!("Not a command: {}", text.join(" ")),
            }
        }
        Commands::Times { text, events, json } => {
            let command = parse_times(&text, &now)?;
            let source = JsonCalendar::new(events, tz);
            let times = collect_times(&source, &config.calendar_id, &command, &now, grace)
                .map_err(user_facing)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&times)?);
            } else {
                println!("{}", format_listing(&command, &times, now.date_naive()));
            }
        }
        Commands::Yomtov { events } => {
            let source = JsonLiturgical::new(events, tz);
            let pair = current_or_upcoming(&source, &now).map_err(user_facing)?;
            println!("{}", serde_json::to_string_pretty(&pair)?);
        }
        Commands::Digest { events, liturgical } => {
            let observances = JsonLiturgical::new(liturgical, tz);
            if notifications_suppressed(&observances, &now).map_err(user_facing)? {
                tracing::info!(%now, "digest skipped during observance");
                eprintln!("Digest skipped: Shabbat/Yom Tov in progress");
                return Ok(());
            }

            let command = upcoming(&now, false);
            let source = JsonCalendar::new(events, tz);
            let times = collect_times(&source, &config.calendar_id, &command, &now, grace)
                .map_err(user_facing)?;
            StdoutSink
                .enqueue(&config.destination, &format_listing(&command, &times, now.date_naive()))
                .map_err(user_facing)
                .context("Failed to deliver digest")?;
        }
    }

    Ok(())
}
