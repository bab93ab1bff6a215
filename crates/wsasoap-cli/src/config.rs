use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry::Registry};
use wsasoap_addressing::WsaOptions;

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Logs panics through tracing so they end up in the log file too.
fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!("A panic occurred: {}", panic_info);
    }));
}

/// Adds WS-Addressing headers to a SOAP envelope
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Envelope to read; stdin when omitted
    pub input: Option<PathBuf>,

    #[arg(short, long, help = "Value of the wsa:Action header")]
    pub action: String,

    #[arg(short, long, help = "Value of the wsa:To header (endpoint URL)")]
    pub to: String,

    #[arg(
        short,
        long,
        help = "Value of the wsa:MessageID header (generated when omitted)"
    )]
    pub message_id: Option<String>,

    #[arg(
        short,
        long,
        conflicts_with = "no_reply_to",
        help = "Address of the wsa:ReplyTo header (anonymous role when omitted)"
    )]
    pub reply_to: Option<String>,

    #[arg(long, help = "Do not add a wsa:ReplyTo header")]
    pub no_reply_to: bool,

    /// Generated message ids start with `urn:uuid:` instead of `uudi:`
    #[arg(long, help = "Use the urn:uuid: prefix for generated message ids")]
    pub standard_uuid_prefix: bool,

    #[arg(short, long, help = "File to write the envelope to (default: stdout)")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Write logs to this file instead of stderr")]
    pub log_file: Option<PathBuf>,

    /// Verbose logging (can be repeated for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase logging verbosity")]
    pub verbose: u8,
}

/// Installs the global subscriber. Logs go to `log_file` when given, to
/// stderr otherwise, so stdout only ever carries the envelope.
pub fn init_logging(verbose_level: u8, log_file: Option<&Path>) -> anyhow::Result<()> {
    setup_panic_hook();

    let (nb_writer, guard) = match log_file {
        Some(path) => tracing_appender::non_blocking(std::fs::File::create(path)?),
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    if LOG_GUARD.set(guard).is_err() {
        tracing::warn!("LOG_GUARD was already set. This may indicate a problem in initialization.");
    }

    let env_filter = EnvFilter::new(filter_directive(verbose_level));

    let subscriber = Registry::default().with(env_filter).with(
        fmt::layer()
            .with_writer(nb_writer)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .compact(),
    );

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!("Logging system initialized.");

    Ok(())
}

fn filter_directive(verbose_level: u8) -> &'static str {
    match verbose_level {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub fn create_options(args: &Args) -> WsaOptions {
    if args.standard_uuid_prefix {
        WsaOptions::standard_message_ids()
    } else {
        WsaOptions::default()
    }
}
