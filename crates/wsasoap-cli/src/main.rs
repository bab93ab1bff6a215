mod config;

use std::io::{Read, Write};

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info, instrument};
use wsasoap_addressing::WsaHeaderBuilder;
use wsasoap_xml::Document;

use config::{Args, create_options, init_logging};

#[instrument(name = "main", level = "info", skip_all)]
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Without logging there is nowhere to report to but stderr.
    if let Err(e) = init_logging(args.verbose, args.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run_app(&args) {
        error!("Application failed to run: {:?}", e);
        return Err(e);
    }

    Ok(())
}

fn run_app(args: &Args) -> anyhow::Result<()> {
    let input = read_input(args)?;
    let mut document = wsasoap_xml::parser::parse(&input).context("input is not well-formed XML")?;

    let message_id = inject_headers(&mut document, args)?;
    info!(%message_id, action = %args.action, to = %args.to, "headers added");

    match &args.output {
        Some(path) => {
            document
                .save(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "envelope written");
        }
        None => {
            let xml = document.to_xml_string()?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{xml}").context("failed to write to stdout")?;
        }
    }

    Ok(())
}

fn read_input(args: &Args) -> anyhow::Result<String> {
    match &args.input {
        Some(path) => {
            debug!(path = %path.display(), "reading envelope");
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            debug!("reading envelope from stdin");
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Adds Action, To, MessageID and (unless disabled) ReplyTo, returning the
/// MessageID used.
fn inject_headers(document: &mut Document, args: &Args) -> anyhow::Result<String> {
    let mut wsa = WsaHeaderBuilder::with_options(document, create_options(args))
        .context("input is not a SOAP envelope")?;

    wsa.add_action(&args.action)?;
    wsa.add_to(&args.to)?;
    let message_id = wsa.add_message_id(args.message_id.as_deref())?;
    if !args.no_reply_to {
        wsa.add_reply_to(args.reply_to.as_deref())?;
    }

    Ok(message_id)
}
