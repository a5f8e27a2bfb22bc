//! `friction-format`: format a chat message from stdin as HTML.

use std::io::{self, Read, Write};

use friction::format_message;

fn main() -> io::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("friction=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;

    let html = format_message(&raw);
    tracing::info!("Formatted {} bytes into {} bytes", raw.len(), html.len());

    let mut stdout = io::stdout().lock();
    stdout.write_all(html.as_bytes())?;
    stdout.write_all(b"\n")?;
    stdout.flush()
}
