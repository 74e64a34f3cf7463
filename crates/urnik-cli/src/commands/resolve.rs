//! Resolve command: prints the query identifiers behind a timetable page.

use std::io::Write;

use anyhow::{Context, Result};
use urnik_core::{DocumentFetcher, ResolvePath};

/// Runs the resolve command.
pub fn run<W: Write, F: DocumentFetcher>(writer: &mut W, fetcher: &F, path: &str) -> Result<()> {
    let path: ResolvePath = path
        .parse()
        .with_context(|| format!("invalid timetable path {path:?}"))?;
    let key = urnik_core::resolve(fetcher, &path)
        .with_context(|| format!("failed to resolve {path}"))?;

    writeln!(writer, "{}", serde_json::to_string_pretty(&key)?)?;
    Ok(())
}
