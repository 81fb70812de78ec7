//! Analyze command - one file, one response.

use anyhow::Context;
use std::path::Path;

use crate::config::Settings;
use crate::protocol::ResponseMessage;
use crate::response::Analyzer;
use crate::vocabulary::split_path;

/// Analyze `path` and print its response message.
///
/// A file that does not parse still prints a response with `success: false`.
pub fn run(path: &Path, force: bool, pretty: bool, config: &Settings) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let full_path = path.to_string_lossy();
    let (dir, file) = split_path(&full_path);

    let mut analyzer = Analyzer::javascript(&config.analysis)?;
    let response = analyzer.analyze(dir, file, &text, force);

    let message = ResponseMessage::from(response);
    let json = if pretty {
        message.to_json_pretty()?
    } else {
        message.to_json()?
    };
    println!("{json}");
    Ok(())
}
