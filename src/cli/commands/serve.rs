//! Serve command - JSON-lines bridge between stdio and an analysis worker.

use anyhow::Context;
use crossbeam_channel::unbounded;
use std::io::{BufRead, Write};
use std::thread;

use crate::config::Settings;
use crate::worker::AnalysisWorker;

/// Each stdin line is one message; each response is written as one stdout
/// line. Returns when stdin closes and every queued request is answered.
pub fn run(config: &Settings) -> anyhow::Result<()> {
    let (response_tx, response_rx) = unbounded();
    let worker = AnalysisWorker::spawn(config, response_tx).context("Failed to start worker")?;

    let writer = thread::spawn(move || -> std::io::Result<()> {
        let stdout = std::io::stdout();
        for message in response_rx.iter() {
            let json = serde_json::to_string(&message)?;
            let mut out = stdout.lock();
            writeln!(out, "{json}")?;
            out.flush()?;
        }
        Ok(())
    });

    tracing::info!("[serve] reading requests from stdin");
    for line in std::io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        worker.dispatch(&line)?;
    }

    worker.shutdown();
    writer
        .join()
        .map_err(|_| anyhow::anyhow!("Response writer panicked"))?
        .context("Failed to write response")?;
    Ok(())
}
