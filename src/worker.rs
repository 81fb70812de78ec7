//! Dedicated analysis thread.
//!
//! One [`AnalysisWorker`] owns one grammar parser and handles requests
//! strictly in arrival order. The request channel is bounded by
//! `worker.pending_capacity`, so with the default of 1 there is one request
//! in flight and at most one waiting. Workers share no state; run several to
//! analyze documents in parallel.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::thread::{self, JoinHandle};

use crate::config::{AnalysisConfig, Settings};
use crate::error::{AnalysisError, AnalysisResult, WorkerError};
use crate::parsing::{CancelToken, GrammarParser, JavaScriptGrammar};
use crate::protocol::{Request, ResponseMessage, ScopeRequest};
use crate::response::{AnalysisOutcome, Analyzer};

const THREAD_NAME: &str = "scope-analysis";

pub struct AnalysisWorker {
    requests: Option<Sender<ScopeRequest>>,
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
}

impl AnalysisWorker {
    /// Start a worker backed by the JavaScript grammar.
    pub fn spawn(
        settings: &Settings,
        responses: Sender<ResponseMessage>,
    ) -> Result<Self, WorkerError> {
        Self::spawn_with(settings, responses, JavaScriptGrammar::new)
    }

    /// Start a worker whose grammar is built by `factory` on the worker thread.
    ///
    /// Returns once the grammar is ready, or with [`WorkerError::Init`] if
    /// `factory` failed.
    pub fn spawn_with<G, F>(
        settings: &Settings,
        responses: Sender<ResponseMessage>,
        factory: F,
    ) -> Result<Self, WorkerError>
    where
        G: GrammarParser + 'static,
        F: FnOnce() -> AnalysisResult<G> + Send + 'static,
    {
        let (request_tx, request_rx) = bounded(settings.worker.pending_capacity);
        let (ready_tx, ready_rx) = bounded::<AnalysisResult<()>>(1);
        let cancel = CancelToken::new();
        let analysis = settings.analysis.clone();
        let worker_cancel = cancel.clone();

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .stack_size(settings.worker.stack_size_mb.max(1) * 1024 * 1024)
            .spawn(move || {
                let grammar = match factory() {
                    Ok(grammar) => grammar,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                run(grammar, &analysis, request_rx, responses, worker_cancel);
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                requests: Some(request_tx),
                cancel,
                handle: Some(handle),
            }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(WorkerError::Init(e))
            }
            Err(_) => Err(WorkerError::ChannelClosed),
        }
    }

    /// Queue a request. Blocks while the pending slots are full.
    pub fn submit(&self, request: ScopeRequest) -> Result<(), WorkerError> {
        self.requests
            .as_ref()
            .ok_or(WorkerError::ChannelClosed)?
            .send(request)
            .map_err(|_| WorkerError::ChannelClosed)
    }

    /// Decode a raw inbound message and queue it.
    ///
    /// Returns `Ok(false)` for messages that are not scope analysis requests;
    /// those are logged and dropped without a response.
    pub fn dispatch(&self, raw: &str) -> Result<bool, WorkerError> {
        match Request::from_json(raw) {
            Ok(Request::ScopeAnalysis(request)) => {
                self.submit(request)?;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("[worker] ignoring message: {e}");
                Ok(false)
            }
        }
    }

    /// Stop the analysis in flight at its next repair attempt.
    ///
    /// A cancelled request produces no response.
    pub fn cancel_current(&self) {
        self.cancel.cancel();
    }

    /// Finish queued requests and stop the thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.requests.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!("[worker] analysis thread panicked");
        }
    }
}

impl Drop for AnalysisWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<G: GrammarParser>(
    grammar: G,
    config: &AnalysisConfig,
    requests: Receiver<ScopeRequest>,
    responses: Sender<ResponseMessage>,
    cancel: CancelToken,
) {
    let mut analyzer = Analyzer::new(grammar, config);
    tracing::debug!("[worker] ready");

    for request in requests.iter() {
        cancel.reset();
        let response = analyzer.analyze_with_cancel(
            &request.dir,
            &request.file,
            &request.text,
            request.force,
            &cancel,
        );

        if matches!(response.outcome, AnalysisOutcome::Failure(AnalysisError::Cancelled)) {
            tracing::debug!("[worker] {}{} cancelled", request.dir, request.file);
            continue;
        }

        if responses.send(ResponseMessage::from(response)).is_err() {
            tracing::warn!("[worker] response receiver dropped, stopping");
            break;
        }
    }

    tracing::debug!("[worker] stopped");
}
