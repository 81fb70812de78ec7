//! Error types for parsing, analysis and the worker transport.

use serde::Serialize;
use thiserror::Error;

/// The grammar parser could not produce a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("line {line_number}: {message}")]
pub struct FatalSyntaxError {
    /// 1-based line of the fault.
    pub line_number: usize,
    /// Byte offset of the fault.
    pub index: usize,
    pub message: String,
}

impl FatalSyntaxError {
    pub fn new(line_number: usize, index: usize, message: impl Into<String>) -> Self {
        Self {
            line_number,
            index,
            message: message.into(),
        }
    }
}

/// Why a single analysis produced no index.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Fatal syntax error with repair disabled: {0}")]
    Fatal(FatalSyntaxError),

    #[error("Repair budget exhausted after {repairs} repairs: {last}")]
    RepairExhausted { repairs: u32, last: FatalSyntaxError },

    #[error("Blanking line {line_number} made no progress after {repairs} repairs")]
    NoProgress { line_number: usize, repairs: u32 },

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Failed to initialize grammar: {0}")]
    GrammarInit(String),
}

impl AnalysisError {
    /// Number of line repairs performed before giving up.
    pub fn repairs(&self) -> u32 {
        match self {
            Self::RepairExhausted { repairs, .. } | Self::NoProgress { repairs, .. } => *repairs,
            _ => 0,
        }
    }
}

/// Inbound message could not be turned into a request.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Message has no kind")]
    MissingKind,

    #[error("Unknown message kind: {0}")]
    UnknownKind(String),
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Worker failed to start: {0}")]
    Init(AnalysisError),

    #[error("Worker channel closed")]
    ChannelClosed,
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
