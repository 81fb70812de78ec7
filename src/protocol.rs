//! Wire messages between a host and the analysis worker.
//!
//! Every message is a JSON object carrying a `kind` discriminator. Only
//! [`SCOPE_MSG_KIND`] is understood today.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;
use crate::response::{AnalysisOutcome, AnalysisResponse};
use crate::scope::ScopeTree;
use crate::types::{AssociationTable, Token};

/// Message kind shared by scope analysis requests and responses.
pub const SCOPE_MSG_KIND: &str = "scopeAnalysis";

/// Host request to analyze one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeRequest {
    pub dir: String,
    pub file: String,
    pub text: String,
    /// Allow line repair when the document does not parse.
    #[serde(default)]
    pub force: bool,
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    kind: &'a str,
    #[serde(flatten)]
    body: &'a T,
}

impl ScopeRequest {
    pub fn new(dir: impl Into<String>, file: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file: file.into(),
            text: text.into(),
            force: false,
        }
    }

    pub fn forced(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Encode with its `kind` envelope.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Envelope {
            kind: SCOPE_MSG_KIND,
            body: self,
        })
    }
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ScopeAnalysis(ScopeRequest),
}

impl Request {
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(raw)?;
        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingKind)?;

        match kind {
            SCOPE_MSG_KIND => Ok(Request::ScopeAnalysis(serde_json::from_value(value)?)),
            other => Err(ProtocolError::UnknownKind(other.to_string())),
        }
    }
}

/// Response sent back for every [`ScopeRequest`].
///
/// Collections are empty and `scope` is `None` when `success` is false.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseMessage {
    pub kind: &'static str,
    pub dir: String,
    pub file: String,
    pub length: usize,
    pub scope: Option<ScopeTree>,
    pub globals: Vec<Token>,
    pub identifiers: Vec<Token>,
    pub properties: Vec<Token>,
    pub literals: Vec<Token>,
    pub associations: AssociationTable,
    pub success: bool,
}

impl ResponseMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<AnalysisResponse> for ResponseMessage {
    fn from(response: AnalysisResponse) -> Self {
        let AnalysisResponse {
            dir,
            file,
            length,
            outcome,
        } = response;

        match outcome {
            AnalysisOutcome::Success(index) => Self {
                kind: SCOPE_MSG_KIND,
                dir,
                file,
                length,
                scope: Some(index.scope),
                globals: index.globals,
                identifiers: index.identifiers,
                properties: index.properties,
                literals: index.literals,
                associations: index.associations,
                success: true,
            },
            AnalysisOutcome::Failure(_) => Self {
                kind: SCOPE_MSG_KIND,
                dir,
                file,
                length,
                scope: None,
                globals: Vec::new(),
                identifiers: Vec::new(),
                properties: Vec::new(),
                literals: Vec::new(),
                associations: AssociationTable::new(),
                success: false,
            },
        }
    }
}
