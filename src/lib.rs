pub mod cli;
pub mod config;
pub mod decorate;
pub mod error;
pub mod globals;
pub mod logging;
pub mod parsing;
pub mod protocol;
pub mod response;
pub mod scope;
pub mod sift;
pub mod types;
pub mod vocabulary;
pub mod worker;

pub use config::Settings;
pub use error::{AnalysisError, AnalysisResult, FatalSyntaxError, ProtocolError, WorkerError};
pub use globals::extract_globals;
pub use parsing::{CancelToken, GrammarParser, JavaScriptGrammar, ResilientParser};
pub use protocol::{Request, ResponseMessage, SCOPE_MSG_KIND, ScopeRequest};
pub use response::{AnalysisIndex, AnalysisOutcome, AnalysisResponse, Analyzer, assemble};
pub use scope::{KeyAttribute, ScopeTree, Walk};
pub use sift::{sift_associations, sift_positions};
pub use types::{AssociationTable, Range, Token, TokenAnnotation, TokenValue};
pub use worker::AnalysisWorker;
