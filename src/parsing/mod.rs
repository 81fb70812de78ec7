pub mod grammar;
pub mod javascript;
pub mod repair;

pub use grammar::{
    Comment, CommentKind, GrammarParser, ParseOptions, ParsedSource, RecoverableError, SyntaxTree,
};
pub use javascript::JavaScriptGrammar;
pub use repair::{CancelToken, MAX_RETRIES, ParseOutcome, ResilientParser, blank_line};
