//! JavaScript grammar implementation

pub mod parser;

pub use parser::JavaScriptGrammar;
