//! Grammar parser seam.
//!
//! The repair loop only needs a parser that either yields a syntax tree
//! (plus recoverable diagnostics and captured comments) or a fatal error
//! carrying the faulting line. Anything implementing [`GrammarParser`] can be
//! driven by [`ResilientParser`](super::ResilientParser).

use crate::error::FatalSyntaxError;
use crate::types::Range;
use serde::Serialize;
use tree_sitter::{Node, Tree};

/// Options passed to the grammar parser on every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Attach source ranges to nodes. Tree-sitter nodes always carry byte
    /// ranges, so this is informational for that backend.
    pub capture_range: bool,
    /// Collect recoverable problems instead of failing on them.
    pub tolerant: bool,
    /// Capture comment nodes.
    pub capture_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            capture_range: true,
            tolerant: true,
            capture_comments: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    Block,
    Line,
}

/// A captured comment. `value` excludes the comment delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub value: String,
    pub range: Range,
}

impl Comment {
    /// Build a comment from its full source text, `/* ... */` or `// ...`.
    pub fn from_source(text: &str, range: Range) -> Self {
        match text.strip_prefix("/*") {
            Some(body) => Self {
                kind: CommentKind::Block,
                value: body.strip_suffix("*/").unwrap_or(body).to_string(),
                range,
            },
            None => Self {
                kind: CommentKind::Line,
                value: text.strip_prefix("//").unwrap_or(text).to_string(),
                range,
            },
        }
    }
}

/// A problem the parser recovered from. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoverableError {
    pub line_number: usize,
    pub index: usize,
    pub message: String,
}

/// A parsed document: the tree-sitter tree plus the exact text it was
/// parsed from.
pub struct SyntaxTree {
    tree: Tree,
    source: String,
}

impl SyntaxTree {
    pub fn new(tree: Tree, source: impl Into<String>) -> Self {
        Self {
            tree,
            source: source.into(),
        }
    }

    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("root", &self.tree.root_node().kind())
            .field("length", &self.source.len())
            .finish()
    }
}

/// Result of a successful parse.
#[derive(Debug)]
pub struct ParsedSource {
    pub tree: SyntaxTree,
    pub errors: Vec<RecoverableError>,
    pub comments: Vec<Comment>,
}

/// A grammar parser that can fail fatally at a known line.
pub trait GrammarParser {
    fn parse(
        &mut self,
        text: &str,
        options: &ParseOptions,
    ) -> Result<ParsedSource, FatalSyntaxError>;
}

impl<G: GrammarParser + ?Sized> GrammarParser for &mut G {
    fn parse(
        &mut self,
        text: &str,
        options: &ParseOptions,
    ) -> Result<ParsedSource, FatalSyntaxError> {
        (**self).parse(text, options)
    }
}

impl<G: GrammarParser + ?Sized> GrammarParser for Box<G> {
    fn parse(
        &mut self,
        text: &str,
        options: &ParseOptions,
    ) -> Result<ParsedSource, FatalSyntaxError> {
        (**self).parse(text, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_comment_value_strips_delimiters() {
        let comment = Comment::from_source("/*global foo */", Range::new(0, 15));
        assert_eq!(comment.kind, CommentKind::Block);
        assert_eq!(comment.value, "global foo ");
    }

    #[test]
    fn test_line_comment_value() {
        let comment = Comment::from_source("// global foo", Range::new(0, 13));
        assert_eq!(comment.kind, CommentKind::Line);
        assert_eq!(comment.value, " global foo");
    }

    #[test]
    fn test_unclosed_block_comment_keeps_body() {
        let comment = Comment::from_source("/*jslint node:true", Range::new(0, 18));
        assert_eq!(comment.kind, CommentKind::Block);
        assert_eq!(comment.value, "jslint node:true");
    }
}
