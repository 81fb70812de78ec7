//! JavaScript grammar backed by tree-sitter.
//!
//! Tree-sitter never aborts: it recovers from everything by wrapping damage
//! in `ERROR` nodes or inserting zero-width `MISSING` tokens. The hint
//! pipeline needs a parser that gives up on real damage so the faulting line
//! can be blanked, so the tree is classified after parsing:
//!
//! - `ERROR` nodes are fatal at their start;
//! - a `string` containing a parse error or a raw line terminator is an
//!   unterminated string, fatal at the opening quote;
//! - a template string with a parse error is fatal at its start;
//! - any other `MISSING` token is recoverable in tolerant mode.
//!
//! The first fatal site in document order is reported.

use crate::error::{AnalysisError, FatalSyntaxError};
use crate::parsing::grammar::{
    Comment, GrammarParser, ParseOptions, ParsedSource, RecoverableError, SyntaxTree,
};
use tree_sitter::{Language, Node, Parser};

/// Longest excerpt of offending source quoted in an error message.
const EXCERPT_LEN: usize = 24;

pub struct JavaScriptGrammar {
    parser: Parser,
}

impl JavaScriptGrammar {
    pub fn new() -> Result<Self, AnalysisError> {
        let mut parser = Parser::new();
        let language: Language = tree_sitter_javascript::LANGUAGE.into();
        parser.set_language(&language).map_err(|e| {
            AnalysisError::GrammarInit(format!("Failed to set JavaScript language: {e}"))
        })?;

        Ok(Self { parser })
    }
}

impl GrammarParser for JavaScriptGrammar {
    fn parse(
        &mut self,
        text: &str,
        options: &ParseOptions,
    ) -> Result<ParsedSource, FatalSyntaxError> {
        let Some(tree) = self.parser.parse(text, None) else {
            return Err(FatalSyntaxError::new(1, 0, "Parser produced no syntax tree"));
        };

        let mut scan = TreeScan::new(text, options);
        scan.run(tree.root_node());
        if let Some(fatal) = scan.fatal {
            return Err(fatal);
        }

        Ok(ParsedSource {
            tree: SyntaxTree::new(tree, text),
            errors: scan.recoverable,
            comments: scan.comments,
        })
    }
}

/// Single pre-order pass collecting comments and classifying damage.
struct TreeScan<'a> {
    code: &'a str,
    options: &'a ParseOptions,
    comments: Vec<Comment>,
    recoverable: Vec<RecoverableError>,
    fatal: Option<FatalSyntaxError>,
}

impl<'a> TreeScan<'a> {
    fn new(code: &'a str, options: &'a ParseOptions) -> Self {
        Self {
            code,
            options,
            comments: Vec::new(),
            recoverable: Vec::new(),
            fatal: None,
        }
    }

    /// Iterative walk; deeply nested documents must not exhaust the stack.
    fn run(&mut self, root: Node<'_>) {
        let mut cursor = root.walk();
        loop {
            let descend = self.inspect(cursor.node());
            if self.fatal.is_some() {
                return;
            }
            if descend && cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return;
                }
            }
        }
    }

    /// Returns whether the walk should descend into `node`.
    fn inspect(&mut self, node: Node<'_>) -> bool {
        if node.is_error() {
            let excerpt = self.excerpt(node);
            self.fail(node, format!("Unexpected token {excerpt}"));
            return false;
        }

        if node.is_missing() {
            let message = format!("Missing {}", node.kind());
            if self.options.tolerant {
                self.recoverable.push(RecoverableError {
                    line_number: node.start_position().row + 1,
                    index: node.start_byte(),
                    message,
                });
            } else {
                self.fail(node, message);
            }
            return false;
        }

        match node.kind() {
            "comment" => {
                if self.options.capture_comments {
                    let range = node.byte_range();
                    self.comments
                        .push(Comment::from_source(&self.code[range.clone()], range.into()));
                }
                false
            }
            "string" => {
                if node.has_error() || has_raw_line_terminator(&self.code[node.byte_range()]) {
                    self.fail(node, "Unterminated string literal".to_string());
                }
                false
            }
            "template_string" if node.has_error() => {
                self.fail(node, "Unterminated template literal".to_string());
                false
            }
            _ => true,
        }
    }

    fn fail(&mut self, node: Node<'_>, message: String) {
        if self.fatal.is_none() {
            self.fatal = Some(FatalSyntaxError::new(
                node.start_position().row + 1,
                node.start_byte(),
                message,
            ));
        }
    }

    fn excerpt(&self, node: Node<'_>) -> String {
        let text = &self.code[node.byte_range()];
        let line = text.lines().next().unwrap_or("").trim();
        if line.is_empty() {
            return "<end of line>".to_string();
        }
        line.chars().take(EXCERPT_LEN).collect()
    }
}

/// Whether a quoted string contains a line break not escaped by `\`.
fn has_raw_line_terminator(raw: &str) -> bool {
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '\n' | '\r' => return true,
            _ => {}
        }
    }
    false
}
