//! Response assembly.
//!
//! Every analysis request produces exactly one [`AnalysisResponse`], whether
//! or not the document could be parsed.

use crate::config::AnalysisConfig;
use crate::decorate::{annotate_globals, annotate_literals, annotate_with_path};
use crate::error::{AnalysisError, AnalysisResult};
use crate::parsing::{
    CancelToken, GrammarParser, JavaScriptGrammar, ParseOptions, ParseOutcome, RecoverableError,
    ResilientParser,
};
use crate::scope::{KeyAttribute, ScopeTree, Walk};
use crate::sift::{sift_associations, sift_positions};
use crate::types::{AssociationTable, Token};

/// The index built from a parsed document.
#[derive(Debug)]
pub struct AnalysisIndex {
    pub scope: ScopeTree,
    pub globals: Vec<Token>,
    pub identifiers: Vec<Token>,
    pub properties: Vec<Token>,
    pub literals: Vec<Token>,
    pub associations: AssociationTable,
    pub recoverable_errors: Vec<RecoverableError>,
    pub repairs: u32,
}

#[derive(Debug)]
pub enum AnalysisOutcome {
    Success(AnalysisIndex),
    Failure(AnalysisError),
}

#[derive(Debug)]
pub struct AnalysisResponse {
    pub dir: String,
    pub file: String,
    /// Source length in bytes.
    pub length: usize,
    pub outcome: AnalysisOutcome,
}

impl AnalysisResponse {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, AnalysisOutcome::Success(_))
    }

    pub fn index(&self) -> Option<&AnalysisIndex> {
        match &self.outcome {
            AnalysisOutcome::Success(index) => Some(index),
            AnalysisOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&AnalysisError> {
        match &self.outcome {
            AnalysisOutcome::Success(_) => None,
            AnalysisOutcome::Failure(err) => Some(err),
        }
    }

    pub fn identifiers(&self) -> &[Token] {
        self.index().map_or(&[], |i| &i.identifiers)
    }

    pub fn properties(&self) -> &[Token] {
        self.index().map_or(&[], |i| &i.properties)
    }

    pub fn literals(&self) -> &[Token] {
        self.index().map_or(&[], |i| &i.literals)
    }

    pub fn globals(&self) -> &[Token] {
        self.index().map_or(&[], |i| &i.globals)
    }
}

/// Combine a parse result into the response for one document.
///
/// A failed parse yields a failure response with no index.
pub fn assemble(
    dir: &str,
    file: &str,
    length: usize,
    outcome: AnalysisResult<ParseOutcome>,
) -> AnalysisResponse {
    let outcome = match outcome {
        Ok(parsed) => {
            let scope = parsed.scope;
            let identifiers = sift_positions(&scope, Walk::Identifiers, KeyAttribute::Name);
            let properties = sift_positions(&scope, Walk::Properties, KeyAttribute::Name);
            let literals = sift_positions(&scope, Walk::Literals, KeyAttribute::Value);
            let associations = sift_associations(&scope);

            AnalysisOutcome::Success(AnalysisIndex {
                globals: annotate_globals(parsed.globals),
                identifiers,
                properties: annotate_with_path(properties, dir, file),
                literals: annotate_literals(literals),
                associations,
                recoverable_errors: parsed.errors,
                repairs: parsed.repairs,
                scope,
            })
        }
        Err(err) => AnalysisOutcome::Failure(err),
    };

    AnalysisResponse {
        dir: dir.to_string(),
        file: file.to_string(),
        length,
        outcome,
    }
}

/// Parses documents and assembles their responses.
pub struct Analyzer<G> {
    parser: ResilientParser<G>,
}

impl Analyzer<JavaScriptGrammar> {
    pub fn javascript(config: &AnalysisConfig) -> AnalysisResult<Self> {
        Ok(Self::new(JavaScriptGrammar::new()?, config))
    }
}

impl<G: GrammarParser> Analyzer<G> {
    pub fn new(grammar: G, config: &AnalysisConfig) -> Self {
        let options = ParseOptions {
            tolerant: config.tolerant,
            ..ParseOptions::default()
        };
        Self {
            parser: ResilientParser::new(grammar)
                .with_max_retries(config.max_retries)
                .with_options(options),
        }
    }

    pub fn parser(&self) -> &ResilientParser<G> {
        &self.parser
    }

    /// Analyze one document. `force` enables line repair.
    pub fn analyze(&mut self, dir: &str, file: &str, text: &str, force: bool) -> AnalysisResponse {
        self.analyze_with_cancel(dir, file, text, force, &CancelToken::new())
    }

    pub fn analyze_with_cancel(
        &mut self,
        dir: &str,
        file: &str,
        text: &str,
        force: bool,
        cancel: &CancelToken,
    ) -> AnalysisResponse {
        let outcome = self.parser.parse(text, force, cancel);
        match &outcome {
            Ok(parsed) => tracing::debug!(
                "[analyze] {dir}{file}: parsed after {} repairs",
                parsed.repairs
            ),
            Err(err) => tracing::info!("[analyze] {dir}{file}: no index ({err})"),
        }
        assemble(dir, file, text.len(), outcome)
    }
}
