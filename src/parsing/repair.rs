//! Damage-repair parse loop.
//!
//! When the grammar parser fails fatally, the faulting line is blanked and
//! the document re-parsed, up to a fixed budget. Blanking swaps every
//! character of the line for spaces of the same UTF-8 width, so byte offsets
//! and line numbers of every other token stay valid in the repaired text.

use crate::error::{AnalysisError, AnalysisResult, FatalSyntaxError};
use crate::globals::extract_globals;
use crate::parsing::grammar::{GrammarParser, ParseOptions, ParsedSource, RecoverableError};
use crate::scope::ScopeTree;
use crate::types::Token;
use std::borrow::Cow;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Default number of line repairs allowed for one forced analysis.
pub const MAX_RETRIES: u32 = 100;

/// Shared cancellation flag, checked at every yield point of the repair loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Yield the thread to the scheduler, then report whether to go on.
    pub fn checkpoint(&self) -> ControlFlow<()> {
        std::thread::yield_now();
        if self.is_cancelled() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Everything a successful (possibly repaired) parse yields.
#[derive(Debug)]
pub struct ParseOutcome {
    pub scope: ScopeTree,
    pub globals: Vec<Token>,
    pub errors: Vec<RecoverableError>,
    /// Lines blanked before the parse succeeded.
    pub repairs: u32,
}

enum RepairState<'a> {
    Parsing { text: Cow<'a, str> },
    Repairing { text: Cow<'a, str>, fault: FatalSyntaxError },
    Succeeded(ParseOutcome),
    Exhausted(AnalysisError),
}

/// Drives a [`GrammarParser`] through the bounded repair loop.
pub struct ResilientParser<G> {
    grammar: G,
    options: ParseOptions,
    max_retries: u32,
}

impl<G: GrammarParser> ResilientParser<G> {
    pub fn new(grammar: G) -> Self {
        Self {
            grammar,
            options: ParseOptions::default(),
            max_retries: MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Parse `text`, blanking faulting lines while the budget allows.
    ///
    /// The budget is `max_retries` when `allow_repair` is set and zero
    /// otherwise. `text` itself is never modified; repairs work on a copy.
    pub fn parse(
        &mut self,
        text: &str,
        allow_repair: bool,
        cancel: &CancelToken,
    ) -> AnalysisResult<ParseOutcome> {
        let mut budget = if allow_repair { self.max_retries } else { 0 };
        let mut repairs = 0u32;
        let mut state = RepairState::Parsing {
            text: Cow::Borrowed(text),
        };

        loop {
            state = match state {
                RepairState::Parsing { text } => match self.grammar.parse(&text, &self.options) {
                    Ok(parsed) => RepairState::Succeeded(index(parsed, repairs)),
                    Err(fault) if budget == 0 => {
                        if allow_repair {
                            tracing::warn!(
                                "[repair] budget exhausted after {repairs} repairs: {fault}"
                            );
                            RepairState::Exhausted(AnalysisError::RepairExhausted {
                                repairs,
                                last: fault,
                            })
                        } else {
                            tracing::debug!("[repair] parse failed, repair disabled: {fault}");
                            RepairState::Exhausted(AnalysisError::Fatal(fault))
                        }
                    }
                    Err(fault) => RepairState::Repairing { text, fault },
                },
                RepairState::Repairing { text, fault } => {
                    budget -= 1;
                    match blank_line(&text, fault.line_number) {
                        None => RepairState::Exhausted(AnalysisError::NoProgress {
                            line_number: fault.line_number,
                            repairs,
                        }),
                        Some(repaired) => {
                            repairs += 1;
                            tracing::debug!(
                                "[repair] blanked line {} ({}), {budget} retries left",
                                fault.line_number,
                                fault.message
                            );
                            match cancel.checkpoint() {
                                ControlFlow::Break(()) => {
                                    RepairState::Exhausted(AnalysisError::Cancelled)
                                }
                                ControlFlow::Continue(()) => RepairState::Parsing {
                                    text: Cow::Owned(repaired),
                                },
                            }
                        }
                    }
                }
                RepairState::Succeeded(outcome) => return Ok(outcome),
                RepairState::Exhausted(err) => return Err(err),
            };
        }
    }
}

fn index(parsed: ParsedSource, repairs: u32) -> ParseOutcome {
    if !parsed.errors.is_empty() {
        tracing::debug!("[repair] recoverable parse errors: {:?}", parsed.errors);
    }

    ParseOutcome {
        scope: ScopeTree::build(&parsed.tree),
        globals: extract_globals(&parsed.comments),
        errors: parsed.errors,
        repairs,
    }
}

/// Blank the 1-based `line_number` of `text`.
///
/// Line numbers past the end select the last line; 0 selects the first.
/// Returns `None` when the line is already blank. `\r` is kept so CRLF line
/// structure survives.
pub fn blank_line(text: &str, line_number: usize) -> Option<String> {
    let line_count = text.split('\n').count();
    let target = line_number.clamp(1, line_count) - 1;

    let start = match target {
        0 => 0,
        n => text.match_indices('\n').nth(n - 1).map(|(i, _)| i + 1)?,
    };
    let end = text[start..].find('\n').map_or(text.len(), |i| start + i);
    let line = &text[start..end];

    let mut changed = false;
    let mut blanked = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            ' ' | '\r' => blanked.push(c),
            _ => {
                changed = true;
                blanked.extend(std::iter::repeat_n(' ', c.len_utf8()));
            }
        }
    }

    if !changed {
        return None;
    }

    let mut repaired = String::with_capacity(text.len());
    repaired.push_str(&text[..start]);
    repaired.push_str(&blanked);
    repaired.push_str(&text[end..]);
    Some(repaired)
}
