use scopehint::parsing::{
    CancelToken, GrammarParser, ParseOptions, ParsedSource, ResilientParser,
};
use scopehint::{AnalysisError, FatalSyntaxError, JavaScriptGrammar};

/// Wraps the real grammar and records every text it is asked to parse.
struct Recording {
    inner: JavaScriptGrammar,
    seen: Vec<String>,
}

impl Recording {
    fn new() -> Self {
        Self {
            inner: JavaScriptGrammar::new().unwrap(),
            seen: Vec::new(),
        }
    }
}

impl GrammarParser for Recording {
    fn parse(
        &mut self,
        text: &str,
        options: &ParseOptions,
    ) -> Result<ParsedSource, FatalSyntaxError> {
        self.seen.push(text.to_string());
        self.inner.parse(text, options)
    }
}

/// Fails every call, faulting on line 1, then 2, then 3 ...
struct AlwaysFails {
    calls: usize,
}

impl GrammarParser for AlwaysFails {
    fn parse(
        &mut self,
        _text: &str,
        _options: &ParseOptions,
    ) -> Result<ParsedSource, FatalSyntaxError> {
        self.calls += 1;
        Err(FatalSyntaxError::new(self.calls, 0, "Unexpected token"))
    }
}

/// Fails on a fixed line every call.
struct FailsAt {
    line: usize,
    calls: usize,
    cancel_on_first: Option<CancelToken>,
}

impl GrammarParser for FailsAt {
    fn parse(
        &mut self,
        _text: &str,
        _options: &ParseOptions,
    ) -> Result<ParsedSource, FatalSyntaxError> {
        self.calls += 1;
        if let Some(token) = self.cancel_on_first.take() {
            token.cancel();
        }
        Err(FatalSyntaxError::new(self.line, 0, "Unexpected token"))
    }
}

const DAMAGED: &str = "var a = 1;\nvar b = \"open;\nvar c = a;\n";

#[test]
fn test_repair_disabled_makes_one_attempt() {
    let mut parser = ResilientParser::new(Recording::new());
    let result = parser.parse(DAMAGED, false, &CancelToken::new());

    assert!(matches!(result, Err(AnalysisError::Fatal(_))));
    assert_eq!(parser.grammar().seen.len(), 1);
}

#[test]
fn test_valid_text_parses_without_repair() {
    let mut parser = ResilientParser::new(Recording::new());
    let outcome = parser.parse("var a = 1;", true, &CancelToken::new()).unwrap();

    assert_eq!(outcome.repairs, 0);
    assert_eq!(parser.grammar().seen.len(), 1);
}

#[test]
fn test_repair_keeps_length_and_lines() {
    let mut parser = ResilientParser::new(Recording::new());
    let outcome = parser.parse(DAMAGED, true, &CancelToken::new()).unwrap();
    assert!(outcome.repairs >= 1);

    let seen = &parser.grammar().seen;
    assert_eq!(seen[0], DAMAGED, "first attempt sees the original text");
    for text in seen {
        assert_eq!(text.len(), DAMAGED.len());
        assert_eq!(text.split('\n').count(), DAMAGED.split('\n').count());
    }
    assert!(seen.last().unwrap().starts_with("var a = 1;\n"));
}

#[test]
fn test_budget_bounds_attempts() {
    let text = "a\nb\nc\nd\ne\nf\ng\n";
    let mut parser = ResilientParser::new(AlwaysFails { calls: 0 }).with_max_retries(3);

    match parser.parse(text, true, &CancelToken::new()) {
        Err(AnalysisError::RepairExhausted { repairs, last }) => {
            assert_eq!(repairs, 3);
            assert_eq!(last.line_number, 4);
        }
        other => panic!("expected exhausted budget, got {other:?}"),
    }
    assert_eq!(parser.grammar().calls, 4);
}

#[test]
fn test_default_budget_is_one_hundred() {
    let text = "x\n".repeat(200);
    let mut parser = ResilientParser::new(AlwaysFails { calls: 0 });

    let err = parser.parse(&text, true, &CancelToken::new()).unwrap_err();
    assert_eq!(err.repairs(), 100);
    assert_eq!(parser.grammar().calls, 101);
}

#[test]
fn test_blank_faulting_line_stops_early() {
    let mut parser = ResilientParser::new(FailsAt {
        line: 2,
        calls: 0,
        cancel_on_first: None,
    });

    match parser.parse("a\nb\nc", true, &CancelToken::new()) {
        Err(AnalysisError::NoProgress { line_number, repairs }) => {
            assert_eq!(line_number, 2);
            assert_eq!(repairs, 1);
        }
        other => panic!("expected no progress, got {other:?}"),
    }
    assert_eq!(parser.grammar().calls, 2);
}

#[test]
fn test_cancel_stops_at_next_attempt() {
    let cancel = CancelToken::new();
    let mut parser = ResilientParser::new(FailsAt {
        line: 1,
        calls: 0,
        cancel_on_first: Some(cancel.clone()),
    });

    let result = parser.parse("a\nb\nc", true, &cancel);
    assert_eq!(result.unwrap_err(), AnalysisError::Cancelled);
    assert_eq!(parser.grammar().calls, 1);
}
