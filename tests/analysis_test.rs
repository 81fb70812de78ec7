use scopehint::config::AnalysisConfig;
use scopehint::protocol::ResponseMessage;
use scopehint::{AnalysisError, Analyzer, JavaScriptGrammar, Token, TokenAnnotation};

fn analyzer() -> Analyzer<JavaScriptGrammar> {
    Analyzer::javascript(&AnalysisConfig::default()).unwrap()
}

fn find<'a>(tokens: &'a [Token], name: &str) -> Option<&'a Token> {
    tokens.iter().find(|t| t.value.as_str() == Some(name))
}

fn assert_positions_valid(tokens: &[Token], length: usize) {
    for token in tokens {
        assert!(
            token.positions.windows(2).all(|w| w[0] < w[1]),
            "positions of {} not strictly ascending: {:?}",
            token.value,
            token.positions
        );
        assert!(token.positions.iter().all(|&p| p < length));
    }
}

#[test]
fn test_associations_count_member_accesses() {
    let text = "var x = 1; x.foo; x.bar; x.foo;";
    let response = analyzer().analyze("src/", "a.js", text, false);
    assert!(response.is_success());

    let index = response.index().unwrap();
    assert_eq!(index.associations.len(), 1);
    assert_eq!(index.associations["x"]["foo"], 2);
    assert_eq!(index.associations["x"]["bar"], 1);

    let json = serde_json::to_value(&index.associations).unwrap();
    assert_eq!(json, serde_json::json!({"x": {"bar": 1, "foo": 2}}));
}

#[test]
fn test_identifier_positions_are_start_offsets() {
    let text = "var foo = 1;\nfoo = foo + 2;";
    let response = analyzer().analyze("", "a.js", text, false);

    let foo = find(response.identifiers(), "foo").expect("foo is indexed");
    let expected: Vec<usize> = text.match_indices("foo").map(|(i, _)| i).collect();
    assert_eq!(foo.positions, expected);
    assert_positions_valid(response.identifiers(), text.len());
}

#[test]
fn test_explicit_globals() {
    let response = analyzer().analyze("", "a.js", "/*global foo, bar:true */\nfoo(bar);", false);
    let globals = response.globals();

    let names: Vec<_> = globals.iter().map(|t| t.value.to_string()).collect();
    assert_eq!(names, vec!["bar", "foo"]);
    assert!(globals.iter().all(|t| t.positions.is_empty()));
    assert!(globals.iter().all(|t| t.annotation == Some(TokenAnnotation::Global)));
}

#[test]
fn test_jslint_node_preset() {
    let response = analyzer().analyze("", "a.js", "/*jslint node:true */\nrequire('fs');", false);
    let globals = response.globals();

    for name in ["process", "require", "module", "Buffer"] {
        assert!(find(globals, name).is_some(), "missing {name}");
    }
    assert!(find(globals, "window").is_none());
}

#[test]
fn test_properties_and_literals_are_tagged() {
    let text = "var cfg = {port: 8080, host: 'localhost'};\ncfg.port;";
    let response = analyzer().analyze("lib/", "server.js", text, false);
    let index = response.index().unwrap();

    let port = find(&index.properties, "port").expect("port property");
    assert_eq!(
        port.annotation,
        Some(TokenAnnotation::Path {
            dir: "lib/".into(),
            file: "server.js".into()
        })
    );
    assert_eq!(port.positions.len(), 2);

    let host = find(&index.literals, "localhost").expect("string literal");
    assert_eq!(host.positions, vec![text.find("'localhost'").unwrap()]);
    assert!(
        index
            .literals
            .iter()
            .any(|t| t.value.as_number() == Some(8080.0))
    );
    assert_positions_valid(&index.literals, text.len());
}

#[test]
fn test_unterminated_string_is_repaired() {
    let text = "var a = 1;\nvar b = a;\nvar c = \"oops;\nvar d = b;\n";
    let line3 = text.find("var c").unwrap()..text.find("var d").unwrap();

    let response = analyzer().analyze("", "a.js", text, true);
    let index = response.index().expect("repair recovers the document");
    assert!(index.repairs >= 1);

    for tokens in [&index.identifiers, &index.properties, &index.literals] {
        assert!(
            tokens
                .iter()
                .flat_map(|t| &t.positions)
                .all(|p| !line3.contains(p)),
            "a token survived on the blanked line"
        );
        assert_positions_valid(tokens, text.len());
    }
    assert!(find(&index.identifiers, "a").is_some());
}

#[test]
fn test_unterminated_string_without_force_fails() {
    let text = "var a = 1;\nvar b = a;\nvar c = \"oops;\nvar d = b;\n";
    let response = analyzer().analyze("", "a.js", text, false);

    assert!(!response.is_success());
    assert!(matches!(response.failure(), Some(AnalysisError::Fatal(_))));

    let message = ResponseMessage::from(response);
    assert!(!message.success);
    assert!(message.scope.is_none());
    assert_eq!(message.length, text.len());
    assert!(message.identifiers.is_empty());
    assert!(message.associations.is_empty());
}

#[test]
fn test_multibyte_offsets_are_bytes() {
    let text = "var s = 'é';\nvar t = s;";
    let response = analyzer().analyze("", "a.js", text, false);

    let t = find(response.identifiers(), "t").unwrap();
    assert_eq!(t.positions, vec![text.find("t =").unwrap()]);
    assert_eq!(response.length, text.len());
}

#[test]
fn test_analysis_is_deterministic() {
    let text = "function f(a, b) { return a.x + b.y; }\nvar o = {x: 1};\nf(o, o);";
    let first = ResponseMessage::from(analyzer().analyze("", "a.js", text, true));
    let second = ResponseMessage::from(analyzer().analyze("", "a.js", text, true));
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn test_empty_document() {
    let response = analyzer().analyze("", "empty.js", "", true);
    assert!(response.is_success());
    assert!(response.identifiers().is_empty());
    assert_eq!(response.length, 0);
}

#[test]
fn test_recoverable_errors_do_not_block_indexing() {
    let response = analyzer().analyze("", "a.js", "function f() { return 1;", false);
    assert!(response.is_success());

    let index = response.index().unwrap();
    assert_eq!(index.repairs, 0);
    assert!(!index.recoverable_errors.is_empty());
    assert!(find(&index.identifiers, "f").is_some());
}

#[test]
fn test_mid_edit_documents_have_no_empty_tokens() {
    let texts = [
        "if (a > ) {}",
        "var x = {a: }",
        "var o = {\n  a: 1,\n  b: ,\n  c: 3\n};\n",
    ];
    for text in texts {
        let response = analyzer().analyze("", "a.js", text, false);
        assert!(response.is_success(), "{text:?} should parse tolerantly");

        let index = response.index().unwrap();
        for tokens in [&index.identifiers, &index.properties, &index.literals] {
            assert!(
                tokens.iter().all(|t| t.value.as_str() != Some("")),
                "empty token in {text:?}"
            );
            assert_positions_valid(tokens, text.len());
        }
        assert!(!index.associations.contains_key(""));
    }
}
