//! Token annotations attached before tokens leave the analyzer.

use crate::types::{LiteralKind, Token, TokenAnnotation};

/// Mark tokens as declared by a global annotation comment.
pub fn annotate_globals(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|t| t.with_annotation(TokenAnnotation::Global))
        .collect()
}

/// Tag tokens with the document they were found in.
pub fn annotate_with_path(tokens: Vec<Token>, dir: &str, file: &str) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|t| {
            t.with_annotation(TokenAnnotation::Path {
                dir: dir.to_string(),
                file: file.to_string(),
            })
        })
        .collect()
}

/// Tag literal tokens with the kind of their value.
pub fn annotate_literals(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|t| {
            let kind = LiteralKind::of(&t.value);
            t.with_annotation(TokenAnnotation::Literal { kind })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_kind_follows_value() {
        let tokens = annotate_literals(vec![Token::new("a", vec![0]), Token::new(1.0, vec![4])]);
        assert_eq!(
            tokens[0].annotation,
            Some(TokenAnnotation::Literal { kind: LiteralKind::String })
        );
        assert_eq!(
            tokens[1].annotation,
            Some(TokenAnnotation::Literal { kind: LiteralKind::Number })
        );
    }

    #[test]
    fn test_path_annotation_keeps_positions() {
        let tokens = annotate_with_path(vec![Token::new("foo", vec![3, 9])], "src/", "a.js");
        assert_eq!(tokens[0].positions, vec![3, 9]);
        assert_eq!(
            tokens[0].annotation,
            Some(TokenAnnotation::Path {
                dir: "src/".into(),
                file: "a.js".into()
            })
        );
    }
}
