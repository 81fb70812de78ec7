//! Global-name annotations in block comments.
//!
//! Two JSLint dialects are recognised:
//!
//! ```text
//! /*global define, $:false */     explicit names, `:value` qualifiers dropped
//! /*jslint node: true */          environment presets switched on with `true`
//! ```
//!
//! Malformed fragments are skipped; extraction never fails.

use crate::parsing::{Comment, CommentKind};
use crate::types::Token;
use crate::vocabulary;

const GLOBAL_MARKER: &str = "global";
const JSLINT_MARKER: &str = "jslint";

/// Offset of the directive body; the marker plus one separator.
const BODY_OFFSET: usize = 7;

/// Collect declared globals from `comments`, sorted by name.
pub fn extract_globals(comments: &[Comment]) -> Vec<Token> {
    let mut globals = Vec::new();

    for comment in comments.iter().filter(|c| c.kind == CommentKind::Block) {
        let value = comment.value.as_str();
        if value.starts_with(GLOBAL_MARKER) {
            globals.extend(explicit_names(directive_body(value)).map(Token::bare));
        } else if value.starts_with(JSLINT_MARKER) {
            for preset in enabled_presets(directive_body(value)) {
                if let Some(tokens) = vocabulary::preset_globals(preset) {
                    globals.extend(tokens);
                }
            }
        }
    }

    globals.sort_by(|a, b| a.value.cmp(&b.value));
    globals
}

fn directive_body(value: &str) -> &str {
    value.get(BODY_OFFSET..).unwrap_or("")
}

fn explicit_names(body: &str) -> impl Iterator<Item = &str> {
    body.split(',')
        .map(|entry| entry.split_once(':').map_or(entry, |(name, _)| name).trim())
        .filter(|name| !name.is_empty())
}

fn enabled_presets(body: &str) -> impl Iterator<Item = &str> {
    body.split(',').filter_map(|entry| {
        let Some((key, value)) = entry.split_once(':') else {
            tracing::trace!("[globals] skipping jslint option without value: {entry:?}");
            return None;
        };
        (value.trim() == "true").then(|| key.trim())
    })
}
