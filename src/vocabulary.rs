//! Static hint vocabulary.
//!
//! Keyword and literal-constant lists plus the JSLint environment presets
//! recognised by `/*jslint <preset>:true */` annotations. All tables are
//! compile-time constants.

use crate::types::Token;

pub const KEYWORDS: &[&str] = &[
    "break", "case", "catch", "continue", "debugger", "default", "delete", "do", "else", "finally",
    "for", "function", "if", "in", "instanceof", "new", "return", "switch", "this", "throw", "try",
    "typeof", "var", "void", "while", "with",
];

pub const LITERAL_CONSTANTS: &[&str] = &["true", "false", "null", "undefined"];

const BROWSER: &[&str] = &[
    "clearInterval",
    "clearTimeout",
    "document",
    "event",
    "frames",
    "history",
    "Image",
    "location",
    "name",
    "navigator",
    "Option",
    "parent",
    "screen",
    "setInterval",
    "setTimeout",
    "window",
    "XMLHttpRequest",
];

const DEVEL: &[&str] = &["alert", "confirm", "console", "Debug", "opera", "prompt", "WSH"];

const NODE: &[&str] = &[
    "Buffer",
    "clearInterval",
    "clearTimeout",
    "console",
    "exports",
    "global",
    "module",
    "process",
    "querystring",
    "require",
    "setInterval",
    "setTimeout",
    "__filename",
    "__dirname",
];

const RHINO: &[&str] = &[
    "defineClass",
    "deserialize",
    "gc",
    "help",
    "load",
    "loadClass",
    "print",
    "quit",
    "readFile",
    "readUrl",
    "runCommand",
    "seal",
    "serialize",
    "spawn",
    "sync",
    "toint32",
    "version",
];

const WINDOWS: &[&str] = &[
    "ActiveXObject",
    "CScript",
    "Debug",
    "Enumerator",
    "System",
    "VBArray",
    "WScript",
    "WSH",
];

/// Environment presets, in the order JSLint documents them.
pub const PRESETS: &[(&str, &[&str])] = &[
    ("browser", BROWSER),
    ("devel", DEVEL),
    ("node", NODE),
    ("rhino", RHINO),
    ("windows", WINDOWS),
];

/// Names predefined by a JSLint environment preset, if `preset` is one.
pub fn preset_names(preset: &str) -> Option<&'static [&'static str]> {
    PRESETS
        .iter()
        .find(|(name, _)| *name == preset)
        .map(|(_, names)| *names)
}

/// Preset names as zero-position tokens.
pub fn preset_globals(preset: &str) -> Option<Vec<Token>> {
    preset_names(preset).map(|names| names.iter().copied().map(Token::bare).collect())
}

pub fn keywords() -> Vec<Token> {
    KEYWORDS.iter().copied().map(Token::bare).collect()
}

pub fn literal_constants() -> Vec<Token> {
    LITERAL_CONSTANTS.iter().copied().map(Token::bare).collect()
}

/// Split a path into directory and file parts after the last `/`.
///
/// The directory keeps its trailing separator, so `dir + file == path`.
/// A path without a separator has an empty directory.
pub fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(index) => path.split_at(index + 1),
        None => ("", path),
    }
}
