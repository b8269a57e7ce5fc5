//! Symbol extraction
//!
//! Recognizes `goog.provide('x')` and `goog.require('x')` statements by
//! line-oriented lexical matching. Nothing is evaluated: only a single
//! literal string argument counts, and a declaration must start its line
//! (so commented-out lines never match). Anything else is ignored.

use std::sync::OnceLock;

use regex::Regex;

/// Kind of declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// The file defines the symbol
    Provide,
    /// The file depends on the symbol
    Require,
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provide => write!(f, "provide"),
            Self::Require => write!(f, "require"),
        }
    }
}

/// A single declaration found in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Declaration kind
    pub kind: DeclarationKind,
    /// Literal symbol name
    pub symbol: String,
    /// 1-based line number
    pub line: usize,
}

impl Declaration {
    /// Create a provide declaration
    pub fn provide(symbol: impl Into<String>, line: usize) -> Self {
        Self {
            kind: DeclarationKind::Provide,
            symbol: symbol.into(),
            line,
        }
    }

    /// Create a require declaration
    pub fn require(symbol: impl Into<String>, line: usize) -> Self {
        Self {
            kind: DeclarationKind::Require,
            symbol: symbol.into(),
            line,
        }
    }
}

fn declaration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // `const x = goog.require('a.b');` is accepted as well as the bare statement.
        Regex::new(
            r#"^\s*(?:(?:const|let|var)\s+[^=]+=\s*)?goog\.(provide|require)\(\s*(?:'([^'\\]*)'|"([^"\\]*)")\s*\)"#,
        )
        .expect("declaration pattern is valid")
    })
}

/// Check that a literal looks like a dotted namespace
fn is_symbol(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.split('.').all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        })
}

/// Extract provide/require declarations in source order
pub fn extract(text: &str) -> Vec<Declaration> {
    let re = declaration_regex();
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let caps = re.captures(line)?;
            let kind = match &caps[1] {
                "provide" => DeclarationKind::Provide,
                _ => DeclarationKind::Require,
            };
            let symbol = caps.get(2).or_else(|| caps.get(3))?.as_str();
            is_symbol(symbol).then(|| Declaration {
                kind,
                symbol: symbol.to_string(),
                line: idx + 1,
            })
        })
        .collect()
}

/// Symbols of the given kind, in source order
pub fn symbols_of(declarations: &[Declaration], kind: DeclarationKind) -> Vec<String> {
    declarations
        .iter()
        .filter(|d| d.kind == kind)
        .map(|d| d.symbol.clone())
        .collect()
}
