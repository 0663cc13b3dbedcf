// src/expr/render.rs

//! Canonical text rendering for expression nodes
//!
//! Output is a pure function of the node tree: object entries keep their
//! insertion order and every nesting level indents by two spaces.

use super::{Expr, Object};
use std::borrow::Cow;

const INDENT: &str = "  ";

/// Words that match the bare-key pattern but cannot be used unquoted
const KEYWORDS: &[&str] = &[
    "assert", "else", "if", "in", "inherit", "let", "or", "rec", "then", "with",
];

pub(super) fn render_expr(expr: &Expr, depth: usize, out: &mut String) {
    match expr {
        Expr::String(s) => out.push_str(&quote_string(s)),
        Expr::Path(p) => out.push_str(p),
        Expr::Url(u) => out.push_str(u),
        Expr::Child(name) => {
            let literal = format!("./{name}");
            if super::is_path_literal(&literal) {
                out.push_str(&literal);
            } else {
                out.push_str("(./. + ");
                out.push_str(&quote_string(&format!("/{name}")));
                out.push(')');
            }
        }
        Expr::Import(target) => {
            out.push_str("import ");
            render_expr(target, depth, out);
        }
        Expr::Object(obj) => render_object(obj, depth, out),
    }
}

fn render_object(obj: &Object, depth: usize, out: &mut String) {
    if obj.is_empty() {
        out.push_str("{ }");
        return;
    }

    out.push_str("{\n");
    for (key, value) in obj.iter() {
        for _ in 0..=depth {
            out.push_str(INDENT);
        }
        out.push_str(&format_key(key));
        out.push_str(" = ");
        render_expr(value, depth + 1, out);
        out.push_str(";\n");
    }
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push('}');
}

/// Format an attribute name
///
/// Keys starting with a lowercase ASCII letter followed by at least one word
/// character are emitted bare; everything else is quoted.
pub fn format_key(key: &str) -> Cow<'_, str> {
    let mut chars = key.chars();
    let bare = chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && key.len() >= 2
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&key);

    if bare {
        Cow::Borrowed(key)
    } else {
        Cow::Owned(quote_string(key))
    }
}

/// Quote and escape a string literal
///
/// Escapes backslashes, double quotes, common control characters, and `${`
/// so the text is never interpolated.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');

    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            other => out.push(other),
        }
    }

    out.push('"');
    out
}
