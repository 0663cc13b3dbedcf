// src/expr/mod.rs

//! Typed Nix expression model
//!
//! Only the handful of forms the generated tree needs are modelled:
//!
//! | Node | Rendered as |
//! |------|-------------|
//! | `Expr::String` | `"escaped text"` |
//! | `Expr::Path` | `./relative/path` (bare) |
//! | `Expr::Url` | `https://host/file` (bare) |
//! | `Expr::Child` | `./name`, or `(./. + "/name")` when `name` is not a path token |
//! | `Expr::Import` | `import <target>` |
//! | `Expr::Object` | `{ key = value; ... }` |
//!
//! Nodes are immutable values. Validation happens at construction time so a
//! malformed node never reaches the filesystem; rendering itself cannot fail.
//!
//! # Example
//!
//! ```
//! use vertree::expr::{Expr, Object};
//!
//! let mut obj = Object::new();
//! obj.insert("abc", Expr::string("x")).unwrap();
//! obj.insert("a-b", Expr::import(Expr::path("./a-b").unwrap())).unwrap();
//! assert_eq!(
//!     Expr::Object(obj).render(),
//!     "{\n  abc = \"x\";\n  \"a-b\" = import ./a-b;\n}"
//! );
//! ```

mod render;

pub use render::{format_key, quote_string};

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Errors raised while building expression nodes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Duplicate object key: {0}")]
    DuplicateKey(String),

    #[error("Invalid {kind} literal: {value}")]
    InvalidLiteral { kind: &'static str, value: String },
}

/// A node of the expression tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    String(String),
    Path(String),
    Url(String),
    /// An entry of the directory holding the rendered file
    Child(String),
    Import(Box<Expr>),
    Object(Object),
}

impl Expr {
    /// Create a string literal
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Create a path literal
    ///
    /// The value must be a Nix path token: it starts with `./`, `../`, `/` or
    /// `~/`, has no empty or trailing components, and only uses characters
    /// valid inside an unquoted path.
    pub fn path(value: impl Into<String>) -> Result<Self, ExprError> {
        let value = value.into();
        if is_path_literal(&value) {
            Ok(Self::Path(value))
        } else {
            Err(ExprError::InvalidLiteral { kind: "path", value })
        }
    }

    /// Create a URL literal
    pub fn url(value: impl Into<String>) -> Result<Self, ExprError> {
        let value = value.into();
        if is_url_literal(&value) {
            Ok(Self::Url(value))
        } else {
            Err(ExprError::InvalidLiteral { kind: "url", value })
        }
    }

    /// Refer to a directory entry next to the rendered file
    ///
    /// Any single file name is accepted. Names that cannot appear in a bare
    /// path literal are rendered as a path concatenation instead.
    pub fn child(name: impl Into<String>) -> Result<Self, ExprError> {
        let name = name.into();
        let invalid = name.is_empty() || name == "." || name == ".." || name.contains(['/', '\0']);
        if invalid {
            Err(ExprError::InvalidLiteral {
                kind: "file name",
                value: name,
            })
        } else {
            Ok(Self::Child(name))
        }
    }

    /// Create an `import` of the given target
    pub fn import(target: Expr) -> Self {
        Self::Import(Box::new(target))
    }

    /// Render the node as Nix source text
    pub fn render(&self) -> String {
        let mut out = String::new();
        render::render_expr(self, 0, &mut out);
        out
    }

    fn kind(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Convert a dynamic JSON value into an expression
///
/// Strings become string literals and objects become attribute sets; any
/// other JSON type is a `TypeMismatch`.
impl TryFrom<&Value> for Expr {
    type Error = ExprError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Self::String(s.clone())),
            Value::Object(_) => Ok(Self::Object(Object::from_json(value)?)),
            other => Err(ExprError::TypeMismatch {
                expected: "string or object",
                found: Expr::kind(other),
            }),
        }
    }
}

/// An attribute set with unique keys, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Object {
    entries: Vec<(String, Expr)>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, rejecting keys already present
    pub fn insert(&mut self, key: impl Into<String>, value: Expr) -> Result<(), ExprError> {
        let key = key.into();
        if self.contains_key(&key) {
            return Err(ExprError::DuplicateKey(key));
        }
        self.entries.push((key, value));
        Ok(())
    }

    /// Build an object from a JSON mapping, preserving its key order
    pub fn from_json(value: &Value) -> Result<Self, ExprError> {
        let Value::Object(map) = value else {
            return Err(ExprError::TypeMismatch {
                expected: "object",
                found: Expr::kind(value),
            });
        };

        let mut obj = Self::new();
        for (key, item) in map {
            obj.insert(key.clone(), Expr::try_from(item)?)?;
        }
        Ok(obj)
    }

    pub fn get(&self, key: &str) -> Option<&Expr> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Object> for Expr {
    fn from(obj: Object) -> Self {
        Self::Object(obj)
    }
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+')
}

pub(crate) fn is_path_literal(value: &str) -> bool {
    let rest = if let Some(rest) = value.strip_prefix("~/") {
        rest
    } else if let Some(rest) = value.strip_prefix('/') {
        rest
    } else if let Some(idx) = value.find('/') {
        // Relative paths need a leading component such as `.` or `..`
        let head = &value[..idx];
        if head.is_empty() || !head.chars().all(is_path_char) {
            return false;
        }
        &value[idx + 1..]
    } else {
        return false;
    };

    !rest.is_empty() && rest.split('/').all(|part| !part.is_empty() && part.chars().all(is_path_char))
}

fn is_url_literal(value: &str) -> bool {
    let Some((scheme, rest)) = value.split_once(':') else {
        return false;
    };

    let mut scheme_chars = scheme.chars();
    let scheme_ok = scheme_chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && scheme_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    scheme_ok
        && !rest.is_empty()
        && rest.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(
                    c,
                    '%' | '/' | '?' | ':' | '@' | '&' | '=' | '+' | '$' | ',' | '-' | '_' | '.'
                        | '!' | '~' | '*' | '\''
                )
        })
}
