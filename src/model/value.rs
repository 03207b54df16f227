//! Attribute values as they come out of an IFC exchange file.

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

/// Raw entity reference as written by the producer (`#12`).
///
/// Producers may hand out non-positive identities for inline or unresolved
/// instances; only positive identities count as references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef(pub i64);

impl EntityRef {
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single attribute value.
///
/// Collections nest at most one level for the entities we process, but the
/// type does not forbid deeper nesting; deeper levels are treated as literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Null,
    Bool(bool),
    /// Three-valued LOGICAL; `None` is `.U.`
    Logical(Option<bool>),
    Int(i64),
    Real(f64),
    String(String),
    Enum(String),
    /// Hex digits, as written in the file.
    Binary(String),
    /// Select-typed inline value, e.g. `IFCLABEL('Level 1')`.
    Typed { type_tag: String, value: Box<Value> },
    Reference(EntityRef),
    List(Vec<Value>),
}

// ============================================================================
// Classification helpers
// ============================================================================

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "BOOLEAN",
            Value::Logical(_) => "LOGICAL",
            Value::Int(_) => "INTEGER",
            Value::Real(_) => "REAL",
            Value::String(_) => "STRING",
            Value::Enum(_) => "ENUMERATION",
            Value::Binary(_) => "BINARY",
            Value::Typed { .. } => "TYPED",
            Value::Reference(_) => "REFERENCE",
            Value::List(_) => "LIST",
        }
    }

    /// The referenced identity, if this is a reference with a positive identity.
    pub fn valid_reference(&self) -> Option<EntityRef> {
        match self {
            Value::Reference(r) if r.is_valid() => Some(*r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Serialized scalar form used for node attributes.
    ///
    /// Top-level strings are written bare; strings nested in a collection or
    /// a typed value are single-quoted so the collection stays readable.
    pub fn to_literal(&self) -> String {
        let mut out = String::new();
        match self {
            Value::String(s) | Value::Enum(s) => out.push_str(s),
            other => write_nested(&mut out, other),
        }
        out
    }
}

fn write_nested(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("None"),
        Value::Bool(true) | Value::Logical(Some(true)) => out.push_str("True"),
        Value::Bool(false) | Value::Logical(Some(false)) => out.push_str("False"),
        Value::Logical(None) => out.push_str("Unknown"),
        Value::Int(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Real(r) => write_real(out, *r),
        Value::String(s) | Value::Enum(s) | Value::Binary(s) => {
            out.push('\'');
            out.push_str(&s.replace('\'', "\\'"));
            out.push('\'');
        }
        Value::Typed { type_tag, value } => {
            out.push_str(type_tag);
            out.push('(');
            write_nested(out, value);
            out.push(')');
        }
        Value::Reference(r) => {
            let _ = write!(out, "{r}");
        }
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_nested(out, item);
            }
            out.push(']');
        }
    }
}

/// Reals always carry a fractional part so `3.0` never collapses to `3`.
fn write_real(out: &mut String, r: f64) {
    if r.is_finite() && r.fract() == 0.0 && r.abs() < 1e16 {
        let _ = write!(out, "{r:.1}");
    } else {
        let _ = write!(out, "{r}");
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<i32> for Value { fn from(v: i32) -> Self { Value::Int(v as i64) } }
impl From<i64> for Value { fn from(v: i64) -> Self { Value::Int(v) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::Real(v) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::String(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::String(v.to_owned()) } }
impl From<EntityRef> for Value { fn from(v: EntityRef) -> Self { Value::Reference(v) } }
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self { Value::List(v.into_iter().map(Into::into).collect()) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Value::Null) }
}
