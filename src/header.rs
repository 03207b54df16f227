//! Header normalization.
//!
//! Flattens the file header into a fixed set of string attributes for the
//! synthetic header node. Missing data becomes [`UNKNOWN`]; a header whose
//! shape we do not recognise degrades to a single error attribute instead of
//! failing the conversion.

use std::collections::BTreeMap;

use tracing::warn;

use crate::model::{Header, Value};

/// Placeholder for any header field the source does not provide.
pub const UNKNOWN: &str = "Unknown";

pub const ERROR_KEY: &str = "Error";
pub const ERROR_MESSAGE: &str = "Header data could not be processed";

/// Every key a normalized header carries, in output order.
pub const HEADER_KEYS: [&str; 10] = [
    "FileName",
    "Author",
    "Authorization",
    "Organization",
    "OriginatingSystem",
    "PreprocessorVersion",
    "TimeStamp",
    "Description",
    "Thema",
    "Schema",
];

/// Result of normalizing a header. Both variants yield a usable attribute map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderFields {
    Normalized(BTreeMap<String, String>),
    Degraded,
}

impl HeaderFields {
    pub fn is_degraded(&self) -> bool {
        matches!(self, HeaderFields::Degraded)
    }

    pub fn into_attributes(self) -> BTreeMap<String, String> {
        match self {
            HeaderFields::Normalized(fields) => fields,
            HeaderFields::Degraded => {
                BTreeMap::from([(ERROR_KEY.to_owned(), ERROR_MESSAGE.to_owned())])
            }
        }
    }
}

/// A header value whose type we do not handle.
#[derive(Debug)]
struct ShapeError {
    field: &'static str,
    found: &'static str,
}

pub fn normalize(header: &Header) -> HeaderFields {
    match try_normalize(header) {
        Ok(fields) => HeaderFields::Normalized(fields),
        Err(e) => {
            warn!(field = e.field, found = e.found, "unexpected header shape; using fallback");
            HeaderFields::Degraded
        }
    }
}

fn try_normalize(header: &Header) -> Result<BTreeMap<String, String>, ShapeError> {
    let file_name = header.file_name.as_ref();
    let description = header.file_description.as_ref();

    let fields = [
        ("FileName", scalar("FileName", file_name.and_then(|f| f.name.as_ref()))?),
        ("Author", joined("Author", file_name.and_then(|f| f.author.as_ref()))?),
        ("Authorization", scalar("Authorization", file_name.and_then(|f| f.authorization.as_ref()))?),
        ("Organization", joined("Organization", file_name.and_then(|f| f.organization.as_ref()))?),
        ("OriginatingSystem", scalar("OriginatingSystem", file_name.and_then(|f| f.originating_system.as_ref()))?),
        ("PreprocessorVersion", scalar("PreprocessorVersion", file_name.and_then(|f| f.preprocessor_version.as_ref()))?),
        ("TimeStamp", scalar("TimeStamp", file_name.and_then(|f| f.time_stamp.as_ref()))?),
        ("Description", joined("Description", description.and_then(|d| d.description.as_ref()))?),
        ("Thema", scalar("Thema", description.and_then(|d| d.thema.as_ref()))?),
        ("Schema", joined("Schema", header.schema_identifiers.as_ref())?),
    ];

    Ok(fields
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect())
}

/// A single-valued field. Lists are not expected here.
fn scalar(field: &'static str, value: Option<&Value>) -> Result<String, ShapeError> {
    match value {
        None | Some(Value::Null) => Ok(UNKNOWN.to_owned()),
        Some(v) => primitive(field, v),
    }
}

/// A field that may be a list of scalars (joined with `", "`) or one scalar.
fn joined(field: &'static str, value: Option<&Value>) -> Result<String, ShapeError> {
    match value {
        None | Some(Value::Null) => Ok(UNKNOWN.to_owned()),
        Some(Value::List(items)) => {
            let parts = items
                .iter()
                .map(|item| primitive(field, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(parts.join(", "))
        }
        Some(v) => primitive(field, v),
    }
}

fn primitive(field: &'static str, value: &Value) -> Result<String, ShapeError> {
    match value {
        Value::String(s) | Value::Enum(s) => Ok(s.clone()),
        Value::Null => Ok(UNKNOWN.to_owned()),
        Value::Bool(_) | Value::Logical(_) | Value::Int(_) | Value::Real(_) => Ok(value.to_literal()),
        other => Err(ShapeError { field, found: other.type_name() }),
    }
}
