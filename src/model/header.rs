//! File-level header record.
//!
//! Every field is optional: producers differ in which header entities they
//! write, and a sub-record may be present with some of its fields missing.

use serde::{Deserialize, Serialize};

use super::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub file_name: Option<FileName>,
    pub file_description: Option<FileDescription>,
    /// Usually a list of schema names (`('IFC4')`).
    pub schema_identifiers: Option<Value>,
}

/// `FILE_NAME` header entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileName {
    pub name: Option<Value>,
    pub time_stamp: Option<Value>,
    pub author: Option<Value>,
    pub organization: Option<Value>,
    pub preprocessor_version: Option<Value>,
    pub originating_system: Option<Value>,
    pub authorization: Option<Value>,
}

/// `FILE_DESCRIPTION` header entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDescription {
    pub description: Option<Value>,
    pub implementation_level: Option<Value>,
    pub thema: Option<Value>,
}
