//! # Source Model
//!
//! In-memory form of a parsed IFC file: typed entities with ordered
//! attributes, plus the file header.
//!
//! Design rule: this module is pure data. No I/O, no graph types.

pub mod value;
pub mod entity;
pub mod header;
pub mod arena;

pub use value::{Value, EntityRef};
pub use entity::{Entity, EntityId};
pub use header::{Header, FileName, FileDescription};
pub use arena::IfcModel;
