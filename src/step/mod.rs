//! # STEP Reader
//!
//! Loads IFC files in the ISO-10303-21 clear-text encoding into an
//! [`IfcModel`]. Positional arguments are named from [`schema`] for the
//! release declared in `FILE_SCHEMA`; unknown entity types keep their tag as
//! written and get positional names.
//!
//! ```text
//! file text → strip comments → parser::parse_exchange → Header + Entity arena
//! ```

pub mod parser;
pub mod schema;

use std::path::Path;

use tracing::{debug, info, warn};

use crate::model::{Entity, EntityId, FileDescription, FileName, Header, IfcModel, Value};
use crate::{Error, Result};
use parser::{ExchangeFile, InstanceBody, Record};
use schema::SchemaVersion;

/// Read and parse an IFC file from disk.
pub fn read_model(path: impl AsRef<Path>) -> Result<IfcModel> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| Error::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    // Exchange files are 7-bit text by definition; tolerate stray bytes.
    let text = String::from_utf8_lossy(&bytes);
    let model = parse_model(&text)?;
    info!(path = %path.display(), entities = model.len(), "IFC file loaded");
    Ok(model)
}

/// Parse exchange-file text into a model.
pub fn parse_model(text: &str) -> Result<IfcModel> {
    let cleaned = parser::strip_comments(text);
    let file = match parser::parse_exchange(&cleaned) {
        Ok((rest, file)) if rest.trim().is_empty() => file,
        Ok((rest, _)) => return Err(parse_error(&cleaned, rest, "unexpected content after END-ISO-10303-21")),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            return Err(parse_error(&cleaned, e.input, &format!("syntax error ({:?})", e.code)));
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(parse_error(&cleaned, "", "unexpected end of input"));
        }
    };
    assemble(file)
}

fn parse_error(full: &str, rest: &str, message: &str) -> Error {
    let offset = full.len().saturating_sub(rest.len());
    let line = full[..offset].matches('\n').count() + 1;
    Error::Parse { line, message: message.to_string() }
}

fn assemble(file: ExchangeFile) -> Result<IfcModel> {
    let header = header_from_records(&file.header);
    let version = SchemaVersion::from_identifiers(header.schema_identifiers.as_ref());
    debug!(?version, "naming attributes");
    let mut model = IfcModel::new(header);

    for instance in file.instances {
        match instance.body {
            InstanceBody::Simple(record) => model.insert(entity_from_record(instance.id, record, version))?,
            InstanceBody::Complex(parts) => {
                let names: Vec<&str> = parts.iter().map(|p| p.name.as_str()).collect();
                warn!(id = instance.id, parts = ?names, "complex instance skipped");
            }
        }
    }
    Ok(model)
}

/// Name positional arguments and canonicalise the type tag.
fn entity_from_record(id: u64, record: Record, version: SchemaVersion) -> Entity {
    let type_tag = schema::canonical_name(&record.name)
        .map(str::to_string)
        .unwrap_or_else(|| {
            debug!(type_tag = %record.name, "type not in attribute table; using positional names");
            record.name.clone()
        });
    let names = schema::attribute_names(&record.name, version).unwrap_or_default();

    let attributes = record
        .args
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let name = names
                .get(i)
                .map(|n| n.to_string())
                .unwrap_or_else(|| schema::positional_name(i));
            (name, value)
        })
        .collect();

    Entity { id: EntityId(id), type_tag, attributes }
}

fn header_from_records(records: &[Record]) -> Header {
    let find = |name: &str| {
        records
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
            .map(|r| r.args.as_slice())
    };
    let arg = |args: &[Value], i: usize| args.get(i).cloned();

    Header {
        file_name: find("FILE_NAME").map(|a| FileName {
            name: arg(a, 0),
            time_stamp: arg(a, 1),
            author: arg(a, 2),
            organization: arg(a, 3),
            preprocessor_version: arg(a, 4),
            originating_system: arg(a, 5),
            authorization: arg(a, 6),
        }),
        file_description: find("FILE_DESCRIPTION").map(|a| FileDescription {
            description: arg(a, 0),
            implementation_level: arg(a, 1),
            thema: None,
        }),
        schema_identifiers: find("FILE_SCHEMA").and_then(|a| arg(a, 0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityRef;
    use pretty_assertions::assert_eq;

    const HOUSE: &str = "ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('house.ifc','2024-03-01T10:00:00',('Ana','Bo'),('Studio'),'IfcOpenShell','Revit','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
/* materials */
#10=IFCMATERIAL('Brick',$,$);
#11=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',$,'W1',$,$,$,$,$,.STANDARD.);
#12=IFCRELASSOCIATESMATERIAL('1x',$,$,$,(#11),#10);
#13=IFCCUSTOMTHING(1,2);
ENDSEC;
END-ISO-10303-21;
";

    #[test]
    fn test_parse_model() {
        let model = parse_model(HOUSE).unwrap();
        assert_eq!(model.len(), 4);

        let wall = model.get(EntityId(11)).unwrap();
        assert_eq!(wall.type_tag, "IfcWall");
        assert_eq!(wall.get("Name"), Some(&Value::from("W1")));
        assert_eq!(wall.get("PredefinedType"), Some(&Value::Enum("STANDARD".into())));

        let rel = model.get(EntityId(12)).unwrap();
        assert_eq!(rel.get("RelatingMaterial"), Some(&Value::Reference(EntityRef(10))));

        let custom = model.get(EntityId(13)).unwrap();
        assert_eq!(custom.type_tag, "IFCCUSTOMTHING");
        assert_eq!(custom.attributes[1].0, "Attribute2");
    }

    #[test]
    fn test_ifc2x3_attribute_names() {
        let text = "ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#1=IFCPERSON('jdoe','Doe','John',$,$,$,$,$);
#2=IFCORGANIZATION('ACME','Acme Ltd',$,$,$);
#14=IFCSPACE('3f9a',$,'1',$,$,$,$,'Living Room',.ELEMENT.,.INTERNAL.,$);
ENDSEC;
END-ISO-10303-21;
";
        let model = parse_model(text).unwrap();

        let person = model.get(EntityId(1)).unwrap();
        assert_eq!(person.get("Id"), Some(&Value::from("jdoe")));
        assert_eq!(person.get("Identification"), None);
        assert_eq!(model.get(EntityId(2)).unwrap().get("Id"), Some(&Value::from("ACME")));

        let space = model.get(EntityId(14)).unwrap();
        assert_eq!(space.get("LongName"), Some(&Value::from("Living Room")));
        assert_eq!(space.get("InteriorOrExteriorBoundary"), Some(&Value::Enum("INTERNAL".into())));
        assert_eq!(space.get("PredefinedType"), None);
    }

    #[test]
    fn test_instance_identity_beyond_reference_range() {
        let text = "ISO-10303-21;\nHEADER;\nENDSEC;\nDATA;\n#18446744073709551615=IFCWALL();\nENDSEC;\nEND-ISO-10303-21;\n";
        let err = parse_model(text).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 5, .. }), "{err:?}");
    }

    #[test]
    fn test_header_records() {
        let model = parse_model(HOUSE).unwrap();
        let header = model.header();
        let file_name = header.file_name.as_ref().unwrap();
        assert_eq!(file_name.name, Some("house.ifc".into()));
        assert_eq!(file_name.author, Some(vec!["Ana", "Bo"].into()));
        assert_eq!(header.schema_identifiers, Some(vec!["IFC4"].into()));
        assert_eq!(header.file_description.as_ref().unwrap().thema, None);
    }

    #[test]
    fn test_missing_header_entity() {
        let text = "ISO-10303-21;\nHEADER;\nFILE_SCHEMA(('IFC2X3'));\nENDSEC;\nDATA;\nENDSEC;\nEND-ISO-10303-21;\n";
        let model = parse_model(text).unwrap();
        assert!(model.is_empty());
        assert!(model.header().file_name.is_none());
        assert!(model.header().file_description.is_none());
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let text = "ISO-10303-21;\nHEADER;\nENDSEC;\nDATA;\n#1=IFCWALL('a';\nENDSEC;\nEND-ISO-10303-21;\n";
        let err = parse_model(text).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 5, .. }), "{err:?}");
    }

    #[test]
    fn test_duplicate_identity_is_invalid() {
        let text = "ISO-10303-21;\nHEADER;\nENDSEC;\nDATA;\n#1=IFCWALL();\n#1=IFCSLAB();\nENDSEC;\nEND-ISO-10303-21;\n";
        assert!(matches!(parse_model(text), Err(Error::InvalidModel(_))));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = read_model("/definitely/not/here.ifc").unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
    }
}
