//! Attribute names for common IFC entity types.
//!
//! STEP instances carry positional arguments only; names come from the
//! schema. This table covers the spatial structure, building elements,
//! relationships, property and quantity sets, materials, ownership and basic
//! placement entities of IFC2X3 and IFC4.
//!
//! The main table follows IFC4. IFC2X3 records that only lack IFC4's trailing
//! attributes use its leading names. Types whose IFC2X3 attributes are named
//! or ordered differently (`IfcSpace`, `IfcPerson`, ...) have their own entry
//! in a separate override table, selected by the file's `FILE_SCHEMA`.

use std::sync::OnceLock;

use hashbrown::HashMap;

use crate::model::Value;

/// Schema release a file declares in `FILE_SCHEMA`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaVersion {
    Ifc2x3,
    /// IFC4 and its IFC4X* successors.
    #[default]
    Ifc4,
}

impl SchemaVersion {
    /// `IFC2X3` (and the older `IFC2X*` releases) or IFC4. Anything else
    /// reads as IFC4.
    pub fn from_identifier(identifier: &str) -> Self {
        if identifier.trim().to_ascii_uppercase().starts_with("IFC2X") {
            SchemaVersion::Ifc2x3
        } else {
            SchemaVersion::Ifc4
        }
    }

    /// Version from the raw `FILE_SCHEMA` argument: a list of identifiers or
    /// a single one. Only the first identifier counts.
    pub fn from_identifiers(identifiers: Option<&Value>) -> Self {
        let first = match identifiers {
            Some(Value::List(items)) => items.first().and_then(Value::as_str),
            Some(other) => other.as_str(),
            None => None,
        };
        first.map(Self::from_identifier).unwrap_or_default()
    }
}

/// One entity definition with single inheritance.
#[derive(Debug)]
pub struct EntityDef {
    pub name: &'static str,
    pub parent: Option<&'static str>,
    /// Attributes declared by this type, excluding inherited ones.
    pub own: &'static [&'static str],
}

const fn def(
    name: &'static str,
    parent: Option<&'static str>,
    own: &'static [&'static str],
) -> EntityDef {
    EntityDef { name, parent, own }
}

const ROOT: Option<&str> = Some("IfcRoot");

static DEFINITIONS: &[EntityDef] = &[
    // Kernel
    def("IfcRoot", None, &["GlobalId", "OwnerHistory", "Name", "Description"]),
    def("IfcObjectDefinition", ROOT, &[]),
    def("IfcObject", Some("IfcObjectDefinition"), &["ObjectType"]),
    def("IfcContext", Some("IfcObjectDefinition"), &["ObjectType", "LongName", "Phase", "RepresentationContexts", "UnitsInContext"]),
    def("IfcProject", Some("IfcContext"), &[]),
    def("IfcProduct", Some("IfcObject"), &["ObjectPlacement", "Representation"]),
    def("IfcTypeObject", Some("IfcObjectDefinition"), &["ApplicableOccurrence", "HasPropertySets"]),
    def("IfcTypeProduct", Some("IfcTypeObject"), &["RepresentationMaps", "Tag"]),
    def("IfcElementType", Some("IfcTypeProduct"), &["ElementType"]),
    def("IfcWallType", Some("IfcElementType"), &["PredefinedType"]),
    def("IfcSlabType", Some("IfcElementType"), &["PredefinedType"]),
    def("IfcDoorType", Some("IfcElementType"), &["PredefinedType", "OperationType", "ParameterTakesPrecedence", "UserDefinedOperationType"]),
    def("IfcWindowType", Some("IfcElementType"), &["PredefinedType", "PartitioningType", "ParameterTakesPrecedence", "UserDefinedPartitioningType"]),
    // Spatial structure
    def("IfcSpatialElement", Some("IfcProduct"), &["LongName"]),
    def("IfcSpatialStructureElement", Some("IfcSpatialElement"), &["CompositionType"]),
    def("IfcSite", Some("IfcSpatialStructureElement"), &["RefLatitude", "RefLongitude", "RefElevation", "LandTitleNumber", "SiteAddress"]),
    def("IfcBuilding", Some("IfcSpatialStructureElement"), &["ElevationOfRefHeight", "ElevationOfTerrain", "BuildingAddress"]),
    def("IfcBuildingStorey", Some("IfcSpatialStructureElement"), &["Elevation"]),
    def("IfcSpace", Some("IfcSpatialStructureElement"), &["PredefinedType", "ElevationWithFlooring"]),
    // Elements
    def("IfcElement", Some("IfcProduct"), &["Tag"]),
    def("IfcBuildingElement", Some("IfcElement"), &[]),
    def("IfcBuiltElement", Some("IfcElement"), &[]),
    def("IfcWall", Some("IfcBuildingElement"), &["PredefinedType"]),
    def("IfcWallStandardCase", Some("IfcWall"), &[]),
    def("IfcCurtainWall", Some("IfcBuildingElement"), &["PredefinedType"]),
    def("IfcSlab", Some("IfcBuildingElement"), &["PredefinedType"]),
    def("IfcRoof", Some("IfcBuildingElement"), &["PredefinedType"]),
    def("IfcBeam", Some("IfcBuildingElement"), &["PredefinedType"]),
    def("IfcColumn", Some("IfcBuildingElement"), &["PredefinedType"]),
    def("IfcMember", Some("IfcBuildingElement"), &["PredefinedType"]),
    def("IfcPlate", Some("IfcBuildingElement"), &["PredefinedType"]),
    def("IfcFooting", Some("IfcBuildingElement"), &["PredefinedType"]),
    def("IfcStair", Some("IfcBuildingElement"), &["PredefinedType"]),
    def("IfcStairFlight", Some("IfcBuildingElement"), &["NumberOfRisers", "NumberOfTreads", "RiserHeight", "TreadLength", "PredefinedType"]),
    def("IfcRailing", Some("IfcBuildingElement"), &["PredefinedType"]),
    def("IfcCovering", Some("IfcBuildingElement"), &["PredefinedType"]),
    def("IfcBuildingElementProxy", Some("IfcBuildingElement"), &["PredefinedType"]),
    def("IfcDoor", Some("IfcBuildingElement"), &["OverallHeight", "OverallWidth", "PredefinedType", "OperationType", "UserDefinedOperationType"]),
    def("IfcWindow", Some("IfcBuildingElement"), &["OverallHeight", "OverallWidth", "PredefinedType", "PartitioningType", "UserDefinedPartitioningType"]),
    def("IfcFurnishingElement", Some("IfcElement"), &[]),
    def("IfcFurniture", Some("IfcFurnishingElement"), &["PredefinedType"]),
    def("IfcFeatureElement", Some("IfcElement"), &[]),
    def("IfcFeatureElementSubtraction", Some("IfcFeatureElement"), &[]),
    def("IfcOpeningElement", Some("IfcFeatureElementSubtraction"), &["PredefinedType"]),
    // Relationships
    def("IfcRelationship", ROOT, &[]),
    def("IfcRelDecomposes", Some("IfcRelationship"), &[]),
    def("IfcRelAggregates", Some("IfcRelDecomposes"), &["RelatingObject", "RelatedObjects"]),
    def("IfcRelNests", Some("IfcRelDecomposes"), &["RelatingObject", "RelatedObjects"]),
    def("IfcRelConnects", Some("IfcRelationship"), &[]),
    def("IfcRelContainedInSpatialStructure", Some("IfcRelConnects"), &["RelatedElements", "RelatingStructure"]),
    def("IfcRelVoidsElement", Some("IfcRelConnects"), &["RelatingBuildingElement", "RelatedOpeningElement"]),
    def("IfcRelFillsElement", Some("IfcRelConnects"), &["RelatingOpeningElement", "RelatedBuildingElement"]),
    def("IfcRelSpaceBoundary", Some("IfcRelConnects"), &["RelatingSpace", "RelatedBuildingElement", "ConnectionGeometry", "PhysicalOrVirtualBoundary", "InternalOrExternalBoundary"]),
    def("IfcRelDefines", Some("IfcRelationship"), &[]),
    def("IfcRelDefinesByProperties", Some("IfcRelDefines"), &["RelatedObjects", "RelatingPropertyDefinition"]),
    def("IfcRelDefinesByType", Some("IfcRelDefines"), &["RelatedObjects", "RelatingType"]),
    def("IfcRelAssociates", Some("IfcRelationship"), &["RelatedObjects"]),
    def("IfcRelAssociatesMaterial", Some("IfcRelAssociates"), &["RelatingMaterial"]),
    // Properties and quantities
    def("IfcPropertyDefinition", ROOT, &[]),
    def("IfcPropertySetDefinition", Some("IfcPropertyDefinition"), &[]),
    def("IfcPropertySet", Some("IfcPropertySetDefinition"), &["HasProperties"]),
    def("IfcElementQuantity", Some("IfcPropertySetDefinition"), &["MethodOfMeasurement", "Quantities"]),
    def("IfcProperty", None, &["Name", "Description"]),
    def("IfcSimpleProperty", Some("IfcProperty"), &[]),
    def("IfcPropertySingleValue", Some("IfcSimpleProperty"), &["NominalValue", "Unit"]),
    def("IfcPropertyEnumeratedValue", Some("IfcSimpleProperty"), &["EnumerationValues", "EnumerationReference"]),
    def("IfcPhysicalQuantity", None, &["Name", "Description"]),
    def("IfcPhysicalSimpleQuantity", Some("IfcPhysicalQuantity"), &["Unit"]),
    def("IfcQuantityLength", Some("IfcPhysicalSimpleQuantity"), &["LengthValue", "Formula"]),
    def("IfcQuantityArea", Some("IfcPhysicalSimpleQuantity"), &["AreaValue", "Formula"]),
    def("IfcQuantityVolume", Some("IfcPhysicalSimpleQuantity"), &["VolumeValue", "Formula"]),
    def("IfcQuantityCount", Some("IfcPhysicalSimpleQuantity"), &["CountValue", "Formula"]),
    def("IfcQuantityWeight", Some("IfcPhysicalSimpleQuantity"), &["WeightValue", "Formula"]),
    // Materials
    def("IfcMaterial", None, &["Name", "Description", "Category"]),
    def("IfcMaterialList", None, &["Materials"]),
    def("IfcMaterialLayer", None, &["Material", "LayerThickness", "IsVentilated", "Name", "Description", "Category", "Priority"]),
    def("IfcMaterialLayerSet", None, &["MaterialLayers", "LayerSetName", "Description"]),
    def("IfcMaterialLayerSetUsage", None, &["ForLayerSet", "LayerSetDirection", "DirectionSense", "OffsetFromReferenceLine", "ReferenceExtent"]),
    // Ownership and actors
    def("IfcOwnerHistory", None, &["OwningUser", "OwningApplication", "State", "ChangeAction", "LastModifiedDate", "LastModifyingUser", "LastModifyingApplication", "CreationDate"]),
    def("IfcPersonAndOrganization", None, &["ThePerson", "TheOrganization", "Roles"]),
    def("IfcPerson", None, &["Identification", "FamilyName", "GivenName", "MiddleNames", "PrefixTitles", "SuffixTitles", "Roles", "Addresses"]),
    def("IfcOrganization", None, &["Identification", "Name", "Description", "Roles", "Addresses"]),
    def("IfcApplication", None, &["ApplicationDeveloper", "Version", "ApplicationFullName", "ApplicationIdentifier"]),
    def("IfcPostalAddress", None, &["Purpose", "Description", "UserDefinedPurpose", "InternalLocation", "AddressLines", "PostalBox", "Town", "Region", "PostalCode", "Country"]),
    // Units
    def("IfcUnitAssignment", None, &["Units"]),
    def("IfcSIUnit", None, &["Dimensions", "UnitType", "Prefix", "Name"]),
    def("IfcDimensionalExponents", None, &["LengthExponent", "MassExponent", "TimeExponent", "ElectricCurrentExponent", "ThermodynamicTemperatureExponent", "AmountOfSubstanceExponent", "LuminousIntensityExponent"]),
    // Geometry and placement
    def("IfcCartesianPoint", None, &["Coordinates"]),
    def("IfcDirection", None, &["DirectionRatios"]),
    def("IfcAxis2Placement2D", None, &["Location", "RefDirection"]),
    def("IfcAxis2Placement3D", None, &["Location", "Axis", "RefDirection"]),
    def("IfcLocalPlacement", None, &["PlacementRelTo", "RelativePlacement"]),
    def("IfcProductDefinitionShape", None, &["Name", "Description", "Representations"]),
    def("IfcShapeRepresentation", None, &["ContextOfItems", "RepresentationIdentifier", "RepresentationType", "Items"]),
    def("IfcGeometricRepresentationContext", None, &["ContextIdentifier", "ContextType", "CoordinateSpaceDimension", "Precision", "WorldCoordinateSystem", "TrueNorth"]),
    def("IfcGeometricRepresentationSubContext", None, &["ContextIdentifier", "ContextType", "CoordinateSpaceDimension", "Precision", "WorldCoordinateSystem", "TrueNorth", "ParentContext", "TargetScale", "TargetView", "UserDefinedTargetView"]),
    def("IfcPolyline", None, &["Points"]),
    def("IfcExtrudedAreaSolid", None, &["SweptArea", "Position", "ExtrudedDirection", "Depth"]),
    def("IfcRectangleProfileDef", None, &["ProfileType", "ProfileName", "Position", "XDim", "YDim"]),
];

/// IFC2X3 own-attribute lists that differ from IFC4 beyond trailing additions.
static IFC2X3_OVERRIDES: &[EntityDef] = &[
    def("IfcSpace", Some("IfcSpatialStructureElement"), &["InteriorOrExteriorBoundary", "ElevationWithFlooring"]),
    def("IfcRoof", Some("IfcBuildingElement"), &["ShapeType"]),
    def("IfcStair", Some("IfcBuildingElement"), &["ShapeType"]),
    def("IfcStairFlight", Some("IfcBuildingElement"), &["NumberOfRiser", "NumberOfTreads", "RiserHeight", "TreadLength"]),
    def("IfcBuildingElementProxy", Some("IfcBuildingElement"), &["CompositionType"]),
    def("IfcPerson", None, &["Id", "FamilyName", "GivenName", "MiddleNames", "PrefixTitles", "SuffixTitles", "Roles", "Addresses"]),
    def("IfcOrganization", None, &["Id", "Name", "Description", "Roles", "Addresses"]),
];

fn registry() -> &'static HashMap<String, &'static EntityDef> {
    static REGISTRY: OnceLock<HashMap<String, &'static EntityDef>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        DEFINITIONS
            .iter()
            .map(|d| (d.name.to_ascii_uppercase(), d))
            .collect()
    })
}

pub fn lookup(type_tag: &str) -> Option<&'static EntityDef> {
    registry().get(&type_tag.to_ascii_uppercase()).copied()
}

/// Schema spelling of a type tag (`IFCWALL` → `IfcWall`), if known.
pub fn canonical_name(type_tag: &str) -> Option<&'static str> {
    lookup(type_tag).map(|d| d.name)
}

/// Full positional attribute list for the given schema release, inherited
/// attributes first.
pub fn attribute_names(type_tag: &str, version: SchemaVersion) -> Option<Vec<&'static str>> {
    let mut chain = Vec::new();
    let mut current = lookup(type_tag);
    while let Some(def) = current {
        chain.push(def);
        current = def.parent.and_then(lookup);
    }
    if chain.is_empty() {
        return None;
    }
    Some(
        chain
            .iter()
            .rev()
            .flat_map(|d| own_attributes(d, version).iter().copied())
            .collect(),
    )
}

fn own_attributes(entity: &EntityDef, version: SchemaVersion) -> &'static [&'static str] {
    match version {
        SchemaVersion::Ifc2x3 => IFC2X3_OVERRIDES
            .iter()
            .find(|o| o.name == entity.name)
            .map_or(entity.own, |o| o.own),
        SchemaVersion::Ifc4 => entity.own,
    }
}

/// Name for a positional argument with no schema name (1-based).
pub fn positional_name(index: usize) -> String {
    format!("Attribute{}", index + 1)
}
