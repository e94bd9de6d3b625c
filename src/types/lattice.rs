//! Lattice types, schema conversion and compatibility.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primitive kinds, declared in specificity order.
///
/// The derived `Ord` is the fixed total order used for tie-breaking:
/// `unknown < null < boolean < number < string < object < array < function < any`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveKind {
    Unknown,
    Null,
    Boolean,
    Number,
    String,
    Object,
    Array,
    Function,
    Any,
}

impl PrimitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::Unknown => "unknown",
            PrimitiveKind::Null => "null",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Number => "number",
            PrimitiveKind::String => "string",
            PrimitiveKind::Object => "object",
            PrimitiveKind::Array => "array",
            PrimitiveKind::Function => "function",
            PrimitiveKind::Any => "any",
        }
    }

    /// Parse a kind label. `integer` is folded into `number`.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "unknown" => PrimitiveKind::Unknown,
            "null" => PrimitiveKind::Null,
            "boolean" => PrimitiveKind::Boolean,
            "number" | "integer" => PrimitiveKind::Number,
            "string" => PrimitiveKind::String,
            "object" => PrimitiveKind::Object,
            "array" => PrimitiveKind::Array,
            "function" => PrimitiveKind::Function,
            "any" => PrimitiveKind::Any,
            _ => return None,
        };
        Some(kind)
    }

    /// Position in the specificity order.
    pub fn specificity(&self) -> u8 {
        *self as u8
    }

    /// Kinds that make any comparison succeed.
    fn is_open(&self) -> bool {
        matches!(self, PrimitiveKind::Any | PrimitiveKind::Unknown)
    }

    /// The kind of a JSON value, as used for `enum` members.
    fn of_value(value: &Value) -> Self {
        match value {
            Value::Null => PrimitiveKind::Null,
            Value::Bool(_) => PrimitiveKind::Boolean,
            Value::Number(_) => PrimitiveKind::Number,
            Value::String(_) => PrimitiveKind::String,
            Value::Array(_) => PrimitiveKind::Array,
            Value::Object(_) => PrimitiveKind::Object,
        }
    }
}

/// A structural type descriptor.
///
/// Unions built through [`union_of`] are always flat, de-duplicated and
/// collapsed to their single member when only one remains.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LatticeType {
    Primitive(PrimitiveKind),
    Object {
        properties: BTreeMap<String, LatticeType>,
    },
    Array {
        items: Box<LatticeType>,
    },
    Union {
        options: Vec<LatticeType>,
    },
}

impl LatticeType {
    pub fn unknown() -> Self {
        LatticeType::Primitive(PrimitiveKind::Unknown)
    }

    pub fn object() -> Self {
        LatticeType::Object {
            properties: BTreeMap::new(),
        }
    }

    pub fn array(items: LatticeType) -> Self {
        LatticeType::Array {
            items: Box::new(items),
        }
    }

    /// Build a type from a kind label (`"string"`, `"number"`, ...).
    /// Unrecognised labels yield `unknown`.
    pub fn from_kind_name(name: &str) -> Self {
        match PrimitiveKind::from_name(name) {
            Some(PrimitiveKind::Object) => Self::object(),
            Some(PrimitiveKind::Array) => Self::array(Self::unknown()),
            Some(kind) => LatticeType::Primitive(kind),
            None => Self::unknown(),
        }
    }

    /// The kind label of this type's outermost constructor.
    pub fn kind(&self) -> &'static str {
        match self {
            LatticeType::Primitive(kind) => kind.as_str(),
            LatticeType::Object { .. } => "object",
            LatticeType::Array { .. } => "array",
            LatticeType::Union { .. } => "union",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, LatticeType::Primitive(PrimitiveKind::Unknown))
    }

    /// Flatten to the set of primitive kinds this type may take.
    pub fn primitive_kinds(&self) -> BTreeSet<PrimitiveKind> {
        let mut kinds = BTreeSet::new();
        self.collect_kinds(&mut kinds);
        kinds
    }

    fn collect_kinds(&self, out: &mut BTreeSet<PrimitiveKind>) {
        match self {
            LatticeType::Primitive(kind) => {
                out.insert(*kind);
            }
            LatticeType::Object { .. } => {
                out.insert(PrimitiveKind::Object);
            }
            LatticeType::Array { .. } => {
                out.insert(PrimitiveKind::Array);
            }
            LatticeType::Union { options } => {
                for option in options {
                    option.collect_kinds(out);
                }
            }
        }
    }

    /// Specificity rank; a union ranks as its most specific member.
    pub fn specificity(&self) -> u8 {
        match self {
            LatticeType::Primitive(kind) => kind.specificity(),
            LatticeType::Object { .. } => PrimitiveKind::Object.specificity(),
            LatticeType::Array { .. } => PrimitiveKind::Array.specificity(),
            LatticeType::Union { options } => options
                .iter()
                .map(LatticeType::specificity)
                .max()
                .unwrap_or(0),
        }
    }

    /// Read a serialized descriptor (`{"kind": ...}`) back into a type.
    pub fn from_descriptor(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let kind = obj.get("kind")?.as_str()?;
        let ty = match kind {
            "union" => {
                let options = obj
                    .get("options")?
                    .as_array()?
                    .iter()
                    .map(Self::from_descriptor)
                    .collect::<Option<Vec<_>>>()?;
                union_of(options)
            }
            "object" => {
                let mut properties = BTreeMap::new();
                if let Some(props) = obj.get("properties").and_then(Value::as_object) {
                    for (name, prop) in props {
                        properties.insert(name.clone(), Self::from_descriptor(prop)?);
                    }
                }
                LatticeType::Object { properties }
            }
            "array" => {
                let items = match obj.get("items") {
                    Some(items) => Self::from_descriptor(items)?,
                    None => Self::unknown(),
                };
                Self::array(items)
            }
            other => LatticeType::Primitive(PrimitiveKind::from_name(other)?),
        };
        Some(ty)
    }
}

impl From<PrimitiveKind> for LatticeType {
    fn from(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Object => LatticeType::object(),
            PrimitiveKind::Array => LatticeType::array(LatticeType::unknown()),
            other => LatticeType::Primitive(other),
        }
    }
}

impl fmt::Display for LatticeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatticeType::Primitive(kind) => f.write_str(kind.as_str()),
            LatticeType::Object { properties } if properties.is_empty() => f.write_str("object"),
            LatticeType::Object { properties } => {
                let names: Vec<_> = properties.keys().map(String::as_str).collect();
                write!(f, "object{{{}}}", names.join(", "))
            }
            LatticeType::Array { items } if items.is_unknown() => f.write_str("array"),
            LatticeType::Array { items } => write!(f, "array<{}>", items),
            LatticeType::Union { options } => {
                for (i, option) in options.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{}", option)?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for LatticeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("kind", self.kind())?;
        match self {
            LatticeType::Primitive(_) => {}
            LatticeType::Object { properties } => {
                if !properties.is_empty() {
                    map.serialize_entry("properties", properties)?;
                }
            }
            LatticeType::Array { items } => {
                if !items.is_unknown() {
                    map.serialize_entry("items", items)?;
                }
            }
            LatticeType::Union { options } => {
                map.serialize_entry("options", options)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LatticeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        LatticeType::from_descriptor(&value)
            .ok_or_else(|| de::Error::custom("invalid lattice type descriptor"))
    }
}

/// Build a normalized union: nested unions flattened, duplicates removed,
/// members ordered by (specificity, rendering), single members collapsed.
pub fn union_of(types: impl IntoIterator<Item = LatticeType>) -> LatticeType {
    let mut flat = Vec::new();
    for ty in types {
        flatten_into(ty, &mut flat);
    }
    flat.sort_by_cached_key(|ty| (ty.specificity(), ty.to_string(), ty.clone()));
    flat.dedup();

    match flat.len() {
        0 => LatticeType::unknown(),
        1 => flat.remove(0),
        _ => LatticeType::Union { options: flat },
    }
}

fn flatten_into(ty: LatticeType, out: &mut Vec<LatticeType>) {
    match ty {
        LatticeType::Union { options } => {
            for option in options {
                flatten_into(option, out);
            }
        }
        other => out.push(other),
    }
}

/// Convert a schema fragment to a lattice type.
///
/// `anyOf`/`oneOf`/`allOf`, `enum` and `type` arrays all normalize to a
/// union of member kinds; `nullable: true` adds `null`. Malformed nodes
/// yield `unknown`.
pub fn schema_to_lattice(schema: &Value) -> LatticeType {
    let Some(node) = schema.as_object() else {
        return LatticeType::unknown();
    };

    let base = if let Some(members) = ["anyOf", "oneOf", "allOf"]
        .iter()
        .find_map(|key| node.get(*key).and_then(Value::as_array))
    {
        union_of(members.iter().map(schema_to_lattice))
    } else if let Some(values) = node.get("enum").and_then(Value::as_array) {
        union_of(
            values
                .iter()
                .map(|v| LatticeType::from(PrimitiveKind::of_value(v))),
        )
    } else {
        match node.get("type") {
            Some(Value::String(name)) => type_from_name(name, node),
            Some(Value::Array(names)) => union_of(names.iter().map(|name| match name.as_str() {
                Some(name) => type_from_name(name, node),
                None => LatticeType::unknown(),
            })),
            Some(_) => LatticeType::unknown(),
            None if node.contains_key("properties") => object_from_schema(node),
            None if node.contains_key("items") => array_from_schema(node),
            None => LatticeType::unknown(),
        }
    };

    if node.get("nullable").and_then(Value::as_bool) == Some(true) {
        union_of([base, LatticeType::Primitive(PrimitiveKind::Null)])
    } else {
        base
    }
}

fn type_from_name(name: &str, node: &serde_json::Map<String, Value>) -> LatticeType {
    match PrimitiveKind::from_name(name) {
        Some(PrimitiveKind::Object) => object_from_schema(node),
        Some(PrimitiveKind::Array) => array_from_schema(node),
        Some(kind) => LatticeType::Primitive(kind),
        None => LatticeType::unknown(),
    }
}

fn object_from_schema(node: &serde_json::Map<String, Value>) -> LatticeType {
    let properties = node
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, prop)| (name.clone(), schema_to_lattice(prop)))
                .collect()
        })
        .unwrap_or_default();
    LatticeType::Object { properties }
}

fn array_from_schema(node: &serde_json::Map<String, Value>) -> LatticeType {
    let items = node
        .get("items")
        .map(schema_to_lattice)
        .unwrap_or_else(LatticeType::unknown);
    LatticeType::array(items)
}

/// Decide whether a value of type `actual` may flow where `expected` is declared.
///
/// `any`/`unknown` on either side is always compatible; otherwise every
/// primitive kind of `actual` must also be a kind of `expected`.
pub fn are_types_compatible(expected: &LatticeType, actual: &LatticeType) -> bool {
    let expected_kinds = expected.primitive_kinds();
    let actual_kinds = actual.primitive_kinds();

    if expected_kinds.iter().any(PrimitiveKind::is_open)
        || actual_kinds.iter().any(PrimitiveKind::is_open)
    {
        return true;
    }
    actual_kinds.is_subset(&expected_kinds)
}

/// Pick the more specific of two conflicting guesses; ties keep `a`.
///
/// Only for reconciling guesses. Compatibility never consults specificity.
pub fn more_specific(a: LatticeType, b: LatticeType) -> LatticeType {
    if b.specificity() > a.specificity() { b } else { a }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn ty(name: &str) -> LatticeType {
        LatticeType::from_kind_name(name)
    }

    #[test]
    fn test_type_array_becomes_union() {
        let t = schema_to_lattice(&json!({ "type": ["string", "number"] }));
        assert_eq!(t.to_string(), "number | string");
    }

    #[test]
    fn test_nullable_adds_null() {
        let t = schema_to_lattice(&json!({ "type": "string", "nullable": true }));
        assert_eq!(t.to_string(), "null | string");
        let t = schema_to_lattice(&json!({ "type": ["string", "null"], "nullable": true }));
        assert_eq!(t.primitive_kinds().len(), 2);
    }

    #[test]
    fn test_combinators_and_enum() {
        let t = schema_to_lattice(&json!({
            "anyOf": [ { "type": "boolean" }, { "oneOf": [ { "type": "string" }, { "type": "boolean" } ] } ]
        }));
        assert_eq!(t.to_string(), "boolean | string");

        let t = schema_to_lattice(&json!({ "enum": ["a", "b", 3] }));
        assert_eq!(t.to_string(), "number | string");

        let t = schema_to_lattice(&json!({ "enum": ["only"] }));
        assert_eq!(t, ty("string"));
    }

    #[test]
    fn test_object_and_array_recurse() {
        let t = schema_to_lattice(&json!({
            "type": "object",
            "properties": { "title": { "type": "string" }, "tags": { "type": "array", "items": { "type": "string" } } }
        }));
        assert_eq!(t.to_string(), "object{tags, title}");
        let LatticeType::Object { properties } = &t else {
            panic!("expected object, got {t:?}");
        };
        assert_eq!(properties["tags"].to_string(), "array<string>");
    }

    #[rstest]
    #[case(json!("string"))]
    #[case(json!(null))]
    #[case(json!({}))]
    #[case(json!({ "type": "whatever" }))]
    #[case(json!({ "type": 7 }))]
    fn test_malformed_schema_is_unknown(#[case] schema: Value) {
        assert!(schema_to_lattice(&schema).is_unknown());
    }

    #[test]
    fn test_union_flattens_and_collapses() {
        let nested = LatticeType::Union {
            options: vec![ty("string"), ty("number")],
        };
        let u = union_of([nested, ty("string"), ty("boolean")]);
        let LatticeType::Union { options } = &u else {
            panic!("expected union");
        };
        assert_eq!(options.len(), 3);
        assert!(options.iter().all(|o| !matches!(o, LatticeType::Union { .. })));
        assert_eq!(union_of([ty("string"), ty("string")]), ty("string"));
        assert!(union_of([]).is_unknown());
    }

    #[test]
    fn test_compatibility() {
        let union = schema_to_lattice(&json!({ "type": ["string", "number"] }));
        assert!(are_types_compatible(&union, &ty("string")));
        assert!(are_types_compatible(&union, &ty("number")));
        assert!(!are_types_compatible(&union, &ty("boolean")));
        assert!(!are_types_compatible(&ty("boolean"), &ty("string")));
        assert!(!are_types_compatible(&ty("string"), &union));
    }

    #[rstest]
    #[case("string")]
    #[case("object")]
    #[case("function")]
    #[case("null")]
    fn test_unknown_and_any_always_compatible(#[case] other: &str) {
        assert!(are_types_compatible(&ty("unknown"), &ty(other)));
        assert!(are_types_compatible(&ty(other), &ty("unknown")));
        assert!(are_types_compatible(&ty("any"), &ty(other)));
        assert!(are_types_compatible(&ty(other), &ty("any")));
    }

    #[test]
    fn test_specificity_order() {
        let order = [
            "unknown", "null", "boolean", "number", "string", "object", "array", "function", "any",
        ];
        for pair in order.windows(2) {
            assert!(ty(pair[0]).specificity() < ty(pair[1]).specificity());
        }
        assert_eq!(more_specific(ty("unknown"), ty("number")), ty("number"));
        assert_eq!(more_specific(ty("string"), ty("boolean")), ty("string"));
        assert_eq!(more_specific(ty("number"), ty("number")), ty("number"));
    }

    #[test]
    fn test_descriptor_serialization() {
        let t = schema_to_lattice(&json!({ "type": "array", "items": { "type": ["boolean", "null"] } }));
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(
            value,
            json!({ "kind": "array", "items": { "kind": "union", "options": [ { "kind": "null" }, { "kind": "boolean" } ] } })
        );
        let back: LatticeType = serde_json::from_value(value).unwrap();
        assert_eq!(back, t);
        assert_eq!(serde_json::to_value(ty("number")).unwrap(), json!({ "kind": "number" }));
    }
}
