//! # Property Registries
//!
//! Typed key/value registries backing the three configuration groups.
//! Every value keeps the kind it was loaded with; a mutation parses the raw
//! text into that kind or fails, it never overwrites with a plain string.

use crate::domain::errors::PropertyError;
use serde_json::Value;
use std::fmt;

/// Semantic type of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Bool,
    Int,
    Float,
    Text,
}

impl PropertyKind {
    /// Parses `raw` into a value of this kind.
    pub fn parse(self, raw: &str) -> Option<PropertyValue> {
        match self {
            PropertyKind::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" => Some(PropertyValue::Bool(true)),
                "false" => Some(PropertyValue::Bool(false)),
                _ => None,
            },
            PropertyKind::Int => raw.parse::<i64>().ok().map(PropertyValue::Int),
            PropertyKind::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(PropertyValue::Float),
            PropertyKind::Text => Some(PropertyValue::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyKind::Bool => "boolean",
            PropertyKind::Int => "integer",
            PropertyKind::Float => "number",
            PropertyKind::Text => "string",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Bool(_) => PropertyKind::Bool,
            PropertyValue::Int(_) => PropertyKind::Int,
            PropertyValue::Float(_) => PropertyKind::Float,
            PropertyValue::Text(_) => PropertyKind::Text,
        }
    }

    /// Converts a JSON scalar. Arrays, objects and `null` have no kind.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(PropertyValue::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(PropertyValue::Int)
                .or_else(|| n.is_f64().then(|| n.as_f64()).flatten().map(PropertyValue::Float)),
            Value::String(s) => Some(PropertyValue::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Int(i) => write!(f, "{i}"),
            PropertyValue::Float(x) => write!(f, "{x}"),
            PropertyValue::Text(s) => f.write_str(s),
        }
    }
}

/// Which of the three registries a command or lookup addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Bot,
    Source,
    Query,
}

impl GroupKind {
    /// Chat command that reads and mutates this group.
    pub fn command(self) -> &'static str {
        match self {
            GroupKind::Bot => "botprop",
            GroupKind::Source => "adpref",
            GroupKind::Query => "searchparam",
        }
    }

    /// Name of the JSON document the group is loaded from.
    pub fn document(self) -> &'static str {
        match self {
            GroupKind::Bot => crate::domain::paths::BOT_PROPS_FILE,
            GroupKind::Source => crate::domain::paths::AD_PREFS_FILE,
            GroupKind::Query => crate::domain::paths::SEARCH_PARAMS_FILE,
        }
    }
}

/// Result of a successful typed set.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    pub key: String,
    pub old: PropertyValue,
    pub new: PropertyValue,
}

/// Ordered registry of scalar properties. Keys are fixed at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyGroup {
    entries: Vec<(String, PropertyValue)>,
}

impl PropertyGroup {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builds a group from a flat JSON object, keeping document order.
    pub fn from_json(document: &Value) -> Result<Self, String> {
        let object = document
            .as_object()
            .ok_or_else(|| "expected a JSON object at the top level".to_string())?;

        let mut group = Self::new();
        for (key, value) in object {
            let value = PropertyValue::from_json(value)
                .ok_or_else(|| format!("property '{key}' must be a boolean, number or string"))?;
            group.insert(key, value);
        }
        Ok(group)
    }

    /// Registers `key`, replacing any existing value. Load-time only.
    pub fn insert(&mut self, key: &str, value: PropertyValue) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Result<&PropertyValue, PropertyError> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| PropertyError::UnknownProperty {
                key: key.to_string(),
            })
    }

    /// Parses `raw` into the kind of the existing value and stores it.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<PropertyChange, PropertyError> {
        let slot = self
            .entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| PropertyError::UnknownProperty {
                key: key.to_string(),
            })?;

        let expected = slot.kind();
        let new = expected
            .parse(raw)
            .ok_or_else(|| PropertyError::TypeMismatch {
                key: key.to_string(),
                expected,
                raw: raw.to_string(),
            })?;

        let old = std::mem::replace(slot, new.clone());
        Ok(PropertyChange {
            key: key.to_string(),
            old,
            new,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> PropertyGroup {
        PropertyGroup::from_json(
            &json!({"keywords": "road bike", "radius": 25, "maxPrice": 450.5, "hasImages": true}),
        )
        .unwrap()
    }

    #[test]
    fn test_load_keeps_document_order_and_kinds() {
        let group = sample();
        let keys: Vec<_> = group.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["keywords", "radius", "maxPrice", "hasImages"]);
        assert_eq!(group.get("radius").unwrap().kind(), PropertyKind::Int);
        assert_eq!(group.get("maxPrice").unwrap().kind(), PropertyKind::Float);
        assert_eq!(group.get("hasImages").unwrap().kind(), PropertyKind::Bool);
    }

    #[test]
    fn test_load_rejects_non_scalars() {
        assert!(PropertyGroup::from_json(&json!({"a": null})).is_err());
        assert!(PropertyGroup::from_json(&json!({"a": [1]})).is_err());
        assert!(PropertyGroup::from_json(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_set_preserves_kind() {
        let mut group = sample();

        let change = group.set("radius", "50").unwrap();
        assert_eq!(change.old, PropertyValue::Int(25));
        assert_eq!(change.new, PropertyValue::Int(50));

        let change = group.set("hasImages", "FALSE").unwrap();
        assert_eq!(change.new, PropertyValue::Bool(false));

        let change = group.set("maxPrice", "600").unwrap();
        assert_eq!(change.new, PropertyValue::Float(600.0));

        let change = group.set("keywords", "42").unwrap();
        assert_eq!(change.new, PropertyValue::Text("42".to_string()));
    }

    #[test]
    fn test_set_type_mismatch_leaves_value() {
        let mut group = sample();
        let err = group.set("radius", "far").unwrap_err();
        assert_eq!(
            err,
            PropertyError::TypeMismatch {
                key: "radius".to_string(),
                expected: PropertyKind::Int,
                raw: "far".to_string(),
            }
        );
        assert_eq!(group.get("radius").unwrap(), &PropertyValue::Int(25));
        assert!(group.set("maxPrice", "NaN").is_err());
    }

    #[test]
    fn test_unknown_key_never_created() {
        let mut group = sample();
        assert!(matches!(
            group.set("colour", "red"),
            Err(PropertyError::UnknownProperty { .. })
        ));
        assert!(!group.contains("colour"));
        assert!(group.get("colour").is_err());
        assert_eq!(group.len(), 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(PropertyValue::Float(2.5).to_string(), "2.5");
        assert_eq!(PropertyValue::Int(-1).to_string(), "-1");
        assert_eq!(PropertyKind::Bool.to_string(), "boolean");
    }
}
