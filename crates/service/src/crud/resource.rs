use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Id of the authenticated principal whose relations are being accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub i32);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Field identifiers of a resource type. Lookups and uniqueness checks name fields through this.
pub trait ResourceField: Copy + fmt::Debug + Send + Sync + 'static {
    fn name(self) -> &'static str;
}

/// A record living in an owner-scoped relation.
///
/// `Fields` is what creation needs, `Patch` is the all-optional update shape; both are
/// decoded from validated input, so their serde names must match the rule keys.
pub trait Resource: Serialize + Clone + Send + Sync + 'static {
    /// Relation name, used for routes, payload keys and messages.
    const RELATION: &'static str;
    /// Field used for `show`/`update`/`destroy` unless a caller picks another one.
    const ID_FIELD: Self::Field;

    type Field: ResourceField;
    type Fields: DeserializeOwned + Send;
    type Patch: DeserializeOwned + Default + Send;

    fn id(&self) -> i32;
    fn owner(&self) -> OwnerId;
    fn field_value(&self, field: Self::Field) -> FieldValue;
    fn apply(&mut self, patch: Self::Patch);
}

/// Value side of a `where(field, value)` lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(i64),
    Text(String),
    Bool(bool),
}

impl FieldValue {
    /// Scalar JSON values only; `null`, arrays and objects have no lookup form.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(FieldValue::Int),
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Bool(b) => Some(FieldValue::Bool(*b)),
            _ => None,
        }
    }

    /// Path segments: integers when they parse, text otherwise.
    pub fn from_path(segment: &str) -> Self {
        match segment.parse::<i64>() {
            Ok(n) => FieldValue::Int(n),
            Err(_) => FieldValue::Text(segment.to_string()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(n) => write!(f, "{n}"),
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self { FieldValue::Int(v.into()) }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self { FieldValue::Int(v) }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self { FieldValue::Text(v.to_string()) }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self { FieldValue::Text(v) }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self { FieldValue::Bool(v) }
}
