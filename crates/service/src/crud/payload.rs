use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Result body of a CRUD operation: an optional message plus data keyed by relation name,
/// e.g. `{"message": "Notes creado correctamente", "notes": {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct CrudPayload<T> {
    message: Option<String>,
    relation: &'static str,
    data: Option<T>,
}

impl<T> CrudPayload<T> {
    /// `{relation: data}`
    pub fn keyed(relation: &'static str, data: T) -> Self {
        Self { message: None, relation, data: Some(data) }
    }

    /// `{message, relation: data}`
    pub fn with_message(relation: &'static str, message: impl Into<String>, data: T) -> Self {
        Self { message: Some(message.into()), relation, data: Some(data) }
    }

    /// `{message}`
    pub fn message_only(relation: &'static str, message: impl Into<String>) -> Self {
        Self { message: Some(message.into()), relation, data: None }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn relation(&self) -> &'static str {
        self.relation
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl<T: Serialize> Serialize for CrudPayload<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.message.is_some() as usize + self.data.is_some() as usize;
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(message) = &self.message {
            map.serialize_entry("message", message)?;
        }
        if let Some(data) = &self.data {
            map.serialize_entry(self.relation, data)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_under_relation_key() {
        let p = CrudPayload::with_message("notes", "Notes creado correctamente", json!({"id": 1}));
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({"message": "Notes creado correctamente", "notes": {"id": 1}})
        );
        let listing = CrudPayload::keyed("notes", Vec::<i32>::new());
        assert_eq!(serde_json::to_value(&listing).unwrap(), json!({"notes": []}));
        let gone = CrudPayload::<()>::message_only("notes", "Notes eliminado correctamente");
        assert_eq!(serde_json::to_value(&gone).unwrap(), json!({"message": "Notes eliminado correctamente"}));
    }
}
