//! Shared building blocks for the notes backend: response body types and
//! logging setup reused by the server crate and the binary.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn message_body_serializes_as_single_field() {
        let body = types::MessageBody::new("Error notes inexistente");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Error notes inexistente"}));
    }
}
