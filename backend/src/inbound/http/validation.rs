//! Request validation helpers shared by the HTTP handlers.

use serde_json::json;

use crate::domain::Error;

/// Error for a request payload missing a required field.
///
/// Fields arrive as `Option` so their absence produces this envelope
/// instead of a framework deserialisation error.
pub fn missing_field_error(field: &str) -> Error {
    Error::invalid_request(format!("{field} is required")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

/// Map a domain validation failure onto the request error envelope.
pub fn validation_error(error: impl std::fmt::Display) -> Error {
    Error::invalid_request(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    #[test]
    fn missing_field_names_the_field() {
        let error = missing_field_error("title");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "title is required");
        let details = error.details().expect("details set");
        assert_eq!(details["field"], "title");
    }
}
