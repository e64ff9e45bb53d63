//! Response envelope decoding.
//!
//! List reads:      `{ "data": [status, [records...]], "message": "..." }`
//! Entity writes:   `{ "data": entity, "message": "..." }`, where the entity may
//!                  be nested one level deeper (`data.proofTemplate`).
//! Errors:          non-2xx with `{ "message": "..." }` or `{ "error": "..." }`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ApiError;

/// Decoded entity plus the backend's message, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub data: T,
    pub message: Option<String>,
}

fn parse_json(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Malformed(format!("invalid JSON: {e}")))
}

fn message_of(value: &Value) -> Option<String> {
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Decodes a list envelope: `data` must be an array of at least two
/// elements whose second element is the record array.
pub fn parse_list<T: DeserializeOwned>(body: &str) -> Result<Envelope<Vec<T>>, ApiError> {
    let value = parse_json(body)?;
    let records = value
        .get("data")
        .and_then(Value::as_array)
        .filter(|data| data.len() > 1)
        .map(|data| data[1].clone())
        .ok_or_else(|| ApiError::Malformed("expected data: [status, records]".to_string()))?;
    let data = serde_json::from_value(records)
        .map_err(|e| ApiError::Malformed(format!("unexpected record shape: {e}")))?;
    Ok(Envelope {
        data,
        message: message_of(&value),
    })
}

/// Decodes an entity envelope, looking under `data.<nested>` first when given.
pub fn parse_entity<T: DeserializeOwned>(
    body: &str,
    nested: Option<&str>,
) -> Result<Envelope<T>, ApiError> {
    let value = parse_json(body)?;
    let data = value
        .get("data")
        .ok_or_else(|| ApiError::Malformed("missing data".to_string()))?;
    let entity = nested
        .and_then(|key| data.get(key))
        .unwrap_or(data)
        .clone();
    let data = serde_json::from_value(entity)
        .map_err(|e| ApiError::Malformed(format!("unexpected entity shape: {e}")))?;
    Ok(Envelope {
        data,
        message: message_of(&value),
    })
}

/// Like [`parse_entity`], but an empty body or missing/null `data` is `None`.
pub fn parse_optional_entity<T: DeserializeOwned>(
    body: &str,
    nested: Option<&str>,
) -> Result<Envelope<Option<T>>, ApiError> {
    if body.trim().is_empty() {
        return Ok(Envelope {
            data: None,
            message: None,
        });
    }
    let value = parse_json(body)?;
    match value.get("data") {
        None | Some(Value::Null) => Ok(Envelope {
            data: None,
            message: message_of(&value),
        }),
        Some(_) => {
            let env = parse_entity::<T>(body, nested)?;
            Ok(Envelope {
                data: Some(env.data),
                message: env.message,
            })
        }
    }
}

/// Only the backend's message of a success body (bodies may be empty).
pub fn parse_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(message_of)
}

/// `{ "exists": bool }` from the user-id availability check.
pub fn parse_exists(body: &str) -> Result<bool, ApiError> {
    parse_json(body)?
        .get("exists")
        .and_then(Value::as_bool)
        .ok_or_else(|| ApiError::Malformed("expected exists: bool".to_string()))
}

/// Human-readable message from an error body: `message`, then `error`,
/// then the raw text.
pub fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(Value::as_str) {
                return msg.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "request failed".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, Template};

    #[test]
    fn list_envelope_takes_second_element() {
        let body = r#"{"data":[2,[{"id":1,"role":"Auditor"},{"id":2,"role":"Clerk"}]],"message":"ok"}"#;
        let env: Envelope<Vec<Role>> = parse_list(body).unwrap();
        assert_eq!(env.data.len(), 2);
        assert_eq!(env.data[1].role, "Clerk");
        assert_eq!(env.message.as_deref(), Some("ok"));
    }

    #[test]
    fn list_envelope_rejects_wrong_shapes() {
        for body in [
            r#"{"data":[2]}"#,
            r#"{"data":{"items":[]}}"#,
            r#"{"message":"x"}"#,
            r#"{"data":[1,[{"role":"no id"}]]}"#,
            "<html>",
        ] {
            assert!(
                matches!(parse_list::<Role>(body), Err(ApiError::Malformed(_))),
                "{body}"
            );
        }
    }

    #[test]
    fn entity_envelope_handles_nested_key() {
        let body = r#"{"data":{"proofTemplate":{"id":5,"templateId":"t","name":"n","version":"1.0.0"}},"message":"Created"}"#;
        let env: Envelope<Template> = parse_entity(body, Some("proofTemplate")).unwrap();
        assert_eq!(env.data.id, 5);
        assert_eq!(env.message.as_deref(), Some("Created"));

        let flat = r#"{"data":{"id":6,"templateId":"t","name":"n","version":"1.0.0"}}"#;
        let env: Envelope<Template> = parse_entity(flat, Some("proofTemplate")).unwrap();
        assert_eq!(env.data.id, 6);
    }

    #[test]
    fn optional_entity_allows_empty_bodies() {
        let env: Envelope<Option<Role>> = parse_optional_entity("", None).unwrap();
        assert_eq!(env.data, None);
        let env: Envelope<Option<Role>> =
            parse_optional_entity(r#"{"message":"Updated"}"#, None).unwrap();
        assert_eq!(env.data, None);
        assert_eq!(env.message.as_deref(), Some("Updated"));
        let env: Envelope<Option<Role>> =
            parse_optional_entity(r#"{"data":{"id":1,"role":"A"}}"#, None).unwrap();
        assert_eq!(env.data.map(|r| r.id), Some(1));
    }

    #[test]
    fn error_message_prefers_message_then_error_then_text() {
        assert_eq!(error_message(r#"{"message":"Duplicate","error":"x"}"#), "Duplicate");
        assert_eq!(error_message(r#"{"error":"Forbidden"}"#), "Forbidden");
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(""), "request failed");
    }

    #[test]
    fn exists_flag() {
        assert_eq!(parse_exists(r#"{"exists":true}"#), Ok(true));
        assert!(parse_exists(r#"{}"#).is_err());
    }
}
