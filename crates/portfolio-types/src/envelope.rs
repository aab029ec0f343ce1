use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform wrapper returned by every endpoint.
///
/// Clients branch on `success` rather than on the transport status alone.
/// Exactly one of `data` (success) or `error` (failure) is present on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub success: bool,
    pub message: String,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            status_code: 200,
            data: Some(data),
            error: None,
        }
    }
}

impl Envelope<Value> {
    /// Success without a payload; `data` is an empty list.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::ok(message, Value::Array(Vec::new()))
    }

    /// `error` is always emitted on failure, as `null` when there is no detail.
    pub fn failure(message: impl Into<String>, status_code: u16, error: Option<Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            status_code,
            data: None,
            error: Some(error.unwrap_or(Value::Null)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_success_serializes_data_as_list() {
        let value = serde_json::to_value(Envelope::empty("deleted")).unwrap();
        assert_eq!(
            value,
            json!({ "success": true, "message": "deleted", "status_code": 200, "data": [] })
        );
    }

    #[test]
    fn failure_carries_error_and_no_data() {
        let value = serde_json::to_value(Envelope::failure("not found", 404, None)).unwrap();
        assert_eq!(
            value,
            json!({ "success": false, "message": "not found", "status_code": 404, "error": null })
        );
    }

    #[test]
    fn ok_wraps_payload() {
        let value = serde_json::to_value(Envelope::ok("fetched", vec![1, 2, 3])).unwrap();
        assert_eq!(value["data"], json!([1, 2, 3]));
        assert!(value.get("error").is_none());
    }
}
