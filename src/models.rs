use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Health endpoint response format
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub uptime: String,
    pub timestamp: String, // RFC 3339
    pub components: HashMap<String, String>,
}

// Standard error body for every non-2xx response
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,   // machine-readable code, e.g. "rate_limited"
    pub message: String, // human-readable message
    pub code: u16,       // HTTP status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

// Placeholder body for the /api/v1 group
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ApiInfo {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_json_shape() {
        let err = ErrorResponse {
            error: "test_error".to_string(),
            message: "This is a test error".to_string(),
            code: 400,
            request_id: None,
        };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(
            json,
            r#"{"error":"test_error","message":"This is a test error","code":400}"#
        );

        let with_id: ErrorResponse = serde_json::from_str(
            r#"{"error":"internal_error","message":"Internal server error","code":500,"request_id":"abc"}"#,
        )
        .unwrap();
        assert_eq!(with_id.request_id.as_deref(), Some("abc"));
    }
}
