//! API response types
//!
//! `{"status":"ok","data":...}` or `{"status":"error","code":...,"message":...}`.
//! A refusal is an `ok` response whose data is the refusal verdict.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ApiError, ApiResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Ok { data: Value },
    Error { code: String, message: String },
}

impl Response {
    pub fn success(data: Value) -> Self {
        Response::Ok { data }
    }

    pub fn error(err: &ApiError) -> Self {
        Response::Error {
            code: err.code().to_string(),
            message: err.message().to_string(),
        }
    }

    pub fn from_result(result: ApiResult<Value>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::error(&e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Ok { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Response::Ok { data } => Some(data),
            Response::Error { .. } => None,
        }
    }

    /// Error code, if this is an error response
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Response::Error { code, .. } => Some(code),
            Response::Ok { .. } => None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("Response serialization cannot fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_response() {
        let resp = Response::success(json!({"status": "answer", "text": "VCC"}));
        let parsed: Value = serde_json::from_str(&resp.to_json()).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["data"]["text"], "VCC");
    }

    #[test]
    fn test_error_response() {
        let resp = Response::error(&ApiError::invalid_request("Missing doc_id"));
        assert!(!resp.is_success());
        assert_eq!(resp.error_code(), Some("AKILI_INVALID_REQUEST"));
        assert_eq!(
            resp.to_json(),
            r#"{"status":"error","code":"AKILI_INVALID_REQUEST","message":"Missing doc_id"}"#
        );
    }

    #[test]
    fn test_from_result() {
        assert!(Response::from_result(Ok(Value::Null)).is_success());
        assert!(!Response::from_result(Err(ApiError::internal("boom"))).is_success());
    }
}
