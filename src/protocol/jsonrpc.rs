//! JSON-RPC 2.0 message envelope

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    core::error::{ScanFailure, WlanError},
    protocol::{request::Request, response::Response},
};

/// JSON-RPC 2.0 request wrapper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(flatten)]
    pub request: Request,
    pub id: RequestId,
}

/// JSON-RPC 2.0 response wrapper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Response>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: RequestId,
}

/// Request ID (number, string, or null when the request could not be read)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
    Null,
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Standard JSON-RPC error codes
#[allow(dead_code)]
impl JsonRpcError {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    // Custom error codes
    pub const SCAN_IN_PROGRESS: i32 = -32001;
    pub const ROLE_MISMATCH: i32 = -32002;
    pub const BACKEND_ERROR: i32 = -32003;
    pub const TIMEOUT: i32 = -32004;
    pub const SCAN_FAILED: i32 = -32005;
    pub const UNSUPPORTED_MODE: i32 = -32006;

    pub fn parse_error() -> Self {
        Self {
            code: Self::PARSE_ERROR,
            message: "Parse error".to_string(),
            data: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: Self::INVALID_REQUEST,
            message: message.into(),
            data: None,
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: Self::INVALID_PARAMS,
            message: message.into(),
            data: None,
        }
    }

    fn with_code(code: i32, err: &WlanError) -> Self {
        Self {
            code,
            message: err.to_string(),
            data: None,
        }
    }
}

impl From<&WlanError> for JsonRpcError {
    fn from(err: &WlanError) -> Self {
        match err {
            WlanError::OutOfRange(_)
            | WlanError::UnknownParameter(_)
            | WlanError::InvalidArguments(_)
            | WlanError::InvalidLength { .. } => Self::with_code(Self::INVALID_PARAMS, err),
            WlanError::RoleMismatch(role) => Self {
                data: Some(json!({ "required": role })),
                ..Self::with_code(Self::ROLE_MISMATCH, err)
            },
            WlanError::UnsupportedMode => Self::with_code(Self::UNSUPPORTED_MODE, err),
            WlanError::ScanInProgress => Self::with_code(Self::SCAN_IN_PROGRESS, err),
            WlanError::ScanFailed(ScanFailure::Timeout) => Self::with_code(Self::TIMEOUT, err),
            WlanError::ScanFailed(ScanFailure::Driver(source)) => Self {
                data: Some(json!({ "driver_code": source.code })),
                ..Self::with_code(Self::SCAN_FAILED, err)
            },
            WlanError::Driver { source, .. } => Self {
                data: Some(json!({ "driver_code": source.code })),
                ..Self::with_code(Self::BACKEND_ERROR, err)
            },
            WlanError::ScanFailed(ScanFailure::Abandoned) => {
                Self::with_code(Self::SCAN_FAILED, err)
            }
        }
    }
}

impl JsonRpcRequest {
    pub fn new(request: Request, id: RequestId) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            request,
            id,
        }
    }
}

impl JsonRpcResponse {
    pub fn success(result: Response, id: RequestId) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(error: JsonRpcError, id: RequestId) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{error::DriverError, types::Role},
        protocol::{request::IfaceParams, response::AckResponse},
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn test_jsonrpc_request_serialization() {
        let request = JsonRpcRequest::new(
            Request::Scan(IfaceParams { iface: 0 }),
            RequestId::Number(1),
        );
        let json = serde_json::to_string(&request).unwrap();

        assert!(json.contains(r#""jsonrpc":"2.0""#));
        assert!(json.contains(r#""method":"scan""#));
        assert!(json.contains(r#""id":1"#));

        let deserialized: JsonRpcRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, request);
    }

    #[test]
    fn test_jsonrpc_request_with_string_id() {
        let request = JsonRpcRequest::new(
            Request::Disconnect(IfaceParams { iface: 0 }),
            RequestId::String("abc-123".to_string()),
        );
        let json = serde_json::to_string(&request).unwrap();

        assert!(json.contains(r#""id":"abc-123""#));
    }

    #[test]
    fn test_jsonrpc_response_success() {
        let response = JsonRpcResponse::success(
            Response::Ack(AckResponse::ok()),
            RequestId::Number(1),
        );
        let json = serde_json::to_string(&response).unwrap();

        assert_eq!(
            json,
            r#"{"jsonrpc":"2.0","result":{"status":"ok"},"id":1}"#
        );
    }

    #[test]
    fn test_jsonrpc_response_error_with_null_id() {
        let response = JsonRpcResponse::error(JsonRpcError::parse_error(), RequestId::Null);
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains(r#""code":-32700"#));
        assert!(json.contains(r#""id":null"#));
        assert!(!json.contains(r#""result""#));

        let deserialized: JsonRpcResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, response);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(JsonRpcError::PARSE_ERROR, -32700);
        assert_eq!(JsonRpcError::INVALID_PARAMS, -32602);
        assert_eq!(JsonRpcError::SCAN_IN_PROGRESS, -32001);
        assert_eq!(JsonRpcError::BACKEND_ERROR, -32003);
    }

    #[test]
    fn test_wlan_error_mapping() {
        let cases = [
            (WlanError::OutOfRange(5), JsonRpcError::INVALID_PARAMS),
            (
                WlanError::InvalidLength {
                    expected: 6,
                    got: 5,
                },
                JsonRpcError::INVALID_PARAMS,
            ),
            (
                WlanError::UnknownParameter("bogus".into()),
                JsonRpcError::INVALID_PARAMS,
            ),
            (WlanError::RoleMismatch(Role::Station), JsonRpcError::ROLE_MISMATCH),
            (WlanError::UnsupportedMode, JsonRpcError::UNSUPPORTED_MODE),
            (WlanError::ScanInProgress, JsonRpcError::SCAN_IN_PROGRESS),
            (
                WlanError::ScanFailed(ScanFailure::Timeout),
                JsonRpcError::TIMEOUT,
            ),
            (
                WlanError::ScanFailed(ScanFailure::Abandoned),
                JsonRpcError::SCAN_FAILED,
            ),
        ];

        for (err, code) in cases {
            assert_eq!(JsonRpcError::from(&err).code, code, "{err}");
        }
    }

    #[test]
    fn test_driver_error_carries_code() {
        let err = WlanError::Driver {
            context: "cannot set AP config",
            source: DriverError::new(-4, "flash write failed"),
        };
        let rpc = JsonRpcError::from(&err);

        assert_eq!(rpc.code, JsonRpcError::BACKEND_ERROR);
        assert!(rpc.message.starts_with("cannot set AP config"));
        assert_eq!(rpc.data, Some(json!({ "driver_code": -4 })));

        let scan = WlanError::ScanFailed(ScanFailure::Driver(DriverError::new(-1, "busy")));
        assert_eq!(JsonRpcError::from(&scan).code, JsonRpcError::SCAN_FAILED);
    }

    #[test]
    fn test_role_mismatch_names_required_role() {
        let rpc = JsonRpcError::from(&WlanError::RoleMismatch(Role::AccessPoint));
        assert_eq!(rpc.message, "AP required");
        assert_eq!(rpc.data, Some(json!({ "required": "access_point" })));
    }
}
