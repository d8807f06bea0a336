//! JSON-RPC 2.0 envelope spoken with the agent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outgoing call frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Vec<Value>,
}

impl RpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_owned(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// Incoming reply frame. Exactly one of `result` and `error` is present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RpcResponse {
    pub id: u64,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
}

/// Agent-side failure attached to a reply.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

/// What kind of failure an [`RpcError`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The element a call named does not exist on the current screen.
    NotFound,
    /// The agent does not implement the requested operation.
    NotImplemented,
    /// Any other agent-side failure.
    Other,
}

impl RpcError {
    /// Classifies the error by the exception the agent wrapped.
    ///
    /// The agent reports the originating exception type under
    /// `data.exceptionTypeName`; older builds only mention it in the message.
    pub fn kind(&self) -> FaultKind {
        let type_name = self
            .data
            .as_ref()
            .and_then(|d| d.get("exceptionTypeName"))
            .and_then(Value::as_str)
            .unwrap_or("");
        if type_name.contains("UiObjectNotFoundException")
            || self.message.contains("UiObjectNotFoundException")
        {
            FaultKind::NotFound
        } else if type_name.contains("NotImplementedException")
            || self.message.contains("NotImplementedException")
        {
            FaultKind::NotImplemented
        } else {
            FaultKind::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_encodes_fixed_version_tag() {
        let request = RpcRequest::new(7, "click", vec![json!("abc123")]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 7);
        assert_eq!(value["method"], "click");
        assert_eq!(value["params"], json!(["abc123"]));
    }

    #[test]
    fn response_decodes_result_or_error() {
        let ok: RpcResponse =
            serde_json::from_value(json!({"id": 1, "result": true, "error": null})).unwrap();
        assert_eq!(ok.result, Some(json!(true)));
        assert!(ok.error.is_none());

        let err: RpcResponse = serde_json::from_value(json!({
            "id": 2,
            "error": {"code": -32000, "message": "boom"}
        }))
        .unwrap();
        assert!(err.result.is_none());
        assert_eq!(err.error.unwrap().code, -32000);
    }

    #[test]
    fn not_found_is_classified_from_structured_data() {
        let error: RpcError = serde_json::from_value(json!({
            "code": -32001,
            "message": "error in remote call",
            "data": {"exceptionTypeName": "com.android.uiautomator.core.UiObjectNotFoundException"}
        }))
        .unwrap();
        assert_eq!(error.kind(), FaultKind::NotFound);
    }

    #[test]
    fn not_found_is_classified_from_message_fallback() {
        let error = RpcError {
            code: -32001,
            message: "UiObjectNotFoundException: no element for selector".to_owned(),
            data: None,
        };
        assert_eq!(error.kind(), FaultKind::NotFound);
    }

    #[test]
    fn unimplemented_and_other_faults_are_distinguished() {
        let unimplemented = RpcError {
            code: -32001,
            message: "NotImplementedException".to_owned(),
            data: None,
        };
        assert_eq!(unimplemented.kind(), FaultKind::NotImplemented);

        let other = RpcError {
            code: -32603,
            message: "internal error".to_owned(),
            data: None,
        };
        assert_eq!(other.kind(), FaultKind::Other);
    }
}
