//! HTTP transport to the on-device agent.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;
use uiauto_protocol::{FaultKind, RpcRequest, RpcResponse};

use crate::error::{Error, Result};

/// One remote call to the agent. Implementations carry whatever connection
/// state the hop needs; callers see only method name plus positional params.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    async fn invoke(&self, method: &str, params: Vec<Value>) -> Result<Value>;
}

/// Calls the agent's JSON-RPC endpoint over a forwarded local port.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl HttpTransport {
    /// Targets the agent forwarded to `port` on the loopback interface.
    pub fn new(port: u16) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("http://127.0.0.1:{port}/jsonrpc/0"),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl AgentTransport for HttpTransport {
    async fn invoke(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(id, method, params);
        trace!(method, id, "agent call");

        let response: RpcResponse = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Transport(e.to_string()))?
            .json()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(match error.kind() {
                FaultKind::NotFound => Error::ObjectNotFound,
                FaultKind::NotImplemented => Error::Unsupported(method.to_owned()),
                FaultKind::Other => Error::AgentFault {
                    code: error.code,
                    message: error.message,
                },
            });
        }
        Ok(response.result.unwrap_or(Value::Null))
    }
}
