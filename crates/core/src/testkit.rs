//! Scripted transport for exercising handles without an agent.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use uiauto_runtime::{AgentTransport, Error, Result};

/// One canned answer for the next remote call.
pub(crate) enum ScriptedReply {
    Ok(Value),
    NotFound,
    NotImplemented,
    Fault(i64, String),
}

/// Records every call and answers from a fixed script, in order.
pub(crate) struct MockTransport {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
    replies: Mutex<VecDeque<ScriptedReply>>,
}

impl MockTransport {
    pub(crate) fn with_replies(replies: Vec<ScriptedReply>) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into_iter().collect()),
        })
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn method_names(&self) -> Vec<String> {
        self.calls().into_iter().map(|(name, _)| name).collect()
    }
}

#[async_trait]
impl AgentTransport for MockTransport {
    async fn invoke(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_owned(), params));
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted call to {method}"));
        match reply {
            ScriptedReply::Ok(value) => Ok(value),
            ScriptedReply::NotFound => Err(Error::ObjectNotFound),
            ScriptedReply::NotImplemented => Err(Error::Unsupported(method.to_owned())),
            ScriptedReply::Fault(code, message) => Err(Error::AgentFault { code, message }),
        }
    }
}
