use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while driving emulators and talking to the agent.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Every port in the configured range was in use.
    #[error("no free port in range {start}..={end}")]
    ResourceExhausted { start: u16, end: u16 },

    /// A child process could not be spawned at all.
    #[error("failed to launch `{command}`: {source}")]
    ProcessLaunchFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A tool ran but exited non-zero.
    #[error("command failed: {0}")]
    CommandFailed(String),

    /// The operation needs a started emulator and the session has none.
    #[error("session {0} has no running emulator")]
    NotStarted(String),

    /// A bounded wait ran out before its condition held.
    #[error("timed out after {waited:?} waiting for {what}")]
    Timeout { what: String, waited: Duration },

    /// No Android SDK location could be determined.
    #[error("Android SDK not found; set ANDROID_SDK_ROOT or ANDROID_SDK")]
    SdkNotFound,

    /// The agent could not find the element a call named.
    #[error("UI object not found")]
    ObjectNotFound,

    /// The agent does not implement the requested operation.
    #[error("operation not supported by agent: {0}")]
    Unsupported(String),

    /// Any other failure reported by the agent.
    #[error("agent fault {code}: {message}")]
    AgentFault { code: i64, message: String },

    /// The HTTP hop to the agent failed.
    #[error("transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the error means the named element is absent, which callers
    /// commonly downgrade to a boolean answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ObjectNotFound)
    }

    /// True when a bounded wait expired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}
