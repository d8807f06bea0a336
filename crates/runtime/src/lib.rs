//! Emulator lifecycle orchestration and agent transport.
//!
//! This crate owns everything between the host and a running agent: port
//! allocation, SDK tool invocation, emulator process supervision, bounded
//! readiness polling, and the HTTP hop that carries agent calls. The typed
//! agent surface lives in the `uiauto` crate on top of [`AgentTransport`].
//!
//! Nothing here installs a tracing subscriber; embedding applications choose
//! their own.

pub mod error;
pub mod poll;
pub mod port;
pub mod process;
pub mod sdk;
pub mod session;
pub mod transport;

pub use error::{Error, Result};
pub use port::PortRange;
pub use sdk::SdkTools;
pub use session::{EmulatorSession, SessionConfig, SessionRegistry, SessionState};
pub use transport::{AgentTransport, HttpTransport};
