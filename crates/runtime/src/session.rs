//! Emulator session lifecycle.
//!
//! An [`EmulatorSession`] owns one AVD and walks it through a fixed state
//! machine: created, started, online, agent running, then stopped or
//! deleted. A [`SessionRegistry`] hands out at most one live session per
//! AVD name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::poll::wait_until;
use crate::port::PortRange;
use crate::process::ProcessHandle;
use crate::sdk::SdkTools;

/// Where a session currently sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No AVD exists yet.
    Uninstantiated,
    /// The AVD exists but no emulator process is running.
    Created,
    /// The emulator process is launched but the device is not yet listed.
    Started,
    /// adb reports the device in the `device` state.
    Online,
    /// The automation agent answers on its forwarded port.
    AgentRunning,
    /// The agent was torn down; the emulator may still be running.
    Stopped,
    /// Everything is torn down and the AVD is gone.
    Deleted,
}

/// Tunables for session setup and readiness polling.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Candidate emulator console ports; each emulator takes a pair.
    pub control_ports: PortRange,
    /// Candidate host ports for the forwarded agent endpoint.
    pub agent_ports: PortRange,
    /// Fixed port the agent listens on inside the device.
    pub agent_device_port: u16,
    /// System image target used when creating the AVD.
    pub avd_target: String,
    /// Host path to the agent bundle jar.
    pub bundle_jar: PathBuf,
    /// Host path to the agent stub jar.
    pub stub_jar: PathBuf,
    pub poll_interval: Duration,
    /// How long to wait for adb to list the device after launch.
    pub online_deadline: Duration,
    /// How long to wait for the agent port to accept connections.
    pub agent_deadline: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            control_ports: PortRange::new(5556, 5680, 2),
            agent_ports: PortRange::new(9008, 9030, 1),
            agent_device_port: 9008,
            avd_target: "android-19".to_owned(),
            bundle_jar: PathBuf::from("bundle.jar"),
            stub_jar: PathBuf::from("uiautomator-stub.jar"),
            poll_interval: Duration::from_secs(1),
            online_deadline: Duration::from_secs(300),
            agent_deadline: Duration::from_secs(120),
        }
    }
}

const REMOTE_JAR_DIR: &str = "/data/local/tmp";
const AGENT_STUB_CLASS: &str = "com.github.uiautomatorstub.Stub";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One virtual device and the processes attached to it.
pub struct EmulatorSession {
    name: String,
    sdk: SdkTools,
    config: SessionConfig,
    state: Mutex<SessionState>,
    control_port: Mutex<Option<u16>>,
    agent_port: Mutex<Option<u16>>,
    emulator: tokio::sync::Mutex<Option<ProcessHandle>>,
    agent: tokio::sync::Mutex<Option<ProcessHandle>>,
    // Serializes lifecycle transitions without holding the state lock
    // across awaits.
    op: tokio::sync::Mutex<()>,
}

impl EmulatorSession {
    fn new(name: String, sdk: SdkTools, config: SessionConfig) -> Self {
        Self {
            name,
            sdk,
            config,
            state: Mutex::new(SessionState::Uninstantiated),
            control_port: Mutex::new(None),
            agent_port: Mutex::new(None),
            emulator: tokio::sync::Mutex::new(None),
            agent: tokio::sync::Mutex::new(None),
            op: tokio::sync::Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SessionState {
        *lock(&self.state)
    }

    fn set_state(&self, next: SessionState) {
        let mut state = lock(&self.state);
        debug!(session = %self.name, from = ?*state, to = ?next, "state change");
        *state = next;
    }

    /// The emulator's console port, once started.
    pub fn control_port(&self) -> Option<u16> {
        *lock(&self.control_port)
    }

    /// The host port the agent is forwarded to, once agent setup has begun.
    pub fn agent_port(&self) -> Option<u16> {
        *lock(&self.agent_port)
    }

    /// The adb serial, derived from the control port.
    pub fn serial(&self) -> Option<String> {
        self.control_port().map(|port| format!("emulator-{port}"))
    }

    fn serial_required(&self) -> Result<String> {
        self.serial()
            .ok_or_else(|| Error::NotStarted(self.name.clone()))
    }

    /// Creates the backing AVD if it does not already exist.
    pub async fn create(&self) -> Result<()> {
        let _op = self.op.lock().await;
        if !self.sdk.avd_exists(&self.name).await? {
            self.sdk.create_avd(&self.name, &self.config.avd_target).await?;
        }
        info!(session = %self.name, "avd created");
        self.set_state(SessionState::Created);
        Ok(())
    }

    /// Launches the emulator process on a freshly allocated console port.
    /// A no-op while an emulator process is already held.
    pub async fn start(&self) -> Result<()> {
        let _op = self.op.lock().await;
        if self.emulator.lock().await.is_some() {
            return Ok(());
        }
        let port = self.config.control_ports.allocate()?;
        let port_arg = port.to_string();
        let handle = ProcessHandle::spawn(
            &format!("emulator-{port}"),
            self.sdk.emulator_path(),
            [
                "-no-boot-anim",
                "-noaudio",
                "-avd",
                self.name.as_str(),
                "-port",
                port_arg.as_str(),
            ],
        )?;
        *lock(&self.control_port) = Some(port);
        *self.emulator.lock().await = Some(handle);
        info!(session = %self.name, port, "emulator launched");
        self.set_state(SessionState::Started);
        Ok(())
    }

    /// One readiness probe against adb. A crashed or still-booting emulator
    /// simply reads as not online.
    pub async fn is_online(&self) -> Result<bool> {
        match self.serial() {
            Some(serial) => self.sdk.device_online(&serial).await,
            None => Ok(false),
        }
    }

    /// Polls until adb lists the device, within the configured deadline.
    pub async fn wait_for_online(&self) -> Result<()> {
        let _op = self.op.lock().await;
        let serial = self.serial_required()?;
        let what = format!("{serial} online");
        let sdk = &self.sdk;
        let serial_ref: &str = &serial;
        wait_until(
            &what,
            self.config.poll_interval,
            self.config.online_deadline,
            move || async move { sdk.device_online(serial_ref).await.unwrap_or(false) },
        )
        .await?;
        self.set_state(SessionState::Online);
        Ok(())
    }

    /// Pushes the agent jars, forwards a host port, launches the agent, and
    /// waits for it to answer. Calling again while the agent runs is a no-op.
    pub async fn start_agent(&self) -> Result<()> {
        let _op = self.op.lock().await;
        if self.agent.lock().await.is_some() {
            return Ok(());
        }
        let serial = self.serial_required()?;

        self.sdk
            .push(&serial, &self.config.bundle_jar, REMOTE_JAR_DIR)
            .await?;
        self.sdk
            .push(&serial, &self.config.stub_jar, REMOTE_JAR_DIR)
            .await?;

        let port = self.config.agent_ports.allocate()?;
        self.sdk
            .forward(&serial, port, self.config.agent_device_port)
            .await?;
        *lock(&self.agent_port) = Some(port);

        let bundle = jar_file_name(&self.config.bundle_jar);
        let stub = jar_file_name(&self.config.stub_jar);
        let handle = ProcessHandle::spawn(
            &format!("agent-{serial}"),
            self.sdk.adb_path(),
            [
                "-s",
                serial.as_str(),
                "shell",
                "uiautomator",
                "runtest",
                stub.as_str(),
                bundle.as_str(),
                "-c",
                AGENT_STUB_CLASS,
            ],
        )?;
        *self.agent.lock().await = Some(handle);

        let what = format!("agent on port {port}");
        let waited = wait_until(
            &what,
            self.config.poll_interval,
            self.config.agent_deadline,
            move || async move { TcpStream::connect(("127.0.0.1", port)).await.is_ok() },
        )
        .await;
        if let Err(error) = waited {
            // Unwind the half-built agent so a retry starts from scratch
            // instead of stacking a second forward on the leaked one.
            if let Err(teardown) = self.teardown_agent().await {
                warn!(session = %self.name, %teardown, "agent teardown after failed start");
            }
            return Err(error);
        }
        info!(session = %self.name, port, "agent running");
        self.set_state(SessionState::AgentRunning);
        Ok(())
    }

    /// Tears down the agent and its port forward. The emulator stays up, so
    /// adb-side work like artifact capture is still possible afterwards.
    pub async fn stop(&self) -> Result<()> {
        let _op = self.op.lock().await;
        self.teardown_agent().await?;
        self.set_state(SessionState::Stopped);
        Ok(())
    }

    /// Stops everything and deletes the AVD definition.
    pub async fn delete(&self) -> Result<()> {
        let _op = self.op.lock().await;
        self.teardown_agent().await?;
        if let Some(mut emulator) = self.emulator.lock().await.take() {
            emulator.terminate().await?;
        }
        *lock(&self.control_port) = None;
        if self.sdk.avd_exists(&self.name).await? {
            self.sdk.delete_avd(&self.name).await?;
        }
        info!(session = %self.name, "deleted");
        self.set_state(SessionState::Deleted);
        Ok(())
    }

    async fn teardown_agent(&self) -> Result<()> {
        if let Some(mut agent) = self.agent.lock().await.take() {
            agent.terminate().await?;
        }
        let port = lock(&self.agent_port).take();
        if let (Some(port), Some(serial)) = (port, self.serial()) {
            if let Err(error) = self.sdk.remove_forward(&serial, port).await {
                warn!(session = %self.name, port, %error, "failed to remove forward");
            }
        }
        Ok(())
    }

    /// Captures the current screen as a PNG at `local`.
    pub async fn capture_screenshot(&self, local: &Path) -> Result<()> {
        let serial = self.serial_required()?;
        let remote = format!("{REMOTE_JAR_DIR}/screenshot.png");
        self.sdk
            .shell(&serial, &["screencap", "-p", &remote])
            .await?;
        self.sdk.pull(&serial, &remote, local).await?;
        self.sdk.shell(&serial, &["rm", &remote]).await?;
        Ok(())
    }

    /// Dumps the current UI hierarchy as XML at `local`.
    pub async fn capture_ui_dump(&self, local: &Path) -> Result<()> {
        let serial = self.serial_required()?;
        let remote = format!("{REMOTE_JAR_DIR}/window_dump.xml");
        self.sdk
            .shell(&serial, &["uiautomator", "dump", &remote])
            .await?;
        self.sdk.pull(&serial, &remote, local).await?;
        self.sdk.shell(&serial, &["rm", &remote]).await?;
        Ok(())
    }
}

fn jar_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Hands out sessions, at most one live instance per AVD name.
pub struct SessionRegistry {
    sdk: SdkTools,
    config: SessionConfig,
    sessions: Mutex<HashMap<String, Arc<EmulatorSession>>>,
}

impl SessionRegistry {
    pub fn new(sdk: SdkTools, config: SessionConfig) -> Self {
        Self {
            sdk,
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the session for `name`, creating the handle on first use.
    ///
    /// A session that reached `Deleted` is replaced by a fresh handle on the
    /// next lookup, so a name can be instantiated again after deletion.
    pub fn session(&self, name: &str) -> Arc<EmulatorSession> {
        let mut sessions = lock(&self.sessions);
        if let Some(existing) = sessions.get(name) {
            if existing.state() != SessionState::Deleted {
                return Arc::clone(existing);
            }
        }
        let session = Arc::new(EmulatorSession::new(
            name.to_owned(),
            self.sdk.clone(),
            self.config.clone(),
        ));
        sessions.insert(name.to_owned(), Arc::clone(&session));
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry() -> (SessionRegistry, TempDir) {
        let sdk_root = TempDir::new().unwrap();
        let sdk = SdkTools::new(sdk_root.path());
        (SessionRegistry::new(sdk, SessionConfig::default()), sdk_root)
    }

    #[test]
    fn new_session_is_uninstantiated_with_no_ports() {
        let (registry, _root) = registry();
        let session = registry.session("avd-a");
        assert_eq!(session.state(), SessionState::Uninstantiated);
        assert_eq!(session.control_port(), None);
        assert_eq!(session.agent_port(), None);
        assert_eq!(session.serial(), None);
    }

    #[test]
    fn registry_memoizes_by_name() {
        let (registry, _root) = registry();
        let first = registry.session("avd-a");
        let again = registry.session("avd-a");
        let other = registry.session("avd-b");
        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[test]
    fn deleted_session_is_replaced_on_next_lookup() {
        let (registry, _root) = registry();
        let first = registry.session("avd-a");
        first.set_state(SessionState::Deleted);
        let replacement = registry.session("avd-a");
        assert!(!Arc::ptr_eq(&first, &replacement));
        assert_eq!(replacement.state(), SessionState::Uninstantiated);
    }

    #[tokio::test]
    async fn operations_needing_a_device_fail_before_start() {
        let (registry, root) = registry();
        let session = registry.session("avd-a");
        let err = session
            .capture_screenshot(&root.path().join("shot.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotStarted(name) if name == "avd-a"));
    }

    #[test]
    fn serial_is_derived_from_control_port() {
        let (registry, _root) = registry();
        let session = registry.session("avd-a");
        *lock(&session.control_port) = Some(5558);
        assert_eq!(session.serial().as_deref(), Some("emulator-5558"));
    }
}
