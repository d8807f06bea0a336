//! Android SDK tool invocation.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::process::{check_call, check_output};

/// Locations of the SDK tools a session needs.
#[derive(Debug, Clone)]
pub struct SdkTools {
    root: PathBuf,
    emulator: PathBuf,
    android: PathBuf,
    adb: PathBuf,
}

impl SdkTools {
    /// Builds tool paths under the given SDK root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            emulator: root.join("tools").join("emulator"),
            android: root.join("tools").join("android"),
            adb: root.join("platform-tools").join("adb"),
            root,
        }
    }

    /// Locates the SDK from `ANDROID_SDK_ROOT`, falling back to `ANDROID_SDK`.
    pub fn from_env() -> Result<Self> {
        std::env::var_os("ANDROID_SDK_ROOT")
            .or_else(|| std::env::var_os("ANDROID_SDK"))
            .map(|root| Self::new(PathBuf::from(root)))
            .ok_or(Error::SdkNotFound)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn emulator_path(&self) -> &Path {
        &self.emulator
    }

    pub fn adb_path(&self) -> &Path {
        &self.adb
    }

    /// Creates an AVD from the named system image target.
    pub async fn create_avd(&self, name: &str, target: &str) -> Result<()> {
        debug!(avd = name, target, "creating avd");
        check_call(
            &self.android,
            ["create", "avd", "-n", name, "-t", target, "--force"],
        )
        .await
    }

    pub async fn delete_avd(&self, name: &str) -> Result<()> {
        debug!(avd = name, "deleting avd");
        check_call(&self.android, ["delete", "avd", "-n", name]).await
    }

    /// True if `list avd -c` prints a line exactly equal to `name`.
    pub async fn avd_exists(&self, name: &str) -> Result<bool> {
        let listing = check_output(&self.android, ["list", "avd", "-c"]).await?;
        Ok(listing.lines().any(|line| line.trim_end() == name))
    }

    /// Raw `adb devices` output lines, header included.
    pub async fn devices(&self) -> Result<Vec<String>> {
        let out = check_output(&self.adb, ["devices"]).await?;
        Ok(out.lines().map(str::to_owned).collect())
    }

    /// True when `adb devices` lists `serial` in the `device` state.
    ///
    /// The state token must be exactly `device`; `offline` and transitional
    /// states do not count.
    pub async fn device_online(&self, serial: &str) -> Result<bool> {
        let expected = format!("{serial}\tdevice");
        Ok(self
            .devices()
            .await?
            .iter()
            .any(|line| line.trim_end() == expected))
    }

    /// Runs a shell command on the device and returns its stdout.
    pub async fn shell(&self, serial: &str, command: &[&str]) -> Result<String> {
        let mut args = vec!["-s", serial, "shell"];
        args.extend_from_slice(command);
        check_output(&self.adb, args).await
    }

    pub async fn push(&self, serial: &str, local: &Path, remote: &str) -> Result<()> {
        let local = local.to_string_lossy().into_owned();
        check_call(&self.adb, ["-s", serial, "push", local.as_str(), remote]).await
    }

    pub async fn pull(&self, serial: &str, remote: &str, local: &Path) -> Result<()> {
        let local = local.to_string_lossy().into_owned();
        check_call(&self.adb, ["-s", serial, "pull", remote, local.as_str()]).await
    }

    /// Forwards host `local` to device `remote`, both TCP.
    pub async fn forward(&self, serial: &str, local: u16, remote: u16) -> Result<()> {
        let local = format!("tcp:{local}");
        let remote = format!("tcp:{remote}");
        check_call(&self.adb, ["-s", serial, "forward", &local, &remote]).await
    }

    pub async fn remove_forward(&self, serial: &str, local: u16) -> Result<()> {
        let local = format!("tcp:{local}");
        check_call(&self.adb, ["-s", serial, "forward", "--remove", &local]).await
    }

    pub async fn install(&self, serial: &str, apk: &Path) -> Result<()> {
        let apk = apk.to_string_lossy().into_owned();
        check_call(&self.adb, ["-s", serial, "install", "-r", apk.as_str()]).await
    }

    pub async fn uninstall(&self, serial: &str, package: &str) -> Result<()> {
        check_call(&self.adb, ["-s", serial, "uninstall", package]).await
    }
}
