//! End-to-end session lifecycle against a mocked Android SDK.
//!
//! The mock tools are shell scripts under a temporary SDK root. State files
//! next to them stand in for the real side effects: an `avds` marker per
//! created AVD and an `online` file holding the `adb devices` body.

use std::fs;
use std::net::TcpListener;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use uiauto_runtime::{PortRange, SdkTools, SessionConfig, SessionRegistry, SessionState};

const MOCK_EMULATOR: &str = r#"#!/bin/sh
root=$(dirname "$0")/..
echo "$@" >> "$root/emulator.args"
exec sleep 600
"#;

const MOCK_ANDROID: &str = r#"#!/bin/sh
root=$(dirname "$0")/..
case "$1 $2" in
    "create avd") touch "$root/avd_$4" ;;
    "delete avd") rm -f "$root/avd_$4" ;;
    "list avd")
        for f in "$root"/avd_*; do
            [ -e "$f" ] && basename "$f" | sed 's/^avd_//'
        done
        ;;
esac
exit 0
"#;

const MOCK_ADB: &str = r#"#!/bin/sh
root=$(dirname "$0")/..
echo "$@" >> "$root/adb.log"
cmd="$1"
if [ "$1" = "-s" ]; then
    shift 2
    cmd="$1"
fi
case "$cmd" in
    devices)
        echo "List of devices attached"
        [ -f "$root/online" ] && cat "$root/online"
        ;;
    shell)
        shift
        case "$1" in
            uiautomator)
                [ "$2" = "runtest" ] && exec sleep 600
                ;;
        esac
        ;;
esac
exit 0
"#;

fn write_tool(root: &Path, rel: &str, script: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn mock_sdk() -> TempDir {
    let root = TempDir::new().unwrap();
    write_tool(root.path(), "tools/emulator", MOCK_EMULATOR);
    write_tool(root.path(), "tools/android", MOCK_ANDROID);
    write_tool(root.path(), "platform-tools/adb", MOCK_ADB);
    root
}

fn test_config(root: &Path) -> SessionConfig {
    let bundle = root.join("bundle.jar");
    let stub = root.join("uiautomator-stub.jar");
    fs::write(&bundle, b"jar").unwrap();
    fs::write(&stub, b"jar").unwrap();
    SessionConfig {
        bundle_jar: bundle,
        stub_jar: stub,
        poll_interval: Duration::from_millis(10),
        online_deadline: Duration::from_secs(5),
        agent_deadline: Duration::from_secs(5),
        agent_ports: PortRange::new(39008, 39030, 1),
        ..SessionConfig::default()
    }
}

fn mark_online(root: &Path, serial: &str) {
    fs::write(root.join("online"), format!("{serial}\tdevice\n")).unwrap();
}

#[tokio::test]
async fn full_lifecycle_walks_every_state() {
    let sdk_root = mock_sdk();
    let config = test_config(sdk_root.path());
    let registry = SessionRegistry::new(SdkTools::new(sdk_root.path()), config);

    let session = registry.session("itest-avd");
    assert_eq!(session.state(), SessionState::Uninstantiated);

    session.create().await.unwrap();
    assert_eq!(session.state(), SessionState::Created);
    assert!(sdk_root.path().join("avd_itest-avd").exists());

    session.start().await.unwrap();
    assert_eq!(session.state(), SessionState::Started);
    let port = session.control_port().unwrap();
    let serial = session.serial().unwrap();
    assert_eq!(serial, format!("emulator-{port}"));

    // The emulator command line carries the AVD name and allocated port.
    let args = wait_for_file(&sdk_root.path().join("emulator.args")).await;
    assert!(args.contains("-avd itest-avd"));
    assert!(args.contains(&format!("-port {port}")));
    assert!(args.contains("-no-boot-anim"));

    // Not listed by adb yet.
    assert!(!session.is_online().await.unwrap());

    mark_online(sdk_root.path(), &serial);
    session.wait_for_online().await.unwrap();
    assert_eq!(session.state(), SessionState::Online);

    // The agent's forwarded port is published before the readiness poll, so
    // a listener bound there satisfies the wait.
    let starting = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.start_agent().await })
    };
    let agent_port = loop {
        if let Some(p) = session.agent_port() {
            break p;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    };
    let _agent_listener = TcpListener::bind(("127.0.0.1", agent_port)).unwrap();
    starting.await.unwrap().unwrap();
    assert_eq!(session.state(), SessionState::AgentRunning);

    // Second call is a no-op while the agent runs.
    session.start_agent().await.unwrap();
    assert_eq!(session.state(), SessionState::AgentRunning);

    let log = fs::read_to_string(sdk_root.path().join("adb.log")).unwrap();
    assert!(log.contains(&format!("-s {serial} push")));
    assert!(log.contains(&format!("-s {serial} forward tcp:{agent_port} tcp:9008")));
    assert!(log.contains("uiautomator runtest uiautomator-stub.jar bundle.jar -c com.github.uiautomatorstub.Stub"));

    // Stopping tears down only the agent; the emulator stays addressable.
    session.stop().await.unwrap();
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(session.agent_port(), None);
    assert!(session.is_online().await.unwrap());
    let log = fs::read_to_string(sdk_root.path().join("adb.log")).unwrap();
    assert!(log.contains(&format!("forward --remove tcp:{agent_port}")));

    session.delete().await.unwrap();
    assert_eq!(session.state(), SessionState::Deleted);
    assert!(!sdk_root.path().join("avd_itest-avd").exists());

    // The name can be instantiated again after deletion.
    let fresh = registry.session("itest-avd");
    assert!(!Arc::ptr_eq(&session, &fresh));
    assert_eq!(fresh.state(), SessionState::Uninstantiated);
}

#[tokio::test]
async fn second_start_keeps_the_running_emulator() {
    let sdk_root = mock_sdk();
    let config = test_config(sdk_root.path());
    let registry = SessionRegistry::new(SdkTools::new(sdk_root.path()), config);

    let session = registry.session("started-twice");
    session.create().await.unwrap();
    session.start().await.unwrap();
    let port = session.control_port().unwrap();
    wait_for_file(&sdk_root.path().join("emulator.args")).await;

    session.start().await.unwrap();
    assert_eq!(session.control_port(), Some(port));

    // Exactly one launch; the held process was not replaced.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let args = fs::read_to_string(sdk_root.path().join("emulator.args")).unwrap();
    assert_eq!(args.lines().count(), 1);

    session.delete().await.unwrap();
}

#[tokio::test]
async fn failed_agent_start_unwinds_for_a_clean_retry() {
    let sdk_root = mock_sdk();
    let config = SessionConfig {
        agent_deadline: Duration::from_secs(1),
        ..test_config(sdk_root.path())
    };
    let registry = SessionRegistry::new(SdkTools::new(sdk_root.path()), config);

    let session = registry.session("slow-agent");
    session.create().await.unwrap();
    session.start().await.unwrap();
    let serial = session.serial().unwrap();
    mark_online(sdk_root.path(), &serial);
    session.wait_for_online().await.unwrap();

    // Nothing listens on the forwarded port, so the readiness wait expires.
    let err = session.start_agent().await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(session.state(), SessionState::Online);
    assert_eq!(session.agent_port(), None);

    // The forward installed by the failed attempt was removed again.
    let log = fs::read_to_string(sdk_root.path().join("adb.log")).unwrap();
    let installed: Vec<&str> = log
        .lines()
        .filter(|line| line.contains("forward tcp:"))
        .collect();
    let removed: Vec<&str> = log
        .lines()
        .filter(|line| line.contains("forward --remove"))
        .collect();
    assert_eq!(installed.len(), 1);
    assert_eq!(removed.len(), 1);

    // A retry starts from scratch and succeeds once the agent answers.
    let starting = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.start_agent().await })
    };
    let agent_port = loop {
        if let Some(p) = session.agent_port() {
            break p;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    };
    let _agent_listener = TcpListener::bind(("127.0.0.1", agent_port)).unwrap();
    starting.await.unwrap().unwrap();
    assert_eq!(session.state(), SessionState::AgentRunning);

    session.delete().await.unwrap();
}

#[tokio::test]
async fn wait_for_online_times_out_when_device_never_lists() {
    let sdk_root = mock_sdk();
    let config = SessionConfig {
        online_deadline: Duration::from_millis(50),
        ..test_config(sdk_root.path())
    };
    let registry = SessionRegistry::new(SdkTools::new(sdk_root.path()), config);

    let session = registry.session("never-boots");
    session.create().await.unwrap();
    session.start().await.unwrap();

    let err = session.wait_for_online().await.unwrap_err();
    assert!(err.is_timeout());
    // Still short of online; the process side is untouched.
    assert_eq!(session.state(), SessionState::Started);

    session.delete().await.unwrap();
}

#[tokio::test]
async fn artifact_capture_round_trips_through_adb() {
    let sdk_root = mock_sdk();
    let config = test_config(sdk_root.path());
    let registry = SessionRegistry::new(SdkTools::new(sdk_root.path()), config);

    let session = registry.session("artifacts");
    session.create().await.unwrap();
    session.start().await.unwrap();
    let serial = session.serial().unwrap();

    let shot = sdk_root.path().join("screen.png");
    session.capture_screenshot(&shot).await.unwrap();
    let dump = sdk_root.path().join("ui.xml");
    session.capture_ui_dump(&dump).await.unwrap();

    let log = fs::read_to_string(sdk_root.path().join("adb.log")).unwrap();
    assert!(log.contains(&format!(
        "-s {serial} shell screencap -p /data/local/tmp/screenshot.png"
    )));
    assert!(log.contains(&format!(
        "-s {serial} shell uiautomator dump /data/local/tmp/window_dump.xml"
    )));
    assert!(log.contains(&format!("-s {serial} pull /data/local/tmp/screenshot.png")));

    session.delete().await.unwrap();
}

async fn wait_for_file(path: &Path) -> String {
    for _ in 0..200 {
        if let Ok(contents) = fs::read_to_string(path) {
            if !contents.is_empty() {
                return contents;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("file never appeared: {}", path.display());
}
