//! Device-level operations and handle construction.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use uiauto_protocol::{DeviceInfo, Orientation, Selector};
use uiauto_runtime::{AgentTransport, HttpTransport, Result};

use crate::agent::AgentService;
use crate::collection::{UiCollection, UiScrollable};
use crate::config::Configurator;
use crate::object::{Handle, UiObject};

/// The device behind one agent connection.
pub struct UiDevice {
    agent: AgentService,
    compressed_dumps: AtomicBool,
}

impl UiDevice {
    pub fn new(transport: Arc<dyn AgentTransport>) -> Self {
        Self {
            agent: AgentService::new(transport),
            compressed_dumps: AtomicBool::new(false),
        }
    }

    /// Connects to an agent forwarded to the given local port.
    pub fn connect(port: u16) -> Self {
        Self::new(Arc::new(HttpTransport::new(port)))
    }

    pub fn agent(&self) -> &AgentService {
        &self.agent
    }

    /// A lazy handle for the first element matching `selector`.
    pub fn find(&self, selector: Selector) -> UiObject {
        UiObject::new(self.agent.clone(), Handle::Selector(selector))
    }

    /// A collection container addressed by `selector`.
    pub fn collection(&self, selector: Selector) -> UiCollection {
        UiCollection::new(self.agent.clone(), selector)
    }

    /// A scrollable container addressed by `selector`, vertical by default.
    pub fn scrollable(&self, selector: Selector) -> UiScrollable {
        UiScrollable::new(self.agent.clone(), selector)
    }

    pub fn configurator(&self) -> Configurator {
        Configurator::new(self.agent.clone())
    }

    pub async fn info(&self) -> Result<DeviceInfo> {
        self.agent.device_info().await
    }

    // Key input.

    pub async fn press_home(&self) -> Result<bool> {
        self.agent.press_key("home").await
    }

    pub async fn press_back(&self) -> Result<bool> {
        self.agent.press_key("back").await
    }

    pub async fn press_menu(&self) -> Result<bool> {
        self.agent.press_key("menu").await
    }

    pub async fn press_search(&self) -> Result<bool> {
        self.agent.press_key("search").await
    }

    pub async fn press_enter(&self) -> Result<bool> {
        self.agent.press_key("enter").await
    }

    pub async fn press_delete(&self) -> Result<bool> {
        self.agent.press_key("delete").await
    }

    pub async fn press_recent_apps(&self) -> Result<bool> {
        self.agent.press_key("recent").await
    }

    pub async fn press_key(&self, name: &str) -> Result<bool> {
        self.agent.press_key(name).await
    }

    pub async fn press_key_code(&self, code: i32) -> Result<bool> {
        self.agent.press_key_code(code).await
    }

    pub async fn press_key_code_with_meta(&self, code: i32, meta_state: i32) -> Result<bool> {
        self.agent.press_key_code_with_meta(code, meta_state).await
    }

    // Pointer input by coordinate.

    pub async fn click(&self, x: i32, y: i32) -> Result<bool> {
        self.agent.click_at(x, y).await
    }

    pub async fn swipe(
        &self,
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
        steps: u32,
    ) -> Result<bool> {
        self.agent.swipe(start_x, start_y, end_x, end_y, steps).await
    }

    pub async fn drag(
        &self,
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
        steps: u32,
    ) -> Result<bool> {
        self.agent.drag(start_x, start_y, end_x, end_y, steps).await
    }

    // Screen and rotation.

    pub async fn wake_up(&self) -> Result<()> {
        self.agent.wake_up().await
    }

    pub async fn sleep(&self) -> Result<()> {
        self.agent.sleep().await
    }

    pub async fn is_screen_on(&self) -> Result<bool> {
        self.agent.is_screen_on().await
    }

    pub async fn open_notification(&self) -> Result<bool> {
        self.agent.open_notification().await
    }

    pub async fn open_quick_settings(&self) -> Result<bool> {
        self.agent.open_quick_settings().await
    }

    pub async fn set_orientation(&self, orientation: Orientation) -> Result<()> {
        self.agent.set_orientation(orientation).await
    }

    pub async fn freeze_rotation(&self) -> Result<()> {
        self.agent.freeze_rotation(true).await
    }

    pub async fn unfreeze_rotation(&self) -> Result<()> {
        self.agent.freeze_rotation(false).await
    }

    // Synchronization.

    pub async fn wait_for_idle(&self, timeout_ms: u64) -> Result<()> {
        self.agent.wait_for_idle(timeout_ms).await
    }

    pub async fn wait_for_window_update(
        &self,
        package: Option<&str>,
        timeout_ms: u64,
    ) -> Result<bool> {
        self.agent.wait_for_window_update(package, timeout_ms).await
    }

    // Introspection artifacts.

    /// Writes a screenshot on the device and returns its remote path.
    pub async fn take_screenshot(&self, filename: &str, scale: f32, quality: u32) -> Result<String> {
        self.agent.take_screenshot(filename, scale, quality).await
    }

    /// Choose whether hierarchy dumps use the compressed layout.
    pub fn set_compressed_hierarchy(&self, compressed: bool) {
        self.compressed_dumps.store(compressed, Ordering::Relaxed);
    }

    /// Writes a hierarchy dump on the device and returns its remote path.
    pub async fn dump_window_hierarchy(&self, filename: &str) -> Result<String> {
        let compressed = self.compressed_dumps.load(Ordering::Relaxed);
        self.agent.dump_window_hierarchy(compressed, filename).await
    }

    pub async fn last_traversed_text(&self) -> Result<String> {
        self.agent.get_last_traversed_text().await
    }

    pub async fn clear_last_traversed_text(&self) -> Result<()> {
        self.agent.clear_last_traversed_text().await
    }

    // Watchers.

    pub async fn run_watchers(&self) -> Result<()> {
        self.agent.run_watchers().await
    }

    pub async fn remove_watcher(&self, name: &str) -> Result<()> {
        self.agent.remove_watcher(name).await
    }

    pub async fn reset_watcher_triggers(&self) -> Result<()> {
        self.agent.reset_watcher_triggers().await
    }

    pub async fn has_watcher_triggered(&self, name: &str) -> Result<bool> {
        self.agent.has_watcher_triggered(name).await
    }

    pub async fn has_any_watcher_triggered(&self) -> Result<bool> {
        self.agent.has_any_watcher_triggered().await
    }
}
