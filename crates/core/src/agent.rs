//! Typed surface over the agent's remote operations.
//!
//! Every method maps to exactly one remote call. Overloaded agent methods
//! (`click` on coordinates, an object, or a corner) get one Rust method per
//! shape. Decoding failures and agent faults surface as errors here; any
//! downgrading of not-found to a boolean is the caller's business.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use uiauto_protocol::{
    ConfiguratorInfo, Corner, DeviceInfo, ObjInfo, Orientation, Selector, SwipeDirection,
};
use uiauto_runtime::{AgentTransport, Result};

/// Opaque identifier the agent assigns to a resolved UI element.
pub type RemoteObjectId = String;

/// One connected agent, shared by every handle created from it.
#[derive(Clone)]
pub struct AgentService {
    transport: Arc<dyn AgentTransport>,
}

impl AgentService {
    pub fn new(transport: Arc<dyn AgentTransport>) -> Self {
        Self { transport }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T> {
        let value = self.transport.invoke(method, params).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn call_unit(&self, method: &str, params: Vec<Value>) -> Result<()> {
        self.transport.invoke(method, params).await?;
        Ok(())
    }

    // Resolution.

    /// Resolves a selector to a fresh remote object id.
    pub async fn get_ui_object(&self, selector: &Selector) -> Result<RemoteObjectId> {
        self.call("getUiObject", vec![json!(selector)]).await
    }

    /// Resolves a selector among the children of a resolved element.
    pub async fn get_child(
        &self,
        id: &RemoteObjectId,
        selector: &Selector,
    ) -> Result<RemoteObjectId> {
        self.call("getChild", vec![json!(id), json!(selector)]).await
    }

    /// Resolves a selector in the parent subtree of a resolved element.
    pub async fn get_from_parent(
        &self,
        id: &RemoteObjectId,
        selector: &Selector,
    ) -> Result<RemoteObjectId> {
        self.call("getFromParent", vec![json!(id), json!(selector)])
            .await
    }

    /// Finds a child by text inside the container the selector describes.
    /// The container is resolved on the agent in the same call.
    pub async fn child_by_text(
        &self,
        container: &Selector,
        child: &Selector,
        text: &str,
    ) -> Result<RemoteObjectId> {
        self.call(
            "childByText",
            vec![json!(container), json!(child), json!(text)],
        )
        .await
    }

    pub async fn child_by_text_with_scroll(
        &self,
        container: &Selector,
        child: &Selector,
        text: &str,
        allow_scroll: bool,
    ) -> Result<RemoteObjectId> {
        self.call(
            "childByText",
            vec![json!(container), json!(child), json!(text), json!(allow_scroll)],
        )
        .await
    }

    pub async fn child_by_description(
        &self,
        container: &Selector,
        child: &Selector,
        description: &str,
    ) -> Result<RemoteObjectId> {
        self.call(
            "childByDescription",
            vec![json!(container), json!(child), json!(description)],
        )
        .await
    }

    pub async fn child_by_description_with_scroll(
        &self,
        container: &Selector,
        child: &Selector,
        description: &str,
        allow_scroll: bool,
    ) -> Result<RemoteObjectId> {
        self.call(
            "childByDescription",
            vec![
                json!(container),
                json!(child),
                json!(description),
                json!(allow_scroll),
            ],
        )
        .await
    }

    pub async fn child_by_instance(
        &self,
        container: &Selector,
        child: &Selector,
        instance: u32,
    ) -> Result<RemoteObjectId> {
        self.call(
            "childByInstance",
            vec![json!(container), json!(child), json!(instance)],
        )
        .await
    }

    // Element queries.

    pub async fn obj_info(&self, id: &RemoteObjectId) -> Result<ObjInfo> {
        self.call("objInfo", vec![json!(id)]).await
    }

    /// Asks the agent whether any element matches the selector right now.
    pub async fn exist(&self, selector: &Selector) -> Result<bool> {
        self.call("exist", vec![json!(selector)]).await
    }

    pub async fn wait_for_exists(&self, selector: &Selector, timeout_ms: u64) -> Result<bool> {
        self.call("waitForExists", vec![json!(selector), json!(timeout_ms)])
            .await
    }

    pub async fn wait_until_gone(&self, selector: &Selector, timeout_ms: u64) -> Result<bool> {
        self.call("waitUntilGone", vec![json!(selector), json!(timeout_ms)])
            .await
    }

    pub async fn get_text(&self, id: &RemoteObjectId) -> Result<String> {
        self.call("getText", vec![json!(id)]).await
    }

    // Element actions.

    pub async fn click(&self, id: &RemoteObjectId) -> Result<bool> {
        self.call("click", vec![json!(id)]).await
    }

    pub async fn click_corner(&self, id: &RemoteObjectId, corner: Corner) -> Result<bool> {
        self.call("click", vec![json!(id), json!(corner)]).await
    }

    pub async fn click_and_wait_for_new_window(
        &self,
        id: &RemoteObjectId,
        timeout_ms: u64,
    ) -> Result<bool> {
        self.call(
            "clickAndWaitForNewWindow",
            vec![json!(id), json!(timeout_ms)],
        )
        .await
    }

    pub async fn long_click(&self, id: &RemoteObjectId) -> Result<bool> {
        self.call("longClick", vec![json!(id)]).await
    }

    pub async fn long_click_corner(&self, id: &RemoteObjectId, corner: Corner) -> Result<bool> {
        self.call("longClick", vec![json!(id), json!(corner)]).await
    }

    pub async fn set_text(&self, id: &RemoteObjectId, text: &str) -> Result<bool> {
        self.call("setText", vec![json!(id), json!(text)]).await
    }

    pub async fn clear_text_field(&self, id: &RemoteObjectId) -> Result<()> {
        self.call_unit("clearTextField", vec![json!(id)]).await
    }

    pub async fn swipe_element(
        &self,
        id: &RemoteObjectId,
        direction: SwipeDirection,
        steps: u32,
    ) -> Result<bool> {
        self.call("swipe", vec![json!(id), json!(direction), json!(steps)])
            .await
    }

    pub async fn drag_to_point(
        &self,
        id: &RemoteObjectId,
        x: i32,
        y: i32,
        steps: u32,
    ) -> Result<bool> {
        self.call(
            "dragTo",
            vec![json!(id), json!(x), json!(y), json!(steps)],
        )
        .await
    }

    pub async fn drag_to_selector(
        &self,
        id: &RemoteObjectId,
        target: &Selector,
        steps: u32,
    ) -> Result<bool> {
        self.call("dragTo", vec![json!(id), json!(target), json!(steps)])
            .await
    }

    pub async fn pinch_in(&self, id: &RemoteObjectId, percent: u32, steps: u32) -> Result<bool> {
        self.call("pinchIn", vec![json!(id), json!(percent), json!(steps)])
            .await
    }

    pub async fn pinch_out(&self, id: &RemoteObjectId, percent: u32, steps: u32) -> Result<bool> {
        self.call("pinchOut", vec![json!(id), json!(percent), json!(steps)])
            .await
    }

    /// Two-finger gesture from two start points to two end points.
    pub async fn gesture(
        &self,
        id: &RemoteObjectId,
        start1: (i32, i32),
        start2: (i32, i32),
        end1: (i32, i32),
        end2: (i32, i32),
        steps: u32,
    ) -> Result<bool> {
        let point = |(x, y): (i32, i32)| json!({"x": x, "y": y});
        self.call(
            "gesture",
            vec![
                json!(id),
                point(start1),
                point(start2),
                point(end1),
                point(end2),
                json!(steps),
            ],
        )
        .await
    }

    // Scrolling, addressed by container selector.

    pub async fn scroll_to(
        &self,
        container: &Selector,
        target: &Selector,
        vertical: bool,
    ) -> Result<bool> {
        self.call(
            "scrollTo",
            vec![json!(container), json!(target), json!(vertical)],
        )
        .await
    }

    pub async fn scroll_forward(
        &self,
        container: &Selector,
        vertical: bool,
        steps: u32,
    ) -> Result<bool> {
        self.call(
            "scrollForward",
            vec![json!(container), json!(vertical), json!(steps)],
        )
        .await
    }

    pub async fn scroll_backward(
        &self,
        container: &Selector,
        vertical: bool,
        steps: u32,
    ) -> Result<bool> {
        self.call(
            "scrollBackward",
            vec![json!(container), json!(vertical), json!(steps)],
        )
        .await
    }

    pub async fn scroll_to_beginning(
        &self,
        container: &Selector,
        vertical: bool,
        max_swipes: u32,
        steps: u32,
    ) -> Result<bool> {
        self.call(
            "scrollToBeginning",
            vec![json!(container), json!(vertical), json!(max_swipes), json!(steps)],
        )
        .await
    }

    pub async fn scroll_to_end(
        &self,
        container: &Selector,
        vertical: bool,
        max_swipes: u32,
        steps: u32,
    ) -> Result<bool> {
        self.call(
            "scrollToEnd",
            vec![json!(container), json!(vertical), json!(max_swipes), json!(steps)],
        )
        .await
    }

    pub async fn fling_forward(&self, container: &Selector, vertical: bool) -> Result<bool> {
        self.call("flingForward", vec![json!(container), json!(vertical)])
            .await
    }

    pub async fn fling_backward(&self, container: &Selector, vertical: bool) -> Result<bool> {
        self.call("flingBackward", vec![json!(container), json!(vertical)])
            .await
    }

    pub async fn fling_to_beginning(
        &self,
        container: &Selector,
        vertical: bool,
        max_swipes: u32,
    ) -> Result<bool> {
        self.call(
            "flingToBeginning",
            vec![json!(container), json!(vertical), json!(max_swipes)],
        )
        .await
    }

    pub async fn fling_to_end(
        &self,
        container: &Selector,
        vertical: bool,
        max_swipes: u32,
    ) -> Result<bool> {
        self.call(
            "flingToEnd",
            vec![json!(container), json!(vertical), json!(max_swipes)],
        )
        .await
    }

    // Device level.

    pub async fn device_info(&self) -> Result<DeviceInfo> {
        self.call("deviceInfo", vec![]).await
    }

    pub async fn press_key(&self, name: &str) -> Result<bool> {
        self.call("pressKey", vec![json!(name)]).await
    }

    pub async fn press_key_code(&self, code: i32) -> Result<bool> {
        self.call("pressKeyCode", vec![json!(code)]).await
    }

    pub async fn press_key_code_with_meta(&self, code: i32, meta_state: i32) -> Result<bool> {
        self.call("pressKeyCode", vec![json!(code), json!(meta_state)])
            .await
    }

    pub async fn click_at(&self, x: i32, y: i32) -> Result<bool> {
        self.call("click", vec![json!(x), json!(y)]).await
    }

    pub async fn swipe(
        &self,
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
        steps: u32,
    ) -> Result<bool> {
        self.call(
            "swipe",
            vec![json!(start_x), json!(start_y), json!(end_x), json!(end_y), json!(steps)],
        )
        .await
    }

    pub async fn drag(
        &self,
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
        steps: u32,
    ) -> Result<bool> {
        self.call(
            "drag",
            vec![json!(start_x), json!(start_y), json!(end_x), json!(end_y), json!(steps)],
        )
        .await
    }

    pub async fn wake_up(&self) -> Result<()> {
        self.call_unit("wakeUp", vec![]).await
    }

    pub async fn sleep(&self) -> Result<()> {
        self.call_unit("sleep", vec![]).await
    }

    pub async fn is_screen_on(&self) -> Result<bool> {
        self.call("isScreenOn", vec![]).await
    }

    pub async fn open_notification(&self) -> Result<bool> {
        self.call("openNotification", vec![]).await
    }

    pub async fn open_quick_settings(&self) -> Result<bool> {
        self.call("openQuickSettings", vec![]).await
    }

    pub async fn set_orientation(&self, orientation: Orientation) -> Result<()> {
        self.call_unit("setOrientation", vec![json!(orientation)])
            .await
    }

    pub async fn freeze_rotation(&self, freeze: bool) -> Result<()> {
        self.call_unit("freezeRotation", vec![json!(freeze)]).await
    }

    pub async fn wait_for_idle(&self, timeout_ms: u64) -> Result<()> {
        self.call_unit("waitForIdle", vec![json!(timeout_ms)]).await
    }

    pub async fn wait_for_window_update(
        &self,
        package: Option<&str>,
        timeout_ms: u64,
    ) -> Result<bool> {
        self.call(
            "waitForWindowUpdate",
            vec![json!(package), json!(timeout_ms)],
        )
        .await
    }

    /// Returns the on-device path of the written screenshot.
    pub async fn take_screenshot(
        &self,
        filename: &str,
        scale: f32,
        quality: u32,
    ) -> Result<String> {
        self.call(
            "takeScreenshot",
            vec![json!(filename), json!(scale), json!(quality)],
        )
        .await
    }

    /// Returns the on-device path of the written hierarchy dump.
    pub async fn dump_window_hierarchy(
        &self,
        compressed: bool,
        filename: &str,
    ) -> Result<String> {
        self.call(
            "dumpWindowHierarchy",
            vec![json!(compressed), json!(filename)],
        )
        .await
    }

    pub async fn get_last_traversed_text(&self) -> Result<String> {
        self.call("getLastTraversedText", vec![]).await
    }

    pub async fn clear_last_traversed_text(&self) -> Result<()> {
        self.call_unit("clearLastTraversedText", vec![]).await
    }

    // Watchers.

    pub async fn run_watchers(&self) -> Result<()> {
        self.call_unit("runWatchers", vec![]).await
    }

    pub async fn remove_watcher(&self, name: &str) -> Result<()> {
        self.call_unit("removeWatcher", vec![json!(name)]).await
    }

    pub async fn reset_watcher_triggers(&self) -> Result<()> {
        self.call_unit("resetWatcherTriggers", vec![]).await
    }

    pub async fn has_watcher_triggered(&self, name: &str) -> Result<bool> {
        self.call("hasWatcherTriggered", vec![json!(name)]).await
    }

    pub async fn has_any_watcher_triggered(&self) -> Result<bool> {
        self.call("hasAnyWatcherTriggered", vec![]).await
    }

    // Agent configuration.

    pub async fn get_configurator(&self) -> Result<ConfiguratorInfo> {
        self.call("getConfigurator", vec![]).await
    }

    pub async fn set_configurator(&self, info: &ConfiguratorInfo) -> Result<ConfiguratorInfo> {
        self.call("setConfigurator", vec![json!(info)]).await
    }
}
