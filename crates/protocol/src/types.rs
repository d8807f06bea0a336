//! DTOs exchanged with the agent.

use serde::{Deserialize, Serialize};

/// Screen-space rectangle in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Rect {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Screen-space point in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Snapshot of a UI element's attributes as reported by the agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjInfo {
    pub bounds: Rect,
    pub visible_bounds: Rect,
    // The agent's field name carries this historical typo; keep it as-is.
    #[serde(rename = "chileCount")]
    pub child_count: i32,
    pub class_name: String,
    pub content_description: String,
    pub package_name: String,
    pub text: String,
    pub checkable: bool,
    pub checked: bool,
    pub clickable: bool,
    pub enabled: bool,
    pub focusable: bool,
    pub focused: bool,
    pub long_clickable: bool,
    pub scrollable: bool,
    pub selected: bool,
}

/// Device-level display and build facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceInfo {
    pub current_package_name: String,
    pub display_width: i32,
    pub display_height: i32,
    pub display_rotation: i32,
    pub display_size_dp_x: i32,
    pub display_size_dp_y: i32,
    pub product_name: String,
    pub natural_orientation: bool,
    pub sdk_int: i32,
}

/// Full set of agent tuning parameters, in milliseconds.
///
/// The agent only accepts this record whole, so updates read it back first,
/// change the field of interest, and write the complete record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfiguratorInfo {
    pub action_acknowledgment_timeout: i64,
    pub key_injection_delay: i64,
    pub scroll_acknowledgment_timeout: i64,
    pub wait_for_idle_timeout: i64,
    pub wait_for_selector_timeout: i64,
}

/// Named corner of an element's visible bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corner {
    #[serde(rename = "topleft")]
    TopLeft,
    #[serde(rename = "bottomright")]
    BottomRight,
    #[serde(rename = "center")]
    Center,
}

/// Direction of a swipe gesture relative to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Target rotation for the device display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Rotate left into landscape.
    Left,
    /// Rotate right into landscape.
    Right,
    /// The device's natural rotation.
    Natural,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn obj_info_decodes_agent_child_count_spelling() {
        let info: ObjInfo = serde_json::from_value(json!({
            "bounds": {"top": 0, "bottom": 100, "left": 0, "right": 200},
            "visibleBounds": {"top": 0, "bottom": 90, "left": 0, "right": 200},
            "chileCount": 3,
            "className": "android.widget.FrameLayout",
            "text": "",
            "enabled": true
        }))
        .unwrap();

        assert_eq!(info.child_count, 3);
        assert_eq!(info.bounds.height(), 100);
        assert_eq!(info.visible_bounds.height(), 90);
        assert!(info.enabled);
        assert!(!info.clickable);
    }

    #[test]
    fn enums_serialize_to_agent_spellings() {
        assert_eq!(
            serde_json::to_value(Corner::TopLeft).unwrap(),
            json!("topleft")
        );
        assert_eq!(
            serde_json::to_value(Corner::BottomRight).unwrap(),
            json!("bottomright")
        );
        assert_eq!(
            serde_json::to_value(SwipeDirection::Up).unwrap(),
            json!("up")
        );
        assert_eq!(
            serde_json::to_value(Orientation::Natural).unwrap(),
            json!("natural")
        );
    }

    #[test]
    fn configurator_info_round_trips_camel_case() {
        let info = ConfiguratorInfo {
            action_acknowledgment_timeout: 3000,
            key_injection_delay: 0,
            scroll_acknowledgment_timeout: 200,
            wait_for_idle_timeout: 10_000,
            wait_for_selector_timeout: 10_000,
        };
        let value = serde_json::to_value(info).unwrap();
        assert_eq!(value["actionAcknowledgmentTimeout"], 3000);
        assert_eq!(value["waitForSelectorTimeout"], 10_000);
        let decoded: ConfiguratorInfo = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, info);
    }
}
