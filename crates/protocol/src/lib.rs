//! Wire types for the on-device automation agent protocol.
//!
//! These types mirror what the agent expects on the wire: selectors with a
//! presence bitmask, element/device info DTOs, and the JSON-RPC envelope the
//! agent speaks over its forwarded HTTP port. No I/O lives here.

pub mod rpc;
pub mod selector;
pub mod types;

pub use rpc::{FaultKind, RpcError, RpcRequest, RpcResponse};
pub use selector::{ChainKind, Selector, mask};
pub use types::{
    ConfiguratorInfo, Corner, DeviceInfo, ObjInfo, Orientation, Point, Rect, SwipeDirection,
};
