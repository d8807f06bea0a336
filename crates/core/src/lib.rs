//! Client for driving Android UI automation agents across emulator fleets.
//!
//! The crate splits into two halves. Session management lives in
//! [`uiauto_runtime`]: creating AVDs, launching emulators on allocated
//! ports, pushing and starting the on-device agent, and tearing everything
//! down. This crate adds the typed remote surface on top: [`UiDevice`] for
//! device-wide operations, [`UiObject`] handles that name elements lazily
//! and resolve them per action, and [`UiCollection`]/[`UiScrollable`] for
//! container-relative lookups.
//!
//! ```no_run
//! use uiauto::{Selector, UiDevice};
//!
//! async fn dismiss_dialog(device: &UiDevice) -> uiauto::Result<()> {
//!     let ok = device.find(Selector::new().text("OK"));
//!     if ok.exists().await? {
//!         ok.click().await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod collection;
pub mod config;
pub mod device;
pub mod object;

#[cfg(test)]
pub(crate) mod testkit;

pub use agent::{AgentService, RemoteObjectId};
pub use collection::{UiCollection, UiScrollable};
pub use config::Configurator;
pub use device::UiDevice;
pub use object::{ChainStep, Handle, UiObject};

pub use uiauto_protocol::{
    ChainKind, ConfiguratorInfo, Corner, DeviceInfo, ObjInfo, Orientation, Point, Rect, Selector,
    SwipeDirection, mask,
};
pub use uiauto_runtime::{
    AgentTransport, EmulatorSession, Error, HttpTransport, Result, SdkTools, SessionConfig,
    SessionRegistry, SessionState,
};
