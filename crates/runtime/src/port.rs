//! Local port allocation by bind probing.

use std::net::TcpListener;

use crate::error::{Error, Result};

/// An inclusive range of candidate ports walked with a fixed stride.
///
/// Emulator control ports come in pairs (console and adb), so that range
/// uses a stride of two; plain TCP ports use a stride of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
    pub stride: u16,
}

impl PortRange {
    pub const fn new(start: u16, end: u16, stride: u16) -> Self {
        Self { start, end, stride }
    }

    /// Returns the lowest candidate port that accepts a local bind.
    ///
    /// The probe listener is dropped before returning, so the caller must
    /// hand the port to its process promptly; two concurrent allocations
    /// from the same range on the same host can otherwise race.
    pub fn allocate(&self) -> Result<u16> {
        let mut port = self.start;
        while port <= self.end {
            if TcpListener::bind(("127.0.0.1", port)).is_ok() {
                return Ok(port);
            }
            port = match port.checked_add(self.stride) {
                Some(next) => next,
                None => break,
            };
        }
        Err(Error::ResourceExhausted {
            start: self.start,
            end: self.end,
        })
    }
}
