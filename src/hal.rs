//! Hardware seams the applications are written against.
//!
//! On target these are implemented by `board::Board` over the vendor SDK;
//! tests implement them with recorders. Applications are generic over a
//! single board type that implements whichever traits they need.

use core::net::Ipv6Addr;

use crate::ble::PeerAddress;
use crate::error::{BleError, ThreadError};
use crate::event::TimerId;
use crate::thread::{Dataset, Role};

/// Logical LED index into the board's status LED table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Led(pub u8);

/// Blink pattern driven by the LED driver in the background.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Blink {
    pub on_ms: u16,
    pub off_ms: u16,
}

impl Blink {
    pub const fn new(on_ms: u16, off_ms: u16) -> Self {
        Self { on_ms, off_ms }
    }
}

impl From<(u16, u16)> for Blink {
    fn from((on_ms, off_ms): (u16, u16)) -> Self {
        Self { on_ms, off_ms }
    }
}

pub trait StatusLeds {
    /// Solid on or off; cancels any blink on that LED.
    fn set(&mut self, led: Led, on: bool);
    fn blink(&mut self, led: Led, pattern: Blink);
}

/// One-shot timers. Expiry is delivered as `AppEvent::Timer(Expiry)`
/// through the event queue, so handlers always run on the dispatch task.
pub trait Scheduler {
    /// Arm `id`; the expiry carries `epoch` back. An id that is already
    /// pending gets a second expiry.
    fn schedule(&mut self, id: TimerId, epoch: u16, after_ms: u32);
    /// Drop every pending expiry of `id`.
    fn cancel(&mut self, id: TimerId);
}

pub trait BlePeripheral {
    fn start_advertising(&mut self) -> Result<(), BleError>;
    fn notify(&mut self, handle: u16, value: &[u8]) -> Result<(), BleError>;
}

pub trait BleCentral {
    fn start_scanning(&mut self) -> Result<(), BleError>;
    fn stop_scanning(&mut self) -> Result<(), BleError>;
    fn connect(&mut self, peer: &PeerAddress) -> Result<(), BleError>;
    fn discover_services(&mut self, conn: u16) -> Result<(), BleError>;
    fn write(&mut self, conn: u16, handle: u16, value: &[u8]) -> Result<(), BleError>;
}

pub trait ThreadStack {
    /// A commissioned dataset survived in non-volatile storage.
    fn has_active_dataset(&mut self) -> bool;
    fn set_active_dataset(&mut self, dataset: &Dataset) -> Result<(), ThreadError>;
    /// Bring up the IPv6 interface and start the Thread protocol.
    fn enable(&mut self) -> Result<(), ThreadError>;
    fn role(&mut self) -> Role;
    fn open_udp(&mut self, port: u16) -> Result<(), ThreadError>;
    fn send_udp(&mut self, addr: Ipv6Addr, port: u16, payload: &[u8]) -> Result<(), ThreadError>;
    /// Erase Thread credentials from non-volatile storage.
    fn factory_reset(&mut self);
}

pub trait SystemControl {
    fn reset(&mut self);
}

/// Single-channel ADC returning raw counts.
pub trait AdcChannel {
    fn read_raw(&mut self) -> Result<u16, crate::error::Error>;
}

/// Free-running microsecond counter. Wraps; use `wrapping_sub` for spans.
pub trait Clock {
    fn now_us(&self) -> u32;
}
