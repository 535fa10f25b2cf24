//! Application events.
//!
//! Every producer (interrupt, vendor stack callback, polling task) builds one
//! of these by value and posts it to the [`EventQueue`](crate::queue::EventQueue);
//! the single dispatch task consumes it. There is no "invalid" variant: a
//! stack code that has no meaning for the application is never turned into
//! an event in the first place.

use crate::ble::ScanReport;
use crate::thread::{Role, ThreadParam};

/// Everything the dispatch task reacts to.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppEvent {
    Button(ButtonEvent),
    Ble(BleEvent),
    Analog(AnalogEvent),
    Thread(ThreadEvent),
    /// A one-shot timer armed through [`Scheduler`](crate::hal::Scheduler) expired.
    Timer(Expiry),
}

/// Debounced digital button report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    /// Position of the button in the board's button table.
    pub index: u8,
    pub action: ButtonAction,
}

/// What happened to the button. Held and released carry whole seconds held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonAction {
    Pressed,
    Held(u8),
    Released(u8),
}

impl ButtonEvent {
    pub const fn pressed(index: u8) -> Self {
        Self { index, action: ButtonAction::Pressed }
    }

    pub const fn held(index: u8, secs: u8) -> Self {
        Self { index, action: ButtonAction::Held(secs) }
    }

    pub const fn released(index: u8, held_secs: u8) -> Self {
        Self { index, action: ButtonAction::Released(held_secs) }
    }
}

/// BLE stack notifications after translation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleEvent {
    AdvertiseStarted,
    AdvertiseStopped,
    /// Link up, with the stack's connection handle.
    Connected(u16),
    Disconnected,

    /// Peer wrote the doorbell ring characteristic.
    RingWrite(u8),
    /// Peer wrote the LED control characteristic.
    LedWrite(u8),
    /// Peer wrote one of the Thread commissioning characteristics.
    ThreadParam(ThreadParam),
    /// Peer wrote 0x01 to the Thread join characteristic.
    JoinRequested,
    /// Peer changed a client characteristic configuration descriptor.
    NotificationsChanged { handle: u16, enabled: bool },

    // Central role
    ScanStarted,
    ScanStopped,
    DeviceFound(ScanReport),
    DiscoveryComplete,
}

/// Debounced analog button transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogEvent {
    pub state: AnalogState,
    /// Raw ADC count of the sample that confirmed the transition.
    pub raw: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogState {
    Pressed,
    Released,
}

/// Thread stack notifications after translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThreadEvent {
    /// Attached as child, router or leader.
    Joined(Role),
    Detached,
    /// A ring multicast arrived from another node.
    RingReceived,
    /// Raw `otError` from an asynchronous stack operation.
    Error(u32),
}

/// Deferred callbacks. Each id has at most one pending expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerId {
    /// Doorbell reminder while ringing.
    RingTick,
    /// Doorbell stops ringing on its own.
    AutoDismiss,
    /// Central toggles the remote LED.
    RemoteToggle,
    /// Central (re)starts scanning.
    Rescan,
    /// Blink demo LED toggle.
    BlinkToggle,
    /// Blink demo log line.
    Hello,
}

impl TimerId {
    /// Position in [`TimerId::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const ALL: [TimerId; 6] = [
        TimerId::RingTick,
        TimerId::AutoDismiss,
        TimerId::RemoteToggle,
        TimerId::Rescan,
        TimerId::BlinkToggle,
        TimerId::Hello,
    ];
}

/// A timer expiry as delivered to the dispatch task.
///
/// `epoch` echoes the value the app passed to
/// [`Scheduler::schedule`](crate::hal::Scheduler::schedule). Cancelling a
/// timer cannot recall an expiry that is already queued, so an app bumps its
/// epoch whenever the state that armed the timer ends and drops expiries
/// that carry an older one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Expiry {
    pub id: TimerId,
    pub epoch: u16,
}

impl Expiry {
    pub const fn new(id: TimerId, epoch: u16) -> Self {
        Self { id, epoch }
    }
}
