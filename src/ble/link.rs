//! Peripheral link tracking: Advertising -> Connected -> (close) ->
//! Advertising again, mirrored on one status LED.

use crate::error::BleError;
use crate::event::BleEvent;
use crate::hal::{BlePeripheral, Blink, Led, StatusLeds};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Neither advertising nor connected.
    Idle,
    Advertising,
    /// Connected, with the stack's connection handle.
    Connected(u16),
}

/// Link state plus the LED that shows it: blinking while advertising,
/// solid while connected, off otherwise.
#[derive(Debug)]
pub struct PeripheralLink {
    name: &'static str,
    led: Led,
    adv_blink: Blink,
    state: LinkState,
}

impl PeripheralLink {
    pub const fn new(name: &'static str, led: Led, adv_blink: Blink) -> Self {
        Self {
            name,
            led,
            adv_blink,
            state: LinkState::Idle,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, LinkState::Connected(_))
    }

    /// Ask the stack to advertise; the LED follows once the stack confirms.
    pub fn start_advertising<B: BlePeripheral>(&self, board: &mut B) -> Result<(), BleError> {
        match board.start_advertising() {
            Ok(()) => {
                info!("[BLE] Advertising started - scan for '{}'", self.name);
                Ok(())
            }
            Err(e) => {
                info!("[BLE] Already advertising or connected ({:?})", e);
                Err(e)
            }
        }
    }

    /// Apply a link event. Returns `false` for events that are not about
    /// the link, so the caller can handle them.
    pub fn handle<B>(&mut self, board: &mut B, event: &BleEvent) -> bool
    where
        B: BlePeripheral + StatusLeds,
    {
        match *event {
            BleEvent::AdvertiseStarted => {
                info!("[BLE] Advertising");
                self.state = LinkState::Advertising;
                board.blink(self.led, self.adv_blink);
            }
            BleEvent::AdvertiseStopped => {
                // The stack also stops advertising when a central connects.
                if self.state == LinkState::Advertising {
                    info!("[BLE] Advertising stopped");
                    self.state = LinkState::Idle;
                    board.set(self.led, false);
                }
            }
            BleEvent::Connected(conn) => {
                info!("[BLE] Connected (handle {})", conn);
                self.state = LinkState::Connected(conn);
                board.set(self.led, true);
            }
            BleEvent::Disconnected => {
                info!("[BLE] Disconnected - restarting advertising");
                self.state = LinkState::Idle;
                board.set(self.led, false);
                let _ = self.start_advertising(board);
            }
            _ => return false,
        }
        true
    }
}
