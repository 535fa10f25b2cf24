//! BLE doorbell ("QPG Doorbell"): a button press rings locally and notifies
//! the connected phone; the phone can ring the board by writing 0x01.

use crate::ble::gatt::{self, doorbell::RING_HDL, RING_ACTIVE};
use crate::ble::link::PeripheralLink;
use crate::config;
use crate::event::{AppEvent, BleEvent, ButtonAction, ButtonEvent};
use crate::hal::{BlePeripheral, Led, StatusLeds};
use crate::queue::EventHandler;
use crate::thread::RingSource;

/// PB5.
pub const RING_BUTTON: u8 = 0;

/// White: advertising / connected.
pub const STATE_LED: Led = Led(0);
/// Blue: blinks on a ring.
pub const RING_LED: Led = Led(1);

pub struct BleDoorbell<B> {
    board: B,
    link: PeripheralLink,
    ring_count: u32,
}

impl<B: BlePeripheral + StatusLeds> BleDoorbell<B> {
    pub fn new(board: B) -> Self {
        Self {
            board,
            link: PeripheralLink::new(config::BLE_DOORBELL_NAME, STATE_LED, config::ADV_BLINK.into()),
            ring_count: 0,
        }
    }

    /// LEDs off, banner, and start advertising.
    pub fn start(&mut self) {
        self.board.set(STATE_LED, false);
        self.board.set(RING_LED, false);

        info!("============================================");
        info!("     QPG6200 BLE DOORBELL DEMO");
        info!("============================================");
        info!("  WHITE blinks = advertising");
        info!("  WHITE solid  = connected to phone");
        info!("  BLUE blinks  = doorbell ring event");
        info!("  PB5 short press = ring doorbell");
        info!("  PB5 hold 2s+    = restart advertising");

        if self.link.start_advertising(&mut self.board).is_err() {
            info!("[BLE] Advertising will start after stack reset...");
        }
    }

    pub fn ring_count(&self) -> u32 {
        self.ring_count
    }

    pub fn link(&self) -> &PeripheralLink {
        &self.link
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    fn ring(&mut self, source: RingSource) {
        self.ring_count = self.ring_count.wrapping_add(1);
        info!("** DING DONG! ** Ring #{} from {}", self.ring_count, source.label());
        self.board.blink(RING_LED, config::BLE_RING_BLINK.into());
    }

    fn on_button(&mut self, event: ButtonEvent) {
        if event.index != RING_BUTTON {
            return;
        }

        match event.action {
            ButtonAction::Pressed => {
                self.ring(RingSource::Local);
                match self.board.notify(RING_HDL, &[RING_ACTIVE]) {
                    Ok(()) => info!("[BLE] Notification sent to phone (value=0x01)"),
                    Err(_) => info!("[BLE] No phone connected - notification not sent"),
                }
            }
            ButtonAction::Released(held) if held >= config::HOLD_RESTART_ADV_SECS => {
                info!("[BLE] Restarting advertising...");
                let _ = self.link.start_advertising(&mut self.board);
            }
            ButtonAction::Held(secs) if secs == config::HOLD_RESTART_ADV_SECS => {
                info!("[BTN] Hold detected - release to restart advertising");
            }
            _ => {}
        }
    }

    fn on_ble(&mut self, event: BleEvent) {
        if self.link.handle(&mut self.board, &event) {
            return;
        }

        match event {
            BleEvent::RingWrite(RING_ACTIVE) => self.ring(RingSource::Phone),
            BleEvent::RingWrite(v) => {
                info!("[BLE] Doorbell reset by phone (value={:#x})", v);
                self.board.set(RING_LED, false);
            }
            BleEvent::NotificationsChanged { handle: gatt::doorbell::RING_CCC_HDL, enabled } => {
                if enabled {
                    info!("[BLE] Phone subscribed to doorbell notifications");
                } else {
                    info!("[BLE] Notifications disabled by phone");
                }
            }
            other => debug!("[BLE] ignored {:?}", other),
        }
    }
}

impl<B: BlePeripheral + StatusLeds> EventHandler for BleDoorbell<B> {
    fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Button(ev) => self.on_button(ev),
            AppEvent::Ble(ev) => self.on_ble(ev),
            _ => {}
        }
    }
}
