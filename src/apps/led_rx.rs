//! BLE LED receiver ("LedRX"): a phone (or the LED transmitter) switches
//! the state LED by writing the control characteristic.

use crate::ble::link::PeripheralLink;
use crate::config;
use crate::event::{AppEvent, BleEvent, ButtonAction, ButtonEvent};
use crate::hal::{BlePeripheral, Led, StatusLeds};
use crate::queue::EventHandler;

pub const MULTI_FUNC_BUTTON: u8 = 0;

/// Shows the link: blinking advertising, solid connected.
pub const CONNECTION_LED: Led = Led(0);
/// Driven by writes and short presses.
pub const STATE_LED: Led = Led(1);

pub struct LedReceiver<B> {
    board: B,
    link: PeripheralLink,
    led_on: bool,
}

impl<B: BlePeripheral + StatusLeds> LedReceiver<B> {
    pub fn new(board: B) -> Self {
        Self {
            board,
            link: PeripheralLink::new(config::LEDRX_NAME, CONNECTION_LED, config::LEDRX_ADV_BLINK.into()),
            led_on: false,
        }
    }

    pub fn start(&mut self) {
        self.board.set(STATE_LED, false);
        self.board.set(CONNECTION_LED, false);
        info!("=== {} ===", config::LEDRX_NAME);
        info!("  short press  = toggle LED");
        info!("  hold 2-10 s  = restart advertising");
        let _ = self.link.start_advertising(&mut self.board);
    }

    pub fn led_on(&self) -> bool {
        self.led_on
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

    fn set_led(&mut self, on: bool) {
        self.led_on = on;
        self.board.set(STATE_LED, on);
    }

    fn on_button(&mut self, event: ButtonEvent) {
        if event.index != MULTI_FUNC_BUTTON {
            return;
        }

        match event.action {
            ButtonAction::Released(held) if held < config::HOLD_RESTART_ADV_SECS => {
                let on = !self.led_on;
                info!("[BTN] Toggling LED {}", if on { "on" } else { "off" });
                self.set_led(on);
            }
            ButtonAction::Released(held) if held <= config::HOLD_RESTART_ADV_MAX_SECS => {
                info!("[BTN] Restarting advertising");
                let _ = self.link.start_advertising(&mut self.board);
            }
            ButtonAction::Released(held) => {
                debug!("[BTN] Released after {} s, no action", held);
            }
            ButtonAction::Held(secs) if secs == config::HOLD_RESTART_ADV_SECS => {
                info!("[BTN] Release now to restart advertising");
            }
            _ => {}
        }
    }

    fn on_ble(&mut self, event: BleEvent) {
        if self.link.handle(&mut self.board, &event) {
            return;
        }

        match event {
            BleEvent::LedWrite(v) => {
                info!("[BLE] LED control written: {}", v);
                self.set_led(v != 0);
            }
            other => debug!("[BLE] ignored {:?}", other),
        }
    }
}

impl<B: BlePeripheral + StatusLeds> EventHandler for LedReceiver<B> {
    fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Button(ev) => self.on_button(ev),
            AppEvent::Ble(ev) => self.on_ble(ev),
            _ => {}
        }
    }
}
