//! LED blink: toggle an LED every 500 ms and say hello every second.

use embedded_hal_async::delay::DelayNs;

use crate::config;
use crate::event::{AppEvent, Expiry, TimerId};
use crate::hal::{Led, Scheduler, StatusLeds};
use crate::queue::EventHandler;

pub const BLINK_LED: Led = Led(0);

pub struct Blinker<B> {
    board: B,
    led_on: bool,
    hellos: u32,
}

impl<B: StatusLeds + Scheduler> Blinker<B> {
    pub fn new(board: B) -> Self {
        Self { board, led_on: false, hellos: 0 }
    }

    pub fn start(&mut self) {
        self.board.set(BLINK_LED, false);
        self.board.schedule(TimerId::BlinkToggle, 0, config::BLINK_TOGGLE_MS);
        self.board.schedule(TimerId::Hello, 0, config::BLINK_HELLO_MS);
    }

    pub fn led_on(&self) -> bool {
        self.led_on
    }

    pub fn hellos(&self) -> u32 {
        self.hellos
    }

    pub fn board(&self) -> &B {
        &self.board
    }
}

impl<B: StatusLeds + Scheduler> EventHandler for Blinker<B> {
    fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Timer(Expiry { id: TimerId::BlinkToggle, .. }) => {
                self.led_on = !self.led_on;
                self.board.set(BLINK_LED, self.led_on);
                self.board.schedule(TimerId::BlinkToggle, 0, config::BLINK_TOGGLE_MS);
            }
            AppEvent::Timer(Expiry { id: TimerId::Hello, .. }) => {
                self.hellos = self.hellos.wrapping_add(1);
                info!("Hello world");
                self.board.schedule(TimerId::Hello, 0, config::BLINK_HELLO_MS);
            }
            _ => {}
        }
    }
}

/// Free-running LED heartbeat for demos without an event loop.
pub async fn heartbeat_task<L, D>(mut leds: L, led: Led, mut delay: D, half_period_ms: u32) -> !
where
    L: StatusLeds,
    D: DelayNs,
{
    let mut on = false;
    loop {
        leds.set(led, on);
        on = !on;
        delay.delay_ms(half_period_ms).await;
    }
}
