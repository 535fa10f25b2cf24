//! Standalone doorbell: PB5 rings, PB1 dismisses.

#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use qpg_demos::apps::doorbell::{DISMISS_BUTTON, DOORBELL_BUTTON};
use qpg_demos::apps::{Doorbell, DoorbellConfig};
use qpg_demos::board::{self, pins, Board, Pin, EVENTS};
use qpg_demos::buttons::button_task;

static LEDS: [u8; 2] = [pins::LED_WHITE_COOL, pins::LED_GREEN];

#[embassy_executor::task]
async fn stack_task() {
    board::run_stack().await
}

#[embassy_executor::task(pool_size = 2)]
async fn button(pin: Pin, index: u8) {
    button_task(pin, index, true, Delay, &EVENTS).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let board = Board::init(&LEDS);
    spawner.must_spawn(stack_task());

    for (gpio, index) in [(pins::PB5, DOORBELL_BUTTON), (pins::PB1, DISMISS_BUTTON)] {
        let pin = Pin::input(gpio, true).unwrap_or_else(|e| defmt::panic!("button GPIO{}: {:?}", gpio, e));
        spawner.must_spawn(button(pin, index));
    }

    let mut app = Doorbell::new(board, DoorbellConfig::default());
    app.start();
    info!("Doorbell ready");
    EVENTS.dispatch(&mut app).await
}
