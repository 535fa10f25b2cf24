//! BLE central that drives the LED receiver.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

use qpg_demos::apps::LedTransmitter;
use qpg_demos::board::{self, pins, Board, EVENTS};
use qpg_demos::config;

static LEDS: [u8; 1] = [pins::LED_GREEN];

#[embassy_executor::task]
async fn stack_task() {
    board::run_stack().await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let board = Board::init(&LEDS).with_ble_central();
    spawner.must_spawn(stack_task());

    let mut app = LedTransmitter::new(board, config::LEDTX_TARGET_NAME);
    app.start();
    EVENTS.dispatch(&mut app).await
}
