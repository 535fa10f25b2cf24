//! BLE doorbell ("QPG Doorbell"): PB5 rings and notifies the phone.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use qpg_demos::apps::ble_doorbell::RING_BUTTON;
use qpg_demos::apps::BleDoorbell;
use qpg_demos::ble::gatt;
use qpg_demos::board::{self, pins, Board, Pin, EVENTS};
use qpg_demos::buttons::button_task;

static LEDS: [u8; 2] = [pins::LED_WHITE_COOL, pins::LED_BLUE];

#[embassy_executor::task]
async fn stack_task() {
    board::run_stack().await
}

#[embassy_executor::task]
async fn button(pin: Pin) {
    button_task(pin, RING_BUTTON, true, Delay, &EVENTS).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let board = Board::init(&LEDS).with_ble_peripheral(gatt::doorbell_write, gatt::DOORBELL_ADV);
    spawner.must_spawn(stack_task());

    let pin = Pin::input(pins::PB5, true).unwrap_or_else(|e| defmt::panic!("button: {:?}", e));
    spawner.must_spawn(button(pin));

    let mut app = BleDoorbell::new(board);
    app.start();
    EVENTS.dispatch(&mut app).await
}
