//! BLE LED receiver ("LedRX").

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use qpg_demos::apps::led_rx::MULTI_FUNC_BUTTON;
use qpg_demos::apps::LedReceiver;
use qpg_demos::ble::gatt;
use qpg_demos::board::{self, pins, Board, Pin, EVENTS};
use qpg_demos::buttons::button_task;

static LEDS: [u8; 2] = [pins::LED_BLUE, pins::LED_GREEN];

#[embassy_executor::task]
async fn stack_task() {
    board::run_stack().await
}

#[embassy_executor::task]
async fn button(pin: Pin) {
    button_task(pin, MULTI_FUNC_BUTTON, true, Delay, &EVENTS).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let board = Board::init(&LEDS).with_ble_peripheral(gatt::led_control_write, gatt::LED_RX_ADV);
    spawner.must_spawn(stack_task());

    let pin = Pin::input(pins::PB1, true).unwrap_or_else(|e| defmt::panic!("button: {:?}", e));
    spawner.must_spawn(button(pin));

    let mut app = LedReceiver::new(board);
    app.start();
    EVENTS.dispatch(&mut app).await
}
