//! Thread + BLE doorbell.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use qpg_demos::analog::{self, DebounceConfig};
use qpg_demos::apps::thread_doorbell::MULTI_FUNC_BUTTON;
use qpg_demos::apps::ThreadDoorbell;
use qpg_demos::ble::gatt;
use qpg_demos::board::{self, pins, Board, GpAdc, Pin, EVENTS};
use qpg_demos::buttons::button_task;

static LEDS: [u8; 3] = [pins::LED_WHITE_COOL, pins::LED_GREEN, pins::LED_BLUE];

#[embassy_executor::task]
async fn stack_task() {
    board::run_stack().await
}

#[embassy_executor::task]
async fn button(pin: Pin) {
    button_task(pin, MULTI_FUNC_BUTTON, true, Delay, &EVENTS).await
}

#[embassy_executor::task]
async fn doorbell_adc(adc: GpAdc) {
    analog::poll_task(adc, Delay, DebounceConfig::default(), &EVENTS).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let board = Board::init(&LEDS)
        .with_ble_peripheral(gatt::thread_doorbell_write, gatt::THREAD_DOORBELL_ADV)
        .with_thread()
        .unwrap_or_else(|e| defmt::panic!("Thread init: {:?}", e));
    spawner.must_spawn(stack_task());

    let pin = Pin::input(pins::PB1, true).unwrap_or_else(|e| defmt::panic!("button: {:?}", e));
    spawner.must_spawn(button(pin));

    // The analog doorbell button is optional; BLE and Thread run without it.
    match GpAdc::new(pins::ANIO0) {
        Ok(adc) => spawner.must_spawn(doorbell_adc(adc)),
        Err(e) => defmt::warn!("[ADC] init failed ({:?}), analog button disabled", e),
    }

    let mut app = ThreadDoorbell::new(board);
    app.start();
    EVENTS.dispatch(&mut app).await
}
