//! Ultrasonic movement detector with an LED heartbeat.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use qpg_demos::apps::blink::heartbeat_task;
use qpg_demos::apps::movement::{self, MovementConfig};
use qpg_demos::board::{self, pins, Board, BusyWait, Leds, Pin, SchedClock};
use qpg_demos::config;
use qpg_demos::hal::Led;

// GPIO 11 is the echo input here, so the heartbeat uses the white LED.
static LEDS: [u8; 1] = [pins::LED_WHITE_COOL];

#[embassy_executor::task]
async fn stack_task() {
    board::run_stack().await
}

#[embassy_executor::task]
async fn heartbeat(leds: Leds) {
    heartbeat_task(leds, Led(0), Delay, config::BLINK_TOGGLE_MS).await
}

#[embassy_executor::task]
async fn sensor(trigger: Pin, echo: Pin) {
    movement::sensor_task(trigger, echo, SchedClock, BusyWait, Delay, MovementConfig::default()).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let board = Board::init(&LEDS);
    spawner.must_spawn(stack_task());
    spawner.must_spawn(heartbeat(board.leds()));

    let trigger = Pin::output(pins::SENSOR_TRIGGER).unwrap_or_else(|e| defmt::panic!("trigger: {:?}", e));
    let echo = Pin::input(pins::SENSOR_ECHO, false).unwrap_or_else(|e| defmt::panic!("echo: {:?}", e));
    spawner.must_spawn(sensor(trigger, echo));
}
