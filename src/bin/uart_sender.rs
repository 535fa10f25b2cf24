//! UART board 1: one numbered message per second.

#![no_std]
#![no_main]

use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use qpg_demos::apps::uart_link;
use qpg_demos::board::{self, pins, Board, Leds, Uart};

static LEDS: [u8; 1] = [pins::LED_GREEN];

#[embassy_executor::task]
async fn stack_task() {
    board::run_stack().await
}

#[embassy_executor::task]
async fn sender(uart: Uart, leds: Leds) {
    uart_link::sender_task(uart, leds, Delay).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let board = Board::init(&LEDS);
    spawner.must_spawn(stack_task());

    info!("=== UART sender ===");
    match Uart::new(pins::UART_INSTANCE, pins::UART_TX, pins::UART_RX) {
        Ok(uart) => spawner.must_spawn(sender(uart, board.leds())),
        Err(e) => error!("[UART] init failed: {:?}", e),
    }
}
