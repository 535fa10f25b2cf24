//! UART board 2: receive and validate messages.

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
async fn receiver(uart: Uart, leds: Leds) {
    uart_link::receiver_task(uart, leds, Delay).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let board = Board::init(&LEDS);
    spawner.must_spawn(stack_task());

    info!("=== UART receiver ===");
    match Uart::new(pins::UART_INSTANCE, pins::UART_TX, pins::UART_RX) {
        Ok(uart) => spawner.must_spawn(receiver(uart, board.leds())),
        Err(e) => error!("[UART] init failed: {:?}", e),
    }
}
