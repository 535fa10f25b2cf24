//! Demo applications.
//!
//! Event-driven apps own their board handle and implement
//! [`EventHandler`](crate::queue::EventHandler); the dispatch task feeds
//! them one [`AppEvent`](crate::event::AppEvent) at a time. The UART and
//! ultrasonic demos have no event loop and are plain async tasks.

pub mod ble_doorbell;
pub mod blink;
pub mod doorbell;
pub mod led_rx;
pub mod led_tx;
pub mod movement;
pub mod thread_doorbell;
pub mod uart_link;

pub use ble_doorbell::BleDoorbell;
pub use blink::Blinker;
pub use doorbell::{Doorbell, DoorbellConfig, DoorbellState, SecondPress};
pub use led_rx::LedReceiver;
pub use led_tx::{CentralState, LedTransmitter};
pub use movement::{MovementConfig, MovementDetector};
pub use thread_doorbell::ThreadDoorbell;
pub use uart_link::LineReceiver;
