//! Event-driven demo applications for the Qorvo QPG6200.
//!
//! Every app is a state machine fed from one bounded [`queue::EventQueue`]:
//! button, ADC, BLE, Thread and timer sources post [`event::AppEvent`]s
//! from their own contexts, and a single dispatch task hands them to the
//! active app in FIFO order. Hardware is reached through the traits in
//! [`hal`], so the same apps run against the vendor SDK on target
//! (`board`, behind the `embedded` feature) and against recorders on host.
//!
//! Host tests: `cargo test --lib` and `cargo test --test integration`.
//! Target images: `cargo build --release --features embedded --bin <demo>`.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

pub mod analog;
pub mod apps;
pub mod ble;
pub mod buttons;
pub mod config;
pub mod error;
pub mod event;
pub mod hal;
pub mod queue;
pub mod thread;

#[cfg(feature = "embedded")]
pub mod board;

pub use error::Error;
pub use event::AppEvent;
pub use queue::{EventHandler, EventQueue};

/// The queue every demo uses.
pub type AppQueue = EventQueue<{ config::EVENT_QUEUE_DEPTH }>;
