//! Unified error type for the demo applications.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Vendor status codes are carried raw so they can be logged as-is.

/// Top-level error type used across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The event queue had no free slot; the event was dropped.
    QueueFull,

    /// The BLE stack refused an operation.
    Ble(BleError),

    /// The Thread stack refused an operation.
    Thread(ThreadError),

    /// ADC driver init or conversion failed (driver status code).
    Adc(u8),

    /// UART driver init or transfer failed (driver status code).
    Uart(u8),

    /// Pin configuration table was rejected at boot (driver status code).
    PinConfig(u8),

    /// A parameter was outside its valid range.
    InvalidParameter,

    /// Buffer too small for the requested operation.
    BufferOverflow,
}

/// Subset of BLE errors we propagate (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleError {
    /// Raw status returned by `BleIf`.
    Status(u8),
    /// No peer is connected (e.g. a notification nobody can receive).
    NotConnected,
}

/// Subset of OpenThread errors we propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThreadError {
    /// Raw `otError` value.
    Status(u8),
    /// The OpenThread instance was never created.
    NotInitialised,
    /// No message buffer was available.
    NoBuffers,
}

// Convenience conversions

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}

impl From<ThreadError> for Error {
    fn from(e: ThreadError) -> Self {
        Error::Thread(e)
    }
}
