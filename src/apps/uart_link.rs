//! UART link between two boards: newline-delimited `MSG:<counter>:<payload>`
//! lines at 115200 8N1.
//!
//! The sender emits one line per second. The receiver assembles lines
//! byte by byte (CR or LF ends a line, empty lines are skipped), counts the
//! ones starting with `MSG:` and resets on a line longer than 127 bytes.

use core::fmt::Write as _;

use embedded_hal_async::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};
use heapless::{String, Vec};

use crate::config;
use crate::error::Error;
use crate::hal::{Led, StatusLeds};

pub const ACTIVITY_LED: Led = Led(0);

pub const MESSAGE_PREFIX: &str = "MSG:";

pub type TxLine = String<48>;

/// `MSG:<counter>:<payload>\r\n`
pub fn format_message(counter: u32, payload: &str) -> Result<TxLine, Error> {
    let mut line = TxLine::new();
    write!(line, "{}{}:{}\r\n", MESSAGE_PREFIX, counter, payload).map_err(|_| Error::BufferOverflow)?;
    Ok(line)
}

/// A received line that starts with `MSG:`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Message<'a> {
    /// `None` when the counter field is missing or not a number.
    pub counter: Option<u32>,
    pub payload: &'a str,
}

/// Split a line into its fields. Only the prefix decides validity.
pub fn parse_message(line: &str) -> Option<Message<'_>> {
    let rest = line.strip_prefix(MESSAGE_PREFIX)?;
    let (counter, payload) = match rest.split_once(':') {
        Some((counter, payload)) => (counter.parse().ok(), payload),
        None => (None, rest),
    };
    Some(Message { counter, payload })
}

/// Result of a completed (or abandoned) line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxOutcome {
    /// A `MSG:` line; `total` counts valid lines since boot.
    Valid { total: u32, counter: Option<u32> },
    Malformed,
    Overflow,
}

/// Line assembler. `N` is the buffer size; lines hold at most `N - 1` bytes.
pub struct LineReceiver<const N: usize> {
    buf: Vec<u8, N>,
    valid: u32,
}

impl<const N: usize> Default for LineReceiver<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineReceiver<N> {
    pub const fn new() -> Self {
        Self { buf: Vec::new(), valid: 0 }
    }

    pub fn valid_count(&self) -> u32 {
        self.valid
    }

    /// Bytes buffered for the line in progress.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Feed one received byte.
    pub fn push(&mut self, byte: u8) -> Option<RxOutcome> {
        if byte == b'\r' || byte == b'\n' {
            if self.buf.is_empty() {
                return None;
            }
            let outcome = self.finish_line();
            self.buf.clear();
            return Some(outcome);
        }

        if self.buf.len() + 1 < N {
            // Cannot fail: checked against capacity above.
            let _ = self.buf.push(byte);
            None
        } else {
            warn!("[UART] RX buffer overflow!");
            self.buf.clear();
            Some(RxOutcome::Overflow)
        }
    }

    fn finish_line(&mut self) -> RxOutcome {
        let Ok(line) = core::str::from_utf8(&self.buf) else {
            warn!("[UART] RX: non-text line ({} bytes)", self.buf.len());
            return RxOutcome::Malformed;
        };
        info!("[UART] RX[{}]: {}", self.valid, line);

        match parse_message(line) {
            Some(msg) => {
                self.valid = self.valid.wrapping_add(1);
                info!("[UART] Valid message #{} received!", self.valid);
                RxOutcome::Valid { total: self.valid, counter: msg.counter }
            }
            None => {
                info!("[UART] Ignoring malformed line");
                RxOutcome::Malformed
            }
        }
    }
}

/// Send one numbered message per period, toggling the LED each time.
pub async fn sender_task<W, L, D>(mut uart: W, mut leds: L, mut delay: D) -> !
where
    W: Write,
    L: StatusLeds,
    D: DelayNs,
{
    let mut counter: u32 = 0;
    let mut led_on = false;

    loop {
        match format_message(counter, config::UART_TX_PAYLOAD) {
            Ok(line) => match uart.write_all(line.as_bytes()) {
                Ok(()) => info!("[UART] TX: {}", line.trim_end()),
                Err(_) => warn!("[UART] TX failed"),
            },
            Err(e) => warn!("[UART] format failed: {:?}", e),
        }
        counter = counter.wrapping_add(1);
        led_on = !led_on;
        leds.set(ACTIVITY_LED, led_on);
        delay.delay_ms(config::UART_TX_PERIOD_MS).await;
    }
}

/// Poll the UART, toggling the LED for each valid message.
pub async fn receiver_task<R, L, D>(mut uart: R, mut leds: L, mut delay: D) -> !
where
    R: Read + ReadReady,
    L: StatusLeds,
    D: DelayNs,
{
    let mut rx: LineReceiver<{ config::UART_RX_BUFFER_SIZE }> = LineReceiver::new();
    let mut led_on = false;
    info!("[UART] Receiver started - waiting for data...");

    loop {
        if !matches!(uart.read_ready(), Ok(true)) {
            delay.delay_ms(config::UART_RX_POLL_MS).await;
            continue;
        }

        let mut byte = [0u8; 1];
        if let Ok(1) = uart.read(&mut byte) {
            if let Some(RxOutcome::Valid { .. }) = rx.push(byte[0]) {
                led_on = !led_on;
                leds.set(ACTIVITY_LED, led_on);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed<const N: usize>(rx: &mut LineReceiver<N>, bytes: &[u8]) -> std::vec::Vec<RxOutcome> {
        bytes.iter().filter_map(|&b| rx.push(b)).collect()
    }

    #[test]
    fn sender_line_format() {
        let line = format_message(42, "HELLO_FROM_BOARD1").unwrap();
        assert_eq!(line.as_str(), "MSG:42:HELLO_FROM_BOARD1\r\n");
    }

    #[test]
    fn crlf_yields_one_message() {
        let mut rx: LineReceiver<128> = LineReceiver::new();
        let out = feed(&mut rx, b"MSG:7:HELLO\r\n");
        assert_eq!(out, [RxOutcome::Valid { total: 1, counter: Some(7) }]);
        assert_eq!(rx.valid_count(), 1);
        assert_eq!(rx.pending(), 0);
    }

    #[test]
    fn lines_without_prefix_are_not_counted() {
        let mut rx: LineReceiver<128> = LineReceiver::new();
        let out = feed(&mut rx, b"hello\nMSG:x\n");
        assert_eq!(
            out,
            [RxOutcome::Malformed, RxOutcome::Valid { total: 1, counter: None }]
        );
    }

    #[test]
    fn empty_lines_are_skipped() {
        let mut rx: LineReceiver<128> = LineReceiver::new();
        assert!(feed(&mut rx, b"\r\n\n\r").is_empty());
    }

    #[test]
    fn overflow_resets_after_127_bytes() {
        let mut rx: LineReceiver<128> = LineReceiver::new();
        let long = [b'A'; 127];
        assert!(feed(&mut rx, &long).is_empty());
        assert_eq!(rx.pending(), 127);

        // The 128th byte overflows and is dropped with the buffer.
        assert_eq!(rx.push(b'A'), Some(RxOutcome::Overflow));
        assert_eq!(rx.pending(), 0);

        // Receiver recovers on the next line.
        let out = feed(&mut rx, b"MSG:1:OK\n");
        assert_eq!(out, [RxOutcome::Valid { total: 1, counter: Some(1) }]);
    }

    #[test]
    fn message_fields() {
        assert_eq!(
            parse_message("MSG:12:HELLO_FROM_BOARD1"),
            Some(Message { counter: Some(12), payload: "HELLO_FROM_BOARD1" })
        );
        assert_eq!(parse_message("MSG:"), Some(Message { counter: None, payload: "" }));
        assert_eq!(parse_message("msg:1:x"), None);
    }
}
