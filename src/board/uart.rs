//! `qDrvUart` as an `embedded-io` byte stream (115200 8N1).

use embedded_io::{ErrorKind, ErrorType, Read, ReadReady, Write};

use super::ffi::{self, uart};
use crate::config;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartError(pub i32);

impl embedded_io::Error for UartError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct Uart {
    handle: ffi::qDrvUart_Handle_t,
    /// Byte fetched by `read_ready` and not yet returned by `read`.
    pending: Option<u8>,
}

impl Uart {
    pub fn new(instance: u8, tx_gpio: u8, rx_gpio: u8) -> Result<Self, Error> {
        let mut cfg = ffi::qDrvUart_Config_t {
            baudRate: 0,
            txPin: 0,
            rxPin: 0,
            dataBits: 0,
            parity: 0,
            stopBits: 0,
        };
        let mut handle: ffi::qDrvUart_Handle_t = core::ptr::null_mut();

        // SAFETY: both out-pointers are valid locals.
        let res = unsafe {
            ffi::qDrvUart_GetDefaultConfig(&mut cfg);
            cfg.baudRate = config::UART_BAUD_RATE;
            cfg.txPin = tx_gpio;
            cfg.rxPin = rx_gpio;
            cfg.dataBits = uart::DATA_BITS_8;
            cfg.parity = uart::PARITY_NONE;
            cfg.stopBits = uart::STOP_BITS_1;
            ffi::qDrvUart_Init(instance, &cfg, &mut handle)
        };

        if res != ffi::Q_OK {
            error!("[UART] init failed: {}", res);
            return Err(Error::Uart(instance));
        }
        info!("[UART] {} baud, TX GPIO{}, RX GPIO{}", config::UART_BAUD_RATE, tx_gpio, rx_gpio);
        Ok(Self { handle, pending: None })
    }

    fn poll_byte(&mut self) -> Option<u8> {
        let mut byte = 0u8;
        // SAFETY: one-byte buffer on the stack.
        let n = unsafe { ffi::qDrvUart_Read(self.handle, &mut byte, 1) };
        (n > 0).then_some(byte)
    }
}

impl ErrorType for Uart {
    type Error = UartError;
}

impl ReadReady for Uart {
    fn read_ready(&mut self) -> Result<bool, UartError> {
        if self.pending.is_none() {
            self.pending = self.poll_byte();
        }
        Ok(self.pending.is_some())
    }
}

impl Read for Uart {
    /// Non-blocking: returns 0 when nothing has arrived.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, UartError> {
        let mut n = 0;
        while n < buf.len() {
            match self.pending.take().or_else(|| self.poll_byte()) {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl Write for Uart {
    fn write(&mut self, buf: &[u8]) -> Result<usize, UartError> {
        let len = buf.len().min(usize::from(u16::MAX));
        // SAFETY: `buf` is valid for `len` bytes.
        match unsafe { ffi::qDrvUart_Write(self.handle, buf.as_ptr(), len as u16) } {
            ffi::Q_OK => Ok(len),
            err => Err(UartError(err)),
        }
    }

    fn flush(&mut self) -> Result<(), UartError> {
        Ok(())
    }
}
