//! Digital pins over `qDrvGPIO`, exposed as `embedded-hal` pins.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use super::ffi;
use crate::error::Error;

/// A configured GPIO.
pub struct Pin {
    gpio: u8,
}

impl Pin {
    /// Input with optional pull-up. Buttons are wired active low.
    pub fn input(gpio: u8, pull_up: bool) -> Result<Self, Error> {
        let pull = if pull_up { ffi::iob::PULL_UP } else { ffi::iob::PULL_NONE };
        // SAFETY: plain register configuration.
        match unsafe { ffi::qDrvIOB_ConfigInputSet(gpio, pull, false) } {
            ffi::Q_OK => Ok(Self { gpio }),
            _ => Err(Error::PinConfig(gpio)),
        }
    }

    /// Push-pull output, initially low.
    pub fn output(gpio: u8) -> Result<Self, Error> {
        // SAFETY: plain register configuration.
        match unsafe { ffi::qDrvIOB_ConfigOutputSet(gpio, ffi::iob::DRIVE_2MA, ffi::iob::SLEW_SLOW) } {
            ffi::Q_OK => {
                // SAFETY: pin configured as output above.
                unsafe { ffi::qDrvGPIO_Write(gpio, 0) };
                Ok(Self { gpio })
            }
            _ => Err(Error::PinConfig(gpio)),
        }
    }
}

impl ErrorType for Pin {
    type Error = Infallible;
}

impl InputPin for Pin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        // SAFETY: read of a configured pin.
        Ok(unsafe { ffi::qDrvGPIO_Read(self.gpio) } != 0)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

impl OutputPin for Pin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        // SAFETY: write to a configured pin.
        unsafe { ffi::qDrvGPIO_Write(self.gpio, 0) };
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        // SAFETY: write to a configured pin.
        unsafe { ffi::qDrvGPIO_Write(self.gpio, 1) };
        Ok(())
    }
}
