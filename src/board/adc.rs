//! GPADC slot A on ANIO0, continuous 11-bit conversion into buffer A.

use static_cell::StaticCell;

use super::ffi::{self, gpadc};
use crate::error::Error;
use crate::hal::AdcChannel;

static DRIVER: StaticCell<ffi::qDrvGPADC_t> = StaticCell::new();

pub struct GpAdc {
    drv: &'static mut ffi::qDrvGPADC_t,
}

fn check(step: u8, res: ffi::qResult) -> Result<(), Error> {
    if res == ffi::Q_OK {
        Ok(())
    } else {
        error!("[ADC] init step {} failed: {}", step, res);
        Err(Error::Adc(step))
    }
}

impl GpAdc {
    /// Configure `gpio` (alt 0) as ANIO0 and start converting. Can only be
    /// called once.
    pub fn new(gpio: u8) -> Result<Self, Error> {
        let drv = DRIVER.try_init(ffi::qDrvGPADC_t::zeroed()).ok_or(Error::Adc(0))?;
        let pin = ffi::qDrvIOB_PinAlt_t { gpio, alt: 0 };
        let config = ffi::qDrvGPADC_Config_t { dma: false };
        let slot = ffi::qDrvGPADC_SlotConfig_t {
            pChannel: gpadc::CHANNEL_ANIO0,
            nChannel: gpadc::CHANNEL_NONE,
            diffMode: false,
            waitTime: 0,
            voltageMode: gpadc::VOLTAGE_MODE_HIGH,
            higherSpeed: false,
            filterCap: 0,
            postBuffer: gpadc::POST_BUFFER_A,
        };
        let buffer = ffi::qDrvGPADC_BufferConfig_t {
            resolution: gpadc::RESOLUTION_11BIT,
            updateMode: gpadc::UPDATE_MODE_NORMAL,
            irqEnable: false,
            preset: ffi::qDrvGPADC_Preset_t { min: gpadc::PRESET_UNUSED, max: gpadc::PRESET_UNUSED },
        };

        // SAFETY: `drv` is 'static and every config outlives its call.
        unsafe {
            check(1, ffi::qDrvGPADC_PinConfigSet(&pin, 1))?;
            check(2, ffi::qDrvGPADC_Init(drv, &config, core::ptr::null(), core::ptr::null_mut(), 0))?;
            check(3, ffi::qDrvGPADC_SlotConfigSet(drv, gpadc::SLOT_A, &slot))?;
            check(4, ffi::qDrvGPADC_SlotEnable(drv, gpadc::SLOT_A))?;
            check(5, ffi::qDrvGPADC_BufferConfigSet(drv, gpadc::BUFFER_A, &buffer))?;
            check(6, ffi::qDrvGPADC_ContinuousStart(drv))?;
        }

        info!("[ADC] GPADC ready on GPIO{} (ANIO0)", gpio);
        Ok(Self { drv })
    }
}

impl AdcChannel for GpAdc {
    fn read_raw(&mut self) -> Result<u16, Error> {
        // SAFETY: driver initialised in `new`.
        Ok(unsafe { ffi::qDrvGPADC_BufferRawResultGet(self.drv, gpadc::BUFFER_A) })
    }
}
