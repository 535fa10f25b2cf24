//! QPG6200 board support: the [`hal`](crate::hal) traits over the vendor
//! SDK, stack callbacks, the embassy time driver and the stack task.
//!
//! Everything the stacks report is funnelled into [`EVENTS`]. The board
//! handle itself is cheap; LEDs, timers and BLE are global in the SDK.

mod adc;
mod callbacks;
mod ffi;
mod gpio;
mod time_driver;
mod timers;
mod uart;

use core::net::Ipv6Addr;
use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

use static_cell::StaticCell;

pub use adc::GpAdc;
pub use gpio::Pin;
pub use uart::{Uart, UartError};

use crate::ble::adv_parser::AdvProfile;
use crate::ble::gatt::WriteDecoder;
use crate::ble::PeerAddress;
use crate::error::{BleError, Error, ThreadError};
use crate::event::TimerId;
use crate::hal::{
    Blink, BleCentral, BlePeripheral, Clock, Led, Scheduler, StatusLeds, SystemControl, ThreadStack,
};
use crate::thread::{Dataset, Role};
use crate::AppQueue;

/// The application event queue.
pub static EVENTS: AppQueue = AppQueue::new();

static OT_INSTANCE: AtomicPtr<ffi::otInstance> = AtomicPtr::new(ptr::null_mut());
static UDP_SOCKET: StaticCell<ffi::otUdpSocket> = StaticCell::new();

/// QPG6200 IoT carrier board pin map.
pub mod pins {
    pub const LED_WHITE_COOL: u8 = 1;
    pub const LED_GREEN: u8 = 11;
    pub const LED_BLUE: u8 = 12;
    pub const PB5: u8 = 0;
    pub const PB1: u8 = 3;
    pub const ANIO0: u8 = 28;
    pub const UART_TX: u8 = 8;
    pub const UART_RX: u8 = 9;
    pub const SENSOR_TRIGGER: u8 = 10;
    pub const SENSOR_ECHO: u8 = 11;
    pub const UART_INSTANCE: u8 = 1;
}

fn ble_status(status: ffi::Status) -> Result<(), BleError> {
    if status == ffi::STATUS_NO_ERROR {
        Ok(())
    } else {
        Err(BleError::Status(status))
    }
}

fn ot_status(err: ffi::otError) -> Result<(), ThreadError> {
    match err {
        ffi::OT_ERROR_NONE => Ok(()),
        ffi::OT_ERROR_NO_BUFS => Err(ThreadError::NoBuffers),
        other => Err(ThreadError::Status(other as u8)),
    }
}

/// Status LEDs by index into the table passed to [`Board::init`].
#[derive(Clone, Copy)]
pub struct Leds;

impl StatusLeds for Leds {
    fn set(&mut self, led: Led, on: bool) {
        // SAFETY: LED driver initialised by `Board::init`.
        unsafe { ffi::StatusLed_SetLed(led.0, on) };
    }

    fn blink(&mut self, led: Led, pattern: Blink) {
        // SAFETY: as above.
        unsafe { ffi::StatusLed_BlinkLed(led.0, pattern.on_ms, pattern.off_ms) };
    }
}

/// `gpSched` microsecond counter.
#[derive(Clone, Copy)]
pub struct SchedClock;

impl Clock for SchedClock {
    fn now_us(&self) -> u32 {
        // SAFETY: read-only counter access.
        unsafe { ffi::gpSched_GetCurrentTime() }
    }
}

/// Busy wait on the HAL's calibrated microsecond loop.
#[derive(Clone, Copy)]
pub struct BusyWait;

impl embedded_hal::delay::DelayNs for BusyWait {
    fn delay_ns(&mut self, ns: u32) {
        // SAFETY: spin loop only.
        unsafe { ffi::hal_WaitUs(ns.div_ceil(1_000)) };
    }
}

pub struct Board {
    leds: Leds,
    udp: Option<&'static mut ffi::otUdpSocket>,
}

impl Board {
    /// Bring up the HAL, base components and status LEDs (`leds` are GPIO
    /// numbers, index = [`Led`] number).
    pub fn init(leds: &'static [u8]) -> Self {
        // SAFETY: called once at boot before anything else touches the SDK.
        unsafe {
            ffi::hal_Init();
            ffi::gpBaseComps_StackInit();
            ffi::StatusLed_Init(leds.as_ptr(), leds.len() as u8, true);
            ffi::hal_EnableGlobalInterrupts();
        }
        time_driver::init();
        Self { leds: Leds, udp: None }
    }

    /// Register as BLE peripheral; writes go through `decoder` and the
    /// advertising frames are built from `adv`.
    pub fn with_ble_peripheral(self, decoder: WriteDecoder, adv: AdvProfile) -> Self {
        callbacks::set_peripheral(decoder, adv);
        // SAFETY: callbacks are 'static.
        unsafe { ffi::BleIf_Init(&callbacks::BLE_CALLBACKS) };
        self
    }

    pub fn with_ble_central(self) -> Self {
        // SAFETY: callbacks are 'static.
        unsafe { ffi::BleIf_InitCentral(&callbacks::BLE_CALLBACKS) };
        self
    }

    /// Create the OpenThread instance and subscribe to role changes.
    pub fn with_thread(mut self) -> Result<Self, Error> {
        // SAFETY: single-instance init, once.
        let instance = unsafe { ffi::otInstanceInitSingle() };
        if instance.is_null() {
            error!("[Thread] otInstanceInitSingle failed");
            return Err(ThreadError::NotInitialised.into());
        }
        OT_INSTANCE.store(instance, Ordering::Release);

        // SAFETY: callback is 'static, instance valid.
        let err = unsafe {
            ffi::otSetStateChangedCallback(instance, Some(callbacks::thread_state_changed), ptr::null_mut())
        };
        ot_status(err)?;

        // SAFETY: all-zero is the documented initial state of a socket.
        let socket = UDP_SOCKET
            .try_init(unsafe { core::mem::zeroed() })
            .ok_or(ThreadError::NotInitialised)?;
        self.udp = Some(socket);
        Ok(self)
    }

    pub fn leds(&self) -> Leds {
        self.leds
    }

    fn instance(&self) -> Result<*mut ffi::otInstance, ThreadError> {
        let instance = OT_INSTANCE.load(Ordering::Acquire);
        if instance.is_null() {
            Err(ThreadError::NotInitialised)
        } else {
            Ok(instance)
        }
    }
}

impl StatusLeds for Board {
    fn set(&mut self, led: Led, on: bool) {
        self.leds.set(led, on);
    }

    fn blink(&mut self, led: Led, pattern: Blink) {
        self.leds.blink(led, pattern);
    }
}

impl Scheduler for Board {
    fn schedule(&mut self, id: TimerId, epoch: u16, after_ms: u32) {
        timers::schedule(id, epoch, after_ms);
    }

    fn cancel(&mut self, id: TimerId) {
        timers::cancel(id);
    }
}

impl BlePeripheral for Board {
    fn start_advertising(&mut self) -> Result<(), BleError> {
        // SAFETY: BleIf initialised by `with_ble_peripheral`.
        ble_status(unsafe { ffi::BleIf_StartAdvertising() })
    }

    fn notify(&mut self, handle: u16, value: &[u8]) -> Result<(), BleError> {
        // SAFETY: `value` is valid for the call.
        ble_status(unsafe { ffi::BleIf_SendNotification(handle, value.len() as u16, value.as_ptr()) })
    }
}

impl BleCentral for Board {
    fn start_scanning(&mut self) -> Result<(), BleError> {
        // SAFETY: BleIf initialised by `with_ble_central`.
        ble_status(unsafe { ffi::BleIf_StartScanning() })
    }

    fn stop_scanning(&mut self) -> Result<(), BleError> {
        // SAFETY: as above.
        ble_status(unsafe { ffi::BleIf_StopScanning() })
    }

    fn connect(&mut self, peer: &PeerAddress) -> Result<(), BleError> {
        // SAFETY: address copied by the stack.
        ble_status(unsafe { ffi::BleIf_Connect(peer.kind, peer.addr.as_ptr()) })
    }

    fn discover_services(&mut self, conn: u16) -> Result<(), BleError> {
        // SAFETY: plain call.
        ble_status(unsafe { ffi::BleIf_DiscoverServices(conn) })
    }

    fn write(&mut self, conn: u16, handle: u16, value: &[u8]) -> Result<(), BleError> {
        // SAFETY: `value` is valid for the call.
        ble_status(unsafe { ffi::BleIf_WriteCharacteristic(conn, handle, value.len() as u16, value.as_ptr()) })
    }
}

impl ThreadStack for Board {
    fn has_active_dataset(&mut self) -> bool {
        match self.instance() {
            // SAFETY: valid instance.
            Ok(instance) => unsafe { ffi::otDatasetIsCommissioned(instance) },
            Err(_) => false,
        }
    }

    fn set_active_dataset(&mut self, dataset: &Dataset) -> Result<(), ThreadError> {
        let instance = self.instance()?;
        let encoded = dataset.to_tlvs().map_err(|_| ThreadError::NoBuffers)?;
        let mut tlvs = ffi::otOperationalDatasetTlvs { mTlvs: [0; 254], mLength: encoded.len() as u8 };
        tlvs.mTlvs[..encoded.len()].copy_from_slice(&encoded);
        // SAFETY: `tlvs` outlives the call.
        ot_status(unsafe { ffi::otDatasetSetActiveTlvs(instance, &tlvs) })
    }

    fn enable(&mut self) -> Result<(), ThreadError> {
        let instance = self.instance()?;
        // SAFETY: valid instance.
        unsafe {
            ot_status(ffi::otIp6SetEnabled(instance, true))?;
            ot_status(ffi::otThreadSetEnabled(instance, true))
        }
    }

    fn role(&mut self) -> Role {
        match self.instance() {
            // SAFETY: valid instance.
            Ok(instance) => Role::from_raw(unsafe { ffi::otThreadGetDeviceRole(instance) } as u8),
            Err(_) => Role::Disabled,
        }
    }

    fn open_udp(&mut self, port: u16) -> Result<(), ThreadError> {
        let instance = self.instance()?;
        let socket: *mut ffi::otUdpSocket = match self.udp.as_deref_mut() {
            Some(socket) => socket as *mut ffi::otUdpSocket,
            None => return Err(ThreadError::NotInitialised),
        };
        let name = ffi::otSockAddr { mAddress: ffi::otIp6Address { m8: [0; 16] }, mPort: port };
        // SAFETY: socket is 'static, callback is 'static.
        unsafe {
            ot_status(ffi::otUdpOpen(instance, socket, Some(callbacks::thread_udp_receive), ptr::null_mut()))?;
            ot_status(ffi::otUdpBind(instance, socket, &name, ffi::OT_NETIF_THREAD_INTERNAL))
        }
    }

    fn send_udp(&mut self, addr: Ipv6Addr, port: u16, payload: &[u8]) -> Result<(), ThreadError> {
        let instance = self.instance()?;
        let socket: *mut ffi::otUdpSocket = match self.udp.as_deref_mut() {
            Some(socket) => socket as *mut ffi::otUdpSocket,
            None => return Err(ThreadError::NotInitialised),
        };

        // SAFETY: valid instance; the message is freed on every error path
        // and owned by OpenThread once sent.
        unsafe {
            let msg = ffi::otUdpNewMessage(instance, ptr::null());
            if msg.is_null() {
                return Err(ThreadError::NoBuffers);
            }
            if let Err(e) = ot_status(ffi::otMessageAppend(msg, payload.as_ptr().cast(), payload.len() as u16)) {
                ffi::otMessageFree(msg);
                return Err(e);
            }

            let mut info: ffi::otMessageInfo = core::mem::zeroed();
            info.mPeerAddr = ffi::otIp6Address { m8: addr.octets() };
            info.mPeerPort = port;

            let result = ot_status(ffi::otUdpSend(instance, socket, msg, &info));
            if result.is_err() {
                ffi::otMessageFree(msg);
            }
            result
        }
    }

    fn factory_reset(&mut self) {
        if let Ok(instance) = self.instance() {
            // SAFETY: valid instance; the device reboots afterwards.
            unsafe { ffi::otInstanceFactoryReset(instance) };
        }
    }
}

impl SystemControl for Board {
    fn reset(&mut self) {
        // SAFETY: does not return in practice.
        unsafe { ffi::gpReset_ResetSystem() };
    }
}

/// Run the vendor scheduler and OpenThread tasklets. Spawn exactly once.
pub async fn run_stack() -> ! {
    loop {
        // SAFETY: only this task drives the scheduler.
        unsafe {
            ffi::gpSched_Main_Body();
            let instance = OT_INSTANCE.load(Ordering::Acquire);
            if !instance.is_null() {
                ffi::otTaskletsProcess(instance);
            }
        }
        embassy_futures::yield_now().await;
    }
}
