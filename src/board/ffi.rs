//! Raw bindings to the QPG6200 SDK (`gpSched`, `StatusLed`, `qDrv*`,
//! `BleIf`) and the OpenThread C API. Struct layouts follow the SDK and
//! OpenThread public headers.

#![allow(non_camel_case_types, non_snake_case, dead_code)]

use core::ffi::c_void;

/// `Status_t` returned by `BleIf_*`.
pub type Status = u8;
pub const STATUS_NO_ERROR: Status = 0;

/// `qResult_t` returned by the `qDrv*` drivers.
pub type qResult = i32;
pub const Q_OK: qResult = 0;

pub type otError = u32;
pub const OT_ERROR_NONE: otError = 0;
pub const OT_ERROR_NO_BUFS: otError = 3;

pub type SchedCallback = extern "C" fn();

// ─── BleIf ──────────────────────────────────────────────────────────────────

#[repr(C)]
pub struct BleIf_MsgHdr_t {
    /// Connection id for connection indications.
    pub param: u16,
    pub event: u8,
    pub status: u8,
}

/// `DM_SCAN_REPORT_IND` payload.
#[repr(C)]
pub struct BleIf_ScanReport_t {
    pub hdr: BleIf_MsgHdr_t,
    pub pData: *const u8,
    pub len: u8,
    pub rssi: i8,
    pub eventType: u8,
    pub addrType: u8,
    pub addr: [u8; 6],
}

#[repr(C)]
pub struct BleIf_AttsCccEvt_t {
    pub hdr: BleIf_MsgHdr_t,
    pub handle: u16,
    pub value: u16,
    pub idx: u8,
}

#[repr(C)]
pub struct BleIf_Attr_t {
    _opaque: [u8; 0],
}

pub type BleIf_StackCallback = unsafe extern "C" fn(msg: *mut BleIf_MsgHdr_t);
pub type BleIf_ReadCallback =
    unsafe extern "C" fn(conn: u16, handle: u16, op: u8, offset: u16, attr: *mut BleIf_Attr_t);
pub type BleIf_WriteCallback = unsafe extern "C" fn(
    conn: u16,
    handle: u16,
    op: u8,
    offset: u16,
    len: u16,
    value: *mut u8,
    attr: *mut BleIf_Attr_t,
);
pub type BleIf_CccCallback = unsafe extern "C" fn(event: *mut BleIf_AttsCccEvt_t);

#[repr(C)]
pub struct BleIf_Callbacks_t {
    pub stackCallback: Option<BleIf_StackCallback>,
    pub chrReadCallback: Option<BleIf_ReadCallback>,
    pub chrWriteCallback: Option<BleIf_WriteCallback>,
    pub cccCallback: Option<BleIf_CccCallback>,
}

// ─── qDrvGPADC / qDrvUart ───────────────────────────────────────────────────

/// Driver instance; only ever handled by pointer.
#[repr(C, align(4))]
pub struct qDrvGPADC_t {
    _storage: [u8; 64],
}

impl qDrvGPADC_t {
    pub const fn zeroed() -> Self {
        Self { _storage: [0; 64] }
    }
}

#[repr(C)]
pub struct qDrvIOB_PinAlt_t {
    pub gpio: u8,
    pub alt: u8,
}

#[repr(C)]
pub struct qDrvGPADC_Config_t {
    pub dma: bool,
}

#[repr(C)]
pub struct qDrvGPADC_SlotConfig_t {
    pub pChannel: u8,
    pub nChannel: u8,
    pub diffMode: bool,
    pub waitTime: u8,
    pub voltageMode: u8,
    pub higherSpeed: bool,
    pub filterCap: u8,
    pub postBuffer: u8,
}

#[repr(C)]
pub struct qDrvGPADC_Preset_t {
    pub min: u16,
    pub max: u16,
}

#[repr(C)]
pub struct qDrvGPADC_BufferConfig_t {
    pub resolution: u8,
    pub updateMode: u8,
    pub irqEnable: bool,
    pub preset: qDrvGPADC_Preset_t,
}

pub mod gpadc {
    pub const CHANNEL_ANIO0: u8 = 0;
    pub const CHANNEL_NONE: u8 = 0xFF;
    pub const SLOT_A: u8 = 0;
    pub const BUFFER_A: u8 = 0;
    pub const VOLTAGE_MODE_HIGH: u8 = 1;
    pub const POST_BUFFER_A: u8 = 0;
    pub const RESOLUTION_11BIT: u8 = 1;
    pub const UPDATE_MODE_NORMAL: u8 = 0;
    pub const PRESET_UNUSED: u16 = 0xFFFF;
}

pub mod iob {
    pub const PULL_NONE: u8 = 0;
    pub const PULL_UP: u8 = 1;
    pub const DRIVE_2MA: u8 = 0;
    pub const SLEW_SLOW: u8 = 0;
}

#[repr(C)]
pub struct qDrvUart_Config_t {
    pub baudRate: u32,
    pub txPin: u8,
    pub rxPin: u8,
    pub dataBits: u8,
    pub parity: u8,
    pub stopBits: u8,
}

pub mod uart {
    pub const DATA_BITS_8: u8 = 3;
    pub const PARITY_NONE: u8 = 0;
    pub const STOP_BITS_1: u8 = 0;
}

pub type qDrvUart_Handle_t = *mut c_void;

// ─── OpenThread ─────────────────────────────────────────────────────────────

#[repr(C)]
pub struct otInstance {
    _opaque: [u8; 0],
}

#[repr(C)]
pub struct otMessage {
    _opaque: [u8; 0],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct otIp6Address {
    pub m8: [u8; 16],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct otSockAddr {
    pub mAddress: otIp6Address,
    pub mPort: u16,
}

#[repr(C)]
pub struct otMessageInfo {
    pub mSockAddr: otIp6Address,
    pub mPeerAddr: otIp6Address,
    pub mSockPort: u16,
    pub mPeerPort: u16,
    pub mLinkInfo: *const c_void,
    pub mHopLimit: u8,
    /// mEcn:2, mIsHostInterface:1, mAllowZeroHopLimit:1, mMulticastLoop:1
    pub mFlags: u8,
}

pub type otUdpReceive =
    Option<unsafe extern "C" fn(context: *mut c_void, message: *mut otMessage, info: *const otMessageInfo)>;

#[repr(C)]
pub struct otUdpSocket {
    pub mSockName: otSockAddr,
    pub mPeerName: otSockAddr,
    pub mHandler: otUdpReceive,
    pub mContext: *mut c_void,
    pub mHandle: *mut c_void,
    pub mNext: *mut otUdpSocket,
}

#[repr(C)]
pub struct otOperationalDatasetTlvs {
    pub mTlvs: [u8; 254],
    pub mLength: u8,
}

pub type otStateChangedCallback = Option<unsafe extern "C" fn(flags: u32, context: *mut c_void)>;

pub const OT_CHANGED_THREAD_ROLE: u32 = 1 << 2;
pub const OT_NETIF_THREAD_INTERNAL: u32 = 2;

extern "C" {
    // Base components and scheduler
    pub fn hal_Init();
    pub fn hal_EnableGlobalInterrupts();
    pub fn gpBaseComps_StackInit();
    pub fn gpSched_Main_Body();
    pub fn gpSched_ScheduleEvent(delay_us: u32, callback: SchedCallback);
    pub fn gpSched_UnscheduleEvent(callback: SchedCallback) -> bool;
    pub fn gpSched_GetCurrentTime() -> u32;
    pub fn gpReset_ResetSystem();
    pub fn hal_WaitUs(us: u32);

    // Status LEDs
    pub fn StatusLed_Init(gpios: *const u8, count: u8, active_high: bool);
    pub fn StatusLed_SetLed(led: u8, on: bool);
    pub fn StatusLed_BlinkLed(led: u8, on_ms: u16, off_ms: u16);

    // GPIO
    pub fn qDrvIOB_ConfigInputSet(gpio: u8, pull: u8, schmitt: bool) -> qResult;
    pub fn qDrvIOB_ConfigOutputSet(gpio: u8, drive: u8, slew: u8) -> qResult;
    pub fn qDrvGPIO_Read(gpio: u8) -> u8;
    pub fn qDrvGPIO_Write(gpio: u8, value: u8);

    // GPADC
    pub fn qDrvGPADC_PinConfigSet(pins: *const qDrvIOB_PinAlt_t, count: u8) -> qResult;
    pub fn qDrvGPADC_Init(
        drv: *mut qDrvGPADC_t,
        config: *const qDrvGPADC_Config_t,
        callback: *const c_void,
        context: *mut c_void,
        flags: u32,
    ) -> qResult;
    pub fn qDrvGPADC_SlotConfigSet(drv: *mut qDrvGPADC_t, slot: u8, config: *const qDrvGPADC_SlotConfig_t) -> qResult;
    pub fn qDrvGPADC_SlotEnable(drv: *mut qDrvGPADC_t, slot: u8) -> qResult;
    pub fn qDrvGPADC_BufferConfigSet(
        drv: *mut qDrvGPADC_t,
        buffer: u8,
        config: *const qDrvGPADC_BufferConfig_t,
    ) -> qResult;
    pub fn qDrvGPADC_ContinuousStart(drv: *mut qDrvGPADC_t) -> qResult;
    pub fn qDrvGPADC_BufferRawResultGet(drv: *mut qDrvGPADC_t, buffer: u8) -> u16;

    // UART
    pub fn qDrvUart_GetDefaultConfig(config: *mut qDrvUart_Config_t);
    pub fn qDrvUart_Init(instance: u8, config: *const qDrvUart_Config_t, handle: *mut qDrvUart_Handle_t) -> qResult;
    pub fn qDrvUart_Write(handle: qDrvUart_Handle_t, data: *const u8, len: u16) -> qResult;
    pub fn qDrvUart_Read(handle: qDrvUart_Handle_t, data: *mut u8, len: u16) -> u16;

    // BleIf
    pub fn BleIf_Init(callbacks: *const BleIf_Callbacks_t);
    pub fn BleIf_InitCentral(callbacks: *const BleIf_Callbacks_t);
    pub fn BleIf_StartAdvertising() -> Status;
    pub fn BleIf_SendNotification(handle: u16, len: u16, value: *const u8) -> Status;
    pub fn BleIf_StartScanning() -> Status;
    pub fn BleIf_StopScanning() -> Status;
    pub fn BleIf_Connect(addr_type: u8, addr: *const u8) -> Status;
    pub fn BleIf_DiscoverServices(conn: u16) -> Status;
    pub fn BleIf_WriteCharacteristic(conn: u16, handle: u16, len: u16, value: *const u8) -> Status;

    // OpenThread
    pub fn otInstanceInitSingle() -> *mut otInstance;
    pub fn otInstanceFactoryReset(instance: *mut otInstance);
    pub fn otTaskletsProcess(instance: *mut otInstance);
    pub fn otSetStateChangedCallback(
        instance: *mut otInstance,
        callback: otStateChangedCallback,
        context: *mut c_void,
    ) -> otError;
    pub fn otDatasetIsCommissioned(instance: *mut otInstance) -> bool;
    pub fn otDatasetSetActiveTlvs(instance: *mut otInstance, tlvs: *const otOperationalDatasetTlvs) -> otError;
    pub fn otIp6SetEnabled(instance: *mut otInstance, enabled: bool) -> otError;
    pub fn otThreadSetEnabled(instance: *mut otInstance, enabled: bool) -> otError;
    pub fn otThreadGetDeviceRole(instance: *mut otInstance) -> u32;
    pub fn otUdpOpen(
        instance: *mut otInstance,
        socket: *mut otUdpSocket,
        callback: otUdpReceive,
        context: *mut c_void,
    ) -> otError;
    pub fn otUdpBind(
        instance: *mut otInstance,
        socket: *mut otUdpSocket,
        name: *const otSockAddr,
        netif: u32,
    ) -> otError;
    pub fn otUdpNewMessage(instance: *mut otInstance, settings: *const c_void) -> *mut otMessage;
    pub fn otUdpSend(
        instance: *mut otInstance,
        socket: *mut otUdpSocket,
        message: *mut otMessage,
        info: *const otMessageInfo,
    ) -> otError;
    pub fn otMessageAppend(message: *mut otMessage, data: *const c_void, len: u16) -> otError;
    pub fn otMessageFree(message: *mut otMessage);
    pub fn otMessageGetLength(message: *const otMessage) -> u16;
    pub fn otMessageGetOffset(message: *const otMessage) -> u16;
    pub fn otMessageRead(message: *const otMessage, offset: u16, buf: *mut c_void, len: u16) -> u16;
}
