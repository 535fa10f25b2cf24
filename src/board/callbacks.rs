//! Stack callbacks. Each one translates what the vendor stack reports into
//! an [`AppEvent`] and posts it; none of them touches application state.

use core::cell::Cell;
use core::ffi::c_void;
use core::sync::atomic::Ordering;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::{ffi, EVENTS, OT_INSTANCE};
use crate::ble::adv_parser::{self, AdvData, AdvProfile, ADV_DATA_MAX};
use crate::ble::gatt::WriteDecoder;
use crate::error::Error;
use crate::ble::{self, codes, PeerAddress, ScanReport, StackEvent};
use crate::event::AppEvent;
use crate::thread::{self, ring, Role};

/// Decoder for characteristic writes, chosen by the running demo.
static WRITE_DECODER: Mutex<CriticalSectionRawMutex, Cell<Option<WriteDecoder>>> = Mutex::new(Cell::new(None));

/// Name and services the running demo advertises.
static ADV_PROFILE: Mutex<CriticalSectionRawMutex, Cell<Option<AdvProfile>>> = Mutex::new(Cell::new(None));

pub(super) static BLE_CALLBACKS: ffi::BleIf_Callbacks_t = ffi::BleIf_Callbacks_t {
    stackCallback: Some(ble_stack),
    chrReadCallback: Some(ble_read),
    chrWriteCallback: Some(ble_write),
    cccCallback: Some(ble_ccc),
};

pub(super) fn set_peripheral(decoder: WriteDecoder, adv: AdvProfile) {
    WRITE_DECODER.lock(|d| d.set(Some(decoder)));
    ADV_PROFILE.lock(|p| p.set(Some(adv)));
}

fn load_frame(buffer: *mut u8, build: fn(&AdvProfile) -> Result<AdvData, Error>) -> u8 {
    let Some(profile) = ADV_PROFILE.lock(|p| p.get()) else {
        warn!("[BLE] advertising requested before a profile was set");
        return 0;
    };
    if buffer.is_null() {
        return 0;
    }
    // SAFETY: BleIf hands over an advertising dataset buffer of 31 bytes.
    let out = unsafe { core::slice::from_raw_parts_mut(buffer, ADV_DATA_MAX) };
    adv_parser::load_frame(build(&profile), out)
}

/// Advertising frame hook; BleIf looks this symbol up by name.
///
/// # Safety
/// `buffer` must be null or valid for 31 bytes of writes.
#[no_mangle]
pub unsafe extern "C" fn Ble_Peripheral_Config_Load_Advertise_Frame(buffer: *mut u8) -> u8 {
    load_frame(buffer, AdvProfile::advertising_data)
}

/// Scan response frame hook; BleIf looks this symbol up by name.
///
/// # Safety
/// As for [`Ble_Peripheral_Config_Load_Advertise_Frame`].
#[no_mangle]
pub unsafe extern "C" fn Ble_Peripheral_Config_Load_Scan_Response_Frame(buffer: *mut u8) -> u8 {
    load_frame(buffer, AdvProfile::scan_response)
}

fn post(event: AppEvent) {
    // Failures are logged by the queue.
    let _ = EVENTS.post(event);
}

unsafe extern "C" fn ble_stack(msg: *mut ffi::BleIf_MsgHdr_t) {
    // SAFETY: the stack passes a valid header for the duration of the call.
    let Some(hdr) = (unsafe { msg.as_ref() }) else {
        return;
    };

    if hdr.event == codes::DM_SCAN_REPORT_IND {
        // SAFETY: scan reports are delivered as `BleIf_ScanReport_t`.
        let report = unsafe { &*(msg as *const ffi::BleIf_ScanReport_t) };
        let data = if report.pData.is_null() {
            &[][..]
        } else {
            // SAFETY: `pData` points at `len` bytes owned by the stack.
            unsafe { core::slice::from_raw_parts(report.pData, usize::from(report.len)) }
        };
        let address = PeerAddress { addr: report.addr, kind: report.addrType };
        post(AppEvent::Ble(crate::event::BleEvent::DeviceFound(ScanReport::from_adv(
            address,
            report.rssi,
            data,
        ))));
        return;
    }

    if let Some(event) = ble::translate(StackEvent::from_raw(hdr.event, hdr.param)) {
        post(AppEvent::Ble(event));
    }
}

unsafe extern "C" fn ble_read(_conn: u16, _handle: u16, _op: u8, _offset: u16, _attr: *mut ffi::BleIf_Attr_t) {
    // Static values are served by BleIf.
}

unsafe extern "C" fn ble_write(
    _conn: u16,
    handle: u16,
    _op: u8,
    _offset: u16,
    len: u16,
    value: *mut u8,
    _attr: *mut ffi::BleIf_Attr_t,
) {
    let value = if value.is_null() {
        &[][..]
    } else {
        // SAFETY: the stack passes `len` valid bytes for the call.
        unsafe { core::slice::from_raw_parts(value, usize::from(len)) }
    };

    let Some(decode) = WRITE_DECODER.lock(|d| d.get()) else {
        return;
    };
    if let Some(event) = decode(handle, value) {
        post(AppEvent::Ble(event));
    }
}

unsafe extern "C" fn ble_ccc(event: *mut ffi::BleIf_AttsCccEvt_t) {
    // SAFETY: valid for the duration of the call.
    if let Some(evt) = unsafe { event.as_ref() } {
        post(AppEvent::Ble(ble::translate_ccc(evt.handle, evt.value)));
    }
}

pub(super) unsafe extern "C" fn thread_state_changed(flags: u32, _context: *mut c_void) {
    if flags & ffi::OT_CHANGED_THREAD_ROLE == 0 {
        return;
    }
    let instance = OT_INSTANCE.load(Ordering::Acquire);
    if instance.is_null() {
        return;
    }
    // SAFETY: the instance outlives every callback it issues.
    let raw = unsafe { ffi::otThreadGetDeviceRole(instance) };
    let role = Role::from_raw(raw as u8);
    info!("[Thread] Role changed: {:?}", role);
    if let Some(event) = thread::role_event(role) {
        post(AppEvent::Thread(event));
    }
}

pub(super) unsafe extern "C" fn thread_udp_receive(
    _context: *mut c_void,
    message: *mut ffi::otMessage,
    _info: *const ffi::otMessageInfo,
) {
    if message.is_null() {
        return;
    }
    // SAFETY: OpenThread owns `message` for the duration of the call.
    let (offset, length) = unsafe { (ffi::otMessageGetOffset(message), ffi::otMessageGetLength(message)) };
    let mut payload = [0u8; 4];
    let wanted = length.saturating_sub(offset).min(payload.len() as u16);
    // SAFETY: `payload` holds at least `wanted` bytes.
    let read = unsafe { ffi::otMessageRead(message, offset, payload.as_mut_ptr().cast(), wanted) };

    if let Some(event) = ring::decode(&payload[..usize::from(read)]) {
        post(AppEvent::Thread(event));
    }
}
