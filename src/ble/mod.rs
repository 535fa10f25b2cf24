//! Bluetooth Low Energy glue.
//!
//! The GATT server, link layer and advertising state machine live in the
//! vendor `BleIf` stack. This module only:
//!
//! 1. **Translates** stack callback codes into [`BleEvent`]s.
//! 2. **Decodes** characteristic writes by handle ([`gatt`]).
//! 3. **Tracks** the peripheral link and its status LED ([`link`]).
//! 4. **Builds/parses** advertising payloads ([`adv_parser`]).

pub mod adv_parser;
pub mod gatt;
pub mod link;

use heapless::String;

use crate::event::BleEvent;

/// Raw callback codes reported by `BleIf` (device manager and ATT ranges).
pub mod codes {
    pub const DM_RESET_CMPL_IND: u8 = 0x20;
    pub const DM_ADV_START_IND: u8 = 0x21;
    pub const DM_ADV_STOP_IND: u8 = 0x22;
    pub const DM_SCAN_START_IND: u8 = 0x24;
    pub const DM_SCAN_STOP_IND: u8 = 0x25;
    pub const DM_SCAN_REPORT_IND: u8 = 0x26;
    pub const DM_CONN_OPEN_IND: u8 = 0x27;
    pub const DM_CONN_CLOSE_IND: u8 = 0x28;
    pub const ATT_DISC_SVC_CMPL: u8 = 0x93;
}

/// CCCD bit enabling notifications.
pub const CCC_NOTIFY: u16 = 0x0001;

/// 48-bit device address plus its type (public / random).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeerAddress {
    /// Little-endian, as delivered by the stack.
    pub addr: [u8; 6],
    pub kind: u8,
}

/// One advertising report seen while scanning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanReport {
    pub address: PeerAddress,
    pub rssi: i8,
    /// Complete or shortened local name, if advertised.
    pub name: Option<String<32>>,
}

impl ScanReport {
    /// Build a report from raw advertising data.
    pub fn from_adv(address: PeerAddress, rssi: i8, adv_data: &[u8]) -> Self {
        Self {
            address,
            rssi,
            name: adv_parser::extract_device_name(adv_data),
        }
    }

    /// Whether the advertised name contains `target`.
    pub fn name_contains(&self, target: &str) -> bool {
        self.name.as_ref().is_some_and(|n| n.contains(target))
    }
}

/// Stack notification, decoded from its raw code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StackEvent {
    AdvStart,
    AdvStop,
    ScanStart,
    ScanStop,
    ConnOpen(u16),
    ConnClose,
    DiscoveryComplete,
    Other(u8),
}

impl StackEvent {
    /// `conn` is only meaningful for connection indications.
    pub fn from_raw(code: u8, conn: u16) -> Self {
        match code {
            codes::DM_ADV_START_IND => StackEvent::AdvStart,
            codes::DM_ADV_STOP_IND => StackEvent::AdvStop,
            codes::DM_SCAN_START_IND => StackEvent::ScanStart,
            codes::DM_SCAN_STOP_IND => StackEvent::ScanStop,
            codes::DM_CONN_OPEN_IND => StackEvent::ConnOpen(conn),
            codes::DM_CONN_CLOSE_IND => StackEvent::ConnClose,
            codes::ATT_DISC_SVC_CMPL => StackEvent::DiscoveryComplete,
            other => StackEvent::Other(other),
        }
    }
}

/// Map a stack notification to an application event. Codes the
/// applications do not react to yield `None` and are dropped.
pub fn translate(event: StackEvent) -> Option<BleEvent> {
    match event {
        StackEvent::AdvStart => Some(BleEvent::AdvertiseStarted),
        StackEvent::AdvStop => Some(BleEvent::AdvertiseStopped),
        StackEvent::ScanStart => Some(BleEvent::ScanStarted),
        StackEvent::ScanStop => Some(BleEvent::ScanStopped),
        StackEvent::ConnOpen(conn) => Some(BleEvent::Connected(conn)),
        StackEvent::ConnClose => Some(BleEvent::Disconnected),
        StackEvent::DiscoveryComplete => Some(BleEvent::DiscoveryComplete),
        StackEvent::Other(code) => {
            trace!("[BLE] unhandled stack event {:#x}", code);
            None
        }
    }
}

/// Map a CCCD update to an application event.
pub fn translate_ccc(handle: u16, value: u16) -> BleEvent {
    BleEvent::NotificationsChanged {
        handle,
        enabled: value & CCC_NOTIFY != 0,
    }
}
