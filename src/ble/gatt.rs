//! GATT handles registered with `BleIf` and the per-application write
//! decoders: a known handle becomes a typed [`BleEvent`], an unknown one is
//! only logged.

use crate::ble::adv_parser::{AdvProfile, BATTERY_SERVICE_UUID};
use crate::config;
use crate::event::BleEvent;
use crate::thread::{dataset, ThreadParam};

/// Decoder handed to the board's write callback.
pub type WriteDecoder = fn(handle: u16, value: &[u8]) -> Option<BleEvent>;

/// Advertising and scan response content, one per peripheral.
pub const DOORBELL_ADV: AdvProfile = AdvProfile::new(config::BLE_DOORBELL_NAME, &[BATTERY_SERVICE_UUID]);
pub const LED_RX_ADV: AdvProfile = AdvProfile::new(config::LEDRX_NAME, &[BATTERY_SERVICE_UUID]);
pub const THREAD_DOORBELL_ADV: AdvProfile =
    AdvProfile::new(config::THREAD_DOORBELL_NAME, &[BATTERY_SERVICE_UUID]);

/// Ring characteristic values.
pub const RING_IDLE: u8 = 0x00;
pub const RING_ACTIVE: u8 = 0x01;

/// Standard Battery Service.
pub mod battery {
    pub const SVC_HDL: u16 = 0x2000;
    pub const LEVEL_CH_HDL: u16 = 0x2001;
    pub const LEVEL_HDL: u16 = 0x2002;
    pub const LEVEL_CCC_HDL: u16 = 0x2003;
}

/// Custom doorbell service (ring read/write/notify).
pub mod doorbell {
    pub const SVC_HDL: u16 = 0x3000;
    pub const RING_CH_HDL: u16 = 0x3001;
    pub const RING_HDL: u16 = 0x3002;
    pub const RING_CCC_HDL: u16 = 0x3003;
}

/// LED receiver control service.
pub mod led {
    pub const CONTROL_HDL: u16 = 0x3002;
    /// Control characteristic value handle on the peer, as seen by the central.
    pub const REMOTE_CONTROL_HDL: u16 = 0x0015;
}

/// Thread commissioning service.
pub mod thread_config {
    pub const SVC_HDL: u16 = 0x4000;
    pub const NETWORK_NAME_HDL: u16 = 0x4002;
    pub const NETWORK_KEY_HDL: u16 = 0x4004;
    pub const CHANNEL_HDL: u16 = 0x4006;
    pub const PAN_ID_HDL: u16 = 0x4008;
    pub const JOIN_HDL: u16 = 0x400A;
    pub const STATUS_HDL: u16 = 0x400C;
    pub const STATUS_CCC_HDL: u16 = 0x400D;

    /// Value written to the join characteristic to start joining.
    pub const JOIN_START: u8 = 0x01;
}

fn unknown(handle: u16) -> Option<BleEvent> {
    warn!("[BLE] Write to unknown handle {:#x}", handle);
    None
}

/// BLE doorbell: ring characteristic only.
pub fn doorbell_write(handle: u16, value: &[u8]) -> Option<BleEvent> {
    match (handle, value) {
        (doorbell::RING_HDL, [v, ..]) => Some(BleEvent::RingWrite(*v)),
        (doorbell::RING_HDL, []) => None,
        _ => unknown(handle),
    }
}

/// LED receiver: control characteristic only.
pub fn led_control_write(handle: u16, value: &[u8]) -> Option<BleEvent> {
    match (handle, value) {
        (led::CONTROL_HDL, [v, ..]) => Some(BleEvent::LedWrite(*v)),
        (led::CONTROL_HDL, []) => None,
        _ => unknown(handle),
    }
}

/// Thread doorbell: ring characteristic plus the commissioning service.
pub fn thread_doorbell_write(handle: u16, value: &[u8]) -> Option<BleEvent> {
    use thread_config::*;

    match handle {
        doorbell::RING_HDL => value.first().map(|v| BleEvent::RingWrite(*v)),
        NETWORK_NAME_HDL => Some(BleEvent::ThreadParam(ThreadParam::NetworkName(
            dataset::network_name(value),
        ))),
        NETWORK_KEY_HDL => match <[u8; 16]>::try_from(value) {
            Ok(key) => Some(BleEvent::ThreadParam(ThreadParam::NetworkKey(key))),
            Err(_) => {
                warn!("[BLE] Network key must be 16 bytes, got {}", value.len());
                None
            }
        },
        CHANNEL_HDL => value
            .first()
            .map(|ch| BleEvent::ThreadParam(ThreadParam::Channel(*ch))),
        PAN_ID_HDL => match value {
            [lo, hi, ..] => Some(BleEvent::ThreadParam(ThreadParam::PanId(u16::from_le_bytes([*lo, *hi])))),
            _ => {
                warn!("[BLE] PAN ID must be 2 bytes");
                None
            }
        },
        JOIN_HDL => match value {
            [JOIN_START, ..] => Some(BleEvent::JoinRequested),
            _ => {
                info!("[BLE] Join characteristic written without 0x01, ignored");
                None
            }
        },
        _ => unknown(handle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_write_maps_value() {
        assert_eq!(doorbell_write(doorbell::RING_HDL, &[0x01]), Some(BleEvent::RingWrite(1)));
        assert_eq!(doorbell_write(doorbell::RING_HDL, &[0x00]), Some(BleEvent::RingWrite(0)));
        assert_eq!(doorbell_write(doorbell::RING_HDL, &[]), None);
    }

    #[test]
    fn unknown_handles_only_log() {
        assert_eq!(doorbell_write(battery::LEVEL_HDL, &[0x01]), None);
        assert_eq!(led_control_write(0x1234, &[0x01]), None);
        assert_eq!(thread_doorbell_write(0x5000, &[0x01]), None);
    }

    #[test]
    fn led_control_maps_value() {
        assert_eq!(led_control_write(led::CONTROL_HDL, &[0x07]), Some(BleEvent::LedWrite(7)));
    }

    #[test]
    fn commissioning_writes_decode() {
        use thread_config::*;

        assert_eq!(
            thread_doorbell_write(PAN_ID_HDL, &[0xCD, 0xAB]),
            Some(BleEvent::ThreadParam(ThreadParam::PanId(0xABCD)))
        );
        assert_eq!(
            thread_doorbell_write(CHANNEL_HDL, &[20]),
            Some(BleEvent::ThreadParam(ThreadParam::Channel(20)))
        );
        assert_eq!(
            thread_doorbell_write(NETWORK_KEY_HDL, &[0x11; 16]),
            Some(BleEvent::ThreadParam(ThreadParam::NetworkKey([0x11; 16])))
        );
        assert_eq!(thread_doorbell_write(NETWORK_KEY_HDL, &[0x11; 15]), None);
        assert_eq!(thread_doorbell_write(JOIN_HDL, &[0x01]), Some(BleEvent::JoinRequested));
        assert_eq!(thread_doorbell_write(JOIN_HDL, &[0x00]), None);

        match thread_doorbell_write(NETWORK_NAME_HDL, b"Home") {
            Some(BleEvent::ThreadParam(ThreadParam::NetworkName(n))) => assert_eq!(n.as_str(), "Home"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
