//! Advertising data: AD-structure walking, name extraction and the payloads
//! the peripherals hand to the stack.

use heapless::{String, Vec};

use crate::error::Error;

/// Legacy advertising PDUs carry at most 31 bytes of AD data.
pub const ADV_DATA_MAX: usize = 31;

pub mod ad_type {
    pub const FLAGS: u8 = 0x01;
    pub const UUID16_INCOMPLETE: u8 = 0x02;
    pub const UUID16_COMPLETE: u8 = 0x03;
    pub const SHORT_NAME: u8 = 0x08;
    pub const COMPLETE_NAME: u8 = 0x09;
}

/// LE General Discoverable, BR/EDR not supported.
pub const FLAGS_GENERAL_DISC_NO_BREDR: u8 = 0x06;

/// Battery Service, the 16-bit UUID the peripherals advertise.
pub const BATTERY_SERVICE_UUID: u16 = 0x180F;

pub type AdvData = Vec<u8, ADV_DATA_MAX>;

/// Iterator over `(ad_type, payload)` pairs. Stops at the first zero-length
/// or truncated structure.
pub struct AdStructures<'a> {
    data: &'a [u8],
}

impl<'a> AdStructures<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for AdStructures<'a> {
    type Item = (u8, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let (&len, rest) = self.data.split_first()?;
        let len = len as usize;
        if len == 0 || len > rest.len() {
            self.data = &[];
            return None;
        }
        let (field, tail) = rest.split_at(len);
        self.data = tail;
        Some((field[0], &field[1..]))
    }
}

/// Extract complete/shortened local name from advertisement data.
///
/// Non-ASCII bytes are replaced with `?`; names longer than 32 bytes are
/// truncated.
pub fn extract_device_name(data: &[u8]) -> Option<String<32>> {
    let (_, bytes) = AdStructures::new(data)
        .find(|(t, _)| *t == ad_type::COMPLETE_NAME || *t == ad_type::SHORT_NAME)?;

    let mut name = String::new();
    for &b in bytes {
        let c = if b.is_ascii() { b as char } else { '?' };
        if name.push(c).is_err() {
            break;
        }
    }
    Some(name)
}

fn push_field(buf: &mut AdvData, kind: u8, payload: &[u8]) -> Result<(), Error> {
    let len = u8::try_from(payload.len() + 1).map_err(|_| Error::BufferOverflow)?;
    buf.push(len).map_err(|_| Error::BufferOverflow)?;
    buf.push(kind).map_err(|_| Error::BufferOverflow)?;
    buf.extend_from_slice(payload).map_err(|_| Error::BufferOverflow)
}

/// Advertising payload: flags plus the complete list of 16-bit service UUIDs.
pub fn advertising_data(service_uuids: &[u16]) -> Result<AdvData, Error> {
    let mut buf = AdvData::new();
    push_field(&mut buf, ad_type::FLAGS, &[FLAGS_GENERAL_DISC_NO_BREDR])?;

    let mut uuids: Vec<u8, ADV_DATA_MAX> = Vec::new();
    for uuid in service_uuids {
        uuids
            .extend_from_slice(&uuid.to_le_bytes())
            .map_err(|_| Error::BufferOverflow)?;
    }
    if !uuids.is_empty() {
        push_field(&mut buf, ad_type::UUID16_COMPLETE, &uuids)?;
    }
    Ok(buf)
}

/// Scan response payload: the complete local name.
pub fn scan_response(name: &str) -> Result<AdvData, Error> {
    let mut buf = AdvData::new();
    push_field(&mut buf, ad_type::COMPLETE_NAME, name.as_bytes())?;
    Ok(buf)
}

/// Name and services a peripheral advertises.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvProfile {
    pub name: &'static str,
    pub service_uuids: &'static [u16],
}

impl AdvProfile {
    pub const fn new(name: &'static str, service_uuids: &'static [u16]) -> Self {
        Self { name, service_uuids }
    }

    pub fn advertising_data(&self) -> Result<AdvData, Error> {
        advertising_data(self.service_uuids)
    }

    pub fn scan_response(&self) -> Result<AdvData, Error> {
        scan_response(self.name)
    }
}

/// Copy a built frame to the front of `out` and return its length.
///
/// A frame that failed to build or does not fit loads as empty.
pub fn load_frame(frame: Result<AdvData, Error>, out: &mut [u8]) -> u8 {
    let frame = match frame {
        Ok(f) => f,
        Err(e) => {
            warn!("[BLE] advertising frame not built: {:?}", e);
            return 0;
        }
    };
    let Some(dst) = out.get_mut(..frame.len()) else {
        warn!("[BLE] advertising frame of {} bytes exceeds buffer", frame.len());
        return 0;
    };
    dst.copy_from_slice(&frame);
    frame.len() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doorbell_advertising_payload() {
        let adv = advertising_data(&[BATTERY_SERVICE_UUID]).unwrap();
        assert_eq!(adv.as_slice(), &[0x02, 0x01, 0x06, 0x03, 0x03, 0x0F, 0x18]);
    }

    #[test]
    fn profile_frames_load_into_stack_buffer() {
        const PROFILE: AdvProfile = AdvProfile::new("LedRX", &[BATTERY_SERVICE_UUID]);
        let mut out = [0xAAu8; ADV_DATA_MAX];

        let len = load_frame(PROFILE.advertising_data(), &mut out);
        assert_eq!(&out[..usize::from(len)], &[0x02, 0x01, 0x06, 0x03, 0x03, 0x0F, 0x18]);
        assert_eq!(out[usize::from(len)], 0xAA);

        let len = load_frame(PROFILE.scan_response(), &mut out);
        assert_eq!(len, 7);
        assert_eq!(extract_device_name(&out[..usize::from(len)]).as_deref(), Some("LedRX"));
    }

    #[test]
    fn unbuildable_or_oversized_frame_loads_empty() {
        let mut out = [0u8; ADV_DATA_MAX];
        assert_eq!(load_frame(Err(Error::BufferOverflow), &mut out), 0);

        let mut small = [0u8; 4];
        let frame = scan_response("QPG Doorbell");
        assert_eq!(load_frame(frame, &mut small), 0);
        assert_eq!(small, [0; 4]);
    }

    #[test]
    fn scan_response_carries_name() {
        let rsp = scan_response("QPG Doorbell").unwrap();
        assert_eq!(rsp[0], 13);
        assert_eq!(rsp[1], ad_type::COMPLETE_NAME);
        assert_eq!(extract_device_name(&rsp).as_deref(), Some("QPG Doorbell"));
    }

    #[test]
    fn oversized_name_is_rejected() {
        let long = "0123456789012345678901234567890";
        assert_eq!(scan_response(long), Err(Error::BufferOverflow));
    }

    #[test]
    fn name_after_other_fields() {
        let data = [0x02, 0x01, 0x06, 0x06, 0x08, b'L', b'e', b'd', b'R', b'X'];
        assert_eq!(extract_device_name(&data).as_deref(), Some("LedRX"));
    }

    #[test]
    fn truncated_structure_stops_parsing() {
        // Claims 9 bytes but only 3 follow.
        let data = [0x02, 0x01, 0x06, 0x09, 0x09, b'a', b'b'];
        assert_eq!(extract_device_name(&data), None);
        assert_eq!(AdStructures::new(&data).count(), 1);
    }

    #[test]
    fn zero_length_terminates() {
        let data = [0x00, 0x05, 0x09, b'n', b'a', b'm', b'e'];
        assert_eq!(extract_device_name(&data), None);
    }

    #[test]
    fn non_ascii_is_masked() {
        let data = [0x04, 0x09, b'a', 0xC3, b'b'];
        assert_eq!(extract_device_name(&data).as_deref(), Some("a?b"));
    }
}
