//! Commissioning parameters written over BLE and the operational dataset
//! built from them.

use heapless::{String, Vec};

use crate::config;
use crate::error::Error;

/// Thread network names are at most 16 bytes.
pub type NetworkName = String<16>;

/// Build a network name from raw characteristic bytes, truncating to 16.
pub fn network_name(bytes: &[u8]) -> NetworkName {
    let mut name = NetworkName::new();
    for &b in bytes.iter().take(16) {
        let c = if b.is_ascii() { b as char } else { '?' };
        // Cannot overflow: at most 16 single-byte chars.
        let _ = name.push(c);
    }
    name
}

/// One commissioning characteristic value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThreadParam {
    NetworkName(NetworkName),
    NetworkKey([u8; 16]),
    Channel(u8),
    PanId(u16),
}

/// Parameters collected from the phone before a join.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub network_name: NetworkName,
    pub network_key: [u8; 16],
    pub channel: u8,
    pub pan_id: u16,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            network_name: network_name(config::THREAD_DEFAULT_NETWORK_NAME.as_bytes()),
            network_key: [0; 16],
            channel: config::THREAD_DEFAULT_CHANNEL,
            pan_id: config::THREAD_DEFAULT_PAN_ID,
        }
    }
}

impl Credentials {
    /// Store one written parameter. Out-of-range channels are refused and
    /// the previous value kept.
    pub fn apply(&mut self, param: ThreadParam) -> Result<(), Error> {
        match param {
            ThreadParam::NetworkName(name) => {
                info!("[Thread] Network name set: {}", name.as_str());
                self.network_name = name;
            }
            ThreadParam::NetworkKey(key) => {
                info!("[Thread] Network key set (16 bytes)");
                self.network_key = key;
            }
            ThreadParam::Channel(ch) => {
                if !(config::THREAD_CHANNEL_MIN..=config::THREAD_CHANNEL_MAX).contains(&ch) {
                    warn!("[Thread] Channel {} out of range, keeping {}", ch, self.channel);
                    return Err(Error::InvalidParameter);
                }
                info!("[Thread] Channel set: {}", ch);
                self.channel = ch;
            }
            ThreadParam::PanId(pan) => {
                info!("[Thread] PAN ID set: {:#x}", pan);
                self.pan_id = pan;
            }
        }
        Ok(())
    }

    pub fn to_dataset(&self) -> Dataset {
        Dataset {
            active_timestamp: 1,
            network_name: self.network_name.clone(),
            network_key: self.network_key,
            channel: self.channel,
            pan_id: self.pan_id,
        }
    }
}

/// Active operational dataset handed to the stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dataset {
    pub active_timestamp: u64,
    pub network_name: NetworkName,
    pub network_key: [u8; 16],
    pub channel: u8,
    pub pan_id: u16,
}

/// MeshCoP TLV types used in an active dataset.
pub mod tlv {
    pub const CHANNEL: u8 = 0;
    pub const PAN_ID: u8 = 1;
    pub const NETWORK_NAME: u8 = 3;
    pub const NETWORK_KEY: u8 = 5;
    pub const ACTIVE_TIMESTAMP: u8 = 14;
}

/// Largest dataset `otDatasetSetActiveTlvs` accepts.
pub const DATASET_TLVS_MAX: usize = 254;

pub type DatasetTlvs = Vec<u8, DATASET_TLVS_MAX>;

impl Dataset {
    /// Encode as MeshCoP TLVs, big-endian fields, channel page 0.
    pub fn to_tlvs(&self) -> Result<DatasetTlvs, Error> {
        let mut out = DatasetTlvs::new();

        // 48-bit seconds, then 15-bit ticks and the authoritative bit (zero).
        let seconds = self.active_timestamp.to_be_bytes();
        let mut timestamp = [0u8; 8];
        timestamp[..6].copy_from_slice(&seconds[2..]);
        push_tlv(&mut out, tlv::ACTIVE_TIMESTAMP, &timestamp)?;

        let channel = u16::from(self.channel).to_be_bytes();
        push_tlv(&mut out, tlv::CHANNEL, &[0, channel[0], channel[1]])?;
        push_tlv(&mut out, tlv::PAN_ID, &self.pan_id.to_be_bytes())?;
        push_tlv(&mut out, tlv::NETWORK_NAME, self.network_name.as_bytes())?;
        push_tlv(&mut out, tlv::NETWORK_KEY, &self.network_key)?;
        Ok(out)
    }
}

fn push_tlv(out: &mut DatasetTlvs, kind: u8, value: &[u8]) -> Result<(), Error> {
    let len = u8::try_from(value.len()).map_err(|_| Error::BufferOverflow)?;
    out.push(kind).map_err(|_| Error::BufferOverflow)?;
    out.push(len).map_err(|_| Error::BufferOverflow)?;
    out.extend_from_slice(value).map_err(|_| Error::BufferOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_network() {
        let c = Credentials::default();
        assert_eq!(c.network_name.as_str(), "DoorbellNet");
        assert_eq!(c.network_key, [0; 16]);
        assert_eq!(c.channel, 15);
        assert_eq!(c.pan_id, 0xABCD);
    }

    #[test]
    fn long_names_are_truncated() {
        let name = network_name(b"AVeryLongNetworkNameIndeed");
        assert_eq!(name.as_str(), "AVeryLongNetwork");
    }

    #[test]
    fn channel_outside_band_is_refused() {
        let mut c = Credentials::default();
        assert_eq!(c.apply(ThreadParam::Channel(10)), Err(Error::InvalidParameter));
        assert_eq!(c.apply(ThreadParam::Channel(27)), Err(Error::InvalidParameter));
        assert_eq!(c.channel, 15);
        assert_eq!(c.apply(ThreadParam::Channel(26)), Ok(()));
        assert_eq!(c.channel, 26);
    }

    #[test]
    fn dataset_reflects_written_params() {
        let mut c = Credentials::default();
        c.apply(ThreadParam::NetworkName(network_name(b"Home"))).unwrap();
        c.apply(ThreadParam::NetworkKey([0xAA; 16])).unwrap();
        c.apply(ThreadParam::PanId(0x1234)).unwrap();

        let ds = c.to_dataset();
        assert_eq!(ds.active_timestamp, 1);
        assert_eq!(ds.network_name.as_str(), "Home");
        assert_eq!(ds.network_key, [0xAA; 16]);
        assert_eq!(ds.channel, 15);
        assert_eq!(ds.pan_id, 0x1234);
    }

    #[test]
    fn dataset_tlv_encoding() {
        let mut c = Credentials::default();
        c.apply(ThreadParam::NetworkName(network_name(b"Net"))).unwrap();
        c.apply(ThreadParam::NetworkKey([0x11; 16])).unwrap();
        let tlvs = c.to_dataset().to_tlvs().unwrap();

        let mut expected = std::vec![14, 8, 0, 0, 0, 0, 0, 1, 0, 0];
        expected.extend_from_slice(&[0, 3, 0, 0, 15]);
        expected.extend_from_slice(&[1, 2, 0xAB, 0xCD]);
        expected.extend_from_slice(&[3, 3, b'N', b'e', b't']);
        expected.extend_from_slice(&[5, 16]);
        expected.extend_from_slice(&[0x11; 16]);
        assert_eq!(tlvs.as_slice(), expected.as_slice());
    }
}
