//! Doorbell ring propagation over the mesh.
//!
//! A ring is one UDP datagram carrying `0x01`, multicast to ff03::1 on the
//! ring port. A ring that arrived over the mesh is never multicast again.

use crate::event::ThreadEvent;

/// Ring payload byte.
pub const RING: u8 = 0x01;

/// Where a ring came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RingSource {
    /// Button on this board.
    Local,
    /// Phone wrote the ring characteristic.
    Phone,
    /// Another node's multicast.
    Thread,
}

impl RingSource {
    /// Whether a ring from this source is multicast to the mesh.
    pub fn forwards_to_mesh(self) -> bool {
        !matches!(self, RingSource::Thread)
    }

    pub fn label(self) -> &'static str {
        match self {
            RingSource::Local => "local button",
            RingSource::Phone => "phone",
            RingSource::Thread => "Thread network",
        }
    }
}

/// Datagram sent for a ring.
pub fn encode() -> [u8; 1] {
    [RING]
}

/// Interpret a received datagram. Anything but a single `0x01` is ignored.
pub fn decode(payload: &[u8]) -> Option<ThreadEvent> {
    match payload {
        [RING] => Some(ThreadEvent::RingReceived),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_mesh_rings_stay_local() {
        assert!(RingSource::Local.forwards_to_mesh());
        assert!(RingSource::Phone.forwards_to_mesh());
        assert!(!RingSource::Thread.forwards_to_mesh());
    }

    #[test]
    fn decode_accepts_single_ring_byte() {
        assert_eq!(decode(&encode()), Some(ThreadEvent::RingReceived));
        assert_eq!(decode(&[0x00]), None);
        assert_eq!(decode(&[0x01, 0x01]), None);
        assert_eq!(decode(&[]), None);
    }
}
