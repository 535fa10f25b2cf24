//! Thread mesh glue: device role, commissioning data and the doorbell ring
//! multicast. The mesh itself is OpenThread's; see `hal::ThreadStack`.

pub mod dataset;
pub mod ring;

pub use dataset::{Credentials, Dataset, NetworkName, ThreadParam};
pub use ring::RingSource;

use crate::event::ThreadEvent;

/// OpenThread device role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    Disabled,
    Detached,
    Child,
    Router,
    Leader,
}

impl Role {
    /// From `otDeviceRole`.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Role::Detached,
            2 => Role::Child,
            3 => Role::Router,
            4 => Role::Leader,
            _ => Role::Disabled,
        }
    }

    /// Byte exposed on the Thread status characteristic.
    pub fn status_byte(self) -> u8 {
        match self {
            Role::Disabled => 0,
            Role::Detached => 1,
            Role::Child => 2,
            Role::Router => 3,
            Role::Leader => 4,
        }
    }

    /// Child, router or leader.
    pub fn is_attached(self) -> bool {
        matches!(self, Role::Child | Role::Router | Role::Leader)
    }
}

/// Event for a role change. `Disabled` is reached only through our own
/// calls and is not reported.
pub fn role_event(role: Role) -> Option<ThreadEvent> {
    match role {
        Role::Child | Role::Router | Role::Leader => Some(ThreadEvent::Joined(role)),
        Role::Detached => Some(ThreadEvent::Detached),
        Role::Disabled => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bytes_follow_role_order() {
        for raw in 0..=4u8 {
            assert_eq!(Role::from_raw(raw).status_byte(), raw);
        }
        assert_eq!(Role::from_raw(9), Role::Disabled);
    }

    #[test]
    fn attached_roles_report_joined() {
        assert_eq!(role_event(Role::Router), Some(ThreadEvent::Joined(Role::Router)));
        assert_eq!(role_event(Role::Detached), Some(ThreadEvent::Detached));
        assert_eq!(role_event(Role::Disabled), None);
        assert!(Role::Leader.is_attached());
        assert!(!Role::Detached.is_attached());
    }
}
