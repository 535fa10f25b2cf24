//! Recording board for driving the applications on the host.

#![allow(dead_code)]

use std::net::Ipv6Addr;

use qpg_demos::ble::PeerAddress;
use qpg_demos::error::{BleError, ThreadError};
use qpg_demos::event::{AppEvent, Expiry, TimerId};
use qpg_demos::hal::{
    Blink, BleCentral, BlePeripheral, Led, Scheduler, StatusLeds, SystemControl, ThreadStack,
};
use qpg_demos::thread::{Dataset, Role};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Led(Led, bool),
    Blink(Led, Blink),
    Schedule(TimerId, u32),
    Cancel(TimerId),
    Advertise,
    Notify(u16, Vec<u8>),
    StartScan,
    StopScan,
    Connect(PeerAddress),
    Discover(u16),
    Write(u16, u16, Vec<u8>),
    SetDataset(Dataset),
    EnableThread,
    OpenUdp(u16),
    SendUdp(Ipv6Addr, u16, Vec<u8>),
    FactoryReset,
    Reset,
}

pub struct MockBoard {
    pub calls: Vec<Call>,
    pub advertise_result: Result<(), BleError>,
    pub notify_result: Result<(), BleError>,
    pub connect_result: Result<(), BleError>,
    pub stored_dataset: bool,
    pub role: Role,
    pub enable_result: Result<(), ThreadError>,
    /// Epoch of the latest `schedule` per timer.
    pub epochs: [u16; TimerId::ALL.len()],
}

impl Default for MockBoard {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            advertise_result: Ok(()),
            notify_result: Ok(()),
            connect_result: Ok(()),
            stored_dataset: false,
            role: Role::Disabled,
            enable_result: Ok(()),
            epochs: [0; TimerId::ALL.len()],
        }
    }
}

impl MockBoard {
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn has(&self, call: &Call) -> bool {
        self.calls.contains(call)
    }

    /// Last solid or blink command for `led`.
    pub fn last_led(&self, led: Led) -> Option<&Call> {
        self.calls.iter().rev().find(|c| match c {
            Call::Led(l, _) | Call::Blink(l, _) => *l == led,
            _ => false,
        })
    }

    /// The event the most recent `schedule` of `id` would deliver.
    pub fn expiry(&self, id: TimerId) -> AppEvent {
        AppEvent::Timer(Expiry::new(id, self.epochs[id.index()]))
    }

    pub fn udp_sends(&self) -> usize {
        self.count(|c| matches!(c, Call::SendUdp(..)))
    }
}

impl StatusLeds for MockBoard {
    fn set(&mut self, led: Led, on: bool) {
        self.calls.push(Call::Led(led, on));
    }

    fn blink(&mut self, led: Led, pattern: Blink) {
        self.calls.push(Call::Blink(led, pattern));
    }
}

impl Scheduler for MockBoard {
    fn schedule(&mut self, id: TimerId, epoch: u16, after_ms: u32) {
        self.epochs[id.index()] = epoch;
        self.calls.push(Call::Schedule(id, after_ms));
    }

    fn cancel(&mut self, id: TimerId) {
        self.calls.push(Call::Cancel(id));
    }
}

impl BlePeripheral for MockBoard {
    fn start_advertising(&mut self) -> Result<(), BleError> {
        self.calls.push(Call::Advertise);
        self.advertise_result
    }

    fn notify(&mut self, handle: u16, value: &[u8]) -> Result<(), BleError> {
        self.calls.push(Call::Notify(handle, value.to_vec()));
        self.notify_result
    }
}

impl BleCentral for MockBoard {
    fn start_scanning(&mut self) -> Result<(), BleError> {
        self.calls.push(Call::StartScan);
        Ok(())
    }

    fn stop_scanning(&mut self) -> Result<(), BleError> {
        self.calls.push(Call::StopScan);
        Ok(())
    }

    fn connect(&mut self, peer: &PeerAddress) -> Result<(), BleError> {
        self.calls.push(Call::Connect(*peer));
        self.connect_result
    }

    fn discover_services(&mut self, conn: u16) -> Result<(), BleError> {
        self.calls.push(Call::Discover(conn));
        Ok(())
    }

    fn write(&mut self, conn: u16, handle: u16, value: &[u8]) -> Result<(), BleError> {
        self.calls.push(Call::Write(conn, handle, value.to_vec()));
        Ok(())
    }
}

impl ThreadStack for MockBoard {
    fn has_active_dataset(&mut self) -> bool {
        self.stored_dataset
    }

    fn set_active_dataset(&mut self, dataset: &Dataset) -> Result<(), ThreadError> {
        self.calls.push(Call::SetDataset(dataset.clone()));
        Ok(())
    }

    fn enable(&mut self) -> Result<(), ThreadError> {
        self.calls.push(Call::EnableThread);
        self.enable_result
    }

    fn role(&mut self) -> Role {
        self.role
    }

    fn open_udp(&mut self, port: u16) -> Result<(), ThreadError> {
        self.calls.push(Call::OpenUdp(port));
        Ok(())
    }

    fn send_udp(&mut self, addr: Ipv6Addr, port: u16, payload: &[u8]) -> Result<(), ThreadError> {
        self.calls.push(Call::SendUdp(addr, port, payload.to_vec()));
        Ok(())
    }

    fn factory_reset(&mut self) {
        self.calls.push(Call::FactoryReset);
    }
}

impl SystemControl for MockBoard {
    fn reset(&mut self) {
        self.calls.push(Call::Reset);
    }
}
