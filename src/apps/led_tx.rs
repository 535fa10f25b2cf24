//! BLE central that finds the LED receiver by name, connects, and toggles
//! its LED every two seconds, mirroring the state on a local LED.

use crate::ble::gatt::led::REMOTE_CONTROL_HDL;
use crate::ble::ScanReport;
use crate::config;
use crate::error::BleError;
use crate::event::{AppEvent, BleEvent, Expiry, TimerId};
use crate::hal::{BleCentral, Led, Scheduler, StatusLeds};
use crate::queue::EventHandler;

/// Mirrors the remote LED.
pub const SYNC_LED: Led = Led(0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CentralState {
    Idle,
    Scanning,
    Connecting,
    Discovering,
    Ready,
}

pub struct LedTransmitter<B> {
    board: B,
    target: &'static str,
    state: CentralState,
    conn: Option<u16>,
    remote_on: bool,
    local_on: bool,
    /// Bumped on disconnect so a toggle queued for the old link is dropped.
    epoch: u16,
}

impl<B: BleCentral + Scheduler + StatusLeds> LedTransmitter<B> {
    pub fn new(board: B, target: &'static str) -> Self {
        Self {
            board,
            target,
            state: CentralState::Idle,
            conn: None,
            remote_on: false,
            local_on: false,
            epoch: 0,
        }
    }

    /// Give the stack time to come up, then scan.
    pub fn start(&mut self) {
        self.board.set(SYNC_LED, false);
        info!("[BLE] Central looking for '{}'", self.target);
        self.board.schedule(TimerId::Rescan, self.epoch, config::LEDTX_STARTUP_SCAN_DELAY_MS);
    }

    pub fn state(&self) -> CentralState {
        self.state
    }

    pub fn remote_on(&self) -> bool {
        self.remote_on
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// Write the remote LED. Refused unless discovery has completed.
    pub fn write_led(&mut self, on: bool) -> Result<(), BleError> {
        let conn = match (self.state, self.conn) {
            (CentralState::Ready, Some(conn)) => conn,
            _ => {
                warn!("[BLE] Not ready to write (state={:?})", self.state);
                return Err(BleError::NotConnected);
            }
        };
        info!("[BLE] Writing LED state: {}", on as u8);
        self.board.write(conn, REMOTE_CONTROL_HDL, &[on as u8])
    }

    fn scan(&mut self) {
        if self.state != CentralState::Idle {
            return;
        }
        info!("[BLE] Starting scan...");
        if let Err(e) = self.board.start_scanning() {
            warn!("[BLE] Scan failed to start: {:?}", e);
            self.board.schedule(TimerId::Rescan, self.epoch, config::LEDTX_RESCAN_DELAY_MS);
        }
    }

    fn on_report(&mut self, report: ScanReport) {
        if self.state != CentralState::Scanning {
            return;
        }
        match report.name.as_ref() {
            Some(name) => debug!("[BLE] Found device: {} (RSSI: {})", name.as_str(), report.rssi),
            None => debug!("[BLE] Found device: (unnamed) (RSSI: {})", report.rssi),
        }
        if !report.name_contains(self.target) {
            return;
        }

        info!("[BLE] *** TARGET DEVICE FOUND! ***");
        let _ = self.board.stop_scanning();
        match self.board.connect(&report.address) {
            Ok(()) => self.state = CentralState::Connecting,
            Err(e) => {
                warn!("[BLE] Connect failed: {:?}", e);
                self.state = CentralState::Idle;
                self.board.schedule(TimerId::Rescan, self.epoch, config::LEDTX_RESCAN_DELAY_MS);
            }
        }
    }

    fn toggle(&mut self) {
        if self.state != CentralState::Ready {
            return;
        }
        let on = !self.remote_on;
        if self.write_led(on).is_ok() {
            self.remote_on = on;
            info!("[BLE] Toggled remote LED to: {}", on as u8);
        }
        self.local_on = !self.local_on;
        self.board.set(SYNC_LED, self.local_on);
        self.board.schedule(TimerId::RemoteToggle, self.epoch, config::LEDTX_TOGGLE_MS);
    }

    fn on_ble(&mut self, event: BleEvent) {
        match event {
            BleEvent::ScanStarted => {
                info!("[BLE] Scanning started...");
                self.state = CentralState::Scanning;
            }
            BleEvent::ScanStopped => info!("[BLE] Scanning stopped"),
            BleEvent::DeviceFound(report) => self.on_report(report),
            BleEvent::Connected(conn) => {
                info!("[BLE] Connected to peripheral, discovering services...");
                self.conn = Some(conn);
                self.state = CentralState::Discovering;
                if let Err(e) = self.board.discover_services(conn) {
                    warn!("[BLE] Discovery failed to start: {:?}", e);
                }
            }
            BleEvent::DiscoveryComplete => {
                info!("[BLE] Service discovery complete!");
                self.state = CentralState::Ready;
                self.toggle();
            }
            BleEvent::Disconnected => {
                info!("[BLE] Disconnected from peripheral");
                self.state = CentralState::Idle;
                self.conn = None;
                self.epoch = self.epoch.wrapping_add(1);
                self.board.cancel(TimerId::RemoteToggle);
                self.board.schedule(TimerId::Rescan, self.epoch, config::LEDTX_RESCAN_DELAY_MS);
            }
            other => debug!("[BLE] ignored {:?}", other),
        }
    }
}

impl<B: BleCentral + Scheduler + StatusLeds> EventHandler for LedTransmitter<B> {
    fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Ble(ev) => self.on_ble(ev),
            AppEvent::Timer(Expiry { id: TimerId::Rescan, .. }) => self.scan(),
            AppEvent::Timer(Expiry { id: TimerId::RemoteToggle, epoch }) if epoch == self.epoch => {
                self.toggle()
            }
            _ => {}
        }
    }
}
