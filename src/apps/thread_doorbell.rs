//! BLE + Thread doorbell ("QPG Thread Doorbell").
//!
//! Rings come from the analog button, from a phone writing the ring
//! characteristic, or from another node's multicast. Every ring blinks the
//! ring LED and notifies the phone; only rings that did not arrive over
//! the mesh are multicast, so two doorbells never bounce a ring back and
//! forth.
//!
//! Thread is commissioned over BLE: the phone writes name, key, channel
//! and PAN ID, then writes 0x01 to the join characteristic. A dataset kept
//! in non-volatile storage from an earlier join is used directly at boot.

use crate::ble::gatt::{doorbell, thread_config, RING_ACTIVE};
use crate::ble::link::PeripheralLink;
use crate::config;
use crate::event::{AnalogEvent, AnalogState, AppEvent, BleEvent, ButtonAction, ButtonEvent, ThreadEvent};
use crate::hal::{BlePeripheral, Led, StatusLeds, SystemControl, ThreadStack};
use crate::queue::EventHandler;
use crate::thread::{ring, Credentials, RingSource, Role, ThreadParam};

/// PB1: commissioning button.
pub const MULTI_FUNC_BUTTON: u8 = 0;

/// White: BLE advertising / connected.
pub const BLE_LED: Led = Led(0);
/// Green: blinking while joining, solid when attached.
pub const THREAD_LED: Led = Led(1);
/// Blue: ring indication.
pub const RING_LED: Led = Led(2);

pub struct ThreadDoorbell<B> {
    board: B,
    link: PeripheralLink,
    credentials: Credentials,
    /// Set once the phone asked to join with its own parameters.
    credentials_from_ble: bool,
    socket_open: bool,
    role: Role,
    ring_count: u32,
}

impl<B> ThreadDoorbell<B>
where
    B: BlePeripheral + StatusLeds + ThreadStack + SystemControl,
{
    pub fn new(board: B) -> Self {
        Self {
            board,
            link: PeripheralLink::new(config::THREAD_DOORBELL_NAME, BLE_LED, config::ADV_BLINK.into()),
            credentials: Credentials::default(),
            credentials_from_ble: false,
            socket_open: false,
            role: Role::Disabled,
            ring_count: 0,
        }
    }

    /// Banner, advertising, and an immediate join when a dataset is stored.
    pub fn start(&mut self) {
        for led in [BLE_LED, THREAD_LED, RING_LED] {
            self.board.set(led, false);
        }

        info!("============================================");
        info!("   QPG6200 THREAD + BLE DOORBELL");
        info!("============================================");
        info!("  WHITE = BLE, GREEN = Thread, BLUE = ring");
        info!("  PB1 hold 2s = restart advertising");
        info!("  PB1 hold 5s = factory reset Thread");

        let _ = self.link.start_advertising(&mut self.board);

        if self.board.has_active_dataset() {
            info!("[Thread] Stored credentials found - joining");
            self.start_join();
        } else {
            info!("[Thread] No credentials - waiting for BLE commissioning");
        }
    }

    pub fn ring_count(&self) -> u32 {
        self.ring_count
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn socket_open(&self) -> bool {
        self.socket_open
    }

    pub fn link(&self) -> &PeripheralLink {
        &self.link
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// Ring from `source`: LED, phone notification, and a mesh multicast
    /// unless the ring came from the mesh.
    pub fn ring(&mut self, source: RingSource) {
        self.ring_count = self.ring_count.wrapping_add(1);
        info!("** DING DONG! ** Ring #{} from {}", self.ring_count, source.label());

        self.board.blink(RING_LED, config::BLE_RING_BLINK.into());

        if self.board.notify(doorbell::RING_HDL, &[RING_ACTIVE]).is_err() {
            debug!("[BLE] No phone subscribed - ring not notified");
        }

        if source.forwards_to_mesh() {
            self.multicast_ring();
        }
    }

    fn multicast_ring(&mut self) {
        if !self.socket_open {
            info!("[Thread] Ring multicast skipped - socket not open");
            return;
        }
        let role = self.board.role();
        if !role.is_attached() {
            info!("[Thread] Ring multicast skipped - not attached ({:?})", role);
            return;
        }

        match self.board.send_udp(config::RING_MULTICAST_ADDR, config::RING_UDP_PORT, &ring::encode()) {
            Ok(()) => info!("[Thread] Ring multicast sent (port {})", config::RING_UDP_PORT),
            Err(e) => warn!("[Thread] Ring multicast failed: {:?}", e),
        }
    }

    /// Apply the dataset (when commissioned over BLE), bring the interface
    /// up and open the ring socket.
    fn start_join(&mut self) {
        if self.credentials_from_ble {
            let dataset = self.credentials.to_dataset();
            if let Err(e) = self.board.set_active_dataset(&dataset) {
                error!("[Thread] Failed to set dataset: {:?}", e);
                return;
            }
            info!(
                "[Thread] Dataset set: {} ch {} pan {:#x}",
                dataset.network_name.as_str(),
                dataset.channel,
                dataset.pan_id
            );
        }

        if let Err(e) = self.board.enable() {
            error!("[Thread] Failed to enable Thread: {:?}", e);
            return;
        }
        info!("[Thread] Joining...");
        self.board.blink(THREAD_LED, config::THREAD_JOIN_BLINK.into());

        if !self.socket_open {
            match self.board.open_udp(config::RING_UDP_PORT) {
                Ok(()) => {
                    self.socket_open = true;
                    info!("[Thread] Ring socket open on port {}", config::RING_UDP_PORT);
                }
                Err(e) => warn!("[Thread] Ring socket failed: {:?}", e),
            }
        }
    }

    fn notify_status(&mut self) {
        let status = self.role.status_byte();
        if self.board.notify(thread_config::STATUS_HDL, &[status]).is_err() {
            debug!("[BLE] Thread status {} not notified", status);
        }
    }

    fn on_button(&mut self, event: ButtonEvent) {
        if event.index != MULTI_FUNC_BUTTON {
            return;
        }

        match event.action {
            ButtonAction::Released(held) if held >= config::HOLD_FACTORY_RESET_SECS => {
                info!("[BTN] Factory reset - clearing Thread credentials");
                self.board.factory_reset();
                self.board.reset();
            }
            ButtonAction::Released(held) if held >= config::HOLD_RESTART_ADV_SECS => {
                info!("[BTN] Restarting BLE advertising");
                let _ = self.link.start_advertising(&mut self.board);
            }
            ButtonAction::Held(secs) if secs == config::HOLD_RESTART_ADV_SECS => {
                info!("[BTN] Release now to restart BLE advertising");
            }
            ButtonAction::Held(secs) if secs == config::HOLD_FACTORY_RESET_SECS => {
                info!("[BTN] Release now to factory-reset Thread credentials!");
            }
            _ => {}
        }
    }

    fn on_analog(&mut self, event: AnalogEvent) {
        match event.state {
            AnalogState::Pressed => self.ring(RingSource::Local),
            AnalogState::Released => debug!("[ADC] released (raw={})", event.raw),
        }
    }

    fn on_thread(&mut self, event: ThreadEvent) {
        match event {
            ThreadEvent::Joined(role) => {
                info!("[Thread] Attached as {:?}", role);
                self.role = role;
                self.board.set(THREAD_LED, true);
                self.notify_status();
            }
            ThreadEvent::Detached => {
                info!("[Thread] Detached");
                self.role = Role::Detached;
                self.board.set(THREAD_LED, false);
                self.notify_status();
            }
            ThreadEvent::RingReceived => self.ring(RingSource::Thread),
            ThreadEvent::Error(code) => warn!("[Thread] Stack error {}", code),
        }
    }

    fn on_ble(&mut self, event: BleEvent) {
        if self.link.handle(&mut self.board, &event) {
            return;
        }

        match event {
            BleEvent::RingWrite(RING_ACTIVE) => self.ring(RingSource::Phone),
            BleEvent::RingWrite(_) => {
                info!("[BLE] Doorbell reset by phone");
                self.board.set(RING_LED, false);
            }
            BleEvent::ThreadParam(param) => self.on_param(param),
            BleEvent::JoinRequested => {
                info!("[BLE] Join requested by phone");
                self.credentials_from_ble = true;
                self.start_join();
            }
            BleEvent::NotificationsChanged { handle, enabled } => match handle {
                doorbell::RING_CCC_HDL => {
                    info!("[BLE] Ring notifications {}", if enabled { "enabled" } else { "disabled" });
                }
                thread_config::STATUS_CCC_HDL if enabled => {
                    info!("[BLE] Thread status notifications enabled");
                    self.notify_status();
                }
                _ => {}
            },
            other => debug!("[BLE] ignored {:?}", other),
        }
    }

    fn on_param(&mut self, param: ThreadParam) {
        // Refusals are logged inside `apply`.
        let _ = self.credentials.apply(param);
    }
}

impl<B> EventHandler for ThreadDoorbell<B>
where
    B: BlePeripheral + StatusLeds + ThreadStack + SystemControl,
{
    fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Button(ev) => self.on_button(ev),
            AppEvent::Analog(ev) => self.on_analog(ev),
            AppEvent::Thread(ev) => self.on_thread(ev),
            AppEvent::Ble(ev) => self.on_ble(ev),
            AppEvent::Timer(_) => {}
        }
    }
}
