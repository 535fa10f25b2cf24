//! Standalone doorbell: two buttons, two LEDs, no radio.
//!
//! Idle -> Ringing on the doorbell button (or [`Doorbell::ring`] from a
//! remote trigger); Ringing -> Idle on the dismiss button, or on its own
//! after 30 s. While ringing a reminder is logged every 2 s.
//!
//! Leaving Ringing cancels both timers and starts a new epoch. An expiry
//! that was already queued carries the old epoch and is dropped, so it can
//! neither dismiss a later ring nor start a second reminder chain.

use crate::config;
use crate::event::{AppEvent, ButtonAction, ButtonEvent, Expiry, TimerId};
use crate::hal::{Blink, Led, Scheduler, StatusLeds};
use crate::queue::EventHandler;

/// PB5.
pub const DOORBELL_BUTTON: u8 = 0;
/// PB1.
pub const DISMISS_BUTTON: u8 = 1;

/// White: heartbeat when idle, fast blink when ringing.
pub const STATUS_LED: Led = Led(0);
/// Green: on when ready for a ring.
pub const READY_LED: Led = Led(1);

/// What the doorbell button does while already ringing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SecondPress {
    /// Count another ring; timers keep running.
    RingAgain,
    /// Same as the dismiss button.
    Dismiss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoorbellConfig {
    pub second_press: SecondPress,
    pub ring_tick_ms: u32,
    pub auto_dismiss_ms: u32,
}

impl Default for DoorbellConfig {
    fn default() -> Self {
        Self {
            second_press: SecondPress::RingAgain,
            ring_tick_ms: config::RING_TICK_MS,
            auto_dismiss_ms: config::AUTO_DISMISS_MS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DoorbellState {
    Idle,
    Ringing,
}

pub struct Doorbell<B> {
    board: B,
    config: DoorbellConfig,
    state: DoorbellState,
    /// Rings since boot, including repeats while ringing.
    ring_count: u32,
    /// Bumped on every Idle/Ringing transition; timers carry it.
    epoch: u16,
}

impl<B: StatusLeds + Scheduler> Doorbell<B> {
    pub fn new(board: B, config: DoorbellConfig) -> Self {
        Self {
            board,
            config,
            state: DoorbellState::Idle,
            ring_count: 0,
            epoch: 0,
        }
    }

    /// Show the idle LED pattern and print the banner.
    pub fn start(&mut self) {
        self.show_idle();

        info!("========================================");
        info!("  QPG6200 STANDALONE DOORBELL DEMO");
        info!("========================================");
        info!("  WHITE slow flash = idle / waiting");
        info!("  WHITE fast blink = RINGING!");
        info!("  GREEN ON         = ready for a ring");
        info!("  PB5 = ring, PB1 = dismiss");
    }

    pub fn state(&self) -> DoorbellState {
        self.state
    }

    pub fn ring_count(&self) -> u32 {
        self.ring_count
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// Start ringing, or count another ring if already ringing.
    pub fn ring(&mut self) {
        self.ring_count = self.ring_count.wrapping_add(1);

        if self.state == DoorbellState::Ringing {
            info!("** DING DONG! ** (Ring #{} - pressed again!)", self.ring_count);
            return;
        }

        self.state = DoorbellState::Ringing;
        self.epoch = self.epoch.wrapping_add(1);
        self.board.blink(STATUS_LED, config::DOORBELL_RING_BLINK.into());
        self.board.set(READY_LED, false);

        info!("========================================");
        info!("  ** DING DONG! **  Doorbell Ring #{}", self.ring_count);
        info!("  Press PB5 or PB1 to dismiss.");
        info!("  Auto-dismiss in {} seconds.", self.config.auto_dismiss_ms / 1000);
        info!("========================================");

        self.board.schedule(TimerId::RingTick, self.epoch, self.config.ring_tick_ms);
        self.board.schedule(TimerId::AutoDismiss, self.epoch, self.config.auto_dismiss_ms);
    }

    /// Back to idle. No-op when already idle.
    pub fn dismiss(&mut self) {
        if self.state == DoorbellState::Idle {
            return;
        }
        self.state = DoorbellState::Idle;
        self.epoch = self.epoch.wrapping_add(1);

        self.board.cancel(TimerId::RingTick);
        self.board.cancel(TimerId::AutoDismiss);
        self.show_idle();

        info!("----------------------------------------");
        info!("  Doorbell dismissed.");
        info!("  Total rings so far: {}", self.ring_count);
        info!("----------------------------------------");
    }

    fn show_idle(&mut self) {
        let (on, off) = config::HEARTBEAT_BLINK;
        self.board.blink(STATUS_LED, Blink::new(on, off));
        self.board.set(READY_LED, true);
    }

    fn on_button(&mut self, event: ButtonEvent) {
        if event.action != ButtonAction::Pressed {
            return;
        }

        match event.index {
            DOORBELL_BUTTON => match (self.state, self.config.second_press) {
                (DoorbellState::Idle, _) => {
                    info!("[BTN] PB5 pressed - ringing!");
                    self.ring();
                }
                (DoorbellState::Ringing, SecondPress::RingAgain) => self.ring(),
                (DoorbellState::Ringing, SecondPress::Dismiss) => {
                    info!("[BTN] PB5 pressed - dismissing");
                    self.dismiss();
                }
            },
            DISMISS_BUTTON => {
                if self.state == DoorbellState::Ringing {
                    info!("[BTN] PB1 pressed - dismissing");
                    self.dismiss();
                } else {
                    info!("[BTN] PB1 pressed - already idle");
                }
            }
            other => debug!("[BTN] unmapped button {}", other),
        }
    }

    fn on_timer(&mut self, expiry: Expiry) {
        if self.state != DoorbellState::Ringing || expiry.epoch != self.epoch {
            debug!("[TMR] stale {:?} dropped", expiry.id);
            return;
        }
        match expiry.id {
            TimerId::RingTick => self.on_ring_tick(),
            TimerId::AutoDismiss => self.on_auto_dismiss(),
            _ => {}
        }
    }

    fn on_ring_tick(&mut self) {
        info!("** DING DONG! ** (Ring #{}) Press PB1 to dismiss.", self.ring_count);
        self.board.schedule(TimerId::RingTick, self.epoch, self.config.ring_tick_ms);
    }

    fn on_auto_dismiss(&mut self) {
        info!("Auto-dismiss: no response after {} seconds.", self.config.auto_dismiss_ms / 1000);
        self.dismiss();
    }
}

impl<B: StatusLeds + Scheduler> EventHandler for Doorbell<B> {
    fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Button(ev) => self.on_button(ev),
            AppEvent::Timer(expiry) => self.on_timer(expiry),
            _ => {}
        }
    }
}
