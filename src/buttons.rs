//! GPIO button input with debouncing and hold tracking.
//!
//! Each button is sampled by its own task. The [`ButtonTracker`] turns the
//! sampled level into Pressed, Held(n) once per whole second held, and
//! Released(n) carrying the total seconds held.

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

use crate::config;
use crate::event::{AppEvent, ButtonEvent};
use crate::queue::EventQueue;

/// Debounce and hold bookkeeping for one button.
#[derive(Debug)]
pub struct ButtonTracker {
    index: u8,
    debounce_ms: u32,
    /// Debounced level, `true` while down.
    down: bool,
    /// How long the raw level has disagreed with `down`.
    bounce_ms: u32,
    held_ms: u32,
    held_secs: u8,
}

impl ButtonTracker {
    pub const fn new(index: u8, debounce_ms: u32) -> Self {
        Self {
            index,
            debounce_ms,
            down: false,
            bounce_ms: 0,
            held_ms: 0,
            held_secs: 0,
        }
    }

    pub fn is_down(&self) -> bool {
        self.down
    }

    /// Feed the raw level observed `elapsed_ms` after the previous call.
    pub fn update(&mut self, raw_down: bool, elapsed_ms: u32) -> Option<ButtonEvent> {
        if raw_down == self.down {
            self.bounce_ms = 0;
        } else {
            self.bounce_ms = self.bounce_ms.saturating_add(elapsed_ms);
            if self.bounce_ms >= self.debounce_ms {
                self.bounce_ms = 0;
                self.down = raw_down;
                return Some(if raw_down {
                    self.held_ms = 0;
                    self.held_secs = 0;
                    ButtonEvent::pressed(self.index)
                } else {
                    ButtonEvent::released(self.index, self.held_secs)
                });
            }
        }

        if self.down {
            self.held_ms = self.held_ms.saturating_add(elapsed_ms);
            let secs = (self.held_ms / 1000).min(u32::from(u8::MAX)) as u8;
            if secs > self.held_secs {
                self.held_secs = secs;
                return Some(ButtonEvent::held(self.index, secs));
            }
        }
        None
    }
}

/// Sample one button forever and post its events.
///
/// `active_low` buttons read low while pressed (internal pull-up).
pub async fn button_task<P, D, const N: usize>(
    mut pin: P,
    index: u8,
    active_low: bool,
    mut delay: D,
    queue: &EventQueue<N>,
) -> !
where
    P: InputPin,
    D: DelayNs,
{
    let mut tracker = ButtonTracker::new(index, config::BUTTON_DEBOUNCE_MS);

    loop {
        if let Ok(high) = pin.is_high() {
            if let Some(event) = tracker.update(high != active_low, config::BUTTON_POLL_MS) {
                debug!("[BTN] {:?}", event);
                let _ = queue
                    .post_within(AppEvent::Button(event), &mut delay, config::EVENT_POST_TIMEOUT_MS)
                    .await;
            }
        }
        delay.delay_ms(config::BUTTON_POLL_MS).await;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
