//! Analog doorbell button: hysteresis plus consecutive-sample debounce.
//!
//! The button pulls an ADC input to VCC when pressed. A press is reported
//! once `count` consecutive samples sit above `press_mv`; a release once
//! `count` consecutive samples sit below `release_mv`. Any sample that does
//! not confirm the pending transition resets the counter.

use embedded_hal_async::delay::DelayNs;

use crate::config;
use crate::event::{AnalogEvent, AnalogState, AppEvent};
use crate::hal::AdcChannel;
use crate::queue::EventQueue;

/// Hand-tuned thresholds for the analog button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceConfig {
    pub press_mv: u32,
    pub release_mv: u32,
    /// Consecutive confirming samples required (0 behaves like 1).
    pub count: u8,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            press_mv: config::ADC_PRESS_MV,
            release_mv: config::ADC_RELEASE_MV,
            count: config::ADC_DEBOUNCE_COUNT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    WaitingForPress,
    WaitingForRelease,
}

/// Debounce state machine, fed one millivolt sample at a time.
#[derive(Debug)]
pub struct AnalogButton {
    config: DebounceConfig,
    state: DebounceState,
    count: u8,
}

impl AnalogButton {
    pub const fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            state: DebounceState::WaitingForPress,
            count: 0,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn is_pressed(&self) -> bool {
        self.state == DebounceState::WaitingForRelease
    }

    /// Confirming samples seen so far for the pending transition.
    pub fn debounce_count(&self) -> u8 {
        self.count
    }

    /// Feed one sample; returns the transition it confirmed, if any.
    pub fn sample(&mut self, millivolts: u32, raw: u16) -> Option<AnalogEvent> {
        let confirming = match self.state {
            DebounceState::WaitingForPress => millivolts > self.config.press_mv,
            DebounceState::WaitingForRelease => millivolts < self.config.release_mv,
        };

        if !confirming {
            self.count = 0;
            return None;
        }

        self.count = self.count.saturating_add(1);
        if self.count < self.config.count.max(1) {
            return None;
        }
        self.count = 0;

        let state = match self.state {
            DebounceState::WaitingForPress => {
                self.state = DebounceState::WaitingForRelease;
                info!("[ADC] Doorbell PRESSED  ({} mV, raw={})", millivolts, raw);
                AnalogState::Pressed
            }
            DebounceState::WaitingForRelease => {
                self.state = DebounceState::WaitingForPress;
                info!("[ADC] Doorbell RELEASED ({} mV, raw={})", millivolts, raw);
                AnalogState::Released
            }
        };
        Some(AnalogEvent { state, raw })
    }
}

/// Convert a raw GPADC count to millivolts.
pub fn raw_to_millivolts(raw: u16) -> u32 {
    let max = (1u32 << config::ADC_RESOLUTION_BITS) - 1;
    let raw = u32::from(raw).min(max);
    raw * config::ADC_FULL_SCALE_MV / max
}

/// Poll `adc` forever, posting debounced transitions to `queue`.
pub async fn poll_task<A, D, const N: usize>(
    mut adc: A,
    mut delay: D,
    debounce: DebounceConfig,
    queue: &EventQueue<N>,
) -> !
where
    A: AdcChannel,
    D: DelayNs,
{
    info!("[ADC] Press threshold : {} mV", debounce.press_mv);
    info!("[ADC] Release threshold: {} mV", debounce.release_mv);

    let mut button = AnalogButton::new(debounce);
    loop {
        match adc.read_raw() {
            Ok(raw) => {
                if let Some(event) = button.sample(raw_to_millivolts(raw), raw) {
                    let _ = queue
                        .post_within(AppEvent::Analog(event), &mut delay, config::EVENT_POST_TIMEOUT_MS)
                        .await;
                }
            }
            Err(e) => debug!("[ADC] read failed: {:?}", e),
        }
        delay.delay_ms(config::ADC_POLL_MS).await;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const HIGH: u32 = 3000;
    const LOW: u32 = 100;
    const MID: u32 = 1000;

    fn feed(button: &mut AnalogButton, samples: &[u32]) -> std::vec::Vec<AnalogState> {
        samples
            .iter()
            .filter_map(|&mv| button.sample(mv, 0))
            .map(|ev| ev.state)
            .collect()
    }

    #[test]
    fn one_sample_short_of_count_is_ignored() {
        let mut button = AnalogButton::new(DebounceConfig::default());
        let n = config::ADC_DEBOUNCE_COUNT as usize;

        let mut samples = std::vec![HIGH; n - 1];
        samples.push(LOW);
        assert!(feed(&mut button, &samples).is_empty());
        assert!(!button.is_pressed());
        assert_eq!(button.debounce_count(), 0);
    }

    #[test]
    fn exactly_count_samples_press_once() {
        let mut button = AnalogButton::new(DebounceConfig::default());
        let n = config::ADC_DEBOUNCE_COUNT as usize;

        assert_eq!(feed(&mut button, &std::vec![HIGH; n]), [AnalogState::Pressed]);
        assert_eq!(button.debounce_count(), 0);
        assert!(button.is_pressed());

        // Staying high does not re-trigger.
        assert!(feed(&mut button, &std::vec![HIGH; 10]).is_empty());
    }

    #[test]
    fn release_needs_its_own_run_below_lower_threshold() {
        let mut button = AnalogButton::new(DebounceConfig::default());
        feed(&mut button, &[HIGH, HIGH, HIGH]);

        // Between thresholds neither confirms nor releases.
        assert!(feed(&mut button, &[MID, MID, MID, MID]).is_empty());
        assert!(button.is_pressed());

        assert!(feed(&mut button, &[LOW, LOW, MID, LOW, LOW]).is_empty());
        assert_eq!(feed(&mut button, &[LOW]), [AnalogState::Released]);
        assert_eq!(button.state(), DebounceState::WaitingForPress);
    }

    #[test]
    fn noisy_press_resets_counter() {
        let mut button = AnalogButton::new(DebounceConfig::default());
        assert!(feed(&mut button, &[HIGH, HIGH, MID, HIGH, HIGH]).is_empty());
        assert_eq!(button.debounce_count(), 2);
        assert_eq!(feed(&mut button, &[HIGH]), [AnalogState::Pressed]);
    }

    #[test]
    fn thresholds_are_exclusive() {
        let mut button = AnalogButton::new(DebounceConfig { press_mv: 1500, release_mv: 500, count: 1 });
        assert!(button.sample(1500, 0).is_none());
        assert!(button.sample(1501, 0).is_some());
        assert!(button.sample(500, 0).is_none());
        assert!(button.sample(499, 0).is_some());
    }

    #[test]
    fn zero_count_acts_like_one() {
        let mut button = AnalogButton::new(DebounceConfig { count: 0, ..DebounceConfig::default() });
        assert_eq!(feed(&mut button, &[HIGH]), [AnalogState::Pressed]);
    }

    #[test]
    fn event_carries_confirming_raw_sample() {
        let mut button = AnalogButton::new(DebounceConfig::default());
        button.sample(HIGH, 10);
        button.sample(HIGH, 11);
        let ev = button.sample(HIGH, 1800).unwrap();
        assert_eq!(ev, AnalogEvent { state: AnalogState::Pressed, raw: 1800 });
    }

    #[test]
    fn raw_conversion_spans_full_scale() {
        assert_eq!(raw_to_millivolts(0), 0);
        assert_eq!(raw_to_millivolts(2047), 3600);
        assert_eq!(raw_to_millivolts(u16::MAX), 3600);
        // ~1500 mV press threshold sits near raw 853.
        assert!(raw_to_millivolts(853) >= 1499 && raw_to_millivolts(853) <= 1501);
    }
}
