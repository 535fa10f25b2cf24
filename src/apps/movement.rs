//! Ultrasonic movement detector (HC-SR04 style sensor).
//!
//! A 10 µs trigger pulse starts a measurement; the echo pin then stays
//! high for the round-trip time of the burst. Distance in cm is
//! `echo_us * 343 / 20000` (speed of sound 343 m/s, halved for the round
//! trip). Movement is reported when the distance changes by more than the
//! configured delta against the last reading that counted as movement.

use embedded_hal::delay::DelayNs as BusyDelay;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::config;
use crate::hal::Clock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MovementConfig {
    pub min_cm: u32,
    pub max_cm: u32,
    pub delta_cm: u32,
    pub echo_start_timeout_us: u32,
    pub echo_end_timeout_us: u32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            min_cm: config::SENSOR_MIN_DISTANCE_CM,
            max_cm: config::SENSOR_MAX_DISTANCE_CM,
            delta_cm: config::SENSOR_MOVEMENT_DELTA_CM,
            echo_start_timeout_us: config::SENSOR_ECHO_START_TIMEOUT_US,
            echo_end_timeout_us: config::SENSOR_ECHO_END_TIMEOUT_US,
        }
    }
}

/// Echo duration to distance in whole centimetres.
pub fn distance_cm(echo_us: u32) -> u32 {
    (u64::from(echo_us) * 343 / 20_000) as u32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    Movement { distance_cm: u32, previous_cm: u32 },
    NoMovement { distance_cm: u32 },
    OutOfRange { distance_cm: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EchoError {
    /// Echo never went high.
    NoEcho,
    /// Echo went high but did not come back down in time.
    StuckHigh,
    Pin,
}

pub struct MovementDetector {
    config: MovementConfig,
    previous_cm: u32,
}

impl MovementDetector {
    pub fn new(config: MovementConfig) -> Self {
        Self { config, previous_cm: 0 }
    }

    /// Reference distance for the next comparison.
    pub fn previous_cm(&self) -> u32 {
        self.previous_cm
    }

    pub fn classify(&mut self, distance_cm: u32) -> Reading {
        if distance_cm < self.config.min_cm || distance_cm > self.config.max_cm {
            return Reading::OutOfRange { distance_cm };
        }
        if distance_cm.abs_diff(self.previous_cm) > self.config.delta_cm {
            let previous_cm = self.previous_cm;
            self.previous_cm = distance_cm;
            Reading::Movement { distance_cm, previous_cm }
        } else {
            Reading::NoMovement { distance_cm }
        }
    }
}

/// Fire the trigger and time the echo pulse. Busy-waits on `clock`.
pub fn measure_echo<T, E, C, D>(
    trigger: &mut T,
    echo: &mut E,
    clock: &C,
    delay: &mut D,
    config: &MovementConfig,
) -> Result<u32, EchoError>
where
    T: OutputPin,
    E: InputPin,
    C: Clock,
    D: BusyDelay,
{
    trigger.set_low().map_err(|_| EchoError::Pin)?;
    delay.delay_us(2);
    trigger.set_high().map_err(|_| EchoError::Pin)?;
    delay.delay_us(config::SENSOR_TRIGGER_PULSE_US);
    trigger.set_low().map_err(|_| EchoError::Pin)?;

    let wait_start = clock.now_us();
    while echo.is_low().map_err(|_| EchoError::Pin)? {
        if clock.now_us().wrapping_sub(wait_start) >= config.echo_start_timeout_us {
            return Err(EchoError::NoEcho);
        }
    }

    let rise = clock.now_us();
    while echo.is_high().map_err(|_| EchoError::Pin)? {
        if clock.now_us().wrapping_sub(rise) >= config.echo_end_timeout_us {
            return Err(EchoError::StuckHigh);
        }
    }

    Ok(clock.now_us().wrapping_sub(rise))
}

/// Measure once per interval and log what the detector makes of it.
pub async fn sensor_task<T, E, C, BD, D>(
    mut trigger: T,
    mut echo: E,
    clock: C,
    mut busy: BD,
    mut delay: D,
    config: MovementConfig,
) -> !
where
    T: OutputPin,
    E: InputPin,
    C: Clock,
    BD: BusyDelay,
    D: DelayNs,
{
    let mut detector = MovementDetector::new(config);
    info!("[SENSOR] Movement detector started");

    loop {
        match measure_echo(&mut trigger, &mut echo, &clock, &mut busy, &config) {
            Ok(echo_us) => match detector.classify(distance_cm(echo_us)) {
                Reading::Movement { distance_cm, previous_cm } => {
                    info!("[SENSOR] MOVEMENT! {} cm (was {} cm)", distance_cm, previous_cm);
                }
                Reading::NoMovement { distance_cm } => debug!("[SENSOR] {} cm", distance_cm),
                Reading::OutOfRange { distance_cm } => {
                    debug!("[SENSOR] Out of range ({} cm)", distance_cm);
                }
            },
            Err(EchoError::NoEcho) => warn!("[SENSOR] Sensor timeout - no echo"),
            Err(EchoError::StuckHigh) => warn!("[SENSOR] Echo stuck high"),
            Err(EchoError::Pin) => error!("[SENSOR] Pin access failed"),
        }
        delay.delay_ms(config::SENSOR_INTERVAL_MS).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use std::rc::Rc;

    /// Time advances by `step` on every read.
    struct FakeClock {
        now: Rc<Cell<u32>>,
        step: u32,
    }

    impl Clock for FakeClock {
        fn now_us(&self) -> u32 {
            let t = self.now.get();
            self.now.set(t.wrapping_add(self.step));
            t
        }
    }

    /// High while the shared time is inside `[rise, fall)`, wrap-aware.
    struct FakeEcho {
        now: Rc<Cell<u32>>,
        rise: u32,
        fall: u32,
    }

    impl embedded_hal::digital::ErrorType for FakeEcho {
        type Error = Infallible;
    }

    impl InputPin for FakeEcho {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            let t = self.now.get();
            Ok(t.wrapping_sub(self.rise) < self.fall.wrapping_sub(self.rise))
        }
        fn is_low(&mut self) -> Result<bool, Infallible> {
            self.is_high().map(|h| !h)
        }
    }

    #[derive(Default)]
    struct FakeTrigger {
        pulses: u32,
        high: bool,
    }

    impl embedded_hal::digital::ErrorType for FakeTrigger {
        type Error = Infallible;
    }

    impl OutputPin for FakeTrigger {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            self.pulses += 1;
            Ok(())
        }
    }

    struct NoDelay;

    impl BusyDelay for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn run(start: u32, rise: u32, fall: u32) -> (Result<u32, EchoError>, FakeTrigger) {
        let now = Rc::new(Cell::new(start));
        let clock = FakeClock { now: now.clone(), step: 1 };
        let mut echo = FakeEcho { now, rise, fall };
        let mut trigger = FakeTrigger::default();
        let result = measure_echo(&mut trigger, &mut echo, &clock, &mut NoDelay, &MovementConfig::default());
        (result, trigger)
    }

    #[test]
    fn distance_conversion() {
        assert_eq!(distance_cm(0), 0);
        assert_eq!(distance_cm(583), 9);
        assert_eq!(distance_cm(5830), 99);
        assert_eq!(distance_cm(23_323), 399);
    }

    #[test]
    fn first_reading_in_range_is_movement() {
        let mut det = MovementDetector::new(MovementConfig::default());
        assert_eq!(det.classify(50), Reading::Movement { distance_cm: 50, previous_cm: 0 });
        assert_eq!(det.previous_cm(), 50);
    }

    #[test]
    fn small_changes_do_not_move_the_reference() {
        let mut det = MovementDetector::new(MovementConfig::default());
        det.classify(100);
        assert_eq!(det.classify(102), Reading::NoMovement { distance_cm: 102 });
        assert_eq!(det.classify(98), Reading::NoMovement { distance_cm: 98 });
        assert_eq!(det.previous_cm(), 100);
        assert_eq!(det.classify(97), Reading::Movement { distance_cm: 97, previous_cm: 100 });
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut det = MovementDetector::new(MovementConfig::default());
        assert_eq!(det.classify(1), Reading::OutOfRange { distance_cm: 1 });
        assert_eq!(det.classify(401), Reading::OutOfRange { distance_cm: 401 });
        assert_eq!(det.previous_cm(), 0);
        assert!(matches!(det.classify(2), Reading::NoMovement { .. }));
        assert!(matches!(det.classify(400), Reading::Movement { .. }));
    }

    #[test]
    fn echo_is_timed_from_rise_to_fall() {
        let (result, trigger) = run(0, 100, 683);
        let us = result.unwrap();
        // Polling granularity of one clock step on each side.
        assert!((582..=585).contains(&us), "got {us}");
        assert_eq!(trigger.pulses, 1);
        assert!(!trigger.high);
    }

    #[test]
    fn missing_echo_times_out() {
        let (result, _) = run(0, u32::MAX, u32::MAX);
        assert_eq!(result, Err(EchoError::NoEcho));
    }

    #[test]
    fn echo_stuck_high_times_out() {
        let (result, _) = run(0, 10, u32::MAX);
        assert_eq!(result, Err(EchoError::StuckHigh));
    }

    #[test]
    fn timing_survives_counter_wrap() {
        let start = u32::MAX - 50;
        let (result, _) = run(start, start + 20, 400);
        let us = result.unwrap();
        // rise at MAX-30, fall at 400 after wrap: 431 µs.
        assert!((429..=433).contains(&us), "got {us}");
    }
}
