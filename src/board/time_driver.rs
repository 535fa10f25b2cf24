//! embassy-time driver on the `gpSched` microsecond clock.
//!
//! The hardware counter is 32 bits wide; [`SchedDriver::now`] extends it
//! to 64 bits by counting wraps. An alarm is always armed at most
//! 2^31 µs ahead so a wrap is never missed, even with no timers pending.

use core::cell::{Cell, RefCell};
use core::task::Waker;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time_driver::Driver;
use embassy_time_queue_utils::Queue;

use super::ffi;

const MAX_ALARM_US: u64 = 0x7FFF_FFFF;

struct Extender {
    last: u32,
    wraps: u32,
}

pub struct SchedDriver {
    clock: Mutex<CriticalSectionRawMutex, Cell<Extender>>,
    queue: Mutex<CriticalSectionRawMutex, RefCell<Queue>>,
}

embassy_time_driver::time_driver_impl!(static DRIVER: SchedDriver = SchedDriver {
    clock: Mutex::new(Cell::new(Extender { last: 0, wraps: 0 })),
    queue: Mutex::new(RefCell::new(Queue::new())),
});

impl SchedDriver {
    fn raw_now() -> u32 {
        // SAFETY: read-only counter access.
        unsafe { ffi::gpSched_GetCurrentTime() }
    }

    /// Arm the alarm for `at`. Returns false if `at` already passed.
    fn set_alarm(&self, at: u64) -> bool {
        let now = self.now();
        if at <= now {
            return false;
        }
        let delay_us = (at - now).min(MAX_ALARM_US) as u32;
        // SAFETY: `on_alarm` is a static `extern "C" fn`.
        unsafe {
            while ffi::gpSched_UnscheduleEvent(on_alarm) {}
            ffi::gpSched_ScheduleEvent(delay_us, on_alarm);
        }
        true
    }

    fn rearm(&self, queue: &mut Queue) {
        let mut next = queue.next_expiration(self.now());
        while !self.set_alarm(next) {
            next = queue.next_expiration(self.now());
        }
    }

    fn on_alarm(&self) {
        self.queue.lock(|queue| self.rearm(&mut queue.borrow_mut()));
    }
}

impl Driver for SchedDriver {
    fn now(&self) -> u64 {
        self.clock.lock(|clock| {
            let raw = Self::raw_now();
            let mut ext = clock.replace(Extender { last: 0, wraps: 0 });
            if raw < ext.last {
                ext.wraps = ext.wraps.wrapping_add(1);
            }
            ext.last = raw;
            let now = (u64::from(ext.wraps) << 32) | u64::from(raw);
            clock.set(ext);
            now
        })
    }

    fn schedule_wake(&self, at: u64, waker: &Waker) {
        self.queue.lock(|queue| {
            let mut queue = queue.borrow_mut();
            if queue.schedule_wake(at, waker) {
                self.rearm(&mut queue);
            }
        });
    }
}

extern "C" fn on_alarm() {
    DRIVER.on_alarm();
}

/// Arm the wrap-keeping alarm. Call once after `gpSched` is initialised.
pub fn init() {
    DRIVER.on_alarm();
}
