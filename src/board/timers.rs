//! Application timers on `gpSched`.
//!
//! `gpSched` identifies an event by its callback, so every [`TimerId`] gets
//! its own trampoline. Expiry posts `AppEvent::Timer` with the epoch stored
//! when the timer was armed; the handler runs later on the dispatch task.

use core::sync::atomic::{AtomicU16, Ordering};

use super::{ffi, EVENTS};
use crate::event::{AppEvent, Expiry, TimerId};

/// Epoch of the most recent `schedule` per timer.
static EPOCHS: [AtomicU16; TimerId::ALL.len()] = [const { AtomicU16::new(0) }; TimerId::ALL.len()];

fn post_expiry(id: TimerId) {
    let epoch = EPOCHS[id.index()].load(Ordering::Relaxed);
    let _ = EVENTS.post(AppEvent::Timer(Expiry::new(id, epoch)));
}

macro_rules! trampolines {
    ($($name:ident => $id:ident),* $(,)?) => {
        $(
            extern "C" fn $name() {
                post_expiry(TimerId::$id);
            }
        )*

        fn callback(id: TimerId) -> ffi::SchedCallback {
            match id {
                $(TimerId::$id => $name,)*
            }
        }
    };
}

trampolines! {
    on_ring_tick => RingTick,
    on_auto_dismiss => AutoDismiss,
    on_remote_toggle => RemoteToggle,
    on_rescan => Rescan,
    on_blink_toggle => BlinkToggle,
    on_hello => Hello,
}

pub fn schedule(id: TimerId, epoch: u16, after_ms: u32) {
    EPOCHS[id.index()].store(epoch, Ordering::Relaxed);
    let after_us = after_ms.saturating_mul(1_000);
    // SAFETY: the callback is a plain `extern "C" fn` with static lifetime.
    unsafe { ffi::gpSched_ScheduleEvent(after_us, callback(id)) };
}

/// Unschedules every pending expiry of `id`.
pub fn cancel(id: TimerId) {
    // SAFETY: see `schedule`.
    while unsafe { ffi::gpSched_UnscheduleEvent(callback(id)) } {}
}
