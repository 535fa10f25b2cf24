//! Bounded event queue and the single-consumer dispatch loop.
//!
//! Producers call [`EventQueue::post`] from any context; the dispatch task
//! owns the application state and is the only caller of
//! [`EventQueue::dispatch`]. A full queue drops the event and logs, it
//! never blocks an interrupt.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use embedded_hal_async::delay::DelayNs;

use crate::error::Error;
use crate::event::AppEvent;

/// Where the caller of [`EventQueue::post`] is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExecContext {
    /// Thread mode: executor tasks and vendor scheduler callbacks.
    Task,
    /// Any exception or interrupt handler.
    Interrupt,
}

impl ExecContext {
    /// Context of the current caller. Host builds always report `Task`.
    pub fn current() -> Self {
        #[cfg(feature = "embedded")]
        {
            use cortex_m::peripheral::scb::VectActive;
            match cortex_m::peripheral::SCB::vect_active() {
                VectActive::ThreadMode => ExecContext::Task,
                _ => ExecContext::Interrupt,
            }
        }
        #[cfg(not(feature = "embedded"))]
        {
            ExecContext::Task
        }
    }
}

/// Consumer side of the queue: one application state machine.
pub trait EventHandler {
    /// Handle one event to completion.
    fn handle(&mut self, event: AppEvent);
}

/// Fixed-capacity FIFO of [`AppEvent`]s.
pub struct EventQueue<const N: usize> {
    channel: Channel<CriticalSectionRawMutex, AppEvent, N>,
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self { channel: Channel::new() }
    }

    /// Enqueue without blocking, choosing the path for the caller's context.
    ///
    /// Waking the dispatch task is left to the channel: an interrupt only
    /// pends the executor when the receiver was actually waiting.
    pub fn post(&self, event: AppEvent) -> Result<(), Error> {
        self.post_from(ExecContext::current(), event)
    }

    /// Same as [`post`](Self::post) with the context supplied by the caller.
    pub fn post_from(&self, ctx: ExecContext, event: AppEvent) -> Result<(), Error> {
        match self.channel.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                match ctx {
                    ExecContext::Interrupt => warn!("IRQ: failed to post event"),
                    ExecContext::Task => warn!("Failed to post event (queue full?)"),
                }
                Err(Error::QueueFull)
            }
        }
    }

    /// Task-context enqueue that waits up to `timeout_ms` for a free slot.
    ///
    /// Used by polling tasks; never call it from an interrupt handler.
    pub async fn post_within<D: DelayNs>(
        &self,
        event: AppEvent,
        delay: &mut D,
        timeout_ms: u32,
    ) -> Result<(), Error> {
        match select(self.channel.send(event), delay.delay_ms(timeout_ms)).await {
            Either::First(()) => Ok(()),
            Either::Second(()) => {
                warn!("Failed to post event (queue full?)");
                Err(Error::QueueFull)
            }
        }
    }

    /// Wait for the next event.
    pub async fn next(&self) -> AppEvent {
        self.channel.receive().await
    }

    pub fn try_next(&self) -> Option<AppEvent> {
        self.channel.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Hand every queued event to `handler`, oldest first. Returns how many
    /// were handled.
    pub fn dispatch_pending<H: EventHandler>(&self, handler: &mut H) -> usize {
        let mut handled = 0;
        while let Some(event) = self.try_next() {
            handler.handle(event);
            handled += 1;
        }
        handled
    }

    /// The dispatch loop: wait, handle to completion, repeat.
    pub async fn dispatch<H: EventHandler>(&self, handler: &mut H) -> ! {
        loop {
            let event = self.next().await;
            trace!("dispatch {:?}", event);
            handler.handle(event);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ButtonEvent, Expiry, TimerId};
    use embassy_futures::block_on;

    fn timer(id: TimerId) -> AppEvent {
        AppEvent::Timer(Expiry::new(id, 0))
    }

    struct Recorder(std::vec::Vec<AppEvent>);

    impl EventHandler for Recorder {
        fn handle(&mut self, event: AppEvent) {
            self.0.push(event);
        }
    }

    /// Delay that completes immediately.
    struct NoDelay;

    impl DelayNs for NoDelay {
        async fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn events_are_dispatched_in_post_order() {
        let queue: EventQueue<4> = EventQueue::new();
        queue.post(AppEvent::Button(ButtonEvent::pressed(0))).unwrap();
        queue.post(timer(TimerId::RingTick)).unwrap();
        queue.post(AppEvent::Button(ButtonEvent::released(0, 1))).unwrap();

        let mut rec = Recorder(std::vec::Vec::new());
        assert_eq!(queue.dispatch_pending(&mut rec), 3);
        assert_eq!(
            rec.0,
            [
                AppEvent::Button(ButtonEvent::pressed(0)),
                timer(TimerId::RingTick),
                AppEvent::Button(ButtonEvent::released(0, 1)),
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn full_queue_drops_and_reports() {
        let queue: EventQueue<2> = EventQueue::new();
        queue.post(timer(TimerId::RingTick)).unwrap();
        queue.post(timer(TimerId::AutoDismiss)).unwrap();

        let err = queue.post_from(ExecContext::Interrupt, timer(TimerId::Hello));
        assert_eq!(err, Err(Error::QueueFull));
        let err = queue.post_from(ExecContext::Task, timer(TimerId::Hello));
        assert_eq!(err, Err(Error::QueueFull));

        // The dropped event never shows up.
        assert_eq!(queue.try_next(), Some(timer(TimerId::RingTick)));
        assert_eq!(queue.try_next(), Some(timer(TimerId::AutoDismiss)));
        assert_eq!(queue.try_next(), None);
    }

    #[test]
    fn bounded_wait_gives_up_when_full() {
        let queue: EventQueue<1> = EventQueue::new();
        queue.post(timer(TimerId::RingTick)).unwrap();

        let res = block_on(queue.post_within(timer(TimerId::Hello), &mut NoDelay, 1));
        assert_eq!(res, Err(Error::QueueFull));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn bounded_wait_succeeds_with_room() {
        let queue: EventQueue<1> = EventQueue::new();
        let res = block_on(queue.post_within(timer(TimerId::Hello), &mut NoDelay, 1));
        assert_eq!(res, Ok(()));
        assert_eq!(block_on(queue.next()), timer(TimerId::Hello));
    }

    #[test]
    fn capacity_matches_configured_depth() {
        let queue: EventQueue<{ crate::config::EVENT_QUEUE_DEPTH }> = EventQueue::new();
        assert_eq!(queue.capacity(), 20);
        for _ in 0..20 {
            queue.post(timer(TimerId::Hello)).unwrap();
        }
        assert!(queue.post(timer(TimerId::Hello)).is_err());
    }
}
