//! Repeating timers behind a small trait.
//!
//! The reveal logic never sleeps or spawns on its own. It asks a
//! [`Scheduler`] for a repeating tick and keeps the returned [`TickHandle`];
//! dropping or cancelling that handle stops the timer, so every exit path
//! releases it.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

pub type TickCallback = Box<dyn FnMut() + Send + 'static>;

pub trait Scheduler: Send + Sync {
    /// Invoke `tick` every `interval` until the returned handle is cancelled
    /// or dropped. The first invocation happens one interval after scheduling.
    fn schedule(&self, interval: Duration, tick: TickCallback) -> TickHandle;
}

/// Owner of a scheduled timer.
#[derive(Debug)]
pub struct TickHandle {
    token: CancellationToken,
}

impl TickHandle {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Runs each timer as a Tokio task. Must be used from within a runtime.
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, interval: Duration, mut tick: TickCallback) -> TickHandle {
        let token = CancellationToken::new();
        let task_token = token.clone();
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => tick(),
                }
            }
        });
        TickHandle::new(token)
    }
}

struct ManualTimer {
    token: CancellationToken,
    interval: Duration,
    tick: TickCallback,
}

/// A scheduler whose timers only fire when [`ManualScheduler::fire`] is
/// called. Suits hosts that own their clock, and tests.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    timers: Arc<Mutex<Vec<ManualTimer>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every live timer once. Returns how many fired.
    pub fn fire(&self) -> usize {
        let mut timers = self.lock();
        timers.retain(|timer| !timer.token.is_cancelled());
        for timer in timers.iter_mut() {
            (timer.tick)();
        }
        timers.len()
    }

    /// Number of timers that have not been cancelled.
    pub fn active_timers(&self) -> usize {
        self.lock()
            .iter()
            .filter(|timer| !timer.token.is_cancelled())
            .count()
    }

    /// Intervals of the live timers, in scheduling order.
    pub fn intervals(&self) -> Vec<Duration> {
        self.lock()
            .iter()
            .filter(|timer| !timer.token.is_cancelled())
            .map(|timer| timer.interval)
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ManualTimer>> {
        // A panicking tick cannot leave the timer list half-updated.
        self.timers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, interval: Duration, tick: TickCallback) -> TickHandle {
        let token = CancellationToken::new();
        self.lock().push(ManualTimer {
            token: token.clone(),
            interval,
            tick,
        });
        TickHandle::new(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, TickCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let tick_count = Arc::clone(&count);
        let tick: TickCallback = Box::new(move || {
            tick_count.fetch_add(1, Ordering::SeqCst);
        });
        (count, tick)
    }

    #[test]
    fn manual_timers_fire_until_cancelled() {
        let scheduler = ManualScheduler::new();
        let (count, tick) = counter();
        let handle = scheduler.schedule(Duration::from_millis(50), tick);

        assert_eq!(scheduler.fire(), 1);
        assert_eq!(scheduler.fire(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.intervals(), vec![Duration::from_millis(50)]);

        handle.cancel();
        assert_eq!(scheduler.fire(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn dropping_handle_releases_timer() {
        let scheduler = ManualScheduler::new();
        let (count, tick) = counter();
        let handle = scheduler.schedule(Duration::from_millis(10), tick);
        assert_eq!(scheduler.active_timers(), 1);

        drop(handle);
        assert_eq!(scheduler.active_timers(), 0);
        scheduler.fire();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_timer_ticks_on_interval_and_stops_on_cancel() {
        let (count, tick) = counter();
        let handle = TokioScheduler.schedule(Duration::from_millis(50), tick);

        tokio::time::sleep(Duration::from_millis(175)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        handle.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
