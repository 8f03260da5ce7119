//! Day clock: minutes left until the end of the local day.
//!
//! The reading is recomputed from the wall clock on every tick rather than
//! counted down, so a late or skipped tick never accumulates drift.
//!
//! ## Usage
//!
//! ```ignore
//! let _rt = runtime.enter();
//! let mut ticker = ClockTicker::spawn(SystemClock, Duration::from_secs(60));
//! // In the UI loop:
//! if let Some(reading) = ticker.try_latest() { /* redraw */ }
//! // Dropping the ticker aborts the background task.
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_TICK: Duration = Duration::from_secs(60);

/// Source of "now" in local time.
pub trait ClockSource {
    fn now(&self) -> DateTime<Local>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Local>>>,
}

impl ManualClock {
    pub fn new(at: DateTime<Local>) -> Self {
        Self {
            now: Arc::new(Mutex::new(at)),
        }
    }

    pub fn set(&self, at: DateTime<Local>) {
        if let Ok(mut now) = self.now.lock() {
            *now = at;
        }
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> DateTime<Local> {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// One computed value of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockReading {
    pub remaining_minutes: i64,
    pub at: DateTime<Local>,
}

impl ClockReading {
    pub fn from_source(clock: &impl ClockSource) -> Self {
        let at = clock.now();
        Self {
            remaining_minutes: minutes_remaining_at(&at),
            at,
        }
    }
}

/// Whole minutes between `now` and 23:59:59.000 of the same local date.
///
/// Uses floor division, so the last second of the day yields -1.
pub fn minutes_remaining_at<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    let end_naive = now
        .date_naive()
        .and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| now.naive_local());
    let diff_ms = match now.timezone().from_local_datetime(&end_naive).earliest() {
        Some(end) => end.signed_duration_since(now.clone()).num_milliseconds(),
        // 23:59:59 skipped by a zone transition; fall back to wall-clock arithmetic.
        None => (end_naive - now.naive_local()).num_milliseconds(),
    };
    diff_ms.div_euclid(60_000)
}

/// Periodic clock task bound to the lifetime of its owner.
///
/// Emits a reading immediately and then once per period. The background
/// task is aborted by [`ClockTicker::shutdown`] or when the ticker drops.
#[derive(Debug)]
pub struct ClockTicker {
    rx: mpsc::UnboundedReceiver<ClockReading>,
    handle: JoinHandle<()>,
}

impl ClockTicker {
    /// Spawn on the ambient tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime context.
    pub fn spawn<C>(clock: C, period: Duration) -> Self
    where
        C: ClockSource + Send + 'static,
    {
        Self::spawn_on(&tokio::runtime::Handle::current(), clock, period)
    }

    pub fn spawn_on<C>(runtime: &tokio::runtime::Handle, clock: C, period: Duration) -> Self
    where
        C: ClockSource + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let period = period.max(Duration::from_secs(1));
        let handle = runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let reading = ClockReading::from_source(&clock);
                tracing::trace!(remaining = reading.remaining_minutes, "clock tick");
                if tx.send(reading).is_err() {
                    break;
                }
            }
        });
        tracing::debug!(period_secs = period.as_secs(), "clock ticker started");
        Self { rx, handle }
    }

    /// Wait for the next reading. `None` once the ticker has stopped.
    pub async fn recv(&mut self) -> Option<ClockReading> {
        self.rx.recv().await
    }

    /// Drain pending readings without blocking, returning the newest.
    pub fn try_latest(&mut self) -> Option<ClockReading> {
        let mut latest = None;
        while let Ok(reading) = self.rx.try_recv() {
            latest = Some(reading);
        }
        latest
    }

    pub fn shutdown(&mut self) {
        if !self.handle.is_finished() {
            self.handle.abort();
            tracing::debug!("clock ticker stopped");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
