use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use sift::{ConfigError, DebounceState, Debouncer, DebouncerOptions, SettleCallback};
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub(crate) struct Shared<T> {
    debouncer: Mutex<Debouncer<T>>,
    on_settle: Option<SettleCallback<T>>,
    origin: Instant,
}

impl<T> Shared<T> {
    fn ms_at(&self, instant: Instant) -> u64 {
        u64::try_from(instant.duration_since(self.origin).as_millis()).unwrap_or(u64::MAX)
    }

    fn fire(&self) {
        let now_ms = self.ms_at(Instant::now());
        if let Some(value) = self.settle(now_ms) {
            self.deliver(value);
        }
    }

    /// Takes the pending value if it is due.
    ///
    /// A timer that lost a race with a newer submit finds the deadline still ahead.
    pub(crate) fn settle(&self, now_ms: u64) -> Option<T> {
        let settled = self.debouncer.lock().tick(now_ms);
        if settled.is_some() {
            atrace!(now_ms, "TimedDebouncer settled");
        }
        settled
    }

    /// Runs the callback outside the lock, unless `dispose` ran after the value settled.
    pub(crate) fn deliver(&self, value: T) {
        if self.debouncer.lock().is_disposed() {
            adebug!("TimedDebouncer disposed before delivery; dropping settled value");
            return;
        }
        if let Some(cb) = &self.on_settle {
            cb(&value);
        }
    }
}

/// A [`Debouncer`] driven by the tokio timer instead of an adapter clock.
///
/// Each `submit` aborts the previous timer task and spawns one that sleeps until the new
/// deadline. The settle callback runs on that task, outside the internal lock, so it may call
/// back into other state freely.
///
/// Dropping the handle (or calling `dispose`) cancels any pending value: the callback never starts
/// after `dispose` returns. A callback already running on another worker thread finishes.
///
/// `submit` must be called from within a tokio runtime.
pub struct TimedDebouncer<T> {
    pub(crate) shared: Arc<Shared<T>>,
    timer: Option<JoinHandle<()>>,
    deadline: Option<Instant>,
}

impl<T: Send + 'static> TimedDebouncer<T> {
    pub fn new(
        quiet_period_ms: f64,
        on_settle: impl Fn(&T) + Send + Sync + 'static,
    ) -> Result<Self, ConfigError> {
        Self::from_options(DebouncerOptions::new(quiet_period_ms).with_on_settle(on_settle))
    }

    pub fn from_options(mut options: DebouncerOptions<T>) -> Result<Self, ConfigError> {
        let on_settle = options.on_settle.take();
        let debouncer = Debouncer::new(options)?;
        Ok(Self {
            shared: Arc::new(Shared {
                debouncer: Mutex::new(debouncer),
                on_settle,
                origin: Instant::now(),
            }),
            timer: None,
            deadline: None,
        })
    }

    /// Replaces any pending value and restarts the quiet period.
    ///
    /// The timer is armed a full quiet period after this call, measured on the tokio clock.
    pub fn submit(&mut self, value: T) {
        let shared = &self.shared;
        let submitted_at = Instant::now();
        let quiet_period_ms = {
            let mut debouncer = shared.debouncer.lock();
            debouncer.submit(value, shared.ms_at(submitted_at));
            if !debouncer.is_pending() {
                return;
            }
            debouncer.quiet_period_ms()
        };

        if let Some(prev) = self.timer.take() {
            prev.abort();
        }
        let deadline = submitted_at + Duration::from_millis(quiet_period_ms);
        self.deadline = Some(deadline);
        let shared = Arc::clone(shared);
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            shared.fire();
        }));
    }

    /// When the pending value is due to settle.
    pub fn deadline(&self) -> Option<Instant> {
        if self.is_pending() {
            self.deadline
        } else {
            None
        }
    }

    pub fn state(&self) -> DebounceState {
        self.shared.debouncer.lock().state()
    }

    pub fn is_pending(&self) -> bool {
        self.shared.debouncer.lock().is_pending()
    }

    pub fn quiet_period_ms(&self) -> u64 {
        self.shared.debouncer.lock().quiet_period_ms()
    }
}

impl<T> TimedDebouncer<T> {
    /// Cancels the timer and any pending value. Later submits are ignored.
    pub fn dispose(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.deadline = None;
        self.shared.debouncer.lock().dispose();
    }
}

impl<T> Drop for TimedDebouncer<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T> core::fmt::Debug for TimedDebouncer<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let debouncer = self.shared.debouncer.lock();
        f.debug_struct("TimedDebouncer")
            .field("state", &debouncer.state())
            .field("deadline", &self.deadline)
            .field("timer_armed", &self.timer.is_some())
            .finish_non_exhaustive()
    }
}
