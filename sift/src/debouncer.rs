use alloc::sync::Arc;

use crate::error::ConfigError;
use crate::{DebounceSnapshot, DebounceState, DebouncerOptions};

#[derive(Clone, Debug)]
struct PendingValue<T> {
    value: T,
    deadline_ms: u64,
}

/// A headless input coalescer (debouncer).
///
/// Bursts of `submit` calls collapse into a single settled value: each submission cancels the
/// previous one and re-arms the deadline, so the value only settles once the input has been
/// quiet for the configured period.
///
/// The debouncer does not own a timer. Your adapter drives it with its own clock:
/// - `submit(value, now_ms)` when input arrives
/// - `tick(now_ms)` each frame/timer tick; it fires the `on_settle` callback and returns the
///   settled value once the deadline has passed
///
/// For a tokio-backed timer, see `TimedDebouncer` in the `sift-adapter` crate.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    options: DebouncerOptions<T>,
    quiet_period_ms: u64,
    pending: Option<PendingValue<T>>,
    disposed: bool,
}

impl<T> Debouncer<T> {
    /// Creates a new debouncer from options.
    ///
    /// Fails with [`ConfigError::InvalidConfiguration`] when the quiet period is negative or not
    /// finite.
    pub fn new(options: DebouncerOptions<T>) -> Result<Self, ConfigError> {
        let quiet_period_ms = options.validated_quiet_period_ms().inspect_err(|_e| {
            swarn!(quiet_period_ms = options.quiet_period_ms, "Debouncer::new rejected options");
        })?;
        sdebug!(quiet_period_ms, "Debouncer::new");
        Ok(Self {
            options,
            quiet_period_ms,
            pending: None,
            disposed: false,
        })
    }

    /// Shorthand for `Debouncer::new(DebouncerOptions::new(ms).with_on_settle(f))`.
    pub fn with_callback(
        quiet_period_ms: f64,
        on_settle: impl Fn(&T) + Send + Sync + 'static,
    ) -> Result<Self, ConfigError> {
        Self::new(DebouncerOptions::new(quiet_period_ms).with_on_settle(on_settle))
    }

    pub fn options(&self) -> &DebouncerOptions<T> {
        &self.options
    }

    pub fn set_on_settle(&mut self, on_settle: impl Fn(&T) + Send + Sync + 'static) {
        self.options.on_settle = Some(Arc::new(on_settle));
    }

    pub fn quiet_period_ms(&self) -> u64 {
        self.quiet_period_ms
    }

    pub fn state(&self) -> DebounceState {
        if self.disposed {
            DebounceState::Disposed
        } else if self.pending.is_some() {
            DebounceState::Pending
        } else {
            DebounceState::Idle
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.deadline_ms)
    }

    pub fn pending_value(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    /// Milliseconds left until the pending value settles (`0` when already due).
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.deadline_ms()
            .map(|deadline| deadline.saturating_sub(now_ms))
    }

    pub fn snapshot(&self) -> DebounceSnapshot {
        DebounceSnapshot {
            state: self.state(),
            deadline_ms: self.deadline_ms(),
            quiet_period_ms: self.quiet_period_ms,
        }
    }

    /// Replaces any pending value with `value` and restarts the quiet period at `now_ms`.
    ///
    /// Ignored once the debouncer is disposed.
    pub fn submit(&mut self, value: T, now_ms: u64) {
        if self.disposed {
            return;
        }
        let deadline_ms = now_ms.saturating_add(self.quiet_period_ms);
        strace!(
            now_ms,
            deadline_ms,
            rearmed = self.pending.is_some(),
            "Debouncer::submit"
        );
        self.pending = Some(PendingValue { value, deadline_ms });
    }

    /// Advances the debouncer.
    ///
    /// If a value is pending and its deadline has passed, the debouncer becomes idle, the
    /// `on_settle` callback is invoked and the settled value is returned.
    pub fn tick(&mut self, now_ms: u64) -> Option<T> {
        let deadline_ms = self.deadline_ms()?;
        if now_ms < deadline_ms {
            return None;
        }
        strace!(now_ms, deadline_ms, "Debouncer::tick settled");
        self.settle()
    }

    /// Settles the pending value immediately, without waiting for the quiet period.
    pub fn flush(&mut self) -> Option<T> {
        self.settle()
    }

    /// Drops the pending value without firing. The debouncer stays usable.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Cancels any pending value and permanently stops the debouncer.
    ///
    /// Call this when the owning context is torn down so the callback never runs against
    /// released state.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        sdebug!(had_pending = self.pending.is_some(), "Debouncer::dispose");
        self.pending = None;
        self.disposed = true;
    }

    fn settle(&mut self) -> Option<T> {
        let PendingValue { value, .. } = self.pending.take()?;
        if let Some(cb) = &self.options.on_settle {
            cb(&value);
        }
        Some(value)
    }
}
