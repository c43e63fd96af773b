//! Auto-rotation: a fixed-period ticker that nudges the tree's base angle.

use crate::config::TreeParams;
use std::time::{Duration, Instant};

/// Rotation step per tick, degrees
pub const STEP_DEGREES: f64 = 1.0;

/// Default tick period
pub const TICK: Duration = Duration::from_millis(100);

/// Longest period accepted from the command line
const MAX_TICK: Duration = Duration::from_secs(3600);

/// Tick period for `secs` seconds. Values that don't fit a `Duration`
/// (infinite, NaN, negative, absurdly large) fall back to `TICK`.
pub fn tick_period(secs: f32) -> Duration {
    match Duration::try_from_secs_f32(secs) {
        Ok(period) if period <= MAX_TICK => period.max(Duration::from_millis(1)),
        Ok(period) => {
            log::warn!("rotation tick {:?} too long, using {:?}", period, TICK);
            TICK
        }
        Err(e) => {
            log::warn!("invalid rotation tick {} ({}), using {:?}", secs, e, TICK);
            TICK
        }
    }
}

/// Advance `angle` by one step, wrapping to 0 at a full turn
pub fn advance(angle: f64) -> f64 {
    let next = angle + STEP_DEGREES;
    if next >= 360.0 {
        0.0
    } else {
        next
    }
}

/// Apply `ticks` rotation steps. Returns the new params and whether the
/// tree needs a re-render.
pub fn apply_ticks(params: TreeParams, ticks: u32) -> (TreeParams, bool) {
    let next = (0..ticks).fold(params, |p, _| p.with_rotation(advance(p.rotation_angle)));
    (next, ticks > 0)
}

/// Periodic schedule with explicit cancellation.
///
/// The event loop asks `poll` how many periods have elapsed and re-renders
/// once per tick; `cancel` drops the schedule so later polls return zero.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    /// A ticker whose first tick is one period after `now`
    pub fn start(period: Duration, now: Instant) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self { period, next_due: Some(now + period) }
    }

    /// A ticker that never fires
    pub fn stopped(period: Duration) -> Self {
        Self { period: period.max(Duration::from_millis(1)), next_due: None }
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Restart from `now` if stopped, otherwise leave the schedule alone
    pub fn resume(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.period);
        }
    }

    /// Number of ticks that fell due at or before `now`
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };
        let mut ticks = 0;
        while due <= now {
            ticks += 1;
            due += self.period;
        }
        self.next_due = Some(due);
        ticks
    }

    /// Time until the next tick, `None` when stopped
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}
