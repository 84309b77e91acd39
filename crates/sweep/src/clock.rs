use std::cell::Cell;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// One degree of sweep every 25ms, about nine seconds per revolution.
pub const MS_PER_DEGREE: f64 = 25.0;

pub fn sweep_angle_at(now_millis: f64, ms_per_degree: f64) -> f64 {
    (now_millis / ms_per_degree).rem_euclid(360.0)
}

pub fn current_sweep_angle(now_millis: f64) -> f64 {
    sweep_angle_at(now_millis, MS_PER_DEGREE)
}

pub trait Clock {
    fn now_millis(&self) -> f64;
}

/// Wall clock, milliseconds since the UNIX epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or_default()
    }
}

/// Settable clock for simulated time. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<f64>>);

impl ManualClock {
    pub fn new(now_millis: f64) -> Self {
        Self(Rc::new(Cell::new(now_millis)))
    }

    pub fn set(&self, now_millis: f64) {
        self.0.set(now_millis);
    }

    pub fn advance(&self, millis: f64) {
        self.0.set(self.0.get() + millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> f64 {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SweepState {
    angle: f64,
}

impl SweepState {
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub(crate) fn set(&mut self, angle: f64) {
        self.angle = angle;
    }
}

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }

    /// Cancels the token when the returned guard is dropped.
    pub fn guard(&self) -> CancelGuard {
        CancelGuard(self.clone())
    }
}

#[derive(Debug)]
pub struct CancelGuard(CancelToken);

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// One step of the self-rescheduling frame chain.
pub struct Animator<C> {
    clock: C,
    ms_per_degree: f64,
    token: CancelToken,
}

impl<C: Clock> Animator<C> {
    pub fn new(clock: C, ms_per_degree: f64) -> Self {
        Self {
            clock,
            ms_per_degree,
            token: CancelToken::new(),
        }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Samples the clock into `sweep` and asks for another frame, unless cancelled, in which
    /// case `sweep` is left alone and the chain ends.
    pub fn frame(&self, sweep: &mut SweepState) -> ControlFlow<()> {
        if self.token.is_cancelled() {
            return ControlFlow::Break(());
        }
        sweep.set(sweep_angle_at(self.clock.now_millis(), self.ms_per_degree));
        ControlFlow::Continue(())
    }
}
