// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Tick-driven cascade scheduler.
//!
//! One call to [`Scheduler::run`] is one pass of the main loop. A pass consumes at most one
//! hardware tick and advances each derived counter at most once:
//!
//! - tick:        `ticks += 1` when the source reports a tick
//! - millisecond: when `ticks >= next_milli`,  next threshold is `ticks + 100`
//! - second:      when `millis >= next_second`, next threshold is `+ 1000`
//! - minute:      when `seconds >= next_minute`, next threshold is `+ 60`
//!
//! Counters are 64-bit where a 32-bit value would wrap within days at 100 kHz.

use super::TickSource;
use crate::config::{MILLIS_PER_SECOND, SECONDS_PER_MINUTE, TICKS_PER_MILLI};

/// Callbacks fired by the cascade. All default to no-ops.
pub trait CronHooks {
    fn on_tick(&mut self, _state: &ScheduleState) {}

    fn on_milli(&mut self, _state: &ScheduleState) {}

    fn on_second(&mut self, _state: &ScheduleState) {}

    fn on_minute(&mut self, _state: &ScheduleState) {}
}

impl CronHooks for () {}

/// Time base counters. Only the scheduler mutates them; they are never reset.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ScheduleState {
    pub ticks: u64,
    pub millis: u64,
    pub seconds: u32,
    pub minutes: u32,

    next_milli: u64,
    next_second: u64,
    next_minute: u32,

    delay_active: bool,
    delay_target: u64,
}

impl ScheduleState {
    /// Power-on state: all counters zero, first thresholds one unit away.
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            millis: 0,
            seconds: 0,
            minutes: 0,

            next_milli: TICKS_PER_MILLI as u64,
            next_second: MILLIS_PER_SECOND as u64,
            next_minute: SECONDS_PER_MINUTE,

            delay_active: false,
            delay_target: 0,
        }
    }

    /// A countdown delay is in progress.
    #[inline]
    pub fn delay_active(&self) -> bool {
        self.delay_active
    }

    /// Tick count at which the current delay ends.
    #[inline]
    pub fn delay_target(&self) -> u64 {
        self.delay_target
    }
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self::new()
    }
}

/// Cooperative scheduler owning the time base.
pub struct Scheduler {
    state: ScheduleState,
}

impl Scheduler {
    pub const fn new() -> Self {
        Self {
            state: ScheduleState::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    /// Run one pass of the cascade. Never blocks.
    pub fn run<T, H>(&mut self, source: &mut T, hooks: &mut H)
    where
        T: TickSource + ?Sized,
        H: CronHooks + ?Sized,
    {
        let s = &mut self.state;

        if source.poll() {
            s.ticks += 1;
            hooks.on_tick(s);
        }

        if s.ticks >= s.next_milli {
            s.millis += 1;
            s.next_milli = s.ticks + TICKS_PER_MILLI as u64;
            hooks.on_milli(s);
        }

        if s.millis >= s.next_second {
            s.seconds += 1;
            s.next_second += MILLIS_PER_SECOND as u64;
            hooks.on_second(s);
        }

        if s.seconds >= s.next_minute {
            s.minutes += 1;
            s.next_minute += SECONDS_PER_MINUTE;
            hooks.on_minute(s);
        }
    }

    /// Block for `ticks` hardware ticks while the cascade keeps running.
    ///
    /// Returns once the tick counter has advanced by exactly `ticks`; a zero delay returns without
    /// running a pass. Holding `&mut self` for the whole wait means only one delay can be
    /// outstanding: hooks cannot start a nested one.
    pub fn delay<T, H>(&mut self, ticks: u32, source: &mut T, hooks: &mut H)
    where
        T: TickSource + ?Sized,
        H: CronHooks + ?Sized,
    {
        self.state.delay_target = self.state.ticks + ticks as u64;
        self.state.delay_active = true;

        while self.state.ticks < self.state.delay_target {
            self.run(source, hooks);
        }

        self.state.delay_active = false;
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
