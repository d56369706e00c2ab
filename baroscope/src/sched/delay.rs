// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! `DelayNs` on top of the scheduler's countdown delay.
//!
//! Drivers take any [`DelayNs`]; handing them this adapter keeps the tick cascade (and therefore
//! the watchdog hook) alive while they wait. Durations are rounded up to whole ticks.

use embedded_hal::delay::DelayNs;

use super::{CronHooks, Scheduler, TickSource};
use crate::config::TICK_PERIOD_NS;

/// Borrows the scheduler and its collaborators for the duration of a blocking operation.
pub struct SchedulerDelay<'a, T: ?Sized, H: ?Sized> {
    scheduler: &'a mut Scheduler,
    source: &'a mut T,
    hooks: &'a mut H,
}

impl<'a, T, H> SchedulerDelay<'a, T, H>
where
    T: TickSource + ?Sized,
    H: CronHooks + ?Sized,
{
    pub fn new(scheduler: &'a mut Scheduler, source: &'a mut T, hooks: &'a mut H) -> Self {
        Self {
            scheduler,
            source,
            hooks,
        }
    }
}

impl<T, H> DelayNs for SchedulerDelay<'_, T, H>
where
    T: TickSource + ?Sized,
    H: CronHooks + ?Sized,
{
    fn delay_ns(&mut self, ns: u32) {
        let ticks = ns.div_ceil(TICK_PERIOD_NS);
        self.scheduler.delay(ticks, self.source, self.hooks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EveryPoll;

    impl TickSource for EveryPoll {
        fn poll(&mut self) -> bool {
            true
        }
    }

    fn ticks_for(f: impl FnOnce(&mut SchedulerDelay<'_, EveryPoll, ()>)) -> u64 {
        let mut sched = Scheduler::new();
        let mut source = EveryPoll;
        let mut hooks = ();
        f(&mut SchedulerDelay::new(&mut sched, &mut source, &mut hooks));
        sched.state().ticks
    }

    #[test]
    fn rounds_up_to_whole_ticks() {
        assert_eq!(ticks_for(|d| d.delay_ns(0)), 0);
        assert_eq!(ticks_for(|d| d.delay_ns(1)), 1);
        assert_eq!(ticks_for(|d| d.delay_ns(10_000)), 1);
        assert_eq!(ticks_for(|d| d.delay_ns(10_001)), 2);
    }

    #[test]
    fn microseconds_and_milliseconds() {
        assert_eq!(ticks_for(|d| d.delay_us(10)), 1);
        assert_eq!(ticks_for(|d| d.delay_us(100)), 10);
        assert_eq!(ticks_for(|d| d.delay_ms(5)), 500);
        assert_eq!(ticks_for(|d| d.delay_ms(2_000)), 200_000);
    }
}
