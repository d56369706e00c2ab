// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Cooperative Time Base
//!
//! Everything here runs on the single main loop; the only asynchronous producer is the hardware
//! tick behind [`TickSource`].
//!
//! ## Modules
//!
//! - [`scheduler`] - Tick → millisecond → second → minute cascade and the countdown delay.
//! - [`delay`] - `embedded-hal` `DelayNs` adapter that keeps the cascade running while waiting.
//! - [`dispatcher`] - Pending-event flags drained once per scheduler pass.

pub mod delay;
pub mod dispatcher;
pub mod scheduler;

pub use delay::SchedulerDelay;
pub use dispatcher::{Event, EventFlags};
pub use scheduler::{CronHooks, ScheduleState, Scheduler};

/// Source of hardware ticks.
pub trait TickSource {
    /// Return `true` if a hardware tick has elapsed since the previous call.
    ///
    /// Each elapsed tick must be reported exactly once.
    fn poll(&mut self) -> bool;
}
