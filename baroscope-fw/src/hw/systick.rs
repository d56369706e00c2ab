// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! SysTick as the scheduler's hardware tick.
//!
//! The exception handler is the only writer of [`TICKS`]; the main loop observes it through
//! [`SysTickSource`], which reports each elapsed tick exactly once even if several accumulated
//! while the loop was busy.

use core::sync::atomic::{AtomicU32, Ordering};

use baroscope::TickSource;
use cortex_m::peripheral::{syst::SystClkSource, SYST};
use cortex_m_rt::exception;

/// Ticks since SysTick was started. Wraps.
static TICKS: AtomicU32 = AtomicU32::new(0);

#[exception]
fn SysTick() {
    TICKS.fetch_add(1, Ordering::Relaxed);
}

/// Start SysTick at `tick_hz` from the core clock and enable its exception.
pub fn start(mut syst: SYST, sysclk_hz: u32, tick_hz: u32) -> SysTickSource {
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(sysclk_hz / tick_hz - 1);
    syst.clear_current();
    syst.enable_counter();
    syst.enable_interrupt();

    SysTickSource {
        seen: TICKS.load(Ordering::Relaxed),
        _syst: syst,
    }
}

/// Main-loop view of the SysTick counter.
pub struct SysTickSource {
    seen: u32,
    _syst: SYST,
}

impl TickSource for SysTickSource {
    fn poll(&mut self) -> bool {
        if TICKS.load(Ordering::Relaxed) != self.seen {
            self.seen = self.seen.wrapping_add(1);
            true
        } else {
            false
        }
    }
}
