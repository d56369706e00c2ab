// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! `log` backend writing one line per record to the debug USART.
//!
//! The critical section only covers moving the `Usart` in and out of [`SINK`]; the blocking write
//! itself runs with interrupts enabled so SysTick keeps counting. A record logged while another is
//! being written (from an interrupt) finds the sink empty and is dropped, as is logging before
//! [`init`].

use core::cell::RefCell;
use core::fmt::Write;

use critical_section::Mutex;
use log::{LevelFilter, Log, Metadata, Record};
use stm32f7xx_hal::pac::USART3;

use crate::hw::Usart;

static SINK: Mutex<RefCell<Option<Usart<USART3>>>> = Mutex::new(RefCell::new(None));

struct UsartLogger;

static LOGGER: UsartLogger = UsartLogger;

impl Log for UsartLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        with_sink(|usart| {
            let _ = writeln!(usart, "[{:<5}] {}", record.level(), record.args());
        });
    }

    fn flush(&self) {
        with_sink(Usart::flush);
    }
}

/// Borrow the sink outside the critical section.
fn with_sink(f: impl FnOnce(&mut Usart<USART3>)) {
    let Some(mut usart) = critical_section::with(|cs| SINK.borrow_ref_mut(cs).take()) else {
        return;
    };
    f(&mut usart);
    critical_section::with(|cs| SINK.borrow_ref_mut(cs).replace(usart));
}

/// Install the USART as the global logger.
pub fn init(usart: Usart<USART3>, level: LevelFilter) {
    critical_section::with(|cs| SINK.borrow_ref_mut(cs).replace(usart));
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
