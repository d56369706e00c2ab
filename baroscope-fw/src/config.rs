// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board-level settings.

use log::LevelFilter;

/// SysTick rate: one scheduler tick per interrupt.
pub const TICK_HZ: u32 = baroscope::config::TICKS_PER_MILLI * 1000;

/// IWDG timeout. The one-second hook feeds it, leaving one second of slack.
pub const WATCHDOG_TIMEOUT_MS: u32 = 2_000;

pub const LOG_BAUD: u32 = 115_200;
pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// BMx280 SPI clock; the part accepts up to 10 MHz.
pub const SPI_HZ: u32 = 1_000_000;
