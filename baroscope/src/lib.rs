// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # baroscope
//!
//! Hardware-independent core of the baroscope firmware: a Bosch BMx280 (BMP280 / BME280)
//! pressure and temperature sampler driven by a cooperative, tick-based scheduler. The STM32
//! bring-up lives in the `baroscope-fw` crate; everything here only talks to `embedded-hal` 1.0
//! traits and builds for the host so it can be tested there.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`transport`] | Chip-select framed register transport over an SPI bus |
//! | [`drivers`] | Device-level drivers (BMx280) |
//! | [`sched`] | Tick-driven time base, countdown delay and event flags |
//! | [`app`] | Application context threaded through the main loop |
//! | [`config`] | Measurement settings and cadence constants |
//!
//! ## Testing
//!
//! ```bash
//! cargo test
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod config;
pub mod drivers;
pub mod sched;
pub mod transport;

#[cfg(test)]
pub(crate) mod sim;

pub use app::{App, Report, SystemHooks, Watchdog};
pub use drivers::bmx280::{Bmx280, DeviceKind};
pub use sched::{Event, EventFlags, Scheduler, TickSource};
pub use transport::Transport;
