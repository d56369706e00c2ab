// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! Device drivers sit above the register [`transport`](crate::transport) and below the
//! application loop.
//!
//! ## Existing drivers
//!
//! - [`bmx280`] – Bosch BMP280 / BME280 pressure and temperature sensor over 4-wire SPI

pub mod bmx280;

pub use bmx280::Bmx280;
