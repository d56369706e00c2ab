// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Measurement settings and time-base constants.

/// Hardware ticks per scheduler millisecond. The SysTick source runs at 100 kHz.
pub const TICKS_PER_MILLI: u32 = 100;

/// Milliseconds per scheduler second.
pub const MILLIS_PER_SECOND: u32 = 1000;

/// Seconds per scheduler minute.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Length of one hardware tick in nanoseconds.
pub const TICK_PERIOD_NS: u32 = 1_000_000 / TICKS_PER_MILLI;

/// Settle time after each register write and after identification/calibration reads.
pub const REGISTER_SETTLE_US: u32 = 10;

/// Settle time between the measuring bit clearing and the data burst read.
pub const DATA_SETTLE_US: u32 = 100;

/// Power-up settle before the first register access.
pub const POWER_UP_SETTLE_US: u32 = 5_000;

/// Oversampling factor for one measurement channel (`osrs_t` / `osrs_p`).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Oversampling {
    Skipped = 0b000,
    X1 = 0b001,
    X2 = 0b010,
    X4 = 0b011,
    X8 = 0b100,
    X16 = 0b101,
}

/// Power mode field of `ctrl_meas`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    Sleep = 0b00,
    Forced = 0b01,
    Normal = 0b11,
}

/// Contents of the `ctrl_meas` register written before every triggered measurement.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MeasurementConfig {
    pub temperature: Oversampling,
    pub pressure: Oversampling,
    pub mode: Mode,
}

impl MeasurementConfig {
    /// Encode as the raw `ctrl_meas` byte: `osrs_t[7:5] | osrs_p[4:2] | mode[1:0]`.
    #[inline]
    pub fn ctrl_meas(&self) -> u8 {
        ((self.temperature as u8) << 5) | ((self.pressure as u8) << 2) | (self.mode as u8)
    }
}

impl Default for MeasurementConfig {
    /// x1 temperature, x1 pressure, one-shot forced conversion.
    fn default() -> Self {
        Self {
            temperature: Oversampling::X1,
            pressure: Oversampling::X1,
            mode: Mode::Forced,
        }
    }
}
