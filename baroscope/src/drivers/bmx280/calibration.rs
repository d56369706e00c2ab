// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Factory trimming coefficients.

/// Size of the temperature/pressure calibration block starting at `calib00` (0x88).
pub const CALIBRATION_LEN: usize = 24;

/// Temperature (`dig_T*`) and pressure (`dig_P*`) compensation coefficients.
///
/// Read once after identification and never modified afterwards.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Calibration {
    pub t1: u16,
    pub t2: i16,
    pub t3: i16,

    pub p1: u16,
    pub p2: i16,
    pub p3: i16,
    pub p4: i16,
    pub p5: i16,
    pub p6: i16,
    pub p7: i16,
    pub p8: i16,
    pub p9: i16,
}

impl Calibration {
    /// Parse the 24-byte little-endian block `T1 T2 T3 P1 P2 … P9`.
    pub fn from_bytes(block: &[u8; CALIBRATION_LEN]) -> Self {
        let unsigned = |i: usize| u16::from_le_bytes([block[i], block[i + 1]]);
        let signed = |i: usize| i16::from_le_bytes([block[i], block[i + 1]]);

        Self {
            t1: unsigned(0),
            t2: signed(2),
            t3: signed(4),

            p1: unsigned(6),
            p2: signed(8),
            p3: signed(10),
            p4: signed(12),
            p5: signed(14),
            p6: signed(16),
            p7: signed(18),
            p8: signed(20),
            p9: signed(22),
        }
    }
}
