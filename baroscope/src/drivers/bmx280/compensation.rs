// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Raw-to-physical conversion, as published in the BMP280 datasheet (section 8.1 / 8.2).
//!
//! Two pipelines are provided: 32-bit fixed point and `f64`. Each temperature routine also yields
//! the fine temperature, which the pressure routine of the *same* pipeline consumes. The two
//! pipelines may round `t_fine` differently, so mixing them is not supported.
//!
//! The shift amounts and constants are the datasheet's and must not be rearranged. Integer
//! operations wrap like the reference C code so that out-of-range inputs cannot panic.

use super::Calibration;

/// Fine-resolution temperature carried from temperature into pressure compensation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FineTemperature(pub i32);

impl Calibration {
    /// Temperature in 0.01 °C ("5123" is 51.23 °C) from a 20-bit raw reading.
    pub fn compensate_temperature(&self, adc_t: i32) -> (i32, FineTemperature) {
        let t1 = self.t1 as i32;
        let t2 = self.t2 as i32;
        let t3 = self.t3 as i32;

        let var1 = ((adc_t >> 3) - (t1 << 1)).wrapping_mul(t2) >> 11;
        let d = (adc_t >> 4) - t1;
        let var2 = ((d.wrapping_mul(d) >> 12).wrapping_mul(t3)) >> 14;

        let t_fine = var1.wrapping_add(var2);
        let t = t_fine.wrapping_mul(5).wrapping_add(128) >> 8;
        (t, FineTemperature(t_fine))
    }

    /// Pressure in Pa ("96386" is 963.86 hPa) from a 20-bit raw reading.
    ///
    /// Returns 0 when the calibration makes the divisor vanish (e.g. `p1 == 0`).
    pub fn compensate_pressure(&self, adc_p: i32, t_fine: FineTemperature) -> u32 {
        let p1 = self.p1 as i32;
        let p2 = self.p2 as i32;
        let p3 = self.p3 as i32;
        let p4 = self.p4 as i32;
        let p5 = self.p5 as i32;
        let p6 = self.p6 as i32;
        let p7 = self.p7 as i32;
        let p8 = self.p8 as i32;
        let p9 = self.p9 as i32;

        let mut var1 = (t_fine.0 >> 1) - 64000;
        let mut var2 = (((var1 >> 2).wrapping_mul(var1 >> 2)) >> 11).wrapping_mul(p6);
        var2 = var2.wrapping_add(var1.wrapping_mul(p5) << 1);
        var2 = (var2 >> 2).wrapping_add(p4 << 16);
        var1 = ((p3.wrapping_mul(((var1 >> 2).wrapping_mul(var1 >> 2)) >> 13) >> 3)
            .wrapping_add(p2.wrapping_mul(var1) >> 1))
            >> 18;
        var1 = 32768i32.wrapping_add(var1).wrapping_mul(p1) >> 15;

        if var1 == 0 {
            return 0;
        }

        let mut p = (1_048_576i32.wrapping_sub(adc_p) as u32)
            .wrapping_sub((var2 >> 12) as u32)
            .wrapping_mul(3125);
        if p < 0x8000_0000 {
            p = (p << 1) / var1 as u32;
        } else {
            p = (p / var1 as u32).wrapping_mul(2);
        }

        let var1 = p9.wrapping_mul((((p >> 3).wrapping_mul(p >> 3)) >> 13) as i32) >> 12;
        let var2 = ((p >> 2) as i32).wrapping_mul(p8) >> 13;
        (p as i32).wrapping_add(var1.wrapping_add(var2).wrapping_add(p7) >> 4) as u32
    }

    /// Temperature in °C from a 20-bit raw reading.
    pub fn compensate_temperature_f64(&self, adc_t: i32) -> (f64, FineTemperature) {
        let adc = adc_t as f64;
        let t1 = self.t1 as f64;
        let t2 = self.t2 as f64;
        let t3 = self.t3 as f64;

        let var1 = (adc / 16384.0 - t1 / 1024.0) * t2;
        let var2 = ((adc / 131072.0 - t1 / 8192.0) * (adc / 131072.0 - t1 / 8192.0)) * t3;

        let t_fine = FineTemperature((var1 + var2) as i32);
        ((var1 + var2) / 5120.0, t_fine)
    }

    /// Pressure in Pa from a 20-bit raw reading. Returns 0.0 on a vanishing divisor.
    pub fn compensate_pressure_f64(&self, adc_p: i32, t_fine: FineTemperature) -> f64 {
        let p1 = self.p1 as f64;
        let p2 = self.p2 as f64;
        let p3 = self.p3 as f64;
        let p4 = self.p4 as f64;
        let p5 = self.p5 as f64;
        let p6 = self.p6 as f64;
        let p7 = self.p7 as f64;
        let p8 = self.p8 as f64;
        let p9 = self.p9 as f64;

        let mut var1 = (t_fine.0 as f64 / 2.0) - 64000.0;
        let mut var2 = var1 * var1 * p6 / 32768.0;
        var2 += var1 * p5 * 2.0;
        var2 = (var2 / 4.0) + (p4 * 65536.0);
        var1 = (p3 * var1 * var1 / 524288.0 + p2 * var1) / 524288.0;
        var1 = (1.0 + var1 / 32768.0) * p1;

        if var1 == 0.0 {
            return 0.0;
        }

        let mut p = 1048576.0 - adc_p as f64;
        p = (p - (var2 / 4096.0)) * 6250.0 / var1;
        let var1 = p9 * p * p / 2147483648.0;
        let var2 = p * p8 / 32768.0;
        p + (var1 + var2 + p7) / 16.0
    }
}
