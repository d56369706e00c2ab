// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Independent watchdog (IWDG), clocked from the 32 kHz LSI.

use baroscope::Watchdog;
use stm32f7xx_hal::pac;

const KEY_START: u32 = 0xCCCC;
const KEY_UNLOCK: u32 = 0x5555;
const KEY_RELOAD: u32 = 0xAAAA;

const LSI_HZ: u32 = 32_000;
/// PR = 4 selects a /64 prescaler.
const PRESCALER_BITS: u32 = 4;
const PRESCALER_DIV: u32 = 64;
const RELOAD_MAX: u32 = 0x0FFF;

pub struct Iwdg {
    iwdg: pac::IWDG,
}

impl Iwdg {
    /// Start the watchdog with the given timeout. Once started it cannot be stopped.
    pub fn start(iwdg: pac::IWDG, timeout_ms: u32) -> Self {
        let reload = (timeout_ms * (LSI_HZ / PRESCALER_DIV) / 1000)
            .saturating_sub(1)
            .min(RELOAD_MAX);

        iwdg.kr.write(|w| unsafe { w.bits(KEY_START) });
        iwdg.kr.write(|w| unsafe { w.bits(KEY_UNLOCK) });
        iwdg.pr.write(|w| unsafe { w.bits(PRESCALER_BITS) });
        iwdg.rlr.write(|w| unsafe { w.bits(reload) });

        // PVU / RVU clear once the new values reach the LSI domain.
        while iwdg.sr.read().bits() != 0 {}

        let mut wd = Self { iwdg };
        wd.feed();
        wd
    }
}

impl Watchdog for Iwdg {
    #[inline]
    fn feed(&mut self) {
        self.iwdg.kr.write(|w| unsafe { w.bits(KEY_RELOAD) });
    }
}
