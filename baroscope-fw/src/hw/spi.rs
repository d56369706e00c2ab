// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial Peripheral Interface (SPI) abstraction layer.
//!
//! Bridges the HAL's SPI peripheral and GPIO outputs to the `embedded-hal` 1.0 traits the
//! `baroscope` transport is written against.
//!
//! - `SpiBus` wraps a configured HAL SPI instance with 8-bit words.
//! - `ChipSelect` is an active-low GPIO output wrapper for manual CS control.

use core::convert::Infallible;

use embedded_hal::{digital, spi::ErrorKind};
use stm32f7xx_hal::{
    gpio::{self, Output, PinState, PushPull},
    prelude::*,
    spi::{self, Enabled, Spi},
};

/// HAL SPI error, surfaced through `embedded_hal::spi::Error`.
#[derive(Debug)]
pub struct SpiError(pub spi::Error);

impl embedded_hal::spi::Error for SpiError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Wrapper around an enabled HAL SPI instance (8-bit words).
pub struct SpiBus<I, P> {
    spi: Spi<I, P, Enabled<u8>>,
}

impl<I, P> SpiBus<I, P>
where
    I: spi::Instance,
    P: spi::Pins<I>,
{
    pub fn new(spi: Spi<I, P, Enabled<u8>>) -> Self {
        Self { spi }
    }

    /// Perform a blocking, full-duplex transfer of one byte.
    pub fn transfer_byte(&mut self, byte: u8) -> Result<u8, SpiError> {
        let mut tmp = [byte];
        self.spi.transfer(&mut tmp).map_err(SpiError)?;
        Ok(tmp[0])
    }

    pub fn free(self) -> Spi<I, P, Enabled<u8>> {
        self.spi
    }
}

impl<I, P> embedded_hal::spi::ErrorType for SpiBus<I, P> {
    type Error = SpiError;
}

impl<I, P> embedded_hal::spi::SpiBus<u8> for SpiBus<I, P>
where
    I: spi::Instance,
    P: spi::Pins<I>,
{
    fn read(&mut self, words: &mut [u8]) -> Result<(), SpiError> {
        for w in words.iter_mut() {
            *w = self.transfer_byte(0x00)?;
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), SpiError> {
        for &w in words {
            self.transfer_byte(w)?;
        }
        Ok(())
    }

    /// Shorter buffer is padded with 0x00 on the way out; excess replies are dropped.
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), SpiError> {
        for i in 0..read.len().max(write.len()) {
            let reply = self.transfer_byte(write.get(i).copied().unwrap_or(0x00))?;
            if let Some(r) = read.get_mut(i) {
                *r = reply;
            }
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), SpiError> {
        for w in words.iter_mut() {
            *w = self.transfer_byte(*w)?;
        }
        Ok(())
    }

    /// Every transfer above waits for its reply byte, so nothing is ever left in flight.
    fn flush(&mut self) -> Result<(), SpiError> {
        Ok(())
    }
}

/// Manual chip-select line, active-low, generic over any GPIO pin.
pub struct ChipSelect<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Output<PushPull>>,
}

impl<const P: char, const N: u8> ChipSelect<P, N> {
    /// Create an active-low chip select and set to the inactive state (i.e., high).
    pub fn active_low<MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        let mut pin = pin.into_push_pull_output();
        pin.set_state(PinState::High);
        Self { pin }
    }

    pub fn free(self) -> gpio::Pin<P, N, Output<PushPull>> {
        self.pin
    }
}

impl<const P: char, const N: u8> digital::ErrorType for ChipSelect<P, N> {
    type Error = Infallible;
}

impl<const P: char, const N: u8> digital::OutputPin for ChipSelect<P, N> {
    #[inline]
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.pin.set_state(PinState::Low);
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.pin.set_state(PinState::High);
        Ok(())
    }
}
