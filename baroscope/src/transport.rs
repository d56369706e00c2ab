// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Chip-select framed register transport.
//!
//! - `Transport` owns an 8-bit SPI bus and the active-low chip-select line of a single peripheral.
//! - Every transaction asserts chip-select, shifts one byte at a time and releases chip-select on
//!   every exit path. The sensor auto-increments its register pointer only while chip-select is
//!   held, so a multi-byte read is never split.
//!
//! The bus is full-duplex but the register protocol is half-duplex: each byte shifted out produces
//! one byte shifted in, `LATENCY` bus cycles later. A read therefore throws away the reply to the
//! address byte plus `LATENCY` stale bytes and keeps the rest. Synchronous `embedded-hal` buses
//! return the reply of the byte just sent, so the default `LATENCY` is 0.

use embedded_hal::{
    digital::{self, OutputPin},
    spi::{self, SpiBus},
};

/// High bit of the command byte selects read (1) or write (0).
pub const WRITE_MASK: u8 = 0x7F;

/// Filler shifted out while clocking in read data.
const FILL_BYTE: u8 = 0x00;

/// Transport failure, split by which line misbehaved.
#[derive(Debug, thiserror_no_std::Error)]
pub enum Error<SpiE, PinE> {
    /// The SPI peripheral reported an error (overrun, mode fault, ...).
    #[error("SPI transfer failed: {0:?}")]
    Spi(SpiE),
    /// The chip-select GPIO could not be driven.
    #[error("chip-select line failed: {0:?}")]
    ChipSelect(PinE),
}

/// Error type produced by a `Transport` over `SPI` and `CS`.
pub type TransportError<SPI, CS> =
    Error<<SPI as spi::ErrorType>::Error, <CS as digital::ErrorType>::Error>;

/// Register transport for one peripheral on an SPI bus.
pub struct Transport<SPI, CS, const LATENCY: usize = 0> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS, const LATENCY: usize> Transport<SPI, CS, LATENCY>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    /// Build a transport. `cs` must already be in its inactive (high) state.
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    /// Release the bus and the chip-select line.
    pub fn free(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    /// Number of inbound bytes discarded before read data starts.
    #[inline]
    pub const fn read_offset() -> usize {
        1 + LATENCY
    }

    /// Write `data` to the register addressed by `command`.
    ///
    /// The command byte's high bit is cleared to select a write.
    pub fn write(&mut self, command: u8, data: u8) -> Result<(), TransportError<SPI, CS>> {
        self.transaction(|spi| {
            exchange(spi, command & WRITE_MASK)?;
            exchange(spi, data)?;
            spi.flush()
        })
    }

    /// Burst-read `buf.len()` registers starting at `register`, in ascending address order.
    pub fn read(&mut self, register: u8, buf: &mut [u8]) -> Result<(), TransportError<SPI, CS>> {
        self.transaction(|spi| {
            let mut skip = Self::read_offset();
            let mut filled = 0;
            let mut out = register;

            for _ in 0..Self::read_offset() + buf.len() {
                let reply = exchange(spi, out)?;
                out = FILL_BYTE;

                if skip > 0 {
                    skip -= 1;
                } else {
                    buf[filled] = reply;
                    filled += 1;
                }
            }

            spi.flush()
        })
    }

    /// Read a single register.
    pub fn read_register(&mut self, register: u8) -> Result<u8, TransportError<SPI, CS>> {
        let mut buf = [0u8; 1];
        self.read(register, &mut buf)?;
        Ok(buf[0])
    }

    /// Run `f` with chip-select asserted. Chip-select is released even when `f` fails.
    fn transaction<R>(
        &mut self,
        f: impl FnOnce(&mut SPI) -> Result<R, SPI::Error>,
    ) -> Result<R, TransportError<SPI, CS>> {
        self.cs.set_low().map_err(Error::ChipSelect)?;
        let result = f(&mut self.spi);
        let released = self.cs.set_high().map_err(Error::ChipSelect);

        let value = result.map_err(Error::Spi)?;
        released?;
        Ok(value)
    }
}

/// Shift one byte out and return the byte shifted in.
#[inline]
fn exchange<SPI: SpiBus<u8>>(spi: &mut SPI, byte: u8) -> Result<u8, SPI::Error> {
    let mut tmp = [byte];
    spi.transfer_in_place(&mut tmp)?;
    Ok(tmp[0])
}
