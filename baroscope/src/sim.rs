// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Simulated BMx280 behind an SPI bus, for tests.
//!
//! The model keeps a 256-byte register file with the sensor's auto-increment, answers status
//! polls with the measuring bit for a configurable number of reads after a forced trigger, and
//! can delay its replies by a fixed number of bus cycles to mimic a FIFO-backed SPI peripheral.

use core::cell::RefCell;
use core::convert::Infallible;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::{digital, spi};

use crate::drivers::bmx280::reg;

const DUMMY: u8 = 0xFF;

/// Datasheet worked-example calibration (BMP280 datasheet, section 3.12).
pub const DATASHEET_CALIBRATION: [u8; 24] = calibration_bytes(
    27504,
    26435,
    -1000,
    [36477, -10685, 3024, 2855, 140, -7, 15500, -14600, 6000],
);

/// Datasheet worked-example raw readings.
pub const DATASHEET_ADC_T: i32 = 519888;
pub const DATASHEET_ADC_P: i32 = 415148;

/// Encode coefficients into the 24-byte little-endian calibration block.
pub const fn calibration_bytes(t1: u16, t2: i16, t3: i16, p: [i32; 9]) -> [u8; 24] {
    let mut out = [0u8; 24];
    let words = [
        t1, t2 as u16, t3 as u16, p[0] as u16, p[1] as u16, p[2] as u16, p[3] as u16, p[4] as u16,
        p[5] as u16, p[6] as u16, p[7] as u16, p[8] as u16,
    ];
    let mut i = 0;
    while i < words.len() {
        out[2 * i] = words[i] as u8;
        out[2 * i + 1] = (words[i] >> 8) as u8;
        i += 1;
    }
    out
}

/// Encode a 20-bit pressure/temperature pair as the 6-byte data block at `0xF7`.
pub fn data_block(adc_p: i32, adc_t: i32) -> [u8; 6] {
    [
        (adc_p >> 12) as u8,
        (adc_p >> 4) as u8,
        ((adc_p & 0x0F) << 4) as u8,
        (adc_t >> 12) as u8,
        (adc_t >> 4) as u8,
        ((adc_t & 0x0F) << 4) as u8,
    ]
}

#[derive(Copy, Clone)]
enum Phase {
    Address,
    Reading(u8),
    Writing(u8),
}

struct Model {
    regs: [u8; 256],
    selected: bool,
    phase: Phase,
    latency: usize,
    in_flight: VecDeque<u8>,
    busy_polls: u32,
    busy_remaining: u32,
    triggers: u32,
    resets: u32,
    transactions: usize,
    bytes_clocked: usize,
    read_starts: Vec<u8>,
    bus_fault: bool,
}

impl Model {
    fn select(&mut self) {
        self.selected = true;
        self.phase = Phase::Address;
        self.in_flight = core::iter::repeat(DUMMY).take(self.latency).collect();
        self.transactions += 1;
    }

    fn deselect(&mut self) {
        self.selected = false;
    }

    fn exchange(&mut self, out: u8) -> u8 {
        assert!(self.selected, "byte clocked with chip-select released");
        self.bytes_clocked += 1;

        let reply = match self.phase {
            Phase::Address => {
                let register = out | 0x80;
                if out & 0x80 != 0 {
                    self.read_starts.push(register);
                    self.phase = Phase::Reading(register);
                } else {
                    self.phase = Phase::Writing(register);
                }
                DUMMY
            }
            Phase::Reading(register) => {
                self.phase = Phase::Reading(register.wrapping_add(1));
                self.read_register(register)
            }
            Phase::Writing(register) => {
                self.phase = Phase::Writing(register.wrapping_add(1));
                self.write_register(register, out);
                DUMMY
            }
        };

        self.in_flight.push_back(reply);
        self.in_flight.pop_front().unwrap_or(DUMMY)
    }

    fn read_register(&mut self, register: u8) -> u8 {
        if register == reg::STATUS {
            if self.busy_remaining > 0 {
                self.busy_remaining -= 1;
                return reg::STATUS_MEASURING;
            }
            return 0x00;
        }
        self.regs[register as usize]
    }

    fn write_register(&mut self, register: u8, value: u8) {
        match register {
            reg::CTRL_MEAS if value & 0x03 == 0x01 || value & 0x03 == 0x02 => {
                self.triggers += 1;
                self.busy_remaining = self.busy_polls;
            }
            reg::RESET if value == reg::RESET_VALUE => self.resets += 1,
            _ => {}
        }
        self.regs[register as usize] = value;
    }
}

/// Handle to a simulated sensor. Clone-free inspection stays possible after `split`.
pub struct SimulatedSensor {
    model: Rc<RefCell<Model>>,
}

impl SimulatedSensor {
    pub fn new() -> Self {
        Self {
            model: Rc::new(RefCell::new(Model {
                regs: [0; 256],
                selected: false,
                phase: Phase::Address,
                latency: 0,
                in_flight: VecDeque::new(),
                busy_polls: 0,
                busy_remaining: 0,
                triggers: 0,
                resets: 0,
                transactions: 0,
                bytes_clocked: 0,
                read_starts: Vec::new(),
                bus_fault: false,
            })),
        }
    }

    /// A BMP280 loaded with the datasheet worked example.
    pub fn datasheet() -> Self {
        let sim = Self::new();
        sim.set_registers(reg::ID, &[reg::BMP280_ID]);
        sim.set_registers(reg::CALIB_00, &DATASHEET_CALIBRATION);
        sim.set_registers(
            reg::PRESS_MSB,
            &data_block(DATASHEET_ADC_P, DATASHEET_ADC_T),
        );
        sim
    }

    pub fn with_latency(self, latency: usize) -> Self {
        self.model.borrow_mut().latency = latency;
        self
    }

    /// Number of status reads that report "measuring" after each forced trigger.
    pub fn with_busy_polls(self, polls: u32) -> Self {
        self.model.borrow_mut().busy_polls = polls;
        self
    }

    pub fn set_registers(&self, start: u8, values: &[u8]) {
        let mut model = self.model.borrow_mut();
        for (i, v) in values.iter().enumerate() {
            model.regs[start as usize + i] = *v;
        }
    }

    pub fn register(&self, register: u8) -> u8 {
        self.model.borrow().regs[register as usize]
    }

    pub fn split(&self) -> (SimBus, SimCs) {
        (
            SimBus {
                model: self.model.clone(),
            },
            SimCs {
                model: self.model.clone(),
            },
        )
    }

    /// Like `split`, but the bus fails every transfer while a fault is injected.
    pub fn split_faulty(&self) -> (FaultyBus, SimCs) {
        let (inner, cs) = self.split();
        (FaultyBus { inner }, cs)
    }

    pub fn inject_bus_fault(&self, fault: bool) {
        self.model.borrow_mut().bus_fault = fault;
    }

    pub fn selected(&self) -> bool {
        self.model.borrow().selected
    }

    pub fn transactions(&self) -> usize {
        self.model.borrow().transactions
    }

    pub fn bytes_clocked(&self) -> usize {
        self.model.borrow().bytes_clocked
    }

    pub fn triggers(&self) -> u32 {
        self.model.borrow().triggers
    }

    pub fn resets(&self) -> u32 {
        self.model.borrow().resets
    }

    pub fn pending_busy_polls(&self) -> u32 {
        self.model.borrow().busy_remaining
    }

    /// Start addresses of every read transaction so far.
    pub fn read_starts(&self) -> Vec<u8> {
        self.model.borrow().read_starts.clone()
    }
}

/// SPI side of the simulated sensor.
pub struct SimBus {
    model: Rc<RefCell<Model>>,
}

impl spi::ErrorType for SimBus {
    type Error = Infallible;
}

impl spi::SpiBus<u8> for SimBus {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        for w in words.iter_mut() {
            *w = self.model.borrow_mut().exchange(0x00);
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        for w in words {
            self.model.borrow_mut().exchange(*w);
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        let len = read.len().max(write.len());
        for i in 0..len {
            let out = write.get(i).copied().unwrap_or(0x00);
            let reply = self.model.borrow_mut().exchange(out);
            if let Some(slot) = read.get_mut(i) {
                *slot = reply;
            }
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        for w in words.iter_mut() {
            *w = self.model.borrow_mut().exchange(*w);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Chip-select side of the simulated sensor.
pub struct SimCs {
    model: Rc<RefCell<Model>>,
}

impl digital::ErrorType for SimCs {
    type Error = Infallible;
}

impl digital::OutputPin for SimCs {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.model.borrow_mut().select();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.model.borrow_mut().deselect();
        Ok(())
    }
}

/// SPI bus on which every transfer fails with an overrun.
pub struct FailingBus;

impl spi::ErrorType for FailingBus {
    type Error = spi::ErrorKind;
}

impl spi::SpiBus<u8> for FailingBus {
    fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
        Err(spi::ErrorKind::Overrun)
    }

    fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> {
        Err(spi::ErrorKind::Overrun)
    }

    fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
        Err(spi::ErrorKind::Overrun)
    }

    fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
        Err(spi::ErrorKind::Overrun)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// `SimBus` that reports an overrun instead of clocking while a fault is injected.
pub struct FaultyBus {
    inner: SimBus,
}

impl FaultyBus {
    fn check(&self) -> Result<(), spi::ErrorKind> {
        if self.inner.model.borrow().bus_fault {
            Err(spi::ErrorKind::Overrun)
        } else {
            Ok(())
        }
    }
}

impl spi::ErrorType for FaultyBus {
    type Error = spi::ErrorKind;
}

impl spi::SpiBus<u8> for FaultyBus {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.check()?;
        spi::SpiBus::read(&mut self.inner, words).map_err(|e| match e {})
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.check()?;
        spi::SpiBus::write(&mut self.inner, words).map_err(|e| match e {})
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.check()?;
        spi::SpiBus::transfer(&mut self.inner, read, write).map_err(|e| match e {})
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.check()?;
        spi::SpiBus::transfer_in_place(&mut self.inner, words).map_err(|e| match e {})
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
