// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Bosch BMx280 (BMP280 / BME280) pressure and temperature sensor over SPI.
//!
//! The driver walks the sensor through identify → calibrate → trigger → poll → collect, then hands
//! the raw sample to one of the two compensation pipelines in [`compensation`].
//!
//! Reads come in pairs. `read_temperature` (or `read_temperature_precise`) triggers a fresh forced
//! conversion and latches the raw sample together with that pipeline's fine temperature;
//! `read_pressure` (or `read_pressure_precise`) reuses the latch. Asking for pressure before the
//! matching temperature read of the current cycle is an error rather than a stale value.
//!
//! Status polling is unbounded. If the sensor never clears its measuring bit the loop spins until
//! the independent watchdog resets the MCU.

pub mod calibration;
pub mod compensation;

pub use calibration::{Calibration, CALIBRATION_LEN};
pub use compensation::FineTemperature;

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiBus};
use log::{debug, info, warn};

use crate::config::{MeasurementConfig, DATA_SETTLE_US, REGISTER_SETTLE_US};
use crate::transport::{Transport, TransportError};

// Register addresses
pub mod reg {
    pub const CALIB_00: u8 = 0x88;
    pub const ID: u8 = 0xD0;
    pub const RESET: u8 = 0xE0;
    pub const CALIB_26: u8 = 0xE1;
    pub const CTRL_HUM: u8 = 0xF2;
    pub const STATUS: u8 = 0xF3;
    pub const CTRL_MEAS: u8 = 0xF4;
    pub const CONFIG: u8 = 0xF5;
    pub const PRESS_MSB: u8 = 0xF7;

    /// `status.measuring`: a conversion is running.
    pub const STATUS_MEASURING: u8 = 1 << 3;
    /// `status.im_update`: NVM data is being copied to image registers.
    pub const STATUS_IM_UPDATE: u8 = 1 << 0;

    /// Writing this to `RESET` performs a power-on reset.
    pub const RESET_VALUE: u8 = 0xB6;

    pub const BMP280_ID: u8 = 0x58;
    pub const BME280_ID: u8 = 0x60;
}

/// Length of the pressure + temperature data burst (`press_msb` .. `temp_xlsb`).
pub const DATA_LEN: usize = 6;

/// Datasheet start-up time after a soft reset.
const RESET_SETTLE_US: u32 = 2_000;

/// `status` register.
#[derive(Copy, Clone, Debug)]
pub struct Status {
    raw: u8,
}

impl Status {
    #[inline]
    pub fn raw(&self) -> u8 {
        self.raw
    }

    /// A conversion is running; result registers are not yet updated.
    #[inline]
    pub fn measuring(&self) -> bool {
        (self.raw & reg::STATUS_MEASURING) != 0
    }

    /// Calibration NVM is being copied.
    #[inline]
    pub fn im_update(&self) -> bool {
        (self.raw & reg::STATUS_IM_UPDATE) != 0
    }
}

/// Sensor variant, from the `id` register.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DeviceKind {
    Unknown,
    Bmp280,
    Bme280,
}

impl DeviceKind {
    pub fn from_id(id: u8) -> Self {
        match id {
            reg::BMP280_ID => DeviceKind::Bmp280,
            reg::BME280_ID => DeviceKind::Bme280,
            _ => DeviceKind::Unknown,
        }
    }
}

/// Driver life cycle.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum State {
    Uninitialized,
    /// Identification failed. Terminal for the session.
    Unsupported,
    Ready,
    Measuring,
}

/// One triggered measurement: 20-bit ADC values.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RawSample {
    pub pressure: i32,
    pub temperature: i32,
}

impl RawSample {
    /// Unpack `press_msb, press_lsb, press_xlsb, temp_msb, temp_lsb, temp_xlsb`.
    pub fn from_bytes(buf: &[u8; DATA_LEN]) -> Self {
        let adc20 = |b: &[u8]| ((b[0] as i32) << 12) | ((b[1] as i32) << 4) | ((b[2] as i32) >> 4);
        Self {
            pressure: adc20(&buf[0..3]),
            temperature: adc20(&buf[3..6]),
        }
    }
}

/// Fine temperature latched by the last temperature read, tagged with its pipeline.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Latch {
    Integer(FineTemperature),
    Float(FineTemperature),
}

/// Error type for `Bmx280` operations.
#[derive(Debug, thiserror_no_std::Error)]
pub enum Error<E> {
    /// Register transport failure.
    #[error("bus error: {0:?}")]
    Bus(E),
    /// Identification returned an id outside {0x58, 0x60}.
    #[error("unsupported chip id {0:#04x}")]
    UnsupportedDevice(u8),
    /// The device was rejected earlier in this session.
    #[error("device was rejected at identification")]
    Unsupported,
    /// `initialize` has not succeeded yet.
    #[error("device not initialized")]
    NotInitialized,
    /// A measurement is already outstanding.
    #[error("measurement in progress")]
    Busy,
    /// Pressure was requested before the paired temperature read of this cycle.
    #[error("temperature not read in this measurement cycle")]
    TemperatureNotRead,
}

/// Error type produced by a `Bmx280` over `SPI` and `CS`.
pub type DriverError<SPI, CS> = Error<TransportError<SPI, CS>>;

/// BMx280 driver. Owns its transport; one instance per sensor.
pub struct Bmx280<SPI, CS, const LATENCY: usize = 0> {
    transport: Transport<SPI, CS, LATENCY>,
    config: MeasurementConfig,
    kind: DeviceKind,
    state: State,
    calibration: Option<Calibration>,
    raw: Option<RawSample>,
    latch: Option<Latch>,
}

impl<SPI, CS, const LATENCY: usize> Bmx280<SPI, CS, LATENCY>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    /// Construct an uninitialized driver with the default x1/x1 forced configuration.
    pub fn new(transport: Transport<SPI, CS, LATENCY>) -> Self {
        Self::with_config(transport, MeasurementConfig::default())
    }

    pub fn with_config(transport: Transport<SPI, CS, LATENCY>, config: MeasurementConfig) -> Self {
        Self {
            transport,
            config,
            kind: DeviceKind::Unknown,
            state: State::Uninitialized,
            calibration: None,
            raw: None,
            latch: None,
        }
    }

    /// Release the transport.
    pub fn free(self) -> Transport<SPI, CS, LATENCY> {
        self.transport
    }

    #[inline]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    #[inline]
    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// Identify the sensor and load its calibration.
    ///
    /// An unrecognised id moves the driver to `Unsupported` for the rest of the session and skips
    /// the calibration read.
    pub fn initialize<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<DeviceKind, DriverError<SPI, CS>> {
        match self.state {
            State::Uninitialized => {}
            State::Ready => return Ok(self.kind),
            State::Unsupported => return Err(Error::Unsupported),
            State::Measuring => return Err(Error::Busy),
        }

        let id = self.transport.read_register(reg::ID).map_err(Error::Bus)?;
        delay.delay_us(REGISTER_SETTLE_US);

        let kind = DeviceKind::from_id(id);
        if kind == DeviceKind::Unknown {
            warn!("BMx280: unsupported chip id {:#04x}, sampling disabled", id);
            self.state = State::Unsupported;
            return Err(Error::UnsupportedDevice(id));
        }

        let mut block = [0u8; CALIBRATION_LEN];
        self.transport
            .read(reg::CALIB_00, &mut block)
            .map_err(Error::Bus)?;
        delay.delay_us(REGISTER_SETTLE_US);

        let calibration = Calibration::from_bytes(&block);
        debug!("BMx280: {:?}", calibration);

        self.kind = kind;
        self.calibration = Some(calibration);
        self.state = State::Ready;
        info!("BMx280: detected {:?} (id {:#04x})", kind, id);

        Ok(kind)
    }

    /// Soft-reset the sensor. The next `initialize` identifies it again.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DriverError<SPI, CS>> {
        match self.state {
            State::Unsupported => return Err(Error::Unsupported),
            State::Measuring => return Err(Error::Busy),
            State::Uninitialized | State::Ready => {}
        }

        self.transport
            .write(reg::RESET, reg::RESET_VALUE)
            .map_err(Error::Bus)?;
        delay.delay_us(RESET_SETTLE_US);

        self.kind = DeviceKind::Unknown;
        self.state = State::Uninitialized;
        self.calibration = None;
        self.raw = None;
        self.latch = None;
        Ok(())
    }

    /// Read the `status` register.
    pub fn read_status(&mut self) -> Result<Status, DriverError<SPI, CS>> {
        let raw = self
            .transport
            .read_register(reg::STATUS)
            .map_err(Error::Bus)?;
        Ok(Status { raw })
    }

    /// Trigger one forced conversion and collect the raw pressure/temperature block.
    ///
    /// Clears the latch of the previous cycle.
    pub fn sample<D: DelayNs>(&mut self, delay: &mut D) -> Result<RawSample, DriverError<SPI, CS>> {
        self.ensure_ready()?;

        self.state = State::Measuring;
        self.raw = None;
        self.latch = None;
        let result = self.measure(delay);
        self.state = State::Ready;

        let raw = result?;
        self.raw = Some(raw);
        Ok(raw)
    }

    fn measure<D: DelayNs>(&mut self, delay: &mut D) -> Result<RawSample, DriverError<SPI, CS>> {
        self.transport
            .write(reg::CTRL_MEAS, self.config.ctrl_meas())
            .map_err(Error::Bus)?;
        delay.delay_us(REGISTER_SETTLE_US);

        while self.read_status()?.measuring() {}
        delay.delay_us(DATA_SETTLE_US);

        let mut buf = [0u8; DATA_LEN];
        self.transport
            .read(reg::PRESS_MSB, &mut buf)
            .map_err(Error::Bus)?;
        Ok(RawSample::from_bytes(&buf))
    }

    /// Measure and return the temperature in 0.01 °C.
    pub fn read_temperature<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<i32, DriverError<SPI, CS>> {
        let raw = self.sample(delay)?;
        let (centi, fine) = self.ready_calibration()?.compensate_temperature(raw.temperature);
        self.latch = Some(Latch::Integer(fine));
        Ok(centi)
    }

    /// Pressure in Pa from the cycle opened by the last `read_temperature`.
    pub fn read_pressure(&self) -> Result<u32, DriverError<SPI, CS>> {
        let calibration = self.ready_calibration()?;
        match (self.raw, self.latch) {
            (Some(raw), Some(Latch::Integer(fine))) => {
                Ok(calibration.compensate_pressure(raw.pressure, fine))
            }
            _ => Err(Error::TemperatureNotRead),
        }
    }

    /// Measure and return the temperature in °C.
    pub fn read_temperature_precise<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<f64, DriverError<SPI, CS>> {
        let raw = self.sample(delay)?;
        let (celsius, fine) = self
            .ready_calibration()?
            .compensate_temperature_f64(raw.temperature);
        self.latch = Some(Latch::Float(fine));
        Ok(celsius)
    }

    /// Pressure in Pa from the cycle opened by the last `read_temperature_precise`.
    pub fn read_pressure_precise(&self) -> Result<f64, DriverError<SPI, CS>> {
        let calibration = self.ready_calibration()?;
        match (self.raw, self.latch) {
            (Some(raw), Some(Latch::Float(fine))) => {
                Ok(calibration.compensate_pressure_f64(raw.pressure, fine))
            }
            _ => Err(Error::TemperatureNotRead),
        }
    }

    fn ensure_ready(&self) -> Result<(), DriverError<SPI, CS>> {
        match self.state {
            State::Ready => Ok(()),
            State::Measuring => Err(Error::Busy),
            State::Unsupported => Err(Error::Unsupported),
            State::Uninitialized => Err(Error::NotInitialized),
        }
    }

    fn ready_calibration(&self) -> Result<&Calibration, DriverError<SPI, CS>> {
        self.ensure_ready()?;
        self.calibration.as_ref().ok_or(Error::NotInitialized)
    }
}
