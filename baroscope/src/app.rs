// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Application context threaded through the main loop.
//!
//! [`App`] owns the scheduler, the tick source, the system hooks and the sensor. Each call to
//! [`App::run_once`] is one main-loop pass: run the cascade, then dispatch whatever events it
//! raised. Blocking sensor waits go through [`SchedulerDelay`] so the watchdog keeps being fed.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use log::{debug, info, warn};

use crate::config::POWER_UP_SETTLE_US;
use crate::drivers::bmx280::{Bmx280, DeviceKind, DriverError, State};
use crate::sched::{
    CronHooks, Event, EventFlags, ScheduleState, Scheduler, SchedulerDelay, TickSource,
};

/// Hardware watchdog fed from the one-second hook.
pub trait Watchdog {
    fn feed(&mut self);
}

/// Cascade hooks of the firmware: feed the watchdog, raise application events.
pub struct SystemHooks<W> {
    watchdog: W,
    events: EventFlags,
}

impl<W: Watchdog> SystemHooks<W> {
    pub fn new(watchdog: W) -> Self {
        Self {
            watchdog,
            events: EventFlags::new(),
        }
    }

    #[inline]
    pub fn watchdog(&self) -> &W {
        &self.watchdog
    }

    #[inline]
    pub fn events(&self) -> &EventFlags {
        &self.events
    }
}

impl<W: Watchdog> CronHooks for SystemHooks<W> {
    fn on_second(&mut self, _state: &ScheduleState) {
        self.watchdog.feed();
        self.events.raise(Event::SampleDue);
    }

    fn on_minute(&mut self, _state: &ScheduleState) {
        self.events.raise(Event::MinuteMark);
    }
}

/// One compensated sample, integer pipeline.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Report {
    /// Temperature in 0.01 °C.
    pub temperature: i32,
    /// Pressure in Pa.
    pub pressure: u32,
}

pub struct App<SPI, CS, T, W, const LATENCY: usize = 0> {
    scheduler: Scheduler,
    ticks: T,
    hooks: SystemHooks<W>,
    sensor: Bmx280<SPI, CS, LATENCY>,
    samples: u32,
    failures: u32,
}

impl<SPI, CS, T, W, const LATENCY: usize> App<SPI, CS, T, W, LATENCY>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    T: TickSource,
    W: Watchdog,
{
    pub fn new(sensor: Bmx280<SPI, CS, LATENCY>, ticks: T, watchdog: W) -> Self {
        Self {
            scheduler: Scheduler::new(),
            ticks,
            hooks: SystemHooks::new(watchdog),
            sensor,
            samples: 0,
            failures: 0,
        }
    }

    /// Let the sensor power up, then identify it and load its calibration.
    ///
    /// A failure is logged and returned; the loop keeps running without sampling.
    pub fn start(&mut self) -> Result<DeviceKind, DriverError<SPI, CS>> {
        let mut delay = SchedulerDelay::new(&mut self.scheduler, &mut self.ticks, &mut self.hooks);
        delay.delay_us(POWER_UP_SETTLE_US);

        let result = self.sensor.initialize(&mut delay);
        if let Err(e) = &result {
            warn!("BMx280: initialization failed: {:?}", e);
        }
        result
    }

    /// One main-loop pass. Returns the report if a sample was taken.
    pub fn run_once(&mut self) -> Option<Report> {
        self.scheduler.run(&mut self.ticks, &mut self.hooks);

        let mut report = None;
        for event in self.hooks.events.drain() {
            match event {
                Event::SampleDue => report = self.sample().or(report),
                Event::MinuteMark => self.uptime(),
            }
        }
        report
    }

    fn sample(&mut self) -> Option<Report> {
        if self.sensor.state() != State::Ready {
            return None;
        }

        let mut delay = SchedulerDelay::new(&mut self.scheduler, &mut self.ticks, &mut self.hooks);
        let reading = self
            .sensor
            .read_temperature(&mut delay)
            .and_then(|temperature| {
                let pressure = self.sensor.read_pressure()?;
                Ok(Report {
                    temperature,
                    pressure,
                })
            });

        match reading {
            Ok(report) => {
                self.samples += 1;
                info!("temp: {} press: {}", report.temperature, report.pressure);
                Some(report)
            }
            Err(e) => {
                self.failures += 1;
                warn!("BMx280: sample failed: {:?}", e);
                None
            }
        }
    }

    fn uptime(&self) {
        let s = self.scheduler.state();
        debug!(
            "uptime {} min ({} ticks), {} samples, {} failures, sensor {:?}",
            s.minutes,
            s.ticks,
            self.samples,
            self.failures,
            self.sensor.state()
        );
    }

    #[inline]
    pub fn schedule(&self) -> &ScheduleState {
        self.scheduler.state()
    }

    #[inline]
    pub fn hooks(&self) -> &SystemHooks<W> {
        &self.hooks
    }

    #[inline]
    pub fn sensor(&self) -> &Bmx280<SPI, CS, LATENCY> {
        &self.sensor
    }

    /// Successful samples so far.
    #[inline]
    pub fn samples(&self) -> u32 {
        self.samples
    }

    #[inline]
    pub fn failures(&self) -> u32 {
        self.failures
    }
}
