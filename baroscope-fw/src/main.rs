// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # baroscope firmware
//!
//! Nucleo-F767ZI bring-up for the `baroscope` sampler: SysTick drives the scheduler at 100 kHz,
//! SPI1 talks to the BMx280, USART3 carries the log, and the IWDG is fed once per second.
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release -p baroscope-fw
//! ```

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
    spi::{Mode, Phase, Polarity, Spi},
};
use stm32f7xx_hal as hal;

use baroscope::{App, Bmx280, Transport};

mod config;
mod hw;
mod logger;

use hw::{BoardPins, ChipSelect, Iwdg, SpiBus, Usart};

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let mut apb2 = rcc.apb2;

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOD);

    // USART3 (ST-LINK VCP) as log sink
    let usart_cfg = Config {
        baud_rate: config::LOG_BAUD.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        dp.USART3,
        (pins.usart3.tx, pins.usart3.rx),
        &clocks,
        usart_cfg,
    );
    logger::init(Usart::new(serial), config::LOG_LEVEL);
    log::info!("baroscope: sysclk {} Hz", clocks.sysclk().raw());

    // SPI1, mode 0, BMx280 on CS D10
    let spi_mode = Mode {
        polarity: Polarity::IdleLow,
        phase: Phase::CaptureOnFirstTransition,
    };
    let spi1 = Spi::new(dp.SPI1, (pins.spi1.sck, pins.spi1.miso, pins.spi1.mosi)).enable::<u8>(
        spi_mode,
        config::SPI_HZ.Hz(),
        &clocks,
        &mut apb2,
    );
    let cs = ChipSelect::active_low(pins.spi1.cs);
    let sensor: Bmx280<_, _> = Bmx280::new(Transport::new(SpiBus::new(spi1), cs));

    // Time base and watchdog
    let ticks = hw::systick::start(cp.SYST, clocks.sysclk().raw(), config::TICK_HZ);
    let watchdog = Iwdg::start(dp.IWDG, config::WATCHDOG_TIMEOUT_MS);

    let mut app = App::new(sensor, ticks, watchdog);
    // Failure is already logged; the loop still runs so the watchdog stays fed.
    let _ = app.start();

    loop {
        app.run_once();
    }
}
