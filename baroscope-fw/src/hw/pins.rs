// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the Nucleo-F767ZI carrying a BMx280 breakout on the Arduino header.
//!
//! | Signal | Pin | Header |
//! | ------ | --- | ------ |
//! | USART3 TX / RX | PD8 / PD9 | ST-LINK VCP |
//! | SPI1 SCK / MISO / MOSI | PA5 / PA6 / PA7 | D13 / D12 / D11 |
//! | BMx280 CSB | PD14 | D10 |

use stm32f7xx_hal::{
    gpio::{gpioa, gpiod, Alternate, Output, PushPull},
    pac,
    prelude::*,
};

pub struct BoardPins {
    pub usart3: Usart3Pins,
    pub spi1: Spi1Pins,
}

pub struct Usart3Pins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

/// SPI1 SCK/MISO/MOSI and the sensor's CS
pub struct Spi1Pins {
    pub sck: gpioa::PA5<Alternate<5>>,
    pub miso: gpioa::PA6<Alternate<5>>,
    pub mosi: gpioa::PA7<Alternate<5>>,
    pub cs: gpiod::PD14<Output<PushPull>>,
}

impl BoardPins {
    pub fn new(gpioa: pac::GPIOA, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpiod = gpiod.split();

        Self {
            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },

            spi1: Spi1Pins {
                sck: gpioa.pa5.into_alternate::<5>(),
                miso: gpioa.pa6.into_alternate::<5>(),
                mosi: gpioa.pa7.into_alternate::<5>(),
                cs: gpiod.pd14.into_push_pull_output(),
            },
        }
    }
}
