// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MCU-level wrappers: SPI, USART, SysTick, IWDG and the board pin map.

pub mod pins;
pub mod spi;
pub mod systick;
pub mod usart;
pub mod watchdog;

pub use pins::BoardPins;
pub use spi::{ChipSelect, SpiBus};
pub use systick::SysTickSource;
pub use usart::Usart;
pub use watchdog::Iwdg;
