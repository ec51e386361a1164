//! Driver for the `PCA9555` and `PCAL9555A` 16-bit I2C I/O expanders.
//!
//! Both chips share the address range `0x20..=0x27` and the basic register set (input, output,
//! polarity inversion, configuration).  The `PCAL9555A` adds an "Agile I/O" bank with pull
//! resistors, drive strength, input latches, interrupt masking and status, and open-drain outputs.
//! The driver finds out which of the two it is talking to on first use, see
//! [`ChipVariant`].
//!
//! The chip can be used directly through [`Pcal95555`]:
//!
//! ```no_run
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! use pcal95555::{Direction, HalBus, Pcal95555};
//!
//! let mut pcal = Pcal95555::new(HalBus::new(i2c), false, false, false);
//! pcal.set_pin_direction(3, Direction::Output).unwrap();
//! pcal.write_pin(3, true).unwrap();
//! let level = pcal.read_pin(12).unwrap();
//! ```
//!
//! or split into `embedded-hal` pin handles after wrapping it in a [`DriverMutex`]:
//!
//! ```no_run
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! use core::cell::RefCell;
//! use pcal95555::{HalBus, Pcal95555};
//!
//! let pcal = RefCell::new(Pcal95555::new(HalBus::new(i2c), false, false, false));
//! let p = pcal95555::split(&pcal);
//! let mut led = p.io0_0.into_output().unwrap();
//! led.set_high().unwrap();
//! ```
//!
//! Every failed operation is returned as an [`Error`] and also recorded in sticky
//! [`ErrorFlags`] which stay set until cleared.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod bus;
mod common;
mod config;
mod driver;
mod error;
mod interrupt;
mod io;
mod multi;
mod mutex;
mod pin;
mod regs;

#[cfg(test)]
mod testing;

pub use bus::{AddressPins, AddressSelect, HalBus, HalBusError, NoAddressPins, Transport};
pub use common::mode;
pub use common::{
    ChipVariant, Direction, DriveStrength, Edge, InterruptState, OutputMode, Polarity,
};
pub use config::Config;
pub use driver::{Pcal95555, BASE_ADDRESS, DEFAULT_RETRIES, MAX_ADDRESS};
pub use error::{Error, ErrorFlags};
pub use interrupt::{InterruptCallback, PinCallback};
pub use multi::{read_multiple, write_multiple, PinLevels};
pub use mutex::DriverMutex;
pub use pin::{split, Parts, Pin};
pub use regs::PIN_COUNT;
