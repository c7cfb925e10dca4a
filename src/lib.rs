//! Driver for the Microchip MCP23008 8-bit I2C GPIO expander.
//!
//! The device handle mirrors the nine writable registers in memory, pushes them to the chip on
//! [`Mcp23008::initialize`] and then reads or writes single registers and port pins.  Bus
//! contention (lost arbitration, refused address) is retried; any other failure is a
//! peripheral fault, reported through a [`FaultHandler`] and returned as an [`Error`].
#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod bus;
mod config;
mod driver;
mod error;
mod fault;
mod mutex;
mod pin;
mod regs;

#[cfg(feature = "async")]
pub mod asynch;

pub use bus::is_transient;
pub use config::{Config, RetryPolicy};
pub use driver::Mcp23008;
pub use error::{Error, Fault, FaultKind};
pub use fault::{FaultHandler, IgnoreFaults, PanicOnFault};
pub use mutex::DeviceMutex;
pub use pin::{Parts, Pin, Shared};
pub use regs::{address_from_pins, Iocon, Register, Registers};

#[cfg(feature = "async")]
pub use asynch::Mcp23008Async;
