//! Blocking driver for the MCP23008.
//!
//! The handle keeps a shadow copy of every writable register.  [`Mcp23008::initialize`] pushes
//! the whole shadow to the device, afterwards single registers or pins are updated on demand.
//!
//! Reads use a one-byte pointer write followed by a separate one-byte read, which is only
//! correct while IOCON.SEQOP is set (sequential operation disabled).  The driver checks this
//! against the shadow IOCON before touching the bus.
use embedded_hal::digital::PinState;
use embedded_hal::i2c::{AddressMode, I2c, SevenBitAddress};

use crate::bus::I2cExt;
use crate::{Config, Error, FaultHandler, IgnoreFaults, Register, Registers, RetryPolicy};

/// `MCP23008` "8-Bit I/O Expander with Serial Interface" on an I2C bus.
///
/// The transport is borrowed by passing `&mut I2C` or a shared-bus device for buses with
/// several peripherals.  There is no locking inside the handle, use [`Shared`](crate::Shared)
/// when more than one context needs it.
pub struct Mcp23008<I2C, A = SevenBitAddress, F = IgnoreFaults> {
    i2c: I2C,
    addr: A,
    regs: Registers,
    config: Config,
    faults: F,
}

impl<I2C, A: AddressMode + Copy> Mcp23008<I2C, A> {
    /// Create a handle for the device at `addr`, with the desired register values in `regs`.
    ///
    /// Nothing is sent until [`initialize`](Mcp23008::initialize) is called.
    pub fn new(i2c: I2C, addr: A, regs: Registers) -> Self {
        Self {
            i2c,
            addr,
            regs,
            config: Config::new(),
            faults: IgnoreFaults,
        }
    }
}

impl<I2C, A: AddressMode + Copy, F> Mcp23008<I2C, A, F> {
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    /// Replace the fault handler, see [`FaultHandler`].
    pub fn with_fault_handler<H: FaultHandler>(self, faults: H) -> Mcp23008<I2C, A, H> {
        Mcp23008 {
            i2c: self.i2c,
            addr: self.addr,
            regs: self.regs,
            config: self.config,
            faults,
        }
    }

    pub fn address(&self) -> A {
        self.addr
    }

    /// The shadow registers, i.e. the last values successfully written (or the initial ones).
    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Give back the transport.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, A, F> Mcp23008<I2C, A, F>
where
    I2C: I2c<A>,
    A: AddressMode + Copy,
    F: FaultHandler,
{
    /// Push all shadow registers to the device.
    ///
    /// Stops at the first failing register, earlier writes stay in effect.
    pub fn initialize(&mut self) -> Result<(), Error<I2C::Error>> {
        for reg in Register::INIT_ORDER {
            // INIT_ORDER only holds writable registers
            if let Some(value) = self.regs.get(reg) {
                self.write_register(reg, value)?;
            }
        }
        Ok(())
    }

    /// Write `value` to `reg` and, once the device acknowledged it, to the shadow.
    ///
    /// Writes to the read-only INTF and INTCAP go out on the bus but have no shadow.
    pub fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("MCP23008 write {:?} = {:#x}", reg, value);
        let res = self.i2c.write_reg(self.addr, reg, value, self.config.retry);
        self.check(res)?;
        self.regs.set(reg, value);
        Ok(())
    }

    /// Read the live value of `reg` from the device.  The shadow is not touched.
    pub fn read_register(&mut self, reg: Register) -> Result<u8, Error<I2C::Error>> {
        if !self.regs.sequential_disabled() {
            return self.check(Err(Error::SequentialMode { register: reg }));
        }
        let res = self.i2c.read_reg(self.addr, reg, self.config.retry);
        let value = self.check(res)?;
        #[cfg(feature = "defmt")]
        defmt::debug!("MCP23008 read {:?} = {:#x}", reg, value);
        Ok(value)
    }

    /// Drive a single port pin, leaving the other seven as the device currently has them.
    ///
    /// This is a read-modify-write of GPIO: the port is read from the device, not the shadow.
    pub fn write_pin(&mut self, pin: u8, state: PinState) -> Result<(), Error<I2C::Error>> {
        self.check_pin(pin)?;
        let port = self.read_register(Register::GPIO)?;
        let port = crate::regs::apply_pin(port, pin, state == PinState::High);
        self.write_register(Register::GPIO, port)
    }

    /// Whether `pin` currently reads high on the port.
    pub fn read_pin(&mut self, pin: u8) -> Result<bool, Error<I2C::Error>> {
        self.check_pin(pin)?;
        Ok(self.read_register(Register::GPIO)? & (1 << pin) != 0)
    }

    /// Pins which caused the pending interrupt.
    pub fn read_interrupt_flags(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_register(Register::INTF)
    }

    /// Port state captured when the interrupt occurred.  Reading it clears the interrupt.
    pub fn read_interrupt_capture(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_register(Register::INTCAP)
    }

    fn check_pin(&mut self, pin: u8) -> Result<(), Error<I2C::Error>> {
        if pin > 7 {
            return self.check(Err(Error::InvalidPin(pin)));
        }
        Ok(())
    }

    /// Report a failed operation to the fault handler before handing it to the caller.
    fn check<T>(&mut self, res: Result<T, Error<I2C::Error>>) -> Result<T, Error<I2C::Error>> {
        if let Err(e) = &res {
            let fault = e.fault();
            #[cfg(feature = "defmt")]
            defmt::error!("MCP23008 fault: {:?}", fault);
            self.faults.report_fatal_fault(fault);
        }
        res
    }
}
