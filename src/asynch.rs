//! Async variant of the driver on top of `embedded-hal-async`.
//!
//! Only built with the `async` feature.  [`Mcp23008Async`] has the same register framing,
//! retry policy, shadow handling and fault reporting as the blocking [`Mcp23008`](crate::Mcp23008);
//! every method must be `.await`ed.
//!
//! ```ignore
//! let mut mcp = Mcp23008Async::new(i2c, mcp23008::address_from_pins(false, false, false), regs);
//! mcp.initialize().await?;
//! mcp.write_pin(3, PinState::High).await?;
//! ```
use embedded_hal::digital::PinState;
use embedded_hal::i2c::{AddressMode, SevenBitAddress};
use embedded_hal_async::i2c::I2c;

use crate::bus::Attempts;
use crate::{Config, Error, FaultHandler, IgnoreFaults, Register, Registers, RetryPolicy};

/// Async `MCP23008` handle.
pub struct Mcp23008Async<I2C, A = SevenBitAddress, F = IgnoreFaults> {
    i2c: I2C,
    addr: A,
    regs: Registers,
    config: Config,
    faults: F,
}

impl<I2C, A: AddressMode + Copy> Mcp23008Async<I2C, A> {
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

impl<I2C, A: AddressMode + Copy, F> Mcp23008Async<I2C, A, F> {
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn with_fault_handler<H: FaultHandler>(self, faults: H) -> Mcp23008Async<I2C, A, H> {
        Mcp23008Async {
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

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, A, F> Mcp23008Async<I2C, A, F>
where
    I2C: I2c<A>,
    A: AddressMode + Copy,
    F: FaultHandler,
{
    pub async fn initialize(&mut self) -> Result<(), Error<I2C::Error>> {
        for reg in Register::INIT_ORDER {
            if let Some(value) = self.regs.get(reg) {
                self.write_register(reg, value).await?;
            }
        }
        Ok(())
    }

    pub async fn write_register(
        &mut self,
        reg: Register,
        value: u8,
    ) -> Result<(), Error<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("MCP23008 write {:?} = {:#x}", reg, value);
        let res = self.transmit(reg, &[reg.into(), value]).await;
        self.check(res)?;
        self.regs.set(reg, value);
        Ok(())
    }

    pub async fn read_register(&mut self, reg: Register) -> Result<u8, Error<I2C::Error>> {
        if !self.regs.sequential_disabled() {
            return self.check(Err(Error::SequentialMode { register: reg }));
        }
        let res = match self.transmit(reg, &[reg.into()]).await {
            Ok(()) => self.receive(reg).await,
            Err(e) => Err(e),
        };
        let value = self.check(res)?;
        #[cfg(feature = "defmt")]
        defmt::debug!("MCP23008 read {:?} = {:#x}", reg, value);
        Ok(value)
    }

    pub async fn write_pin(&mut self, pin: u8, state: PinState) -> Result<(), Error<I2C::Error>> {
        self.check_pin(pin)?;
        let port = self.read_register(Register::GPIO).await?;
        let port = crate::regs::apply_pin(port, pin, state == PinState::High);
        self.write_register(Register::GPIO, port).await
    }

    pub async fn read_pin(&mut self, pin: u8) -> Result<bool, Error<I2C::Error>> {
        self.check_pin(pin)?;
        Ok(self.read_register(Register::GPIO).await? & (1 << pin) != 0)
    }

    pub async fn read_interrupt_flags(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_register(Register::INTF).await
    }

    pub async fn read_interrupt_capture(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_register(Register::INTCAP).await
    }

    async fn transmit(&mut self, reg: Register, buf: &[u8]) -> Result<(), Error<I2C::Error>> {
        let mut attempts = Attempts::new(self.config.retry, reg);
        loop {
            match self.i2c.write(self.addr, buf).await {
                Ok(()) => return Ok(()),
                Err(e) => attempts.failed(e)?,
            }
        }
    }

    async fn receive(&mut self, reg: Register) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0x00];
        let mut attempts = Attempts::new(self.config.retry, reg);
        loop {
            match self.i2c.read(self.addr, &mut buf).await {
                Ok(()) => return Ok(buf[0]),
                Err(e) => attempts.failed(e)?,
            }
        }
    }

    fn check_pin(&mut self, pin: u8) -> Result<(), Error<I2C::Error>> {
        if pin > 7 {
            return self.check(Err(Error::InvalidPin(pin)));
        }
        Ok(())
    }

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
