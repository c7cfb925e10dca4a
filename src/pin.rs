use embedded_hal::digital::{self as hal_digital, PinState};
use embedded_hal::i2c::{AddressMode, I2c};

use crate::{DeviceMutex, Error, FaultHandler, Mcp23008};

/// A device handle behind a [`DeviceMutex`].
///
/// This is the synchronization boundary for a handle used from more than one place.  Either
/// run driver operations under the lock with [`lock`](Shared::lock), or hand out the eight
/// port pins with [`split`](Shared::split).
pub struct Shared<M>(M);

impl<I2C, A, F> Shared<core::cell::RefCell<Mcp23008<I2C, A, F>>> {
    pub fn new(mcp: Mcp23008<I2C, A, F>) -> Self {
        Self(core::cell::RefCell::new(mcp))
    }
}

impl<I2C, A, F, M> Shared<M>
where
    I2C: I2c<A>,
    A: AddressMode + Copy,
    F: FaultHandler,
    M: DeviceMutex<Device = Mcp23008<I2C, A, F>>,
{
    pub fn with_mutex(mcp: Mcp23008<I2C, A, F>) -> Self {
        Self(DeviceMutex::create(mcp))
    }

    /// Run `f` with exclusive access to the handle.
    pub fn lock<R>(&self, f: impl FnOnce(&mut Mcp23008<I2C, A, F>) -> R) -> R {
        self.0.lock(f)
    }

    pub fn split(&mut self) -> Parts<'_, M> {
        Parts {
            gp0: Pin::new(0, &self.0),
            gp1: Pin::new(1, &self.0),
            gp2: Pin::new(2, &self.0),
            gp3: Pin::new(3, &self.0),
            gp4: Pin::new(4, &self.0),
            gp5: Pin::new(5, &self.0),
            gp6: Pin::new(6, &self.0),
            gp7: Pin::new(7, &self.0),
        }
    }

    pub fn into_inner(self) -> M {
        self.0
    }
}

/// The eight port pins GP0..GP7.
pub struct Parts<'a, M> {
    pub gp0: Pin<'a, M>,
    pub gp1: Pin<'a, M>,
    pub gp2: Pin<'a, M>,
    pub gp3: Pin<'a, M>,
    pub gp4: Pin<'a, M>,
    pub gp5: Pin<'a, M>,
    pub gp6: Pin<'a, M>,
    pub gp7: Pin<'a, M>,
}

/// Representation of a single port pin.
///
/// `Pin` is not constructed directly, it comes from [`Shared::split`].  Pin direction is part
/// of the IODIR register the handle was set up with; writing a pin configured as an input
/// changes the port register but not the pin level.
pub struct Pin<'a, M> {
    pin: u8,
    device: &'a M,
}

impl<'a, M> Pin<'a, M> {
    fn new(pin: u8, device: &'a M) -> Self {
        Self { pin, device }
    }

    pub fn pin_number(&self) -> u8 {
        self.pin
    }
}

impl<'a, I2C, A, F, M> Pin<'a, M>
where
    I2C: I2c<A>,
    A: AddressMode + Copy,
    F: FaultHandler,
    M: DeviceMutex<Device = Mcp23008<I2C, A, F>>,
{
    pub fn set_state(&mut self, state: PinState) -> Result<(), Error<I2C::Error>> {
        self.device.lock(|mcp| mcp.write_pin(self.pin, state))
    }

    pub fn set_high(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_state(PinState::High)
    }

    pub fn set_low(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_state(PinState::Low)
    }

    pub fn is_high(&self) -> Result<bool, Error<I2C::Error>> {
        self.device.lock(|mcp| mcp.read_pin(self.pin))
    }

    pub fn is_low(&self) -> Result<bool, Error<I2C::Error>> {
        self.is_high().map(|b| !b)
    }
}

impl<'a, I2C, A, F, M> hal_digital::ErrorType for Pin<'a, M>
where
    I2C: I2c<A>,
    A: AddressMode + Copy,
    F: FaultHandler,
    M: DeviceMutex<Device = Mcp23008<I2C, A, F>>,
{
    type Error = Error<I2C::Error>;
}

impl<'a, I2C, A, F, M> hal_digital::OutputPin for Pin<'a, M>
where
    I2C: I2c<A>,
    A: AddressMode + Copy,
    F: FaultHandler,
    M: DeviceMutex<Device = Mcp23008<I2C, A, F>>,
{
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Pin::set_low(self)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Pin::set_high(self)
    }

    fn set_state(&mut self, state: PinState) -> Result<(), Self::Error> {
        Pin::set_state(self, state)
    }
}

impl<'a, I2C, A, F, M> hal_digital::InputPin for Pin<'a, M>
where
    I2C: I2c<A>,
    A: AddressMode + Copy,
    F: FaultHandler,
    M: DeviceMutex<Device = Mcp23008<I2C, A, F>>,
{
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Pin::is_high(self)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Pin::is_low(self)
    }
}
