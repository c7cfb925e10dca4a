use embedded_hal::i2c::{self, AddressMode, ErrorKind, I2c, NoAcknowledgeSource};

use crate::{Error, Register, RetryPolicy};

/// Whether a bus error is momentary contention that goes away by repeating the transaction.
///
/// Lost arbitration and a refused address are transient.  Controllers which cannot tell which
/// byte was not acknowledged report `Unknown`, that is treated like a refused address.
pub fn is_transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::ArbitrationLoss
            | ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            | ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown)
    )
}

/// Attempt bookkeeping for one bus transaction.
pub(crate) struct Attempts {
    policy: RetryPolicy,
    register: Register,
    failed: u32,
}

impl Attempts {
    pub(crate) fn new(policy: RetryPolicy, register: Register) -> Self {
        Self {
            policy,
            register,
            failed: 0,
        }
    }

    /// Classify a failed attempt: `Ok(())` means try again, `Err` ends the transaction.
    pub(crate) fn failed<E: i2c::Error>(&mut self, e: E) -> Result<(), Error<E>> {
        self.failed = self.failed.saturating_add(1);
        let register = self.register;
        if !is_transient(e.kind()) {
            return Err(Error::Bus {
                register,
                source: e,
            });
        }
        if !self.policy.allows(self.failed) {
            return Err(Error::RetriesExhausted {
                register,
                source: e,
            });
        }
        #[cfg(feature = "defmt")]
        defmt::trace!(
            "MCP23008 {:?}: transient {:?}, retry #{}",
            register,
            e.kind(),
            self.failed
        );
        Ok(())
    }
}

/// Register framing on top of a raw I2C transport, with retries.
pub(crate) trait I2cExt<A: AddressMode> {
    type Error;

    /// Write `[reg, value]` as a single transaction.
    fn write_reg(
        &mut self,
        addr: A,
        reg: Register,
        value: u8,
        retry: RetryPolicy,
    ) -> Result<(), Error<Self::Error>>;

    /// Point the device at `reg` with a one-byte write, then read one byte back.
    ///
    /// The two transactions are retried independently.
    fn read_reg(
        &mut self,
        addr: A,
        reg: Register,
        retry: RetryPolicy,
    ) -> Result<u8, Error<Self::Error>>;
}

impl<A: AddressMode + Copy, I2C: I2c<A>> I2cExt<A> for I2C {
    type Error = I2C::Error;

    fn write_reg(
        &mut self,
        addr: A,
        reg: Register,
        value: u8,
        retry: RetryPolicy,
    ) -> Result<(), Error<Self::Error>> {
        let buf = [reg.into(), value];
        let mut attempts = Attempts::new(retry, reg);
        loop {
            match self.write(addr, &buf) {
                Ok(()) => return Ok(()),
                Err(e) => attempts.failed(e)?,
            }
        }
    }

    fn read_reg(
        &mut self,
        addr: A,
        reg: Register,
        retry: RetryPolicy,
    ) -> Result<u8, Error<Self::Error>> {
        let pointer = [reg.into()];
        let mut attempts = Attempts::new(retry, reg);
        loop {
            match self.write(addr, &pointer) {
                Ok(()) => break,
                Err(e) => attempts.failed(e)?,
            }
        }

        let mut buf = [0x00];
        let mut attempts = Attempts::new(retry, reg);
        loop {
            match self.read(addr, &mut buf) {
                Ok(()) => return Ok(buf[0]),
                Err(e) => attempts.failed(e)?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c as mock_i2c;

    const NAK: ErrorKind = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address);
    const ADDRESS: u8 = 0x20;

    #[test]
    fn classification() {
        assert!(is_transient(NAK));
        assert!(is_transient(ErrorKind::ArbitrationLoss));
        assert!(is_transient(ErrorKind::NoAcknowledge(
            NoAcknowledgeSource::Unknown
        )));
        assert!(!is_transient(ErrorKind::NoAcknowledge(
            NoAcknowledgeSource::Data
        )));
        assert!(!is_transient(ErrorKind::Bus));
        assert!(!is_transient(ErrorKind::Overrun));
        assert!(!is_transient(ErrorKind::Other));
    }

    #[test]
    fn write_framing() {
        let expectations = [mock_i2c::Transaction::write(ADDRESS, vec![0x0a, 0x5a])];
        let mut bus = mock_i2c::Mock::new(&expectations);

        bus.write_reg(ADDRESS, Register::OLAT, 0x5a, RetryPolicy::Unbounded)
            .unwrap();

        bus.done();
    }

    #[test]
    fn read_framing_is_split() {
        let expectations = [
            mock_i2c::Transaction::write(ADDRESS, vec![0x09]),
            mock_i2c::Transaction::read(ADDRESS, vec![0xa5]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let value = bus
            .read_reg(ADDRESS, Register::GPIO, RetryPolicy::Unbounded)
            .unwrap();
        assert_eq!(value, 0xa5);

        bus.done();
    }

    #[test]
    fn read_retries_each_half() {
        let expectations = [
            mock_i2c::Transaction::write(ADDRESS, vec![0x09]).with_error(NAK),
            mock_i2c::Transaction::write(ADDRESS, vec![0x09]),
            mock_i2c::Transaction::read(ADDRESS, vec![0x00]).with_error(ErrorKind::ArbitrationLoss),
            mock_i2c::Transaction::read(ADDRESS, vec![0x00]).with_error(NAK),
            mock_i2c::Transaction::read(ADDRESS, vec![0x42]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let value = bus
            .read_reg(ADDRESS, Register::GPIO, RetryPolicy::Bounded { attempts: 3 })
            .unwrap();
        assert_eq!(value, 0x42);

        bus.done();
    }

    #[test]
    fn bounded_retry_gives_up() {
        let expectations = [
            mock_i2c::Transaction::write(ADDRESS, vec![0x00, 0xff]).with_error(NAK),
            mock_i2c::Transaction::write(ADDRESS, vec![0x00, 0xff]).with_error(NAK),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let err = bus
            .write_reg(ADDRESS, Register::IODIR, 0xff, RetryPolicy::Bounded { attempts: 2 })
            .unwrap_err();
        assert_eq!(
            err,
            Error::RetriesExhausted {
                register: Register::IODIR,
                source: NAK,
            }
        );

        bus.done();
    }

    #[test]
    fn fatal_error_stops_immediately() {
        let expectations =
            [mock_i2c::Transaction::write(ADDRESS, vec![0x06]).with_error(ErrorKind::Bus)];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let err = bus
            .read_reg(ADDRESS, Register::GPPU, RetryPolicy::Unbounded)
            .unwrap_err();
        assert_eq!(
            err,
            Error::Bus {
                register: Register::GPPU,
                source: ErrorKind::Bus,
            }
        );

        bus.done();
    }
}
