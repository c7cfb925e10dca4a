use embedded_hal::i2c::{self, ErrorKind};

use crate::Register;

/// Failure of a driver operation.
///
/// Every variant is a peripheral fault: the device state is unknown and the operation should
/// not be retried blindly.  Transient bus contention never shows up here, it is retried inside
/// the driver according to its [`RetryPolicy`](crate::RetryPolicy).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The transport failed with a non-transient error.
    Bus { register: Register, source: E },
    /// A bounded retry policy ran out while the bus kept reporting contention.
    RetriesExhausted { register: Register, source: E },
    /// Read attempted while the shadow IOCON has sequential operation enabled.
    SequentialMode { register: Register },
    /// Pin index outside of `0..=7`.
    InvalidPin(u8),
}

/// Summary of a peripheral fault, handed to the [`FaultHandler`](crate::FaultHandler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fault {
    pub kind: FaultKind,
    /// Register whose access failed, if any.
    pub register: Option<Register>,
}

impl Fault {
    /// Code identifying the MCP23008 peripheral class in a host's fault log.
    pub const CODE: u16 = 0x2308;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    Bus(ErrorKind),
    RetriesExhausted,
    SequentialMode,
    InvalidPin,
}

impl<E: i2c::Error> Error<E> {
    pub fn fault(&self) -> Fault {
        match self {
            Error::Bus { register, source } => Fault {
                kind: FaultKind::Bus(source.kind()),
                register: Some(*register),
            },
            Error::RetriesExhausted { register, .. } => Fault {
                kind: FaultKind::RetriesExhausted,
                register: Some(*register),
            },
            Error::SequentialMode { register } => Fault {
                kind: FaultKind::SequentialMode,
                register: Some(*register),
            },
            Error::InvalidPin(_) => Fault {
                kind: FaultKind::InvalidPin,
                register: None,
            },
        }
    }
}

impl<E: core::fmt::Debug> embedded_hal::digital::Error for Error<E> {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Bus { register, source } => {
                write!(f, "bus error accessing {:?}: {:?}", register, source)
            }
            Error::RetriesExhausted { register, source } => {
                write!(f, "gave up retrying {:?}: {:?}", register, source)
            }
            Error::SequentialMode { register } => write!(
                f,
                "cannot read {:?} while sequential operation is enabled",
                register
            ),
            Error::InvalidPin(pin) => write!(f, "pin {} out of range", pin),
        }
    }
}
