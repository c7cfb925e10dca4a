//! Register map of the MCP23008 "8-Bit I/O Expander with Serial Interface"
//!
//! Datasheet: https://ww1.microchip.com/downloads/en/DeviceDoc/MCP23008-MCP23S08-Data-Sheet-20001919F.pdf

use bitflags::bitflags;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// IODIR: input/output direction: 0=output; 1=input
    IODIR = 0x00,
    /// IPOL: input polarity: 0=register values match input pins; 1=opposite
    IPOL = 0x01,
    /// GPINTEN: interrupt-on-change: 0=disable; 1=enable
    GPINTEN = 0x02,
    /// DEFVAL: default values for interrupt-on-change
    DEFVAL = 0x03,
    /// INTCON: interrupt-on-change config: 0=compare to previous pin value;
    ///   1=compare to corresponding bit in DEFVAL
    INTCON = 0x04,
    /// IOCON: configuration register, see [`Iocon`]
    IOCON = 0x05,
    /// GPPU: weak internal pull-ups on each pin (when configured as an input)
    GPPU = 0x06,
    /// INTF: interrupt flags (read-only): 1=corresponding pin caused interrupt
    INTF = 0x07,
    /// INTCAP: interrupt captured value (read-only): value of each pin at the time
    ///   it caused an interrupt
    INTCAP = 0x08,
    /// GPIO: reflects logic level on pins
    GPIO = 0x09,
    /// OLAT: output latches: sets state for pins configured as outputs
    OLAT = 0x0a,
}

impl Register {
    /// Registers written by initialization, in the order they go out on the bus.
    pub const INIT_ORDER: [Register; 9] = [
        Register::IODIR,
        Register::IPOL,
        Register::GPINTEN,
        Register::DEFVAL,
        Register::INTCON,
        Register::IOCON,
        Register::GPPU,
        Register::GPIO,
        Register::OLAT,
    ];

    pub fn is_read_only(self) -> bool {
        matches!(self, Register::INTF | Register::INTCAP)
    }
}

impl From<Register> for u8 {
    fn from(r: Register) -> u8 {
        r as u8
    }
}

bitflags! {
    /// Bits of the IOCON configuration register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Iocon: u8 {
        /// Interrupt pin is 0=active-low or 1=active-high
        const INTPOL = 0b0000_0010;
        /// Interrupt pin is an open-drain output (overrides INTPOL)
        const ODR = 0b0000_0100;
        /// Hardware address enable, only meaningful on the SPI variant
        const HAEN = 0b0000_1000;
        /// Disables slew rate control on SDA
        const DISSLW = 0b0001_0000;
        /// Sequential operation *disabled*: the address pointer does not increment.
        ///
        /// Must be set for register reads through this driver.
        const SEQOP = 0b0010_0000;
    }
}

/// In-memory shadow of every writable register.
///
/// These are the values the device is meant to hold.  They match the device only after
/// [`Mcp23008::initialize`](crate::Mcp23008::initialize) or a successful register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Registers {
    pub iodir: u8,
    pub ipol: u8,
    pub gpinten: u8,
    pub defval: u8,
    pub intcon: u8,
    pub iocon: u8,
    pub gppu: u8,
    pub gpio: u8,
    pub olat: u8,
}

impl Registers {
    /// Shadow value for `reg`, `None` for the read-only INTF and INTCAP.
    pub fn get(&self, reg: Register) -> Option<u8> {
        Some(match reg {
            Register::IODIR => self.iodir,
            Register::IPOL => self.ipol,
            Register::GPINTEN => self.gpinten,
            Register::DEFVAL => self.defval,
            Register::INTCON => self.intcon,
            Register::IOCON => self.iocon,
            Register::GPPU => self.gppu,
            Register::GPIO => self.gpio,
            Register::OLAT => self.olat,
            Register::INTF | Register::INTCAP => return None,
        })
    }

    /// Update the shadow value for `reg`.  Read-only registers have no shadow and are ignored.
    pub(crate) fn set(&mut self, reg: Register, value: u8) {
        let slot = match reg {
            Register::IODIR => &mut self.iodir,
            Register::IPOL => &mut self.ipol,
            Register::GPINTEN => &mut self.gpinten,
            Register::DEFVAL => &mut self.defval,
            Register::INTCON => &mut self.intcon,
            Register::IOCON => &mut self.iocon,
            Register::GPPU => &mut self.gppu,
            Register::GPIO => &mut self.gpio,
            Register::OLAT => &mut self.olat,
            Register::INTF | Register::INTCAP => return,
        };
        *slot = value;
    }

    pub fn iocon(&self) -> Iocon {
        Iocon::from_bits_retain(self.iocon)
    }

    /// Whether single-byte reads are safe, i.e. the address pointer does not auto-increment.
    pub fn sequential_disabled(&self) -> bool {
        self.iocon().contains(Iocon::SEQOP)
    }
}

/// Seven-bit bus address for the given state of the A0..A2 hardware address pins.
pub fn address_from_pins(a0: bool, a1: bool, a2: bool) -> u8 {
    0x20 | ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8)
}

/// Port register value after driving pin `pin` (0..=7) to `high`, other bits untouched.
pub(crate) fn apply_pin(port: u8, pin: u8, high: bool) -> u8 {
    let mask = 1u8 << pin;
    if high {
        port | mask
    } else {
        port & !mask
    }
}
