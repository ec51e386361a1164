//! Register map and pin-to-register codec.
//!
//! Every feature of the expander has one register per port of eight pins, except for the drive
//! strength which uses two bits per pin and thus two registers per port.  All functions in here
//! are pure; nothing is cached between calls.

/// Number of GPIO pins on the expander.
pub const PIN_COUNT: u8 = 16;

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Regs {
    InputPort0 = 0x00,
    InputPort1 = 0x01,
    OutputPort0 = 0x02,
    OutputPort1 = 0x03,
    PolarityInversion0 = 0x04,
    PolarityInversion1 = 0x05,
    Configuration0 = 0x06,
    Configuration1 = 0x07,
    OutputDriveStrength0Port0 = 0x40,
    OutputDriveStrength1Port0 = 0x41,
    OutputDriveStrength0Port1 = 0x42,
    OutputDriveStrength1Port1 = 0x43,
    InputLatch0 = 0x44,
    InputLatch1 = 0x45,
    PullEnable0 = 0x46,
    PullEnable1 = 0x47,
    PullSelection0 = 0x48,
    PullSelection1 = 0x49,
    InterruptMask0 = 0x4A,
    InterruptMask1 = 0x4B,
    InterruptStatus0 = 0x4C,
    InterruptStatus1 = 0x4D,
    OutputPortConfiguration = 0x4F,
}

impl From<Regs> for u8 {
    fn from(r: Regs) -> u8 {
        r as u8
    }
}

impl Regs {
    /// Whether the register lives in the extended ("Agile I/O") bank.
    pub(crate) fn is_extended(self) -> bool {
        (self as u8) >= 0x40
    }
}

/// A feature backed by one bit per pin, one register per port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Input,
    Output,
    Polarity,
    Direction,
    InputLatch,
    PullEnable,
    PullSelect,
    InterruptMask,
    InterruptStatus,
}

impl Field {
    /// The register holding this field for `port` (0 or 1).
    pub(crate) fn register(self, port: u8) -> Regs {
        let (p0, p1) = match self {
            Field::Input => (Regs::InputPort0, Regs::InputPort1),
            Field::Output => (Regs::OutputPort0, Regs::OutputPort1),
            Field::Polarity => (Regs::PolarityInversion0, Regs::PolarityInversion1),
            Field::Direction => (Regs::Configuration0, Regs::Configuration1),
            Field::InputLatch => (Regs::InputLatch0, Regs::InputLatch1),
            Field::PullEnable => (Regs::PullEnable0, Regs::PullEnable1),
            Field::PullSelect => (Regs::PullSelection0, Regs::PullSelection1),
            Field::InterruptMask => (Regs::InterruptMask0, Regs::InterruptMask1),
            Field::InterruptStatus => (Regs::InterruptStatus0, Regs::InterruptStatus1),
        };
        if port == 0 {
            p0
        } else {
            p1
        }
    }

    pub(crate) fn is_extended(self) -> bool {
        self.register(0).is_extended()
    }
}

pub(crate) fn is_valid_pin(pin: u8) -> bool {
    pin < PIN_COUNT
}

pub(crate) fn port_of(pin: u8) -> u8 {
    pin / 8
}

pub(crate) fn bit_of(pin: u8) -> u8 {
    pin % 8
}

/// Location of a single-bit field: the register and the bit mask inside it.
pub(crate) fn bit_location(field: Field, pin: u8) -> (Regs, u8) {
    (field.register(port_of(pin)), 1 << bit_of(pin))
}

/// Location of a pin's 2-bit drive strength field: the register and the bit offset inside it.
pub(crate) fn drive_strength_location(pin: u8) -> (Regs, u8) {
    let index = bit_of(pin);
    let reg = match (port_of(pin), index >= 4) {
        (0, false) => Regs::OutputDriveStrength0Port0,
        (0, true) => Regs::OutputDriveStrength1Port0,
        (_, false) => Regs::OutputDriveStrength0Port1,
        (_, true) => Regs::OutputDriveStrength1Port1,
    };
    (reg, (index % 4) * 2)
}

/// Set or clear all bits of `mask` in `value`.
pub(crate) fn update_bits(value: u8, mask: u8, set: bool) -> u8 {
    if set {
        value | mask
    } else {
        value & !mask
    }
}

/// Replace the 2-bit field at `offset` in `value` with `level`.
pub(crate) fn update_field2(value: u8, offset: u8, level: u8) -> u8 {
    (value & !(0b11 << offset)) | ((level & 0b11) << offset)
}

/// The byte of a 16-bit pin mask belonging to `port`.
pub(crate) fn port_byte(mask: u16, port: u8) -> u8 {
    (mask >> (8 * port)) as u8
}
