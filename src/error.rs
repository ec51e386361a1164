use core::fmt;

/// Reason a driver operation failed.
///
/// Besides being returned, every error is also recorded in the driver's sticky
/// [`ErrorFlags`], so a caller may issue several operations and check once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Pin index outside `0..16`.
    InvalidPin,
    /// Mask or pin list that cannot be processed.
    InvalidMask,
    /// A register read failed after all retry attempts.
    I2cRead,
    /// A register write failed after all retry attempts.
    I2cWrite,
    /// The operation needs the extended register bank, which this chip does not have.
    UnsupportedFeature,
    /// Requested address outside `0x20..=0x27`.
    InvalidAddress,
}

impl Error {
    /// The sticky flag recording this error.
    pub fn flag(self) -> ErrorFlags {
        match self {
            Error::InvalidPin => ErrorFlags::INVALID_PIN,
            Error::InvalidMask => ErrorFlags::INVALID_MASK,
            Error::I2cRead => ErrorFlags::I2C_READ_FAIL,
            Error::I2cWrite => ErrorFlags::I2C_WRITE_FAIL,
            Error::UnsupportedFeature => ErrorFlags::UNSUPPORTED_FEATURE,
            Error::InvalidAddress => ErrorFlags::INVALID_ADDRESS,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::InvalidPin => "pin index out of range",
            Error::InvalidMask => "invalid pin mask or list",
            Error::I2cRead => "register read failed",
            Error::I2cWrite => "register write failed",
            Error::UnsupportedFeature => "feature not supported by this chip variant",
            Error::InvalidAddress => "address outside 0x20..=0x27",
        };
        f.write_str(msg)
    }
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for Error {}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// Sticky bitmask of error kinds.
///
/// Bits are set by failing operations and stay set until cleared with
/// [`Pcal95555::clear_error_flags()`][crate::Pcal95555::clear_error_flags].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorFlags(u16);

impl ErrorFlags {
    pub const NONE: Self = Self(0);
    pub const INVALID_PIN: Self = Self(1 << 0);
    pub const INVALID_MASK: Self = Self(1 << 1);
    pub const I2C_READ_FAIL: Self = Self(1 << 2);
    pub const I2C_WRITE_FAIL: Self = Self(1 << 3);
    pub const UNSUPPORTED_FEATURE: Self = Self(1 << 4);
    pub const INVALID_ADDRESS: Self = Self(1 << 5);
    pub const ALL: Self = Self(0x003f);

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl core::ops::BitOr for ErrorFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitAnd for ErrorFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl From<Error> for ErrorFlags {
    fn from(e: Error) -> Self {
        e.flag()
    }
}
