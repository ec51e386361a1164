use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

/// Byte-level register access to a device on a shared bus.
///
/// The driver is generic over this trait and only ever issues single-byte register transfers
/// through it.  [`HalBus`] implements it for any `embedded-hal` I2C bus; custom transports can
/// implement it directly.
///
/// The optional capabilities have default implementations returning `None`, which the driver
/// treats as "not supported by this transport" rather than as a failure.
pub trait Transport {
    type Error: core::fmt::Debug;

    /// Write the single byte `value` to `register` of the device at `address`.
    fn write_register(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Fill `data` from the device at `address`, starting at `register`.
    fn read_register(
        &mut self,
        address: u8,
        register: u8,
        data: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Make sure the bus itself is usable before the first transfer.
    fn ensure_ready(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Drive the A0..A2 address-select lines of the expander.
    fn set_address_pins(
        &mut self,
        _a0: bool,
        _a1: bool,
        _a2: bool,
    ) -> Option<Result<(), Self::Error>> {
        None
    }

    /// Arm notification on the expander's INT line.
    ///
    /// Once armed, the transport's notification context is expected to call
    /// [`Pcal95555::handle_interrupt()`][crate::Pcal95555::handle_interrupt] on the driver,
    /// serialized with all other driver access (see [`DriverMutex`][crate::DriverMutex]).
    fn listen_interrupts(&mut self) -> Option<Result<(), Self::Error>> {
        None
    }
}

/// Address-select lines which may or may not be wired to the host.
pub trait AddressSelect {
    type Error: core::fmt::Debug;

    fn select(&mut self, a0: bool, a1: bool, a2: bool) -> Option<Result<(), Self::Error>>;
}

/// Address-select lines are strapped in hardware.
pub struct NoAddressPins;

impl AddressSelect for NoAddressPins {
    type Error = core::convert::Infallible;

    fn select(&mut self, _a0: bool, _a1: bool, _a2: bool) -> Option<Result<(), Self::Error>> {
        None
    }
}

/// Address-select lines driven from three host GPIOs.
pub struct AddressPins<A0, A1, A2> {
    a0: A0,
    a1: A1,
    a2: A2,
}

impl<A0, A1, A2, E> AddressSelect for AddressPins<A0, A1, A2>
where
    A0: OutputPin<Error = E>,
    A1: OutputPin<Error = E>,
    A2: OutputPin<Error = E>,
    E: core::fmt::Debug,
{
    type Error = E;

    fn select(&mut self, a0: bool, a1: bool, a2: bool) -> Option<Result<(), Self::Error>> {
        let mut drive = || -> Result<(), E> {
            self.a0.set_state(a0.into())?;
            self.a1.set_state(a1.into())?;
            self.a2.set_state(a2.into())?;
            Ok(())
        };
        Some(drive())
    }
}

/// Errors of a [`HalBus`]: either the I2C bus or the address-select GPIOs failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalBusError<I, P> {
    I2c(I),
    AddressPin(P),
}

/// [`Transport`] over an `embedded-hal` I2C bus.
pub struct HalBus<I2C, PINS = NoAddressPins> {
    i2c: I2C,
    pins: PINS,
}

impl<I2C: I2c> HalBus<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            pins: NoAddressPins,
        }
    }
}

impl<I2C, A0, A1, A2> HalBus<I2C, AddressPins<A0, A1, A2>>
where
    I2C: I2c,
{
    /// Create a transport which also controls the expander's address-select lines.
    pub fn with_address_pins(i2c: I2C, a0: A0, a1: A1, a2: A2) -> Self {
        Self {
            i2c,
            pins: AddressPins { a0, a1, a2 },
        }
    }
}

impl<I2C, PINS> HalBus<I2C, PINS> {
    /// Release the underlying bus and pins.
    pub fn release(self) -> (I2C, PINS) {
        (self.i2c, self.pins)
    }
}

impl<I2C, PINS> Transport for HalBus<I2C, PINS>
where
    I2C: I2c,
    PINS: AddressSelect,
{
    type Error = HalBusError<I2C::Error, PINS::Error>;

    fn write_register(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c
            .write(address, &[register, value])
            .map_err(HalBusError::I2c)
    }

    fn read_register(
        &mut self,
        address: u8,
        register: u8,
        data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c
            .write_read(address, &[register], data)
            .map_err(HalBusError::I2c)
    }

    fn set_address_pins(
        &mut self,
        a0: bool,
        a1: bool,
        a2: bool,
    ) -> Option<Result<(), Self::Error>> {
        self.pins
            .select(a0, a1, a2)
            .map(|r| r.map_err(HalBusError::AddressPin))
    }
}
