use core::marker::PhantomData;
use embedded_hal::digital as hal_digital;

use crate::{Direction, DriverMutex, Error, Pcal95555, Polarity, Transport};

/// Representation of an expander pin.
///
/// `Pin` is not constructed directly, this type is created by wrapping the driver in a
/// [`DriverMutex`] and then getting access to all its pins using [`split()`].
pub struct Pin<'a, MODE, M> {
    pin: u8,
    driver: &'a M,
    _m: PhantomData<MODE>,
}

impl<'a, MODE, M> Pin<'a, MODE, M> {
    pub(crate) fn new(pin: u8, driver: &'a M) -> Self {
        Self {
            pin,
            driver,
            _m: PhantomData,
        }
    }

    /// Number of this pin, `0..=15`.
    pub fn pin_number(&self) -> u8 {
        self.pin
    }

    /// Mutex holding the driver this pin belongs to.
    pub fn driver(&self) -> &'a M {
        self.driver
    }

    fn into_mode<NEW>(self) -> Pin<'a, NEW, M> {
        Pin::new(self.pin, self.driver)
    }
}

impl<'a, MODE, M, T> Pin<'a, MODE, M>
where
    T: Transport,
    M: DriverMutex<Driver = Pcal95555<T>>,
{
    pub fn into_input(self) -> Result<Pin<'a, crate::mode::Input, M>, Error> {
        self.driver
            .lock(|drv| drv.set_pin_direction(self.pin, Direction::Input))?;
        Ok(self.into_mode())
    }

    /// Turn the pin into an output driving low.
    ///
    /// The output latch is cleared before the direction changes so the pin never drives a stale
    /// level.
    pub fn into_output(self) -> Result<Pin<'a, crate::mode::Output, M>, Error> {
        self.driver.lock(|drv| {
            drv.write_pin(self.pin, false)?;
            drv.set_pin_direction(self.pin, Direction::Output)
        })?;
        Ok(self.into_mode())
    }

    /// Turn the pin into an output driving high.
    pub fn into_output_high(self) -> Result<Pin<'a, crate::mode::Output, M>, Error> {
        self.driver.lock(|drv| {
            drv.write_pin(self.pin, true)?;
            drv.set_pin_direction(self.pin, Direction::Output)
        })?;
        Ok(self.into_mode())
    }
}

impl<'a, MODE: crate::mode::HasInput, M, T> Pin<'a, MODE, M>
where
    T: Transport,
    M: DriverMutex<Driver = Pcal95555<T>>,
{
    pub fn is_high(&self) -> Result<bool, Error> {
        self.driver.lock(|drv| drv.read_pin(self.pin))
    }

    pub fn is_low(&self) -> Result<bool, Error> {
        self.is_high().map(|high| !high)
    }

    /// Turn on or off polarity inversion for this input.
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), Error> {
        let polarity = if inverted {
            Polarity::Inverted
        } else {
            Polarity::Normal
        };
        self.driver
            .lock(|drv| drv.set_pin_polarity(self.pin, polarity))
    }

    pub fn into_inverted(mut self, inverted: bool) -> Result<Self, Error> {
        self.set_inverted(inverted)?;
        Ok(self)
    }
}

impl<'a, MODE: crate::mode::HasOutput, M, T> Pin<'a, MODE, M>
where
    T: Transport,
    M: DriverMutex<Driver = Pcal95555<T>>,
{
    pub fn set_high(&mut self) -> Result<(), Error> {
        self.driver.lock(|drv| drv.write_pin(self.pin, true))
    }

    pub fn set_low(&mut self) -> Result<(), Error> {
        self.driver.lock(|drv| drv.write_pin(self.pin, false))
    }

    pub fn is_set_high(&self) -> Result<bool, Error> {
        self.driver.lock(|drv| drv.is_set_high(self.pin))
    }

    pub fn is_set_low(&self) -> Result<bool, Error> {
        self.is_set_high().map(|high| !high)
    }

    pub fn toggle(&mut self) -> Result<(), Error> {
        self.driver.lock(|drv| drv.toggle_pin(self.pin))
    }
}

impl<'a, MODE, M> hal_digital::ErrorType for Pin<'a, MODE, M> {
    type Error = Error;
}

impl<'a, MODE: crate::mode::HasInput, M, T> hal_digital::InputPin for Pin<'a, MODE, M>
where
    T: Transport,
    M: DriverMutex<Driver = Pcal95555<T>>,
{
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Pin::is_high(self)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Pin::is_low(self)
    }
}

impl<'a, MODE: crate::mode::HasOutput, M, T> hal_digital::OutputPin for Pin<'a, MODE, M>
where
    T: Transport,
    M: DriverMutex<Driver = Pcal95555<T>>,
{
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Pin::set_low(self)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Pin::set_high(self)
    }
}

impl<'a, MODE: crate::mode::HasOutput, M, T> hal_digital::StatefulOutputPin
    for Pin<'a, MODE, M>
where
    T: Transport,
    M: DriverMutex<Driver = Pcal95555<T>>,
{
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Pin::is_set_high(self)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Pin::is_set_low(self)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        Pin::toggle(self)
    }
}

/// Get handles for all 16 pins of the driver inside `driver`.
///
/// All pins start out in input mode without touching the chip, matching its power-on state.
pub fn split<T, M>(driver: &M) -> Parts<'_, M>
where
    T: Transport,
    M: DriverMutex<Driver = Pcal95555<T>>,
{
    Parts {
        io0_0: Pin::new(0, driver),
        io0_1: Pin::new(1, driver),
        io0_2: Pin::new(2, driver),
        io0_3: Pin::new(3, driver),
        io0_4: Pin::new(4, driver),
        io0_5: Pin::new(5, driver),
        io0_6: Pin::new(6, driver),
        io0_7: Pin::new(7, driver),
        io1_0: Pin::new(8, driver),
        io1_1: Pin::new(9, driver),
        io1_2: Pin::new(10, driver),
        io1_3: Pin::new(11, driver),
        io1_4: Pin::new(12, driver),
        io1_5: Pin::new(13, driver),
        io1_6: Pin::new(14, driver),
        io1_7: Pin::new(15, driver),
    }
}

pub struct Parts<'a, M> {
    pub io0_0: Pin<'a, crate::mode::Input, M>,
    pub io0_1: Pin<'a, crate::mode::Input, M>,
    pub io0_2: Pin<'a, crate::mode::Input, M>,
    pub io0_3: Pin<'a, crate::mode::Input, M>,
    pub io0_4: Pin<'a, crate::mode::Input, M>,
    pub io0_5: Pin<'a, crate::mode::Input, M>,
    pub io0_6: Pin<'a, crate::mode::Input, M>,
    pub io0_7: Pin<'a, crate::mode::Input, M>,
    pub io1_0: Pin<'a, crate::mode::Input, M>,
    pub io1_1: Pin<'a, crate::mode::Input, M>,
    pub io1_2: Pin<'a, crate::mode::Input, M>,
    pub io1_3: Pin<'a, crate::mode::Input, M>,
    pub io1_4: Pin<'a, crate::mode::Input, M>,
    pub io1_5: Pin<'a, crate::mode::Input, M>,
    pub io1_6: Pin<'a, crate::mode::Input, M>,
    pub io1_7: Pin<'a, crate::mode::Input, M>,
}
