//! Operations on lists of pins with an individual value per pin.
//!
//! The usual method of setting multiple pins
//!
//! ```no_run
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! # let mut pcal = pcal95555::Pcal95555::new(pcal95555::HalBus::new(i2c), false, false, false);
//! pcal.write_pin(0, true).unwrap();
//! pcal.write_pin(2, false).unwrap();
//! pcal.write_pin(9, true).unwrap();
//! ```
//!
//! does one read-modify-write per pin.  The list-based operations in here instead read each
//! affected register once, fold in every list entry belonging to it and write it back once, so the
//! cost depends on the number of ports touched, not on the number of pins:
//!
//! ```no_run
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! # let mut pcal = pcal95555::Pcal95555::new(pcal95555::HalBus::new(i2c), false, false, false);
//! pcal.write_pins(&[(0, true), (2, false), (9, true)]).unwrap();
//! ```
//!
//! Every pin of a list is validated before the first transfer, so a list containing an invalid
//! pin changes nothing.  Later entries for the same pin win over earlier ones.
use crate::regs::{self, Field, Regs};
use crate::{Direction, DriveStrength, Error, InterruptState, Pcal95555, Polarity, Transport};

/// Levels returned by [`Pcal95555::read_pins()`].
pub type PinLevels = heapless::Vec<(u8, bool), { regs::PIN_COUNT as usize }>;

impl<T: Transport> Pcal95555<T> {
    fn check_pins<V>(&mut self, list: &[(u8, V)]) -> Result<(), Error> {
        for (pin, _) in list {
            self.check_pin(*pin)?;
        }
        Ok(())
    }

    fn fold_bits<V: Copy>(
        &mut self,
        field: Field,
        list: &[(u8, V)],
        bit: impl Fn(V) -> bool,
    ) -> Result<(), Error> {
        self.check_pins(list)?;
        self.prepare(field.is_extended())?;

        for port in 0..2 {
            let mut entries = list
                .iter()
                .filter(|(pin, _)| regs::port_of(*pin) == port)
                .peekable();
            if entries.peek().is_none() {
                continue;
            }

            let reg = field.register(port);
            let mut value = self.read_register(reg)?;
            for &(pin, v) in entries {
                value = regs::update_bits(value, 1 << regs::bit_of(pin), bit(v));
            }
            self.write_register(reg, value)?;
        }
        Ok(())
    }

    /// Set the output latches of several pins, each to its own level.
    pub fn write_pins(&mut self, list: &[(u8, bool)]) -> Result<(), Error> {
        self.fold_bits(Field::Output, list, |high| high)
    }

    /// Read the levels of several pins, with one register read per port involved.
    ///
    /// The result holds one `(pin, level)` entry per requested pin, in request order.  Lists
    /// longer than 16 entries are rejected with [`Error::InvalidMask`].
    pub fn read_pins(&mut self, pins: &[u8]) -> Result<PinLevels, Error> {
        if pins.len() > regs::PIN_COUNT as usize {
            return Err(self.fail(Error::InvalidMask));
        }
        for pin in pins {
            self.check_pin(*pin)?;
        }
        self.prepare(false)?;

        let mut ports = [0x00; 2];
        for port in 0..2u8 {
            if pins.iter().any(|pin| regs::port_of(*pin) == port) {
                ports[port as usize] = self.read_register(Field::Input.register(port))?;
            }
        }

        let mut levels = PinLevels::new();
        for &pin in pins {
            let high = ports[regs::port_of(pin) as usize] & (1 << regs::bit_of(pin)) != 0;
            // Cannot overflow, the length was checked above.
            let _ = levels.push((pin, high));
        }
        Ok(levels)
    }

    pub fn set_directions(&mut self, list: &[(u8, Direction)]) -> Result<(), Error> {
        self.fold_bits(Field::Direction, list, Direction::bit)
    }

    pub fn set_polarities(&mut self, list: &[(u8, Polarity)]) -> Result<(), Error> {
        self.fold_bits(Field::Polarity, list, Polarity::bit)
    }

    pub fn set_pull_enables(&mut self, list: &[(u8, bool)]) -> Result<(), Error> {
        self.fold_bits(Field::PullEnable, list, |enable| enable)
    }

    /// `true` selects the pull-up, `false` the pull-down.
    pub fn set_pull_directions(&mut self, list: &[(u8, bool)]) -> Result<(), Error> {
        self.fold_bits(Field::PullSelect, list, |pull_up| pull_up)
    }

    pub fn enable_input_latches(&mut self, list: &[(u8, bool)]) -> Result<(), Error> {
        self.fold_bits(Field::InputLatch, list, |enable| enable)
    }

    pub fn configure_interrupts(&mut self, list: &[(u8, InterruptState)]) -> Result<(), Error> {
        self.fold_bits(Field::InterruptMask, list, InterruptState::mask_bit)
    }

    /// Set the drive strength of several pins, with one read-modify-write per drive strength
    /// register involved (each holds four pins).
    pub fn set_drive_strengths(&mut self, list: &[(u8, DriveStrength)]) -> Result<(), Error> {
        self.check_pins(list)?;
        self.prepare(true)?;

        for reg in [
            Regs::OutputDriveStrength0Port0,
            Regs::OutputDriveStrength1Port0,
            Regs::OutputDriveStrength0Port1,
            Regs::OutputDriveStrength1Port1,
        ] {
            let mut entries = list
                .iter()
                .map(|&(pin, level)| (regs::drive_strength_location(pin), level))
                .filter(|((r, _), _)| *r == reg)
                .peekable();
            if entries.peek().is_none() {
                continue;
            }

            let mut value = self.read_register(reg)?;
            for ((_, offset), level) in entries {
                value = regs::update_field2(value, offset, level as u8);
            }
            self.write_register(reg, value)?;
        }
        Ok(())
    }
}

/// Set multiple pin handles at the same time.
///
/// All pins must belong to the same driver.  The driver is locked once and the levels are applied
/// with [`Pcal95555::write_pins()`].
///
/// ## Example
/// ```no_run
/// # use core::cell::RefCell;
/// # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
/// # let pcal = RefCell::new(pcal95555::Pcal95555::new(pcal95555::HalBus::new(i2c), false, false, false));
/// let p = pcal95555::split(&pcal);
/// let mut io0 = p.io0_0.into_output().unwrap();
/// let mut io1 = p.io0_1.into_output().unwrap();
/// pcal95555::write_multiple([&mut io0, &mut io1], [true, false]).unwrap();
/// ```
pub fn write_multiple<T, M, MODE: crate::mode::HasOutput, const N: usize>(
    pins: [&mut crate::Pin<'_, MODE, M>; N],
    states: [bool; N],
) -> Result<(), Error>
where
    T: Transport,
    M: crate::DriverMutex<Driver = Pcal95555<T>>,
{
    if N == 0 {
        return Ok(());
    }

    let mut list = [(0u8, false); N];
    let driver = pins[0].driver();
    for ((pin, state), entry) in pins.iter().zip(states.iter()).zip(list.iter_mut()) {
        assert!(core::ptr::eq(pin.driver(), driver));
        *entry = (pin.pin_number(), *state);
    }

    driver.lock(|drv| drv.write_pins(&list))
}

/// Read multiple pin handles at the same time.
///
/// When the expander raises an interrupt it might be important to find out which input was
/// responsible as quickly as possible _and_ by checking all inputs at once.  This reads every
/// port involved only once.
///
/// ## Example
/// ```no_run
/// # use core::cell::RefCell;
/// # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
/// # let pcal = RefCell::new(pcal95555::Pcal95555::new(pcal95555::HalBus::new(i2c), false, false, false));
/// let p = pcal95555::split(&pcal);
/// let values = pcal95555::read_multiple([&p.io0_0, &p.io1_0]).unwrap();
/// if values[0] {
///     // ...
/// } else if values[1] {
///     // ...
/// }
/// ```
pub fn read_multiple<T, M, MODE: crate::mode::HasInput, const N: usize>(
    pins: [&crate::Pin<'_, MODE, M>; N],
) -> Result<[bool; N], Error>
where
    T: Transport,
    M: crate::DriverMutex<Driver = Pcal95555<T>>,
{
    let mut ret = [false; N];
    if N == 0 {
        return Ok(ret);
    }

    let mut numbers = [0u8; N];
    let driver = pins[0].driver();
    for (pin, number) in pins.iter().zip(numbers.iter_mut()) {
        assert!(core::ptr::eq(pin.driver(), driver));
        *number = pin.pin_number();
    }

    let levels = driver.lock(|drv| drv.read_pins(&numbers))?;
    for (state, (_, level)) in ret.iter_mut().zip(levels.iter()) {
        *state = *level;
    }
    Ok(ret)
}
