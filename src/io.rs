//! Single-pin and mask-based pin operations.
//!
//! Single-pin operations do one read-modify-write of the register holding the pin.  Mask-based
//! operations apply the same value to every pin selected by a 16-bit mask, with one read and one
//! write for each port that has at least one selected pin.
use crate::config::output_mode_bits;
use crate::regs::{self, Field, Regs};
use crate::{Direction, DriveStrength, Error, InterruptState, OutputMode, Pcal95555, Polarity};
use crate::Transport;

impl<T: Transport> Pcal95555<T> {
    fn modify_bit(&mut self, field: Field, pin: u8, set: bool) -> Result<(), Error> {
        self.check_pin(pin)?;
        self.prepare(field.is_extended())?;
        let (reg, mask) = regs::bit_location(field, pin);
        let (mask_set, mask_clear) = if set { (mask, 0) } else { (0, mask) };
        self.update_register(reg, mask_set, mask_clear)
    }

    fn modify_mask(&mut self, field: Field, mask: u16, set: bool) -> Result<(), Error> {
        self.prepare(field.is_extended())?;
        for port in 0..2 {
            let bits = regs::port_byte(mask, port);
            if bits == 0 {
                continue;
            }
            let (mask_set, mask_clear) = if set { (bits, 0) } else { (0, bits) };
            self.update_register(field.register(port), mask_set, mask_clear)?;
        }
        Ok(())
    }

    fn read_bit(&mut self, field: Field, pin: u8) -> Result<bool, Error> {
        self.check_pin(pin)?;
        self.prepare(field.is_extended())?;
        let (reg, mask) = regs::bit_location(field, pin);
        Ok(self.read_register(reg)? & mask != 0)
    }

    pub fn set_pin_direction(&mut self, pin: u8, dir: Direction) -> Result<(), Error> {
        self.modify_bit(Field::Direction, pin, dir.bit())
    }

    pub fn set_multiple_directions(&mut self, mask: u16, dir: Direction) -> Result<(), Error> {
        self.modify_mask(Field::Direction, mask, dir.bit())
    }

    /// Read the current direction of `pin`.
    pub fn pin_direction(&mut self, pin: u8) -> Result<Direction, Error> {
        Ok(if self.read_bit(Field::Direction, pin)? {
            Direction::Input
        } else {
            Direction::Output
        })
    }

    /// Logic level at `pin`, after polarity inversion.
    pub fn read_pin(&mut self, pin: u8) -> Result<bool, Error> {
        self.read_bit(Field::Input, pin)
    }

    /// Logic levels of all 16 pins, bit `n` belonging to pin `n`.
    pub fn read_inputs(&mut self) -> Result<u16, Error> {
        self.prepare(false)?;
        self.read_input_levels()
    }

    /// Set the output latch of `pin`.  Only visible on the pin while it is an output.
    pub fn write_pin(&mut self, pin: u8, high: bool) -> Result<(), Error> {
        self.modify_bit(Field::Output, pin, high)
    }

    /// Level the output latch of `pin` is set to.
    pub fn is_set_high(&mut self, pin: u8) -> Result<bool, Error> {
        self.read_bit(Field::Output, pin)
    }

    pub fn toggle_pin(&mut self, pin: u8) -> Result<(), Error> {
        self.check_pin(pin)?;
        self.prepare(false)?;
        let (reg, mask) = regs::bit_location(Field::Output, pin);
        let value = self.read_register(reg)?;
        self.write_register(reg, value ^ mask)
    }

    pub fn set_pin_polarity(&mut self, pin: u8, polarity: Polarity) -> Result<(), Error> {
        self.modify_bit(Field::Polarity, pin, polarity.bit())
    }

    pub fn set_multiple_polarities(&mut self, mask: u16, polarity: Polarity) -> Result<(), Error> {
        self.modify_mask(Field::Polarity, mask, polarity.bit())
    }

    /// Connect or disconnect the pull resistor of `pin`.
    pub fn set_pull_enable(&mut self, pin: u8, enable: bool) -> Result<(), Error> {
        self.modify_bit(Field::PullEnable, pin, enable)
    }

    pub fn set_multiple_pull_enables(&mut self, mask: u16, enable: bool) -> Result<(), Error> {
        self.modify_mask(Field::PullEnable, mask, enable)
    }

    /// Select pull-up (`true`) or pull-down (`false`) for `pin`.
    pub fn set_pull_direction(&mut self, pin: u8, pull_up: bool) -> Result<(), Error> {
        self.modify_bit(Field::PullSelect, pin, pull_up)
    }

    pub fn set_multiple_pull_directions(&mut self, mask: u16, pull_up: bool) -> Result<(), Error> {
        self.modify_mask(Field::PullSelect, mask, pull_up)
    }

    pub fn set_drive_strength(&mut self, pin: u8, level: DriveStrength) -> Result<(), Error> {
        self.check_pin(pin)?;
        self.prepare(true)?;
        let (reg, offset) = regs::drive_strength_location(pin);
        let value = self.read_register(reg)?;
        self.write_register(reg, regs::update_field2(value, offset, level as u8))
    }

    /// Latch input changes of `pin` until the input port register is read.
    pub fn enable_input_latch(&mut self, pin: u8, enable: bool) -> Result<(), Error> {
        self.modify_bit(Field::InputLatch, pin, enable)
    }

    pub fn enable_multiple_input_latches(&mut self, mask: u16, enable: bool) -> Result<(), Error> {
        self.modify_mask(Field::InputLatch, mask, enable)
    }

    /// Allow or prevent `pin` from raising the INT line.
    pub fn configure_interrupt(&mut self, pin: u8, state: InterruptState) -> Result<(), Error> {
        self.modify_bit(Field::InterruptMask, pin, state.mask_bit())
    }

    pub fn configure_interrupts_masked(
        &mut self,
        mask: u16,
        state: InterruptState,
    ) -> Result<(), Error> {
        self.modify_mask(Field::InterruptMask, mask, state.mask_bit())
    }

    /// Overwrite the whole interrupt mask.  A `0` bit enables the interrupt of that pin.
    pub fn configure_interrupt_mask(&mut self, mask: u16) -> Result<(), Error> {
        self.prepare(true)?;
        self.write_register(Regs::InterruptMask0, regs::port_byte(mask, 0))?;
        self.write_register(Regs::InterruptMask1, regs::port_byte(mask, 1))
    }

    /// Read which pins caused an interrupt.  Reading clears the status on the chip.
    pub fn get_interrupt_status(&mut self) -> Result<u16, Error> {
        self.prepare(true)?;
        self.read_interrupt_status()
    }

    pub(crate) fn read_interrupt_status(&mut self) -> Result<u16, Error> {
        let lo = self.read_register(Field::InterruptStatus.register(0))?;
        let hi = self.read_register(Field::InterruptStatus.register(1))?;
        Ok(((hi as u16) << 8) | lo as u16)
    }

    /// Configure the output stage of each port.
    pub fn set_output_mode(&mut self, port0: OutputMode, port1: OutputMode) -> Result<(), Error> {
        self.prepare(true)?;
        self.write_register(
            Regs::OutputPortConfiguration,
            output_mode_bits(port0, port1),
        )
    }
}
