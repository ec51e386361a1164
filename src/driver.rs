use crate::interrupt::PinInterrupt;
use crate::regs::{self, Regs};
use crate::{ChipVariant, Config, Error, ErrorFlags, Transport};

/// Lowest 7-bit address of the chip family (all address-select lines low).
pub const BASE_ADDRESS: u8 = 0x20;
/// Highest 7-bit address of the chip family (all address-select lines high).
pub const MAX_ADDRESS: u8 = 0x27;

/// Additional attempts made for a failing register transfer by default.
pub const DEFAULT_RETRIES: u8 = 1;

/// Driver for the `PCA9555`/`PCAL9555A` "16-bit I2C-bus and SMBus I/O port with interrupt".
///
/// Construction does not touch the bus.  The first operation initializes the driver: it checks
/// that the chip answers at the configured address, finds out which [`ChipVariant`] it is and
/// takes a snapshot of the input levels.  Operations which need the extended register bank fail
/// with [`Error::UnsupportedFeature`] on a [`ChipVariant::Base`] chip without any bus traffic.
///
/// Every failure is returned as an [`Error`] and additionally recorded in the sticky
/// [`ErrorFlags`], see [`error_flags()`][Self::error_flags].
///
/// The driver does no locking of its own.  If [`handle_interrupt()`][Self::handle_interrupt] runs
/// in a different context than the other operations, wrap the driver in a
/// [`DriverMutex`][crate::DriverMutex].
pub struct Pcal95555<T> {
    pub(crate) transport: T,
    address: u8,
    address_pins: (bool, bool, bool),
    retries: u8,
    pub(crate) variant: ChipVariant,
    variant_fixed: bool,
    initialized: bool,
    error_flags: ErrorFlags,
    pub(crate) pin_callbacks: [Option<PinInterrupt>; regs::PIN_COUNT as usize],
    pub(crate) irq_callback: Option<crate::InterruptCallback>,
    pub(crate) previous_states: u16,
}

fn address_from_pins(a0: bool, a1: bool, a2: bool) -> u8 {
    BASE_ADDRESS | ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8)
}

fn pins_from_address(address: u8) -> (bool, bool, bool) {
    let bits = address - BASE_ADDRESS;
    (bits & 0b001 != 0, bits & 0b010 != 0, bits & 0b100 != 0)
}

impl<T> Pcal95555<T> {
    /// Create a driver for the chip whose A0..A2 lines are at the given levels.
    pub fn new(transport: T, a0: bool, a1: bool, a2: bool) -> Self {
        Self {
            transport,
            address: address_from_pins(a0, a1, a2),
            address_pins: (a0, a1, a2),
            retries: DEFAULT_RETRIES,
            variant: ChipVariant::Unknown,
            variant_fixed: false,
            initialized: false,
            error_flags: ErrorFlags::NONE,
            pin_callbacks: [None; regs::PIN_COUNT as usize],
            irq_callback: None,
            previous_states: 0,
        }
    }

    /// Create a driver for the chip at a raw 7-bit `address`.
    ///
    /// Addresses outside `0x20..=0x27` are clamped into that range.
    pub fn with_address(transport: T, address: u8) -> Self {
        let (a0, a1, a2) = pins_from_address(address.clamp(BASE_ADDRESS, MAX_ADDRESS));
        Self::new(transport, a0, a1, a2)
    }

    /// Skip variant detection and assume the chip is `variant`.
    ///
    /// Passing [`ChipVariant::Unknown`] re-enables detection.
    pub fn with_variant(mut self, variant: ChipVariant) -> Self {
        self.variant = variant;
        self.variant_fixed = variant != ChipVariant::Unknown;
        self
    }

    /// Release the transport.
    pub fn free(self) -> T {
        self.transport
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Current 7-bit I2C address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// The address-select code `A2 A1 A0` as a 3-bit number.
    pub fn address_bits(&self) -> u8 {
        self.address - BASE_ADDRESS
    }

    /// Levels of the A0, A1 and A2 lines.
    pub fn address_pins(&self) -> (bool, bool, bool) {
        self.address_pins
    }

    pub fn chip_variant(&self) -> ChipVariant {
        self.variant
    }

    /// Whether the extended ("Agile I/O") register bank is known to be present.
    pub fn has_agile_io(&self) -> bool {
        self.variant == ChipVariant::Extended
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Set how many additional attempts are made for a failing register transfer.
    pub fn set_retries(&mut self, retries: u8) {
        self.retries = retries;
    }

    pub fn retries(&self) -> u8 {
        self.retries
    }

    /// Sticky error flags accumulated since they were last cleared.
    pub fn error_flags(&self) -> ErrorFlags {
        self.error_flags
    }

    /// Clear the flags in `mask`, leaving all others untouched.
    pub fn clear_error_flags(&mut self, mask: ErrorFlags) {
        self.error_flags.remove(mask);
    }

    pub fn clear_all_error_flags(&mut self) {
        self.error_flags = ErrorFlags::NONE;
    }

    /// Record `e` in the sticky flags and hand it back.
    pub(crate) fn fail(&mut self, e: Error) -> Error {
        self.error_flags.insert(e.flag());
        e
    }

    pub(crate) fn check_pin(&mut self, pin: u8) -> Result<(), Error> {
        if regs::is_valid_pin(pin) {
            Ok(())
        } else {
            log::debug!("rejecting invalid pin {}", pin);
            Err(self.fail(Error::InvalidPin))
        }
    }

    fn check_extended(&mut self) -> Result<(), Error> {
        if self.variant == ChipVariant::Base {
            Err(self.fail(Error::UnsupportedFeature))
        } else {
            Ok(())
        }
    }
}

impl<T: Transport> Pcal95555<T> {
    /// Initialize if necessary, then make sure the extended bank is available if `extended`.
    ///
    /// A chip already known to be [`ChipVariant::Base`] is rejected before any bus traffic.
    pub(crate) fn prepare(&mut self, extended: bool) -> Result<(), Error> {
        if extended {
            self.check_extended()?;
        }
        self.ensure_initialized()?;
        if extended {
            self.check_extended()?;
        }
        Ok(())
    }

    /// Read one register, retrying failed attempts.
    pub(crate) fn read_register(&mut self, reg: Regs) -> Result<u8, Error> {
        let mut buf = [0x00];
        for attempt in 0..=self.retries {
            match self
                .transport
                .read_register(self.address, reg.into(), &mut buf)
            {
                Ok(()) => {
                    log::trace!("read {:?} = {:#04x}", reg, buf[0]);
                    self.error_flags.remove(ErrorFlags::I2C_READ_FAIL);
                    return Ok(buf[0]);
                }
                Err(e) => log::debug!("reading {:?} failed (attempt {}): {:?}", reg, attempt + 1, e),
            }
        }
        log::warn!(
            "reading {:?} from {:#04x} failed after {} attempts",
            reg,
            self.address,
            self.retries as u16 + 1
        );
        Err(self.fail(Error::I2cRead))
    }

    /// Write one register, retrying failed attempts.
    pub(crate) fn write_register(&mut self, reg: Regs, value: u8) -> Result<(), Error> {
        for attempt in 0..=self.retries {
            match self
                .transport
                .write_register(self.address, reg.into(), value)
            {
                Ok(()) => {
                    log::trace!("wrote {:?} = {:#04x}", reg, value);
                    self.error_flags.remove(ErrorFlags::I2C_WRITE_FAIL);
                    return Ok(());
                }
                Err(e) => log::debug!("writing {:?} failed (attempt {}): {:?}", reg, attempt + 1, e),
            }
        }
        log::warn!(
            "writing {:?} to {:#04x} failed after {} attempts",
            reg,
            self.address,
            self.retries as u16 + 1
        );
        Err(self.fail(Error::I2cWrite))
    }

    /// Read-modify-write: set the bits in `mask_set`, then clear the bits in `mask_clear`.
    pub(crate) fn update_register(
        &mut self,
        reg: Regs,
        mask_set: u8,
        mask_clear: u8,
    ) -> Result<(), Error> {
        let mut value = self.read_register(reg)?;
        value |= mask_set;
        value &= !mask_clear;
        self.write_register(reg, value)
    }

    /// Both input port registers as one 16-bit level snapshot.
    pub(crate) fn read_input_levels(&mut self) -> Result<u16, Error> {
        let io0 = self.read_register(Regs::InputPort0)?;
        let io1 = self.read_register(Regs::InputPort1)?;
        Ok(((io1 as u16) << 8) | io0 as u16)
    }

    /// Bring up communication with the chip unless that already happened.
    ///
    /// Every operation calls this first, so calling it explicitly is only needed to find out
    /// early whether the chip is reachable.  A failed attempt leaves the driver uninitialized
    /// and the next operation tries again.
    pub fn ensure_initialized(&mut self) -> Result<(), Error> {
        if self.initialized {
            return Ok(());
        }

        if let Err(e) = self.transport.ensure_ready() {
            log::warn!("transport not ready: {:?}", e);
            return Err(self.fail(Error::I2cRead));
        }

        let (a0, a1, a2) = self.address_pins;
        match self.transport.set_address_pins(a0, a1, a2) {
            Some(Err(e)) => log::debug!("driving address pins failed: {:?}", e),
            Some(Ok(())) => log::trace!("address pins driven to {:?}", self.address_pins),
            None => (),
        }

        self.read_register(Regs::InputPort0)?;

        if !self.variant_fixed {
            self.variant = self.probe_variant();
        }

        self.previous_states = self.read_input_levels()?;
        self.initialized = true;
        log::debug!(
            "initialized expander at {:#04x} ({:?})",
            self.address,
            self.variant
        );
        Ok(())
    }

    /// Find out which variant the chip is.
    ///
    /// Once the variant is known (detected or given at construction) it never changes, so this
    /// only probes the chip again while it is still [`ChipVariant::Unknown`], e.g. after an
    /// inconclusive detection during initialization.
    pub fn detect_chip_variant(&mut self) -> Result<ChipVariant, Error> {
        self.ensure_initialized()?;
        if self.variant == ChipVariant::Unknown {
            self.variant = self.probe_variant();
        }
        Ok(self.variant)
    }

    /// Classify the chip by probing the extended register bank.
    ///
    /// A failed probe is ambiguous between "register absent" and "bus fault", so the probe is
    /// sandwiched between two reads of a register both variants have.  Retries are off so that
    /// they cannot hide the expected NACK.
    fn probe_variant(&mut self) -> ChipVariant {
        let retries = core::mem::replace(&mut self.retries, 0);
        let variant = self.sandwich_probe();
        self.retries = retries;
        variant
    }

    fn sandwich_probe(&mut self) -> ChipVariant {
        if self.read_register(Regs::Configuration0).is_err() {
            log::warn!("variant detection aborted: bus not responding");
            return ChipVariant::Unknown;
        }

        // Goes around the transaction layer: a NACK here is an answer, not an error.
        let mut buf = [0x00];
        let tentative = match self.transport.read_register(
            self.address,
            Regs::InputLatch0.into(),
            &mut buf,
        ) {
            Ok(()) => ChipVariant::Extended,
            Err(e) => {
                log::debug!("extended bank probe NACKed: {:?}", e);
                ChipVariant::Base
            }
        };

        if self.read_register(Regs::Configuration0).is_err() {
            log::warn!("variant detection inconclusive: bus lost after probe");
            return ChipVariant::Unknown;
        }

        log::debug!("detected chip variant {:?}", tentative);
        tentative
    }

    /// Move the driver to the chip with address-select levels `a0`, `a1`, `a2`.
    ///
    /// The transport is asked to drive the address-select lines (if it can) and the driver
    /// re-initializes at the new address.  A variant given at construction is kept, a detected
    /// one is detected again.
    pub fn change_address_pins(&mut self, a0: bool, a1: bool, a2: bool) -> Result<(), Error> {
        self.address_pins = (a0, a1, a2);
        self.address = address_from_pins(a0, a1, a2);
        self.initialized = false;
        if !self.variant_fixed {
            self.variant = ChipVariant::Unknown;
        }
        log::debug!("changing address to {:#04x}", self.address);
        self.ensure_initialized()
    }

    /// Move the driver to the chip at the raw 7-bit `address`.
    ///
    /// Unlike construction, an address outside `0x20..=0x27` is rejected with
    /// [`Error::InvalidAddress`] and nothing is changed.
    pub fn change_address(&mut self, address: u8) -> Result<(), Error> {
        if !(BASE_ADDRESS..=MAX_ADDRESS).contains(&address) {
            return Err(self.fail(Error::InvalidAddress));
        }
        let (a0, a1, a2) = pins_from_address(address);
        self.change_address_pins(a0, a1, a2)
    }

    /// Write the datasheet power-on values to all registers.
    ///
    /// The extended bank is skipped on a [`ChipVariant::Base`] chip.
    pub fn reset_to_default(&mut self) -> Result<(), Error> {
        self.prepare(false)?;

        self.write_register(Regs::OutputPort0, 0xff)?;
        self.write_register(Regs::OutputPort1, 0xff)?;
        self.write_register(Regs::PolarityInversion0, 0x00)?;
        self.write_register(Regs::PolarityInversion1, 0x00)?;
        self.write_register(Regs::Configuration0, 0xff)?;
        self.write_register(Regs::Configuration1, 0xff)?;

        if self.variant == ChipVariant::Base {
            return Ok(());
        }

        self.write_register(Regs::OutputDriveStrength0Port0, 0xff)?;
        self.write_register(Regs::OutputDriveStrength1Port0, 0xff)?;
        self.write_register(Regs::OutputDriveStrength0Port1, 0xff)?;
        self.write_register(Regs::OutputDriveStrength1Port1, 0xff)?;
        self.write_register(Regs::InputLatch0, 0x00)?;
        self.write_register(Regs::InputLatch1, 0x00)?;
        self.write_register(Regs::PullEnable0, 0xff)?;
        self.write_register(Regs::PullEnable1, 0xff)?;
        self.write_register(Regs::PullSelection0, 0xff)?;
        self.write_register(Regs::PullSelection1, 0xff)?;
        self.write_register(Regs::InterruptMask0, 0xff)?;
        self.write_register(Regs::InterruptMask1, 0xff)?;
        self.write_register(Regs::OutputPortConfiguration, 0x00)
    }

    /// Apply `config` to the chip.
    ///
    /// Output levels are written before directions so that pins switching to output do not
    /// glitch.  Pull and output-mode settings are skipped on a [`ChipVariant::Base`] chip.
    pub fn init_from_config(&mut self, config: &Config) -> Result<(), Error> {
        self.prepare(false)?;

        let output = config.output_bits();
        self.write_register(Regs::OutputPort0, regs::port_byte(output, 0))?;
        self.write_register(Regs::OutputPort1, regs::port_byte(output, 1))?;
        let direction = config.direction_bits();
        self.write_register(Regs::Configuration0, regs::port_byte(direction, 0))?;
        self.write_register(Regs::Configuration1, regs::port_byte(direction, 1))?;

        if self.variant == ChipVariant::Base {
            log::debug!("skipping pull and output mode configuration on base variant");
            return Ok(());
        }

        let pull_enable = config.pull_enable_bits();
        self.write_register(Regs::PullEnable0, regs::port_byte(pull_enable, 0))?;
        self.write_register(Regs::PullEnable1, regs::port_byte(pull_enable, 1))?;
        let pull_up = config.pull_up_bits();
        self.write_register(Regs::PullSelection0, regs::port_byte(pull_up, 0))?;
        self.write_register(Regs::PullSelection1, regs::port_byte(pull_up, 1))?;
        self.write_register(Regs::OutputPortConfiguration, config.output_mode_bits())
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{self, FakeBus};
    use crate::{ChipVariant, Config, Direction, Error, ErrorFlags, OutputMode, Pcal95555};
    use embedded_hal_mock::eh1::i2c as mock_i2c;

    #[test]
    fn construction_does_no_io() {
        let mut bus = mock_i2c::Mock::new(&[]);

        let pcal = Pcal95555::new(crate::HalBus::new(bus.clone()), true, false, true);
        assert_eq!(pcal.address(), 0x25);
        assert_eq!(pcal.address_bits(), 0b101);
        assert_eq!(pcal.address_pins(), (true, false, true));
        assert_eq!(pcal.chip_variant(), ChipVariant::Unknown);
        assert!(!pcal.is_initialized());

        bus.done();
    }

    #[test]
    fn address_clamping() {
        let pcal = Pcal95555::with_address(FakeBus::extended(), 0x19);
        assert_eq!(pcal.address(), 0x20);
        let pcal = Pcal95555::with_address(FakeBus::extended(), 0x30);
        assert_eq!(pcal.address(), 0x27);
        assert_eq!(pcal.address_pins(), (true, true, true));
        let pcal = Pcal95555::with_address(FakeBus::extended(), 0x22);
        assert_eq!(pcal.address_pins(), (false, true, false));
    }

    #[test]
    fn detects_extended_variant() {
        let mut expectations = vec![mock_i2c::Transaction::write_read(
            0x20,
            vec![0x00],
            vec![0xff],
        )];
        expectations.extend(testing::sandwich(0x20, true));
        expectations.extend(testing::snapshot(0x20, 0x00a5));
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pcal = Pcal95555::new(crate::HalBus::new(bus.clone()), false, false, false);
        pcal.ensure_initialized().unwrap();
        assert_eq!(pcal.chip_variant(), ChipVariant::Extended);
        assert!(pcal.has_agile_io());
        assert!(pcal.error_flags().is_empty());
        assert_eq!(pcal.previous_states, 0x00a5);

        // idempotent
        pcal.ensure_initialized().unwrap();

        bus.done();
    }

    #[test]
    fn detects_base_variant_without_flagging_the_probe() {
        let mut expectations = vec![mock_i2c::Transaction::write_read(
            0x21,
            vec![0x00],
            vec![0xff],
        )];
        expectations.extend(testing::sandwich(0x21, false));
        expectations.extend(testing::snapshot(0x21, 0xffff));
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pcal = Pcal95555::new(crate::HalBus::new(bus.clone()), true, false, false);
        pcal.ensure_initialized().unwrap();
        assert_eq!(pcal.chip_variant(), ChipVariant::Base);
        assert!(!pcal.has_agile_io());
        assert!(pcal.error_flags().is_empty());

        bus.done();
    }

    #[test]
    fn detection_inconclusive_when_recovery_read_fails() {
        let expectations = [
            mock_i2c::Transaction::write_read(0x20, vec![0x00], vec![0xff]),
            mock_i2c::Transaction::write_read(0x20, vec![0x06], vec![0xff]),
            testing::read_error(0x20, 0x44),
            // no retries during detection
            testing::read_error(0x20, 0x06),
            mock_i2c::Transaction::write_read(0x20, vec![0x00], vec![0x00]),
            mock_i2c::Transaction::write_read(0x20, vec![0x01], vec![0x00]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pcal = Pcal95555::new(crate::HalBus::new(bus.clone()), false, false, false);
        pcal.ensure_initialized().unwrap();
        assert_eq!(pcal.chip_variant(), ChipVariant::Unknown);
        // The snapshot afterwards succeeded and cleared the read flag again.
        assert!(pcal.error_flags().is_empty());
        assert_eq!(pcal.retries(), 1);

        bus.done();
    }

    #[test]
    fn detection_aborts_when_first_read_fails() {
        let mut fake = FakeBus::extended();
        fake.fail_reads_at(1, 1);
        let mut pcal = Pcal95555::new(fake, false, false, false);
        pcal.ensure_initialized().unwrap();
        assert_eq!(pcal.chip_variant(), ChipVariant::Unknown);

        // Explicit re-detection recovers.
        assert_eq!(pcal.detect_chip_variant(), Ok(ChipVariant::Extended));
    }

    #[test]
    fn known_variant_is_not_probed_again() {
        let mut pcal = Pcal95555::new(FakeBus::extended(), false, false, false);
        pcal.ensure_initialized().unwrap();
        assert_eq!(pcal.chip_variant(), ChipVariant::Extended);
        let reads = pcal.transport().reads.len();

        // Neither a failing probe read nor a failing recovery read may demote the chip.
        pcal.transport_mut().fail_reads_at(reads, 3);
        assert_eq!(pcal.detect_chip_variant(), Ok(ChipVariant::Extended));
        assert_eq!(pcal.chip_variant(), ChipVariant::Extended);
        assert_eq!(pcal.transport().reads.len(), reads);

        let mut pcal = Pcal95555::new(FakeBus::extended(), false, false, false)
            .with_variant(ChipVariant::Base);
        assert_eq!(pcal.detect_chip_variant(), Ok(ChipVariant::Base));
        assert!(!pcal.transport().reads.contains(&0x44));
    }

    #[test]
    fn failed_init_is_retried() {
        let expectations = [
            testing::read_error(0x20, 0x00),
            testing::read_error(0x20, 0x00),
            // second attempt
            mock_i2c::Transaction::write_read(0x20, vec![0x00], vec![0xff]),
            mock_i2c::Transaction::write_read(0x20, vec![0x00], vec![0xff]),
            mock_i2c::Transaction::write_read(0x20, vec![0x01], vec![0xff]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pcal = Pcal95555::new(crate::HalBus::new(bus.clone()), false, false, false)
            .with_variant(ChipVariant::Base);
        assert_eq!(pcal.ensure_initialized(), Err(Error::I2cRead));
        assert!(!pcal.is_initialized());
        assert!(pcal.error_flags().contains(ErrorFlags::I2C_READ_FAIL));

        pcal.ensure_initialized().unwrap();
        assert!(pcal.is_initialized());
        assert!(!pcal.error_flags().contains(ErrorFlags::I2C_READ_FAIL));

        bus.done();
    }

    #[test]
    fn transport_not_ready() {
        let mut fake = FakeBus::extended();
        fake.ready = false;
        let mut pcal = Pcal95555::new(fake, false, false, false);
        assert_eq!(pcal.ensure_initialized(), Err(Error::I2cRead));
        assert!(pcal.transport().reads.is_empty());
        assert_eq!(pcal.error_flags(), ErrorFlags::I2C_READ_FAIL);
    }

    #[test]
    fn drives_address_pins_on_init() {
        let mut fake = FakeBus::extended();
        fake.supports_address_pins = true;
        let mut pcal = Pcal95555::new(fake, false, true, true);
        pcal.ensure_initialized().unwrap();
        assert_eq!(pcal.transport().address_pins, Some((false, true, true)));
        assert_eq!(pcal.transport().last_address, Some(0x26));
    }

    #[test]
    fn retries_until_success() {
        let mut pcal = Pcal95555::new(FakeBus::extended(), false, false, false);
        pcal.set_retries(3);
        pcal.ensure_initialized().unwrap();

        // k <= retries failures: success, flag cleared
        pcal.transport_mut().fail_writes = 3;
        pcal.set_pin_direction(0, Direction::Output).unwrap();
        assert!(!pcal.error_flags().contains(ErrorFlags::I2C_WRITE_FAIL));

        // k = retries + 1 failures: error, flag stays
        pcal.transport_mut().fail_writes = 4;
        assert_eq!(
            pcal.set_pin_direction(1, Direction::Output),
            Err(Error::I2cWrite)
        );
        assert!(pcal.error_flags().contains(ErrorFlags::I2C_WRITE_FAIL));

        // next successful write clears it
        pcal.set_pin_direction(1, Direction::Output).unwrap();
        assert!(!pcal.error_flags().contains(ErrorFlags::I2C_WRITE_FAIL));

        let fake = pcal.free();
        assert_eq!(fake.regs[0x06], 0xfc);
    }

    #[test]
    fn default_retries_make_two_attempts() {
        let mut expectations = testing::init_fixed(0x20, 0x0000);
        expectations.extend([
            testing::read_error(0x20, 0x06),
            mock_i2c::Transaction::write_read(0x20, vec![0x06], vec![0xff]),
            testing::write_error(0x20, vec![0x06, 0xfe]),
            testing::write_error(0x20, vec![0x06, 0xfe]),
        ]);
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pcal = Pcal95555::new(crate::HalBus::new(bus.clone()), false, false, false)
            .with_variant(ChipVariant::Base);
        assert_eq!(
            pcal.set_pin_direction(0, Direction::Output),
            Err(Error::I2cWrite)
        );
        assert_eq!(pcal.error_flags(), ErrorFlags::I2C_WRITE_FAIL);

        bus.done();
    }

    #[test]
    fn selective_flag_clearing() {
        let mut pcal = Pcal95555::new(FakeBus::base(), false, false, false);
        assert_eq!(pcal.set_pin_direction(16, Direction::Input), Err(Error::InvalidPin));
        assert_eq!(pcal.change_address(0x40), Err(Error::InvalidAddress));
        assert_eq!(
            pcal.error_flags(),
            ErrorFlags::INVALID_PIN | ErrorFlags::INVALID_ADDRESS
        );

        pcal.clear_error_flags(ErrorFlags::INVALID_PIN);
        assert_eq!(pcal.error_flags(), ErrorFlags::INVALID_ADDRESS);
        pcal.clear_all_error_flags();
        assert!(pcal.error_flags().is_empty());
    }

    #[test]
    fn change_address_reinitializes() {
        let mut fake = FakeBus::extended();
        fake.supports_address_pins = true;
        let mut pcal = Pcal95555::new(fake, false, false, false);
        pcal.ensure_initialized().unwrap();
        assert_eq!(pcal.chip_variant(), ChipVariant::Extended);

        pcal.change_address(0x23).unwrap();
        assert_eq!(pcal.address(), 0x23);
        assert_eq!(pcal.address_pins(), (true, true, false));
        assert_eq!(pcal.transport().address_pins, Some((true, true, false)));
        assert_eq!(pcal.transport().last_address, Some(0x23));
        assert_eq!(pcal.chip_variant(), ChipVariant::Extended);
        assert!(pcal.is_initialized());

        assert_eq!(pcal.change_address(0x28), Err(Error::InvalidAddress));
        assert_eq!(pcal.address(), 0x23);
    }

    #[test]
    fn change_address_keeps_given_variant() {
        let mut expectations = testing::init_fixed(0x20, 0x0000);
        // no variant detection at the new address
        expectations.extend(testing::init_fixed(0x23, 0x0000));
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pcal = Pcal95555::new(crate::HalBus::new(bus.clone()), false, false, false)
            .with_variant(ChipVariant::Base);
        pcal.ensure_initialized().unwrap();
        pcal.change_address(0x23).unwrap();
        assert_eq!(pcal.address(), 0x23);
        assert_eq!(pcal.chip_variant(), ChipVariant::Base);
        assert!(pcal.is_initialized());

        bus.done();
    }

    #[test]
    fn reset_to_default_base() {
        let mut expectations = testing::init_fixed(0x20, 0x0000);
        for (reg, value) in [
            (0x02, 0xff),
            (0x03, 0xff),
            (0x04, 0x00),
            (0x05, 0x00),
            (0x06, 0xff),
            (0x07, 0xff),
        ] {
            expectations.push(mock_i2c::Transaction::write(0x20, vec![reg, value]));
        }
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pcal = Pcal95555::new(crate::HalBus::new(bus.clone()), false, false, false)
            .with_variant(ChipVariant::Base);
        pcal.reset_to_default().unwrap();

        bus.done();
    }

    #[test]
    fn reset_to_default_extended() {
        let mut pcal = Pcal95555::new(FakeBus::extended(), false, false, false);
        pcal.reset_to_default().unwrap();
        let fake = pcal.free();
        assert_eq!(fake.writes.len(), 19);
        assert_eq!(fake.regs[0x40..0x44], [0xff; 4]);
        assert_eq!(fake.regs[0x4a], 0xff);
        assert_eq!(fake.writes.last(), Some(&(0x4f, 0x00)));
    }

    #[test]
    fn init_from_config_extended() {
        let config = Config::default()
            .direction(0x00ff, Direction::Output)
            .output(0x0081, true)
            .pull_enable(0xff00, true)
            .pull_up(0x0100, false)
            .open_drain(OutputMode::OpenDrain, OutputMode::PushPull);

        let mut expectations = testing::init_fixed(0x27, 0x0000);
        for (reg, value) in [
            (0x02, 0x81),
            (0x03, 0x00),
            (0x06, 0x00),
            (0x07, 0xff),
            (0x46, 0x00),
            (0x47, 0xff),
            (0x48, 0xff),
            (0x49, 0xfe),
            (0x4f, 0x01),
        ] {
            expectations.push(mock_i2c::Transaction::write(0x27, vec![reg, value]));
        }
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pcal = Pcal95555::new(crate::HalBus::new(bus.clone()), true, true, true)
            .with_variant(ChipVariant::Extended);
        pcal.init_from_config(&config).unwrap();

        bus.done();
    }
}
