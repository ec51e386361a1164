//! Shared helpers for the unit tests.

use crate::Transport;
use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c as mock_i2c;

/// Route `log` output through the test harness.  Enable with `RUST_LOG=pcal95555=trace`.
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Register reads of an initialization with a pre-specified variant.
pub(crate) fn init_fixed(addr: u8, inputs: u16) -> Vec<mock_i2c::Transaction> {
    init_logging();
    let mut t = vec![mock_i2c::Transaction::write_read(
        addr,
        vec![0x00],
        vec![inputs as u8],
    )];
    t.extend(snapshot(addr, inputs));
    t
}

/// The three reads of variant detection.
pub(crate) fn sandwich(addr: u8, extended: bool) -> Vec<mock_i2c::Transaction> {
    let probe = mock_i2c::Transaction::write_read(addr, vec![0x44], vec![0x00]);
    vec![
        mock_i2c::Transaction::write_read(addr, vec![0x06], vec![0xff]),
        if extended {
            probe
        } else {
            probe.with_error(ErrorKind::NoAcknowledge(
                embedded_hal::i2c::NoAcknowledgeSource::Data,
            ))
        },
        mock_i2c::Transaction::write_read(addr, vec![0x06], vec![0xff]),
    ]
}

/// Reads of both input port registers.
pub(crate) fn snapshot(addr: u8, inputs: u16) -> Vec<mock_i2c::Transaction> {
    vec![
        mock_i2c::Transaction::write_read(addr, vec![0x00], vec![inputs as u8]),
        mock_i2c::Transaction::write_read(addr, vec![0x01], vec![(inputs >> 8) as u8]),
    ]
}

pub(crate) fn read_error(addr: u8, reg: u8) -> mock_i2c::Transaction {
    mock_i2c::Transaction::write_read(addr, vec![reg], vec![0x00]).with_error(ErrorKind::Other)
}

pub(crate) fn write_error(addr: u8, bytes: Vec<u8>) -> mock_i2c::Transaction {
    mock_i2c::Transaction::write(addr, bytes).with_error(ErrorKind::Other)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FakeError {
    Nack,
    Injected,
    NotReady,
}

/// Register-file model of the chip with failure injection and a log of all transfers.
#[derive(Debug, Clone)]
pub(crate) struct FakeBus {
    pub regs: [u8; 0x50],
    pub extended: bool,
    pub ready: bool,
    pub supports_address_pins: bool,
    pub supports_interrupts: bool,
    pub listening: bool,
    pub address_pins: Option<(bool, bool, bool)>,
    pub last_address: Option<u8>,
    pub reads: Vec<u8>,
    pub writes: Vec<(u8, u8)>,
    pub fail_writes: u32,
    failing_reads: Vec<usize>,
    read_count: usize,
}

impl FakeBus {
    fn new(extended: bool) -> Self {
        init_logging();
        let mut regs = [0x00; 0x50];
        regs[0x02] = 0xff;
        regs[0x03] = 0xff;
        regs[0x06] = 0xff;
        regs[0x07] = 0xff;
        regs[0x40..0x44].copy_from_slice(&[0xff; 4]);
        regs[0x48] = 0xff;
        regs[0x49] = 0xff;
        regs[0x4a] = 0xff;
        regs[0x4b] = 0xff;
        Self {
            regs,
            extended,
            ready: true,
            supports_address_pins: false,
            supports_interrupts: false,
            listening: false,
            address_pins: None,
            last_address: None,
            reads: Vec::new(),
            writes: Vec::new(),
            fail_writes: 0,
            failing_reads: Vec::new(),
            read_count: 0,
        }
    }

    pub fn extended() -> Self {
        Self::new(true)
    }

    pub fn base() -> Self {
        Self::new(false)
    }

    /// Make `count` reads fail, starting with the read number `first` (counting from 0).
    pub fn fail_reads_at(&mut self, first: usize, count: usize) {
        self.failing_reads.extend(first..first + count);
    }

    pub fn set_inputs(&mut self, inputs: u16) {
        self.regs[0x00] = inputs as u8;
        self.regs[0x01] = (inputs >> 8) as u8;
    }

    /// Latch a change of the inputs in `changed` into the interrupt status registers.
    pub fn raise(&mut self, inputs: u16, changed: u16) {
        self.set_inputs(inputs);
        self.regs[0x4c] |= changed as u8;
        self.regs[0x4d] |= (changed >> 8) as u8;
    }

    fn present(&self, register: u8) -> bool {
        (register as usize) < self.regs.len() && (self.extended || register < 0x40)
    }
}

impl Transport for FakeBus {
    type Error = FakeError;

    fn write_register(&mut self, address: u8, register: u8, value: u8) -> Result<(), FakeError> {
        self.last_address = Some(address);
        if self.fail_writes > 0 {
            self.fail_writes -= 1;
            return Err(FakeError::Injected);
        }
        if !self.present(register) {
            return Err(FakeError::Nack);
        }
        self.regs[register as usize] = value;
        self.writes.push((register, value));
        Ok(())
    }

    fn read_register(
        &mut self,
        address: u8,
        register: u8,
        data: &mut [u8],
    ) -> Result<(), FakeError> {
        self.last_address = Some(address);
        let index = self.read_count;
        self.read_count += 1;
        if self.failing_reads.contains(&index) {
            return Err(FakeError::Injected);
        }
        if !self.present(register) {
            return Err(FakeError::Nack);
        }
        data[0] = self.regs[register as usize];
        if register == 0x4c || register == 0x4d {
            self.regs[register as usize] = 0x00;
        }
        self.reads.push(register);
        Ok(())
    }

    fn ensure_ready(&mut self) -> Result<(), FakeError> {
        if self.ready {
            Ok(())
        } else {
            Err(FakeError::NotReady)
        }
    }

    fn set_address_pins(&mut self, a0: bool, a1: bool, a2: bool) -> Option<Result<(), FakeError>> {
        if !self.supports_address_pins {
            return None;
        }
        self.address_pins = Some((a0, a1, a2));
        Some(Ok(()))
    }

    fn listen_interrupts(&mut self) -> Option<Result<(), FakeError>> {
        if !self.supports_interrupts {
            return None;
        }
        self.listening = true;
        Some(Ok(()))
    }
}
