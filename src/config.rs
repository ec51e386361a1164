//! Power-on configuration applied by [`Pcal95555::init_from_config()`][crate::Pcal95555::init_from_config].

use crate::{Direction, OutputMode};

/// Desired state of all pins after initialization.
///
/// Every mask holds one bit per pin, bit `n` belonging to pin `n`.  The default leaves all pins
/// floating inputs with the output latches low, pull-up selected (but disabled) and both ports in
/// push-pull mode.
///
/// ```
/// # use pcal95555::{Config, Direction, OutputMode};
/// let config = Config::default()
///     .direction(0x00ff, Direction::Output)
///     .output(0x0001, true)
///     .pull_enable(0xff00, true)
///     .open_drain(OutputMode::OpenDrain, OutputMode::PushPull);
/// assert_eq!(config.direction_bits(), 0xff00);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    direction: u16,
    output: u16,
    pull_enable: u16,
    pull_up: u16,
    port0_mode: OutputMode,
    port1_mode: OutputMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            direction: 0xffff,
            output: 0x0000,
            pull_enable: 0x0000,
            pull_up: 0xffff,
            port0_mode: OutputMode::PushPull,
            port1_mode: OutputMode::PushPull,
        }
    }
}

fn apply(bits: u16, mask: u16, set: bool) -> u16 {
    if set {
        bits | mask
    } else {
        bits & !mask
    }
}

impl Config {
    /// Set the direction of all pins in `mask`.
    pub fn direction(mut self, mask: u16, dir: Direction) -> Self {
        self.direction = apply(self.direction, mask, dir.bit());
        self
    }

    /// Set the initial output level of all pins in `mask`.
    pub fn output(mut self, mask: u16, high: bool) -> Self {
        self.output = apply(self.output, mask, high);
        self
    }

    /// Enable or disable the pull resistor of all pins in `mask`.
    pub fn pull_enable(mut self, mask: u16, enable: bool) -> Self {
        self.pull_enable = apply(self.pull_enable, mask, enable);
        self
    }

    /// Select pull-up (`true`) or pull-down (`false`) for all pins in `mask`.
    pub fn pull_up(mut self, mask: u16, up: bool) -> Self {
        self.pull_up = apply(self.pull_up, mask, up);
        self
    }

    /// Output stage of port 0 and port 1.
    pub fn open_drain(mut self, port0: OutputMode, port1: OutputMode) -> Self {
        self.port0_mode = port0;
        self.port1_mode = port1;
        self
    }

    pub fn direction_bits(&self) -> u16 {
        self.direction
    }

    pub fn output_bits(&self) -> u16 {
        self.output
    }

    pub fn pull_enable_bits(&self) -> u16 {
        self.pull_enable
    }

    pub fn pull_up_bits(&self) -> u16 {
        self.pull_up
    }

    /// Value of the output port configuration register.
    pub(crate) fn output_mode_bits(&self) -> u8 {
        output_mode_bits(self.port0_mode, self.port1_mode)
    }
}

pub(crate) fn output_mode_bits(port0: OutputMode, port1: OutputMode) -> u8 {
    let od = |m: OutputMode| (m == OutputMode::OpenDrain) as u8;
    (od(port1) << 1) | od(port0)
}
