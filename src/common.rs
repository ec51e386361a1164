/// Direction of a pin.  In the configuration register a `1` bit means input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub(crate) fn bit(self) -> bool {
        self == Direction::Input
    }
}

/// Input polarity of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Normal,
    Inverted,
}

impl Polarity {
    pub(crate) fn bit(self) -> bool {
        self == Polarity::Inverted
    }
}

/// Output drive strength of a pin, from 0.25x (`Level0`) to 1x (`Level3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveStrength {
    Level0 = 0,
    Level1 = 1,
    Level2 = 2,
    Level3 = 3,
}

/// Output stage configuration of a whole port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    PushPull,
    OpenDrain,
}

/// Whether a pin may raise the INT line.
///
/// In the interrupt mask register a `0` bit means enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptState {
    Enabled,
    Disabled,
}

impl InterruptState {
    pub(crate) fn mask_bit(self) -> bool {
        self == InterruptState::Disabled
    }
}

/// Transition a per-pin interrupt callback is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
    Both,
}

impl Edge {
    /// Does this filter match a transition from `was_high` to `is_high`?
    pub(crate) fn matches(self, was_high: bool, is_high: bool) -> bool {
        let rising = !was_high && is_high;
        let falling = was_high && !is_high;

        match self {
            Edge::Rising => rising,
            Edge::Falling => falling,
            Edge::Both => rising || falling,
        }
    }
}

/// Which member of the chip family the driver talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipVariant {
    /// Not detected yet, or detection was inconclusive.
    Unknown,
    /// `PCA9555`: input, output, polarity and configuration registers only.
    Base,
    /// `PCAL9555A`: additionally pull resistors, drive strength, input latch, interrupt
    /// mask/status and output mode ("Agile I/O").
    Extended,
}

/// Pin Modes
pub mod mode {
    /// Trait for pin-modes which can be used to set a logic level.
    pub trait HasOutput {}
    /// Trait for pin-modes which can be used to read a logic level.
    pub trait HasInput {}

    /// Pin configured as an input.
    pub struct Input;
    impl HasInput for Input {}

    /// Pin configured as an output.
    pub struct Output;
    impl HasOutput for Output {}
}
