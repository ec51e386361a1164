//! Interrupt dispatch.
//!
//! The expander pulls its INT line low when an input changes.  Whatever notices that (an EXTI
//! handler, a task polling the line, or the transport after
//! [`register_interrupt_handler()`][Pcal95555::register_interrupt_handler]) should call
//! [`handle_interrupt()`][Pcal95555::handle_interrupt].  The driver then finds out which pins
//! changed and calls the registered callbacks:
//!
//! - On the extended variant, the interrupt status registers tell which pins changed (reading
//!   them clears them).
//! - The base variant has no status registers, so the current input levels are compared against
//!   the levels seen on the previous dispatch.
//!
//! The global callback receives the mask of changed pins on every dispatch.  A per-pin callback
//! is only called if its pin changed in the direction its [`Edge`] filter asks for.
use crate::{ChipVariant, Edge, Error, Pcal95555, Transport};

/// Callback for a single pin, receiving the pin number and its new level.
pub type PinCallback = fn(u8, bool);

/// Callback for every dispatch, receiving the mask of pins which changed.
pub type InterruptCallback = fn(u16);

#[derive(Clone, Copy)]
pub(crate) struct PinInterrupt {
    handler: PinCallback,
    edge: Edge,
}

impl<T: Transport> Pcal95555<T> {
    /// Call `handler` whenever `pin` changes according to `edge`.
    ///
    /// Replaces a callback registered earlier for the same pin.  The input levels are sampled
    /// again, so the first dispatch afterwards compares against the state at registration time.
    pub fn register_pin_interrupt(
        &mut self,
        pin: u8,
        edge: Edge,
        handler: PinCallback,
    ) -> Result<(), Error> {
        self.check_pin(pin)?;
        self.prepare(false)?;
        self.previous_states = self.read_input_levels()?;
        self.pin_callbacks[pin as usize] = Some(PinInterrupt { handler, edge });
        Ok(())
    }

    /// Remove the callback of `pin`.
    ///
    /// Returns `Ok(false)` if there was none.
    pub fn unregister_pin_interrupt(&mut self, pin: u8) -> Result<bool, Error> {
        self.check_pin(pin)?;
        Ok(self.pin_callbacks[pin as usize].take().is_some())
    }

    /// Set (or with `None`, remove) the callback invoked on every dispatch.
    pub fn set_interrupt_callback(&mut self, callback: Option<InterruptCallback>) {
        self.irq_callback = callback;
    }

    /// Ask the transport to call back on INT line activity.
    ///
    /// Fails with [`Error::UnsupportedFeature`] if the transport has no way to do so.
    pub fn register_interrupt_handler(&mut self) -> Result<(), Error> {
        match self.transport.listen_interrupts() {
            Some(Ok(())) => Ok(()),
            Some(Err(e)) => {
                log::warn!("transport failed to arm interrupt notification: {:?}", e);
                Err(self.fail(Error::UnsupportedFeature))
            }
            None => Err(self.fail(Error::UnsupportedFeature)),
        }
    }

    /// Find out which pins changed and dispatch the callbacks.
    ///
    /// Returns the mask of changed pins.
    ///
    /// Reading the status registers clears them on the chip.  If reading the input levels fails
    /// afterwards, the global callback still receives the changed mask before the error is
    /// returned, but no per-pin callbacks run for that dispatch.
    pub fn handle_interrupt(&mut self) -> Result<u16, Error> {
        self.prepare(false)?;

        let (changed, current) = if self.variant == ChipVariant::Extended {
            let changed = self.read_interrupt_status()?;
            match self.read_input_levels() {
                Ok(current) => (changed, current),
                Err(e) => {
                    log::warn!("interrupt: lost levels for changed pins {:#06x}", changed);
                    if let Some(callback) = self.irq_callback {
                        callback(changed);
                    }
                    return Err(e);
                }
            }
        } else {
            let current = self.read_input_levels()?;
            (current ^ self.previous_states, current)
        };
        log::debug!(
            "interrupt: changed {:#06x}, levels {:#06x} -> {:#06x}",
            changed,
            self.previous_states,
            current
        );

        if let Some(callback) = self.irq_callback {
            callback(changed);
        }

        for (pin, slot) in self.pin_callbacks.iter().enumerate() {
            let mask = 1 << pin;
            if changed & mask == 0 {
                continue;
            }
            if let Some(PinInterrupt { handler, edge }) = *slot {
                let was_high = self.previous_states & mask != 0;
                let is_high = current & mask != 0;
                if edge.matches(was_high, is_high) {
                    handler(pin as u8, is_high);
                }
            }
        }

        self.previous_states = current;
        Ok(changed)
    }
}
