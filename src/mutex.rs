/// Lock around a shared [`Pcal95555`][crate::Pcal95555].
///
/// The driver does no locking of its own.  Pin handles from [`split()`][crate::split] borrow the
/// driver through this trait, and an interrupt context calling
/// [`handle_interrupt()`][crate::Pcal95555::handle_interrupt] needs the same lock as the code
/// driving the pins.  Which lock fits depends on where the driver is shared:
///
/// - [`core::cell::RefCell`] works when everything runs in one context.
/// - `std::sync::Mutex` is available with the `std` feature, for hosted targets.
/// - `critical_section::Mutex<RefCell<_>>` is available with the `critical-section` feature, for
///   sharing between thread mode and an interrupt handler on bare metal.
///
/// Any other lock can be used by implementing the trait on a newtype around it:
///
/// ```
/// struct Shared<T>(std::sync::RwLock<T>);
///
/// impl<T> pcal95555::DriverMutex for Shared<T> {
///     type Driver = T;
///
///     fn create(v: T) -> Self {
///         Self(std::sync::RwLock::new(v))
///     }
///
///     fn lock<R, F: FnOnce(&mut Self::Driver) -> R>(&self, f: F) -> R {
///         f(&mut self.0.write().unwrap())
///     }
/// }
/// ```
pub trait DriverMutex {
    type Driver;

    /// Wrap `v` in a new lock.
    fn create(v: Self::Driver) -> Self;

    /// Run `f` with exclusive access to the driver.
    fn lock<R, F: FnOnce(&mut Self::Driver) -> R>(&self, f: F) -> R;
}

impl<T> DriverMutex for core::cell::RefCell<T> {
    type Driver = T;

    fn create(v: Self::Driver) -> Self {
        core::cell::RefCell::new(v)
    }

    fn lock<R, F: FnOnce(&mut Self::Driver) -> R>(&self, f: F) -> R {
        let mut v = self.borrow_mut();
        f(&mut v)
    }
}

#[cfg(any(test, feature = "std"))]
impl<T> DriverMutex for std::sync::Mutex<T> {
    type Driver = T;

    fn create(v: Self::Driver) -> Self {
        std::sync::Mutex::new(v)
    }

    fn lock<R, F: FnOnce(&mut Self::Driver) -> R>(&self, f: F) -> R {
        // A panicking callback leaves the driver in a consistent state.
        let mut v = self.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut v)
    }
}

#[cfg(feature = "critical-section")]
impl<T> DriverMutex for critical_section::Mutex<core::cell::RefCell<T>> {
    type Driver = T;

    fn create(v: Self::Driver) -> Self {
        critical_section::Mutex::new(core::cell::RefCell::new(v))
    }

    fn lock<R, F: FnOnce(&mut Self::Driver) -> R>(&self, f: F) -> R {
        critical_section::with(|cs| {
            let mut v = self.borrow_ref_mut(cs);
            f(&mut v)
        })
    }
}
