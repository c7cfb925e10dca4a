/// Common interface for mutex implementations guarding a device handle.
///
/// The [`Mcp23008`](crate::Mcp23008) handle does no locking of its own.  When pins or tasks in
/// different contexts need the same device, the handle lives inside one of these and every
/// operation runs with the lock held.  Implementations exist for:
///
/// | Mutex | Feature Name | Notes |
/// | --- | --- | --- |
/// | [`core::cell::RefCell`] | _always available_ | For sharing within a single execution context. |
/// | [`critical_section::Mutex<RefCell<_>>`][mutex-cs] | `critical-section` | Shared with interrupt handlers. |
/// | [`std::sync::Mutex`][mutex-std] | `std` | For platforms where `std` is available. |
///
/// [mutex-cs]: https://docs.rs/critical-section/latest/critical_section/struct.Mutex.html
/// [mutex-std]: https://doc.rust-lang.org/std/sync/struct.Mutex.html
///
/// Other mutex types need a newtype because of the orphan rule:
///
/// ```
/// struct MyMutex<T>(std::sync::Mutex<T>);
///
/// impl<T> mcp23008::DeviceMutex for MyMutex<T> {
///     type Device = T;
///
///     fn create(v: T) -> Self {
///         Self(std::sync::Mutex::new(v))
///     }
///
///     fn lock<R, F: FnOnce(&mut Self::Device) -> R>(&self, f: F) -> R {
///         let mut v = self.0.lock().unwrap();
///         f(&mut v)
///     }
/// }
/// ```
pub trait DeviceMutex {
    /// The device handle wrapped inside this mutex.
    type Device;

    /// Create a new mutex of this type.
    fn create(v: Self::Device) -> Self;

    /// Lock the mutex and give a closure access to the handle inside.
    fn lock<R, F: FnOnce(&mut Self::Device) -> R>(&self, f: F) -> R;
}

impl<T> DeviceMutex for core::cell::RefCell<T> {
    type Device = T;

    fn create(v: Self::Device) -> Self {
        core::cell::RefCell::new(v)
    }

    fn lock<R, F: FnOnce(&mut Self::Device) -> R>(&self, f: F) -> R {
        let mut v = self.borrow_mut();
        f(&mut v)
    }
}

#[cfg(feature = "critical-section")]
impl<T> DeviceMutex for critical_section::Mutex<core::cell::RefCell<T>> {
    type Device = T;

    fn create(v: Self::Device) -> Self {
        critical_section::Mutex::new(core::cell::RefCell::new(v))
    }

    fn lock<R, F: FnOnce(&mut Self::Device) -> R>(&self, f: F) -> R {
        critical_section::with(|cs| {
            let mut v = self.borrow_ref_mut(cs);
            f(&mut v)
        })
    }
}

#[cfg(any(test, feature = "std"))]
impl<T> DeviceMutex for std::sync::Mutex<T> {
    type Device = T;

    fn create(v: Self::Device) -> Self {
        std::sync::Mutex::new(v)
    }

    fn lock<R, F: FnOnce(&mut Self::Device) -> R>(&self, f: F) -> R {
        // shadow updates only happen after a completed write, so a poisoned handle is intact
        let mut v = self.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut v)
    }
}
