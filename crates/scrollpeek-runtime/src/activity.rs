#![forbid(unsafe_code)]

//! Scroll-activity source registration.
//!
//! The host delivers scroll notifications by calling
//! [`ScrollPopup::on_scroll`](crate::popup::ScrollPopup::on_scroll). What the
//! popup owns is the *registration*: a handle that, once detached, stops
//! the host from delivering further notifications. The popup detaches it
//! exactly once, on teardown.

/// A detachable registration with the host's scroll-event source.
pub trait ActivitySource {
    /// Remove the listener from the host.
    ///
    /// The popup calls this at most once.
    fn detach(&mut self);
}

impl<F> ActivitySource for F
where
    F: FnMut(),
{
    fn detach(&mut self) {
        self()
    }
}
