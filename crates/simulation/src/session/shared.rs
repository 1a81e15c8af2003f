use std::sync::{Arc, Mutex, MutexGuard};

use super::Session;

/// Cloneable handle to one [`Session`] behind a single lock, for hosts that
/// tick on one thread and take operator input on another.
#[derive(Clone, Default)]
pub struct SharedSession(Arc<Mutex<Session>>);

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    /// Lock the session. A poisoned lock is recovered rather than propagated,
    /// so one panicking holder does not take every other handle down with it.
    /// The state may then be partial: a panic inside `advance` can leave the
    /// clock and hazards updated with the route not yet refreshed. Call
    /// `reset` if that matters to the host.
    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<T>(&self, f: impl FnOnce(&mut Session) -> T) -> T {
        f(&mut self.lock())
    }
}
