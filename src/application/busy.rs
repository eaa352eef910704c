use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::errors::DomainError;

/// Loading flag for one kind of request. Set before the remote call, cleared
/// when the guard drops whatever the outcome.
#[derive(Debug, Default)]
pub struct BusyFlag(AtomicBool);

impl BusyFlag {
    pub fn try_begin(&self) -> Result<BusyGuard<'_>, DomainError> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard(&self.0))
            .map_err(|_| DomainError::Busy)
    }

    #[cfg(test)]
    fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
