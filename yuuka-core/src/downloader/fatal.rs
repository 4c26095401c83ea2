use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use log::debug;

/// Single-assignment slot for the first fatal error of an operation.
///
/// `try_set` only succeeds while the slot is empty. Losing writers return right away and their
/// error is dropped, they never wait on the winner.
#[derive(Debug)]
pub struct FirstError<E> {
    claimed: AtomicBool,
    slot: Mutex<Option<E>>,
}

impl<E> Default for FirstError<E> {
    fn default() -> Self {
        Self {
            claimed: AtomicBool::new(false),
            slot: Mutex::new(None),
        }
    }
}

impl<E: Display> FirstError<E> {
    /// Stores `error` if no other error was stored before. Returns whether it was kept.
    pub fn try_set(&self, error: E) -> bool {
        if self.claimed.swap(true, Ordering::SeqCst) {
            debug!("Dropping error raised after the first one: {}", error);
            return false;
        }

        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
        true
    }
}

impl<E> FirstError<E> {
    #[inline]
    pub fn is_set(&self) -> bool {
        self.claimed.load(Ordering::SeqCst)
    }

    /// Takes the stored error out. Only meaningful once every writer is done.
    pub fn take(&self) -> Option<E> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
