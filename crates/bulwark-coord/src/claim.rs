//! Per-threat intercept claim.
//!
//! A test-and-set flag: exactly one resolution may hold it at a time, so two
//! interceptors arriving in the same tick cannot both credit an outcome. The
//! flag is an `AtomicBool` and behaves the same under a threaded driver.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct InterceptClaim(AtomicBool);

impl InterceptClaim {
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Claim the threat. Returns false if it was already claimed.
    pub fn try_claim(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Release the claim so another resolution may take it.
    pub fn release(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_claimed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Clone for InterceptClaim {
    fn clone(&self) -> Self {
        Self(AtomicBool::new(self.is_claimed()))
    }
}
