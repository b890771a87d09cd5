//! Interrupt-masked critical sections
//!
//! Thread-context code that shares state with the timer interrupt holds a
//! [`CriticalSection`] for as long as that state may be inconsistent.
//! The previous mask state is restored when the guard drops, so sections
//! nest and early returns cannot leave interrupts masked.

use hal::InterruptController;

/// Scoped global interrupt mask
#[must_use = "interrupts are unmasked again as soon as the guard is dropped"]
pub struct CriticalSection<'a, I: InterruptController> {
    controller: &'a I,
    were_enabled: bool,
}

impl<'a, I: InterruptController> CriticalSection<'a, I> {
    /// Masks interrupts until the returned guard is dropped
    pub fn enter(controller: &'a I) -> Self {
        let were_enabled = controller.mask_all();
        Self {
            controller,
            were_enabled,
        }
    }
}

impl<I: InterruptController> Drop for CriticalSection<'_, I> {
    fn drop(&mut self) {
        self.controller.restore(self.were_enabled);
    }
}
