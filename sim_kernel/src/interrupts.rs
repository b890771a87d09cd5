//! Simulated interrupt controller
//!
//! Tracks enabled lines and the global mask. Also counts how often the
//! global mask was taken so tests can check that a critical section ran.

use hal::{InterruptController, IrqNumber};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct InterruptState {
    enabled: AtomicBool,
    lines: AtomicU64,
    mask_calls: AtomicUsize,
}

/// Simulated interrupt controller
///
/// Starts with interrupts globally enabled and every line disabled.
/// Clones share the same controller.
#[derive(Debug, Clone)]
pub struct SimInterrupts {
    state: Arc<InterruptState>,
}

impl SimInterrupts {
    /// Creates a controller with interrupts enabled and all lines off
    pub fn new() -> Self {
        Self {
            state: Arc::new(InterruptState {
                enabled: AtomicBool::new(true),
                lines: AtomicU64::new(0),
                mask_calls: AtomicUsize::new(0),
            }),
        }
    }

    /// Returns how many times `mask_all` has been called
    pub fn mask_calls(&self) -> usize {
        self.state.mask_calls.load(Ordering::SeqCst)
    }

    /// Returns true if `irq` would be taken right now
    pub fn would_take(&self, irq: IrqNumber) -> bool {
        self.interrupts_enabled() && self.irq_enabled(irq)
    }

    fn line_bit(irq: IrqNumber) -> u64 {
        assert!(irq.number() < 64, "IRQ {} outside simulated range", irq.number());
        1 << irq.number()
    }
}

impl Default for SimInterrupts {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptController for SimInterrupts {
    fn enable_irq(&self, irq: IrqNumber) {
        self.state
            .lines
            .fetch_or(Self::line_bit(irq), Ordering::SeqCst);
    }

    fn disable_irq(&self, irq: IrqNumber) {
        self.state
            .lines
            .fetch_and(!Self::line_bit(irq), Ordering::SeqCst);
    }

    fn irq_enabled(&self, irq: IrqNumber) -> bool {
        self.state.lines.load(Ordering::SeqCst) & Self::line_bit(irq) != 0
    }

    fn mask_all(&self) -> bool {
        self.state.mask_calls.fetch_add(1, Ordering::SeqCst);
        self.state.enabled.swap(false, Ordering::SeqCst)
    }

    fn restore(&self, were_enabled: bool) {
        self.state.enabled.store(were_enabled, Ordering::SeqCst);
    }

    fn interrupts_enabled(&self) -> bool {
        self.state.enabled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_enabled_with_no_lines() {
        let irq = SimInterrupts::new();
        assert!(irq.interrupts_enabled());
        assert!(!irq.irq_enabled(IrqNumber(17)));
        assert!(!irq.would_take(IrqNumber(17)));
    }

    #[test]
    fn test_mask_and_restore() {
        let irq = SimInterrupts::new();
        irq.enable_irq(IrqNumber(17));
        assert!(irq.would_take(IrqNumber(17)));

        let saved = irq.mask_all();
        assert!(saved);
        assert!(!irq.would_take(IrqNumber(17)));

        irq.restore(saved);
        assert!(irq.would_take(IrqNumber(17)));
        assert_eq!(irq.mask_calls(), 1);
    }

    #[test]
    #[should_panic(expected = "outside simulated range")]
    fn test_out_of_range_line_panics() {
        SimInterrupts::new().enable_irq(IrqNumber(64));
    }
}
