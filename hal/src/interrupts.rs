//! Interrupt controller abstraction

use serde::{Deserialize, Serialize};

/// Interrupt line number at the interrupt controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrqNumber(pub u16);

impl IrqNumber {
    /// Returns the raw line number.
    pub const fn number(self) -> u16 {
        self.0
    }
}

/// Interrupt controller trait
///
/// Covers the two things kernel drivers need from the controller:
/// enabling their own line, and masking everything for a short
/// critical section. Both are process-wide CPU state, so the trait
/// works through shared references.
pub trait InterruptController {
    /// Enables an interrupt line
    fn enable_irq(&self, irq: IrqNumber);

    /// Disables an interrupt line
    fn disable_irq(&self, irq: IrqNumber);

    /// Returns whether an interrupt line is enabled
    fn irq_enabled(&self, irq: IrqNumber) -> bool;

    /// Masks all maskable interrupts
    ///
    /// Returns whether interrupts were enabled before the call, to be
    /// handed back to [`InterruptController::restore`].
    fn mask_all(&self) -> bool;

    /// Restores the global mask state returned by `mask_all`
    fn restore(&self, were_enabled: bool);

    /// Returns whether interrupts are globally enabled
    fn interrupts_enabled(&self) -> bool;
}
