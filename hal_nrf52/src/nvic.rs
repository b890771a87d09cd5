//! # NVIC and PRIMASK
//!
//! `InterruptController` for Cortex-M4: per-line enables go through the
//! NVIC set/clear-enable registers, the global mask is PRIMASK.
//!
//! Off target the global mask is emulated with a flag so the driver can
//! be exercised by host tests.

use crate::mmio::Mmio;
use hal::{InterruptController, IrqNumber};

const ISER: usize = 0x100;
const ICER: usize = 0x180;

const fn line_word(irq: IrqNumber) -> (usize, u32) {
    let n = irq.number() as usize;
    (4 * (n / 32), 1 << (n % 32))
}

/// Cortex-M interrupt controller
#[derive(Debug)]
pub struct Nrf52Interrupts<M: Mmio> {
    nvic: M,
    mask: primask::Primask,
}

impl<M: Mmio> Nrf52Interrupts<M> {
    /// Wraps the NVIC register block
    pub fn new(nvic: M) -> Self {
        Self {
            nvic,
            mask: primask::Primask::new(),
        }
    }

    /// Returns the underlying register block
    pub fn registers(&self) -> &M {
        &self.nvic
    }
}

impl<M: Mmio> InterruptController for Nrf52Interrupts<M> {
    fn enable_irq(&self, irq: IrqNumber) {
        let (word, bit) = line_word(irq);
        self.nvic.write32(ISER + word, bit);
    }

    fn disable_irq(&self, irq: IrqNumber) {
        let (word, bit) = line_word(irq);
        self.nvic.write32(ICER + word, bit);
    }

    fn irq_enabled(&self, irq: IrqNumber) -> bool {
        let (word, bit) = line_word(irq);
        self.nvic.read32(ISER + word) & bit != 0
    }

    fn mask_all(&self) -> bool {
        self.mask.disable()
    }

    fn restore(&self, were_enabled: bool) {
        if were_enabled {
            self.mask.enable();
        }
    }

    fn interrupts_enabled(&self) -> bool {
        self.mask.is_enabled()
    }
}

#[cfg(target_arch = "arm")]
mod primask {
    use core::arch::asm;
    use core::sync::atomic::{compiler_fence, Ordering};

    #[derive(Debug)]
    pub(super) struct Primask;

    impl Primask {
        pub(super) const fn new() -> Self {
            Self
        }

        pub(super) fn is_enabled(&self) -> bool {
            let primask: u32;
            // SAFETY: reading PRIMASK has no side effects.
            unsafe {
                asm!("mrs {}, PRIMASK", out(reg) primask, options(nomem, nostack, preserves_flags));
            }
            primask & 1 == 0
        }

        pub(super) fn disable(&self) -> bool {
            let was_enabled = self.is_enabled();
            // SAFETY: masking interrupts cannot break memory safety.
            unsafe {
                asm!("cpsid i", options(nostack, preserves_flags));
            }
            compiler_fence(Ordering::SeqCst);
            was_enabled
        }

        pub(super) fn enable(&self) {
            compiler_fence(Ordering::SeqCst);
            // SAFETY: only reached when restoring a state in which
            // interrupts were already enabled.
            unsafe {
                asm!("cpsie i", options(nostack, preserves_flags));
            }
        }
    }
}

#[cfg(not(target_arch = "arm"))]
mod primask {
    use core::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug)]
    pub(super) struct Primask {
        enabled: AtomicBool,
    }

    impl Primask {
        pub(super) const fn new() -> Self {
            Self {
                enabled: AtomicBool::new(true),
            }
        }

        pub(super) fn is_enabled(&self) -> bool {
            self.enabled.load(Ordering::SeqCst)
        }

        pub(super) fn disable(&self) -> bool {
            self.enabled.swap(false, Ordering::SeqCst)
        }

        pub(super) fn enable(&self) {
            self.enabled.store(true, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmio::FakeMmio;

    #[test]
    fn test_enable_writes_iser_bit() {
        let nvic = Nrf52Interrupts::new(FakeMmio::new());
        nvic.enable_irq(IrqNumber(17));
        nvic.enable_irq(IrqNumber(40));
        nvic.disable_irq(IrqNumber(17));
        assert_eq!(
            nvic.registers().writes(),
            vec![(0x100, 1 << 17), (0x104, 1 << 8), (0x180, 1 << 17)]
        );
    }

    #[test]
    fn test_irq_enabled_reads_iser() {
        let io = FakeMmio::new();
        io.preset(0x100, 1 << 17);
        let nvic = Nrf52Interrupts::new(io);
        assert!(nvic.irq_enabled(IrqNumber(17)));
        assert!(!nvic.irq_enabled(IrqNumber(18)));
    }

    #[test]
    fn test_nested_mask_restores_outer_state() {
        let nvic = Nrf52Interrupts::new(FakeMmio::new());
        let outer = nvic.mask_all();
        let inner = nvic.mask_all();
        assert!(outer);
        assert!(!inner);

        nvic.restore(inner);
        assert!(!nvic.interrupts_enabled());
        nvic.restore(outer);
        assert!(nvic.interrupts_enabled());
    }
}
