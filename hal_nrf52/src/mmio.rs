//! Memory-mapped register access
//!
//! This module provides a trait-based abstraction for 32-bit register
//! access, so peripheral drivers can be tested against plain memory.
//!
//! ## Safety
//!
//! Register access is inherently unsafe as it directly interacts with
//! hardware. `RealMmio` can only be created through an `unsafe`
//! constructor whose caller vouches for the base address; after that,
//! every access stays inside the peripheral's register block.

/// Register access trait
///
/// ## Implementation Notes
///
/// Implementations must guarantee:
/// - Every access is a single 32-bit read or write
/// - Accesses are neither merged, reordered nor elided
/// - Operations complete before returning
pub trait Mmio {
    /// Reads the register at `offset` bytes from the block base
    fn read32(&self, offset: usize) -> u32;

    /// Writes the register at `offset` bytes from the block base
    fn write32(&self, offset: usize, value: u32);
}

impl<M: Mmio + ?Sized> Mmio for &M {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value)
    }
}

/// Real hardware register block
#[derive(Debug)]
pub struct RealMmio {
    base: usize,
}

impl RealMmio {
    /// Creates an accessor for the register block at `base`
    ///
    /// # Safety
    ///
    /// `base` must be the address of a peripheral register block that is
    /// valid for volatile 32-bit access at every offset its driver uses,
    /// and no other driver may own the same block.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Returns the block base address
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl Mmio for RealMmio {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        // SAFETY: `new` requires the block to be valid for volatile access
        // at every offset the owning driver uses.
        unsafe { core::ptr::read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        // SAFETY: as for `read32`.
        unsafe { core::ptr::write_volatile((self.base + offset) as *mut u32, value) }
    }
}

/// Memory-backed register block for tests
///
/// Stores the last value written to each register and records every
/// write in order. It does not emulate write-one-to-set registers.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FakeMmio {
    registers: std::cell::RefCell<std::collections::BTreeMap<usize, u32>>,
    writes: std::cell::RefCell<Vec<(usize, u32)>>,
}

#[cfg(test)]
impl FakeMmio {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Presets a register without recording a write
    pub(crate) fn preset(&self, offset: usize, value: u32) {
        self.registers.borrow_mut().insert(offset, value);
    }

    /// Returns all recorded writes
    pub(crate) fn writes(&self) -> Vec<(usize, u32)> {
        self.writes.borrow().clone()
    }

    pub(crate) fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }
}

#[cfg(test)]
impl Mmio for FakeMmio {
    fn read32(&self, offset: usize) -> u32 {
        self.registers.borrow().get(&offset).copied().unwrap_or(0)
    }

    fn write32(&self, offset: usize, value: u32) {
        self.registers.borrow_mut().insert(offset, value);
        self.writes.borrow_mut().push((offset, value));
    }
}
