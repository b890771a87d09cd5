//! Interrupt-context kernel primitives
//!
//! Drivers running in interrupt context may only touch the kernel
//! through these traits. None of them block.

use crate::time::Millis;

/// Result of interrupt-context work
///
/// Tells the interrupt epilogue whether a task may have become runnable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandlerReturn {
    /// Nothing changed; resume the interrupted task
    #[default]
    NoReschedule,
    /// A task may have become runnable; re-run the scheduler
    Reschedule,
}

impl HandlerReturn {
    /// Returns true if a reschedule was requested
    pub const fn is_reschedule(self) -> bool {
        matches!(self, HandlerReturn::Reschedule)
    }
}

impl From<bool> for HandlerReturn {
    fn from(reschedule: bool) -> Self {
        if reschedule {
            HandlerReturn::Reschedule
        } else {
            HandlerReturn::NoReschedule
        }
    }
}

/// Kernel synchronization object that tasks wait on
///
/// `signal` wakes the waiters of this object only. It is called from
/// interrupt context and must not block or reschedule by itself; the
/// caller reports the reschedule need through its epilogue instead.
pub trait WaitEvent: Sync {
    /// Signals the event
    fn signal(&self);
}

/// Kernel interrupt prologue/epilogue
///
/// Every interrupt handler brackets its work between `irq_entry` and
/// `irq_exit`.
pub trait IrqEpilogue {
    /// Called on entry to an interrupt handler
    fn irq_entry(&self);

    /// Called on exit; `reschedule` asks the scheduler to run before
    /// returning to the interrupted task
    fn irq_exit(&self, reschedule: bool);
}

/// Periodic tick handler, invoked from interrupt context
///
/// Any state the handler needs travels with the implementing object.
pub trait TickHandler: Sync {
    /// Called once per periodic tick with the already advanced time
    fn on_tick(&self, now: Millis) -> HandlerReturn;
}

impl<F> TickHandler for F
where
    F: Fn(Millis) -> HandlerReturn + Sync,
{
    fn on_tick(&self, now: Millis) -> HandlerReturn {
        self(now)
    }
}
