//! Simulated kernel primitives
//!
//! `SimEvent` stands in for a kernel event object and `SimEpilogue` for
//! the interrupt entry/exit path. Both only record what happened.

use kernel_api::{IrqEpilogue, WaitEvent};
use spin::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Simulated kernel event
///
/// Counts signals instead of waking tasks.
#[derive(Debug, Default)]
pub struct SimEvent {
    signals: AtomicUsize,
}

impl SimEvent {
    /// Creates an unsignaled event
    pub const fn new() -> Self {
        Self {
            signals: AtomicUsize::new(0),
        }
    }

    /// Returns true once the event has been signaled
    pub fn is_signaled(&self) -> bool {
        self.signal_count() > 0
    }

    /// Returns the number of times the event was signaled
    pub fn signal_count(&self) -> usize {
        self.signals.load(Ordering::SeqCst)
    }

    /// Returns the event to the unsignaled state
    pub fn reset(&self) {
        self.signals.store(0, Ordering::SeqCst);
    }
}

impl WaitEvent for SimEvent {
    fn signal(&self) {
        self.signals.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
struct EpilogueState {
    depth: AtomicUsize,
    entries: AtomicUsize,
    exits: Mutex<Vec<bool>>,
}

/// Simulated interrupt epilogue
///
/// Records the reschedule flag of every `irq_exit` and panics on
/// unbalanced entry/exit. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct SimEpilogue {
    state: Arc<EpilogueState>,
}

impl SimEpilogue {
    /// Creates an epilogue with no recorded interrupts
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of `irq_entry` calls
    pub fn entries(&self) -> usize {
        self.state.entries.load(Ordering::SeqCst)
    }

    /// Returns the reschedule flag of every `irq_exit`, in order
    pub fn exits(&self) -> Vec<bool> {
        self.state.exits.lock().clone()
    }

    /// Returns the number of exits that requested a reschedule
    pub fn reschedules(&self) -> usize {
        self.state.exits.lock().iter().filter(|resched| **resched).count()
    }

    /// Returns true if currently between entry and exit
    pub fn in_interrupt(&self) -> bool {
        self.state.depth.load(Ordering::SeqCst) > 0
    }
}

impl IrqEpilogue for SimEpilogue {
    fn irq_entry(&self) {
        self.state.entries.fetch_add(1, Ordering::SeqCst);
        self.state.depth.fetch_add(1, Ordering::SeqCst);
    }

    fn irq_exit(&self, reschedule: bool) {
        let depth = self.state.depth.load(Ordering::SeqCst);
        assert!(depth > 0, "irq_exit without matching irq_entry");
        self.state.depth.store(depth - 1, Ordering::SeqCst);
        self.state.exits.lock().push(reschedule);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_signal_and_reset() {
        let event = SimEvent::new();
        assert!(!event.is_signaled());

        event.signal();
        event.signal();
        assert_eq!(event.signal_count(), 2);

        event.reset();
        assert!(!event.is_signaled());
    }

    #[test]
    fn test_epilogue_records_exits() {
        let epilogue = SimEpilogue::new();
        let observer = epilogue.clone();
        epilogue.irq_entry();
        assert!(epilogue.in_interrupt());
        epilogue.irq_exit(false);
        epilogue.irq_entry();
        epilogue.irq_exit(true);

        assert!(!observer.in_interrupt());
        assert_eq!(observer.entries(), 2);
        assert_eq!(observer.exits(), vec![false, true]);
        assert_eq!(observer.reschedules(), 1);
    }

    #[test]
    #[should_panic(expected = "irq_exit without matching irq_entry")]
    fn test_unbalanced_exit_panics() {
        SimEpilogue::new().irq_exit(false);
    }
}
