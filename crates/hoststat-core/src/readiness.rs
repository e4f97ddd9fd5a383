//! Startup readiness: cycles run only after the store has been initialized.
//!
//! NOT_READY → READY happens once and never reverses. The transition is owned
//! by [`ReadySignal`], which is consumed by [`ReadySignal::mark_ready`].

use tokio::sync::watch;

/// Write half, held by whoever initializes the store.
#[derive(Debug)]
pub struct ReadySignal {
    tx: watch::Sender<bool>,
}

/// Read half, polled by the scheduler on every tick.
#[derive(Debug, Clone)]
pub struct ReadyGate {
    rx: watch::Receiver<bool>,
}

/// Creates a linked pair in the NOT_READY state.
pub fn readiness() -> (ReadySignal, ReadyGate) {
    let (tx, rx) = watch::channel(false);
    (ReadySignal { tx }, ReadyGate { rx })
}

impl ReadySignal {
    /// Moves every linked gate to READY.
    pub fn mark_ready(self) {
        // send_replace stores the value even when no gate is left.
        self.tx.send_replace(true);
    }
}

impl ReadyGate {
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_not_ready() {
        let (_signal, gate) = readiness();
        assert!(!gate.is_ready());
    }

    #[test]
    fn test_mark_ready_reaches_every_gate() {
        let (signal, gate) = readiness();
        let other = gate.clone();

        signal.mark_ready();

        assert!(gate.is_ready());
        assert!(other.is_ready());
    }

    #[test]
    fn test_dropped_signal_stays_not_ready() {
        let (signal, gate) = readiness();
        drop(signal);
        assert!(!gate.is_ready());
    }
}
