//! Re-entrancy guards: a single in-flight slot and time-based cooldowns.
//!
//! Input can deliver the same command several times in a row (key repeat,
//! double click, several listeners on one button). Each guarded command keeps
//! its own cooldown measured on the injected clock.

/// Rejects invocations that arrive within `window_ms` of the last accepted one
#[derive(Debug, Clone)]
pub struct Cooldown {
    window_ms: u64,
    last_ms: Option<u64>,
}

impl Cooldown {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_ms: None,
        }
    }

    /// Outside the window of the last accepted invocation
    pub fn is_open(&self, now_ms: u64) -> bool {
        match self.last_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.window_ms,
            None => true,
        }
    }

    /// Mark an invocation as accepted
    pub fn stamp(&mut self, now_ms: u64) {
        self.last_ms = Some(now_ms);
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Holds at most one operation in progress
#[derive(Debug, Clone, Default)]
pub struct OperationSlot<T> {
    current: Option<T>,
}

impl<T: Copy + PartialEq> OperationSlot<T> {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Occupy the slot; false if something is already running
    pub fn begin(&mut self, op: T) -> bool {
        if self.current.is_some() {
            return false;
        }
        self.current = Some(op);
        true
    }

    pub fn end(&mut self) {
        self.current = None;
    }

    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_open_before_first_stamp() {
        let c = Cooldown::new(300);
        assert!(c.is_open(0));
    }

    #[test]
    fn test_cooldown_closed_inside_window() {
        let mut c = Cooldown::new(300);
        c.stamp(1000);
        assert!(!c.is_open(1000));
        assert!(!c.is_open(1299));
        assert!(c.is_open(1300));
    }

    #[test]
    fn test_cooldown_open_until_stamped() {
        let mut c = Cooldown::new(300);
        assert!(c.is_open(0));
        assert!(c.is_open(10));
        c.stamp(10);
        assert!(!c.is_open(309));
        assert!(c.is_open(310));
    }

    #[test]
    fn test_cooldown_reset() {
        let mut c = Cooldown::new(300);
        c.stamp(0);
        c.reset();
        assert!(c.is_open(1));
    }

    #[test]
    fn test_zero_window_never_closes() {
        let mut c = Cooldown::new(0);
        c.stamp(5);
        assert!(c.is_open(5));
    }

    #[test]
    fn test_slot_single_occupant() {
        let mut slot = OperationSlot::new();
        assert!(slot.begin(1u8));
        assert!(!slot.begin(2u8));
        assert!(slot.is_busy());
        slot.end();
        assert!(!slot.is_busy());
        assert!(slot.begin(2u8));
    }
}
