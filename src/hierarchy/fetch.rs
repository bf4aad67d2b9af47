/// Stale-response protection for snapshot loads.
///
/// Each load takes a ticket; only the newest ticket of an open guard may apply
/// its result. Closing the guard (modal closed, page left) invalidates every
/// outstanding ticket until the next `begin`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchGuard {
    latest: u64,
    open: bool,
}

impl FetchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load and return its ticket. Reopens a closed guard.
    pub fn begin(&mut self) -> u64 {
        self.latest = self.latest.saturating_add(1);
        self.open = true;
        self.latest
    }

    pub fn accept(&self, ticket: u64) -> bool {
        self.open && ticket == self.latest
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let mut guard = FetchGuard::new();
        let first = guard.begin();
        let second = guard.begin();
        assert!(!guard.accept(first));
        assert!(guard.accept(second));
    }

    #[test]
    fn test_close_discards_outstanding_ticket() {
        let mut guard = FetchGuard::new();
        let t = guard.begin();
        guard.close();
        assert!(!guard.accept(t));

        let t2 = guard.begin();
        assert!(guard.accept(t2));
        assert!(!guard.accept(t));
    }

    #[test]
    fn test_fresh_guard_accepts_nothing() {
        let guard = FetchGuard::new();
        assert!(!guard.accept(0));
    }
}
