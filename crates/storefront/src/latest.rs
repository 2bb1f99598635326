//! Latest-request tickets.
//!
//! Each new request of a kind takes a ticket. Work that finishes after a
//! newer ticket was issued is stale and must not be applied.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one request in a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Issues tickets and answers whether a ticket is still the latest.
#[derive(Debug, Default)]
pub struct LatestRequest {
    seq: AtomicU64,
}

impl LatestRequest {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seq: AtomicU64::new(0),
        }
    }

    /// Start a new request, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.seq.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether no newer request has started since `ticket` was issued.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.seq.load(Ordering::Acquire) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes() {
        let latest = LatestRequest::new();
        let first = latest.begin();
        assert!(latest.is_current(first));

        let second = latest.begin();
        assert!(!latest.is_current(first));
        assert!(latest.is_current(second));
        assert!(second > first);
    }
}
