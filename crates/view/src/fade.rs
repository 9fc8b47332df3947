//! Delayed hiding of join/leave notices.
//!
//! A transient notice stays visible for a fixed delay after render, then its
//! visibility flag flips; the message itself is never deleted. Deadlines are
//! scheduled when a snapshot is applied and cancelled wholesale when the next
//! snapshot replaces it, so a notice that no longer exists can't fire.

use backscroll_core::{MessageId, Snapshot};

/// Pending and fired hide deadlines for the current snapshot's transients
#[derive(Debug, Clone, Default)]
pub struct FadeSchedule {
    pending: Vec<(MessageId, i64)>,
    hidden: std::collections::BTreeSet<MessageId>,
}

impl FadeSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all schedules with one deadline per transient message in the
    /// freshly applied snapshot. Prior deadlines and hidden flags are
    /// cancelled; the new render starts every notice visible again.
    pub fn reset(&mut self, snapshot: &Snapshot, deadline_ms: i64) {
        self.pending.clear();
        self.hidden.clear();
        for msg in snapshot.iter() {
            if msg.kind.is_transient() {
                self.pending.push((msg.id.clone(), deadline_ms));
            }
        }
    }

    /// Move due deadlines to hidden; returns the ids newly hidden this poll
    pub fn poll(&mut self, now_ms: i64) -> Vec<MessageId> {
        let mut fired = Vec::new();
        self.pending.retain(|(id, deadline)| {
            if *deadline <= now_ms {
                fired.push(id.clone());
                false
            } else {
                true
            }
        });
        for id in &fired {
            self.hidden.insert(id.clone());
        }
        fired
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains(id)
    }

    /// Deadlines not yet fired
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backscroll_core::Message;

    fn snapshot_with_join() -> Snapshot {
        Snapshot::new(vec![
            Message::text("t1", 0, "alice", "hi"),
            Message::join("j1", 10, "bob"),
            Message::leave("l1", 20, "carol", ""),
        ])
    }

    #[test]
    fn test_only_transients_are_scheduled() {
        let mut fades = FadeSchedule::new();
        fades.reset(&snapshot_with_join(), 1000);
        assert_eq!(fades.pending_count(), 2);
    }

    #[test]
    fn test_poll_fires_at_deadline() {
        let mut fades = FadeSchedule::new();
        fades.reset(&snapshot_with_join(), 1000);

        assert!(fades.poll(999).is_empty());
        assert!(!fades.is_hidden("j1"));

        let fired = fades.poll(1000);
        assert_eq!(fired.len(), 2);
        assert!(fades.is_hidden("j1"));
        assert!(fades.is_hidden("l1"));
        assert!(!fades.is_hidden("t1"));

        // already fired; nothing new
        assert!(fades.poll(2000).is_empty());
    }

    #[test]
    fn test_reset_cancels_prior_schedules() {
        let mut fades = FadeSchedule::new();
        fades.reset(&snapshot_with_join(), 1000);
        fades.poll(1500);
        assert!(fades.is_hidden("j1"));

        // the replacement snapshot no longer contains j1
        fades.reset(&Snapshot::new(vec![Message::text("t9", 0, "a", "x")]), 2500);
        assert!(!fades.is_hidden("j1"));
        assert_eq!(fades.pending_count(), 0);
        assert!(fades.poll(9999).is_empty());
    }
}
