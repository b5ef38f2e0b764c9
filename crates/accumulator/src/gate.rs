//! The per-accumulator gate: the mutex that linearizes `try_consume`,
//! `try_refund`, and `commit` against each other.
//!
//! Plain `update` never touches the gate — it stays lock-free.

/// State protected by the gate's mutex.
///
/// Holding these cursors inside the gate (rather than as extra atomics)
/// means the serialized path never needs more synchronization than the one
/// mutex acquire it already pays for.
#[derive(Debug, Default)]
pub(crate) struct GateState {
    /// Round-robin stripe cursor used when the gate picks a stripe to apply
    /// a consume/refund delta to.
    pub stripe_cursor: usize,
    /// Round-robin group cursor used by the grouped-scan estimate.
    pub group_cursor: usize,
}

impl GateState {
    pub(crate) fn next_stripe(&mut self, stripe_count: usize) -> usize {
        let idx = self.stripe_cursor % stripe_count;
        self.stripe_cursor = self.stripe_cursor.wrapping_add(1);
        idx
    }

    pub(crate) fn next_group(&mut self, group_count: usize) -> usize {
        let idx = self.group_cursor % group_count;
        self.group_cursor = self.group_cursor.wrapping_add(1);
        idx
    }
}
