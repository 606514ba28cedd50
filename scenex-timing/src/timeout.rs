/// Handle returned by [`TimeoutQueue::set_timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeoutId(u64);

#[derive(Debug)]
struct Pending<A> {
    id: TimeoutId,
    due_ns: u64,
    action: A,
}

/// Host-side timers, polled from the frame loop.
///
/// Entries fire in due order; entries due at the same instant fire in the
/// order they were set.
#[derive(Debug)]
pub struct TimeoutQueue<A> {
    pending: Vec<Pending<A>>,
    next_id: u64,
}

impl<A> Default for TimeoutQueue<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }
}

impl<A> TimeoutQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_timeout(&mut self, due_ns: u64, action: A) -> TimeoutId {
        let id = TimeoutId(self.next_id);
        self.next_id += 1;
        // Stable insert keeps set order among equal deadlines.
        let at = self.pending.partition_point(|p| p.due_ns <= due_ns);
        self.pending.insert(at, Pending { id, due_ns, action });
        id
    }

    /// Returns the action if the timeout was still pending.
    pub fn clear_timeout(&mut self, id: TimeoutId) -> Option<A> {
        let at = self.pending.iter().position(|p| p.id == id)?;
        Some(self.pending.remove(at).action)
    }

    pub fn clear_all(&mut self) -> usize {
        let cleared = self.pending.len();
        self.pending.clear();
        cleared
    }

    pub fn drain_due(&mut self, now_ns: u64) -> Vec<A> {
        let due = self.pending.partition_point(|p| p.due_ns <= now_ns);
        self.pending.drain(..due).map(|p| p.action).collect()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.pending.first().map(|p| p.due_ns)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
