//! Move-to-front decision queue used in non-stable mode
use {crate::types::VarId, std::fmt};

#[derive(Clone, Copy, Debug, Default)]
struct Link {
    prev: VarId,
    next: VarId,
}

/// Doubly-linked decision queue over variable ids; 0 marks the end of a
/// link chain. Bumped variables move to the back, which is searched first.
#[derive(Clone, Debug, Default)]
pub struct VarQueue {
    links: Vec<Link>,
    first: VarId,
    last: VarId,
    /// cached search entry; 0 forces a rescan from the back
    search: VarId,
}

impl fmt::Display for VarQueue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "VarQueue[first:{}, last:{}]", self.first, self.last)
    }
}

impl VarQueue {
    pub(super) fn resize(&mut self, new_vsize: usize) {
        if self.links.is_empty() {
            self.links.push(Link::default());
        }
        self.links.resize(new_vsize, Link::default());
    }
    fn in_queue(&self, vi: VarId) -> bool {
        self.first == vi || self.links[vi].prev != 0 || self.links[vi].next != 0
    }
    /// append a var at the back of the queue.
    pub(super) fn enqueue(&mut self, vi: VarId) {
        debug_assert!(vi != 0);
        if self.in_queue(vi) {
            return;
        }
        if self.last == 0 {
            self.first = vi;
        } else {
            self.links[self.last].next = vi;
            self.links[vi].prev = self.last;
        }
        self.last = vi;
        self.search = 0;
    }
    /// unlink a var from the queue.
    pub(super) fn dequeue(&mut self, vi: VarId) {
        if !self.in_queue(vi) {
            return;
        }
        let Link { prev, next } = self.links[vi];
        if prev == 0 {
            self.first = next;
        } else {
            self.links[prev].next = next;
        }
        if next == 0 {
            self.last = prev;
        } else {
            self.links[next].prev = prev;
        }
        self.links[vi] = Link::default();
        self.search = 0;
    }
    /// move a var to the back, making it the next candidate.
    pub(super) fn bump(&mut self, vi: VarId) {
        if !self.in_queue(vi) || self.last == vi {
            return;
        }
        self.dequeue(vi);
        self.enqueue(vi);
    }
    /// invalidate the search cache after an unassignment.
    pub(super) fn touch(&mut self, _vi: VarId) {
        self.search = 0;
    }
    /// walk from the back towards the front for a candidate var.
    pub(super) fn next_unassigned(&mut self, eligible: impl Fn(VarId) -> bool) -> Option<VarId> {
        let mut vi = if self.search == 0 { self.last } else { self.search };
        while vi != 0 {
            if eligible(vi) {
                self.search = vi;
                return Some(vi);
            }
            vi = self.links[vi].prev;
        }
        self.search = 0;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_move_to_front() {
        let mut q = VarQueue::default();
        q.resize(8);
        for vi in 1..=4 {
            q.enqueue(vi);
        }
        // most recently enqueued first
        assert_eq!(q.next_unassigned(|_| true), Some(4));
        q.bump(2);
        q.touch(2);
        assert_eq!(q.next_unassigned(|_| true), Some(2));
        q.dequeue(2);
        assert_eq!(q.next_unassigned(|_| true), Some(4));
        // exclusion walks towards older vars
        assert_eq!(q.next_unassigned(|vi| vi < 2), Some(1));
    }
}
