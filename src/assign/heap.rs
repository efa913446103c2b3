//! Heap struct for selecting decision vars in stable mode
use {super::AssignStack, crate::types::*, std::fmt};

/// Binary heap over variable activity scores. `heap` and `idxs` hold a
/// permutation of all variable ids; `idxs[0]` is the number of entries
/// currently inside the heap.
#[derive(Clone, Debug)]
pub struct VarIdHeap {
    /// order : seek -> var id
    heap: Vec<VarId>,
    /// VarId : -> order, with the size of the heap at index 0
    idxs: Vec<usize>,
}

impl Default for VarIdHeap {
    fn default() -> VarIdHeap {
        VarIdHeap {
            heap: vec![0],
            idxs: vec![0],
        }
    }
}

impl fmt::Display for VarIdHeap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            " - seek pointer - nth -> var: {:?}\n - var -> nth: {:?}",
            self.heap, self.idxs,
        )
    }
}

impl VarIdHeap {
    pub(super) fn resize(&mut self, new_vsize: usize) {
        while self.heap.len() < new_vsize {
            let vi = self.heap.len();
            self.heap.push(vi);
            self.idxs.push(vi);
        }
    }
    fn len(&self) -> usize {
        self.idxs[0]
    }
    fn is_empty(&self) -> bool {
        self.idxs[0] == 0
    }
    fn contains(&self, vi: VarId) -> bool {
        self.idxs[vi] <= self.idxs[0]
    }
    /// swap a dormant var into the active region; return its position.
    fn activate(&mut self, vi: VarId) -> usize {
        debug_assert!(!self.contains(vi));
        let i = self.idxs[vi];
        let n = self.idxs[0] + 1;
        let vn = self.heap[n];
        self.heap.swap(i, n);
        self.idxs.swap(vi, vn);
        self.idxs[0] = n;
        n
    }
    /// swap an active var out of the active region; return the position
    /// that received a replacement entry, if any.
    fn deactivate(&mut self, vi: VarId) -> Option<usize> {
        debug_assert!(self.contains(vi));
        let i = self.idxs[vi];
        let n = self.idxs[0];
        let vn = self.heap[n];
        self.heap.swap(i, n);
        self.idxs.swap(vi, vn);
        self.idxs[0] = n - 1;
        (i < n).then_some(i)
    }
}

/// Internal heap manipulation API, implemented on the assignment stack
/// because the ordering is the activity score table.
pub(super) trait VarHeapIF {
    fn insert_heap(&mut self, vi: VarId);
    fn update_heap(&mut self, vi: VarId);
    fn pop_heap_root(&mut self) -> Option<VarId>;
    fn remove_from_heap(&mut self, vi: VarId);
    fn percolate_up(&mut self, start: usize);
    fn percolate_down(&mut self, start: usize);
}

impl VarHeapIF for AssignStack {
    fn insert_heap(&mut self, vi: VarId) {
        if self.var_order.contains(vi) {
            return;
        }
        let i = self.var_order.activate(vi);
        self.percolate_up(i);
    }
    fn update_heap(&mut self, vi: VarId) {
        debug_assert!(vi != 0, "Invalid VarId");
        if self.var_order.contains(vi) {
            // scores only grow between rescales, so upward suffices
            let start = self.var_order.idxs[vi];
            self.percolate_up(start);
        }
    }
    fn pop_heap_root(&mut self) -> Option<VarId> {
        if self.var_order.is_empty() {
            return None;
        }
        let vs = self.var_order.heap[1];
        if let Some(i) = self.var_order.deactivate(vs) {
            self.percolate_down(i);
        }
        Some(vs)
    }
    fn remove_from_heap(&mut self, vi: VarId) {
        if !self.var_order.contains(vi) {
            return;
        }
        if let Some(i) = self.var_order.deactivate(vi) {
            self.percolate_down(i);
            self.percolate_up(self.var_order.idxs[self.var_order.heap[i]]);
        }
    }
    fn percolate_up(&mut self, start: usize) {
        let mut q = start;
        let vq = self.var_order.heap[q];
        debug_assert!(0 < vq, "size of heap is too small");
        let aq = self.activity(vq);
        loop {
            let p = q / 2;
            if p == 0 {
                self.var_order.heap[q] = vq;
                self.var_order.idxs[vq] = q;
                return;
            }
            let vp = self.var_order.heap[p];
            let ap = self.activity(vp);
            if ap < aq {
                // move down the current parent, and make it empty
                self.var_order.heap[q] = vp;
                self.var_order.idxs[vp] = q;
                q = p;
            } else {
                self.var_order.heap[q] = vq;
                self.var_order.idxs[vq] = q;
                return;
            }
        }
    }
    fn percolate_down(&mut self, start: usize) {
        let n = self.var_order.len();
        let mut i = start;
        let vi = self.var_order.heap[i];
        let ai = self.activity(vi);
        loop {
            let l = 2 * i; // left
            if l <= n {
                let vl = self.var_order.heap[l];
                let al = self.activity(vl);
                let r = l + 1; // right
                let (target, vc, ac) = if r <= n && al < self.activity(self.var_order.heap[r]) {
                    let vr = self.var_order.heap[r];
                    (r, vr, self.activity(vr))
                } else {
                    (l, vl, al)
                };
                if ai < ac {
                    self.var_order.heap[i] = vc;
                    self.var_order.idxs[vc] = i;
                    i = target;
                } else {
                    self.var_order.heap[i] = vi;
                    self.var_order.idxs[vi] = i;
                    return;
                }
            } else {
                self.var_order.heap[i] = vi;
                self.var_order.idxs[vi] = i;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Instantiate;

    #[test]
    fn test_heap_orders_by_activity() {
        let mut asg = AssignStack::instantiate(&Config::default(), &CNFDescription {
            num_of_variables: 4,
            ..CNFDescription::default()
        });
        asg.stab[1] = 1.0;
        asg.stab[2] = 4.0;
        asg.stab[3] = 3.0;
        asg.stab[4] = 2.0;
        for vi in 1..=4 {
            asg.update_heap(vi);
        }
        assert_eq!(asg.pop_heap_root(), Some(2));
        assert_eq!(asg.pop_heap_root(), Some(3));
        assert_eq!(asg.pop_heap_root(), Some(4));
        assert_eq!(asg.pop_heap_root(), Some(1));
        assert_eq!(asg.pop_heap_root(), None);
        asg.insert_heap(3);
        asg.insert_heap(2);
        assert_eq!(asg.pop_heap_root(), Some(2));
    }
}
