//! Binary min-heap with a caller-supplied comparator.
//!
//! The search drivers use it as their frontier. Elements the comparator considers
//! equal are ordered according to a [`TieBreak`] policy so that searches can be
//! made reproducible.
use crate::error::{SolverError, SolverResult};
use std::cmp::Ordering;

/// How the queue orders elements that compare as equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TieBreak {
    /// Whatever order the heap structure happens to produce.
    HeapOrder,
    /// Earlier insertions leave first.
    #[default]
    Fifo,
    /// Later insertions leave first.
    Lifo,
}

struct Entry<T> {
    seq: u64,
    value: T,
}

/// A priority queue returning the smallest element according to `comparator`.
///
/// # Examples
/// ```
/// use slide_solver::queue::PriorityQueue;
///
/// let mut queue = PriorityQueue::new(|a: &u32, b: &u32| a.cmp(b));
/// queue.enqueue(5);
/// queue.enqueue(1);
/// queue.enqueue(3);
/// assert_eq!(queue.peek(), Ok(&1));
/// assert_eq!(queue.dequeue(), Ok(1));
/// assert_eq!(queue.len(), 2);
/// ```
pub struct PriorityQueue<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    heap: Vec<Entry<T>>,
    comparator: C,
    tie_break: TieBreak,
    next_seq: u64,
}

impl<T, C> PriorityQueue<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Creates an empty queue with `TieBreak::Fifo`.
    pub fn new(comparator: C) -> Self {
        Self::with_tie_break(comparator, TieBreak::default())
    }

    pub fn with_tie_break(comparator: C, tie_break: TieBreak) -> Self {
        PriorityQueue {
            heap: Vec::new(),
            comparator,
            tie_break,
            next_seq: 0,
        }
    }

    /// Inserts `value` in O(log n).
    pub fn enqueue(&mut self, value: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { seq, value });
        self.sift_up(self.heap.len() - 1);
    }

    /// Removes and returns the smallest element in O(log n).
    ///
    /// Fails with `SolverError::EmptyQueue` when there is nothing to remove.
    pub fn dequeue(&mut self) -> SolverResult<T> {
        if self.heap.is_empty() {
            return Err(SolverError::EmptyQueue);
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let entry = self.heap.pop().ok_or(SolverError::EmptyQueue)?;
        self.sift_down(0);
        Ok(entry.value)
    }

    /// Returns the smallest element without removing it.
    pub fn peek(&self) -> SolverResult<&T> {
        self.heap
            .first()
            .map(|entry| &entry.value)
            .ok_or(SolverError::EmptyQueue)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    fn less(&self, i: usize, j: usize) -> bool {
        let (a, b) = (&self.heap[i], &self.heap[j]);
        let ordering = (self.comparator)(&a.value, &b.value);
        let ordering = match self.tie_break {
            TieBreak::HeapOrder => ordering,
            TieBreak::Fifo => ordering.then(a.seq.cmp(&b.seq)),
            TieBreak::Lifo => ordering.then(b.seq.cmp(&a.seq)),
        };
        ordering == Ordering::Less
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent) {
                break;
            }
            self.heap.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = index * 2 + 1;
            let right = left + 1;
            let mut smallest = index;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.heap.swap(index, smallest);
            index = smallest;
        }
    }
}
