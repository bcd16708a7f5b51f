//! Binary heap with a pluggable ordering.
//!
//! Elements sit in a dense `Vec` with children of `i` at `2i + 1` and
//! `2i + 2`. The ordering decides which element surfaces first: for every
//! non-root position, `compare(parent, node)` is never `Greater`.
//!
//! # Example
//!
//! ```
//! use taskheap::{ByKey, Heap, MaxOrder};
//!
//! let mut min: Heap<u32> = Heap::new();
//! min.push(3);
//! min.push(1);
//! min.push(2);
//! assert_eq!(min.peek(), Some(&1));
//! assert_eq!(min.pop(), Some(1));
//!
//! let max = Heap::from_vec(vec![3, 1, 2], MaxOrder);
//! assert_eq!(max.into_sorted_vec(), vec![3, 2, 1]);
//!
//! let mut by_len = Heap::with_order(ByKey(|s: &&str| s.len()));
//! by_len.push("three");
//! by_len.push("on");
//! assert_eq!(by_len.pop(), Some("on"));
//! ```
//!
//! # Ordering Precondition
//!
//! The ordering must be a consistent total order over the elements it is
//! asked to compare. A non-transitive or otherwise inconsistent ordering does
//! not cause memory unsafety, but the resulting pop order is unspecified.

use std::{cmp::Ordering, fmt::Debug, iter::FusedIterator};

/// Ordering used by [`Heap`]. The element for which `compare` returns
/// `Less` against all others is popped first.
pub trait Compare<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline(always)]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Smallest first. The default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinOrder;

impl<T: Ord + ?Sized> Compare<T> for MinOrder {
    #[inline(always)]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Largest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxOrder;

impl<T: Ord + ?Sized> Compare<T> for MaxOrder {
    #[inline(always)]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        b.cmp(a)
    }
}

/// Smallest extracted key first.
#[derive(Clone, Copy)]
pub struct ByKey<F>(pub F);

impl<T, K, F> Compare<T> for ByKey<F>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    #[inline(always)]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a).cmp(&(self.0)(b))
    }
}

pub struct Heap<T, C = MinOrder> {
    data: Vec<T>,
    order: C,
}

/// A [`Heap`] used as a priority queue. Same type, different name.
pub type PriorityQueue<T, C = MinOrder> = Heap<T, C>;

impl<T: Ord> Default for Heap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> Heap<T> {
    pub fn new() -> Self {
        Self::with_order(MinOrder)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_order(capacity, MinOrder)
    }
}

impl<T, K, F> Heap<T, ByKey<F>>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    pub fn by_key(key: F) -> Self {
        Self::with_order(ByKey(key))
    }
}

impl<T, C: Compare<T>> Heap<T, C> {
    pub fn with_order(order: C) -> Self {
        Self {
            data: Vec::new(),
            order,
        }
    }

    pub fn with_capacity_and_order(capacity: usize, order: C) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            order,
        }
    }

    /// Build a heap from an arbitrary vector in O(n).
    ///
    /// Sifts down every parent, starting from the last one, instead of
    /// pushing elements one at a time.
    pub fn from_vec(data: Vec<T>, order: C) -> Self {
        let mut heap = Self { data, order };
        for pos in (0..heap.data.len() / 2).rev() {
            heap.sift_down(pos);
        }
        heap
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline(always)]
    pub fn order(&self) -> &C {
        &self.order
    }

    /// O(log n).
    pub fn push(&mut self, item: T) {
        self.data.push(item);
        self.sift_up(self.data.len() - 1);
    }

    /// Remove the first element under the ordering. O(log n).
    pub fn pop(&mut self) -> Option<T> {
        let last = self.data.len().checked_sub(1)?;
        self.data.swap(0, last);
        let item = self.data.pop();
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        item
    }

    /// The element the next [`pop`](Heap::pop) would return. O(1).
    #[inline(always)]
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Iterate in storage order, which is not the pop order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Pop every element in order. Remaining elements are dropped if the
    /// iterator is dropped early.
    pub fn drain(&mut self) -> Drain<'_, T, C> {
        Drain { heap: self }
    }

    /// Underlying storage, in heap order.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len());
        while let Some(item) = self.pop() {
            sorted.push(item);
        }
        sorted
    }

    /// Snapshot of every element in pop order, taken by draining a clone.
    /// O(n log n); leaves `self` untouched.
    pub fn to_sorted_vec(&self) -> Vec<T>
    where
        T: Clone,
        C: Clone,
    {
        self.clone().into_sorted_vec()
    }

    #[inline]
    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.violates(parent, pos) {
                self.data.swap(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
    }

    #[inline]
    fn sift_down(&mut self, mut pos: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut first = pos;

            if left < len && self.violates(first, left) {
                first = left;
            }
            if right < len && self.violates(first, right) {
                first = right;
            }

            if first == pos {
                break;
            }

            self.data.swap(pos, first);
            pos = first;
        }
    }

    /// `true` when the element at `above` must not sit over `below`.
    #[inline(always)]
    fn violates(&self, above: usize, below: usize) -> bool {
        self.order
            .compare(&self.data[above], &self.data[below])
            .is_gt()
    }
}

impl<T: Clone, C: Clone> Clone for Heap<T, C> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            order: self.order.clone(),
        }
    }
}

impl<T: Debug, C> Debug for Heap<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Heap")
            .field("len", &self.data.len())
            .field("peek", &self.data.first())
            .finish()
    }
}

impl<T, C: Compare<T>> Extend<T> for Heap<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T: Ord> FromIterator<T> for Heap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect(), MinOrder)
    }
}

impl<T: Ord> From<Vec<T>> for Heap<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data, MinOrder)
    }
}

// ==================== Drain ====================

/// Iterator that pops from the heap in order.
pub struct Drain<'a, T, C: Compare<T>> {
    heap: &'a mut Heap<T, C>,
}

impl<T, C: Compare<T>> Iterator for Drain<'_, T, C> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.heap.pop()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.heap.len();
        (len, Some(len))
    }
}

impl<T, C: Compare<T>> ExactSizeIterator for Drain<'_, T, C> {}

impl<T, C: Compare<T>> FusedIterator for Drain<'_, T, C> {}

impl<T, C: Compare<T>> Drop for Drain<'_, T, C> {
    fn drop(&mut self) {
        self.heap.clear();
    }
}
