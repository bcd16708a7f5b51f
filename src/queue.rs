use std::{fmt::Debug, marker::PhantomData};

use crate::{
    container::{Container, Sequence},
    deque::Deque,
};

/// First-in first-out view over a [`Sequence`].
///
/// Holds nothing but the backing container. [`Deque`] is the default; any
/// other `Sequence` works with its own cost profile.
pub struct Queue<T, S = Deque<T>> {
    backing: S,
    _item: PhantomData<fn() -> T>,
}

impl<T, S: Sequence<T> + Default> Default for Queue<T, S> {
    fn default() -> Self {
        Self::with_backing(S::default())
    }
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self::with_backing(Deque::new())
    }
}

impl<T, S: Sequence<T>> Queue<T, S> {
    pub fn with_backing(backing: S) -> Self {
        Self {
            backing,
            _item: PhantomData,
        }
    }

    /// Add to the back. Returns the new length.
    #[inline]
    pub fn enqueue(&mut self, item: T) -> usize {
        self.backing.push_back(item)
    }

    /// Remove from the front.
    #[inline]
    pub fn dequeue(&mut self) -> Option<T> {
        self.backing.pop_front()
    }

    /// The item the next [`dequeue`](Queue::dequeue) would return.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.backing.front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.backing.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.backing.is_empty()
    }

    pub fn clear(&mut self) {
        self.backing.clear();
    }

    pub fn backing(&self) -> &S {
        &self.backing
    }

    pub fn into_inner(self) -> S {
        self.backing
    }
}

impl<T, S: Sequence<T>> Container for Queue<T, S> {
    #[inline]
    fn len(&self) -> usize {
        self.backing.len()
    }

    #[inline]
    fn clear(&mut self) {
        self.backing.clear();
    }
}

impl<T, S: Sequence<T>> Extend<T> for Queue<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.enqueue(item);
        }
    }
}

impl<T, S: Sequence<T> + Default> FromIterator<T> for Queue<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::default();
        queue.extend(iter);
        queue
    }
}

impl<T, S: Clone> Clone for Queue<T, S> {
    fn clone(&self) -> Self {
        Self {
            backing: self.backing.clone(),
            _item: PhantomData,
        }
    }
}

impl<T, S: Debug> Debug for Queue<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Queue").field(&self.backing).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{LinkedList, VecDeque};

    fn fifo<S: Sequence<u32> + Default>() {
        let mut queue: Queue<u32, S> = Queue::default();
        assert!(queue.is_empty());
        assert_eq!(queue.dequeue(), None);
        assert_eq!(queue.peek(), None);

        assert_eq!(queue.enqueue(1), 1);
        assert_eq!(queue.enqueue(2), 2);
        assert_eq!(queue.enqueue(3), 3);

        assert_eq!(queue.peek(), Some(&1));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.dequeue(), Some(1));
        assert_eq!(queue.dequeue(), Some(2));

        queue.enqueue(4);
        assert_eq!(queue.dequeue(), Some(3));
        assert_eq!(queue.dequeue(), Some(4));
        assert_eq!(queue.dequeue(), None);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_fifo_on_deque() {
        fifo::<Deque<u32>>();
    }

    #[test]
    fn test_fifo_on_vec() {
        fifo::<Vec<u32>>();
    }

    #[test]
    fn test_fifo_on_vec_deque() {
        fifo::<VecDeque<u32>>();
    }

    #[test]
    fn test_fifo_on_linked_list() {
        fifo::<LinkedList<u32>>();
    }

    #[test]
    fn test_many_items_through_small_buckets() {
        let mut queue: Queue<u32, Deque<u32, 2>> = Queue::default();
        for i in 0..500 {
            queue.enqueue(i);
            if i % 3 == 0 {
                queue.dequeue();
            }
        }

        let remaining: Vec<u32> = std::iter::from_fn(|| queue.dequeue()).collect();
        assert_eq!(remaining.len(), 500 - 167);
        assert!(remaining.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_from_iter_and_clear() {
        let mut queue: Queue<u32> = (0..5).collect();
        assert_eq!(queue.peek(), Some(&0));
        assert_eq!(queue.backing().len(), 5);

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.into_inner().bucket_count(), 1);
    }
}
