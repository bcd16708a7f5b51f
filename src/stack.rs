use std::{fmt::Debug, marker::PhantomData};

use crate::{
    container::{Container, Sequence},
    deque::Deque,
};

/// Last-in first-out view over a [`Sequence`].
///
/// Holds nothing but the backing container; pushes and pops both happen at
/// the back. [`Deque`] is the default, `Vec` is an equally good choice here
/// since the front is never touched.
pub struct Stack<T, S = Deque<T>> {
    backing: S,
    _item: PhantomData<fn() -> T>,
}

impl<T, S: Sequence<T> + Default> Default for Stack<T, S> {
    fn default() -> Self {
        Self::with_backing(S::default())
    }
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self::with_backing(Deque::new())
    }
}

impl<T, S: Sequence<T>> Stack<T, S> {
    pub fn with_backing(backing: S) -> Self {
        Self {
            backing,
            _item: PhantomData,
        }
    }

    /// Returns the new length.
    #[inline]
    pub fn push(&mut self, item: T) -> usize {
        self.backing.push_back(item)
    }

    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.backing.pop_back()
    }

    /// The item the next [`pop`](Stack::pop) would return.
    #[inline]
    pub fn top(&self) -> Option<&T> {
        self.backing.back()
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

impl<T, S: Sequence<T>> Container for Stack<T, S> {
    #[inline]
    fn len(&self) -> usize {
        self.backing.len()
    }

    #[inline]
    fn clear(&mut self) {
        self.backing.clear();
    }
}

impl<T, S: Sequence<T>> Extend<T> for Stack<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T, S: Sequence<T> + Default> FromIterator<T> for Stack<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut stack = Self::default();
        stack.extend(iter);
        stack
    }
}

impl<T, S: Clone> Clone for Stack<T, S> {
    fn clone(&self) -> Self {
        Self {
            backing: self.backing.clone(),
            _item: PhantomData,
        }
    }
}

impl<T, S: Debug> Debug for Stack<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Stack").field(&self.backing).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{LinkedList, VecDeque};

    fn lifo<S: Sequence<u32> + Default>() {
        let mut stack: Stack<u32, S> = Stack::default();
        assert!(stack.is_empty());
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.top(), None);

        assert_eq!(stack.push(1), 1);
        assert_eq!(stack.push(2), 2);
        assert_eq!(stack.push(3), 3);

        assert_eq!(stack.top(), Some(&3));
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.pop(), Some(3));

        stack.push(4);
        assert_eq!(stack.pop(), Some(4));
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.len(), 0);
    }

    #[test]
    fn test_lifo_on_deque() {
        lifo::<Deque<u32>>();
    }

    #[test]
    fn test_lifo_on_vec() {
        lifo::<Vec<u32>>();
    }

    #[test]
    fn test_lifo_on_vec_deque() {
        lifo::<VecDeque<u32>>();
    }

    #[test]
    fn test_lifo_on_linked_list() {
        lifo::<LinkedList<u32>>();
    }

    #[test]
    fn test_deep_stack_grows_and_unwinds() {
        let mut stack: Stack<usize, Deque<usize, 4>> = Stack::default();
        for i in 0..1000 {
            stack.push(i);
        }
        let capacity = stack.backing().capacity();

        for i in (0..1000).rev() {
            assert_eq!(stack.pop(), Some(i));
        }
        assert!(stack.is_empty());
        assert_eq!(stack.backing().capacity(), capacity);
    }

    #[test]
    fn test_with_backing_keeps_contents() {
        let stack = Stack::<u32, Vec<u32>>::with_backing(vec![1, 2, 3]);
        assert_eq!(stack.top(), Some(&3));
        assert_eq!(stack.into_inner(), vec![1, 2, 3]);
    }
}
