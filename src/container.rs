use std::collections::{LinkedList, VecDeque};

/// Anything that tracks a number of elements and can be emptied.
pub trait Container {
    fn len(&self) -> usize;

    fn clear(&mut self);

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sequential container with push/pop access at both ends.
///
/// Every operation that would read past an end returns `None` instead of
/// panicking. The `push_*` methods return the new length.
///
/// Backends differ only in cost: [`Deque`](crate::Deque) and [`VecDeque`]
/// are amortized O(1) at both ends, `Vec` pays O(n) for `push_front` and
/// `pop_front`, and `LinkedList` allocates per element.
pub trait Sequence<T>: Container {
    fn push_back(&mut self, item: T) -> usize;

    fn push_front(&mut self, item: T) -> usize;

    fn pop_back(&mut self) -> Option<T>;

    fn pop_front(&mut self) -> Option<T>;

    fn front(&self) -> Option<&T>;

    fn back(&self) -> Option<&T>;
}

// ==================== Vec ====================

impl<T> Container for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        Vec::clear(self)
    }
}

impl<T> Sequence<T> for Vec<T> {
    #[inline]
    fn push_back(&mut self, item: T) -> usize {
        self.push(item);
        Vec::len(self)
    }

    #[inline]
    fn push_front(&mut self, item: T) -> usize {
        self.insert(0, item);
        Vec::len(self)
    }

    #[inline]
    fn pop_back(&mut self) -> Option<T> {
        self.pop()
    }

    #[inline]
    fn pop_front(&mut self) -> Option<T> {
        if Vec::is_empty(self) {
            return None;
        }
        Some(self.remove(0))
    }

    #[inline]
    fn front(&self) -> Option<&T> {
        self.first()
    }

    #[inline]
    fn back(&self) -> Option<&T> {
        self.last()
    }
}

// ==================== VecDeque ====================

impl<T> Container for VecDeque<T> {
    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        VecDeque::clear(self)
    }
}

impl<T> Sequence<T> for VecDeque<T> {
    #[inline]
    fn push_back(&mut self, item: T) -> usize {
        VecDeque::push_back(self, item);
        VecDeque::len(self)
    }

    #[inline]
    fn push_front(&mut self, item: T) -> usize {
        VecDeque::push_front(self, item);
        VecDeque::len(self)
    }

    #[inline]
    fn pop_back(&mut self) -> Option<T> {
        VecDeque::pop_back(self)
    }

    #[inline]
    fn pop_front(&mut self) -> Option<T> {
        VecDeque::pop_front(self)
    }

    #[inline]
    fn front(&self) -> Option<&T> {
        VecDeque::front(self)
    }

    #[inline]
    fn back(&self) -> Option<&T> {
        VecDeque::back(self)
    }
}

// ==================== LinkedList ====================

impl<T> Container for LinkedList<T> {
    #[inline]
    fn len(&self) -> usize {
        LinkedList::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        LinkedList::clear(self)
    }
}

impl<T> Sequence<T> for LinkedList<T> {
    #[inline]
    fn push_back(&mut self, item: T) -> usize {
        LinkedList::push_back(self, item);
        LinkedList::len(self)
    }

    #[inline]
    fn push_front(&mut self, item: T) -> usize {
        LinkedList::push_front(self, item);
        LinkedList::len(self)
    }

    #[inline]
    fn pop_back(&mut self) -> Option<T> {
        LinkedList::pop_back(self)
    }

    #[inline]
    fn pop_front(&mut self) -> Option<T> {
        LinkedList::pop_front(self)
    }

    #[inline]
    fn front(&self) -> Option<&T> {
        LinkedList::front(self)
    }

    #[inline]
    fn back(&self) -> Option<&T> {
        LinkedList::back(self)
    }
}
