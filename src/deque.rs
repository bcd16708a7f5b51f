use std::{
    fmt::Debug,
    iter::FusedIterator,
    ops::{Index, IndexMut},
};

use crate::container::{Container, Sequence};

pub const DEFAULT_BUCKET_SIZE: usize = 64;

/// Position of a single slot inside the bucket map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    bucket: usize,
    slot: usize,
}

/// Double-ended queue backed by a circular map of fixed-size buckets.
///
/// # Layout
///
/// Elements live in `BUCKET_SIZE`-slot buckets. `head` points at the front
/// element and `tail` at the back element; both advance one slot at a time
/// and wrap into the neighbouring bucket, circularly across the map. When
/// the map is completely occupied the next push would move one cursor onto
/// the other, and only then is the map reallocated: the existing buckets are
/// moved (not copied element by element) into a larger map in logical order,
/// with fresh buckets padded on both ends.
///
/// # Memory
///
/// Popping never releases buckets. Capacity only grows until [`clear`] is
/// called, which resets the map to a single bucket.
///
/// [`clear`]: Deque::clear
pub struct Deque<T, const BUCKET_SIZE: usize = DEFAULT_BUCKET_SIZE> {
    map: Vec<Box<[Option<T>]>>,
    head: Cursor,
    tail: Cursor,
    len: usize,
}

/// 16 slots per bucket. Cheaper to start, reallocates more often.
pub type SmallDeque<T> = Deque<T, 16>;

/// 256 slots per bucket. For deques that routinely hold thousands of items.
pub type LargeDeque<T> = Deque<T, 256>;

impl<T, const BUCKET_SIZE: usize> Default for Deque<T, BUCKET_SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const BUCKET_SIZE: usize> Deque<T, BUCKET_SIZE> {
    pub fn new() -> Self {
        Self::with_buckets(1)
    }

    /// Preallocate enough buckets to hold `capacity` items without
    /// reallocating, regardless of which end they are pushed at.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_buckets(capacity.div_ceil(BUCKET_SIZE).max(1))
    }

    fn with_buckets(buckets: usize) -> Self {
        const {
            assert!(BUCKET_SIZE >= 1, "bucket size must be at least 1");
        }

        let mid = Cursor {
            bucket: buckets / 2,
            slot: BUCKET_SIZE / 2,
        };

        Self {
            map: (0..buckets).map(|_| Self::empty_bucket()).collect(),
            head: mid,
            tail: mid,
            len: 0,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of slots currently allocated.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.map.len() * BUCKET_SIZE
    }

    #[inline(always)]
    pub fn bucket_count(&self) -> usize {
        self.map.len()
    }

    /// Append to the back. Returns the new length.
    pub fn push_back(&mut self, item: T) -> usize {
        if self.len > 0 {
            let mut next = self.next(self.tail);
            if next == self.head {
                self.grow();
                next = self.next(self.tail);
            }
            self.tail = next;
        }

        let slot = self.slot_mut(self.tail);
        debug_assert!(slot.is_none(), "push_back into an occupied slot");
        *slot = Some(item);
        self.len += 1;
        self.len
    }

    /// Prepend to the front. Returns the new length.
    pub fn push_front(&mut self, item: T) -> usize {
        if self.len > 0 {
            let mut prev = self.prev(self.head);
            if prev == self.tail {
                self.grow();
                prev = self.prev(self.head);
            }
            self.head = prev;
        }

        let slot = self.slot_mut(self.head);
        debug_assert!(slot.is_none(), "push_front into an occupied slot");
        *slot = Some(item);
        self.len += 1;
        self.len
    }

    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let item = self.slot_mut(self.tail).take();
        debug_assert!(item.is_some(), "tail cursor on a vacant slot");
        self.len -= 1;
        if self.len > 0 {
            self.tail = self.prev(self.tail);
        }
        item
    }

    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let item = self.slot_mut(self.head).take();
        debug_assert!(item.is_some(), "head cursor on a vacant slot");
        self.len -= 1;
        if self.len > 0 {
            self.head = self.next(self.head);
        }
        item
    }

    #[inline]
    pub fn front(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.slot(self.head).as_ref()
    }

    #[inline]
    pub fn back(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.slot(self.tail).as_ref()
    }

    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        if self.len == 0 {
            return None;
        }
        self.slot_mut(self.head).as_mut()
    }

    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        if self.len == 0 {
            return None;
        }
        self.slot_mut(self.tail).as_mut()
    }

    /// Element at logical position `index`, counting from the front.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.slot(self.cursor_at(index)).as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let cursor = self.cursor_at(index);
        self.slot_mut(cursor).as_mut()
    }

    /// Drop every element and shrink back to a single bucket, with both
    /// cursors parked in its middle so either end can grow first.
    pub fn clear(&mut self) {
        let mid = Cursor {
            bucket: 0,
            slot: BUCKET_SIZE / 2,
        };
        self.map = vec![Self::empty_bucket()];
        self.head = mid;
        self.tail = mid;
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, T, BUCKET_SIZE> {
        Iter {
            deque: self,
            front: 0,
            back: self.len,
        }
    }

    /// Snapshot of the contents in front-to-back order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Reallocate into a larger map once every slot is occupied.
    ///
    /// Buckets are moved in logical order starting from the head bucket.
    /// When the head does not start at slot 0, the tail has wrapped around
    /// into the head's bucket; the slots in front of the head belong to the
    /// back of the deque and are split out into their own bucket at the
    /// end, keeping their slot offsets.
    fn grow(&mut self) {
        debug_assert_eq!(self.len, self.capacity(), "grow on a map with room");

        let old_count = self.map.len();
        let extra = (old_count >> 1).max(1);
        let head = self.head;

        let mut old = std::mem::take(&mut self.map);
        old.rotate_left(head.bucket);

        let mut map = Vec::with_capacity(old_count + 2 * extra + 1);
        map.extend((0..extra).map(|_| Self::empty_bucket()));
        map.extend(old);

        let tail = if head.slot > 0 {
            let mut split = Self::empty_bucket();
            for (dst, src) in split.iter_mut().zip(map[extra].iter_mut()).take(head.slot) {
                *dst = src.take();
            }
            map.push(split);
            Cursor {
                bucket: map.len() - 1,
                slot: head.slot - 1,
            }
        } else {
            Cursor {
                bucket: map.len() - 1,
                slot: BUCKET_SIZE - 1,
            }
        };

        map.extend((0..extra).map(|_| Self::empty_bucket()));

        tracing::trace!(
            from = old_count,
            to = map.len(),
            len = self.len,
            "deque bucket map grown"
        );

        self.map = map;
        self.head = Cursor {
            bucket: extra,
            slot: head.slot,
        };
        self.tail = tail;
    }

    #[inline(always)]
    fn next(&self, cursor: Cursor) -> Cursor {
        if cursor.slot + 1 < BUCKET_SIZE {
            Cursor {
                bucket: cursor.bucket,
                slot: cursor.slot + 1,
            }
        } else {
            Cursor {
                bucket: (cursor.bucket + 1) % self.map.len(),
                slot: 0,
            }
        }
    }

    #[inline(always)]
    fn prev(&self, cursor: Cursor) -> Cursor {
        if cursor.slot > 0 {
            Cursor {
                bucket: cursor.bucket,
                slot: cursor.slot - 1,
            }
        } else {
            let buckets = self.map.len();
            Cursor {
                bucket: (cursor.bucket + buckets - 1) % buckets,
                slot: BUCKET_SIZE - 1,
            }
        }
    }

    #[inline(always)]
    fn cursor_at(&self, index: usize) -> Cursor {
        let start = self.head.bucket * BUCKET_SIZE + self.head.slot;
        let pos = (start + index) % self.capacity();
        Cursor {
            bucket: pos / BUCKET_SIZE,
            slot: pos % BUCKET_SIZE,
        }
    }

    #[inline(always)]
    fn slot(&self, cursor: Cursor) -> &Option<T> {
        &self.map[cursor.bucket][cursor.slot]
    }

    #[inline(always)]
    fn slot_mut(&mut self, cursor: Cursor) -> &mut Option<T> {
        &mut self.map[cursor.bucket][cursor.slot]
    }

    fn empty_bucket() -> Box<[Option<T>]> {
        (0..BUCKET_SIZE).map(|_| None).collect()
    }
}

impl<T: Clone, const BUCKET_SIZE: usize> Clone for Deque<T, BUCKET_SIZE> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            head: self.head,
            tail: self.tail,
            len: self.len,
        }
    }
}

impl<T: Debug, const BUCKET_SIZE: usize> Debug for Deque<T, BUCKET_SIZE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, const BUCKET_SIZE: usize> PartialEq for Deque<T, BUCKET_SIZE> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, const BUCKET_SIZE: usize> Eq for Deque<T, BUCKET_SIZE> {}

impl<T, const BUCKET_SIZE: usize> Index<usize> for Deque<T, BUCKET_SIZE> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        let len = self.len;
        self.get(index)
            .unwrap_or_else(|| panic!("index {index} out of bounds for deque of length {len}"))
    }
}

impl<T, const BUCKET_SIZE: usize> IndexMut<usize> for Deque<T, BUCKET_SIZE> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        self.get_mut(index)
            .unwrap_or_else(|| panic!("index {index} out of bounds for deque of length {len}"))
    }
}

impl<T, const BUCKET_SIZE: usize> Extend<T> for Deque<T, BUCKET_SIZE> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T, const BUCKET_SIZE: usize> FromIterator<T> for Deque<T, BUCKET_SIZE> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut deque = Self::with_capacity(iter.size_hint().0);
        deque.extend(iter);
        deque
    }
}

impl<T, const BUCKET_SIZE: usize> Container for Deque<T, BUCKET_SIZE> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    fn clear(&mut self) {
        Deque::clear(self)
    }
}

impl<T, const BUCKET_SIZE: usize> Sequence<T> for Deque<T, BUCKET_SIZE> {
    #[inline(always)]
    fn push_back(&mut self, item: T) -> usize {
        Deque::push_back(self, item)
    }

    #[inline(always)]
    fn push_front(&mut self, item: T) -> usize {
        Deque::push_front(self, item)
    }

    #[inline(always)]
    fn pop_back(&mut self) -> Option<T> {
        Deque::pop_back(self)
    }

    #[inline(always)]
    fn pop_front(&mut self) -> Option<T> {
        Deque::pop_front(self)
    }

    #[inline(always)]
    fn front(&self) -> Option<&T> {
        Deque::front(self)
    }

    #[inline(always)]
    fn back(&self) -> Option<&T> {
        Deque::back(self)
    }
}

// ==================== Iterators ====================

/// Borrowing iterator in front-to-back order.
pub struct Iter<'a, T, const BUCKET_SIZE: usize> {
    deque: &'a Deque<T, BUCKET_SIZE>,
    front: usize,
    back: usize,
}

impl<'a, T, const BUCKET_SIZE: usize> Iterator for Iter<'a, T, BUCKET_SIZE> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.front >= self.back {
            return None;
        }
        let item = self.deque.get(self.front);
        self.front += 1;
        item
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T, const BUCKET_SIZE: usize> DoubleEndedIterator for Iter<'_, T, BUCKET_SIZE> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.deque.get(self.back)
    }
}

impl<T, const BUCKET_SIZE: usize> ExactSizeIterator for Iter<'_, T, BUCKET_SIZE> {}

impl<T, const BUCKET_SIZE: usize> FusedIterator for Iter<'_, T, BUCKET_SIZE> {}

/// Owning iterator, pops from the front.
pub struct IntoIter<T, const BUCKET_SIZE: usize> {
    deque: Deque<T, BUCKET_SIZE>,
}

impl<T, const BUCKET_SIZE: usize> Iterator for IntoIter<T, BUCKET_SIZE> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.deque.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.deque.len, Some(self.deque.len))
    }
}

impl<T, const BUCKET_SIZE: usize> DoubleEndedIterator for IntoIter<T, BUCKET_SIZE> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.deque.pop_back()
    }
}

impl<T, const BUCKET_SIZE: usize> ExactSizeIterator for IntoIter<T, BUCKET_SIZE> {}

impl<T, const BUCKET_SIZE: usize> FusedIterator for IntoIter<T, BUCKET_SIZE> {}

impl<T, const BUCKET_SIZE: usize> IntoIterator for Deque<T, BUCKET_SIZE> {
    type Item = T;
    type IntoIter = IntoIter<T, BUCKET_SIZE>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { deque: self }
    }
}

impl<'a, T, const BUCKET_SIZE: usize> IntoIterator for &'a Deque<T, BUCKET_SIZE> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, BUCKET_SIZE>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
