//! A fixed-capacity ring buffer (circular buffer) for O(1) push operations.

use std::iter::FusedIterator;

// ============================================================================
// RingBuffer
// ============================================================================

/// A fixed-capacity circular buffer with O(1) push operations.
///
/// When the buffer reaches capacity, new elements overwrite the oldest ones.
#[derive(Clone)]
pub struct RingBuffer<T> {
    data: Vec<Option<T>>,
    head: usize,
    len: usize,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Creates a new ring buffer with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be greater than 0");

        Self {
            data: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
            capacity,
        }
    }

    /// Adds an element to the back of the buffer. O(1).
    ///
    /// If at capacity, the oldest element is overwritten.
    pub fn push(&mut self, item: T) {
        let insert_index = (self.head + self.len) % self.capacity;
        self.data[insert_index] = Some(item);

        if self.len == self.capacity {
            self.head = (self.head + 1) % self.capacity;
        } else {
            self.len += 1;
        }
    }

    /// Returns a reference to the element at the given logical index.
    ///
    /// Index 0 is the oldest element, index `len - 1` is the newest.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let actual_index = (self.head + index) % self.capacity;
        self.data[actual_index].as_ref()
    }

    /// Newest element, if any.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clears all elements from the buffer.
    pub fn clear(&mut self) {
        for slot in &mut self.data {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Returns an iterator over references to the elements (oldest to newest).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buffer: self,
            front: 0,
            back: self.len,
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingBuffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("elements", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// Iterator Implementation
// ============================================================================

/// An iterator over references to elements in a `RingBuffer`.
pub struct Iter<'a, T> {
    buffer: &'a RingBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.buffer.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back.saturating_sub(self.front);
        (remaining, Some(remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.buffer.get(self.back)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "capacity must be greater than 0")]
    fn test_zero_capacity_panics() {
        let _: RingBuffer<i32> = RingBuffer::new(0);
    }

    #[test]
    fn test_push_overflow() {
        let mut buffer = RingBuffer::new(3);
        for i in 1..=5 {
            buffer.push(i);
        }

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.get(0), Some(&3));
        assert_eq!(buffer.last(), Some(&5));
        assert_eq!(buffer.get(3), None);
    }

    #[test]
    fn test_last_empty() {
        let buffer: RingBuffer<i32> = RingBuffer::new(2);
        assert_eq!(buffer.last(), None);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut buffer = RingBuffer::new(3);
        buffer.push(1);
        buffer.push(2);
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.get(0), None);
    }

    #[test]
    fn test_iter_after_overflow() {
        let mut buffer = RingBuffer::new(3);
        for i in 1..=4 {
            buffer.push(i);
        }

        let items: Vec<_> = buffer.iter().collect();
        assert_eq!(items, vec![&2, &3, &4]);
        let reversed: Vec<_> = buffer.iter().rev().collect();
        assert_eq!(reversed, vec![&4, &3, &2]);
    }
}
