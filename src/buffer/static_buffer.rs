use smallvec::SmallVec;

use crate::buffer::ElementAccess;

/// Inline capacity of the static buffer, in elements.
pub const STATIC_CAPACITY: usize = 16;

/// Array buffer type with inline allocation, for small arrays of fixed shape.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct StaticBuffer<T> {
    inner: SmallVec<[T; STATIC_CAPACITY]>,
}

impl<T> StaticBuffer<T> {
    /// Returns a mutable slice containing all elements.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.inner
    }

    /// Returns a slice containing all elements.
    pub fn as_slice(&self) -> &[T] {
        &self.inner
    }

    /// Converts the buffer into a vector.
    pub fn into_vec(self) -> Vec<T> {
        self.inner.into_vec()
    }
}

impl<T> ElementAccess for StaticBuffer<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn read(&self, offset: usize) -> &T {
        &self.inner[offset]
    }

    fn write(&mut self, offset: usize, value: T) {
        self.inner[offset] = value;
    }
}

impl<T> FromIterator<T> for StaticBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { inner: iter.into_iter().collect() }
    }
}

impl<T> From<Vec<T>> for StaticBuffer<T> {
    fn from(vec: Vec<T>) -> Self {
        Self { inner: SmallVec::from_vec(vec) }
    }
}
