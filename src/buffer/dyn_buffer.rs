use crate::buffer::ElementAccess;

/// Array buffer type with heap allocation.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct DynBuffer<T> {
    vec: Vec<T>,
}

impl<T> DynBuffer<T> {
    /// Returns a mutable slice containing all elements.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.vec
    }

    /// Returns a slice containing all elements.
    pub fn as_slice(&self) -> &[T] {
        &self.vec
    }

    /// Converts the buffer into a vector without reallocating.
    pub fn into_vec(self) -> Vec<T> {
        self.vec
    }
}

impl<T> ElementAccess for DynBuffer<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.vec.len()
    }

    fn read(&self, offset: usize) -> &T {
        &self.vec[offset]
    }

    fn write(&mut self, offset: usize, value: T) {
        self.vec[offset] = value;
    }
}

impl<T> FromIterator<T> for DynBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { vec: iter.into_iter().collect() }
    }
}

impl<T> From<Vec<T>> for DynBuffer<T> {
    fn from(vec: Vec<T>) -> Self {
        Self { vec }
    }
}
