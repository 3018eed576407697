use std::iter::FusedIterator;

use crate::index::Idxs;
use crate::shape::Shape;

/// Iterator over the index tuples of a shape, in the order of increasing offsets.
///
/// The iterator is double-ended, and iterating from the back gives the reverse sequence.
#[derive(Clone, Debug)]
pub struct Indices<'a> {
    shape: &'a Shape,
    front: Idxs,
    back: Idxs,
    len: usize,
}

impl<'a> Indices<'a> {
    pub(crate) fn new(shape: &'a Shape) -> Self {
        Self { shape, front: Idxs::zeros(shape.rank()), back: Idxs::last(shape), len: shape.len() }
    }
}

impl<'a> DoubleEndedIterator for Indices<'a> {
    fn next_back(&mut self) -> Option<Idxs> {
        if self.len == 0 {
            None
        } else {
            let item = self.back.clone();

            _ = self.back.decrement(self.shape);
            self.len -= 1;

            Some(item)
        }
    }
}

impl<'a> ExactSizeIterator for Indices<'a> {}
impl<'a> FusedIterator for Indices<'a> {}

impl<'a> Iterator for Indices<'a> {
    type Item = Idxs;

    fn next(&mut self) -> Option<Idxs> {
        if self.len == 0 {
            None
        } else {
            let item = self.front.clone();

            _ = self.front.increment(self.shape);
            self.len -= 1;

            Some(item)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl Shape {
    /// Returns an iterator over all index tuples of the shape.
    pub fn indices(&self) -> Indices<'_> {
        Indices::new(self)
    }
}
