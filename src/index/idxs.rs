use std::fmt::{self, Display, Formatter};
use std::ops::Index;

use smallvec::SmallVec;

use crate::error::BoundsError;
use crate::index::{panic_offset_check, Idx};
use crate::shape::{Shape, INLINE_RANK};

/// Multidimensional index, with one value for each axis of a shape.
///
/// Index tuples are ordered lexicographically with the first axis most significant,
/// which agrees with the ordering of the corresponding offsets:
/// `a.cmp(&b) == a.to_offset(s).cmp(&b.to_offset(s))` for any shape `s`.
///
/// Conversions from plain arrays and slices do not check the values. Use
/// [`Idxs::from_words`] for a checked conversion, or [`Idxs::check`] for the deferred
/// check of bounded dimensions.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Idxs {
    idxs: SmallVec<[usize; INLINE_RANK]>,
}

impl Idxs {
    /// Creates an index tuple for a shape, checking each value.
    ///
    /// Returns `None` if the rank does not match, or if a value is out of bounds for
    /// a fixed dimension.
    pub fn from_words(shape: &Shape, words: &[usize]) -> Option<Self> {
        if words.len() != shape.rank() {
            return None;
        }

        for (&dim, &word) in shape.axes().iter().zip(words) {
            _ = Idx::in_dim(dim, word)?;
        }

        Some(Self::from(words))
    }

    /// Creates the index of the first element of a shape with the given rank.
    pub fn zeros(rank: usize) -> Self {
        Self { idxs: SmallVec::from_elem(0, rank) }
    }

    /// Creates the index of the last element of a shape.
    pub fn last(shape: &Shape) -> Self {
        Self { idxs: shape.dims().map(|size| size - 1).collect() }
    }

    /// Creates the index tuple for a linear offset.
    ///
    /// This is the inverse of [`Idxs::to_offset`], and fails if the offset is not
    /// within `[0, shape.len())`.
    pub fn from_offset(offset: isize, shape: &Shape) -> Result<Self, BoundsError> {
        let len = shape.len();

        if offset < 0 || offset as usize >= len {
            return Err(BoundsError::Offset { offset, len });
        }

        let mut idxs = SmallVec::from_elem(0, shape.rank());
        let mut dividend = offset as usize;

        for i in (0..shape.rank()).rev() {
            idxs[i] = dividend % shape.dim(i);
            dividend /= shape.dim(i);
        }

        Ok(Self { idxs })
    }

    /// Returns the index values.
    pub fn as_slice(&self) -> &[usize] {
        &self.idxs
    }

    /// Returns the index along the specified axis.
    ///
    /// # Panics
    ///
    /// Panics if the axis is out of bounds.
    pub fn get(&self, axis: usize) -> Idx {
        Idx::new_unchecked(self.idxs[axis])
    }

    /// Returns an iterator over the single-axis indices.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Idx> + ExactSizeIterator + '_ {
        self.idxs.iter().map(|&word| Idx::new_unchecked(word))
    }

    /// Returns the number of axes.
    pub fn rank(&self) -> usize {
        self.idxs.len()
    }

    /// Checks the index against the runtime sizes of a shape.
    pub fn check(&self, shape: &Shape) -> Result<(), BoundsError> {
        if self.rank() != shape.rank() {
            return Err(BoundsError::Rank { expected: shape.rank(), found: self.rank() });
        }

        for (axis, (&dim, &word)) in shape.axes().iter().zip(&self.idxs).enumerate() {
            _ = Idx::new_unchecked(word).check(axis, dim)?;
        }

        Ok(())
    }

    /// Returns the linear offset of the index, where the last axis is contiguous:
    ///
    /// `i[k-1] + d[k-1] * i[k-2] + d[k-1] * d[k-2] * i[k-3] + ...`
    ///
    /// The index is assumed to be valid for the shape, which is checked only in debug builds.
    pub fn to_offset(&self, shape: &Shape) -> isize {
        debug_assert!(self.rank() == shape.rank(), "invalid rank");

        let mut offset = 0;

        for (size, &word) in shape.dims().zip(&self.idxs) {
            debug_assert!(word < size, "index out of bounds");

            offset = offset * size + word;
        }

        offset as isize
    }

    /// Returns the linear offset of the index after checking it against the shape.
    pub fn checked_offset(&self, shape: &Shape) -> Result<isize, BoundsError> {
        self.check(shape)?;

        Ok(self.to_offset(shape))
    }

    /// Returns the next index in enumeration order, where the last axis varies fastest.
    ///
    /// Fails with `BoundsError::Overflow` at the last element, and with the error from
    /// `check` if the index is not within the shape.
    pub fn succ(&self, shape: &Shape) -> Result<Self, BoundsError> {
        self.check(shape)?;

        let mut next = self.clone();

        if next.increment(shape) {
            Ok(next)
        } else {
            Err(BoundsError::Overflow)
        }
    }

    /// Returns the previous index in enumeration order.
    ///
    /// Fails with `BoundsError::Underflow` at the first element, and with the error from
    /// `check` if the index is not within the shape.
    pub fn pred(&self, shape: &Shape) -> Result<Self, BoundsError> {
        self.check(shape)?;

        let mut prev = self.clone();

        if prev.decrement(shape) {
            Ok(prev)
        } else {
            Err(BoundsError::Underflow)
        }
    }

    /// Returns the next index, wrapping around to the first element after the last one.
    ///
    /// The index must be within the shape, which is checked only in debug builds.
    pub fn wrapping_succ(&self, shape: &Shape) -> Self {
        debug_assert!(self.check(shape).is_ok(), "index out of bounds");

        let mut next = self.clone();

        _ = next.increment(shape);
        next
    }

    /// Returns the previous index, wrapping around to the last element before the first one.
    ///
    /// The index must be within the shape, which is checked only in debug builds.
    pub fn wrapping_pred(&self, shape: &Shape) -> Self {
        debug_assert!(self.check(shape).is_ok(), "index out of bounds");

        let mut prev = self.clone();

        _ = prev.decrement(shape);
        prev
    }

    /// Moves the index by `delta` elements in enumeration order.
    ///
    /// # Panics
    ///
    /// Panics if the result is outside the shape.
    #[track_caller]
    pub fn step(&self, delta: isize, shape: &Shape) -> Self {
        let offset = self.to_offset(shape) + delta;

        match Self::from_offset(offset, shape) {
            Ok(idxs) => idxs,
            Err(_) => panic_offset_check(offset, shape.len()),
        }
    }

    // Odometer step on the last axis with carry into the earlier ones. Returns
    // `false` if the index wrapped around.
    pub(crate) fn increment(&mut self, shape: &Shape) -> bool {
        debug_assert!(self.rank() == shape.rank(), "invalid rank");

        for i in (0..self.rank()).rev() {
            if self.idxs[i] + 1 < shape.dim(i) {
                self.idxs[i] += 1;

                return true;
            }

            self.idxs[i] = 0;
        }

        false
    }

    pub(crate) fn decrement(&mut self, shape: &Shape) -> bool {
        debug_assert!(self.rank() == shape.rank(), "invalid rank");

        for i in (0..self.rank()).rev() {
            if self.idxs[i] > 0 {
                self.idxs[i] -= 1;

                return true;
            }

            self.idxs[i] = shape.dim(i) - 1;
        }

        false
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [usize] {
        &mut self.idxs
    }
}

impl Display for Idxs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;

        for (i, word) in self.idxs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }

            write!(f, "{word}")?;
        }

        write!(f, ")")
    }
}

impl Index<usize> for Idxs {
    type Output = usize;

    fn index(&self, axis: usize) -> &usize {
        &self.idxs[axis]
    }
}

impl From<&[usize]> for Idxs {
    fn from(words: &[usize]) -> Self {
        Self { idxs: SmallVec::from_slice(words) }
    }
}

impl<const N: usize> From<[usize; N]> for Idxs {
    fn from(words: [usize; N]) -> Self {
        Self::from(&words[..])
    }
}

impl From<Vec<usize>> for Idxs {
    fn from(words: Vec<usize>) -> Self {
        Self { idxs: SmallVec::from_vec(words) }
    }
}

impl FromIterator<Idx> for Idxs {
    fn from_iter<I: IntoIterator<Item = Idx>>(iter: I) -> Self {
        Self { idxs: iter.into_iter().map(Idx::to_word).collect() }
    }
}

impl PartialEq<[usize]> for Idxs {
    fn eq(&self, other: &[usize]) -> bool {
        self.as_slice() == other
    }
}

impl<const N: usize> PartialEq<[usize; N]> for Idxs {
    fn eq(&self, other: &[usize; N]) -> bool {
        self.as_slice() == other
    }
}
