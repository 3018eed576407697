use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dim::Dim;
use crate::error::BoundsError;
use crate::index::panic_bounds_check;
use crate::shape::Shape;

/// Index along a single array axis.
///
/// For a fixed dimension an index is only created within the dimension, while for a
/// bounded dimension any value is accepted and checked when used for element access.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize), serde(transparent))]
pub struct Idx(usize);

impl Idx {
    /// Creates an index for the specified axis of a shape.
    ///
    /// Returns `None` if the axis is out of bounds, or if the dimension is fixed and
    /// the value is not less than its size.
    pub fn from_word(shape: &Shape, axis: usize, word: usize) -> Option<Self> {
        shape.axes().get(axis).and_then(|&dim| Self::in_dim(dim, word))
    }

    /// Creates an index for a dimension, see [`Idx::from_word`].
    pub fn in_dim(dim: Dim, word: usize) -> Option<Self> {
        match dim {
            Dim::Fixed(size) if word >= size => None,
            _ => Some(Self(word)),
        }
    }

    /// Creates an index without any check.
    pub const fn new_unchecked(word: usize) -> Self {
        Self(word)
    }

    /// Returns the index value.
    pub const fn to_word(self) -> usize {
        self.0
    }

    /// Checks the index against the runtime size of a dimension.
    pub fn check(self, axis: usize, dim: Dim) -> Result<Self, BoundsError> {
        if self.0 < dim.size() {
            Ok(self)
        } else {
            Err(BoundsError::Axis { axis, index: self.0, size: dim.size() })
        }
    }

    /// Returns the next index.
    ///
    /// Fails past the last element of a fixed dimension. For a bounded dimension only
    /// numeric overflow is reported.
    pub fn succ(self, dim: Dim) -> Result<Self, BoundsError> {
        let next = self.0.checked_add(1).ok_or(BoundsError::Overflow)?;

        match dim {
            Dim::Fixed(size) if next >= size => Err(BoundsError::Overflow),
            _ => Ok(Self(next)),
        }
    }

    /// Returns the previous index, failing below zero.
    pub fn pred(self, dim: Dim) -> Result<Self, BoundsError> {
        let prev = self.0.checked_sub(1).ok_or(BoundsError::Underflow)?;

        match dim {
            // A value constructed without checks may still be past the end.
            Dim::Fixed(size) if prev >= size => Err(BoundsError::Overflow),
            _ => Ok(Self(prev)),
        }
    }

    /// Moves the index by `delta` along a dimension.
    ///
    /// # Panics
    ///
    /// Panics if the result is outside the dimension.
    #[track_caller]
    pub fn step(self, delta: isize, dim: Dim) -> Self {
        match self.0.checked_add_signed(delta) {
            Some(word) if word < dim.size() => Self(word),
            Some(word) => panic_bounds_check(word, dim.size()),
            None => panic!("index underflow: {} + {delta}", self.0),
        }
    }

    /// Moves the index by `delta` without checking the result.
    ///
    /// This is for code that has already validated its bounds. The result is only
    /// checked in debug builds.
    pub fn step_unchecked(self, delta: isize) -> Self {
        debug_assert!(self.0.checked_add_signed(delta).is_some(), "index underflow");

        Self(self.0.wrapping_add_signed(delta))
    }
}

impl Display for Idx {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<Idx> for usize {
    fn from(idx: Idx) -> Self {
        idx.0
    }
}
