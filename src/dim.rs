use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

/// Array dimension, i.e. the extent of a single axis.
///
/// A fixed dimension has its size known before any data exists, so indices can be
/// validated when they are created. A bounded dimension carries a runtime size together
/// with the declared minimum, and indices into it are validated when used.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Dim {
    /// Dimension with a size known up front.
    Fixed(usize),
    /// Dimension with a runtime size and a declared lower bound.
    Bounded {
        /// Declared minimum size.
        min: usize,
        /// Actual size.
        size: usize,
    },
}

impl Dim {
    /// Creates a bounded dimension, checking the size against the minimum.
    pub fn bounded(min: usize, size: usize) -> Result<Self, ShapeError> {
        Self::Bounded { min, size }.validate(0)
    }

    /// Returns the size if known up front, or `None` for a bounded dimension.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Fixed(size) => Some(size),
            Self::Bounded { .. } => None,
        }
    }

    /// Returns `true` if the dimension is fixed.
    pub fn is_fixed(self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    /// Returns the lower bound on the size. For a fixed dimension this is the size itself.
    pub fn min(self) -> usize {
        match self {
            Self::Fixed(size) => size,
            Self::Bounded { min, .. } => min,
        }
    }

    /// Returns the number of elements in the dimension.
    pub fn size(self) -> usize {
        match self {
            Self::Fixed(size) => size,
            Self::Bounded { size, .. } => size,
        }
    }

    /// Converts a bounded dimension into a fixed one with the observed size.
    pub fn try_fix(self, axis: usize) -> Result<Self, ShapeError> {
        self.validate(axis).map(|dim| Self::Fixed(dim.size()))
    }

    pub(crate) fn validate(self, axis: usize) -> Result<Self, ShapeError> {
        let size = self.size();

        if size == 0 {
            return Err(ShapeError::ZeroExtent { axis });
        }

        if let Self::Bounded { min, size } = self {
            if size < min {
                return Err(ShapeError::BelowMinimum { axis, min, size });
            }
        }

        Ok(self)
    }
}

impl Default for Dim {
    fn default() -> Self {
        Self::Fixed(1)
    }
}

impl Display for Dim {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(size) => write!(f, "{size}"),
            Self::Bounded { min, size } => write!(f, "{size}(>={min})"),
        }
    }
}

// Dimensions compare by size only, whether fixed or bounded.

impl Eq for Dim {}

impl Hash for Dim {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size().hash(state)
    }
}

impl Ord for Dim {
    fn cmp(&self, other: &Self) -> Ordering {
        self.size().cmp(&other.size())
    }
}

impl PartialEq for Dim {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size()
    }
}

impl PartialOrd for Dim {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<usize> for Dim {
    fn from(size: usize) -> Self {
        Self::Fixed(size)
    }
}
