//! Error types for shape construction, indexing and matrix kernels.

use thiserror::Error;

/// Result type alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;

/// Error for an index value or index arithmetic leaving the valid range.
#[derive(Clone, Copy, Debug, Error, Eq, Hash, PartialEq)]
pub enum BoundsError {
    /// Index is outside the extent of an axis.
    #[error("index out of bounds: the len is {size} but the index is {index} (axis {axis})")]
    Axis {
        /// Axis of the failing index.
        axis: usize,
        /// Offending index value.
        index: usize,
        /// Extent of the axis.
        size: usize,
    },

    /// Increment past the last index of a shape.
    #[error("index overflow past the last element")]
    Overflow,

    /// Decrement below the first index of a shape.
    #[error("index underflow below the first element")]
    Underflow,

    /// Linear offset outside `[0, len)`.
    #[error("offset {offset} out of range for length {len}")]
    Offset {
        /// Offending offset.
        offset: isize,
        /// Number of elements.
        len: usize,
    },

    /// Index tuple with the wrong number of axes.
    #[error("index rank {found} does not match shape rank {expected}")]
    Rank {
        /// Rank of the shape.
        expected: usize,
        /// Rank of the index.
        found: usize,
    },
}

/// Error for a runtime shape that does not satisfy its declaration.
#[derive(Clone, Debug, Error, Eq, Hash, PartialEq)]
pub enum ShapeError {
    /// An axis has extent zero.
    #[error("axis {axis} has zero extent")]
    ZeroExtent {
        /// Offending axis.
        axis: usize,
    },

    /// A bounded axis is smaller than its declared minimum.
    #[error("axis {axis} has size {size}, expected at least {min}")]
    BelowMinimum {
        /// Offending axis.
        axis: usize,
        /// Declared minimum extent.
        min: usize,
        /// Observed extent.
        size: usize,
    },

    /// Number of axes differs from the declaration.
    #[error("rank mismatch: expected {expected}, found {found}")]
    RankMismatch {
        /// Declared rank.
        expected: usize,
        /// Observed rank.
        found: usize,
    },

    /// Shapes of two operands differ.
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    Mismatch {
        /// Expected sizes.
        expected: Vec<usize>,
        /// Observed sizes.
        found: Vec<usize>,
    },

    /// Product of the extents does not fit in `usize`.
    #[error("shape length overflows usize")]
    Overflow,

    /// Number of elements differs from the shape length.
    #[error("length mismatch: shape holds {expected} elements, found {found}")]
    LenMismatch {
        /// Shape length.
        expected: usize,
        /// Number of elements supplied.
        found: usize,
    },
}

/// Errors that can occur in frame and matrix operations.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Error {
    /// Invalid index.
    #[error(transparent)]
    Bounds(#[from] BoundsError),

    /// Invalid shape.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Matrix operation on a frame that is not a square matrix.
    #[error("expected a square matrix, found shape {shape}")]
    NotSquare {
        /// Shape of the operand, formatted.
        shape: String,
    },

    /// Matrix is singular to working precision.
    #[error("matrix is singular")]
    Singular,

    /// Operation is not implemented for the operand size.
    #[error("operation '{op}' not supported for shape {shape}")]
    Unsupported {
        /// Operation name.
        op: &'static str,
        /// Shape of the operand, formatted.
        shape: String,
    },
}
