use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::iter::{Copied, Map};
use std::slice;

use smallvec::SmallVec;

use crate::dim::Dim;
use crate::error::ShapeError;

/// Inline capacity for shapes, index tuples and strides.
///
/// Up to this rank no heap allocation is necessary.
pub const INLINE_RANK: usize = 6;

/// Iterator over the sizes of each dimension.
pub type Dims<'a> = Map<Copied<slice::Iter<'a, Dim>>, fn(Dim) -> usize>;

/// Array shape, i.e. an ordered sequence of dimensions.
///
/// The rank is the number of dimensions. A shape of rank 0 describes a scalar with a
/// single element. All dimensions have size at least 1, which is checked when the shape
/// is created, and the shape is immutable afterwards.
///
/// Shapes are equal if they have the same rank and sizes, regardless of whether each
/// dimension is fixed or bounded. Shapes are ordered lexicographically starting from the
/// last dimension, and a shape sorts before a longer one if all dimensions compared so
/// far are equal. Note that this is the opposite direction from the ordering of index
/// tuples.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Shape {
    dims: SmallVec<[Dim; INLINE_RANK]>,
}

impl Shape {
    /// Creates a shape of rank 0.
    pub fn scalar() -> Self {
        Self { dims: SmallVec::new() }
    }

    /// Creates a shape with fixed dimensions of the given sizes.
    pub fn from_dims(dims: &[usize]) -> Result<Self, ShapeError> {
        Self::from_axes(dims.iter().map(|&size| Dim::Fixed(size)))
    }

    /// Creates a shape with bounded dimensions from `(min, size)` pairs.
    pub fn bounded(dims: &[(usize, usize)]) -> Result<Self, ShapeError> {
        Self::from_axes(dims.iter().map(|&(min, size)| Dim::Bounded { min, size }))
    }

    /// Creates a shape from runtime sizes checked against declared minimums.
    pub fn with_bounds(mins: &[usize], sizes: &[usize]) -> Result<Self, ShapeError> {
        if mins.len() != sizes.len() {
            return Err(ShapeError::RankMismatch { expected: mins.len(), found: sizes.len() });
        }

        Self::bounded(&mins.iter().copied().zip(sizes.iter().copied()).collect::<Vec<_>>())
    }

    /// Creates a shape from a sequence of dimensions, validating each of them.
    pub fn from_axes<I: IntoIterator<Item = Dim>>(axes: I) -> Result<Self, ShapeError> {
        let mut dims = SmallVec::new();

        for (axis, dim) in axes.into_iter().enumerate() {
            dims.push(dim.validate(axis).map_err(|err| {
                log::debug!("rejected dimension {dim} for axis {axis}: {err}");
                err
            })?);
        }

        let shape = Self { dims };

        if shape.checked_len().is_none() {
            return Err(ShapeError::Overflow);
        }

        Ok(shape)
    }

    /// Returns the dimension of the specified axis.
    ///
    /// # Panics
    ///
    /// Panics if the axis is out of bounds.
    pub fn axis(&self, index: usize) -> Dim {
        assert!(index < self.rank(), "invalid dimension");

        self.dims[index]
    }

    /// Returns the dimensions of all axes.
    pub fn axes(&self) -> &[Dim] {
        &self.dims
    }

    /// Returns the number of elements in the specified dimension.
    ///
    /// # Panics
    ///
    /// Panics if the dimension is out of bounds.
    pub fn dim(&self, index: usize) -> usize {
        self.axis(index).size()
    }

    /// Returns an iterator over the number of elements in each dimension.
    pub fn dims(&self) -> Dims<'_> {
        self.dims.iter().copied().map(Dim::size as fn(Dim) -> usize)
    }

    /// Returns the number of elements in the specified dimension, or `None` if out of bounds.
    pub fn get_dim(&self, index: usize) -> Option<usize> {
        self.dims.get(index).map(|dim| dim.size())
    }

    /// Returns `true` if all dimensions are fixed.
    pub fn is_fixed(&self) -> bool {
        self.dims.iter().all(|dim| dim.is_fixed())
    }

    /// Returns the number of elements in the array, which is 1 for rank 0.
    pub fn len(&self) -> usize {
        self.dims().product()
    }

    /// Returns the array rank, i.e. the number of dimensions.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Returns the distance between elements in each dimension for dense storage,
    /// where the last dimension is contiguous.
    pub fn strides(&self) -> SmallVec<[isize; INLINE_RANK]> {
        let mut strides = SmallVec::from_elem(0, self.rank());
        let mut stride = 1;

        for i in (0..self.rank()).rev() {
            strides[i] = stride as isize;
            stride *= self.dim(i);
        }

        strides
    }

    /// Converts all bounded dimensions into fixed ones with the observed sizes.
    ///
    /// Fails if a dimension is smaller than its declared minimum.
    pub fn try_fix(&self) -> Result<Self, ShapeError> {
        let dims = self
            .dims
            .iter()
            .enumerate()
            .map(|(axis, dim)| dim.try_fix(axis))
            .collect::<Result<_, _>>()?;

        Ok(Self { dims })
    }

    // Creates a shape from fixed sizes that are known to be positive.
    pub(crate) fn from_valid_dims<I: IntoIterator<Item = usize>>(dims: I) -> Self {
        let dims: SmallVec<[Dim; INLINE_RANK]> = dims.into_iter().map(Dim::Fixed).collect();

        debug_assert!(dims.iter().all(|dim| dim.size() > 0), "invalid shape");

        Self { dims }
    }

    pub(crate) fn checked_len(&self) -> Option<usize> {
        self.dims().try_fold(1usize, |acc, x| acc.checked_mul(x))
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;

        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }

            write!(f, "{dim}")?;
        }

        write!(f, "]")
    }
}

impl Ord for Shape {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dims.iter().rev().cmp(other.dims.iter().rev())
    }
}

impl PartialOrd for Shape {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<&[usize]> for Shape {
    type Error = ShapeError;

    fn try_from(dims: &[usize]) -> Result<Self, ShapeError> {
        Self::from_dims(dims)
    }
}

impl<const N: usize> TryFrom<[usize; N]> for Shape {
    type Error = ShapeError;

    fn try_from(dims: [usize; N]) -> Result<Self, ShapeError> {
        Self::from_dims(&dims)
    }
}

impl TryFrom<Vec<usize>> for Shape {
    type Error = ShapeError;

    fn try_from(dims: Vec<usize>) -> Result<Self, ShapeError> {
        Self::from_dims(&dims)
    }
}
