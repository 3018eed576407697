use std::fmt::{self, Debug, Formatter};
use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

use num_traits::Zero;

use crate::buffer::{Buffer, BufferKind, ElementAccess};
use crate::error::{BoundsError, ShapeError};
use crate::index::{panic_bounds_check, Idxs};
use crate::iter::Indices;
use crate::shape::Shape;
use crate::traverse;

/// Dense multidimensional array.
///
/// A frame owns its elements together with the shape, which is validated once when the
/// frame is created and not changed afterwards. Elements are stored with the last axis
/// contiguous, and the storage backend is selected from the element type and the shape.
///
/// A frame of rank 0 holds a single element and goes through the same code paths as
/// frames of higher rank.
#[derive(Clone)]
pub struct Frame<T> {
    shape: Shape,
    buffer: Buffer<T>,
}

impl<T> Frame<T> {
    /// Creates a frame from a shape and a vector of elements in offset order.
    pub fn from_vec(shape: Shape, vec: Vec<T>) -> Result<Self, ShapeError> {
        if vec.len() != shape.len() {
            return Err(ShapeError::LenMismatch { expected: shape.len(), found: vec.len() });
        }

        let buffer = Buffer::from_vec_in(BufferKind::select::<T>(&shape), vec);

        Ok(Self { shape, buffer })
    }

    /// Creates a frame with the elements given by a function of the index.
    pub fn from_fn<F: FnMut(&Idxs) -> T>(shape: Shape, mut f: F) -> Self {
        let mut vec = Vec::with_capacity(shape.len());

        traverse::fold_idxs(&shape, (), |idxs, ()| vec.push(f(idxs)));

        let buffer = Buffer::from_vec_in(BufferKind::select::<T>(&shape), vec);

        Self { shape, buffer }
    }

    /// Creates a frame with all elements set to the same value.
    ///
    /// No element storage is allocated until the first element is modified.
    pub fn from_elem(shape: Shape, value: T) -> Self {
        let len = shape.len();

        Self { shape, buffer: Buffer::from_elem(value, len) }
    }

    /// Creates a frame of rank 1 from an array.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    #[track_caller]
    pub fn from_array1<const X: usize>(array: [T; X]) -> Self {
        Self::from_nested(&[X], Vec::from(array))
    }

    /// Creates a frame of rank 2 from an array of rows.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is zero.
    #[track_caller]
    pub fn from_array2<const X: usize, const Y: usize>(array: [[T; Y]; X]) -> Self {
        Self::from_nested(&[X, Y], array.into_iter().flatten().collect())
    }

    /// Creates a frame of rank 3 from a nested array.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is zero.
    #[track_caller]
    pub fn from_array3<const X: usize, const Y: usize, const Z: usize>(
        array: [[[T; Z]; Y]; X],
    ) -> Self {
        Self::from_nested(&[X, Y, Z], array.into_iter().flatten().flatten().collect())
    }

    /// Creates a frame of rank 0 holding a single element.
    pub fn scalar(value: T) -> Self {
        Self::from_elem(Shape::scalar(), value)
    }

    /// Returns the element buffer.
    pub fn buffer(&self) -> &Buffer<T> {
        &self.buffer
    }

    /// Returns an iterator over all index tuples of the frame.
    pub fn indices(&self) -> Indices<'_> {
        self.shape.indices()
    }

    /// Returns the number of elements in the frame.
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    /// Returns the frame rank, i.e. the number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Returns the frame shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[track_caller]
    fn from_nested(dims: &[usize], vec: Vec<T>) -> Self {
        assert!(dims.iter().all(|&size| size > 0), "invalid shape");

        let shape = Shape::from_valid_dims(dims.iter().copied());
        let buffer = Buffer::from_vec_in(BufferKind::select::<T>(&shape), vec);

        Self { shape, buffer }
    }

    /// Returns the frame with the same elements and a new shape.
    pub fn reshape(self, new_shape: Shape) -> Result<Self, ShapeError> {
        if new_shape.len() != self.len() {
            return Err(ShapeError::LenMismatch { expected: new_shape.len(), found: self.len() });
        }

        Ok(Self { shape: new_shape, buffer: self.buffer })
    }
}

impl<T: Clone> Frame<T> {
    /// Returns a reference to an element, checking the index against the shape.
    pub fn get(&self, idxs: &Idxs) -> Result<&T, BoundsError> {
        let offset = idxs.checked_offset(&self.shape)?;

        Ok(self.buffer.read(offset as usize))
    }

    /// Returns a reference to an element at an index that is known to be valid.
    ///
    /// The index is only checked in debug builds. An invalid index gives an unspecified
    /// element or a panic, but never undefined behavior.
    pub fn get_unchecked(&self, idxs: &Idxs) -> &T {
        self.buffer.read(idxs.to_offset(&self.shape) as usize)
    }

    /// Replaces an element, checking the index against the shape.
    pub fn set(&mut self, idxs: &Idxs, value: T) -> Result<(), BoundsError> {
        let offset = idxs.checked_offset(&self.shape)?;

        self.buffer.write(offset as usize, value);

        Ok(())
    }

    /// Folds over all elements in offset order, with the index of each element.
    pub fn fold<A, F: FnMut(A, &Idxs, &T) -> A>(&self, init: A, mut f: F) -> A {
        traverse::fold(&self.shape, 0, 1, init, |idxs, offset, acc| {
            f(acc, idxs, self.buffer.read(offset as usize))
        })
    }

    /// Returns a new frame with a function applied to each element.
    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> Frame<U> {
        let mut vec = Vec::with_capacity(self.len());

        traverse::for_each_offsets(&self.shape, 0, 1, |offset| {
            vec.push(f(self.buffer.read(offset as usize)))
        });

        let buffer = Buffer::from_vec_in(BufferKind::select::<U>(&self.shape), vec);

        Frame { shape: self.shape.clone(), buffer }
    }

    /// Returns a new frame combining the elements of two frames of the same shape.
    pub fn zip_with<U, V, F>(&self, other: &Frame<U>, mut f: F) -> Result<Frame<V>, ShapeError>
    where
        U: Clone,
        F: FnMut(&T, &U) -> V,
    {
        check_same_shape(&self.shape, &other.shape)?;

        let mut vec = Vec::with_capacity(self.len());

        traverse::for_each_offsets(&self.shape, 0, 1, |offset| {
            let offset = offset as usize;

            vec.push(f(self.buffer.read(offset), other.buffer.read(offset)))
        });

        let buffer = Buffer::from_vec_in(BufferKind::select::<V>(&self.shape), vec);

        Ok(Frame { shape: self.shape.clone(), buffer })
    }

    /// Returns a reference to the largest element, and the first one if several are equal.
    ///
    /// Elements that are not comparable, e.g. NaN, are skipped unless the first element is.
    pub fn max_element(&self) -> &T
    where
        T: PartialOrd,
    {
        traverse::fold_offsets(&self.shape, 0, 1, self.buffer.read(0), |offset, max| {
            let value = self.buffer.read(offset as usize);

            if value > max {
                value
            } else {
                max
            }
        })
    }

    /// Returns the sum of all elements.
    pub fn sum(&self) -> T
    where
        T: Zero,
    {
        traverse::fold_offsets(&self.shape, 0, 1, T::zero(), |offset, acc| {
            acc + self.buffer.read(offset as usize).clone()
        })
    }

    /// Returns a new frame with the elements in the rectangular range between `min`
    /// and `max`, inclusive.
    ///
    /// Each axis is taken in reverse order if `max` is less than `min` along it.
    pub fn sub_frame(&self, min: &Idxs, max: &Idxs) -> Result<Self, BoundsError> {
        min.check(&self.shape)?;
        max.check(&self.shape)?;

        let dims = min.iter().zip(max.iter()).map(|(i, j)| i.to_word().abs_diff(j.to_word()) + 1);
        let shape = Shape::from_valid_dims(dims);

        let mut vec = Vec::with_capacity(shape.len());

        traverse::for_each_part(&self.shape, min, max, 0, 1, |_, offset| {
            vec.push(self.buffer.read(offset as usize).clone())
        });

        let buffer = Buffer::from_vec_in(BufferKind::select::<T>(&shape), vec);

        Ok(Self { shape, buffer })
    }

    /// Calls a function to update each element in the rectangular range between `min`
    /// and `max`, inclusive, in the enumeration order of `traverse::fold_part`.
    pub fn update_part<F>(&mut self, min: &Idxs, max: &Idxs, mut f: F) -> Result<(), BoundsError>
    where
        F: FnMut(&Idxs, &mut T),
    {
        min.check(&self.shape)?;
        max.check(&self.shape)?;

        let elems = self.buffer.make_dense();

        traverse::for_each_part(&self.shape, min, max, 0, 1, |idxs, offset| {
            f(idxs, &mut elems[offset as usize])
        });

        Ok(())
    }

    /// Returns the elements in offset order.
    pub fn to_vec(&self) -> Vec<T> {
        self.clone().into_vec()
    }

    /// Converts the frame into a vector of elements in offset order.
    pub fn into_vec(self) -> Vec<T> {
        self.buffer.into_vec()
    }
}

pub(crate) fn check_same_shape(a: &Shape, b: &Shape) -> Result<(), ShapeError> {
    if a != b {
        let (expected, found) = (a.dims().collect(), b.dims().collect());

        return Err(ShapeError::Mismatch { expected, found });
    }

    Ok(())
}

impl<T: Debug + Clone> Debug for Frame<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("shape", &format_args!("{}", self.shape))
            .field("data", &self.to_vec())
            .finish()
    }
}

impl<T: Clone + PartialEq> PartialEq for Frame<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
            && traverse::fold_offsets(&self.shape, 0, 1, true, |offset, eq| {
                let offset = offset as usize;

                eq && self.buffer.read(offset) == other.buffer.read(offset)
            })
    }
}

impl<T: Clone + Eq> Eq for Frame<T> {}

impl<T: Clone> Index<&Idxs> for Frame<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, idxs: &Idxs) -> &T {
        match self.get(idxs) {
            Ok(value) => value,
            Err(_) => panic_index(idxs, &self.shape),
        }
    }
}

impl<T: Clone> IndexMut<&Idxs> for Frame<T> {
    #[track_caller]
    fn index_mut(&mut self, idxs: &Idxs) -> &mut T {
        match idxs.checked_offset(&self.shape) {
            Ok(offset) => &mut self.buffer.make_dense()[offset as usize],
            Err(_) => panic_index(idxs, &self.shape),
        }
    }
}

#[cold]
#[inline(never)]
#[track_caller]
fn panic_index(idxs: &Idxs, shape: &Shape) -> ! {
    for (axis, idx) in idxs.iter().enumerate() {
        if let Some(size) = shape.get_dim(axis) {
            if idx.to_word() >= size {
                panic_bounds_check(idx.to_word(), size)
            }
        }
    }

    panic!("invalid index {idxs} for shape {shape}")
}

macro_rules! impl_binary_op {
    ($trt:tt, $fn:tt) => {
        impl<T: Clone + $trt<Output = T>> $trt for &Frame<T> {
            type Output = Frame<T>;

            #[track_caller]
            fn $fn(self, rhs: Self) -> Frame<T> {
                match self.zip_with(rhs, |x, y| x.clone().$fn(y.clone())) {
                    Ok(frame) => frame,
                    Err(err) => panic!("{err}"),
                }
            }
        }
    };
}

macro_rules! impl_scalar_op {
    ($trt:tt, $fn:tt, ($($t:ty),+)) => {
        $(
            impl $trt<$t> for &Frame<$t> {
                type Output = Frame<$t>;

                fn $fn(self, rhs: $t) -> Frame<$t> {
                    self.map(|&x| x.$fn(rhs))
                }
            }
        )+
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(Mul, mul);

impl_scalar_op!(Add, add, (f32, f64, i32, i64, isize, u32, u64, usize));
impl_scalar_op!(Sub, sub, (f32, f64, i32, i64, isize, u32, u64, usize));
impl_scalar_op!(Mul, mul, (f32, f64, i32, i64, isize, u32, u64, usize));

impl<T: Clone + Neg<Output = T>> Neg for &Frame<T> {
    type Output = Frame<T>;

    fn neg(self) -> Frame<T> {
        self.map(|x| -x.clone())
    }
}

impl<T, const X: usize> From<[T; X]> for Frame<T> {
    #[track_caller]
    fn from(array: [T; X]) -> Self {
        Self::from_array1(array)
    }
}

impl<T, const X: usize, const Y: usize> From<[[T; Y]; X]> for Frame<T> {
    #[track_caller]
    fn from(array: [[T; Y]; X]) -> Self {
        Self::from_array2(array)
    }
}

impl<T, const X: usize, const Y: usize, const Z: usize> From<[[[T; Z]; Y]; X]> for Frame<T> {
    #[track_caller]
    fn from(array: [[[T; Z]; Y]; X]) -> Self {
        Self::from_array3(array)
    }
}
