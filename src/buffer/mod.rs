//! Module for array buffer handling.
//!
//! Element storage is reached through the [`ElementAccess`] trait only, with reads and
//! writes at a linear offset. The backend for a new array is selected at run time by
//! [`BufferKind::select`] from the element type and the shape.

use std::mem;

use crate::shape::Shape;

mod dyn_buffer;
mod static_buffer;

pub use dyn_buffer::DynBuffer;
pub use static_buffer::{StaticBuffer, STATIC_CAPACITY};

/// Largest inline buffer size in bytes.
const STATIC_BYTES: usize = 256;

/// Element access trait, for reading and writing elements at a linear offset.
pub trait ElementAccess {
    /// Array element type.
    type Item;

    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns a reference to the element at the offset.
    ///
    /// # Panics
    ///
    /// Panics if the offset is out of bounds.
    fn read(&self, offset: usize) -> &Self::Item;

    /// Replaces the element at the offset.
    ///
    /// # Panics
    ///
    /// Panics if the offset is out of bounds.
    fn write(&mut self, offset: usize, value: Self::Item);

    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Kind of array buffer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BufferKind {
    /// A single value repeated for all elements.
    Fill,
    /// Inline storage, see [`StaticBuffer`].
    Static,
    /// Heap storage, see [`DynBuffer`].
    Dyn,
}

/// Array buffer with the backend selected at run time.
#[derive(Clone, Debug)]
pub enum Buffer<T> {
    /// A single value repeated `len` times. Writing converts it to dense storage.
    Fill {
        /// Value of all elements.
        value: T,
        /// Number of elements.
        len: usize,
    },
    /// Inline storage.
    Static(StaticBuffer<T>),
    /// Heap storage.
    Dyn(DynBuffer<T>),
}

impl BufferKind {
    /// Selects the dense backend for elements of type `T` and the given shape.
    ///
    /// Arrays with fixed shape and at most `STATIC_CAPACITY` elements of in total
    /// 256 bytes or less are stored inline, and all other arrays on the heap.
    pub fn select<T>(shape: &Shape) -> Self {
        if shape.is_fixed() {
            Self::dense_for_len::<T>(shape.len())
        } else {
            Self::Dyn
        }
    }

    fn dense_for_len<T>(len: usize) -> Self {
        if len <= STATIC_CAPACITY && len * mem::size_of::<T>() <= STATIC_BYTES {
            Self::Static
        } else {
            Self::Dyn
        }
    }
}

impl<T> Buffer<T> {
    /// Creates a buffer with a single value for all elements.
    pub fn from_elem(value: T, len: usize) -> Self {
        Self::Fill { value, len }
    }

    /// Creates a dense buffer of the given kind from an iterator.
    ///
    /// # Panics
    ///
    /// Panics if the kind is `BufferKind::Fill`.
    pub fn from_iter_in<I: IntoIterator<Item = T>>(kind: BufferKind, iter: I) -> Self {
        match kind {
            BufferKind::Fill => panic!("invalid buffer kind"),
            BufferKind::Static => Self::Static(iter.into_iter().collect()),
            BufferKind::Dyn => Self::Dyn(iter.into_iter().collect()),
        }
    }

    /// Creates a dense buffer of the given kind from a vector.
    ///
    /// # Panics
    ///
    /// Panics if the kind is `BufferKind::Fill`.
    pub fn from_vec_in(kind: BufferKind, vec: Vec<T>) -> Self {
        match kind {
            BufferKind::Fill => panic!("invalid buffer kind"),
            BufferKind::Static => Self::Static(StaticBuffer::from(vec)),
            BufferKind::Dyn => Self::Dyn(DynBuffer::from(vec)),
        }
    }

    /// Returns the buffer kind.
    pub fn kind(&self) -> BufferKind {
        match self {
            Self::Fill { .. } => BufferKind::Fill,
            Self::Static(_) => BufferKind::Static,
            Self::Dyn(_) => BufferKind::Dyn,
        }
    }

    /// Returns a slice containing all elements, or `None` for a fill buffer.
    pub fn as_slice(&self) -> Option<&[T]> {
        match self {
            Self::Fill { .. } => None,
            Self::Static(buffer) => Some(buffer.as_slice()),
            Self::Dyn(buffer) => Some(buffer.as_slice()),
        }
    }

    /// Converts the buffer into a vector.
    pub fn into_vec(self) -> Vec<T>
    where
        T: Clone,
    {
        match self {
            Self::Fill { value, len } => vec![value; len],
            Self::Static(buffer) => buffer.into_vec(),
            Self::Dyn(buffer) => buffer.into_vec(),
        }
    }

    /// Returns a mutable slice containing all elements, converting a fill buffer
    /// into dense storage first.
    pub fn make_dense(&mut self) -> &mut [T]
    where
        T: Clone,
    {
        if let Self::Fill { value, len } = self {
            let kind = BufferKind::dense_for_len::<T>(*len);

            log::trace!("converting fill buffer of length {len} to {kind:?}");

            let dense = Self::from_iter_in(kind, (0..*len).map(|_| value.clone()));

            *self = dense;
        }

        match self {
            Self::Fill { .. } => unreachable!(),
            Self::Static(buffer) => buffer.as_mut_slice(),
            Self::Dyn(buffer) => buffer.as_mut_slice(),
        }
    }
}

impl<T: Clone> ElementAccess for Buffer<T> {
    type Item = T;

    fn len(&self) -> usize {
        match self {
            Self::Fill { len, .. } => *len,
            Self::Static(buffer) => buffer.len(),
            Self::Dyn(buffer) => buffer.len(),
        }
    }

    fn read(&self, offset: usize) -> &T {
        match self {
            Self::Fill { value, len } => {
                if offset >= *len {
                    crate::index::panic_bounds_check(offset, *len)
                }

                value
            }
            Self::Static(buffer) => buffer.read(offset),
            Self::Dyn(buffer) => buffer.read(offset),
        }
    }

    fn write(&mut self, offset: usize, value: T) {
        self.make_dense()[offset] = value;
    }
}
