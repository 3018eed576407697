/*!
# Dimensioned multidimensional frames for Rust

## Overview

The dimframe crate provides a multidimensional array type, `Frame`, together with
the index model and traversal engine it is built on, and closed-form linear algebra
kernels for small matrices.

Here are the main features of dimframe:

- Shapes where each dimension is either fixed, or bounded with a runtime size that is
  validated against a declared minimum when the shape is created.
- Index tuples with odometer arithmetic, and a bijection between index tuples and
  linear offsets where the last dimension is contiguous.
- Fold and for-each traversal over all indices or a rectangular part of a shape, in
  forward or reverse order and with mixed directions per axis.
- Element storage behind a small access trait, with inline storage for small frames
  and a fill buffer that is materialized on the first write.
- Determinant and inverse for square matrices, and singular value decomposition
  for 2x2 and 3x3 matrices with proper rotations and sorted singular values.

## Cargo features

- `rayon`: parallel fold over the outermost axis, see `traverse::par_fold`.
- `serde`: serialization and deserialization of shapes, indices and frames.
  Deserialized shapes and frames are validated like any other.

## Logging

The crate logs through the `log` facade, and does not install a logger. Rejected
shapes and degenerate matrix kernels are reported at debug level.
*/

#![warn(missing_docs)]
#![warn(unreachable_pub)]
#![warn(unused_results)]

pub mod buffer;
pub mod linalg;
pub mod traverse;

mod dim;
mod error;
mod frame;
mod index;
mod iter;
mod macros;
mod shape;

#[cfg(feature = "serde")]
mod serde;

pub use dim::Dim;
pub use error::{BoundsError, Error, Result, ShapeError};
pub use frame::Frame;
pub use index::{Idx, Idxs};
pub use iter::Indices;
pub use linalg::{svd2, svd3, FrameSvd, Svd};
pub use shape::{Dims, Shape, INLINE_RANK};
