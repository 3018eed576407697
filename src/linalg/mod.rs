//! Module for matrix operations on frames of rank 2.
//!
//! The closed-form kernels work on fixed-size arrays and are used directly with
//! [`svd2`] and [`svd3`], or through the frame functions in this module, which
//! check the shape and dispatch on the matrix size.

use std::array;
use std::fmt::{self, Debug, Formatter};

use num_traits::{Float, Num, One, Zero};

use crate::error::{Error, Result, ShapeError};
use crate::frame::Frame;
use crate::index::Idxs;
use crate::shape::Shape;
use crate::traverse;

mod svd;

pub use svd::{svd2, svd3, Svd};

/// Singular value decomposition of a square frame, see [`Svd`].
#[derive(Clone)]
pub struct FrameSvd<T> {
    /// Left singular vectors as columns.
    pub u: Frame<T>,
    /// Singular values in descending order, as a frame of rank 1.
    pub s: Frame<T>,
    /// Right singular vectors as columns.
    pub v: Frame<T>,
}

impl<T: Clone + Debug> Debug for FrameSvd<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameSvd")
            .field("u", &self.u)
            .field("s", &self.s)
            .field("v", &self.v)
            .finish()
    }
}

/// Returns the determinant of a square matrix.
///
/// Matrices up to 3x3 use the closed-form expression, and larger ones cofactor
/// expansion along the first row.
pub fn det<T: Clone + Num>(a: &Frame<T>) -> Result<T> {
    let n = square_dim(a)?;

    Ok(det_dense(&a.to_vec(), n))
}

/// Returns the identity matrix of the given size.
///
/// # Panics
///
/// Panics if the size is zero.
#[track_caller]
pub fn identity<T: Clone + One + Zero>(n: usize) -> Frame<T> {
    assert!(n > 0, "invalid dimension");

    Frame::from_fn(Shape::from_valid_dims([n, n]), |idxs| {
        if idxs[0] == idxs[1] {
            T::one()
        } else {
            T::zero()
        }
    })
}

/// Returns the inverse of a square matrix.
///
/// Matrices up to 3x3 are inverted through the adjugate, and larger ones with
/// Gauss-Jordan elimination with partial pivoting. Fails with `Error::Singular` if the
/// determinant or a pivot is zero relative to the largest element.
pub fn inverse<T: Float>(a: &Frame<T>) -> Result<Frame<T>> {
    let n = square_dim(a)?;
    let elems = a.to_vec();
    let scale = elems.iter().fold(T::zero(), |max, &x| max.max(x.abs()));

    let inv = if n <= 3 {
        let det = det_dense(&elems, n);

        if det.abs() <= T::epsilon() * scale.powi(n as i32) {
            log::debug!("inverse: singular {n}x{n} matrix");

            return Err(Error::Singular);
        }

        adjugate(&elems, n).into_iter().map(|x| x / det).collect()
    } else {
        gauss_jordan(elems, n, scale)?
    };

    Ok(Frame::from_vec(a.shape().clone(), inv)?)
}

/// Returns the matrix product of two frames of rank 2.
pub fn matmul<T: Clone + Num>(a: &Frame<T>, b: &Frame<T>) -> Result<Frame<T>> {
    let (m, k) = matrix_dims(a)?;
    let (l, n) = matrix_dims(b)?;

    if k != l {
        return Err(ShapeError::Mismatch { expected: vec![k, n], found: vec![l, n] }.into());
    }

    let (x, y) = (a.to_vec(), b.to_vec());

    Ok(Frame::from_fn(Shape::from_valid_dims([m, n]), |idxs| {
        let (i, j) = (idxs[0], idxs[1]);

        (0..k).fold(T::zero(), |acc, p| acc + x[i * k + p].clone() * y[p * n + j].clone())
    }))
}

/// Computes the singular value decomposition of a 2x2 or 3x3 matrix.
///
/// Fails with `Error::Unsupported` for other square sizes.
pub fn svd<T: Float>(a: &Frame<T>) -> Result<FrameSvd<T>> {
    let n = square_dim(a)?;
    let elems = a.to_vec();

    match n {
        2 => Ok(to_frames(svd2(to_array(&elems)))),
        3 => Ok(to_frames(svd3(to_array(&elems)))),
        _ => Err(Error::Unsupported { op: "svd", shape: a.shape().to_string() }),
    }
}

/// Returns the transpose of a frame of rank 2.
pub fn transpose<T: Clone>(a: &Frame<T>) -> Result<Frame<T>> {
    let (m, n) = matrix_dims(a)?;

    Ok(Frame::from_fn(Shape::from_valid_dims([n, m]), |idxs| {
        a.get_unchecked(&Idxs::from([idxs[1], idxs[0]])).clone()
    }))
}

fn matrix_dims<T>(a: &Frame<T>) -> Result<(usize, usize)> {
    match a.rank() {
        2 => Ok((a.shape().dim(0), a.shape().dim(1))),
        rank => Err(ShapeError::RankMismatch { expected: 2, found: rank }.into()),
    }
}

fn square_dim<T>(a: &Frame<T>) -> Result<usize> {
    let (m, n) = matrix_dims(a)?;

    if m != n {
        return Err(Error::NotSquare { shape: a.shape().to_string() });
    }

    Ok(n)
}

fn det_dense<T: Clone + Num>(a: &[T], n: usize) -> T {
    let at = |i: usize, j: usize| a[i * n + j].clone();

    match n {
        1 => at(0, 0),
        2 => at(0, 0) * at(1, 1) - at(0, 1) * at(1, 0),
        3 => {
            at(0, 0) * (at(1, 1) * at(2, 2) - at(1, 2) * at(2, 1))
                - at(0, 1) * (at(1, 0) * at(2, 2) - at(1, 2) * at(2, 0))
                + at(0, 2) * (at(1, 0) * at(2, 1) - at(1, 1) * at(2, 0))
        }
        _ => {
            let shape = Shape::from_valid_dims([n, n]);
            let (min, max) = (Idxs::from([1, 0]), Idxs::from([n - 1, n - 1]));

            (0..n).fold(T::zero(), |acc, j| {
                let mut minor = Vec::with_capacity((n - 1) * (n - 1));

                traverse::for_each_part(&shape, &min, &max, 0, 1, |idxs, offset| {
                    if idxs[1] != j {
                        minor.push(a[offset as usize].clone());
                    }
                });

                let term = at(0, j) * det_dense(&minor, n - 1);

                if j % 2 == 0 {
                    acc + term
                } else {
                    acc - term
                }
            })
        }
    }
}

// Transposed cofactor matrix, for n <= 3.
fn adjugate<T: Float>(a: &[T], n: usize) -> Vec<T> {
    let at = |i: usize, j: usize| a[i * n + j];

    match n {
        1 => vec![T::one()],
        2 => vec![at(1, 1), -at(0, 1), -at(1, 0), at(0, 0)],
        _ => {
            // Cyclic index order gives the signed cofactors directly.
            let cofactor = |i: usize, j: usize| {
                let (i1, i2, j1, j2) = ((i + 1) % 3, (i + 2) % 3, (j + 1) % 3, (j + 2) % 3);

                at(i1, j1) * at(i2, j2) - at(i1, j2) * at(i2, j1)
            };

            (0..9).map(|k| cofactor(k % 3, k / 3)).collect()
        }
    }
}

fn gauss_jordan<T: Float>(mut a: Vec<T>, n: usize, scale: T) -> Result<Vec<T>> {
    let mut inv = identity::<T>(n).into_vec();
    let tol = T::epsilon() * scale * T::from(n).unwrap_or_else(T::one);

    for k in 0..n {
        let pivot_row =
            (k..n).fold(k, |p, i| if a[i * n + k].abs() > a[p * n + k].abs() { i } else { p });
        let pivot = a[pivot_row * n + k];

        if pivot.abs() <= tol {
            log::debug!("inverse: pivot {k} below tolerance in {n}x{n} matrix");

            return Err(Error::Singular);
        }

        if pivot_row != k {
            for j in 0..n {
                a.swap(k * n + j, pivot_row * n + j);
                inv.swap(k * n + j, pivot_row * n + j);
            }
        }

        for j in 0..n {
            a[k * n + j] = a[k * n + j] / pivot;
            inv[k * n + j] = inv[k * n + j] / pivot;
        }

        for i in (0..n).filter(|&i| i != k) {
            let factor = a[i * n + k];

            for j in 0..n {
                a[i * n + j] = a[i * n + j] - factor * a[k * n + j];
                inv[i * n + j] = inv[i * n + j] - factor * inv[k * n + j];
            }
        }
    }

    Ok(inv)
}

fn to_array<T: Copy, const N: usize>(elems: &[T]) -> [[T; N]; N] {
    array::from_fn(|i| array::from_fn(|j| elems[i * N + j]))
}

fn to_frames<T, const N: usize>(svd: Svd<T, N>) -> FrameSvd<T> {
    FrameSvd {
        u: Frame::from_array2(svd.u),
        s: Frame::from_array1(svd.s),
        v: Frame::from_array2(svd.v),
    }
}
