//! Traversal over the indices and offsets of a shape.
//!
//! All functions visit indices with the first axis as the outermost loop and the last
//! axis as the innermost, which is the order of increasing offsets. Each visit gets
//! the index tuple together with its offset, computed as `offset + step * i.to_offset(s)`
//! from the initial offset and the offset step given by the caller. The step may be
//! negative, e.g. to walk a buffer from the end.
//!
//! The reverse variants produce exactly the reverse sequence of the forward variants.
//!
//! A traversal never fails and never allocates per step, and a shape of rank 0 is
//! visited once with the empty index tuple.
//!
//! Steps for disjoint index ranges touch disjoint offsets, so a fold can be split along
//! the outermost axis if the accumulator combination is associative and commutative.
//! See `par_fold` with the `rayon` feature. The for-each variants are always sequential,
//! since the effect may depend on the enumeration order.

use smallvec::SmallVec;

use crate::index::Idxs;
use crate::shape::{Shape, INLINE_RANK};

/// Folds over all indices of a shape in forward order.
///
/// The function is called with the index tuple, the offset and the accumulator.
pub fn fold<A, F>(shape: &Shape, offset: isize, step: isize, init: A, mut f: F) -> A
where
    F: FnMut(&Idxs, isize, A) -> A,
{
    let mut idxs = Idxs::zeros(shape.rank());
    let mut offset = offset;
    let mut acc = init;

    loop {
        acc = f(&idxs, offset, acc);

        if !idxs.increment(shape) {
            break acc;
        }

        offset += step;
    }
}

/// Folds over all indices of a shape in reverse order.
pub fn fold_rev<A, F>(shape: &Shape, offset: isize, step: isize, init: A, mut f: F) -> A
where
    F: FnMut(&Idxs, isize, A) -> A,
{
    let mut idxs = Idxs::last(shape);
    let mut offset = offset + step * (shape.len() - 1) as isize;
    let mut acc = init;

    loop {
        acc = f(&idxs, offset, acc);

        if !idxs.decrement(shape) {
            break acc;
        }

        offset -= step;
    }
}

/// Calls a function for all indices of a shape in forward order.
pub fn for_each<F: FnMut(&Idxs, isize)>(shape: &Shape, offset: isize, step: isize, mut f: F) {
    fold(shape, offset, step, (), |idxs, offset, ()| f(idxs, offset))
}

/// Calls a function for all indices of a shape in reverse order.
pub fn for_each_rev<F: FnMut(&Idxs, isize)>(shape: &Shape, offset: isize, step: isize, mut f: F) {
    fold_rev(shape, offset, step, (), |idxs, offset, ()| f(idxs, offset))
}

/// Folds over all indices of a shape in forward order, stopping at the first error.
pub fn try_fold<A, E, F>(
    shape: &Shape,
    offset: isize,
    step: isize,
    init: A,
    mut f: F,
) -> Result<A, E>
where
    F: FnMut(&Idxs, isize, A) -> Result<A, E>,
{
    let mut idxs = Idxs::zeros(shape.rank());
    let mut offset = offset;
    let mut acc = init;

    loop {
        acc = f(&idxs, offset, acc)?;

        if !idxs.increment(shape) {
            break Ok(acc);
        }

        offset += step;
    }
}

/// Folds over all indices of a shape in forward order, without offsets.
pub fn fold_idxs<A, F: FnMut(&Idxs, A) -> A>(shape: &Shape, init: A, mut f: F) -> A {
    fold(shape, 0, 0, init, |idxs, _, acc| f(idxs, acc))
}

/// Folds over the rectangular range of indices between `min` and `max`, inclusive.
///
/// Each axis is enumerated independently from `min[i]` to `max[i]`, ascending if
/// `min[i] <= max[i]` and descending otherwise, so directions can be mixed. Offsets are
/// those of the full shape, i.e. the index `i` gets `offset + step * i.to_offset(shape)`,
/// and the initial offset is the offset of the all-zero index.
///
/// The bounds must be within the shape. This is a precondition that is only checked in
/// debug builds, and out of range bounds give an unspecified enumeration otherwise.
pub fn fold_part<A, F>(
    shape: &Shape,
    min: &Idxs,
    max: &Idxs,
    offset: isize,
    step: isize,
    init: A,
    mut f: F,
) -> A
where
    F: FnMut(&Idxs, isize, A) -> A,
{
    let rank = shape.rank();

    debug_assert!(min.rank() == rank && max.rank() == rank, "invalid rank");
    debug_assert!(min.check(shape).is_ok() && max.check(shape).is_ok(), "invalid bounds");

    // Offset change when moving one index along each axis, in the walking direction.
    let mut deltas = SmallVec::<[isize; INLINE_RANK]>::from_elem(0, rank);
    let mut stride = step;

    for i in (0..rank).rev() {
        deltas[i] = if min[i] <= max[i] { stride } else { -stride };
        stride *= shape.dim(i) as isize;
    }

    let mut idxs = min.clone();
    let mut offset = offset + step * min.to_offset(shape);
    let mut acc = init;

    'outer: loop {
        acc = f(&idxs, offset, acc);

        let words = idxs.as_mut_slice();

        for i in (0..rank).rev() {
            if words[i] != max[i] {
                words[i] = if min[i] <= max[i] { words[i] + 1 } else { words[i] - 1 };
                offset += deltas[i];

                continue 'outer;
            }

            // Rewind the axis and carry into the next outer one.
            words[i] = min[i];
            offset -= deltas[i] * min[i].abs_diff(max[i]) as isize;
        }

        break acc;
    }
}

/// Folds over the rectangular range of indices between `min` and `max` in reverse order.
///
/// This is the same as `fold_part` with the bounds swapped.
pub fn fold_part_rev<A, F>(
    shape: &Shape,
    min: &Idxs,
    max: &Idxs,
    offset: isize,
    step: isize,
    init: A,
    f: F,
) -> A
where
    F: FnMut(&Idxs, isize, A) -> A,
{
    fold_part(shape, max, min, offset, step, init, f)
}

/// Calls a function for the rectangular range of indices between `min` and `max`.
///
/// See `fold_part` for the enumeration order and preconditions.
pub fn for_each_part<F: FnMut(&Idxs, isize)>(
    shape: &Shape,
    min: &Idxs,
    max: &Idxs,
    offset: isize,
    step: isize,
    mut f: F,
) {
    fold_part(shape, min, max, offset, step, (), |idxs, offset, ()| f(idxs, offset))
}

/// Folds over the offsets of a shape in forward order, without index tuples.
pub fn fold_offsets<A, F>(shape: &Shape, offset: isize, step: isize, init: A, mut f: F) -> A
where
    F: FnMut(isize, A) -> A,
{
    (0..shape.len() as isize).fold(init, |acc, i| f(offset + step * i, acc))
}

/// Folds over the offsets of a shape in reverse order, without index tuples.
pub fn fold_offsets_rev<A, F>(shape: &Shape, offset: isize, step: isize, init: A, mut f: F) -> A
where
    F: FnMut(isize, A) -> A,
{
    (0..shape.len() as isize).rev().fold(init, |acc, i| f(offset + step * i, acc))
}

/// Calls a function for the offsets of a shape in forward order.
pub fn for_each_offsets<F: FnMut(isize)>(shape: &Shape, offset: isize, step: isize, mut f: F) {
    fold_offsets(shape, offset, step, (), |offset, ()| f(offset))
}

/// Folds over all indices of a shape in parallel, splitting the outermost axis.
///
/// Each part is folded in forward order starting from `identity()`, and the results
/// are merged with `combine`. The result is only deterministic if `combine` is
/// associative and commutative with `identity()` as neutral element.
#[cfg(feature = "rayon")]
pub fn par_fold<A, I, F, C>(
    shape: &Shape,
    offset: isize,
    step: isize,
    identity: I,
    f: F,
    combine: C,
) -> A
where
    A: Send,
    I: Fn() -> A + Send + Sync,
    F: Fn(&Idxs, isize, A) -> A + Send + Sync,
    C: Fn(A, A) -> A + Send + Sync,
{
    use rayon::prelude::*;

    if shape.rank() == 0 {
        return fold(shape, offset, step, identity(), f);
    }

    let last = Idxs::last(shape);

    (0..shape.dim(0))
        .into_par_iter()
        .map(|i| {
            let mut min = Idxs::zeros(shape.rank());
            let mut max = last.clone();

            min.as_mut_slice()[0] = i;
            max.as_mut_slice()[0] = i;

            fold_part(shape, &min, &max, offset, step, identity(), &f)
        })
        .reduce(&identity, &combine)
}
