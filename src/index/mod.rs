//! Module for single-axis and multi-axis array indices.

mod idx;
mod idxs;

pub use idx::Idx;
pub use idxs::Idxs;

#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn panic_bounds_check(index: usize, len: usize) -> ! {
    panic!("index out of bounds: the len is {len} but the index is {index}")
}

#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn panic_offset_check(offset: isize, len: usize) -> ! {
    panic!("offset out of bounds: the len is {len} but the offset is {offset}")
}
