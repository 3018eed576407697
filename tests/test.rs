#![warn(missing_docs)]
#![warn(unreachable_pub)]
#![warn(unused_results)]

use std::collections::hash_map::DefaultHasher;
use std::f64::consts::{FRAC_PI_6, SQRT_2};
use std::hash::{Hash, Hasher};

use approx::assert_abs_diff_eq;
#[cfg(feature = "serde")]
use serde_test::{assert_de_tokens_error, assert_tokens, Token};

use dimframe::buffer::{BufferKind, ElementAccess};
use dimframe::linalg::{self, FrameSvd};
use dimframe::{frame, svd2, svd3, traverse};
use dimframe::{BoundsError, Dim, Error, Frame, Idx, Idxs, Shape, ShapeError, Svd};

fn shape(dims: &[usize]) -> Shape {
    Shape::from_dims(dims).unwrap()
}

fn hash<T: Hash>(value: &T) -> u64 {
    let mut s = DefaultHasher::new();

    value.hash(&mut s);
    s.finish()
}

fn det2(m: &[[f64; 2]; 2]) -> f64 {
    m[0][0] * m[1][1] - m[0][1] * m[1][0]
}

fn det3(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

fn check_svd<const N: usize>(m: [[f64; N]; N], svd: &Svd<f64, N>) {
    let max = m.iter().flatten().fold(0.0f64, |max, x| max.max(x.abs()));
    let r = svd.reconstruct();

    for i in 0..N {
        for j in 0..N {
            assert!((r[i][j] - m[i][j]).abs() <= 1e-5 * max, "{svd:?} does not reconstruct {m:?}");

            let uu: f64 = (0..N).map(|k| svd.u[i][k] * svd.u[j][k]).sum();
            let vv: f64 = (0..N).map(|k| svd.v[i][k] * svd.v[j][k]).sum();
            let id = if i == j { 1.0 } else { 0.0 };

            assert_abs_diff_eq!(uu, id, epsilon = 1e-5);
            assert_abs_diff_eq!(vv, id, epsilon = 1e-5);
        }
    }

    for k in 0..N {
        assert!(svd.s[k] >= 0.0);

        if k > 0 {
            assert!(svd.s[k - 1] >= svd.s[k]);
        }
    }
}

fn widen<const N: usize>(svd: &Svd<f32, N>) -> Svd<f64, N> {
    let (u, v) = (svd.u.map(|row| row.map(f64::from)), svd.v.map(|row| row.map(f64::from)));

    Svd { u, s: svd.s.map(f64::from), v }
}

#[test]
fn test_dim() {
    assert_eq!(Dim::bounded(2, 1), Err(ShapeError::BelowMinimum { axis: 0, min: 2, size: 1 }));
    assert_eq!(Dim::bounded(0, 0), Err(ShapeError::ZeroExtent { axis: 0 }));
    assert_eq!(Dim::bounded(2, 3), Ok(Dim::Bounded { min: 2, size: 3 }));

    assert_eq!(Dim::Fixed(3), Dim::Bounded { min: 1, size: 3 });
    assert_eq!(hash(&Dim::Fixed(3)), hash(&Dim::Bounded { min: 1, size: 3 }));
    assert!(Dim::Fixed(2) < Dim::Bounded { min: 1, size: 3 });

    assert_eq!(Dim::Fixed(3).fixed_size(), Some(3));
    assert_eq!(Dim::Bounded { min: 1, size: 3 }.fixed_size(), None);
    assert_eq!(Dim::Bounded { min: 2, size: 3 }.min(), 2);
    assert_eq!(Dim::default(), Dim::Fixed(1));

    assert_eq!(
        Dim::Bounded { min: 4, size: 3 }.try_fix(1),
        Err(ShapeError::BelowMinimum { axis: 1, min: 4, size: 3 })
    );
    assert!(Dim::Bounded { min: 2, size: 3 }.try_fix(0).unwrap().is_fixed());

    assert_eq!(Dim::Fixed(3).to_string(), "3");
    assert_eq!(Dim::Bounded { min: 2, size: 3 }.to_string(), "3(>=2)");
}

#[test]
fn test_shape() {
    let s = shape(&[2, 3]);

    assert_eq!(s.rank(), 2);
    assert_eq!(s.len(), 6);
    assert_eq!(s.dims().collect::<Vec<_>>(), [2, 3]);
    assert_eq!(s.strides().as_slice(), [3, 1]);
    assert_eq!(s.get_dim(2), None);
    assert_eq!(s.to_string(), "[2, 3]");
    assert!(s.is_fixed());

    assert_eq!(Shape::from_dims(&[2, 0]), Err(ShapeError::ZeroExtent { axis: 1 }));
    assert_eq!(Shape::from_dims(&[usize::MAX, 2]), Err(ShapeError::Overflow));
    assert_eq!(Shape::try_from([4, 5]), Ok(shape(&[4, 5])));
    assert_eq!(Shape::try_from(vec![1, 0]), Err(ShapeError::ZeroExtent { axis: 1 }));

    let scalar = Shape::scalar();

    assert_eq!(scalar.rank(), 0);
    assert_eq!(scalar.len(), 1);
    assert_eq!(scalar.to_string(), "[]");
}

#[test]
fn test_shape_bounds() {
    let s = Shape::with_bounds(&[2, 1], &[3, 4]).unwrap();

    assert!(!s.is_fixed());
    assert_eq!(s, shape(&[3, 4]));
    assert_eq!(hash(&s), hash(&shape(&[3, 4])));
    assert_eq!(s.to_string(), "[3(>=2), 4(>=1)]");
    assert_eq!(s.axis(0), Dim::Bounded { min: 2, size: 3 });

    let fixed = s.try_fix().unwrap();

    assert!(fixed.is_fixed());
    assert_eq!(fixed.axes(), [Dim::Fixed(3), Dim::Fixed(4)]);

    assert_eq!(
        Shape::with_bounds(&[2], &[1]),
        Err(ShapeError::BelowMinimum { axis: 0, min: 2, size: 1 })
    );
    assert_eq!(
        Shape::with_bounds(&[1], &[1, 2]),
        Err(ShapeError::RankMismatch { expected: 1, found: 2 })
    );
    assert_eq!(Shape::bounded(&[(1, 0)]), Err(ShapeError::ZeroExtent { axis: 0 }));
}

#[test]
fn test_shape_ordering() {
    // The last axis is the most significant one.
    assert!(shape(&[3, 1]) < shape(&[1, 2]));
    assert!(shape(&[1, 2]) > shape(&[2, 1]));
    assert!(shape(&[1]) < shape(&[2, 1]));
    assert!(shape(&[2]) > shape(&[2, 1]));
    assert!(Shape::scalar() < shape(&[1]));

    // Index tuples are ordered the other way around.
    assert!(Idxs::from([1, 2]) < Idxs::from([2, 1]));

    let mut shapes = vec![shape(&[1, 3]), shape(&[2, 1]), shape(&[1, 2])];

    shapes.sort();

    assert_eq!(shapes, [shape(&[2, 1]), shape(&[1, 2]), shape(&[1, 3])]);
}

#[test]
#[should_panic(expected = "invalid dimension")]
fn test_shape_axis_panic() {
    _ = shape(&[2, 3]).axis(2);
}

#[test]
fn test_idx() {
    let s = shape(&[2, 3]);

    assert_eq!(Idx::from_word(&s, 1, 2), Some(Idx::new_unchecked(2)));
    assert_eq!(Idx::from_word(&s, 1, 3), None);
    assert_eq!(Idx::from_word(&s, 2, 0), None);

    let b = Dim::Bounded { min: 1, size: 3 };

    assert_eq!(Idx::in_dim(b, 10), Some(Idx::new_unchecked(10)));
    assert_eq!(
        Idx::new_unchecked(10).check(0, b),
        Err(BoundsError::Axis { axis: 0, index: 10, size: 3 })
    );
    assert_eq!(Idx::new_unchecked(2).check(0, b), Ok(Idx::new_unchecked(2)));

    let d = Dim::Fixed(3);

    assert_eq!(Idx::new_unchecked(1).succ(d), Ok(Idx::new_unchecked(2)));
    assert_eq!(Idx::new_unchecked(2).succ(d), Err(BoundsError::Overflow));
    assert_eq!(Idx::new_unchecked(2).succ(b), Ok(Idx::new_unchecked(3)));
    assert_eq!(Idx::new_unchecked(1).pred(d), Ok(Idx::new_unchecked(0)));
    assert_eq!(Idx::new_unchecked(0).pred(d), Err(BoundsError::Underflow));

    assert_eq!(Idx::new_unchecked(1).step(2, Dim::Fixed(5)), Idx::new_unchecked(3));
    assert_eq!(Idx::new_unchecked(4).step(-4, Dim::Fixed(5)), Idx::new_unchecked(0));
    assert_eq!(Idx::new_unchecked(4).step_unchecked(-1), Idx::new_unchecked(3));

    assert_eq!(usize::from(Idx::new_unchecked(7)), 7);
    assert_eq!(Idx::new_unchecked(7).to_string(), "7");
}

#[test]
#[should_panic(expected = "index out of bounds: the len is 4 but the index is 5")]
fn test_idx_step_panic() {
    _ = Idx::new_unchecked(3).step(2, Dim::Fixed(4));
}

#[test]
fn test_idxs() {
    let s = shape(&[2, 3]);

    // Enumeration order and offsets, with the last axis varying fastest.
    let expected = [[0, 0], [0, 1], [0, 2], [1, 0], [1, 1], [1, 2]];
    let indices = s.indices().collect::<Vec<_>>();

    assert_eq!(s.indices().len(), 6);
    assert_eq!(indices.len(), 6);

    for (offset, (idxs, words)) in indices.iter().zip(expected).enumerate() {
        assert_eq!(*idxs, words);
        assert_eq!(idxs.to_offset(&s), offset as isize);
        assert_eq!(Idxs::from_offset(offset as isize, &s).as_ref(), Ok(idxs));
    }

    let mut rev = s.indices().rev().collect::<Vec<_>>();

    rev.reverse();

    assert_eq!(rev, indices);

    assert_eq!(Idxs::from_offset(6, &s), Err(BoundsError::Offset { offset: 6, len: 6 }));
    assert_eq!(Idxs::from_offset(-1, &s), Err(BoundsError::Offset { offset: -1, len: 6 }));

    assert_eq!(Idxs::from_words(&s, &[1, 2]), Some(Idxs::from([1, 2])));
    assert_eq!(Idxs::from_words(&s, &[1, 3]), None);
    assert_eq!(Idxs::from_words(&s, &[1]), None);

    assert_eq!(Idxs::from([1, 2]).get(1), Idx::new_unchecked(2));
    assert_eq!(Idxs::from([1, 2])[0], 1);
    assert_eq!(Idxs::from([1, 2]).to_string(), "(1, 2)");
    assert_eq!(Idxs::last(&s), [1, 2]);
    let idxs = [Idx::new_unchecked(1), Idx::new_unchecked(0)].into_iter().collect::<Idxs>();

    assert_eq!(idxs, [1, 0]);
}

#[test]
fn test_idxs_arithmetic() {
    let s = shape(&[2, 3]);
    let first = Idxs::zeros(2);
    let last = Idxs::last(&s);

    assert_eq!(Idxs::from([0, 2]).succ(&s), Ok(Idxs::from([1, 0])));
    assert_eq!(Idxs::from([1, 0]).pred(&s), Ok(Idxs::from([0, 2])));
    assert_eq!(last.succ(&s), Err(BoundsError::Overflow));
    assert_eq!(first.pred(&s), Err(BoundsError::Underflow));

    assert_eq!(last.wrapping_succ(&s), first);
    assert_eq!(first.wrapping_pred(&s), last);

    assert_eq!(Idxs::from([0, 1]).step(4, &s), Idxs::from([1, 2]));
    assert_eq!(Idxs::from([1, 2]).step(-5, &s), first);

    // Rank 0 has a single index, which is both first and last.
    let scalar = Shape::scalar();

    assert_eq!(scalar.indices().collect::<Vec<_>>(), [Idxs::zeros(0)]);
    assert_eq!(Idxs::zeros(0).to_offset(&scalar), 0);
    assert_eq!(Idxs::zeros(0).succ(&scalar), Err(BoundsError::Overflow));
}

#[test]
#[should_panic(expected = "offset out of bounds: the len is 6 but the offset is 6")]
fn test_idxs_step_panic() {
    let s = shape(&[2, 3]);

    _ = Idxs::from([1, 2]).step(1, &s);
}

#[test]
fn test_idxs_bounded() {
    let s = Shape::with_bounds(&[1, 2], &[2, 3]).unwrap();

    // Values along bounded axes are checked when used.
    assert_eq!(Idxs::from_words(&s, &[5, 7]), Some(Idxs::from([5, 7])));
    assert_eq!(Idxs::from([1, 3]).check(&s), Err(BoundsError::Axis { axis: 1, index: 3, size: 3 }));
    assert_eq!(Idxs::from([1, 2]).checked_offset(&s), Ok(5));
    assert_eq!(Idxs::from([1]).check(&s), Err(BoundsError::Rank { expected: 2, found: 1 }));

    // Stepping from an index outside the runtime size fails instead of carrying.
    let err = BoundsError::Axis { axis: 1, index: 5, size: 3 };

    assert_eq!(Idxs::from([0, 5]).succ(&s), Err(err));
    assert_eq!(Idxs::from([0, 5]).pred(&s), Err(err));
    assert_eq!(Idxs::from([0, 2]).succ(&s), Ok(Idxs::from([1, 0])));
    assert_eq!(Idxs::from([1, 0]).pred(&s), Ok(Idxs::from([0, 2])));
}

#[test]
fn test_traverse() {
    let s = shape(&[2, 3]);

    let forward = traverse::fold(&s, 10, 2, Vec::new(), |idxs, offset, mut v| {
        v.push((idxs.clone(), offset));
        v
    });

    assert_eq!(forward.len(), 6);
    assert_eq!(forward[4], (Idxs::from([1, 1]), 18));

    let mut reverse = Vec::new();

    traverse::for_each_rev(&s, 10, 2, |idxs, offset| reverse.push((idxs.clone(), offset)));
    reverse.reverse();

    assert_eq!(reverse, forward);

    let offsets = traverse::fold_offsets_rev(&s, 0, 1, Vec::new(), |offset, mut v| {
        v.push(offset);
        v
    });

    assert_eq!(offsets, [5, 4, 3, 2, 1, 0]);

    let sum = traverse::fold_idxs(&s, 0, |idxs, acc| acc + idxs[0] * 10 + idxs[1]);

    assert_eq!(sum, 3 + 33);

    let mut count = 0;

    traverse::for_each(&Shape::scalar(), 7, 1, |idxs, offset| {
        assert_eq!(idxs.rank(), 0);
        assert_eq!(offset, 7);
        count += 1;
    });

    assert_eq!(count, 1);
}

#[test]
fn test_traverse_part() {
    let s = shape(&[2, 3]);
    let (min, max) = (Idxs::from([1, 0]), Idxs::from([0, 2]));

    // Descending along the first axis and ascending along the second.
    let part = traverse::fold_part(&s, &min, &max, 0, 1, Vec::new(), |idxs, offset, mut v| {
        v.push((idxs.as_slice().to_vec(), offset));
        v
    });

    assert_eq!(
        part,
        [
            (vec![1, 0], 3),
            (vec![1, 1], 4),
            (vec![1, 2], 5),
            (vec![0, 0], 0),
            (vec![0, 1], 1),
            (vec![0, 2], 2)
        ]
    );

    let mut rev = traverse::fold_part_rev(&s, &min, &max, 0, 1, Vec::new(), |idxs, offset, mut v| {
        v.push((idxs.as_slice().to_vec(), offset));
        v
    });

    rev.reverse();

    assert_eq!(rev, part);

    let mut single = Vec::new();

    traverse::for_each_part(&s, &Idxs::from([1, 1]), &Idxs::from([1, 1]), 0, -1, |_, offset| {
        single.push(offset)
    });

    assert_eq!(single, [-4]);
}

#[test]
fn test_try_fold() {
    let s = shape(&[3, 3]);

    let result = traverse::try_fold(&s, 0, 1, 0, |idxs, offset, acc| {
        if offset == 4 {
            Err(idxs.clone())
        } else {
            Ok(acc + 1)
        }
    });

    assert_eq!(result, Err(Idxs::from([1, 1])));
    assert_eq!(traverse::try_fold::<_, (), _>(&s, 0, 1, 0, |_, _, acc| Ok(acc + 1)), Ok(9));
}

#[cfg(feature = "rayon")]
#[test]
fn test_par_fold() {
    let s = shape(&[7, 5, 3]);
    let seq = traverse::fold(&s, 0, 1, 0, |_, offset, acc| acc + offset);
    let par = traverse::par_fold(&s, 0, 1, || 0, |_, offset, acc| acc + offset, |a, b| a + b);

    assert_eq!(par, seq);
}

#[test]
fn test_buffer() {
    assert_eq!(BufferKind::select::<i32>(&shape(&[2, 3])), BufferKind::Static);
    assert_eq!(BufferKind::select::<f64>(&shape(&[4, 4])), BufferKind::Static);
    assert_eq!(BufferKind::select::<f64>(&shape(&[5, 5])), BufferKind::Dyn);
    assert_eq!(BufferKind::select::<[f64; 64]>(&shape(&[2])), BufferKind::Dyn);
    assert_eq!(BufferKind::select::<i32>(&Shape::bounded(&[(1, 2)]).unwrap()), BufferKind::Dyn);

    let mut a = Frame::from_elem(shape(&[2, 3]), 1);

    assert_eq!(a.buffer().kind(), BufferKind::Fill);
    assert_eq!(a.buffer().as_slice(), None);
    assert_eq!(a.buffer().len(), 6);

    a.set(&Idxs::from([1, 2]), 5).unwrap();

    assert_eq!(a.buffer().kind(), BufferKind::Static);
    assert_eq!(a.buffer().as_slice(), Some(&[1, 1, 1, 1, 1, 5][..]));
}

#[test]
fn test_frame() {
    let s = shape(&[2, 3]);
    let mut a = Frame::from_fn(s.clone(), |idxs| 10 * idxs[0] + idxs[1]);

    assert_eq!(a.to_vec(), [0, 1, 2, 10, 11, 12]);
    assert_eq!(a.rank(), 2);
    assert_eq!(a.len(), 6);
    assert_eq!(a.shape(), &s);
    assert_eq!(a.indices().nth(4), Some(Idxs::from([1, 1])));

    assert_eq!(a.get(&Idxs::from([1, 2])), Ok(&12));
    assert_eq!(a.get(&Idxs::from([2, 0])), Err(BoundsError::Axis { axis: 0, index: 2, size: 2 }));
    assert_eq!(a.get_unchecked(&Idxs::from([0, 1])), &1);

    a[&Idxs::from([0, 0])] = 7;

    assert_eq!(a[&Idxs::from([0, 0])], 7);
    assert_eq!(a.sum(), 7 + 1 + 2 + 10 + 11 + 12);
    assert_eq!(*a.max_element(), 12);

    let count = a.fold(0, |acc, idxs, &x| acc + usize::from(x > 5 && idxs[1] > 0));

    assert_eq!(count, 2);

    assert_eq!(
        Frame::from_vec(s.clone(), vec![1, 2, 3]),
        Err(ShapeError::LenMismatch { expected: 6, found: 3 })
    );

    assert_eq!(Frame::scalar(3).rank(), 0);
    assert_eq!(Frame::scalar(3).to_vec(), [3]);

    assert_eq!(Frame::from_elem(s.clone(), 1), Frame::from_vec(s, vec![1; 6]).unwrap());

    let b = a.clone().reshape(shape(&[3, 2])).unwrap();

    assert_eq!(b.to_vec(), a.to_vec());
    assert_eq!(
        a.reshape(shape(&[4])).map(|_| ()),
        Err(ShapeError::LenMismatch { expected: 4, found: 6 })
    );
}

#[test]
#[should_panic(expected = "index out of bounds: the len is 3 but the index is 3")]
fn test_frame_index_panic() {
    let a = frame![[1, 2, 3], [4, 5, 6]];

    _ = a[&Idxs::from([0, 3])];
}

#[test]
fn test_frame_part() {
    let a = frame![[1, 2, 3], [4, 5, 6]];
    let b = a.sub_frame(&Idxs::from([1, 2]), &Idxs::from([0, 1])).unwrap();

    assert_eq!(b, frame![[6, 5], [3, 2]]);
    assert_eq!(
        a.sub_frame(&Idxs::from([0, 0]), &Idxs::from([0, 3])).map(|_| ()),
        Err(BoundsError::Axis { axis: 1, index: 3, size: 3 })
    );

    let mut c = Frame::from_elem(shape(&[3, 3]), 0);
    let mut n = 0;

    c.update_part(&Idxs::from([0, 0]), &Idxs::from([1, 1]), |_, x| {
        n += 1;
        *x = n;
    })
    .unwrap();

    assert_eq!(c.into_vec(), [1, 2, 0, 3, 4, 0, 0, 0, 0]);
}

#[test]
fn test_frame_ops() {
    let a = frame![[1, 2], [3, 4]];
    let b = frame![[5, 6], [7, 8]];

    assert_eq!(&a + &b, frame![[6, 8], [10, 12]]);
    assert_eq!(&b - &a, frame![[4, 4], [4, 4]]);
    assert_eq!(&a * &b, frame![[5, 12], [21, 32]]);
    assert_eq!(-&a, frame![[-1, -2], [-3, -4]]);
    assert_eq!(&a * 2, frame![[2, 4], [6, 8]]);
    assert_eq!(&a + 1, frame![[2, 3], [4, 5]]);

    let c = frame![1, 2, 3, 4];

    assert_eq!(
        a.zip_with(&c, |x, y| x + y).map(|_| ()),
        Err(ShapeError::Mismatch { expected: vec![2, 2], found: vec![4] })
    );

    assert_eq!(a.map(|&x| x as f64 / 2.0).to_vec(), [0.5, 1.0, 1.5, 2.0]);
}

#[test]
#[should_panic(expected = "shape mismatch")]
fn test_frame_ops_panic() {
    _ = &frame![[1, 2], [3, 4]] + &frame![1, 2, 3, 4];
}

#[test]
fn test_hash() {
    let a = Shape::with_bounds(&[1, 1, 1], &[3, 2, 1]).unwrap();

    assert_eq!(hash(&a), hash(&shape(&[3, 2, 1])));
    assert_eq!(hash(&Idxs::from([1, 2])), hash(&Idxs::from(vec![1, 2])));
}

#[test]
fn test_macros() {
    let a = frame![1, 2, 3];
    let b = frame![[1, 2, 3], [4, 5, 6]];
    let c = frame![[[1, 2], [3, 4]], [[5, 6], [7, 8]]];

    assert_eq!(a.shape(), &shape(&[3]));
    assert_eq!(b.shape(), &shape(&[2, 3]));
    assert_eq!(c.shape(), &shape(&[2, 2, 2]));
    assert_eq!(c.to_vec(), [1, 2, 3, 4, 5, 6, 7, 8]);

    assert_eq!(frame![0; 4], Frame::from_array1([0, 0, 0, 0]));
    assert_eq!(frame![[0; 3]; 2], Frame::from_elem(shape(&[2, 3]), 0));
    assert_eq!(frame![[[0; 1]; 2]; 3], Frame::from_elem(shape(&[3, 2, 1]), 0));

    let d: Frame<i32> = Frame::from([[1, 2], [3, 4]]);

    assert_eq!(d, frame![[1, 2], [3, 4]]);
    assert_eq!(format!("{d:?}"), "Frame { shape: [2, 2], data: [1, 2, 3, 4] }");
}

#[test]
#[should_panic(expected = "invalid shape")]
fn test_macros_empty() {
    let _: Frame<i32> = frame![];
}

#[test]
fn test_det() {
    assert_eq!(linalg::det(&frame![[1, 2], [3, 4]]), Ok(-2));
    assert_eq!(linalg::det(&frame![[2, 0, 1], [1, 3, 2], [1, 1, 2]]), Ok(6));
    assert_eq!(linalg::det(&frame![[5]]), Ok(5));

    let mut d = linalg::identity::<f64>(4);

    for i in 0..4 {
        d[&Idxs::from([i, i])] = (i + 2) as f64;
    }

    assert_abs_diff_eq!(linalg::det(&d).unwrap(), 120.0, epsilon = 1e-12);

    let p = frame![[0, 1, 0, 0], [1, 0, 0, 0], [0, 0, 0, 1], [0, 0, 1, 0]];

    assert_eq!(linalg::det(&p), Ok(1));

    let e = frame![
        [1, 2, 0, 0, 1],
        [0, 1, 0, 0, 0],
        [0, 0, 2, 0, 0],
        [0, 0, 0, 3, 0],
        [1, 0, 0, 0, 2],
    ];

    assert_eq!(linalg::det(&e), Ok(6));

    assert_eq!(
        linalg::det(&frame![[1, 2, 3], [4, 5, 6]]),
        Err(Error::NotSquare { shape: "[2, 3]".to_string() })
    );
    assert_eq!(
        linalg::det(&frame![1, 2]),
        Err(Error::Shape(ShapeError::RankMismatch { expected: 2, found: 1 }))
    );
}

#[test]
fn test_inverse() {
    let a = frame![[4.0, 7.0], [2.0, 6.0]];
    let inv = linalg::inverse(&a).unwrap().to_vec();

    for (x, y) in inv.iter().zip([0.6, -0.7, -0.2, 0.4]) {
        assert_abs_diff_eq!(*x, y, epsilon = 1e-12);
    }

    let b = frame![[2.0, 0.0, 1.0], [1.0, 3.0, 2.0], [1.0, 1.0, 2.0]];
    let c = frame![
        [4.0, 1.0, 0.0, 0.0],
        [1.0, 4.0, 1.0, 0.0],
        [0.0, 1.0, 4.0, 1.0],
        [0.0, 0.0, 1.0, 4.0],
    ];

    for m in [b, c] {
        let n = m.shape().dim(0);
        let p = linalg::matmul(&m, &linalg::inverse(&m).unwrap()).unwrap();
        let id = linalg::identity::<f64>(n);

        for (x, y) in p.to_vec().iter().zip(id.to_vec()) {
            assert_abs_diff_eq!(*x, y, epsilon = 1e-12);
        }
    }

    assert_eq!(linalg::inverse(&frame![[1.0, 2.0], [2.0, 4.0]]), Err(Error::Singular));
    assert_eq!(linalg::inverse(&Frame::from_elem(shape(&[3, 3]), 0.0)), Err(Error::Singular));

    let mut d = linalg::identity::<f64>(5);

    d[&Idxs::from([2, 2])] = 0.0;

    assert_eq!(linalg::inverse(&d), Err(Error::Singular));
}

#[test]
fn test_matmul() {
    let a = frame![[1, 2], [3, 4]];
    let b = frame![[5, 6], [7, 8]];

    assert_eq!(linalg::matmul(&a, &b), Ok(frame![[19, 22], [43, 50]]));

    let c = frame![[1, 2, 3], [4, 5, 6]];

    assert_eq!(linalg::transpose(&c), Ok(frame![[1, 4], [2, 5], [3, 6]]));
    assert_eq!(linalg::matmul(&c, &linalg::transpose(&c).unwrap()), Ok(frame![[14, 32], [32, 77]]));
    assert_eq!(
        linalg::matmul(&c, &c).map(|_| ()),
        Err(Error::Shape(ShapeError::Mismatch { expected: vec![3, 3], found: vec![2, 3] }))
    );

    assert_eq!(linalg::identity::<i32>(2), frame![[1, 0], [0, 1]]);
}

#[test]
fn test_svd2() {
    // Reflection, so V cannot be a proper rotation when the singular values are non-negative.
    let m = [[0.0, 1.0], [2.0, 0.0]];
    let svd = svd2(m);

    check_svd(m, &svd);

    assert_abs_diff_eq!(svd.s[0], 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(svd.s[1], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(det2(&svd.u), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(det2(&svd.v), -1.0, epsilon = 1e-12);

    let (sin, cos) = FRAC_PI_6.sin_cos();
    let m = [[3.0 * cos, -sin], [3.0 * sin, cos]];
    let svd = svd2(m);

    check_svd(m, &svd);

    assert_abs_diff_eq!(svd.s[0], 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(svd.s[1], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(det2(&svd.u), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(det2(&svd.v), 1.0, epsilon = 1e-12);

    for m in [[[1.0, 0.0], [0.0, 1.0]], [[1.0, 2.0], [2.0, 4.0]], [[0.0, 0.0], [0.0, 3.0]]] {
        let svd = svd2(m);

        check_svd(m, &svd);

        assert_abs_diff_eq!(det2(&svd.u), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(det2(&svd.v), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_svd2_zero() {
    let svd = svd2([[0.0; 2]; 2]);

    assert_eq!(svd.s, [0.0, 0.0]);
    assert_eq!(det2(&svd.u), 1.0);
    assert_eq!(det2(&svd.v), 1.0);
    assert_eq!(svd.reconstruct(), [[0.0; 2]; 2]);
}

#[test]
fn test_svd3() {
    let cases = [
        ([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]], [1.0, 1.0, 1.0]),
        ([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [3.0, 6.0, 9.0]], [14.0, 0.0, 0.0]),
        (
            [[2.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 2.0]],
            [2.0 + SQRT_2, 2.0, 2.0 - SQRT_2],
        ),
        ([[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 2.0]], [2.0, 1.0, 0.0]),
    ];

    for (m, s) in cases {
        let svd = svd3(m);

        check_svd(m, &svd);

        for k in 0..3 {
            assert_abs_diff_eq!(svd.s[k], s[k], epsilon = 1e-6);
        }

        assert_abs_diff_eq!(det3(&svd.u), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(det3(&svd.v), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn test_svd3_reflection() {
    let m = [[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, -3.0]];
    let svd = svd3(m);

    check_svd(m, &svd);

    assert_abs_diff_eq!(svd.s[0], 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(svd.s[1], 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(svd.s[2], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(det3(&svd.u), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(det3(&svd.v), -1.0, epsilon = 1e-12);
}

#[test]
fn test_svd3_zero() {
    let svd = svd3([[0.0; 3]; 3]);

    assert_eq!(svd.s, [0.0; 3]);
    assert_eq!(det3(&svd.u), 1.0);
    assert_eq!(det3(&svd.v), 1.0);
    assert_eq!(svd.reconstruct(), [[0.0; 3]; 3]);
}

#[test]
fn test_svd_f32() {
    // A small negative singular value keeps its sign through a reflection in V.
    let m = [[1.0f32, 0.0], [0.0, -1e-4]];
    let svd = widen(&svd2(m));

    check_svd(m.map(|row| row.map(f64::from)), &svd);

    assert_abs_diff_eq!(svd.s[1], 1e-4, epsilon = 1e-9);
    assert_abs_diff_eq!(det2(&svd.u), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(det2(&svd.v), -1.0, epsilon = 1e-6);

    let m = [[1.0f32, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1e-4]];
    let svd = widen(&svd3(m));

    check_svd(m.map(|row| row.map(f64::from)), &svd);

    assert_abs_diff_eq!(svd.s[2], 1e-4, epsilon = 1e-9);
    assert_abs_diff_eq!(det3(&svd.u), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(det3(&svd.v), -1.0, epsilon = 1e-6);

    let m = [[0.0f32, 1.0], [2.0, 0.0]];
    let svd = widen(&svd2(m));

    check_svd(m.map(|row| row.map(f64::from)), &svd);

    assert_abs_diff_eq!(svd.s[0], 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(svd.s[1], 1.0, epsilon = 1e-6);
}

#[test]
fn test_svd_scaling() {
    // Squared elements overflow or underflow for these magnitudes.
    for scale in [1e-170, 1e160] {
        let m = [[0.0, scale], [2.0 * scale, 0.0]];
        let svd = svd2(m);

        check_svd(m, &svd);

        assert_abs_diff_eq!(svd.s[0] / scale, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(svd.s[1] / scale, 1.0, epsilon = 1e-12);

        let m = [[scale, 0.0, 0.0], [0.0, 2.0 * scale, 0.0], [0.0, 0.0, 3.0 * scale]];
        let svd = svd3(m);

        check_svd(m, &svd);

        for (k, s) in [3.0, 2.0, 1.0].into_iter().enumerate() {
            assert_abs_diff_eq!(svd.s[k] / scale, s, epsilon = 1e-12);
        }

        assert_abs_diff_eq!(det3(&svd.u), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(det3(&svd.v), 1.0, epsilon = 1e-12);
    }

    let m = [[0.0f32, 1e20], [2e20, 0.0]];
    let svd = widen(&svd2(m));

    check_svd(m.map(|row| row.map(f64::from)), &svd);

    assert_abs_diff_eq!(svd.s[0] / 1e20, 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(svd.s[1] / 1e20, 1.0, epsilon = 1e-6);
}

#[test]
fn test_svd_frame() {
    let a = frame![[0.0, 1.0], [2.0, 0.0]];
    let FrameSvd { u, s, v } = linalg::svd(&a).unwrap();

    assert_eq!(u.shape(), &shape(&[2, 2]));
    assert_eq!(s.shape(), &shape(&[2]));
    assert_eq!(v.shape(), &shape(&[2, 2]));

    let us = Frame::from_fn(shape(&[2, 2]), |idxs| u[idxs] * s[&Idxs::from([idxs[1]])]);
    let r = linalg::matmul(&us, &linalg::transpose(&v).unwrap()).unwrap();

    for (x, y) in r.to_vec().iter().zip(a.to_vec()) {
        assert_abs_diff_eq!(*x, y, epsilon = 1e-12);
    }

    assert_eq!(
        linalg::svd(&linalg::identity::<f64>(4)).map(|_| ()),
        Err(Error::Unsupported { op: "svd", shape: "[4, 4]".to_string() })
    );
}

#[cfg(feature = "serde")]
#[test]
fn test_serde() {
    assert_tokens(
        &Shape::with_bounds(&[2, 1], &[3, 1]).unwrap(),
        &[
            Token::Seq { len: Some(2) },
            Token::StructVariant { name: "Dim", variant: "Bounded", len: 2 },
            Token::Str("min"),
            Token::U64(2),
            Token::Str("size"),
            Token::U64(3),
            Token::StructVariantEnd,
            Token::StructVariant { name: "Dim", variant: "Bounded", len: 2 },
            Token::Str("min"),
            Token::U64(1),
            Token::Str("size"),
            Token::U64(1),
            Token::StructVariantEnd,
            Token::SeqEnd,
        ],
    );

    assert_tokens(
        &Idxs::from([1, 2]),
        &[Token::Seq { len: Some(2) }, Token::U64(1), Token::U64(2), Token::SeqEnd],
    );

    assert_tokens(
        &frame![[4, 5, 6], [7, 8, 9]],
        &[
            Token::Struct { name: "Frame", len: 2 },
            Token::Str("shape"),
            Token::Seq { len: Some(2) },
            Token::NewtypeVariant { name: "Dim", variant: "Fixed" },
            Token::U64(2),
            Token::NewtypeVariant { name: "Dim", variant: "Fixed" },
            Token::U64(3),
            Token::SeqEnd,
            Token::Str("data"),
            Token::Seq { len: Some(6) },
            Token::I32(4),
            Token::I32(5),
            Token::I32(6),
            Token::I32(7),
            Token::I32(8),
            Token::I32(9),
            Token::SeqEnd,
            Token::StructEnd,
        ],
    );

    assert_de_tokens_error::<Shape>(
        &[
            Token::Seq { len: Some(1) },
            Token::NewtypeVariant { name: "Dim", variant: "Fixed" },
            Token::U64(0),
            Token::SeqEnd,
        ],
        "axis 0 has zero extent",
    );

    assert_de_tokens_error::<Frame<i32>>(
        &[
            Token::Struct { name: "Frame", len: 2 },
            Token::Str("shape"),
            Token::Seq { len: Some(1) },
            Token::NewtypeVariant { name: "Dim", variant: "Fixed" },
            Token::U64(2),
            Token::SeqEnd,
            Token::Str("data"),
            Token::Seq { len: Some(1) },
            Token::I32(4),
            Token::SeqEnd,
            Token::StructEnd,
        ],
        "length mismatch: shape holds 2 elements, found 1",
    );
}
