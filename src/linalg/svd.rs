use std::array;
use std::cmp::Ordering;

use num_traits::Float;

/// Singular value decomposition `M = U * diag(S) * V^T` of a small square matrix.
///
/// Matrices are stored row by row, so the columns of `u` and `v` are the left and right
/// singular vectors. `U` and `V` are orthogonal with `det(U) = +1`. The singular values
/// are non-negative and sorted in descending order.
///
/// `V` is a proper rotation as well, except when `det(M) < 0`. In that case no rotation
/// gives non-negative singular values, and one column of `V` is reflected. A negative
/// singular value within `8 * N * epsilon * max|M|` of zero is treated as zero, and its
/// sign is dropped instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Svd<T, const N: usize> {
    /// Left singular vectors as columns.
    pub u: [[T; N]; N],
    /// Singular values in descending order.
    pub s: [T; N],
    /// Right singular vectors as columns.
    pub v: [[T; N]; N],
}

impl<T: Float, const N: usize> Svd<T, N> {
    /// Returns the product `U * diag(S) * V^T`.
    pub fn reconstruct(&self) -> [[T; N]; N] {
        array::from_fn(|i| {
            array::from_fn(|j| {
                (0..N).fold(T::zero(), |acc, k| acc + self.u[i][k] * self.s[k] * self.v[j][k])
            })
        })
    }

    // Decomposition of the zero matrix, with the standard basis for both sides.
    fn zero() -> Self {
        let id = array::from_fn(|i| array::from_fn(|j| if i == j { T::one() } else { T::zero() }));

        Self { u: id, s: [T::zero(); N], v: id }
    }

    // Sorts the singular values in descending order. Swapping two columns changes the
    // sign of the determinant, so one of the swapped columns is negated in both U and V.
    fn sort(&mut self) {
        for _ in 1..N {
            for i in 0..N - 1 {
                if self.s[i] < self.s[i + 1] {
                    self.s.swap(i, i + 1);

                    for row in 0..N {
                        self.u[row].swap(i, i + 1);
                        self.v[row].swap(i, i + 1);
                        self.u[row][i + 1] = -self.u[row][i + 1];
                        self.v[row][i + 1] = -self.v[row][i + 1];
                    }
                }
            }
        }
    }
}

/// Computes the singular value decomposition of a 2x2 matrix.
///
/// The matrix is scaled to unit largest element first, so that `M^T * M` neither
/// overflows nor underflows. The right singular vectors are the eigenvectors of
/// `M^T * M`, found from the rotation angle that diagonalizes it. The first left vector
/// is the image of the first right vector, and the second one completes the basis, so
/// there is no division by a small singular value. The zero matrix gives the standard
/// basis for both sides.
pub fn svd2<T: Float>(m: [[T; 2]; 2]) -> Svd<T, 2> {
    let scale = max_abs(&m);

    if scale == T::zero() {
        log::debug!("svd2: zero matrix, completing basis");

        return Svd::zero();
    }

    let mut svd = decompose2(&scaled(&m, scale), tolerance::<T, 2>());

    svd.s = svd.s.map(|s| s * scale);
    svd
}

/// Computes the singular value decomposition of a 3x3 matrix.
///
/// The matrix is scaled to unit largest element, and the eigenvalues of `M^T * M` are
/// found from the trigonometric solution of the characteristic cubic. The eigenvector of
/// the extreme eigenvalue that is furthest from the middle one is found from cross
/// products of the rows of the shifted matrix, which keeps it accurate when the other
/// two eigenvalues are close. The matrix is then split along that vector and its image,
/// and the remaining 2x2 block on the orthogonal complements is decomposed like in
/// [`svd2`]. Left vectors for zero singular values come from basis completion, which
/// handles any rank down to the zero matrix.
pub fn svd3<T: Float>(m: [[T; 3]; 3]) -> Svd<T, 3> {
    let scale = max_abs(&m);

    if scale == T::zero() {
        log::debug!("svd3: zero matrix, completing basis");

        return Svd::zero();
    }

    let m = scaled(&m, scale);
    let a = gram(&m);
    let [l1, l2, l3] = eigenvalues(&a);

    let mut svd = if l1 - l2 >= l2 - l3 {
        split_first(&m, eigenvector(&a, l1))
    } else {
        split_last(&m, eigenvector(&a, l3))
    };

    svd.s = svd.s.map(|s| s * scale);
    svd.sort();
    svd
}

// Decomposition of a 2x2 matrix with elements at most of unit size.
fn decompose2<T: Float>(m: &[[T; 2]; 2], tol: T) -> Svd<T, 2> {
    let a = gram(m);
    let (sin, cos) = half_angle(a[0][0], a[0][1], a[1][1]).sin_cos();

    let v1 = [cos, sin];
    let v2 = [-sin, cos];

    let (u1, s1) = normalize_or(mul_vec(m, &v1), tol, || {
        log::debug!("svd2: degenerate matrix, completing basis");
        [T::one(), T::zero()]
    });

    let u2 = [-u1[1], u1[0]];
    let (s2, v2) = make_positive(dot(&u2, &mul_vec(m, &v2)), v2, tol);

    let mut svd = Svd { u: from_columns([u1, u2]), s: [s1, s2], v: from_columns([v1, v2]) };

    svd.sort();
    svd
}

// Splits off the largest singular value, given its right vector. The left vector is the
// image of the right vector, and the rest is a 2x2 problem on the complements.
fn split_first<T: Float>(m: &[[T; 3]; 3], v1: [T; 3]) -> Svd<T, 3> {
    let tol = tolerance::<T, 3>();
    let w = complement(&v1);

    let (u1, s1) = normalize_or(mul_vec(m, &v1), tol, || {
        log::debug!("svd3: degenerate matrix, completing basis");
        [T::one(), T::zero(), T::zero()]
    });

    let y = complement(&u1);
    let inner = decompose2(&project(m, &y, &w), tol);

    let u = [u1, lift(&y, &inner.u, 0), lift(&y, &inner.u, 1)];
    let v = [v1, lift(&w, &inner.v, 0), lift(&w, &inner.v, 1)];

    Svd { u: from_columns(u), s: [s1, inner.s[0], inner.s[1]], v: from_columns(v) }
}

// Splits off the smallest singular value, given its right vector. The left vector is
// normal to the image of the complement, which has rank 2 since the two largest
// eigenvalues are closer to each other than to the smallest one.
fn split_last<T: Float>(m: &[[T; 3]; 3], v3: [T; 3]) -> Svd<T, 3> {
    let tol = tolerance::<T, 3>();
    let w = complement(&v3);

    let (u3, _) = normalize_or(cross(&mul_vec(m, &w[0]), &mul_vec(m, &w[1])), tol, || {
        log::debug!("svd3: degenerate matrix, completing basis");
        [T::zero(), T::zero(), T::one()]
    });

    let y = complement(&u3);
    let inner = decompose2(&project(m, &y, &w), tol);
    let (s3, v3) = make_positive(dot(&u3, &mul_vec(m, &v3)), v3, tol);

    let u = [lift(&y, &inner.u, 0), lift(&y, &inner.u, 1), u3];
    let v = [lift(&w, &inner.v, 0), lift(&w, &inner.v, 1), v3];

    Svd { u: from_columns(u), s: [inner.s[0], inner.s[1], s3], v: from_columns(v) }
}

// Makes a singular value non-negative by reflecting its right vector. Within the
// tolerance of zero the sign is dropped instead, which keeps V a rotation.
fn make_positive<T: Float, const N: usize>(s: T, v: [T; N], tol: T) -> (T, [T; N]) {
    if s >= T::zero() {
        (s, v)
    } else if -s > tol {
        (-s, v.map(|x| -x))
    } else {
        log::trace!("svd: dropping sign of degenerate singular value {:?}", s.to_f64());

        (-s, v)
    }
}

// Threshold below which a singular value of a matrix with unit largest element is
// treated as zero.
fn tolerance<T: Float, const N: usize>() -> T {
    T::epsilon() * T::from(8 * N).unwrap_or_else(T::one)
}

fn max_abs<T: Float, const N: usize>(m: &[[T; N]; N]) -> T {
    m.iter().flatten().fold(T::zero(), |max, &x| max.max(x.abs()))
}

fn scaled<T: Float, const N: usize>(m: &[[T; N]; N], scale: T) -> [[T; N]; N] {
    m.map(|row| row.map(|x| x / scale))
}

// Rotation angle that diagonalizes the symmetric matrix [[a, b], [b, c]], such that
// (cos, sin) is the eigenvector of the largest eigenvalue.
fn half_angle<T: Float>(a: T, b: T, c: T) -> T {
    let two = T::one() + T::one();

    (two * b).atan2(a - c) / two
}

// Eigenvalues of a symmetric 3x3 matrix in descending order.
fn eigenvalues<T: Float>(a: &[[T; 3]; 3]) -> [T; 3] {
    let p1 = a[0][1] * a[0][1] + a[0][2] * a[0][2] + a[1][2] * a[1][2];

    if p1 == T::zero() {
        let mut d = [a[0][0], a[1][1], a[2][2]];

        d.sort_by(|x, y| y.partial_cmp(x).unwrap_or(Ordering::Equal));

        return d;
    }

    let two = T::one() + T::one();
    let three = two + T::one();
    let six = three + three;

    let q = (a[0][0] + a[1][1] + a[2][2]) / three;
    let d = [a[0][0] - q, a[1][1] - q, a[2][2] - q];
    let p2 = d[0] * d[0] + d[1] * d[1] + d[2] * d[2] + two * p1;
    let p = (p2 / six).sqrt();

    let b: [[T; 3]; 3] =
        array::from_fn(|i| array::from_fn(|j| if i == j { d[i] / p } else { a[i][j] / p }));

    let r = (det3(&b) / two).max(-T::one()).min(T::one());
    let (sin, cos) = (r.acos() / three).sin_cos();

    // The smallest root is at phi + 2pi/3.
    let l1 = q + two * p * cos;
    let l3 = q - p * (cos + three.sqrt() * sin);

    [l1, three * q - l1 - l3, l3]
}

// Unit eigenvector of a symmetric 3x3 matrix for the given eigenvalue.
fn eigenvector<T: Float>(a: &[[T; 3]; 3], lambda: T) -> [T; 3] {
    let rows: [[T; 3]; 3] =
        array::from_fn(|i| array::from_fn(|j| if i == j { a[i][j] - lambda } else { a[i][j] }));

    let (row, len) = rows
        .iter()
        .map(|row| (row, norm(row)))
        .fold((&rows[0], T::zero()), |max, x| if x.1 > max.1 { x } else { max });

    if len == T::zero() {
        return [T::one(), T::zero(), T::zero()];
    }

    let (c, c_len) = [(0, 1), (0, 2), (1, 2)]
        .iter()
        .map(|&(i, j)| {
            let c = cross(&rows[i], &rows[j]);

            (c, norm(&c))
        })
        .fold(([T::zero(); 3], T::zero()), |max, x| if x.1 > max.1 { x } else { max });

    if c_len > T::epsilon().sqrt() * len * len {
        c.map(|x| x / c_len)
    } else {
        // The rows are parallel, and any vector orthogonal to them is an eigenvector.
        any_orthogonal(&(*row).map(|x| x / len))
    }
}

// Unit vector orthogonal to a unit vector, from the axis it is least aligned with.
fn any_orthogonal<T: Float>(v: &[T; 3]) -> [T; 3] {
    let k = (1..3).fold(0, |k, i| if v[i].abs() < v[k].abs() { i } else { k });

    let w: [T; 3] = array::from_fn(|i| if i == k { T::one() - v[k] * v[i] } else { -v[k] * v[i] });

    let len = norm(&w);

    w.map(|x| x / len)
}

// Unit vectors [a, b] orthogonal to a unit vector v, such that both (v, a, b) and
// (a, b, v) are right-handed.
fn complement<T: Float>(v: &[T; 3]) -> [[T; 3]; 2] {
    let a = any_orthogonal(v);

    [a, cross(v, &a)]
}

// The 2x2 matrix Y^T * M * W, for the columns Y and W given as pairs of vectors.
fn project<T: Float>(m: &[[T; 3]; 3], y: &[[T; 3]; 2], w: &[[T; 3]; 2]) -> [[T; 2]; 2] {
    array::from_fn(|i| array::from_fn(|j| dot(&y[i], &mul_vec(m, &w[j]))))
}

// Column k of the 2x2 matrix x, expressed in the basis given by the pair of vectors.
fn lift<T: Float>(basis: &[[T; 3]; 2], x: &[[T; 2]; 2], k: usize) -> [T; 3] {
    array::from_fn(|i| basis[0][i] * x[0][k] + basis[1][i] * x[1][k])
}

fn normalize_or<T, const N: usize, F>(x: [T; N], tol: T, f: F) -> ([T; N], T)
where
    T: Float,
    F: FnOnce() -> [T; N],
{
    let len = norm(&x);

    if len > tol {
        (x.map(|x| x / len), len)
    } else {
        (f(), len)
    }
}

fn cross<T: Float>(a: &[T; 3], b: &[T; 3]) -> [T; 3] {
    [a[1] * b[2] - a[2] * b[1], a[2] * b[0] - a[0] * b[2], a[0] * b[1] - a[1] * b[0]]
}

fn det3<T: Float>(a: &[[T; 3]; 3]) -> T {
    a[0][0] * (a[1][1] * a[2][2] - a[1][2] * a[2][1])
        - a[0][1] * (a[1][0] * a[2][2] - a[1][2] * a[2][0])
        + a[0][2] * (a[1][0] * a[2][1] - a[1][1] * a[2][0])
}

fn dot<T: Float, const N: usize>(a: &[T; N], b: &[T; N]) -> T {
    a.iter().zip(b).fold(T::zero(), |acc, (&x, &y)| acc + x * y)
}

fn norm<T: Float, const N: usize>(a: &[T; N]) -> T {
    dot(a, a).sqrt()
}

// Product M^T * M.
fn gram<T: Float, const N: usize>(m: &[[T; N]; N]) -> [[T; N]; N] {
    array::from_fn(|i| array::from_fn(|j| (0..N).fold(T::zero(), |acc, k| acc + m[k][i] * m[k][j])))
}

fn mul_vec<T: Float, const N: usize>(m: &[[T; N]; N], v: &[T; N]) -> [T; N] {
    array::from_fn(|i| dot(&m[i], v))
}

fn from_columns<T: Float, const N: usize>(cols: [[T; N]; N]) -> [[T; N]; N] {
    array::from_fn(|i| array::from_fn(|j| cols[j][i]))
}
