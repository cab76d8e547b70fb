//! Fixed-rank shapes, indices and stride computation.
//!
//! A [`Shape<N>`] holds the extent of each of the `N` axes. The same type,
//! under the [`Index<N>`] alias, denotes a position inside such a shape.
//!
//! Two storage orders are supported:
//!
//! ```text
//! RowMajor     stride[N-1] = 1, stride[k] = stride[k+1] * shape[k+1]
//! ColumnMajor  stride[0]   = 1, stride[k] = stride[k-1] * shape[k-1]
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::error::TensorError;

/// Memory and traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Layout {
    /// Last axis varies fastest (C order).
    #[default]
    RowMajor,
    /// First axis varies fastest (Fortran order).
    ColumnMajor,
}

/// Extents of a rank-`N` tensor.
#[derive(Clone, Copy, Hash)]
pub struct Shape<const N: usize>([usize; N]);

/// A position inside a [`Shape`]; same representation, different meaning.
pub type Index<const N: usize> = Shape<N>;

impl<const N: usize> Shape<N> {
    /// Create a shape from per-axis extents.
    #[inline]
    pub const fn new(dims: [usize; N]) -> Self {
        Self(dims)
    }

    /// All-zero shape (also the origin index).
    #[inline]
    pub const fn zeros() -> Self {
        Self([0; N])
    }

    /// All-one shape; broadcasts against any shape of rank `N`.
    #[inline]
    pub const fn ones() -> Self {
        Self([1; N])
    }

    /// Number of axes.
    #[inline]
    pub const fn rank(&self) -> usize {
        N
    }

    /// Per-axis extents.
    #[inline]
    pub fn dims(&self) -> &[usize; N] {
        &self.0
    }

    /// Consume into the underlying array.
    #[inline]
    pub fn into_array(self) -> [usize; N] {
        self.0
    }

    /// Total number of elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.0.iter().product()
    }

    /// Alias of [`Shape::size`].
    #[inline]
    pub fn prod(&self) -> usize {
        self.size()
    }

    /// True if any axis has extent zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Strides (in elements) for the given storage order.
    pub fn strides(&self, layout: Layout) -> [usize; N] {
        compute_strides(self, layout)
    }

    /// Copy of this shape with one axis replaced.
    #[inline]
    pub fn with_axis(mut self, axis: usize, extent: usize) -> Self {
        self.0[axis] = extent;
        self
    }

    /// True if `index` addresses an element inside this shape.
    #[inline]
    pub fn contains(&self, index: &Index<N>) -> bool {
        index.0.iter().zip(self.0.iter()).all(|(&i, &d)| i < d)
    }

    /// Check that `index` is inside this shape.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfBounds` naming the first offending axis.
    pub fn check_index(&self, index: &Index<N>) -> Result<(), TensorError> {
        for (axis, (&idx, &dim)) in index.0.iter().zip(self.0.iter()).enumerate() {
            if idx >= dim {
                return Err(TensorError::IndexOutOfBounds {
                    axis,
                    index: idx,
                    dim_size: dim,
                });
            }
        }
        Ok(())
    }

    /// Concatenate two shapes; `R` must equal `N + M` (checked at compile time).
    ///
    /// ```
    /// use ndexpr::shape::Shape;
    ///
    /// let s: Shape<3> = Shape::new([2, 3]).cat(&Shape::new([4]));
    /// assert_eq!(s.dims(), &[2, 3, 4]);
    /// ```
    pub fn cat<const M: usize, const R: usize>(&self, other: &Shape<M>) -> Shape<R> {
        const { assert!(R == N + M, "concatenated rank must equal the sum of ranks") };
        let mut out = [0usize; R];
        out[..N].copy_from_slice(&self.0);
        out[N..].copy_from_slice(&other.0);
        Shape(out)
    }
}

impl<const N: usize> Default for Shape<N> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const N: usize> Deref for Shape<N> {
    type Target = [usize; N];

    #[inline]
    fn deref(&self) -> &[usize; N] {
        &self.0
    }
}

impl<const N: usize> DerefMut for Shape<N> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [usize; N] {
        &mut self.0
    }
}

impl<const N: usize> From<[usize; N]> for Shape<N> {
    #[inline]
    fn from(dims: [usize; N]) -> Self {
        Self(dims)
    }
}

impl<const N: usize> From<Shape<N>> for [usize; N] {
    #[inline]
    fn from(shape: Shape<N>) -> Self {
        shape.0
    }
}

impl<const N: usize, const M: usize> PartialEq<Shape<M>> for Shape<N> {
    fn eq(&self, other: &Shape<M>) -> bool {
        N == M && self.0[..] == other.0[..]
    }
}

impl<const N: usize> Eq for Shape<N> {}

impl<const N: usize> PartialEq<[usize; N]> for Shape<N> {
    fn eq(&self, other: &[usize; N]) -> bool {
        &self.0 == other
    }
}

impl<const N: usize> fmt::Debug for Shape<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// Build a shape, deducing the rank from the number of extents.
#[inline]
pub const fn make_shape<const N: usize>(dims: [usize; N]) -> Shape<N> {
    Shape::new(dims)
}

/// Build an index, deducing the rank from the number of coordinates.
#[inline]
pub const fn make_index<const N: usize>(coords: [usize; N]) -> Index<N> {
    Shape::new(coords)
}

/// `shape![2, 3]` is `Shape::new([2, 3])`.
#[macro_export]
macro_rules! shape {
    ($($d:expr),* $(,)?) => {
        $crate::shape::Shape::new([$($d),*])
    };
}

/// `index![1, 0]` is `Index::new([1, 0])`.
#[macro_export]
macro_rules! index {
    ($($i:expr),* $(,)?) => {
        $crate::shape::Shape::new([$($i),*])
    };
}

/// Compute strides for `shape` in the given order.
///
/// # Examples
///
/// ```
/// use ndexpr::shape::{compute_strides, Layout, Shape};
///
/// assert_eq!(compute_strides(&Shape::new([3, 4, 5]), Layout::RowMajor), [20, 5, 1]);
/// assert_eq!(compute_strides(&Shape::new([3, 4, 5]), Layout::ColumnMajor), [1, 3, 12]);
/// ```
pub fn compute_strides<const N: usize>(shape: &Shape<N>, layout: Layout) -> [usize; N] {
    let mut strides = [0usize; N];
    let mut stride = 1;
    match layout {
        Layout::RowMajor => {
            for k in (0..N).rev() {
                strides[k] = stride;
                stride *= shape[k];
            }
        }
        Layout::ColumnMajor => {
            for k in 0..N {
                strides[k] = stride;
                stride *= shape[k];
            }
        }
    }
    strides
}

/// Convert a multi-index into a flat offset for the given order.
///
/// The index is assumed to lie inside `shape`.
#[inline]
pub fn ravel_index<const N: usize>(index: &Index<N>, shape: &Shape<N>, order: Layout) -> usize {
    match order {
        Layout::RowMajor => (0..N).fold(0, |acc, k| acc * shape[k] + index[k]),
        Layout::ColumnMajor => (0..N).rev().fold(0, |acc, k| acc * shape[k] + index[k]),
    }
}

/// Convert a flat offset back into a multi-index for the given order.
///
/// Inverse of [`ravel_index`] for offsets below `shape.size()`.
#[inline]
pub fn unravel_index<const N: usize>(mut flat: usize, shape: &Shape<N>, order: Layout) -> Index<N> {
    let mut index = [0usize; N];
    let mut step = |k: usize| {
        let dim = shape[k];
        if dim != 0 {
            index[k] = flat % dim;
            flat /= dim;
        }
    };
    match order {
        Layout::RowMajor => (0..N).rev().for_each(&mut step),
        Layout::ColumnMajor => (0..N).for_each(&mut step),
    }
    Shape(index)
}

/// Resolve the broadcast shape of two operands.
///
/// # Errors
///
/// Returns `TensorError::ShapeMismatch` if some axis has two different
/// extents, neither of which is 1.
///
/// # Examples
///
/// ```
/// use ndexpr::shape::{broadcast_shapes, Shape};
///
/// let s = broadcast_shapes(&Shape::new([2, 1, 4]), &Shape::new([1, 3, 4])).unwrap();
/// assert_eq!(s, Shape::new([2, 3, 4]));
/// assert!(broadcast_shapes(&Shape::new([2]), &Shape::new([3])).is_err());
/// ```
pub fn broadcast_shapes<const N: usize>(
    lhs: &Shape<N>,
    rhs: &Shape<N>,
) -> Result<Shape<N>, TensorError> {
    let mut out = [0usize; N];
    for k in 0..N {
        out[k] = match (lhs[k], rhs[k]) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            _ => return Err(TensorError::shapes(lhs.dims(), rhs.dims())),
        };
    }
    Ok(Shape(out))
}

/// Broadcast any number of shapes pairwise.
///
/// # Errors
///
/// `InvalidArgument` for an empty list, `ShapeMismatch` on incompatibility.
pub fn broadcast_all<const N: usize>(shapes: &[Shape<N>]) -> Result<Shape<N>, TensorError> {
    let (first, rest) = shapes
        .split_first()
        .ok_or_else(|| TensorError::invalid("cannot broadcast an empty list of shapes"))?;
    rest.iter()
        .try_fold(*first, |acc, s| broadcast_shapes(&acc, s))
}

/// Check that an operand of shape `from` can be broadcast to exactly `to`.
///
/// # Errors
///
/// Returns `TensorError::ShapeMismatch` otherwise.
pub fn check_broadcast_to<const N: usize>(
    from: &Shape<N>,
    to: &Shape<N>,
) -> Result<(), TensorError> {
    for k in 0..N {
        if from[k] != to[k] && from[k] != 1 {
            return Err(TensorError::shapes(from.dims(), to.dims()));
        }
    }
    Ok(())
}

/// Map an output index into an operand's coordinate space by zeroing every
/// axis on which the operand has extent 1.
#[inline]
pub fn broadcast_index<const N: usize>(index: &Index<N>, operand: &Shape<N>) -> Index<N> {
    let mut out = *index;
    for k in 0..N {
        if operand[k] == 1 {
            out[k] = 0;
        }
    }
    out
}

/// Check that `axis < N`.
///
/// # Errors
///
/// Returns `TensorError::AxisOutOfBounds` otherwise.
#[inline]
pub fn check_axis<const N: usize>(axis: usize) -> Result<(), TensorError> {
    if axis < N {
        Ok(())
    } else {
        Err(TensorError::AxisOutOfBounds { axis, ndim: N })
    }
}

/// Validate that `perm` is a permutation of `0..N`.
pub fn validate_permutation<const N: usize>(perm: &[usize; N]) -> Result<(), TensorError> {
    let mut seen = [false; N];
    for &p in perm {
        if p >= N || seen[p] {
            return Err(TensorError::InvalidPermutation {
                perm: perm.to_vec(),
                ndim: N,
            });
        }
        seen[p] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_compute_strides_row_major() {
        assert_eq!(
            compute_strides(&Shape::new([3, 4, 5]), Layout::RowMajor),
            [20, 5, 1]
        );
        assert_eq!(compute_strides(&Shape::new([5]), Layout::RowMajor), [1]);
    }

    #[test]
    fn test_compute_strides_column_major() {
        assert_eq!(
            compute_strides(&Shape::new([3, 4, 5]), Layout::ColumnMajor),
            [1, 3, 12]
        );
        assert_eq!(compute_strides(&Shape::new([2, 3]), Layout::ColumnMajor), [1, 2]);
    }

    #[test]
    fn test_ravel_matches_strides() {
        let shape = Shape::new([3, 4, 5]);
        for layout in [Layout::RowMajor, Layout::ColumnMajor] {
            let strides = shape.strides(layout);
            let idx = Shape::new([2, 3, 4]);
            let expected: usize = (0..3).map(|k| idx[k] * strides[k]).sum();
            assert_eq!(ravel_index(&idx, &shape, layout), expected);
        }
    }

    #[test]
    fn test_unravel_row_major() {
        let shape = Shape::new([3, 4, 5]);
        assert_eq!(unravel_index(0, &shape, Layout::RowMajor), [0, 0, 0]);
        assert_eq!(unravel_index(1, &shape, Layout::RowMajor), [0, 0, 1]);
        assert_eq!(unravel_index(5, &shape, Layout::RowMajor), [0, 1, 0]);
        assert_eq!(unravel_index(20, &shape, Layout::RowMajor), [1, 0, 0]);
    }

    #[test]
    fn test_unravel_column_major() {
        let shape = Shape::new([3, 4, 5]);
        assert_eq!(unravel_index(1, &shape, Layout::ColumnMajor), [1, 0, 0]);
        assert_eq!(unravel_index(3, &shape, Layout::ColumnMajor), [0, 1, 0]);
        assert_eq!(unravel_index(12, &shape, Layout::ColumnMajor), [0, 0, 1]);
    }

    #[test]
    fn test_size_and_empty() {
        assert_eq!(Shape::new([2, 3, 4]).size(), 24);
        assert_eq!(Shape::new([2, 0]).prod(), 0);
        assert!(Shape::new([2, 0]).is_empty());
        assert_eq!(Shape::<0>::new([]).size(), 1);
    }

    #[test]
    fn test_equality_across_ranks() {
        assert_eq!(Shape::new([2, 3]), Shape::new([2, 3]));
        assert_ne!(Shape::new([2, 3]), Shape::new([3, 2]));
        assert!(Shape::new([2, 3]) != Shape::new([2, 3, 1]));
    }

    #[test]
    fn test_make_and_macros() {
        let s = make_shape([2, 3]);
        assert_eq!(s.rank(), 2);
        assert_eq!(crate::shape![2, 3], s);
        assert_eq!(crate::index![1, 2], make_index([1, 2]));
    }

    #[test]
    fn test_cat() {
        let s: Shape<4> = Shape::new([2, 3]).cat(&Shape::new([4, 5]));
        assert_eq!(s, Shape::new([2, 3, 4, 5]));
    }

    #[test]
    fn test_check_index() {
        let s = Shape::new([2, 3]);
        assert!(s.check_index(&Shape::new([1, 2])).is_ok());
        assert_eq!(
            s.check_index(&Shape::new([1, 3])),
            Err(TensorError::IndexOutOfBounds {
                axis: 1,
                index: 3,
                dim_size: 3
            })
        );
    }

    #[test]
    fn test_broadcast_shapes() {
        let a = Shape::new([2, 1, 4]);
        let b = Shape::new([1, 3, 4]);
        assert_eq!(broadcast_shapes(&a, &b).unwrap(), Shape::new([2, 3, 4]));
        assert_eq!(
            broadcast_shapes(&Shape::new([1, 1]), &Shape::new([1, 1])).unwrap(),
            Shape::new([1, 1])
        );
        assert!(broadcast_shapes(&Shape::new([2, 3]), &Shape::new([3, 3])).is_err());
    }

    #[test]
    fn test_broadcast_all() {
        let shapes = [Shape::new([2, 1]), Shape::new([1, 3]), Shape::new([1, 1])];
        assert_eq!(broadcast_all(&shapes).unwrap(), Shape::new([2, 3]));
        assert!(broadcast_all::<2>(&[]).is_err());
    }

    #[test]
    fn test_broadcast_index() {
        let idx = Shape::new([1, 2, 3]);
        assert_eq!(broadcast_index(&idx, &Shape::new([2, 1, 4])), [1, 0, 3]);
    }

    #[test]
    fn test_validate_permutation() {
        assert!(validate_permutation(&[1, 0, 2]).is_ok());
        assert!(validate_permutation(&[0, 0, 2]).is_err());
        assert!(validate_permutation(&[0, 3, 1]).is_err());
    }

    #[test]
    fn test_check_axis() {
        assert!(check_axis::<2>(1).is_ok());
        assert_eq!(
            check_axis::<2>(2),
            Err(TensorError::AxisOutOfBounds { axis: 2, ndim: 2 })
        );
    }

    proptest! {
        #[test]
        fn prop_ravel_roundtrip(
            dims in prop::array::uniform3(1usize..7),
            seed in 0usize..10_000,
            column_major in any::<bool>(),
        ) {
            let shape = Shape::new(dims);
            let order = if column_major { Layout::ColumnMajor } else { Layout::RowMajor };
            let flat = seed % shape.size();
            let idx = unravel_index(flat, &shape, order);
            prop_assert!(shape.contains(&idx));
            prop_assert_eq!(ravel_index(&idx, &shape, order), flat);
            prop_assert_eq!(unravel_index(ravel_index(&idx, &shape, order), &shape, order), idx);
        }

        #[test]
        fn prop_broadcast_compatible_is_max(
            dims in prop::array::uniform3(1usize..6),
            ones in prop::array::uniform3(any::<bool>()),
            swap in any::<bool>(),
        ) {
            let full = Shape::new(dims);
            let mut reduced = full;
            for k in 0..3 {
                if ones[k] {
                    reduced[k] = 1;
                }
            }
            let (a, b) = if swap { (reduced, full) } else { (full, reduced) };
            let out = broadcast_shapes(&a, &b).unwrap();
            for k in 0..3 {
                prop_assert_eq!(out[k], a[k].max(b[k]));
            }
        }

        #[test]
        fn prop_broadcast_incompatible_fails(a in 2usize..8, b in 2usize..8) {
            prop_assume!(a != b);
            let err = broadcast_shapes(&Shape::new([a, 3]), &Shape::new([b, 3])).unwrap_err();
            prop_assert_eq!(err.kind(), crate::error::ErrorKind::Shape);
        }
    }
}
