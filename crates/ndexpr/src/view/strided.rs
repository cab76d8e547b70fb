//! Strided views.
//!
//! Element `index` lives at `offset + Σ index[k] * strides[k]` in the
//! underlying slice. Strides are signed so that [`View::flip`] can walk an
//! axis backwards, and may be zero for broadcast axes.

use std::fmt;
use std::ops::{self, Range};

use crate::error::TensorError;
use crate::expr::{Expr, ExprMut, IntoOperand, OperandElem};
use crate::shape::{
    check_axis, check_broadcast_to, compute_strides, validate_permutation, Index, Layout, Shape,
};

/// Shape, strides and offset shared by [`View`] and [`ViewMut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Strided<const N: usize> {
    shape: Shape<N>,
    strides: [isize; N],
    offset: usize,
}

impl<const N: usize> Strided<N> {
    fn contiguous(shape: Shape<N>, layout: Layout) -> Self {
        Self {
            shape,
            strides: compute_strides(&shape, layout).map(|s| s as isize),
            offset: 0,
        }
    }

    fn checked(
        data_len: usize,
        shape: Shape<N>,
        strides: [isize; N],
        offset: usize,
    ) -> Result<Self, TensorError> {
        if !shape.is_empty() {
            let mut min_offset = offset as isize;
            let mut max_offset = offset as isize;
            for k in 0..N {
                let last = (shape[k] - 1) as isize;
                if strides[k] >= 0 {
                    max_offset += strides[k] * last;
                } else {
                    min_offset += strides[k] * last;
                }
            }
            if min_offset < 0 || max_offset as usize >= data_len {
                return Err(TensorError::invalid(format!(
                    "view of shape {shape:?} with strides {strides:?} at offset {offset} \
                     exceeds a buffer of {data_len} elements"
                )));
            }
        }
        Ok(Self {
            shape,
            strides,
            offset,
        })
    }

    #[inline]
    fn address(&self, index: &Index<N>) -> usize {
        let mut addr = self.offset as isize;
        for k in 0..N {
            addr += index[k] as isize * self.strides[k];
        }
        addr as usize
    }

    fn transpose(mut self) -> Self {
        self.shape.reverse();
        self.strides.reverse();
        self
    }

    fn permute(self, perm: [usize; N]) -> Result<Self, TensorError> {
        validate_permutation(&perm)?;
        Ok(Self {
            shape: Shape::new(perm.map(|p| self.shape[p])),
            strides: perm.map(|p| self.strides[p]),
            offset: self.offset,
        })
    }

    fn slice_axis(
        mut self,
        axis: usize,
        range: Range<usize>,
        step: usize,
    ) -> Result<Self, TensorError> {
        check_axis::<N>(axis)?;
        if step == 0 {
            return Err(TensorError::invalid("slice step must be positive"));
        }
        let size = self.shape[axis];
        if range.start > range.end || range.end > size {
            return Err(TensorError::SliceOutOfBounds {
                start: range.start,
                end: range.end,
                axis,
                size,
            });
        }
        let len = range.end - range.start;
        self.shape[axis] = len.div_ceil(step);
        if self.shape[axis] > 0 {
            let start = self.offset as isize + range.start as isize * self.strides[axis];
            self.offset = start as usize;
        }
        self.strides[axis] *= step as isize;
        Ok(self)
    }

    fn slice(self, ranges: [Range<usize>; N]) -> Result<Self, TensorError> {
        ranges
            .into_iter()
            .enumerate()
            .try_fold(self, |acc, (axis, range)| acc.slice_axis(axis, range, 1))
    }

    fn flip(mut self, axis: usize) -> Result<Self, TensorError> {
        check_axis::<N>(axis)?;
        let size = self.shape[axis];
        if size > 0 {
            let last = self.offset as isize + (size - 1) as isize * self.strides[axis];
            self.offset = last as usize;
        }
        self.strides[axis] = -self.strides[axis];
        Ok(self)
    }

    fn broadcast_to(mut self, shape: Shape<N>) -> Result<Self, TensorError> {
        check_broadcast_to(&self.shape, &shape)?;
        for k in 0..N {
            if self.shape[k] != shape[k] {
                self.strides[k] = 0;
            }
        }
        self.shape = shape;
        Ok(self)
    }

    /// True if consecutive row-major positions are consecutive in memory.
    fn is_contiguous(&self) -> bool {
        let expected = compute_strides(&self.shape, Layout::RowMajor);
        (0..N).all(|k| self.shape[k] <= 1 || self.strides[k] == expected[k] as isize)
    }

    fn reshape<const M: usize>(self, shape: Shape<M>) -> Result<Strided<M>, TensorError> {
        if shape.size() != self.shape.size() {
            return Err(TensorError::SizeMismatch {
                expected: self.shape.size(),
                actual: shape.size(),
            });
        }
        if !self.is_contiguous() {
            return Err(TensorError::invalid(
                "only row-major contiguous views can be reshaped without a copy",
            ));
        }
        Ok(Strided {
            offset: self.offset,
            ..Strided::contiguous(shape, Layout::RowMajor)
        })
    }

    /// Column-major if the first axis is the densest one.
    fn natural_layout(&self) -> Layout {
        if N >= 2 && self.strides[0].unsigned_abs() < self.strides[N - 1].unsigned_abs() {
            Layout::ColumnMajor
        } else {
            Layout::RowMajor
        }
    }
}

/// Read-only strided view.
pub struct View<'a, T, const N: usize> {
    data: &'a [T],
    strided: Strided<N>,
}

impl<T, const N: usize> Clone for View<'_, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const N: usize> Copy for View<'_, T, N> {}

impl<'a, T, const N: usize> View<'a, T, N> {
    /// Create a view over `data`.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::InvalidArgument` if some in-range index would
    /// address memory outside `data`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndexpr::View;
    ///
    /// let data = [1, 2, 3, 4, 5, 6];
    /// let v = View::new(&data, [3, 2], [1, 3], 0).unwrap(); // transposed 2x3
    /// assert_eq!(v[[2, 1]], 6);
    /// assert!(View::new(&data, [3, 3], [3, 1], 0).is_err());
    /// ```
    pub fn new(
        data: &'a [T],
        shape: impl Into<Shape<N>>,
        strides: [isize; N],
        offset: usize,
    ) -> Result<Self, TensorError> {
        let strided = Strided::checked(data.len(), shape.into(), strides, offset)?;
        Ok(Self { data, strided })
    }

    pub(crate) fn from_contiguous(data: &'a [T], shape: Shape<N>, layout: Layout) -> Self {
        Self {
            data,
            strided: Strided::contiguous(shape, layout),
        }
    }

    #[inline]
    pub fn shape(&self) -> Shape<N> {
        self.strided.shape
    }

    #[inline]
    pub fn strides(&self) -> &[isize; N] {
        &self.strided.strides
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.strided.offset
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strided.shape.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`, or `None` if out of bounds.
    pub fn get(&self, index: impl Into<Index<N>>) -> Option<&'a T> {
        let index = index.into();
        let data: &'a [T] = self.data;
        self.strided
            .shape
            .contains(&index)
            .then(|| &data[self.strided.address(&index)])
    }

    /// Bounds-checked element access.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfBounds` naming the first offending axis.
    pub fn at(&self, index: impl Into<Index<N>>) -> Result<&'a T, TensorError> {
        let index = index.into();
        self.strided.shape.check_index(&index)?;
        let data: &'a [T] = self.data;
        Ok(&data[self.strided.address(&index)])
    }

    /// Reverse the axis order.
    pub fn transpose(self) -> Self {
        Self {
            data: self.data,
            strided: self.strided.transpose(),
        }
    }

    /// Reorder axes; `perm[i]` is the source axis of result axis `i`.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::InvalidPermutation` if `perm` is not a permutation.
    pub fn permute(self, perm: [usize; N]) -> Result<Self, TensorError> {
        Ok(Self {
            data: self.data,
            strided: self.strided.permute(perm)?,
        })
    }

    /// Restrict every axis to a half-open range.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::SliceOutOfBounds` for a range past the extent.
    pub fn slice(self, ranges: [Range<usize>; N]) -> Result<Self, TensorError> {
        Ok(Self {
            data: self.data,
            strided: self.strided.slice(ranges)?,
        })
    }

    /// Keep every `step`-th position of `range` along `axis`.
    ///
    /// # Errors
    ///
    /// `AxisOutOfBounds`, `SliceOutOfBounds`, or `InvalidArgument` for a zero step.
    pub fn slice_axis(
        self,
        axis: usize,
        range: Range<usize>,
        step: usize,
    ) -> Result<Self, TensorError> {
        Ok(Self {
            data: self.data,
            strided: self.strided.slice_axis(axis, range, step)?,
        })
    }

    /// Walk `axis` backwards.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::AxisOutOfBounds` for an invalid axis.
    pub fn flip(self, axis: usize) -> Result<Self, TensorError> {
        Ok(Self {
            data: self.data,
            strided: self.strided.flip(axis)?,
        })
    }

    /// Repeat extent-1 axes to `shape` using zero strides.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if the view does not broadcast to `shape`.
    pub fn broadcast_to(self, shape: impl Into<Shape<N>>) -> Result<Self, TensorError> {
        Ok(Self {
            data: self.data,
            strided: self.strided.broadcast_to(shape.into())?,
        })
    }

    /// Reinterpret a row-major contiguous view under a new shape.
    ///
    /// # Errors
    ///
    /// `SizeMismatch` if the element count differs, `InvalidArgument` if the
    /// view is not contiguous.
    pub fn reshape<const M: usize>(
        self,
        shape: impl Into<Shape<M>>,
    ) -> Result<View<'a, T, M>, TensorError> {
        Ok(View {
            data: self.data,
            strided: self.strided.reshape(shape.into())?,
        })
    }

    /// True if the view covers a row-major contiguous block.
    pub fn is_contiguous(&self) -> bool {
        self.strided.is_contiguous()
    }
}

impl<T: Clone, const N: usize> Expr<N> for View<'_, T, N> {
    type Elem = T;

    #[inline]
    fn shape(&self) -> Shape<N> {
        self.strided.shape
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> T {
        self.data[self.strided.address(index)].clone()
    }

    fn layout(&self) -> Layout {
        self.strided.natural_layout()
    }
}

impl<T, const N: usize> ops::Index<[usize; N]> for View<'_, T, N> {
    type Output = T;

    #[inline]
    fn index(&self, index: [usize; N]) -> &T {
        let index = Shape::new(index);
        assert!(
            self.strided.shape.contains(&index),
            "index {index:?} out of bounds for shape {:?}",
            self.strided.shape
        );
        &self.data[self.strided.address(&index)]
    }
}

impl<T, const N: usize> fmt::Debug for View<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("shape", &self.strided.shape)
            .field("strides", &self.strided.strides)
            .field("offset", &self.strided.offset)
            .finish()
    }
}

/// Mutable strided view; writes go to the viewed buffer.
pub struct ViewMut<'a, T, const N: usize> {
    data: &'a mut [T],
    strided: Strided<N>,
}

impl<'a, T, const N: usize> ViewMut<'a, T, N> {
    /// Create a mutable view over `data`.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::InvalidArgument` if some in-range index would
    /// address memory outside `data`.
    pub fn new(
        data: &'a mut [T],
        shape: impl Into<Shape<N>>,
        strides: [isize; N],
        offset: usize,
    ) -> Result<Self, TensorError> {
        let strided = Strided::checked(data.len(), shape.into(), strides, offset)?;
        Ok(Self { data, strided })
    }

    pub(crate) fn from_contiguous(data: &'a mut [T], shape: Shape<N>, layout: Layout) -> Self {
        Self {
            data,
            strided: Strided::contiguous(shape, layout),
        }
    }

    #[inline]
    pub fn shape(&self) -> Shape<N> {
        self.strided.shape
    }

    #[inline]
    pub fn strides(&self) -> &[isize; N] {
        &self.strided.strides
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strided.shape.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read-only view of the same elements.
    pub fn view(&self) -> View<'_, T, N> {
        View {
            data: &*self.data,
            strided: self.strided,
        }
    }

    /// Shorter-lived mutable view of the same elements.
    pub fn reborrow(&mut self) -> ViewMut<'_, T, N> {
        ViewMut {
            data: &mut *self.data,
            strided: self.strided,
        }
    }

    pub fn get(&self, index: impl Into<Index<N>>) -> Option<&T> {
        let index = index.into();
        self.strided
            .shape
            .contains(&index)
            .then(|| &self.data[self.strided.address(&index)])
    }

    pub fn get_mut(&mut self, index: impl Into<Index<N>>) -> Option<&mut T> {
        let index = index.into();
        if !self.strided.shape.contains(&index) {
            return None;
        }
        Some(&mut self.data[self.strided.address(&index)])
    }

    /// Bounds-checked mutable element access.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfBounds` naming the first offending axis.
    pub fn at_mut(&mut self, index: impl Into<Index<N>>) -> Result<&mut T, TensorError> {
        let index = index.into();
        self.strided.shape.check_index(&index)?;
        Ok(&mut self.data[self.strided.address(&index)])
    }

    /// Write one element.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfBounds` if the index is out of bounds.
    pub fn set(&mut self, index: impl Into<Index<N>>, value: T) -> Result<(), TensorError> {
        *self.at_mut(index)? = value;
        Ok(())
    }

    pub fn transpose(self) -> Self {
        Self {
            data: self.data,
            strided: self.strided.transpose(),
        }
    }

    /// See [`View::permute`].
    ///
    /// # Errors
    ///
    /// Returns `TensorError::InvalidPermutation` if `perm` is not a permutation.
    pub fn permute(self, perm: [usize; N]) -> Result<Self, TensorError> {
        let strided = self.strided.permute(perm)?;
        Ok(Self {
            data: self.data,
            strided,
        })
    }

    /// See [`View::slice`].
    ///
    /// # Errors
    ///
    /// Returns `TensorError::SliceOutOfBounds` for a range past the extent.
    pub fn slice(self, ranges: [Range<usize>; N]) -> Result<Self, TensorError> {
        let strided = self.strided.slice(ranges)?;
        Ok(Self {
            data: self.data,
            strided,
        })
    }

    /// See [`View::slice_axis`].
    ///
    /// # Errors
    ///
    /// `AxisOutOfBounds`, `SliceOutOfBounds`, or `InvalidArgument` for a zero step.
    pub fn slice_axis(
        self,
        axis: usize,
        range: Range<usize>,
        step: usize,
    ) -> Result<Self, TensorError> {
        let strided = self.strided.slice_axis(axis, range, step)?;
        Ok(Self {
            data: self.data,
            strided,
        })
    }

    /// See [`View::flip`].
    ///
    /// # Errors
    ///
    /// Returns `TensorError::AxisOutOfBounds` for an invalid axis.
    pub fn flip(self, axis: usize) -> Result<Self, TensorError> {
        let strided = self.strided.flip(axis)?;
        Ok(Self {
            data: self.data,
            strided,
        })
    }

    /// See [`View::reshape`].
    ///
    /// # Errors
    ///
    /// `SizeMismatch` or `InvalidArgument` for a non-contiguous view.
    pub fn reshape<const M: usize>(
        self,
        shape: impl Into<Shape<M>>,
    ) -> Result<ViewMut<'a, T, M>, TensorError> {
        let strided = self.strided.reshape(shape.into())?;
        Ok(ViewMut {
            data: self.data,
            strided,
        })
    }
}

impl<T: Clone, const N: usize> Expr<N> for ViewMut<'_, T, N> {
    type Elem = T;

    #[inline]
    fn shape(&self) -> Shape<N> {
        self.strided.shape
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> T {
        self.data[self.strided.address(index)].clone()
    }

    fn layout(&self) -> Layout {
        self.strided.natural_layout()
    }
}

impl<T: Clone, const N: usize> ExprMut<N> for ViewMut<'_, T, N> {
    #[inline]
    fn eval_mut(&mut self, index: &Index<N>) -> &mut T {
        &mut self.data[self.strided.address(index)]
    }
}

impl<T, const N: usize> ops::Index<[usize; N]> for ViewMut<'_, T, N> {
    type Output = T;

    #[inline]
    fn index(&self, index: [usize; N]) -> &T {
        let index = Shape::new(index);
        assert!(
            self.strided.shape.contains(&index),
            "index {index:?} out of bounds for shape {:?}",
            self.strided.shape
        );
        &self.data[self.strided.address(&index)]
    }
}

impl<T, const N: usize> ops::IndexMut<[usize; N]> for ViewMut<'_, T, N> {
    #[inline]
    fn index_mut(&mut self, index: [usize; N]) -> &mut T {
        let index = Shape::new(index);
        assert!(
            self.strided.shape.contains(&index),
            "index {index:?} out of bounds for shape {:?}",
            self.strided.shape
        );
        &mut self.data[self.strided.address(&index)]
    }
}

impl<T, const N: usize> fmt::Debug for ViewMut<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewMut")
            .field("shape", &self.strided.shape)
            .field("strides", &self.strided.strides)
            .field("offset", &self.strided.offset)
            .finish()
    }
}

macro_rules! impl_view_compound_assign {
    ($($trait:ident, $method:ident, $try_method:ident, $bound:ident;)*) => {
        $(
            impl<T, O, const N: usize> ops::$trait<O> for ViewMut<'_, T, N>
            where
                O: IntoOperand<N>,
                T: Clone + ops::$bound<OperandElem<O, N>, Output = T>,
            {
                /// # Panics
                ///
                /// Panics if the right operand does not broadcast to this shape.
                fn $method(&mut self, rhs: O) {
                    if let Err(err) = self.$try_method(rhs) {
                        panic!("{err}");
                    }
                }
            }
        )*
    };
}

impl_view_compound_assign! {
    AddAssign, add_assign, try_add_assign, Add;
    SubAssign, sub_assign, try_sub_assign, Sub;
    MulAssign, mul_assign, try_mul_assign, Mul;
    DivAssign, div_assign, try_div_assign, Div;
}
