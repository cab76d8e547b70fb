//! Owning dense tensor of compile-time rank.
//!
//! ```text
//! Tensor<T, N>
//! ├── storage: Dense<T>      contiguous, exclusively owned
//! ├── shape:   Shape<N>
//! ├── strides: [usize; N]    derived from shape and layout
//! └── layout:  RowMajor | ColumnMajor
//! ```
//!
//! The layout only decides the order of elements inside the buffer; every
//! logical operation (equality, `reshape`, `flatten`, iteration through
//! [`Expr::iter`]) is defined in row-major terms.

use std::fmt;
use std::ops;

use num_traits::{One, Zero};

use crate::error::TensorError;
use crate::expr::{Expr, ExprMut, IntoOperand, OperandElem};
use crate::iter::Iter;
use crate::shape::{compute_strides, unravel_index, Index, Layout, Shape};
use crate::storage::{try_with_capacity, Dense};
use crate::view::{View, ViewMut};

/// An owning, contiguous, rank-`N` array.
#[derive(Clone)]
pub struct Tensor<T, const N: usize> {
    storage: Dense<T>,
    shape: Shape<N>,
    strides: [usize; N],
    layout: Layout,
}

impl<T, const N: usize> Tensor<T, N> {
    /// Assemble a tensor from a buffer already in `layout` order.
    ///
    /// The buffer length must equal `shape.size()`.
    pub(crate) fn from_parts(data: Vec<T>, shape: Shape<N>, layout: Layout) -> Self {
        Self::from_storage(Dense::from_vec(data), shape, layout)
    }

    fn from_storage(storage: Dense<T>, shape: Shape<N>, layout: Layout) -> Self {
        debug_assert_eq!(storage.len(), shape.size());
        Self {
            storage,
            strides: compute_strides(&shape, layout),
            shape,
            layout,
        }
    }

    /// A tensor with all-zero shape and no buffer.
    ///
    /// This is also the state left behind by `std::mem::take`.
    pub fn empty() -> Self {
        Self {
            storage: Dense::new(),
            shape: Shape::zeros(),
            strides: [0; N],
            layout: Layout::RowMajor,
        }
    }

    /// Create tensor from data in row-major order.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::SizeMismatch` if data length doesn't match shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndexpr::Tensor;
    ///
    /// let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [2, 3]).unwrap();
    /// assert_eq!(t.shape(), [2, 3]);
    /// assert_eq!(t[[0, 1]], 2.0);
    /// assert_eq!(t[[1, 0]], 4.0);
    /// ```
    pub fn from_vec(data: Vec<T>, shape: impl Into<Shape<N>>) -> Result<Self, TensorError> {
        Self::from_vec_with_layout(data, shape, Layout::RowMajor)
    }

    /// Create tensor from data already stored in `layout` order.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::SizeMismatch` if data length doesn't match shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndexpr::{Layout, Tensor};
    ///
    /// let t = Tensor::from_vec_with_layout(vec![1, 2, 3, 4, 5, 6], [2, 3], Layout::ColumnMajor)
    ///     .unwrap();
    /// assert_eq!(t[[1, 0]], 2); // column-major: [1, 0] is the second element
    /// assert_eq!(t[[0, 1]], 3);
    /// ```
    pub fn from_vec_with_layout(
        data: Vec<T>,
        shape: impl Into<Shape<N>>,
        layout: Layout,
    ) -> Result<Self, TensorError> {
        let shape = shape.into();
        if data.len() != shape.size() {
            return Err(TensorError::SizeMismatch {
                expected: shape.size(),
                actual: data.len(),
            });
        }
        Ok(Self::from_parts(data, shape, layout))
    }

    /// Create tensor from a row-major sequence of exactly `shape.size()` items.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::SizeMismatch` if the iterator yields a different count.
    pub fn from_iter_shape<I>(iter: I, shape: impl Into<Shape<N>>) -> Result<Self, TensorError>
    where
        I: IntoIterator<Item = T>,
    {
        let shape = shape.into();
        let mut data = try_with_capacity(shape.size())?;
        data.extend(iter);
        Self::from_vec(data, shape)
    }

    /// Build a tensor by calling `f` on every index in row-major order.
    pub fn from_fn<F>(shape: impl Into<Shape<N>>, mut f: F) -> Self
    where
        F: FnMut(&Index<N>) -> T,
    {
        let shape = shape.into();
        let data = (0..shape.size())
            .map(|flat| f(&unravel_index(flat, &shape, Layout::RowMajor)))
            .collect();
        Self::from_parts(data, shape, Layout::RowMajor)
    }

    /// Get the shape of the tensor.
    #[inline]
    pub fn shape(&self) -> Shape<N> {
        self.shape
    }

    /// Get the rank (number of dimensions).
    #[inline]
    pub const fn ndim(&self) -> usize {
        N
    }

    /// Get total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if tensor is empty (has zero elements).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Get strides.
    #[inline]
    pub fn strides(&self) -> &[usize; N] {
        &self.strides
    }

    /// Storage order of the buffer.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Get underlying data as slice, in storage order.
    #[inline]
    pub fn data(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// Get underlying data as mutable slice, in storage order.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    /// Consume the tensor and return its buffer in storage order.
    pub fn into_vec(self) -> Vec<T> {
        self.storage.into_vec()
    }

    /// Buffer offset of an in-range index.
    #[inline]
    pub(crate) fn offset(&self, index: &Index<N>) -> usize {
        index
            .iter()
            .zip(self.strides.iter())
            .map(|(&i, &s)| i * s)
            .sum()
    }

    /// Get element by multi-index, or `None` if out of bounds.
    pub fn get(&self, index: impl Into<Index<N>>) -> Option<&T> {
        let index = index.into();
        if !self.shape.contains(&index) {
            return None;
        }
        self.storage.as_slice().get(self.offset(&index))
    }

    /// Get mutable element by multi-index, or `None` if out of bounds.
    pub fn get_mut(&mut self, index: impl Into<Index<N>>) -> Option<&mut T> {
        let index = index.into();
        if !self.shape.contains(&index) {
            return None;
        }
        let offset = self.offset(&index);
        self.storage.as_mut_slice().get_mut(offset)
    }

    /// Bounds-checked element access.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfBounds` naming the first offending axis.
    pub fn at(&self, index: impl Into<Index<N>>) -> Result<&T, TensorError> {
        let index = index.into();
        self.shape.check_index(&index)?;
        Ok(&self.storage[self.offset(&index)])
    }

    /// Bounds-checked mutable element access.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfBounds` naming the first offending axis.
    pub fn at_mut(&mut self, index: impl Into<Index<N>>) -> Result<&mut T, TensorError> {
        let index = index.into();
        self.shape.check_index(&index)?;
        let offset = self.offset(&index);
        Ok(&mut self.storage[offset])
    }

    /// Set element by multi-index.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfBounds` if the index is out of bounds.
    pub fn set(&mut self, index: impl Into<Index<N>>, value: T) -> Result<(), TensorError> {
        *self.at_mut(index)? = value;
        Ok(())
    }

    /// Fill all elements with a value.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.storage.as_mut_slice().fill(value);
    }

    /// Read-only strided view of the whole tensor.
    pub fn view(&self) -> View<'_, T, N> {
        View::from_contiguous(self.storage.as_slice(), self.shape, self.layout)
    }

    /// Mutable strided view of the whole tensor.
    pub fn view_mut(&mut self) -> ViewMut<'_, T, N> {
        ViewMut::from_contiguous(self.storage.as_mut_slice(), self.shape, self.layout)
    }

    /// Transposed view (axis order reversed); no data is moved.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndexpr::Tensor;
    ///
    /// let t = Tensor::from_vec((0..6).collect(), [2, 3]).unwrap();
    /// let tt = t.transpose();
    /// assert_eq!(tt.shape(), [3, 2]);
    /// assert_eq!(tt[[1, 0]], t[[0, 1]]);
    /// ```
    pub fn transpose(&self) -> View<'_, T, N> {
        self.view().transpose()
    }

    /// View with axes reordered; `perm[i]` is the source axis of result axis `i`.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::InvalidPermutation` if `perm` is not a permutation.
    pub fn permute(&self, perm: [usize; N]) -> Result<View<'_, T, N>, TensorError> {
        self.view().permute(perm)
    }
}

impl<T: Clone, const N: usize> Tensor<T, N> {
    /// Create a tensor filled with `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndexpr::Tensor;
    ///
    /// let t = Tensor::full([2, 2], 7u8);
    /// assert_eq!(t.into_vec(), vec![7, 7, 7, 7]);
    /// ```
    pub fn full(shape: impl Into<Shape<N>>, value: T) -> Self {
        Self::full_with_layout(shape, value, Layout::RowMajor)
    }

    /// Create a tensor filled with `value` in the given storage order.
    pub fn full_with_layout(shape: impl Into<Shape<N>>, value: T, layout: Layout) -> Self {
        let shape = shape.into();
        Self::from_storage(Dense::filled(shape.size(), value), shape, layout)
    }

    /// Like [`Tensor::full`] but reports allocation failure.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::AllocationFailure` if the buffer cannot be reserved.
    pub fn try_full(shape: impl Into<Shape<N>>, value: T) -> Result<Self, TensorError> {
        let shape = shape.into();
        let storage = Dense::try_filled(shape.size(), value)?;
        Ok(Self::from_storage(storage, shape, Layout::RowMajor))
    }

    /// Create a tensor of default-initialized elements.
    pub fn default_of(shape: impl Into<Shape<N>>) -> Self
    where
        T: Default,
    {
        Self::full(shape, T::default())
    }

    /// Create a new tensor with the given shape, zero-initialized.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndexpr::Tensor;
    ///
    /// let t: Tensor<f64, 3> = Tensor::zeros([2, 3, 4]);
    /// assert_eq!(t.shape(), [2, 3, 4]);
    /// assert_eq!(t.len(), 24);
    /// ```
    pub fn zeros(shape: impl Into<Shape<N>>) -> Self
    where
        T: Zero,
    {
        Self::full(shape, T::zero())
    }

    /// Create a tensor filled with ones.
    pub fn ones(shape: impl Into<Shape<N>>) -> Self
    where
        T: One,
    {
        Self::full(shape, T::one())
    }

    /// Copy of this tensor with its buffer stored in `layout` order.
    pub fn to_layout(&self, layout: Layout) -> Self {
        self.copy_with_layout(layout)
    }

    /// Row-major 1-D copy of all elements.
    pub fn flatten(&self) -> Tensor<T, 1> {
        let data: Vec<T> = self.iter().collect();
        let len = data.len();
        Tensor::from_parts(data, Shape::new([len]), Layout::RowMajor)
    }

    /// Reinterpret the elements under a new shape of rank `M`.
    ///
    /// Elements keep their row-major order. Row-major tensors keep their
    /// buffer; column-major ones are reordered.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::SizeMismatch` if the element count differs.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndexpr::Tensor;
    ///
    /// let t = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], [2, 3]).unwrap();
    /// let r = t.reshape([3, 2]).unwrap();
    /// assert_eq!(r.shape(), [3, 2]);
    /// assert_eq!(r[[1, 0]], 3);
    /// ```
    pub fn reshape<const M: usize>(
        self,
        shape: impl Into<Shape<M>>,
    ) -> Result<Tensor<T, M>, TensorError> {
        let new_shape = shape.into();
        if new_shape.size() != self.shape.size() {
            return Err(TensorError::SizeMismatch {
                expected: self.shape.size(),
                actual: new_shape.size(),
            });
        }
        match self.layout {
            Layout::RowMajor => Ok(Tensor::from_parts(
                self.storage.into_vec(),
                new_shape,
                Layout::RowMajor,
            )),
            Layout::ColumnMajor => {
                let data: Vec<T> = self.iter().collect();
                let row_major = Tensor::from_parts(data, new_shape, Layout::RowMajor);
                Ok(row_major.to_layout(Layout::ColumnMajor))
            }
        }
    }

    /// Assign from any expression of the same rank.
    ///
    /// Identical shapes overwrite in place; otherwise the buffer is
    /// reallocated to the source shape first. The layout is kept.
    ///
    /// The source must not borrow `self`; materialize it first in that case.
    pub fn assign<E>(&mut self, src: E)
    where
        E: Expr<N, Elem = T>,
    {
        let shape = src.shape();
        let values = Iter::new(&src, self.layout);
        if shape == self.shape {
            for (slot, value) in self.storage.as_mut_slice().iter_mut().zip(values) {
                *slot = value;
            }
        } else {
            tracing::debug!(from = ?self.shape, to = ?shape, "assignment reallocates tensor");
            let data: Vec<T> = values.collect();
            *self = Self::from_parts(data, shape, self.layout);
        }
    }

    /// Assign into the current shape, broadcasting `src` to it.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if `src` cannot broadcast to this
    /// shape; the tensor is left unchanged.
    pub fn assign_broadcast<O>(&mut self, src: O) -> Result<(), TensorError>
    where
        O: IntoOperand<N>,
        O::Expr: Expr<N, Elem = T>,
    {
        self.assign_from(src)
    }

    /// Change the shape, keeping the first `min(old, new)` elements in
    /// row-major order and padding the rest with `fill`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndexpr::Tensor;
    ///
    /// let mut t = Tensor::from_vec(vec![1, 2, 3, 4], [2, 2]).unwrap();
    /// t.resize([2, 3], 0);
    /// assert_eq!(t.into_vec(), vec![1, 2, 3, 4, 0, 0]);
    /// ```
    pub fn resize(&mut self, shape: impl Into<Shape<N>>, fill: T) {
        let shape = shape.into();
        let new_len = shape.size();
        tracing::debug!(from = ?self.shape, to = ?shape, "resizing tensor");
        let mut data: Vec<T> = self.iter().take(new_len).collect();
        data.resize(new_len, fill);
        let layout = self.layout;
        *self = Tensor::from_parts(data, shape, Layout::RowMajor);
        if layout == Layout::ColumnMajor {
            *self = self.to_layout(Layout::ColumnMajor);
        }
    }
}

impl<T, const N: usize> Default for Tensor<T, N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for Tensor<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("layout", &self.layout)
            .field("data", &self.storage.as_slice())
            .finish()
    }
}

impl<T: Clone, const N: usize> Expr<N> for Tensor<T, N> {
    type Elem = T;

    #[inline]
    fn shape(&self) -> Shape<N> {
        self.shape
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> T {
        self.storage[self.offset(index)].clone()
    }

    #[inline]
    fn layout(&self) -> Layout {
        self.layout
    }
}

impl<T: Clone, const N: usize> ExprMut<N> for Tensor<T, N> {
    #[inline]
    fn eval_mut(&mut self, index: &Index<N>) -> &mut T {
        let offset = self.offset(index);
        &mut self.storage[offset]
    }

    fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&Index<N>, &mut T),
    {
        let shape = self.shape;
        let layout = self.layout;
        for (flat, slot) in self.storage.as_mut_slice().iter_mut().enumerate() {
            f(&unravel_index(flat, &shape, layout), slot);
        }
    }
}

/// Logical equality: same shape and same elements, regardless of layout.
impl<T: PartialEq, const N: usize> PartialEq for Tensor<T, N> {
    fn eq(&self, other: &Self) -> bool {
        if self.shape != other.shape {
            return false;
        }
        if self.layout == other.layout {
            return self.storage == other.storage;
        }
        (0..self.shape.size()).all(|flat| {
            let index = unravel_index(flat, &self.shape, Layout::RowMajor);
            self.storage[self.offset(&index)] == other.storage[other.offset(&index)]
        })
    }
}

/// Unchecked fast-path access.
///
/// Coordinates are only validated in debug builds; use [`Tensor::at`] or
/// [`Tensor::get`] for checked access. An out-of-range coordinate in a
/// release build either panics on the buffer bound or reads another element.
impl<T, const N: usize> ops::Index<[usize; N]> for Tensor<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, index: [usize; N]) -> &T {
        let index = Shape::new(index);
        debug_assert!(
            self.shape.contains(&index),
            "index {index:?} out of bounds for shape {:?}",
            self.shape
        );
        &self.storage[self.offset(&index)]
    }
}

impl<T, const N: usize> ops::IndexMut<[usize; N]> for Tensor<T, N> {
    #[inline]
    fn index_mut(&mut self, index: [usize; N]) -> &mut T {
        let index = Shape::new(index);
        debug_assert!(
            self.shape.contains(&index),
            "index {index:?} out of bounds for shape {:?}",
            self.shape
        );
        let offset = self.offset(&index);
        &mut self.storage[offset]
    }
}

impl<T, const N: usize> ops::Index<Index<N>> for Tensor<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, index: Index<N>) -> &T {
        &self[index.into_array()]
    }
}

impl<T, const N: usize> ops::IndexMut<Index<N>> for Tensor<T, N> {
    #[inline]
    fn index_mut(&mut self, index: Index<N>) -> &mut T {
        &mut self[index.into_array()]
    }
}

macro_rules! impl_compound_assign {
    ($($trait:ident, $method:ident, $try_method:ident, $bound:ident;)*) => {
        $(
            impl<T, O, const N: usize> ops::$trait<O> for Tensor<T, N>
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

impl_compound_assign! {
    AddAssign, add_assign, try_add_assign, Add;
    SubAssign, sub_assign, try_sub_assign, Sub;
    MulAssign, mul_assign, try_mul_assign, Mul;
    DivAssign, div_assign, try_div_assign, Div;
}
