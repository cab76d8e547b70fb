//! Lazy element-wise expressions.
//!
//! Every tensor-like value implements [`Expr`]: it reports a [`Shape`] and
//! produces the element at any in-range [`Index`]. Combinators such as
//! [`apply`], [`apply_binary`] and the arithmetic operators build new
//! expression nodes without touching any element; work happens only when an
//! expression is evaluated, iterated or materialized with [`Expr::copy`].
//!
//! ```
//! use ndexpr::{Expr, Tensor};
//!
//! let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], [2, 2]).unwrap();
//! let b = Tensor::from_vec(vec![10.0, 20.0], [1, 2]).unwrap();
//! let sum = &a + &b; // nothing computed yet
//! assert_eq!(sum.shape(), [2, 2]);
//! assert_eq!(sum.copy().into_vec(), vec![11.0, 22.0, 13.0, 24.0]);
//! ```

mod binary;
pub mod functional;
mod outer;
pub mod ops;
mod reduce;
mod remap;
mod select;
mod unary;
mod zip;

pub use binary::{apply_binary, Binary};
pub use outer::{outer, outer_into, outer_with, Outer};
pub use reduce::{
    accumulate, all, allclose, any, apply_along_axes, apply_along_axis, array_equal, cumprod,
    cumsum, fold, max, max_axis, min, min_axis, prod, prod_axis, ptp_axis, reduce, reduce_axis,
    sum, sum_axis, AxisReduce,
};
pub use remap::{permute, reverse, shift, transpose, Permute, Reverse, Shift};
pub use select::{where_, Where};
pub use unary::{apply, Unary};
pub use zip::{unzip, zip, Zip};

use crate::error::TensorError;
use crate::iter::{IndexedIter, Iter};
use crate::scalar::c64;
use crate::shape::{broadcast_index, check_broadcast_to, Index, Layout, Shape};
use crate::storage::try_with_capacity;
use crate::tensor::Tensor;

/// A rank-`N` array whose elements can be computed on demand.
pub trait Expr<const N: usize> {
    /// Element type produced by [`Expr::eval`].
    type Elem;

    /// Extent of every axis.
    fn shape(&self) -> Shape<N>;

    /// Element at `index`. The index must be inside [`Expr::shape`].
    fn eval(&self, index: &Index<N>) -> Self::Elem;

    /// Preferred traversal order; materialization uses it for the new buffer.
    fn layout(&self) -> Layout {
        Layout::RowMajor
    }

    /// Total number of elements.
    fn size(&self) -> usize {
        self.shape().size()
    }

    /// Bounds-checked [`Expr::eval`].
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfBounds` if `index` is outside the shape.
    fn try_eval(&self, index: &Index<N>) -> Result<Self::Elem, TensorError> {
        self.shape().check_index(index)?;
        Ok(self.eval(index))
    }

    /// Iterate every element in row-major order.
    fn iter(&self) -> Iter<'_, Self, N> {
        Iter::new(self, Layout::RowMajor)
    }

    /// Iterate every element in the given order.
    fn iter_order(&self, order: Layout) -> Iter<'_, Self, N> {
        Iter::new(self, order)
    }

    /// Iterate `(index, element)` pairs in row-major order.
    fn indexed_iter(&self) -> IndexedIter<'_, Self, N> {
        Iter::new(self, Layout::RowMajor).indexed()
    }

    /// Evaluate every element into a new tensor laid out in [`Expr::layout`].
    fn copy(&self) -> Tensor<Self::Elem, N> {
        self.copy_with_layout(self.layout())
    }

    /// Evaluate every element into a new tensor with the given layout.
    fn copy_with_layout(&self, layout: Layout) -> Tensor<Self::Elem, N> {
        let shape = self.shape();
        tracing::trace!(?shape, ?layout, "materializing expression");
        let data: Vec<Self::Elem> = self.iter_order(layout).collect();
        Tensor::from_parts(data, shape, layout)
    }

    /// Like [`Expr::copy`] but reports allocation failure.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::AllocationFailure` if the buffer cannot be reserved.
    fn try_copy(&self) -> Result<Tensor<Self::Elem, N>, TensorError> {
        let shape = self.shape();
        let layout = self.layout();
        let mut data = try_with_capacity(shape.size())?;
        data.extend(self.iter_order(layout));
        Ok(Tensor::from_parts(data, shape, layout))
    }

    /// Lazily apply `f` to every element.
    fn map<F, R>(self, f: F) -> Unary<F, Self, N>
    where
        Self: Sized,
        F: Fn(Self::Elem) -> R,
    {
        Unary::new(f, self)
    }
}

/// An expression whose elements are stored somewhere and can be written.
pub trait ExprMut<const N: usize>: Expr<N> {
    /// Mutable reference to the element at `index`, which must be in range.
    fn eval_mut(&mut self, index: &Index<N>) -> &mut Self::Elem;

    /// Bounds-checked [`ExprMut::eval_mut`].
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfBounds` if `index` is outside the shape.
    fn try_eval_mut(&mut self, index: &Index<N>) -> Result<&mut Self::Elem, TensorError> {
        self.shape().check_index(index)?;
        Ok(self.eval_mut(index))
    }

    /// Visit every element mutably, in [`Expr::layout`] order.
    fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&Index<N>, &mut Self::Elem),
    {
        let shape = self.shape();
        let order = self.layout();
        for flat in 0..shape.size() {
            let index = crate::shape::unravel_index(flat, &shape, order);
            f(&index, self.eval_mut(&index));
        }
    }

    /// Overwrite every element with `value`.
    fn fill(&mut self, value: Self::Elem)
    where
        Self::Elem: Clone,
    {
        self.for_each_mut(|_, slot| *slot = value.clone());
    }

    /// Overwrite every element from `src`, broadcasting it to this shape.
    ///
    /// Nothing is written unless the shapes are compatible.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if `src` cannot broadcast to this shape.
    fn assign_from<O>(&mut self, src: O) -> Result<(), TensorError>
    where
        O: IntoOperand<N>,
        O::Expr: Expr<N, Elem = Self::Elem>,
    {
        let src = src.into_operand();
        let src_shape = src.shape();
        check_broadcast_to(&src_shape, &self.shape())?;
        self.for_each_mut(|index, slot| *slot = src.eval(&broadcast_index(index, &src_shape)));
        Ok(())
    }

    /// Replace each element `x` by `f(x, rhs)`, broadcasting `rhs` to this shape.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` before any write if `rhs`
    /// cannot broadcast to this shape.
    fn zip_assign_with<O, F>(&mut self, rhs: O, mut f: F) -> Result<(), TensorError>
    where
        O: IntoOperand<N>,
        Self::Elem: Clone,
        F: FnMut(Self::Elem, OperandElem<O, N>) -> Self::Elem,
    {
        let rhs = rhs.into_operand();
        let rhs_shape = rhs.shape();
        check_broadcast_to(&rhs_shape, &self.shape())?;
        self.for_each_mut(|index, slot| {
            let b = rhs.eval(&broadcast_index(index, &rhs_shape));
            *slot = f(slot.clone(), b);
        });
        Ok(())
    }

    /// `self += rhs` with broadcasting.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if `rhs` cannot broadcast to this shape.
    fn try_add_assign<O>(&mut self, rhs: O) -> Result<(), TensorError>
    where
        O: IntoOperand<N>,
        Self::Elem: Clone + std::ops::Add<OperandElem<O, N>, Output = Self::Elem>,
    {
        self.zip_assign_with(rhs, |a, b| a + b)
    }

    /// `self -= rhs` with broadcasting.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if `rhs` cannot broadcast to this shape.
    fn try_sub_assign<O>(&mut self, rhs: O) -> Result<(), TensorError>
    where
        O: IntoOperand<N>,
        Self::Elem: Clone + std::ops::Sub<OperandElem<O, N>, Output = Self::Elem>,
    {
        self.zip_assign_with(rhs, |a, b| a - b)
    }

    /// `self *= rhs` with broadcasting.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if `rhs` cannot broadcast to this shape.
    fn try_mul_assign<O>(&mut self, rhs: O) -> Result<(), TensorError>
    where
        O: IntoOperand<N>,
        Self::Elem: Clone + std::ops::Mul<OperandElem<O, N>, Output = Self::Elem>,
    {
        self.zip_assign_with(rhs, |a, b| a * b)
    }

    /// `self /= rhs` with broadcasting.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if `rhs` cannot broadcast to this shape.
    fn try_div_assign<O>(&mut self, rhs: O) -> Result<(), TensorError>
    where
        O: IntoOperand<N>,
        Self::Elem: Clone + std::ops::Div<OperandElem<O, N>, Output = Self::Elem>,
    {
        self.zip_assign_with(rhs, |a, b| a / b)
    }
}

impl<E: Expr<N> + ?Sized, const N: usize> Expr<N> for &E {
    type Elem = E::Elem;

    #[inline]
    fn shape(&self) -> Shape<N> {
        (**self).shape()
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> E::Elem {
        (**self).eval(index)
    }

    #[inline]
    fn layout(&self) -> Layout {
        (**self).layout()
    }
}

impl<E: Expr<N> + ?Sized, const N: usize> Expr<N> for &mut E {
    type Elem = E::Elem;

    #[inline]
    fn shape(&self) -> Shape<N> {
        (**self).shape()
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> E::Elem {
        (**self).eval(index)
    }

    #[inline]
    fn layout(&self) -> Layout {
        (**self).layout()
    }
}

impl<E: ExprMut<N> + ?Sized, const N: usize> ExprMut<N> for &mut E {
    #[inline]
    fn eval_mut(&mut self, index: &Index<N>) -> &mut E::Elem {
        (**self).eval_mut(index)
    }
}

/// Anything usable as an operand of a rank-`N` expression.
///
/// Implemented for references to expressions, for owned expression nodes
/// and tensors, and for plain scalars (which become a [`Constant`]).
pub trait IntoOperand<const N: usize> {
    /// The expression this operand turns into.
    type Expr: Expr<N>;

    fn into_operand(self) -> Self::Expr;
}

/// Element type of an operand once converted to an expression.
pub type OperandElem<O, const N: usize> = <<O as IntoOperand<N>>::Expr as Expr<N>>::Elem;

impl<'a, E: Expr<N> + ?Sized, const N: usize> IntoOperand<N> for &'a E {
    type Expr = &'a E;

    #[inline]
    fn into_operand(self) -> &'a E {
        self
    }
}

/// A scalar viewed as a rank-`N` expression of all-one shape.
///
/// It broadcasts against any operand of the same rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constant<T, const N: usize> {
    value: T,
}

impl<T, const N: usize> Constant<T, N> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: Clone, const N: usize> Expr<N> for Constant<T, N> {
    type Elem = T;

    #[inline]
    fn shape(&self) -> Shape<N> {
        Shape::ones()
    }

    #[inline]
    fn eval(&self, _index: &Index<N>) -> T {
        self.value.clone()
    }
}

macro_rules! scalar_operand {
    ($($t:ty),* $(,)?) => {
        $(
            impl<const N: usize> IntoOperand<N> for $t {
                type Expr = Constant<$t, N>;

                #[inline]
                fn into_operand(self) -> Constant<$t, N> {
                    Constant::new(self)
                }
            }
        )*
    };
}

scalar_operand!(
    f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool, c64
);
