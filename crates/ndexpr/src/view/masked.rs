//! Mask-selected views, exposed as 1-D sequences.

use std::fmt;

use crate::error::TensorError;
use crate::expr::{Expr, ExprMut, IntoOperand};
use crate::shape::{Index, Shape};
use crate::tensor::Tensor;

/// Read-only view of the positions where a mask is true.
pub struct MaskedView<'a, T> {
    data: &'a [T],
    offsets: Vec<usize>,
}

impl<'a, T> MaskedView<'a, T> {
    /// Number of selected elements.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn get(&self, pos: usize) -> Option<&'a T> {
        let data: &'a [T] = self.data;
        self.offsets.get(pos).map(|&o| &data[o])
    }
}

impl<T: Clone> Expr<1> for MaskedView<'_, T> {
    type Elem = T;

    fn shape(&self) -> Shape<1> {
        Shape::new([self.offsets.len()])
    }

    #[inline]
    fn eval(&self, index: &Index<1>) -> T {
        self.data[self.offsets[index[0]]].clone()
    }
}

impl<T> fmt::Debug for MaskedView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskedView")
            .field("offsets", &self.offsets)
            .finish()
    }
}

/// Mutable view of the positions where a mask is true.
pub struct MaskedViewMut<'a, T> {
    data: &'a mut [T],
    offsets: Vec<usize>,
}

impl<T> MaskedViewMut<'_, T> {
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

impl<T: Clone> Expr<1> for MaskedViewMut<'_, T> {
    type Elem = T;

    fn shape(&self) -> Shape<1> {
        Shape::new([self.offsets.len()])
    }

    #[inline]
    fn eval(&self, index: &Index<1>) -> T {
        self.data[self.offsets[index[0]]].clone()
    }
}

impl<T: Clone> ExprMut<1> for MaskedViewMut<'_, T> {
    #[inline]
    fn eval_mut(&mut self, index: &Index<1>) -> &mut T {
        &mut self.data[self.offsets[index[0]]]
    }
}

impl<T> fmt::Debug for MaskedViewMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskedViewMut")
            .field("offsets", &self.offsets)
            .finish()
    }
}

impl<T, const N: usize> Tensor<T, N> {
    /// Buffer offsets of the true positions of `mask`, in row-major order.
    fn mask_offsets<M>(&self, mask: M) -> Result<Vec<usize>, TensorError>
    where
        M: IntoOperand<N>,
        M::Expr: Expr<N, Elem = bool>,
    {
        let mask = mask.into_operand();
        if mask.shape() != self.shape() {
            return Err(TensorError::shapes(mask.shape().dims(), self.shape().dims()));
        }
        Ok(mask
            .indexed_iter()
            .filter_map(|(index, selected)| selected.then(|| self.offset(&index)))
            .collect())
    }

    /// View of the elements where `mask` is true.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if the mask shape differs.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndexpr::{Expr, Tensor};
    ///
    /// let t = Tensor::from_vec(vec![1, 2, 3, 4], [2, 2]).unwrap();
    /// let mask = Tensor::from_vec(vec![true, false, false, true], [2, 2]).unwrap();
    /// assert_eq!(t.masked(&mask).unwrap().copy().into_vec(), vec![1, 4]);
    /// ```
    pub fn masked<M>(&self, mask: M) -> Result<MaskedView<'_, T>, TensorError>
    where
        M: IntoOperand<N>,
        M::Expr: Expr<N, Elem = bool>,
    {
        let offsets = self.mask_offsets(mask)?;
        Ok(MaskedView {
            data: self.data(),
            offsets,
        })
    }

    /// Mutable view of the elements where `mask` is true.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if the mask shape differs.
    pub fn masked_mut<M>(&mut self, mask: M) -> Result<MaskedViewMut<'_, T>, TensorError>
    where
        M: IntoOperand<N>,
        M::Expr: Expr<N, Elem = bool>,
    {
        let offsets = self.mask_offsets(mask)?;
        Ok(MaskedViewMut {
            data: self.data_mut(),
            offsets,
        })
    }
}
