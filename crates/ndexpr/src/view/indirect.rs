//! Gather views: an explicit list of buffer offsets arranged in a shape.

use std::fmt;

use crate::error::TensorError;
use crate::expr::{Expr, ExprMut};
use crate::iter::row_major_position;
use crate::shape::{unravel_index, Index, Layout, Shape};
use crate::tensor::Tensor;

fn check_offsets<const N: usize>(
    data_len: usize,
    offsets: &[usize],
    shape: &Shape<N>,
) -> Result<(), TensorError> {
    if offsets.len() != shape.size() {
        return Err(TensorError::SizeMismatch {
            expected: shape.size(),
            actual: offsets.len(),
        });
    }
    match offsets.iter().find(|&&o| o >= data_len) {
        Some(&index) => Err(TensorError::IndexOutOfBounds {
            axis: 0,
            index,
            dim_size: data_len,
        }),
        None => Ok(()),
    }
}

/// Read-only gather view; element `i` is `data[offsets[ravel(i)]]`.
pub struct IndirectView<'a, T, const N: usize> {
    data: &'a [T],
    offsets: Vec<usize>,
    shape: Shape<N>,
}

impl<'a, T, const N: usize> IndirectView<'a, T, N> {
    /// Gather `data[offsets[k]]` into `shape` (row-major).
    ///
    /// # Errors
    ///
    /// `SizeMismatch` if `offsets.len() != shape.size()`, `IndexOutOfBounds`
    /// if an offset is past the end of `data`.
    pub fn new(
        data: &'a [T],
        offsets: Vec<usize>,
        shape: impl Into<Shape<N>>,
    ) -> Result<Self, TensorError> {
        let shape = shape.into();
        check_offsets(data.len(), &offsets, &shape)?;
        Ok(Self { data, offsets, shape })
    }

    pub(crate) fn from_checked(data: &'a [T], offsets: Vec<usize>, shape: Shape<N>) -> Self {
        Self { data, offsets, shape }
    }

    /// Buffer offsets in row-major order of the view.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn get(&self, index: impl Into<Index<N>>) -> Option<&'a T> {
        let index = index.into();
        let data: &'a [T] = self.data;
        self.shape
            .contains(&index)
            .then(|| &data[self.offsets[row_major_position(&index, &self.shape)]])
    }
}

impl<T: Clone, const N: usize> Expr<N> for IndirectView<'_, T, N> {
    type Elem = T;

    fn shape(&self) -> Shape<N> {
        self.shape
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> T {
        self.data[self.offsets[row_major_position(index, &self.shape)]].clone()
    }
}

impl<T, const N: usize> fmt::Debug for IndirectView<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndirectView")
            .field("shape", &self.shape)
            .field("offsets", &self.offsets)
            .finish()
    }
}

/// Mutable gather view; writes go to the gathered positions of the source.
pub struct IndirectViewMut<'a, T, const N: usize> {
    data: &'a mut [T],
    offsets: Vec<usize>,
    shape: Shape<N>,
}

impl<'a, T, const N: usize> IndirectViewMut<'a, T, N> {
    /// Mutable counterpart of [`IndirectView::new`].
    ///
    /// # Errors
    ///
    /// `SizeMismatch` if `offsets.len() != shape.size()`, `IndexOutOfBounds`
    /// if an offset is past the end of `data`.
    pub fn new(
        data: &'a mut [T],
        offsets: Vec<usize>,
        shape: impl Into<Shape<N>>,
    ) -> Result<Self, TensorError> {
        let shape = shape.into();
        check_offsets(data.len(), &offsets, &shape)?;
        Ok(Self { data, offsets, shape })
    }

    pub(crate) fn from_checked(data: &'a mut [T], offsets: Vec<usize>, shape: Shape<N>) -> Self {
        Self { data, offsets, shape }
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}

impl<T: Clone, const N: usize> Expr<N> for IndirectViewMut<'_, T, N> {
    type Elem = T;

    fn shape(&self) -> Shape<N> {
        self.shape
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> T {
        self.data[self.offsets[row_major_position(index, &self.shape)]].clone()
    }
}

impl<T: Clone, const N: usize> ExprMut<N> for IndirectViewMut<'_, T, N> {
    #[inline]
    fn eval_mut(&mut self, index: &Index<N>) -> &mut T {
        let offset = self.offsets[row_major_position(index, &self.shape)];
        &mut self.data[offset]
    }
}

impl<T, const N: usize> fmt::Debug for IndirectViewMut<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndirectViewMut")
            .field("shape", &self.shape)
            .field("offsets", &self.offsets)
            .finish()
    }
}

impl<T, const N: usize> Tensor<T, N> {
    /// Buffer offsets of logical row-major positions, validated against `len()`.
    fn positions_to_offsets(&self, positions: &[usize]) -> Result<Vec<usize>, TensorError> {
        let shape = self.shape();
        positions
            .iter()
            .map(|&pos| {
                if pos >= shape.size() {
                    return Err(TensorError::IndexOutOfBounds {
                        axis: 0,
                        index: pos,
                        dim_size: shape.size(),
                    });
                }
                Ok(self.offset(&unravel_index(pos, &shape, Layout::RowMajor)))
            })
            .collect()
    }

    /// View of the elements at row-major `positions`, arranged in `shape`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` for a position past the end, `SizeMismatch` if the
    /// number of positions differs from `shape.size()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndexpr::{Expr, Tensor};
    ///
    /// let t = Tensor::from_vec(vec![10, 20, 30, 40], [2, 2]).unwrap();
    /// let g = t.indirect(&[3, 0], [2]).unwrap();
    /// assert_eq!(g.copy().into_vec(), vec![40, 10]);
    /// ```
    pub fn indirect<const M: usize>(
        &self,
        positions: &[usize],
        shape: impl Into<Shape<M>>,
    ) -> Result<IndirectView<'_, T, M>, TensorError> {
        let offsets = self.positions_to_offsets(positions)?;
        IndirectView::new(self.data(), offsets, shape)
    }

    /// Mutable view of the elements at row-major `positions`.
    ///
    /// # Errors
    ///
    /// Same as [`Tensor::indirect`].
    pub fn indirect_mut<const M: usize>(
        &mut self,
        positions: &[usize],
        shape: impl Into<Shape<M>>,
    ) -> Result<IndirectViewMut<'_, T, M>, TensorError> {
        let offsets = self.positions_to_offsets(positions)?;
        IndirectViewMut::new(self.data_mut(), offsets, shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_lengths_and_offsets() {
        let data = [1, 2, 3];
        assert!(IndirectView::new(&data, vec![2, 0], [2]).is_ok());
        assert!(matches!(
            IndirectView::new(&data, vec![2, 0], [3]),
            Err(TensorError::SizeMismatch { expected: 3, actual: 2 })
        ));
        assert!(matches!(
            IndirectView::new(&data, vec![3, 0], [2]),
            Err(TensorError::IndexOutOfBounds { index: 3, .. })
        ));
    }

    #[test]
    fn test_gather_into_shape() {
        let data: Vec<i32> = (0..6).collect();
        let v = IndirectView::new(&data, vec![5, 4, 3, 2, 1, 0], [2, 3]).unwrap();
        assert_eq!(v.get([1, 0]), Some(&2));
        assert_eq!(v.get([2, 0]), None);
        assert_eq!(v.copy().into_vec(), vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_indirect_respects_layout() {
        let t = Tensor::from_vec((0..6).collect::<Vec<i32>>(), [2, 3])
            .unwrap()
            .to_layout(Layout::ColumnMajor);
        let g = t.indirect(&[1, 5], [2]).unwrap();
        assert_eq!(g.copy().into_vec(), vec![1, 5]);
        assert!(t.indirect(&[6], [1]).is_err());
    }

    #[test]
    fn test_indirect_mut_writes_through() {
        let mut t = Tensor::from_vec(vec![0; 4], [2, 2]).unwrap();
        let mut g = t.indirect_mut(&[0, 3], [2]).unwrap();
        g.fill(9);
        assert_eq!(g.offsets(), &[0, 3]);
        assert_eq!(t.into_vec(), vec![9, 0, 0, 9]);
    }
}
