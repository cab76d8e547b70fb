//! Conditional selection node.

use crate::error::TensorError;
use crate::expr::{Expr, IntoOperand};
use crate::shape::{broadcast_all, broadcast_index, Index, Shape};

/// `if cond[i] { x[i] } else { y[i] }` with all three operands broadcast.
///
/// Only the chosen branch is evaluated for each element.
#[derive(Debug, Clone, Copy)]
pub struct Where<C, X, Y, const N: usize> {
    cond: C,
    x: X,
    y: Y,
    cond_shape: Shape<N>,
    x_shape: Shape<N>,
    y_shape: Shape<N>,
    shape: Shape<N>,
}

impl<C, X, Y, const N: usize> Where<C, X, Y, N>
where
    C: Expr<N, Elem = bool>,
    X: Expr<N>,
    Y: Expr<N, Elem = X::Elem>,
{
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if the three shapes do not broadcast.
    pub fn new(cond: C, x: X, y: Y) -> Result<Self, TensorError> {
        let cond_shape = cond.shape();
        let x_shape = x.shape();
        let y_shape = y.shape();
        let shape = broadcast_all(&[cond_shape, x_shape, y_shape])?;
        Ok(Self {
            cond,
            x,
            y,
            cond_shape,
            x_shape,
            y_shape,
            shape,
        })
    }
}

impl<C, X, Y, const N: usize> Expr<N> for Where<C, X, Y, N>
where
    C: Expr<N, Elem = bool>,
    X: Expr<N>,
    Y: Expr<N, Elem = X::Elem>,
{
    type Elem = X::Elem;

    fn shape(&self) -> Shape<N> {
        self.shape
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> X::Elem {
        if self.cond.eval(&broadcast_index(index, &self.cond_shape)) {
            self.x.eval(&broadcast_index(index, &self.x_shape))
        } else {
            self.y.eval(&broadcast_index(index, &self.y_shape))
        }
    }
}

/// Pick from `x` where `cond` holds and from `y` elsewhere.
///
/// Any of the three may be a scalar.
///
/// # Errors
///
/// Returns `TensorError::ShapeMismatch` if the shapes do not broadcast.
///
/// # Examples
///
/// ```
/// use ndexpr::{greater, where_, Expr, Tensor};
///
/// let t = Tensor::from_vec(vec![-1.0, 2.0, -3.0, 4.0], [2, 2]).unwrap();
/// let relu = where_(greater(&t, 0.0).unwrap(), &t, 0.0).unwrap();
/// assert_eq!(relu.copy().into_vec(), vec![0.0, 2.0, 0.0, 4.0]);
/// ```
pub fn where_<C, X, Y, const N: usize>(
    cond: C,
    x: X,
    y: Y,
) -> Result<Where<C::Expr, X::Expr, Y::Expr, N>, TensorError>
where
    C: IntoOperand<N>,
    X: IntoOperand<N>,
    Y: IntoOperand<N>,
    C::Expr: Expr<N, Elem = bool>,
    Y::Expr: Expr<N, Elem = <X::Expr as Expr<N>>::Elem>,
{
    Where::new(cond.into_operand(), x.into_operand(), y.into_operand())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::apply;
    use crate::tensor::Tensor;
    use std::cell::Cell;

    #[test]
    fn test_where_broadcasts_all_three() {
        let cond = Tensor::from_vec(vec![true, false], [2, 1]).unwrap();
        let x = Tensor::from_vec(vec![1, 2, 3], [1, 3]).unwrap();
        let w = where_(&cond, &x, -1i32).unwrap();
        assert_eq!(w.shape(), [2, 3]);
        assert_eq!(w.copy().into_vec(), vec![1, 2, 3, -1, -1, -1]);
    }

    #[test]
    fn test_where_rejects_incompatible() {
        let cond = Tensor::from_vec(vec![true, false], [2]).unwrap();
        let x = Tensor::from_vec(vec![1, 2, 3], [3]).unwrap();
        assert!(where_(&cond, &x, 0i32).is_err());
    }

    #[test]
    fn test_where_evaluates_only_taken_branch() {
        let x_calls = Cell::new(0);
        let y_calls = Cell::new(0);
        let data = Tensor::from_vec(vec![1, 2, 3, 4], [4]).unwrap();
        let cond = Tensor::from_vec(vec![true, true, true, false], [4]).unwrap();
        let x = apply(&data, |v: i32| {
            x_calls.set(x_calls.get() + 1);
            v
        });
        let y = apply(&data, |v: i32| {
            y_calls.set(y_calls.get() + 1);
            -v
        });
        let w = Where::new(&cond, x, y).unwrap();
        assert_eq!(w.copy().into_vec(), vec![1, 2, 3, -4]);
        assert_eq!(x_calls.get(), 3);
        assert_eq!(y_calls.get(), 1);
    }
}
