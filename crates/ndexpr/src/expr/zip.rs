//! Pairing two same-shape expressions and splitting pairs apart again.

use crate::error::TensorError;
use crate::expr::functional::{First, Second};
use crate::expr::{Expr, IntoOperand, Unary};
use crate::shape::{Index, Layout, Shape};

/// Element-wise pairs `(a[i], b[i])` of two operands with identical shapes.
#[derive(Debug, Clone, Copy)]
pub struct Zip<A, B, const N: usize> {
    a: A,
    b: B,
}

impl<A: Expr<N>, B: Expr<N>, const N: usize> Expr<N> for Zip<A, B, N> {
    type Elem = (A::Elem, B::Elem);

    fn shape(&self) -> Shape<N> {
        self.a.shape()
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> Self::Elem {
        (self.a.eval(index), self.b.eval(index))
    }

    fn layout(&self) -> Layout {
        self.a.layout()
    }
}

/// Pair up two operands element by element. No broadcasting is done.
///
/// # Errors
///
/// Returns `TensorError::ShapeMismatch` unless both shapes are equal.
///
/// # Examples
///
/// ```
/// use ndexpr::{zip, Expr, Tensor};
///
/// let a = Tensor::from_vec(vec![1, 2], [2]).unwrap();
/// let b = Tensor::from_vec(vec!['x', 'y'], [2]).unwrap();
/// let pairs: Vec<_> = zip(&a, &b).unwrap().iter().collect();
/// assert_eq!(pairs, vec![(1, 'x'), (2, 'y')]);
/// ```
pub fn zip<L, R, const N: usize>(a: L, b: R) -> Result<Zip<L::Expr, R::Expr, N>, TensorError>
where
    L: IntoOperand<N>,
    R: IntoOperand<N>,
{
    let a = a.into_operand();
    let b = b.into_operand();
    if a.shape() != b.shape() {
        return Err(TensorError::shapes(a.shape().dims(), b.shape().dims()));
    }
    Ok(Zip { a, b })
}

/// Split an expression of pairs into its two component expressions.
pub fn unzip<E, P, Q, const N: usize>(
    pairs: &E,
) -> (Unary<First, &E, N>, Unary<Second, &E, N>)
where
    E: Expr<N, Elem = (P, Q)> + ?Sized,
{
    (Unary::new(First, pairs), Unary::new(Second, pairs))
}
