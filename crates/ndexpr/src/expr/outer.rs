//! Outer product node.
//!
//! For `a` of shape `[a0, a1, ...]` and `b` of shape `[b0, b1, ...]` the
//! result has shape `[a0, a1, ..., b0, b1, ...]` and
//! `C[i0, i1, ..., j0, j1, ...] = f(A[i0, i1, ...], B[j0, j1, ...])`.
//!
//! The output rank `N` must equal `M + K`; it is checked at compile time and
//! usually inferred from the use site.

use crate::error::TensorError;
use crate::expr::functional::{BinaryOp, Times};
use crate::expr::{Expr, ExprMut, IntoOperand, OperandElem};
use crate::shape::{Index, Shape};

/// Lazy outer combination of a rank-`M` and a rank-`K` expression.
#[derive(Debug, Clone, Copy)]
pub struct Outer<F, A, B, const M: usize, const K: usize, const N: usize> {
    f: F,
    lhs: A,
    rhs: B,
    shape: Shape<N>,
}

impl<F, A, B, const M: usize, const K: usize, const N: usize> Outer<F, A, B, M, K, N>
where
    A: Expr<M>,
    B: Expr<K>,
{
    pub fn new(f: F, lhs: A, rhs: B) -> Self {
        let shape = lhs.shape().cat::<K, N>(&rhs.shape());
        Self { f, lhs, rhs, shape }
    }
}

impl<F, A, B, const M: usize, const K: usize, const N: usize> Expr<N> for Outer<F, A, B, M, K, N>
where
    A: Expr<M>,
    B: Expr<K>,
    F: BinaryOp<A::Elem, B::Elem>,
{
    type Elem = F::Output;

    fn shape(&self) -> Shape<N> {
        self.shape
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> F::Output {
        let mut left = [0usize; M];
        let mut right = [0usize; K];
        left.copy_from_slice(&index[..M]);
        right.copy_from_slice(&index[M..]);
        self.f.call(
            self.lhs.eval(&Shape::new(left)),
            self.rhs.eval(&Shape::new(right)),
        )
    }
}

/// Outer product `a[i] * b[j]`.
///
/// # Example
///
/// ```
/// use ndexpr::{outer, Expr, Tensor};
///
/// let a = Tensor::from_vec(vec![1.0, 2.0], [2]).unwrap();
/// let b = Tensor::from_vec(vec![3.0, 4.0, 5.0], [3]).unwrap();
/// let c: Tensor<f64, 2> = outer(&a, &b).copy();
///
/// assert_eq!(c.shape(), [2, 3]);
/// assert_eq!(c[[0, 0]], 3.0);
/// assert_eq!(c[[1, 0]], 6.0);
/// assert_eq!(c[[1, 2]], 10.0);
/// ```
pub fn outer<L, R, const M: usize, const K: usize, const N: usize>(
    lhs: L,
    rhs: R,
) -> Outer<Times, L::Expr, R::Expr, M, K, N>
where
    L: IntoOperand<M>,
    R: IntoOperand<K>,
{
    Outer::new(Times, lhs.into_operand(), rhs.into_operand())
}

/// Outer combination with an arbitrary function.
pub fn outer_with<L, R, F, T, const M: usize, const K: usize, const N: usize>(
    lhs: L,
    rhs: R,
    f: F,
) -> Outer<F, L::Expr, R::Expr, M, K, N>
where
    L: IntoOperand<M>,
    R: IntoOperand<K>,
    F: Fn(OperandElem<L, M>, OperandElem<R, K>) -> T,
{
    Outer::new(f, lhs.into_operand(), rhs.into_operand())
}

/// Write the outer product of `lhs` and `rhs` into a pre-shaped destination.
///
/// # Errors
///
/// Returns `TensorError::ShapeMismatch` if `dest` does not have the
/// concatenated shape; nothing is written in that case.
pub fn outer_into<D, L, R, const M: usize, const K: usize, const N: usize>(
    dest: &mut D,
    lhs: L,
    rhs: R,
) -> Result<(), TensorError>
where
    D: ExprMut<N>,
    L: IntoOperand<M>,
    R: IntoOperand<K>,
    Times: BinaryOp<OperandElem<L, M>, OperandElem<R, K>, Output = D::Elem>,
{
    let product = outer::<L, R, M, K, N>(lhs, rhs);
    let shape = product.shape();
    if shape != dest.shape() {
        return Err(TensorError::shapes(dest.shape().dims(), shape.dims()));
    }
    dest.for_each_mut(|index, slot| *slot = product.eval(index));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::Tensor;

    #[test]
    fn test_outer_vector_matrix() {
        let a = Tensor::from_vec(vec![1, 2], [2]).unwrap();
        let b = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], [2, 3]).unwrap();
        let c: Tensor<i32, 3> = outer(&a, &b).copy();
        assert_eq!(c.shape(), [2, 2, 3]);
        for i in 0..2 {
            for j in 0..2 {
                for k in 0..3 {
                    assert_eq!(c[[i, j, k]], a[[i]] * b[[j, k]]);
                }
            }
        }
    }

    #[test]
    fn test_outer_with_custom_function() {
        let a = Tensor::from_vec(vec![1, 2, 3], [3]).unwrap();
        let b = Tensor::from_vec(vec![10, 20], [2]).unwrap();
        let e: Outer<_, _, _, 1, 1, 2> = outer_with(&a, &b, |x: i32, y: i32| x + y);
        assert_eq!(e.shape(), [3, 2]);
        assert_eq!(e.copy().into_vec(), vec![11, 21, 12, 22, 13, 23]);
    }

    #[test]
    fn test_outer_with_scalar_tensor() {
        let s: Tensor<f64, 0> = Tensor::full([], 2.0);
        let b = Tensor::from_vec(vec![1.0, 2.0], [2]).unwrap();
        let c: Tensor<f64, 1> = outer(&s, &b).copy();
        assert_eq!(c.into_vec(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_outer_into_checks_shape() {
        let a = Tensor::from_vec(vec![1.0, 2.0], [2]).unwrap();
        let b = Tensor::from_vec(vec![3.0, 4.0, 5.0], [3]).unwrap();
        let mut c = Tensor::<f64, 2>::zeros([2, 3]);
        outer_into(&mut c, &a, &b).unwrap();
        assert_eq!(c[[1, 2]], 10.0);

        let mut wrong = Tensor::<f64, 2>::zeros([3, 2]);
        assert!(outer_into(&mut wrong, &a, &b).is_err());
        assert!(wrong.iter().all(|x| x == 0.0));
    }
}
