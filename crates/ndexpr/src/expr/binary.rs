//! Element-wise binary node with broadcasting.

use crate::error::TensorError;
use crate::expr::functional::BinaryOp;
use crate::expr::{Expr, IntoOperand, OperandElem};
use crate::shape::{broadcast_index, broadcast_shapes, Index, Layout, Shape};

/// `f(lhs[i'], rhs[i''])` where `i'`, `i''` are `i` with broadcast axes zeroed.
#[derive(Debug, Clone, Copy)]
pub struct Binary<F, A, B, const N: usize> {
    f: F,
    lhs: A,
    rhs: B,
    lhs_shape: Shape<N>,
    rhs_shape: Shape<N>,
    shape: Shape<N>,
}

impl<F, A, B, const N: usize> Binary<F, A, B, N>
where
    A: Expr<N>,
    B: Expr<N>,
{
    /// Combine two operands, resolving the broadcast shape.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if the shapes are not broadcast-compatible.
    pub fn new(f: F, lhs: A, rhs: B) -> Result<Self, TensorError> {
        let lhs_shape = lhs.shape();
        let rhs_shape = rhs.shape();
        let shape = broadcast_shapes(&lhs_shape, &rhs_shape)?;
        Ok(Self {
            f,
            lhs,
            rhs,
            lhs_shape,
            rhs_shape,
            shape,
        })
    }

    pub fn lhs(&self) -> &A {
        &self.lhs
    }

    pub fn rhs(&self) -> &B {
        &self.rhs
    }
}

impl<F, A, B, const N: usize> Expr<N> for Binary<F, A, B, N>
where
    A: Expr<N>,
    B: Expr<N>,
    F: BinaryOp<A::Elem, B::Elem>,
{
    type Elem = F::Output;

    #[inline]
    fn shape(&self) -> Shape<N> {
        self.shape
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> F::Output {
        let a = self.lhs.eval(&broadcast_index(index, &self.lhs_shape));
        let b = self.rhs.eval(&broadcast_index(index, &self.rhs_shape));
        self.f.call(a, b)
    }

    fn layout(&self) -> Layout {
        if self.lhs_shape == self.shape {
            self.lhs.layout()
        } else {
            self.rhs.layout()
        }
    }
}

/// Lazily combine two operands element-wise with `f`, broadcasting as needed.
///
/// Either operand may be a scalar.
///
/// # Errors
///
/// Returns `TensorError::ShapeMismatch` if the shapes are not broadcast-compatible.
///
/// # Examples
///
/// ```
/// use ndexpr::{apply_binary, Expr, Tensor};
///
/// let a = Tensor::from_vec(vec![1.0, 2.0, 3.0], [1, 3]).unwrap();
/// let b = Tensor::from_vec(vec![10.0, 20.0], [2, 1]).unwrap();
/// let e = apply_binary(&a, &b, |x: f64, y: f64| x.max(y / 10.0)).unwrap();
/// assert_eq!(e.shape(), [2, 3]);
/// assert_eq!(e.copy().into_vec(), vec![1.0, 2.0, 3.0, 2.0, 2.0, 3.0]);
/// ```
pub fn apply_binary<L, R, F, T, const N: usize>(
    lhs: L,
    rhs: R,
    f: F,
) -> Result<Binary<F, L::Expr, R::Expr, N>, TensorError>
where
    L: IntoOperand<N>,
    R: IntoOperand<N>,
    F: Fn(OperandElem<L, N>, OperandElem<R, N>) -> T,
{
    Binary::new(f, lhs.into_operand(), rhs.into_operand())
}
