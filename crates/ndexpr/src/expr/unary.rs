//! Element-wise unary node.

use crate::expr::functional::UnaryOp;
use crate::expr::{Expr, IntoOperand, OperandElem};
use crate::shape::{Index, Layout, Shape};

/// `f(operand[i])` for every index `i`.
#[derive(Debug, Clone, Copy)]
pub struct Unary<F, A, const N: usize> {
    f: F,
    operand: A,
}

impl<F, A, const N: usize> Unary<F, A, N> {
    pub(crate) fn new(f: F, operand: A) -> Self {
        Self { f, operand }
    }

    /// The wrapped operand.
    pub fn operand(&self) -> &A {
        &self.operand
    }
}

impl<F, A, const N: usize> Expr<N> for Unary<F, A, N>
where
    A: Expr<N>,
    F: UnaryOp<A::Elem>,
{
    type Elem = F::Output;

    #[inline]
    fn shape(&self) -> Shape<N> {
        self.operand.shape()
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> F::Output {
        self.f.call(self.operand.eval(index))
    }

    fn layout(&self) -> Layout {
        self.operand.layout()
    }
}

/// Lazily apply `f` to every element of `operand`.
///
/// # Examples
///
/// ```
/// use ndexpr::{apply, Expr, Tensor};
///
/// let t = Tensor::from_vec(vec![1.0, 4.0, 9.0], [3]).unwrap();
/// let roots = apply(&t, |x: f64| x.sqrt());
/// assert_eq!(roots.copy().into_vec(), vec![1.0, 2.0, 3.0]);
/// ```
pub fn apply<O, F, R, const N: usize>(operand: O, f: F) -> Unary<F, O::Expr, N>
where
    O: IntoOperand<N>,
    F: Fn(OperandElem<O, N>) -> R,
{
    Unary::new(f, operand.into_operand())
}
