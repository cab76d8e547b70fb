//! Index-remapping nodes: reverse, cyclic shift and axis permutation.
//!
//! None of these touch element values; each maps an output index to a
//! source index and forwards the lookup.

use crate::error::TensorError;
use crate::expr::{Expr, IntoOperand};
use crate::shape::{check_axis, validate_permutation, Index, Layout, Shape};

/// Operand read backwards along one axis.
#[derive(Debug, Clone, Copy)]
pub struct Reverse<A, const N: usize> {
    operand: A,
    axis: usize,
    shape: Shape<N>,
}

impl<A: Expr<N>, const N: usize> Expr<N> for Reverse<A, N> {
    type Elem = A::Elem;

    fn shape(&self) -> Shape<N> {
        self.shape
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> A::Elem {
        let mut src = *index;
        src[self.axis] = self.shape[self.axis] - 1 - index[self.axis];
        self.operand.eval(&src)
    }

    fn layout(&self) -> Layout {
        self.operand.layout()
    }
}

/// Operand rotated cyclically along one axis.
///
/// Element `i` of the result is element `i - shift` (mod extent) of the
/// operand, so a positive shift moves elements towards higher indices.
#[derive(Debug, Clone, Copy)]
pub struct Shift<A, const N: usize> {
    operand: A,
    axis: usize,
    shift: usize,
    shape: Shape<N>,
}

impl<A: Expr<N>, const N: usize> Expr<N> for Shift<A, N> {
    type Elem = A::Elem;

    fn shape(&self) -> Shape<N> {
        self.shape
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> A::Elem {
        let n = self.shape[self.axis];
        let mut src = *index;
        src[self.axis] = (index[self.axis] + n - self.shift) % n;
        self.operand.eval(&src)
    }

    fn layout(&self) -> Layout {
        self.operand.layout()
    }
}

/// Operand with its axes reordered: output axis `k` is source axis `perm[k]`.
#[derive(Debug, Clone, Copy)]
pub struct Permute<A, const N: usize> {
    operand: A,
    perm: [usize; N],
    shape: Shape<N>,
}

impl<A: Expr<N>, const N: usize> Permute<A, N> {
    /// The axis order.
    pub fn perm(&self) -> &[usize; N] {
        &self.perm
    }

    fn is_reversal(&self) -> bool {
        self.perm.iter().enumerate().all(|(k, &p)| p == N - 1 - k)
    }
}

impl<A: Expr<N>, const N: usize> Expr<N> for Permute<A, N> {
    type Elem = A::Elem;

    fn shape(&self) -> Shape<N> {
        self.shape
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> A::Elem {
        let mut src = Shape::zeros();
        for (k, &p) in self.perm.iter().enumerate() {
            src[p] = index[k];
        }
        self.operand.eval(&src)
    }

    fn layout(&self) -> Layout {
        let inner = self.operand.layout();
        if N > 1 && self.is_reversal() {
            match inner {
                Layout::RowMajor => Layout::ColumnMajor,
                Layout::ColumnMajor => Layout::RowMajor,
            }
        } else {
            inner
        }
    }
}

/// Reverse `operand` along `axis`.
///
/// # Errors
///
/// Returns `TensorError::AxisOutOfBounds` if `axis >= N`.
///
/// # Examples
///
/// ```
/// use ndexpr::{reverse, Expr, Tensor};
///
/// let a = Tensor::from_vec((0..6).collect(), [2, 3]).unwrap();
/// let r = reverse(&a, 1).unwrap();
/// assert_eq!(r.copy().into_vec(), vec![2, 1, 0, 5, 4, 3]);
/// ```
pub fn reverse<O, const N: usize>(
    operand: O,
    axis: usize,
) -> Result<Reverse<O::Expr, N>, TensorError>
where
    O: IntoOperand<N>,
{
    check_axis::<N>(axis)?;
    let operand = operand.into_operand();
    let shape = operand.shape();
    Ok(Reverse {
        operand,
        axis,
        shape,
    })
}

/// Rotate `operand` by `offset` positions along `axis`; negative offsets
/// rotate towards lower indices.
///
/// # Errors
///
/// Returns `TensorError::AxisOutOfBounds` if `axis >= N`.
///
/// # Examples
///
/// ```
/// use ndexpr::{shift, Expr, Tensor};
///
/// let a = Tensor::from_vec(vec![1, 2, 3, 4, 5], [5]).unwrap();
/// assert_eq!(shift(&a, 2, 0).unwrap().copy().into_vec(), vec![4, 5, 1, 2, 3]);
/// assert_eq!(shift(&a, -1, 0).unwrap().copy().into_vec(), vec![2, 3, 4, 5, 1]);
/// ```
pub fn shift<O, const N: usize>(
    operand: O,
    offset: isize,
    axis: usize,
) -> Result<Shift<O::Expr, N>, TensorError>
where
    O: IntoOperand<N>,
{
    check_axis::<N>(axis)?;
    let operand = operand.into_operand();
    let shape = operand.shape();
    let n = shape[axis];
    let shift = if n == 0 {
        0
    } else {
        offset.rem_euclid(n as isize) as usize
    };
    Ok(Shift {
        operand,
        axis,
        shift,
        shape,
    })
}

/// Reverse the order of all axes.
///
/// # Examples
///
/// ```
/// use ndexpr::{transpose, Expr, Tensor};
///
/// let a = Tensor::from_vec((0..6).collect(), [2, 3]).unwrap();
/// let t = transpose(&a);
/// assert_eq!(t.shape(), [3, 2]);
/// assert_eq!(t.copy()[[1, 0]], a[[0, 1]]);
/// ```
pub fn transpose<O, const N: usize>(operand: O) -> Permute<O::Expr, N>
where
    O: IntoOperand<N>,
{
    let mut perm = [0usize; N];
    for (k, p) in perm.iter_mut().enumerate() {
        *p = N - 1 - k;
    }
    let operand = operand.into_operand();
    let shape = permuted_shape(&operand.shape(), &perm);
    Permute {
        operand,
        perm,
        shape,
    }
}

/// Reorder axes so that output axis `k` is operand axis `perm[k]`.
///
/// # Errors
///
/// Returns `TensorError::InvalidPermutation` unless `perm` is a permutation
/// of `0..N`.
pub fn permute<O, const N: usize>(
    operand: O,
    perm: [usize; N],
) -> Result<Permute<O::Expr, N>, TensorError>
where
    O: IntoOperand<N>,
{
    validate_permutation(&perm)?;
    let operand = operand.into_operand();
    let shape = permuted_shape(&operand.shape(), &perm);
    Ok(Permute {
        operand,
        perm,
        shape,
    })
}

fn permuted_shape<const N: usize>(shape: &Shape<N>, perm: &[usize; N]) -> Shape<N> {
    let mut out = Shape::zeros();
    for (k, &p) in perm.iter().enumerate() {
        out[k] = shape[p];
    }
    out
}
