//! Reductions: whole-expression folds, lazy per-axis reductions and
//! running accumulations.
//!
//! Full reductions consume every element in row-major order. Per-axis
//! reductions are lazy [`AxisReduce`] nodes whose reduced axes have extent 1;
//! each element access walks the reduced lane again.

use std::marker::PhantomData;
use std::ops::{Add, Mul, Sub};

use num_traits::{Float, One, Zero};
use smallvec::SmallVec;

use crate::error::TensorError;
use crate::expr::{apply_binary, Expr, IntoOperand, OperandElem};
use crate::iter::AxisIter;
use crate::shape::{check_axis, Index, Layout, Shape};
use crate::tensor::Tensor;

/// Lazy reduction of one or more axes.
///
/// The shape equals the operand shape with every reduced axis set to 1.
/// Element `i` is `f(lane)`, where `lane` iterates the reduced axes of the
/// operand with the remaining coordinates taken from `i`.
pub struct AxisReduce<F, A, R, const N: usize> {
    f: F,
    operand: A,
    axes: SmallVec<[usize; 4]>,
    shape: Shape<N>,
    _output: PhantomData<fn() -> R>,
}

impl<F, A, R, const N: usize> AxisReduce<F, A, R, N>
where
    A: Expr<N>,
    F: for<'x> Fn(AxisIter<'x, A, N>) -> R,
{
    /// Reduce `axes` of `operand` with `f`.
    ///
    /// # Errors
    ///
    /// `AxisOutOfBounds` for an axis `>= N`, `InvalidArgument` for a
    /// repeated axis.
    pub fn new(f: F, operand: A, axes: &[usize]) -> Result<Self, TensorError> {
        let mut sorted: SmallVec<[usize; 4]> = SmallVec::with_capacity(axes.len());
        for &axis in axes {
            check_axis::<N>(axis)?;
            sorted.push(axis);
        }
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(TensorError::invalid(format!(
                "axis listed more than once in {axes:?}"
            )));
        }
        let mut shape = operand.shape();
        for &axis in &sorted {
            shape[axis] = 1;
        }
        Ok(Self {
            f,
            operand,
            axes: sorted,
            shape,
            _output: PhantomData,
        })
    }

    /// Reduced axes in increasing order.
    pub fn axes(&self) -> &[usize] {
        &self.axes
    }
}

impl<F: Clone, A: Clone, R, const N: usize> Clone for AxisReduce<F, A, R, N> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            operand: self.operand.clone(),
            axes: self.axes.clone(),
            shape: self.shape,
            _output: PhantomData,
        }
    }
}

impl<F, A, R, const N: usize> std::fmt::Debug for AxisReduce<F, A, R, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxisReduce")
            .field("axes", &self.axes)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

impl<F, A, R, const N: usize> Expr<N> for AxisReduce<F, A, R, N>
where
    A: Expr<N>,
    F: for<'x> Fn(AxisIter<'x, A, N>) -> R,
{
    type Elem = R;

    fn shape(&self) -> Shape<N> {
        self.shape
    }

    fn eval(&self, index: &Index<N>) -> R {
        (self.f)(AxisIter::new(&self.operand, *index, &self.axes))
    }

    fn layout(&self) -> Layout {
        self.operand.layout()
    }
}

/// Apply `f` to every lane along `axis`.
///
/// # Errors
///
/// Returns `TensorError::AxisOutOfBounds` if `axis >= N`.
///
/// # Examples
///
/// ```
/// use ndexpr::{apply_along_axis, Expr, Tensor};
///
/// let t = Tensor::from_vec(vec![1, 5, 2, 7, 3, 4], [2, 3]).unwrap();
/// let spread = apply_along_axis(&t, 1, |lane| {
///     let hi = lane.clone().max().unwrap_or(0);
///     let lo = lane.min().unwrap_or(0);
///     hi - lo
/// })
/// .unwrap();
/// assert_eq!(spread.shape(), [2, 1]);
/// assert_eq!(spread.copy().into_vec(), vec![4, 4]);
/// ```
pub fn apply_along_axis<O, F, R, const N: usize>(
    operand: O,
    axis: usize,
    f: F,
) -> Result<AxisReduce<F, O::Expr, R, N>, TensorError>
where
    O: IntoOperand<N>,
    F: for<'x> Fn(AxisIter<'x, O::Expr, N>) -> R,
{
    AxisReduce::new(f, operand.into_operand(), &[axis])
}

/// Apply `f` to every sub-lattice spanned by `axes`.
///
/// # Errors
///
/// `AxisOutOfBounds` for an axis `>= N`, `InvalidArgument` for a repeated axis.
pub fn apply_along_axes<O, F, R, const N: usize>(
    operand: O,
    axes: &[usize],
    f: F,
) -> Result<AxisReduce<F, O::Expr, R, N>, TensorError>
where
    O: IntoOperand<N>,
    F: for<'x> Fn(AxisIter<'x, O::Expr, N>) -> R,
{
    AxisReduce::new(f, operand.into_operand(), axes)
}

/// Fold every lane along `axis` with `f`, starting from its first element.
///
/// # Errors
///
/// `AxisOutOfBounds` for a bad axis; `EmptyReduction` if the axis has
/// extent zero.
#[allow(clippy::type_complexity)]
pub fn reduce_axis<O, F, const N: usize>(
    operand: O,
    axis: usize,
    f: F,
) -> Result<
    AxisReduce<
        impl for<'x> Fn(AxisIter<'x, O::Expr, N>) -> OperandElem<O, N>,
        O::Expr,
        OperandElem<O, N>,
        N,
    >,
    TensorError,
>
where
    O: IntoOperand<N>,
    F: Fn(OperandElem<O, N>, OperandElem<O, N>) -> OperandElem<O, N>,
{
    let operand = operand.into_operand();
    check_axis::<N>(axis)?;
    if operand.shape()[axis] == 0 {
        return Err(TensorError::EmptyReduction);
    }
    let lane_fold = move |mut lane: AxisIter<'_, O::Expr, N>| -> OperandElem<O, N> {
        match lane.next() {
            Some(first) => lane.fold(first, &f),
            None => unreachable!("reduced axis checked non-empty"),
        }
    };
    AxisReduce::new(lane_fold, operand, &[axis])
}

/// Sum along `axis`; an empty axis sums to zero.
///
/// # Errors
///
/// Returns `TensorError::AxisOutOfBounds` if `axis >= N`.
#[allow(clippy::type_complexity)]
pub fn sum_axis<O, const N: usize>(
    operand: O,
    axis: usize,
) -> Result<
    AxisReduce<
        impl for<'x> Fn(AxisIter<'x, O::Expr, N>) -> OperandElem<O, N>,
        O::Expr,
        OperandElem<O, N>,
        N,
    >,
    TensorError,
>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: Zero,
{
    let lane_sum = |lane: AxisIter<'_, O::Expr, N>| -> OperandElem<O, N> {
        lane.fold(<OperandElem<O, N> as Zero>::zero(), |acc, x| acc + x)
    };
    AxisReduce::new(lane_sum, operand.into_operand(), &[axis])
}

/// Product along `axis`; an empty axis gives one.
///
/// # Errors
///
/// Returns `TensorError::AxisOutOfBounds` if `axis >= N`.
#[allow(clippy::type_complexity)]
pub fn prod_axis<O, const N: usize>(
    operand: O,
    axis: usize,
) -> Result<
    AxisReduce<
        impl for<'x> Fn(AxisIter<'x, O::Expr, N>) -> OperandElem<O, N>,
        O::Expr,
        OperandElem<O, N>,
        N,
    >,
    TensorError,
>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: One,
{
    let lane_prod = |lane: AxisIter<'_, O::Expr, N>| -> OperandElem<O, N> {
        lane.fold(<OperandElem<O, N> as One>::one(), |acc, x| acc * x)
    };
    AxisReduce::new(lane_prod, operand.into_operand(), &[axis])
}

/// Largest element along `axis`.
///
/// # Errors
///
/// `AxisOutOfBounds` for a bad axis; `EmptyReduction` for an empty axis.
#[allow(clippy::type_complexity)]
pub fn max_axis<O, const N: usize>(
    operand: O,
    axis: usize,
) -> Result<
    AxisReduce<
        impl for<'x> Fn(AxisIter<'x, O::Expr, N>) -> OperandElem<O, N>,
        O::Expr,
        OperandElem<O, N>,
        N,
    >,
    TensorError,
>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: PartialOrd,
{
    reduce_axis(operand, axis, |a, b| if b > a { b } else { a })
}

/// Smallest element along `axis`.
///
/// # Errors
///
/// `AxisOutOfBounds` for a bad axis; `EmptyReduction` for an empty axis.
#[allow(clippy::type_complexity)]
pub fn min_axis<O, const N: usize>(
    operand: O,
    axis: usize,
) -> Result<
    AxisReduce<
        impl for<'x> Fn(AxisIter<'x, O::Expr, N>) -> OperandElem<O, N>,
        O::Expr,
        OperandElem<O, N>,
        N,
    >,
    TensorError,
>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: PartialOrd,
{
    reduce_axis(operand, axis, |a, b| if b < a { b } else { a })
}

/// Fold every element in row-major order, starting from the first one.
///
/// # Errors
///
/// Returns `TensorError::EmptyReduction` if the operand has no elements.
///
/// # Examples
///
/// ```
/// use ndexpr::{reduce, Tensor};
///
/// let t = Tensor::from_vec(vec![1, 2, 3, 4], [2, 2]).unwrap();
/// assert_eq!(reduce(&t, |a, b| a + b).unwrap(), 10);
///
/// let empty = Tensor::<i32, 2>::zeros([0, 3]);
/// assert!(reduce(&empty, |a, b| a + b).is_err());
/// ```
pub fn reduce<O, F, const N: usize>(operand: O, f: F) -> Result<OperandElem<O, N>, TensorError>
where
    O: IntoOperand<N>,
    F: Fn(OperandElem<O, N>, OperandElem<O, N>) -> OperandElem<O, N>,
{
    let operand = operand.into_operand();
    let mut elems = operand.iter();
    let first = elems.next().ok_or(TensorError::EmptyReduction)?;
    Ok(elems.fold(first, f))
}

/// Fold every element in row-major order from `init`.
pub fn fold<O, T, F, const N: usize>(operand: O, init: T, f: F) -> T
where
    O: IntoOperand<N>,
    F: FnMut(T, OperandElem<O, N>) -> T,
{
    operand.into_operand().iter().fold(init, f)
}

/// Sum of all elements; zero for an empty operand.
pub fn sum<O, const N: usize>(operand: O) -> OperandElem<O, N>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: Zero,
{
    fold(operand, Zero::zero(), |acc, x| acc + x)
}

/// Product of all elements; one for an empty operand.
pub fn prod<O, const N: usize>(operand: O) -> OperandElem<O, N>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: One,
{
    fold(operand, One::one(), |acc, x| acc * x)
}

/// Largest element. Unordered values (NaN) never replace the running maximum.
///
/// # Errors
///
/// Returns `TensorError::EmptyReduction` if the operand has no elements.
pub fn max<O, const N: usize>(operand: O) -> Result<OperandElem<O, N>, TensorError>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: PartialOrd,
{
    reduce(operand, |a, b| if b > a { b } else { a })
}

/// Smallest element. Unordered values (NaN) never replace the running minimum.
///
/// # Errors
///
/// Returns `TensorError::EmptyReduction` if the operand has no elements.
pub fn min<O, const N: usize>(operand: O) -> Result<OperandElem<O, N>, TensorError>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: PartialOrd,
{
    reduce(operand, |a, b| if b < a { b } else { a })
}

/// True if every element is true; true for an empty operand.
pub fn all<O, const N: usize>(operand: O) -> bool
where
    O: IntoOperand<N>,
    O::Expr: Expr<N, Elem = bool>,
{
    operand.into_operand().iter().all(|x| x)
}

/// True if any element is true; false for an empty operand.
pub fn any<O, const N: usize>(operand: O) -> bool
where
    O: IntoOperand<N>,
    O::Expr: Expr<N, Elem = bool>,
{
    operand.into_operand().iter().any(|x| x)
}

/// True if both operands have the same shape and equal elements.
///
/// Operands of different rank are never equal.
pub fn array_equal<A, B, const N: usize, const M: usize>(a: A, b: B) -> bool
where
    A: IntoOperand<N>,
    B: IntoOperand<M>,
    OperandElem<A, N>: PartialEq<OperandElem<B, M>>,
{
    let a = a.into_operand();
    let b = b.into_operand();
    if N != M || a.shape() != b.shape() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

/// True if `|a - b| <= atol + rtol * |b|` holds element-wise after
/// broadcasting. NaN is never close to anything.
///
/// # Errors
///
/// Returns `TensorError::ShapeMismatch` if the shapes do not broadcast.
///
/// # Examples
///
/// ```
/// use ndexpr::{allclose, Tensor};
///
/// let a = Tensor::from_vec(vec![1.0, 2.0], [2]).unwrap();
/// let b = Tensor::from_vec(vec![1.0 + 1e-12, 2.0], [2]).unwrap();
/// assert!(allclose(&a, &b, 1e-9, 0.0).unwrap());
/// assert!(!allclose(&a, 1.0, 1e-9, 0.0).unwrap());
/// ```
pub fn allclose<L, R, T, const N: usize>(
    lhs: L,
    rhs: R,
    rtol: T,
    atol: T,
) -> Result<bool, TensorError>
where
    L: IntoOperand<N>,
    R: IntoOperand<N>,
    L::Expr: Expr<N, Elem = T>,
    R::Expr: Expr<N, Elem = T>,
    T: Float,
{
    let close = apply_binary(lhs, rhs, move |a: T, b: T| (a - b).abs() <= atol + rtol * b.abs())?;
    Ok(all(&close))
}

/// Running fold along `axis`: `out[.., k, ..] = f(out[.., k-1, ..], src[.., k, ..])`.
///
/// The result has the operand's shape and row-major layout.
///
/// # Errors
///
/// Returns `TensorError::AxisOutOfBounds` if `axis >= N`.
///
/// # Examples
///
/// ```
/// use ndexpr::{accumulate, Tensor};
///
/// let t = Tensor::from_vec(vec![3, 1, 4, 1, 5, 9], [2, 3]).unwrap();
/// let running_max = accumulate(&t, 1, |a: i32, b: i32| a.max(b)).unwrap();
/// assert_eq!(running_max.into_vec(), vec![3, 3, 4, 1, 5, 9]);
/// ```
pub fn accumulate<O, F, const N: usize>(
    operand: O,
    axis: usize,
    f: F,
) -> Result<Tensor<OperandElem<O, N>, N>, TensorError>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: Clone,
    F: Fn(OperandElem<O, N>, OperandElem<O, N>) -> OperandElem<O, N>,
{
    check_axis::<N>(axis)?;
    let operand = operand.into_operand();
    let mut out = operand.copy_with_layout(Layout::RowMajor);
    let shape = out.shape();
    let extent = shape[axis];
    let lanes = shape.with_axis(axis, 1);
    for flat in 0..lanes.size() {
        let mut index = crate::shape::unravel_index(flat, &lanes, Layout::RowMajor);
        for k in 1..extent {
            index[axis] = k - 1;
            let prev = out[index].clone();
            index[axis] = k;
            let cur = out[index].clone();
            out[index] = f(prev, cur);
        }
    }
    Ok(out)
}

/// Running sum along `axis`.
///
/// # Errors
///
/// Returns `TensorError::AxisOutOfBounds` if `axis >= N`.
pub fn cumsum<O, const N: usize>(
    operand: O,
    axis: usize,
) -> Result<Tensor<OperandElem<O, N>, N>, TensorError>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: Clone + Add<Output = OperandElem<O, N>>,
{
    accumulate(operand, axis, |a, b| a + b)
}

/// Running product along `axis`.
///
/// # Errors
///
/// Returns `TensorError::AxisOutOfBounds` if `axis >= N`.
pub fn cumprod<O, const N: usize>(
    operand: O,
    axis: usize,
) -> Result<Tensor<OperandElem<O, N>, N>, TensorError>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: Clone + Mul<Output = OperandElem<O, N>>,
{
    accumulate(operand, axis, |a, b| a * b)
}

/// Largest minus smallest element along `axis`.
///
/// # Errors
///
/// `AxisOutOfBounds` for a bad axis; `EmptyReduction` for an empty axis.
#[allow(clippy::type_complexity)]
pub fn ptp_axis<O, const N: usize>(
    operand: O,
    axis: usize,
) -> Result<
    AxisReduce<
        impl for<'x> Fn(AxisIter<'x, O::Expr, N>) -> OperandElem<O, N>,
        O::Expr,
        OperandElem<O, N>,
        N,
    >,
    TensorError,
>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: PartialOrd + Clone + Sub<Output = OperandElem<O, N>>,
{
    let operand = operand.into_operand();
    check_axis::<N>(axis)?;
    if operand.shape()[axis] == 0 {
        return Err(TensorError::EmptyReduction);
    }
    let lane_range = |mut lane: AxisIter<'_, O::Expr, N>| -> OperandElem<O, N> {
        let Some(first) = lane.next() else {
            unreachable!("reduced axis checked non-empty")
        };
        let (lo, hi) = lane.fold((first.clone(), first), |(lo, hi), x| {
            let lo = if x < lo { x.clone() } else { lo };
            let hi = if x > hi { x } else { hi };
            (lo, hi)
        });
        hi - lo
    };
    AxisReduce::new(lane_range, operand, &[axis])
}
