//! Lazy shape-changing nodes.
//!
//! Each node keeps its operands and maps an output index back to a source
//! index on access, the same way the element-wise nodes do. Nothing is
//! copied until the result is materialized.

use num_traits::AsPrimitive;

use crate::error::TensorError;
use crate::expr::functional::Cast;
use crate::expr::{Expr, IntoOperand, Unary};
use crate::shape::{
    broadcast_index, check_axis, check_broadcast_to, ravel_index, unravel_index, Index, Layout,
    Shape,
};

/// Read-only broadcast of an operand to a larger shape of the same rank.
#[derive(Debug, Clone, Copy)]
pub struct Broadcast<A, const N: usize> {
    operand: A,
    src_shape: Shape<N>,
    shape: Shape<N>,
}

impl<A: Expr<N>, const N: usize> Expr<N> for Broadcast<A, N> {
    type Elem = A::Elem;

    fn shape(&self) -> Shape<N> {
        self.shape
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> A::Elem {
        self.operand.eval(&broadcast_index(index, &self.src_shape))
    }
}

/// Repeat `operand` along its extent-1 axes until it has `shape`.
///
/// # Errors
///
/// Returns `TensorError::ShapeMismatch` if some axis of the operand is
/// neither 1 nor equal to the target extent.
///
/// # Examples
///
/// ```
/// use ndexpr::{broadcast_to, Expr};
///
/// let b = broadcast_to(5, [2, 2]).unwrap();
/// assert_eq!(b.copy().into_vec(), vec![5, 5, 5, 5]);
/// ```
pub fn broadcast_to<O, const N: usize>(
    operand: O,
    shape: impl Into<Shape<N>>,
) -> Result<Broadcast<O::Expr, N>, TensorError>
where
    O: IntoOperand<N>,
{
    let operand = operand.into_operand();
    let shape = shape.into();
    let src_shape = operand.shape();
    check_broadcast_to(&src_shape, &shape)?;
    Ok(Broadcast {
        operand,
        src_shape,
        shape,
    })
}

/// Rank-`M` operand read as rank `N` with the same row-major element order.
#[derive(Debug, Clone, Copy)]
pub struct Reshape<A, const M: usize, const N: usize> {
    operand: A,
    src_shape: Shape<M>,
    shape: Shape<N>,
}

impl<A: Expr<M>, const M: usize, const N: usize> Expr<N> for Reshape<A, M, N> {
    type Elem = A::Elem;

    fn shape(&self) -> Shape<N> {
        self.shape
    }

    #[inline]
    fn eval(&self, index: &Index<N>) -> A::Elem {
        let flat = ravel_index(index, &self.shape, Layout::RowMajor);
        self.operand
            .eval(&unravel_index(flat, &self.src_shape, Layout::RowMajor))
    }
}

/// Lazily reinterpret `operand` with a new shape of equal size.
///
/// # Errors
///
/// Returns `TensorError::SizeMismatch` if the element counts differ.
pub fn reshape<O, const M: usize, const N: usize>(
    operand: O,
    shape: impl Into<Shape<N>>,
) -> Result<Reshape<O::Expr, M, N>, TensorError>
where
    O: IntoOperand<M>,
{
    let operand = operand.into_operand();
    let shape = shape.into();
    let src_shape = operand.shape();
    if src_shape.size() != shape.size() {
        return Err(TensorError::SizeMismatch {
            expected: shape.size(),
            actual: src_shape.size(),
        });
    }
    Ok(Reshape {
        operand,
        src_shape,
        shape,
    })
}

/// Row-major flattening into a rank-1 expression.
pub fn flatten<O, const M: usize>(operand: O) -> Reshape<O::Expr, M, 1>
where
    O: IntoOperand<M>,
{
    let operand = operand.into_operand();
    let src_shape = operand.shape();
    Reshape {
        operand,
        src_shape,
        shape: Shape::new([src_shape.size()]),
    }
}

/// Lazily convert every element with `as` semantics.
///
/// ```
/// use ndexpr::{astype, Expr, Tensor};
///
/// let t = Tensor::from_vec(vec![1.7, -2.2], [2]).unwrap();
/// let i: Tensor<i32, 1> = astype(&t).copy();
/// assert_eq!(i.into_vec(), vec![1, -2]);
/// ```
pub fn astype<U, O, const N: usize>(operand: O) -> Unary<Cast<U>, O::Expr, N>
where
    O: IntoOperand<N>,
    <O::Expr as Expr<N>>::Elem: AsPrimitive<U>,
    U: Copy + 'static,
{
    Unary::new(Cast::new(), operand.into_operand())
}

/// Operands joined end to end along one existing axis.
#[derive(Debug, Clone)]
pub struct Concatenate<E, const N: usize> {
    parts: Vec<E>,
    axis: usize,
    // offsets[k] is where part k starts along `axis`; the last entry is the total.
    offsets: Vec<usize>,
    shape: Shape<N>,
}

impl<E: Expr<N>, const N: usize> Expr<N> for Concatenate<E, N> {
    type Elem = E::Elem;

    fn shape(&self) -> Shape<N> {
        self.shape
    }

    fn eval(&self, index: &Index<N>) -> E::Elem {
        let pos = index[self.axis];
        let part = self.offsets.partition_point(|&start| start <= pos) - 1;
        let mut local = *index;
        local[self.axis] = pos - self.offsets[part];
        self.parts[part].eval(&local)
    }
}

/// Join operands along `axis`. All other extents must agree.
///
/// # Errors
///
/// `InvalidArgument` for an empty list, `AxisOutOfBounds` for a bad axis,
/// `ShapeMismatch` if a non-joined extent differs.
///
/// # Examples
///
/// ```
/// use ndexpr::{concatenate, Expr, Tensor};
///
/// let a = Tensor::from_vec(vec![1, 2, 3, 4], [2, 2]).unwrap();
/// let b = Tensor::from_vec(vec![5, 6], [1, 2]).unwrap();
/// let c = concatenate([&a, &b], 0).unwrap();
/// assert_eq!(c.shape(), [3, 2]);
/// assert_eq!(c.copy().into_vec(), vec![1, 2, 3, 4, 5, 6]);
/// ```
pub fn concatenate<I, O, const N: usize>(
    parts: I,
    axis: usize,
) -> Result<Concatenate<O::Expr, N>, TensorError>
where
    I: IntoIterator<Item = O>,
    O: IntoOperand<N>,
{
    check_axis::<N>(axis)?;
    let parts: Vec<O::Expr> = parts.into_iter().map(IntoOperand::into_operand).collect();
    let Some(first) = parts.first() else {
        return Err(TensorError::invalid("cannot concatenate an empty list"));
    };
    let mut shape = first.shape();
    let mut offsets = Vec::with_capacity(parts.len() + 1);
    let mut total = 0usize;
    for part in &parts {
        let part_shape = part.shape();
        if (0..N).any(|k| k != axis && part_shape[k] != shape[k]) {
            return Err(TensorError::shapes(shape.dims(), part_shape.dims()));
        }
        offsets.push(total);
        total += part_shape[axis];
    }
    offsets.push(total);
    shape[axis] = total;
    Ok(Concatenate {
        parts,
        axis,
        offsets,
        shape,
    })
}

/// Rank-`M` operands of equal shape stacked along a new axis of a rank-`N` result.
#[derive(Debug, Clone)]
pub struct Stack<E, const M: usize, const N: usize> {
    parts: Vec<E>,
    axis: usize,
    shape: Shape<N>,
}

impl<E: Expr<M>, const M: usize, const N: usize> Expr<N> for Stack<E, M, N> {
    type Elem = E::Elem;

    fn shape(&self) -> Shape<N> {
        self.shape
    }

    fn eval(&self, index: &Index<N>) -> E::Elem {
        let mut src = [0usize; M];
        src[..self.axis].copy_from_slice(&index[..self.axis]);
        src[self.axis..].copy_from_slice(&index[self.axis + 1..]);
        self.parts[index[self.axis]].eval(&Shape::new(src))
    }
}

/// Stack equal-shape operands along a new axis inserted at `axis`.
///
/// `N` must equal `M + 1`; this is checked at compile time.
///
/// # Errors
///
/// `InvalidArgument` for an empty list, `AxisOutOfBounds` if `axis > M`,
/// `ShapeMismatch` if the operand shapes differ.
///
/// # Examples
///
/// ```
/// use ndexpr::{stack, Expr, Tensor};
///
/// let a = Tensor::from_vec(vec![1, 2], [2]).unwrap();
/// let b = Tensor::from_vec(vec![3, 4], [2]).unwrap();
/// let rows: Tensor<i32, 2> = stack([&a, &b], 0).unwrap().copy();
/// assert_eq!(rows.into_vec(), vec![1, 2, 3, 4]);
/// let cols: Tensor<i32, 2> = stack([&a, &b], 1).unwrap().copy();
/// assert_eq!(cols.into_vec(), vec![1, 3, 2, 4]);
/// ```
pub fn stack<I, O, const M: usize, const N: usize>(
    parts: I,
    axis: usize,
) -> Result<Stack<O::Expr, M, N>, TensorError>
where
    I: IntoIterator<Item = O>,
    O: IntoOperand<M>,
{
    const { assert!(N == M + 1, "stacking adds exactly one axis") };
    check_axis::<N>(axis)?;
    let parts: Vec<O::Expr> = parts.into_iter().map(IntoOperand::into_operand).collect();
    let Some(first) = parts.first() else {
        return Err(TensorError::invalid("cannot stack an empty list"));
    };
    let part_shape = first.shape();
    if let Some(bad) = parts.iter().find(|p| p.shape() != part_shape) {
        return Err(TensorError::shapes(part_shape.dims(), bad.shape().dims()));
    }
    let mut dims = [0usize; N];
    dims[..axis].copy_from_slice(&part_shape[..axis]);
    dims[axis] = parts.len();
    dims[axis + 1..].copy_from_slice(&part_shape[axis..]);
    Ok(Stack {
        parts,
        axis,
        shape: Shape::new(dims),
    })
}

/// How [`pad`] fills positions outside the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadMode<T> {
    /// A fixed value.
    Constant(T),
    /// Repeat the nearest edge element.
    Edge,
    /// Continue periodically from the opposite edge.
    Wrap,
    /// Mirror without repeating the edge element (`3 2 | 1 2 3 | 2 1`).
    Reflect,
    /// Mirror including the edge element (`2 1 | 1 2 3 | 3 2`).
    Symmetric,
}

/// Operand surrounded by padding on every axis.
#[derive(Debug, Clone)]
pub struct Pad<A, T, const N: usize> {
    operand: A,
    src_shape: Shape<N>,
    before: [usize; N],
    shape: Shape<N>,
    mode: PadMode<T>,
}

/// Source coordinate for padded coordinate `i` (already shifted by the
/// leading width) on an axis of extent `n`, or `None` for a constant fill.
fn pad_source<T>(mode: &PadMode<T>, i: isize, n: usize) -> Option<usize> {
    let n = n as isize;
    if (0..n).contains(&i) {
        return Some(i as usize);
    }
    let src = match mode {
        PadMode::Constant(_) => return None,
        PadMode::Edge => i.clamp(0, n - 1),
        PadMode::Wrap => i.rem_euclid(n),
        PadMode::Reflect => {
            if n == 1 {
                0
            } else {
                let period = 2 * n - 2;
                let m = i.rem_euclid(period);
                if m >= n { period - m } else { m }
            }
        }
        PadMode::Symmetric => {
            let period = 2 * n;
            let m = i.rem_euclid(period);
            if m >= n { period - 1 - m } else { m }
        }
    };
    Some(src as usize)
}

impl<A, T, const N: usize> Expr<N> for Pad<A, T, N>
where
    A: Expr<N, Elem = T>,
    T: Clone,
{
    type Elem = T;

    fn shape(&self) -> Shape<N> {
        self.shape
    }

    fn eval(&self, index: &Index<N>) -> T {
        let mut src = Shape::zeros();
        for k in 0..N {
            let shifted = index[k] as isize - self.before[k] as isize;
            match pad_source(&self.mode, shifted, self.src_shape[k]) {
                Some(s) => src[k] = s,
                None => match &self.mode {
                    PadMode::Constant(value) => return value.clone(),
                    _ => unreachable!("only constant padding has no source"),
                },
            }
        }
        self.operand.eval(&src)
    }
}

/// Pad every axis `k` with `widths[k].0` leading and `widths[k].1` trailing
/// positions.
///
/// # Errors
///
/// Returns `TensorError::InvalidArgument` when a non-constant mode has to
/// pad an axis of extent zero.
///
/// # Examples
///
/// ```
/// use ndexpr::{pad, Expr, PadMode, Tensor};
///
/// let t = Tensor::from_vec(vec![1, 2, 3], [3]).unwrap();
/// let p = pad(&t, [(2, 2)], PadMode::Reflect).unwrap();
/// assert_eq!(p.copy().into_vec(), vec![3, 2, 1, 2, 3, 2, 1]);
/// let s = pad(&t, [(2, 2)], PadMode::Symmetric).unwrap();
/// assert_eq!(s.copy().into_vec(), vec![2, 1, 1, 2, 3, 3, 2]);
/// ```
pub fn pad<O, const N: usize>(
    operand: O,
    widths: [(usize, usize); N],
    mode: PadMode<<O::Expr as Expr<N>>::Elem>,
) -> Result<Pad<O::Expr, <O::Expr as Expr<N>>::Elem, N>, TensorError>
where
    O: IntoOperand<N>,
{
    let operand = operand.into_operand();
    let src_shape = operand.shape();
    let mut shape = src_shape;
    let mut before = [0usize; N];
    for k in 0..N {
        let (lead, trail) = widths[k];
        if src_shape[k] == 0 && lead + trail > 0 && !matches!(mode, PadMode::Constant(_)) {
            return Err(TensorError::invalid(format!(
                "cannot pad empty axis {k} except with a constant"
            )));
        }
        before[k] = lead;
        shape[k] = src_shape[k] + lead + trail;
    }
    Ok(Pad {
        operand,
        src_shape,
        before,
        shape,
        mode,
    })
}
