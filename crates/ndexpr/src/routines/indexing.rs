//! Gathers, scatters and mask-driven selection.
//!
//! Flat positions are always row-major, whatever the layout of the tensor
//! involved. Every routine validates all of its indices before it reads or
//! writes a single element.

use crate::error::TensorError;
use crate::expr::{Expr, ExprMut, IntoOperand, OperandElem};
use crate::shape::{
    broadcast_all, broadcast_index, check_axis, check_broadcast_to, unravel_index, Index, Layout,
    Shape,
};
use crate::tensor::Tensor;
use crate::view::{IndirectView, IndirectViewMut};

fn check_positions(positions: &[usize], size: usize) -> Result<(), TensorError> {
    match positions.iter().find(|&&p| p >= size) {
        Some(&index) => Err(TensorError::IndexOutOfBounds {
            axis: 0,
            index,
            dim_size: size,
        }),
        None => Ok(()),
    }
}

fn check_value_count(values: usize, targets: usize) -> Result<(), TensorError> {
    if values == 1 || values == targets {
        Ok(())
    } else {
        Err(TensorError::invalid(format!(
            "{values} values cannot fill {targets} positions"
        )))
    }
}

/// Elements at the given row-major positions, as a new rank-1 tensor.
///
/// The result owns its data and is independent of `operand`.
///
/// # Errors
///
/// Returns `TensorError::IndexOutOfBounds` if a position is `>= size()`.
///
/// # Examples
///
/// ```
/// use ndexpr::{take, Tensor};
///
/// let t = Tensor::from_vec(vec![10, 20, 30], [3]).unwrap();
/// assert_eq!(take(&t, &[2, 0]).unwrap().into_vec(), vec![30, 10]);
/// ```
pub fn take<O, const N: usize>(
    operand: O,
    positions: &[usize],
) -> Result<Tensor<OperandElem<O, N>, 1>, TensorError>
where
    O: IntoOperand<N>,
{
    let operand = operand.into_operand();
    let shape = operand.shape();
    check_positions(positions, shape.size())?;
    let data = positions
        .iter()
        .map(|&p| operand.eval(&unravel_index(p, &shape, Layout::RowMajor)))
        .collect();
    Ok(Tensor::from_parts(data, Shape::new([positions.len()]), Layout::RowMajor))
}

/// Slices along `axis` picked by `indices`, in the given order.
///
/// # Errors
///
/// `AxisOutOfBounds` for a bad axis, `IndexOutOfBounds` for an index past
/// the axis extent.
///
/// # Examples
///
/// ```
/// use ndexpr::{take_axis, Tensor};
///
/// let t = Tensor::from_vec((0..6).collect(), [2, 3]).unwrap();
/// let cols = take_axis(&t, &[2, 2, 0], 1).unwrap();
/// assert_eq!(cols.into_vec(), vec![2, 2, 0, 5, 5, 3]);
/// ```
pub fn take_axis<O, const N: usize>(
    operand: O,
    indices: &[usize],
    axis: usize,
) -> Result<Tensor<OperandElem<O, N>, N>, TensorError>
where
    O: IntoOperand<N>,
{
    check_axis::<N>(axis)?;
    let operand = operand.into_operand();
    let shape = operand.shape();
    if let Some(&index) = indices.iter().find(|&&i| i >= shape[axis]) {
        return Err(TensorError::IndexOutOfBounds {
            axis,
            index,
            dim_size: shape[axis],
        });
    }
    Ok(Tensor::from_fn(shape.with_axis(axis, indices.len()), |index| {
        let mut src = *index;
        src[axis] = indices[index[axis]];
        operand.eval(&src)
    }))
}

/// Output shape and row-major source indices of an along-axis gather.
///
/// Off the gather axis the index array and the source broadcast against
/// each other; along it the index array supplies the extent.
fn along_axis_sources<I, const N: usize>(
    src_shape: &Shape<N>,
    indices: &I,
    axis: usize,
) -> Result<(Shape<N>, Vec<Index<N>>), TensorError>
where
    I: Expr<N, Elem = usize>,
{
    check_axis::<N>(axis)?;
    let idx_shape = indices.shape();
    let mut shape = idx_shape;
    for k in (0..N).filter(|&k| k != axis) {
        shape[k] = match (src_shape[k], idx_shape[k]) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            _ => return Err(TensorError::shapes(src_shape.dims(), idx_shape.dims())),
        };
    }
    let extent = src_shape[axis];
    let mut sources = Vec::with_capacity(shape.size());
    for flat in 0..shape.size() {
        let out = unravel_index(flat, &shape, Layout::RowMajor);
        let picked = indices.eval(&broadcast_index(&out, &idx_shape));
        if picked >= extent {
            return Err(TensorError::IndexOutOfBounds {
                axis,
                index: picked,
                dim_size: extent,
            });
        }
        let mut src = broadcast_index(&out, src_shape);
        src[axis] = picked;
        sources.push(src);
    }
    Ok((shape, sources))
}

/// `out[.., i, ..] = operand[.., indices[.., i, ..], ..]` along `axis`.
///
/// # Errors
///
/// `AxisOutOfBounds`, `ShapeMismatch` if the off-axis extents do not
/// broadcast, `IndexOutOfBounds` for an index past the axis extent.
///
/// # Examples
///
/// ```
/// use ndexpr::{take_along_axis, Tensor};
///
/// let t = Tensor::from_vec(vec![10, 30, 20, 60, 40, 50], [2, 3]).unwrap();
/// let order = Tensor::from_vec(vec![0usize, 2, 1, 1, 2, 0], [2, 3]).unwrap();
/// let sorted = take_along_axis(&t, &order, 1).unwrap();
/// assert_eq!(sorted.into_vec(), vec![10, 20, 30, 40, 50, 60]);
/// ```
pub fn take_along_axis<O, I, const N: usize>(
    operand: O,
    indices: I,
    axis: usize,
) -> Result<Tensor<OperandElem<O, N>, N>, TensorError>
where
    O: IntoOperand<N>,
    I: IntoOperand<N>,
    I::Expr: Expr<N, Elem = usize>,
{
    let operand = operand.into_operand();
    let (shape, sources) = along_axis_sources(&operand.shape(), &indices.into_operand(), axis)?;
    let data = sources.iter().map(|src| operand.eval(src)).collect();
    Ok(Tensor::from_parts(data, shape, Layout::RowMajor))
}

/// Like [`take_along_axis`] but returns a view into `tensor` instead of a copy.
///
/// # Errors
///
/// Same as [`take_along_axis`].
pub fn take_along_axis_view<'a, T, I, const N: usize>(
    tensor: &'a Tensor<T, N>,
    indices: I,
    axis: usize,
) -> Result<IndirectView<'a, T, N>, TensorError>
where
    I: IntoOperand<N>,
    I::Expr: Expr<N, Elem = usize>,
{
    let (shape, sources) = along_axis_sources(&tensor.shape(), &indices.into_operand(), axis)?;
    let offsets = sources.iter().map(|src| tensor.offset(src)).collect();
    Ok(IndirectView::from_checked(tensor.data(), offsets, shape))
}

/// Scatter `values` into `tensor` at the along-axis positions named by
/// `indices`; `values` broadcasts to the shape of the index array.
///
/// When an index repeats, the last write wins.
///
/// # Errors
///
/// Same as [`take_along_axis`], plus `ShapeMismatch` if `values` does not
/// broadcast. Nothing is written on error.
///
/// # Examples
///
/// ```
/// use ndexpr::{put_along_axis, Tensor};
///
/// let mut t = Tensor::<i32, 2>::zeros([2, 3]);
/// let at = Tensor::from_vec(vec![2usize, 0], [2, 1]).unwrap();
/// put_along_axis(&mut t, &at, 9, 1).unwrap();
/// assert_eq!(t.into_vec(), vec![0, 0, 9, 9, 0, 0]);
/// ```
pub fn put_along_axis<T, I, V, const N: usize>(
    tensor: &mut Tensor<T, N>,
    indices: I,
    values: V,
    axis: usize,
) -> Result<(), TensorError>
where
    T: Clone,
    I: IntoOperand<N>,
    I::Expr: Expr<N, Elem = usize>,
    V: IntoOperand<N>,
    V::Expr: Expr<N, Elem = T>,
{
    let (shape, sources) = along_axis_sources(&tensor.shape(), &indices.into_operand(), axis)?;
    let offsets = sources.iter().map(|src| tensor.offset(src)).collect();
    let mut targets = IndirectViewMut::from_checked(tensor.data_mut(), offsets, shape);
    targets.assign_from(values)
}

/// Write `values` at row-major `positions` of `target`.
///
/// `values` holds either one value for every position or a single value
/// used for all of them.
///
/// # Errors
///
/// `InvalidArgument` for any other number of values, `IndexOutOfBounds`
/// for a position past the end. Nothing is written on error.
pub fn put<E, const N: usize>(
    target: &mut E,
    positions: &[usize],
    values: &[E::Elem],
) -> Result<(), TensorError>
where
    E: ExprMut<N> + ?Sized,
    E::Elem: Clone,
{
    let shape = target.shape();
    check_value_count(values.len(), positions.len())?;
    check_positions(positions, shape.size())?;
    for (k, &p) in positions.iter().enumerate() {
        let value = if values.len() == 1 { &values[0] } else { &values[k] };
        *target.eval_mut(&unravel_index(p, &shape, Layout::RowMajor)) = value.clone();
    }
    Ok(())
}

/// Elements of `tensor` where `cond` is true, in row-major order.
///
/// # Errors
///
/// Returns `TensorError::ShapeMismatch` if `cond` does not have the shape of `tensor`.
///
/// # Examples
///
/// ```
/// use ndexpr::{extract, greater, Tensor};
///
/// let t = Tensor::from_vec(vec![3, -1, 4, -1, 5], [5]).unwrap();
/// let positive = extract(greater(&t, 0).unwrap(), &t).unwrap();
/// assert_eq!(positive.into_vec(), vec![3, 4, 5]);
/// ```
pub fn extract<M, T, const N: usize>(
    cond: M,
    tensor: &Tensor<T, N>,
) -> Result<Tensor<T, 1>, TensorError>
where
    M: IntoOperand<N>,
    M::Expr: Expr<N, Elem = bool>,
    T: Clone,
{
    Ok(tensor.masked(cond)?.copy())
}

/// Write `values` in order into the positions of `target` where `mask` is true.
///
/// `values` holds one value per selected position or a single value for all.
///
/// # Errors
///
/// `ShapeMismatch` if the mask shape differs from `target`, `InvalidArgument`
/// for a wrong number of values. Nothing is written on error.
pub fn place<E, M, const N: usize>(
    target: &mut E,
    mask: M,
    values: &[E::Elem],
) -> Result<(), TensorError>
where
    E: ExprMut<N> + ?Sized,
    E::Elem: Clone,
    M: IntoOperand<N>,
    M::Expr: Expr<N, Elem = bool>,
{
    let mask = mask.into_operand();
    let shape = target.shape();
    if mask.shape() != shape {
        return Err(TensorError::shapes(mask.shape().dims(), shape.dims()));
    }
    let selected: Vec<Index<N>> = mask
        .indexed_iter()
        .filter_map(|(index, hit)| hit.then_some(index))
        .collect();
    check_value_count(values.len(), selected.len())?;
    for (k, index) in selected.iter().enumerate() {
        let value = if values.len() == 1 { &values[0] } else { &values[k] };
        *target.eval_mut(index) = value.clone();
    }
    Ok(())
}

/// `target[i] = values[i]` wherever `mask[i]` is true.
///
/// Both `mask` and `values` broadcast to the shape of `target`.
///
/// # Errors
///
/// Returns `TensorError::ShapeMismatch` before any write if either does not broadcast.
///
/// # Examples
///
/// ```
/// use ndexpr::{less, putmask, Expr, Tensor};
///
/// let mut t = Tensor::from_vec(vec![1.0f64, -2.0, 3.0, -4.0], [2, 2]).unwrap();
/// let negative = less(&t, 0.0).unwrap().copy();
/// putmask(&mut t, &negative, 0.0).unwrap();
/// assert_eq!(t.into_vec(), vec![1.0, 0.0, 3.0, 0.0]);
/// ```
pub fn putmask<E, M, V, const N: usize>(
    target: &mut E,
    mask: M,
    values: V,
) -> Result<(), TensorError>
where
    E: ExprMut<N> + ?Sized,
    M: IntoOperand<N>,
    M::Expr: Expr<N, Elem = bool>,
    V: IntoOperand<N>,
    V::Expr: Expr<N, Elem = E::Elem>,
{
    let mask = mask.into_operand();
    let values = values.into_operand();
    let shape = target.shape();
    let mask_shape = mask.shape();
    let values_shape = values.shape();
    check_broadcast_to(&mask_shape, &shape)?;
    check_broadcast_to(&values_shape, &shape)?;
    target.for_each_mut(|index, slot| {
        if mask.eval(&broadcast_index(index, &mask_shape)) {
            *slot = values.eval(&broadcast_index(index, &values_shape));
        }
    });
    Ok(())
}

/// Element-wise first match: `choices[k][i]` for the first `k` with
/// `conds[k][i]` true, otherwise `default[i]`. Everything broadcasts.
///
/// # Errors
///
/// `InvalidArgument` if the lists are empty or of different lengths,
/// `ShapeMismatch` if the shapes do not broadcast.
///
/// # Examples
///
/// ```
/// use ndexpr::{greater, less, select, Expr, Tensor};
///
/// let t = Tensor::from_vec(vec![-5, 0, 5], [3]).unwrap();
/// let conds = [less(&t, 0).unwrap().copy(), greater(&t, 0).unwrap().copy()];
/// let choices = [Tensor::full([3], -1), Tensor::full([3], 1)];
/// let sign = select(&conds, &choices, 0).unwrap();
/// assert_eq!(sign.into_vec(), vec![-1, 0, 1]);
/// ```
pub fn select<C, X, D, const N: usize>(
    conds: &[C],
    choices: &[X],
    default: D,
) -> Result<Tensor<X::Elem, N>, TensorError>
where
    C: Expr<N, Elem = bool>,
    X: Expr<N>,
    D: IntoOperand<N>,
    D::Expr: Expr<N, Elem = X::Elem>,
{
    if conds.is_empty() || conds.len() != choices.len() {
        return Err(TensorError::invalid(format!(
            "select needs matching non-empty lists, got {} conditions and {} choices",
            conds.len(),
            choices.len()
        )));
    }
    let default = default.into_operand();
    let cond_shapes: Vec<Shape<N>> = conds.iter().map(Expr::shape).collect();
    let choice_shapes: Vec<Shape<N>> = choices.iter().map(Expr::shape).collect();
    let default_shape = default.shape();
    let mut all_shapes = cond_shapes.clone();
    all_shapes.extend_from_slice(&choice_shapes);
    all_shapes.push(default_shape);
    let shape = broadcast_all(&all_shapes)?;
    Ok(Tensor::from_fn(shape, |index| {
        for (k, cond) in conds.iter().enumerate() {
            if cond.eval(&broadcast_index(index, &cond_shapes[k])) {
                return choices[k].eval(&broadcast_index(index, &choice_shapes[k]));
            }
        }
        default.eval(&broadcast_index(index, &default_shape))
    }))
}

/// Slices along `axis` whose position is flagged in `cond`.
///
/// `cond` may be shorter than the axis; missing entries count as false.
///
/// # Errors
///
/// `AxisOutOfBounds` for a bad axis, `InvalidArgument` if `cond` is longer
/// than the axis.
///
/// # Examples
///
/// ```
/// use ndexpr::{compress, Tensor};
///
/// let t = Tensor::from_vec((0..6).collect(), [3, 2]).unwrap();
/// let rows = compress(&[true, false, true], &t, 0).unwrap();
/// assert_eq!(rows.into_vec(), vec![0, 1, 4, 5]);
/// ```
pub fn compress<O, const N: usize>(
    cond: &[bool],
    operand: O,
    axis: usize,
) -> Result<Tensor<OperandElem<O, N>, N>, TensorError>
where
    O: IntoOperand<N>,
{
    check_axis::<N>(axis)?;
    let operand = operand.into_operand();
    let extent = operand.shape()[axis];
    if cond.len() > extent {
        return Err(TensorError::invalid(format!(
            "condition of length {} is longer than axis {axis} of extent {extent}",
            cond.len()
        )));
    }
    let kept: Vec<usize> = cond
        .iter()
        .enumerate()
        .filter_map(|(i, &keep)| keep.then_some(i))
        .collect();
    take_axis(&operand, &kept, axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::expr::ops::greater;

    fn sample() -> Tensor<i32, 2> {
        Tensor::from_vec((0..6).collect(), [2, 3]).unwrap()
    }

    #[test]
    fn test_take_is_independent_of_source() {
        let mut t = Tensor::from_vec(vec![10, 20, 30], [3]).unwrap();
        let picked = take(&t, &[2, 0]).unwrap();
        t.fill(0);
        assert_eq!(picked.into_vec(), vec![30, 10]);
    }

    #[test]
    fn test_take_uses_row_major_positions() {
        let t = sample().to_layout(Layout::ColumnMajor);
        assert_eq!(take(&t, &[1, 3, 5]).unwrap().into_vec(), vec![1, 3, 5]);
        assert!(matches!(
            take(&t, &[6]),
            Err(TensorError::IndexOutOfBounds { index: 6, dim_size: 6, .. })
        ));
    }

    #[test]
    fn test_take_axis_errors() {
        let t = sample();
        assert_eq!(take_axis(&t, &[1], 0).unwrap().into_vec(), vec![3, 4, 5]);
        assert_eq!(take_axis(&t, &[3], 1).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(take_axis(&t, &[0], 2).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(take_axis(&t, &[], 1).unwrap().shape(), [2, 0]);
    }

    #[test]
    fn test_take_along_axis_broadcasts_indices() {
        let t = sample();
        let first_col = Tensor::from_vec(vec![0usize], [1, 1]).unwrap();
        let picked = take_along_axis(&t, &first_col, 1).unwrap();
        assert_eq!(picked.shape(), [2, 1]);
        assert_eq!(picked.into_vec(), vec![0, 3]);

        let bad = Tensor::from_vec(vec![0usize, 3], [2, 1]).unwrap();
        assert!(matches!(
            take_along_axis(&t, &bad, 1),
            Err(TensorError::IndexOutOfBounds { axis: 1, index: 3, dim_size: 3 })
        ));
    }

    #[test]
    fn test_take_along_axis_view_reads_source() {
        let t = sample();
        let idx = Tensor::from_vec(vec![1usize, 0, 1], [1, 3]).unwrap();
        let v = take_along_axis_view(&t, &idx, 0).unwrap();
        assert_eq!(v.shape(), [1, 3]);
        assert_eq!(v.copy().into_vec(), vec![3, 1, 5]);
        assert_eq!(v.copy(), take_along_axis(&t, &idx, 0).unwrap());
    }

    #[test]
    fn test_put_along_axis_and_rejects() {
        let mut t = Tensor::<i32, 2>::zeros([2, 3]);
        let idx = Tensor::from_vec(vec![1usize, 2], [2, 1]).unwrap();
        let vals = Tensor::from_vec(vec![7, 8], [2, 1]).unwrap();
        put_along_axis(&mut t, &idx, &vals, 1).unwrap();
        assert_eq!(t.clone().into_vec(), vec![0, 7, 0, 0, 0, 8]);

        let wrong = Tensor::from_vec(vec![1, 2, 3], [1, 3]).unwrap();
        assert!(put_along_axis(&mut t, &idx, &wrong, 1).is_err());
        assert_eq!(t.into_vec(), vec![0, 7, 0, 0, 0, 8]);
    }

    #[test]
    fn test_put_value_rules() {
        let mut t = Tensor::<i32, 2>::zeros([2, 2]);
        put(&mut t, &[0, 3], &[5]).unwrap();
        assert_eq!(t.data(), &[5, 0, 0, 5]);
        put(&mut t, &[1, 2], &[6, 7]).unwrap();
        assert_eq!(t.data(), &[5, 6, 7, 5]);

        let err = put(&mut t, &[0, 1, 2], &[1, 2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(put(&mut t, &[0, 4], &[9, 9]).is_err());
        assert_eq!(t.data(), &[5, 6, 7, 5]);
    }

    #[test]
    fn test_put_through_view() {
        let mut t = sample();
        let mut col = t.view_mut().slice_axis(1, 1..2, 1).unwrap();
        put(&mut col, &[1], &[-1]).unwrap();
        assert_eq!(t[[1, 1]], -1);
    }

    #[test]
    fn test_extract_and_place() {
        let mut t = sample();
        let big = greater(&t, 2).unwrap();
        assert_eq!(extract(&big, &t).unwrap().into_vec(), vec![3, 4, 5]);

        let mask = big.copy();
        place(&mut t, &mask, &[30, 40, 50]).unwrap();
        assert_eq!(t.data(), &[0, 1, 2, 30, 40, 50]);
        place(&mut t, &mask, &[-1]).unwrap();
        assert_eq!(t.data(), &[0, 1, 2, -1, -1, -1]);
        assert!(place(&mut t, &mask, &[1, 2]).is_err());
    }

    #[test]
    fn test_putmask_broadcasts() {
        let mut t = sample();
        let mask = Tensor::from_vec(vec![true, false, true], [1, 3]).unwrap();
        let row = Tensor::from_vec(vec![100, 200], [2, 1]).unwrap();
        putmask(&mut t, &mask, &row).unwrap();
        assert_eq!(t.into_vec(), vec![100, 1, 100, 200, 4, 200]);
    }

    #[test]
    fn test_select_errors() {
        let t = sample();
        let conds: [Tensor<bool, 2>; 0] = [];
        let choices: [Tensor<i32, 2>; 0] = [];
        assert!(select(&conds, &choices, 0).is_err());
        let one = [greater(&t, 1).unwrap().copy()];
        assert!(select(&one, &[t.clone(), t.clone()], 0).is_err());
        let short = [Tensor::from_vec(vec![1, 2], [1, 2]).unwrap()];
        assert_eq!(
            select(&one, &short, 0).unwrap_err().kind(),
            ErrorKind::Shape
        );
    }

    #[test]
    fn test_compress_axis() {
        let t = sample();
        assert_eq!(compress(&[false, true], &t, 1).unwrap().into_vec(), vec![1, 4]);
        let rows = compress(&[false, true], &t, 0).unwrap();
        assert_eq!(rows.shape(), [1, 3]);
        assert_eq!(rows.into_vec(), vec![3, 4, 5]);
    }

    #[test]
    fn test_compress_short_and_empty_masks() {
        let t = sample();
        let short = compress(&[true], &t, 1).unwrap();
        assert_eq!(short.shape(), [2, 1]);
        assert_eq!(short.into_vec(), vec![0, 3]);

        let none = compress(&[false, false, false], &t, 1).unwrap();
        assert_eq!(none.shape(), [2, 0]);
        assert!(none.into_vec().is_empty());
        assert_eq!(compress(&[], &t, 0).unwrap().shape(), [0, 3]);
    }

    #[test]
    fn test_compress_rejects_long_mask() {
        let t = sample();
        let err = compress(&[true; 4], &t, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(compress(&[true], &t, 2).unwrap_err().kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_compress_lazy_operand() {
        let t = sample();
        let doubled = &t * 2;
        let picked = compress(&[true, false, true], doubled, 1).unwrap();
        assert_eq!(picked.into_vec(), vec![0, 4, 6, 10]);
    }

    #[test]
    fn test_extract_all_false_is_empty() {
        let t = sample();
        let none = greater(&t, 100).unwrap();
        let out = extract(&none, &t).unwrap();
        assert_eq!(out.shape(), [0]);
        assert!(out.into_vec().is_empty());
    }

    #[test]
    fn test_select_falls_back_to_default() {
        let t = sample();
        let never = [greater(&t, 100).unwrap().copy(), greater(&t, 50).unwrap().copy()];
        let choices = [Tensor::full([2, 3], 1), Tensor::full([2, 3], 2)];
        let out = select(&never, &choices, -7).unwrap();
        assert_eq!(out.into_vec(), vec![-7; 6]);

        let partial = [greater(&t, 3).unwrap().copy()];
        let row = Tensor::from_vec(vec![10, 20, 30], [1, 3]).unwrap();
        let out = select(&partial, &[t.clone()], &row).unwrap();
        assert_eq!(out.into_vec(), vec![10, 20, 30, 10, 4, 5]);
    }
}
