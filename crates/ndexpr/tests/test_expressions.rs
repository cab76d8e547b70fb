//! End-to-end tests of lazy expressions over tensors and views.
//!
//! # Coverage
//!
//! - Reverse, transpose and broadcast examples on a 2x3 tensor
//! - Laziness: idempotent materialization, no evaluation before `copy`
//! - View write-through and gather independence
//! - Reductions: identity on zeros, failure on empty input
//! - Compound assignment shape checks

use std::cell::Cell;

use approx::assert_relative_eq;
use ndexpr::{
    apply, broadcast_to, cumsum, greater, outer, reduce, reverse, shift, sum, sum_axis, take,
    transpose, where_, ErrorKind, Expr, ExprMut, Layout, Tensor,
};

fn a23() -> Tensor<i32, 2> {
    Tensor::from_vec((0..6).collect(), [2, 3]).unwrap()
}

// ============================================================================
// Remapping
// ============================================================================

/// Reversing axis 1 of 0..5 reshaped to (2,3) mirrors each row.
#[test]
fn test_reverse_rows() {
    let a = a23();
    let r = reverse(&a, 1).unwrap().copy();
    assert_eq!(r.into_vec(), vec![2, 1, 0, 5, 4, 3]);
}

/// Transpose swaps the shape and the coordinates.
#[test]
fn test_transpose_shape_and_element() {
    let a = a23();
    let t = a.transpose();
    assert_eq!(t.shape(), [3, 2]);
    assert_eq!(t[[1, 0]], 1);
    assert_eq!(t[[1, 0]], a[[0, 1]]);

    let lazy = transpose(&a);
    assert_eq!(lazy.shape(), [3, 2]);
    assert_eq!(lazy.eval(&[1, 0].into()), 1);
}

/// Transposing twice gives back the original tensor.
#[test]
fn test_transpose_involution() {
    let a = Tensor::from_vec((0..24).collect::<Vec<i64>>(), [2, 3, 4]).unwrap();
    let twice = transpose(transpose(&a)).copy();
    assert_eq!(twice, a);
    assert_eq!(a.transpose().transpose().copy(), a);
}

/// Shifting rotates elements with wrap-around in both directions.
#[test]
fn test_shift_rotates() {
    let a = a23();
    assert_eq!(shift(&a, 1, 1).unwrap().copy().into_vec(), vec![2, 0, 1, 5, 3, 4]);
    assert_eq!(shift(&a, -4, 1).unwrap().copy().into_vec(), vec![1, 2, 0, 4, 5, 3]);
}

// ============================================================================
// Broadcasting
// ============================================================================

/// A scalar broadcast to (2,2) reads as four copies.
#[test]
fn test_broadcast_scalar() {
    let b = broadcast_to(5, [2, 2]).unwrap();
    assert_eq!(b.shape(), [2, 2]);
    assert_eq!(b.copy().into_vec(), vec![5, 5, 5, 5]);
}

/// Incompatible shapes are rejected when the node is built.
#[test]
fn test_broadcast_rejects_incompatible() {
    let a = Tensor::<f64, 2>::zeros([2, 3]);
    let b = Tensor::<f64, 2>::zeros([3, 2]);
    let err = ndexpr::add(&a, &b).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);
    assert!(broadcast_to(&a, [4, 3]).is_err());
}

/// Row and column operands broadcast to a full matrix.
#[test]
fn test_row_plus_column() {
    let row = Tensor::from_vec(vec![1, 2, 3], [1, 3]).unwrap();
    let col = Tensor::from_vec(vec![10, 20], [2, 1]).unwrap();
    let m = (&row + &col).copy();
    assert_eq!(m.shape(), [2, 3]);
    assert_eq!(m.into_vec(), vec![11, 12, 13, 21, 22, 23]);
}

// ============================================================================
// Laziness
// ============================================================================

/// Building an expression does not evaluate anything; copying twice
/// evaluates every element once per copy and gives equal results.
#[test]
fn test_lazy_and_idempotent() {
    let calls = Cell::new(0usize);
    let a = a23();
    let expr = apply(&a, |x: i32| {
        calls.set(calls.get() + 1);
        x * 10
    });
    assert_eq!(calls.get(), 0);
    let first = expr.copy();
    assert_eq!(calls.get(), 6);
    let second = expr.copy();
    assert_eq!(calls.get(), 12);
    assert_eq!(first, second);
}

/// Column-major materialization keeps the logical contents.
#[test]
fn test_copy_with_layout_is_logical() {
    let a = a23();
    let expr = &a * 2;
    let row = expr.copy_with_layout(Layout::RowMajor);
    let col = expr.copy_with_layout(Layout::ColumnMajor);
    assert_eq!(row, col);
    assert_eq!(col.data(), &[0, 6, 2, 8, 4, 10]);
}

// ============================================================================
// Views and gathers
// ============================================================================

/// Writes through a mutable view land in the owning tensor.
#[test]
fn test_view_write_through() {
    let mut a = a23();
    {
        let mut v = a.view_mut().transpose();
        v[[2, 1]] = 100;
        v.set([0, 0], -1).unwrap();
    }
    assert_eq!(a[[1, 2]], 100);
    assert_eq!(a[[0, 0]], -1);
}

/// A gathered result is independent of later changes to the source.
#[test]
fn test_take_is_independent() {
    let mut src = Tensor::from_vec(vec![10, 20, 30], [3]).unwrap();
    let taken = take(&src, &[2, 0]).unwrap();
    src.fill(0);
    assert_eq!(taken.into_vec(), vec![30, 10]);
}

// ============================================================================
// Reductions
// ============================================================================

/// Summing zeros gives zero; reducing an empty tensor fails.
#[test]
fn test_reduce_identity_and_empty() {
    let z = Tensor::<f64, 2>::zeros([3, 4]);
    assert_eq!(reduce(&z, |x, y| x + y).unwrap(), 0.0);

    let empty = Tensor::<f64, 2>::zeros([0, 4]);
    let err = reduce(&empty, |x, y| x + y).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(sum(&empty), 0.0);
}

/// Axis sums of an expression collapse the axis to extent 1.
#[test]
fn test_sum_axis_of_expression() {
    let a = a23();
    let sq = apply(&a, |x: i32| x * x);
    let s = sum_axis(&sq, 0).unwrap();
    assert_eq!(s.shape(), [1, 3]);
    assert_eq!(s.copy().into_vec(), vec![9, 17, 29]);
}

/// Running sums along each axis.
#[test]
fn test_cumsum_axes() {
    let a = a23();
    assert_eq!(cumsum(&a, 1).unwrap().into_vec(), vec![0, 1, 3, 3, 7, 12]);
    assert_eq!(cumsum(&a, 0).unwrap().into_vec(), vec![0, 1, 2, 3, 5, 7]);
}

// ============================================================================
// Selection and outer products
// ============================================================================

/// `where_` picks from the two branches by a boolean expression.
#[test]
fn test_where_with_comparison() {
    let t = Tensor::from_vec(vec![-1.5, 2.0, -0.5, 4.0], [2, 2]).unwrap();
    let cond = greater(&t, 0.0).unwrap();
    let clipped = where_(cond, &t, 0.0).unwrap().copy();
    assert_eq!(clipped.into_vec(), vec![0.0, 2.0, 0.0, 4.0]);
}

/// Outer product of a vector and a matrix has rank 3.
#[test]
fn test_outer_rank() {
    let v = Tensor::from_vec(vec![1.0, 2.0], [2]).unwrap();
    let m = Tensor::from_vec(vec![1.0, 0.5, 0.25, 0.125], [2, 2]).unwrap();
    let o: Tensor<f64, 3> = outer(&v, &m).copy();
    assert_eq!(o.shape(), [2, 2, 2]);
    assert_relative_eq!(o[[1, 1, 0]], 0.5);
}

// ============================================================================
// Compound assignment
// ============================================================================

/// In-place arithmetic broadcasts the right operand.
#[test]
fn test_compound_assign_broadcast() {
    let mut a = Tensor::<f64, 2>::ones([2, 3]);
    let row = Tensor::from_vec(vec![1.0, 2.0, 3.0], [1, 3]).unwrap();
    a += &row;
    a *= 2.0;
    assert_eq!(a.into_vec(), vec![4.0, 6.0, 8.0, 4.0, 6.0, 8.0]);
}

/// A failing compound assignment leaves the destination untouched.
#[test]
fn test_compound_assign_checks_before_write() {
    let mut a = Tensor::<f64, 2>::ones([2, 3]);
    let bad = Tensor::<f64, 2>::ones([3, 3]);
    let err = a.try_add_assign(&bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);
    assert!(a.data().iter().all(|&x| x == 1.0));
}

/// The operator form panics with the shape error.
#[test]
#[should_panic(expected = "shape mismatch")]
fn test_compound_assign_operator_panics() {
    let mut a = Tensor::<f64, 2>::ones([2, 3]);
    let bad = Tensor::<f64, 2>::ones([2, 2]);
    a -= &bad;
}
