//! Tests for construction, shape and indexing routines, and math functions
//! used together through the public API.
//!
//! # Coverage
//!
//! - Factories: ranges, identity, nested data, `*_like`
//! - Shape routines: reshape, concatenate, stack, pad
//! - Indexing routines: take/put families, masks, select
//! - Math functions composed with arithmetic
//! - Seeded random construction

use approx::assert_relative_eq;
use ndexpr::math::{clip, exp, ln, sqrt};
use ndexpr::routines::Reshape;
use ndexpr::{
    asarray, astype, concatenate, extract, greater, less, ones_like, pad, place, put,
    put_along_axis, putmask, reshape, select, stack, sum, take_along_axis, Expr, ExprMut,
    PadMode, Tensor,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

// ============================================================================
// Construction
// ============================================================================

/// `arange` and `linspace` produce the documented sequences.
#[test]
fn test_ranges() {
    let r = Tensor::arange(2u32, 11, 4).unwrap();
    assert_eq!(r.into_vec(), vec![2, 6, 10]);
    let l = Tensor::linspace(-1.0, 1.0, 5, true);
    assert_eq!(l.into_vec(), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
}

/// The identity matrix is neutral for element-wise products with ones.
#[test]
fn test_eye_trace() {
    let i: Tensor<f64, 2> = Tensor::eye(4);
    assert_eq!(sum(&i), 4.0);
    let masked = (&i * &ones_like(&i)).copy();
    assert_eq!(masked, i);
}

/// Nested data round-trips through reshape.
#[test]
fn test_nested_reshape() {
    let t: Tensor<i32, 2> = Tensor::from_nested([[1, 2, 3], [4, 5, 6]]).unwrap();
    let r: Reshape<_, 2, 3> = reshape(&t, [3, 1, 2]).unwrap();
    let m = r.copy();
    assert_eq!(m.shape(), [3, 1, 2]);
    assert_eq!(m[[2, 0, 1]], 6);
}

// ============================================================================
// Shape routines
// ============================================================================

/// Concatenation then stacking of views and tensors.
#[test]
fn test_concatenate_and_stack() {
    let a = Tensor::from_vec(vec![1, 2, 3, 4], [2, 2]).unwrap();
    let b = Tensor::from_vec(vec![5, 6], [1, 2]).unwrap();
    let cat = concatenate([&a, &b], 0).unwrap().copy();
    assert_eq!(cat.shape(), [3, 2]);
    assert_eq!(cat.into_vec(), vec![1, 2, 3, 4, 5, 6]);

    let s: Tensor<i32, 3> = stack([a.view(), a.transpose()], 0).unwrap().copy();
    assert_eq!(s.shape(), [2, 2, 2]);
    assert_eq!(s[[1, 0, 1]], 3);

    assert!(concatenate([&a, &b], 1).is_err());
}

/// Edge padding repeats the border values.
#[test]
fn test_pad_edge() {
    let v = Tensor::from_vec(vec![1, 2, 3], [3]).unwrap();
    let p = pad(&v, [(2, 1)], PadMode::Edge).unwrap().copy();
    assert_eq!(p.into_vec(), vec![1, 1, 1, 2, 3, 3]);
}

/// Casting an integer expression to floats.
#[test]
fn test_astype_expression() {
    let v = Tensor::from_vec(vec![1, 4, 9], [3]).unwrap();
    let roots = sqrt(astype::<f64, _, 1>(&v)).copy();
    assert_eq!(roots.into_vec(), vec![1.0, 2.0, 3.0]);
}

// ============================================================================
// Indexing routines
// ============================================================================

/// `put` writes flat positions; a single value is repeated.
#[test]
fn test_put_positions() {
    let mut t = Tensor::<i32, 2>::zeros([2, 2]);
    put(&mut t, &[0, 3], &[7]).unwrap();
    assert_eq!(t.into_vec(), vec![7, 0, 0, 7]);
}

/// `put` rejects a value list whose length fits neither rule.
#[test]
fn test_put_value_count() {
    let mut t = Tensor::<i32, 1>::zeros([4]);
    assert!(put(&mut t, &[0, 1, 2], &[1, 2]).is_err());
    assert!(t.data().iter().all(|&x| x == 0));
}

/// Gathering along an axis and scattering back restores the tensor.
#[test]
fn test_take_then_put_along_axis() {
    let t = Tensor::from_vec(vec![3, 1, 2, 9, 7, 8], [2, 3]).unwrap();
    let order = Tensor::from_vec(vec![1usize, 2, 0, 1, 2, 0], [2, 3]).unwrap();
    let sorted = take_along_axis(&t, &order, 1).unwrap();
    assert_eq!(sorted.data(), &[1, 2, 3, 7, 8, 9]);

    let mut back = Tensor::<i32, 2>::zeros([2, 3]);
    put_along_axis(&mut back, &order, &sorted, 1).unwrap();
    assert_eq!(back, t);
}

/// `extract` and `place` are inverse on the masked positions.
#[test]
fn test_extract_place() {
    let t = Tensor::from_vec(vec![5, -1, 4, -2], [2, 2]).unwrap();
    let negative = less(&t, 0).unwrap();
    assert_eq!(extract(&negative, &t).unwrap().into_vec(), vec![-1, -2]);

    let mut u = t.clone();
    place(&mut u, &negative, &[0]).unwrap();
    assert_eq!(u.into_vec(), vec![5, 0, 4, 0]);
}

/// `putmask` with a broadcast row of values.
#[test]
fn test_putmask_broadcast() {
    let mut t = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], [2, 3]).unwrap();
    let mask = greater(&t, 3).unwrap().copy();
    let row = Tensor::from_vec(vec![10, 20, 30], [1, 3]).unwrap();
    putmask(&mut t, &mask, &row).unwrap();
    assert_eq!(t.into_vec(), vec![1, 2, 3, 10, 20, 30]);
}

/// `select` takes the first matching condition.
#[test]
fn test_select_first_match() {
    let x = Tensor::from_vec(vec![-2.0, 0.5, 3.0], [3]).unwrap();
    let small = less(&x, 0.0).unwrap().copy();
    let large = greater(&x, 1.0).unwrap().copy();
    let neg = -&x;
    let out = select(&[small, large], &[neg.copy(), x.clone()], 0.0).unwrap();
    assert_eq!(out.into_vec(), vec![2.0, 0.0, 3.0]);
}

/// Writing through a strided mutable view via the `ExprMut` surface.
#[test]
fn test_assign_into_column() {
    let mut t = Tensor::<i32, 2>::zeros([3, 3]);
    let col = Tensor::from_vec(vec![1, 2, 3], [3, 1]).unwrap();
    t.view_mut().slice_axis(1, 2..3, 1).unwrap().assign_from(&col).unwrap();
    assert_eq!(asarray(&t).into_vec(), vec![0, 0, 1, 0, 0, 2, 0, 0, 3]);
}

// ============================================================================
// Math
// ============================================================================

/// `ln(exp(x))` recovers `x` within rounding.
#[test]
fn test_exp_ln_roundtrip() {
    let x = Tensor::linspace(-3.0, 3.0, 13, true);
    let back = ln(exp(&x)).copy();
    for (got, want) in back.data().iter().zip(x.data()) {
        assert_relative_eq!(*got, *want, epsilon = 1e-12);
    }
}

/// Clipping bounds every element.
#[test]
fn test_clip_bounds() {
    let x = Tensor::from_vec(vec![-5.0, 0.25, 9.0], [3]).unwrap();
    let c = clip(&x, 0.0, 1.0).unwrap().copy();
    assert_eq!(c.into_vec(), vec![0.0, 0.25, 1.0]);
    assert!(clip(&x, 2.0, 1.0).is_err());
}

// ============================================================================
// Random
// ============================================================================

/// Seeded construction is reproducible across tensor shapes of equal size.
#[test]
fn test_random_seeded_reproducible() {
    let mut rng = StdRng::seed_from_u64(7);
    let a: Tensor<f64, 2> = Tensor::randn_with_rng([3, 4], &mut rng);
    let mut rng = StdRng::seed_from_u64(7);
    let b: Tensor<f64, 1> = Tensor::randn_with_rng([12], &mut rng);
    assert_eq!(a.data(), b.data());
}
