//! Property-based tests for the shape model and lazy evaluation.
//!
//! These tests use proptest to check broadcasting, index raveling and the
//! algebraic identities of remapping expressions on random shapes.

use ndexpr::shape::{broadcast_shapes, ravel_index, unravel_index};
use ndexpr::{array_equal, reverse, shift, sum, transpose, Expr, Layout, Shape, Tensor};
use proptest::prelude::*;

// ============================================================================
// Test Utilities
// ============================================================================

/// Strategy for small rank-3 shapes, including empty axes.
fn shape3_strategy() -> impl Strategy<Value = [usize; 3]> {
    [0usize..5, 0usize..5, 0usize..5]
}

/// Strategy for non-empty rank-3 shapes.
fn nonempty_shape3_strategy() -> impl Strategy<Value = [usize; 3]> {
    [1usize..5, 1usize..5, 1usize..5]
}

fn layout_strategy() -> impl Strategy<Value = Layout> {
    prop_oneof![Just(Layout::RowMajor), Just(Layout::ColumnMajor)]
}

fn iota(dims: [usize; 3]) -> Tensor<i64, 3> {
    let shape = Shape::new(dims);
    Tensor::from_vec((0..shape.size() as i64).collect(), shape).unwrap()
}

// ============================================================================
// Shape Properties
// ============================================================================

proptest! {
    /// Property: ravel and unravel are inverse for both orders
    #[test]
    fn prop_ravel_roundtrip(dims in nonempty_shape3_strategy(), order in layout_strategy()) {
        let shape = Shape::new(dims);
        for flat in 0..shape.size() {
            let index = unravel_index(flat, &shape, order);
            prop_assert!(shape.contains(&index));
            prop_assert_eq!(ravel_index(&index, &shape, order), flat);
        }
    }

    /// Property: broadcasting succeeds exactly when every axis pair is
    /// equal or contains a 1, and picks the non-1 extent
    #[test]
    fn prop_broadcast_rule(lhs in shape3_strategy(), rhs in shape3_strategy()) {
        let compatible = lhs
            .iter()
            .zip(rhs.iter())
            .all(|(&a, &b)| a == b || a == 1 || b == 1);
        match broadcast_shapes(&Shape::new(lhs), &Shape::new(rhs)) {
            Ok(out) => {
                prop_assert!(compatible);
                for k in 0..3 {
                    let expected = if lhs[k] == 1 { rhs[k] } else { lhs[k] };
                    prop_assert_eq!(out[k], expected);
                }
            }
            Err(_) => prop_assert!(!compatible),
        }
    }

    /// Property: broadcasting is symmetric
    #[test]
    fn prop_broadcast_symmetric(lhs in shape3_strategy(), rhs in shape3_strategy()) {
        let ab = broadcast_shapes(&Shape::new(lhs), &Shape::new(rhs)).ok();
        let ba = broadcast_shapes(&Shape::new(rhs), &Shape::new(lhs)).ok();
        prop_assert_eq!(ab, ba);
    }
}

// ============================================================================
// Expression Properties
// ============================================================================

proptest! {
    /// Property: transpose swaps shape and is an involution
    #[test]
    fn prop_transpose_involution(dims in shape3_strategy()) {
        let a = iota(dims);
        let t = transpose(&a);
        prop_assert_eq!(t.shape(), [dims[2], dims[1], dims[0]]);
        prop_assert_eq!(transpose(t).copy(), a);
    }

    /// Property: reversing an axis twice is the identity
    #[test]
    fn prop_reverse_involution(dims in shape3_strategy(), axis in 0usize..3) {
        let a = iota(dims);
        let twice = reverse(reverse(&a, axis).unwrap(), axis).unwrap();
        prop_assert!(array_equal(&twice, &a));
    }

    /// Property: shifting by k then by -k is the identity
    #[test]
    fn prop_shift_inverse(dims in shape3_strategy(), axis in 0usize..3, k in -7isize..7) {
        let a = iota(dims);
        let back = shift(shift(&a, k, axis).unwrap(), -k, axis).unwrap();
        prop_assert!(array_equal(&back, &a));
    }

    /// Property: materializing twice yields identical tensors, in any layout
    #[test]
    fn prop_copy_idempotent(dims in shape3_strategy(), layout in layout_strategy()) {
        let a = iota(dims);
        let expr = &a * 3i64 - 1i64;
        let first = expr.copy_with_layout(layout);
        let second = expr.copy();
        prop_assert_eq!(first, second);
    }

    /// Property: remapping never changes the element sum
    #[test]
    fn prop_remap_preserves_sum(dims in shape3_strategy(), axis in 0usize..3, k in -5isize..5) {
        let a = iota(dims);
        let total = sum(&a);
        prop_assert_eq!(sum(transpose(&a)), total);
        prop_assert_eq!(sum(reverse(&a, axis).unwrap()), total);
        prop_assert_eq!(sum(shift(&a, k, axis).unwrap()), total);
    }
}
