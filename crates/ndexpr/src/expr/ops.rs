//! Operator overloads and named comparison/logical constructors.
//!
//! `+ - * / %` and unary `-` are available on tensors, tensor references,
//! views and every expression node; the right-hand side may be anything
//! that converts into an operand, including plain scalars. The operators
//! panic if the shapes do not broadcast; the named functions
//! ([`add`], [`less`], ...) return the error instead.
//!
//! ```
//! use ndexpr::{Expr, Tensor};
//!
//! let a = Tensor::from_vec(vec![1.0, 2.0, 3.0], [3]).unwrap();
//! let b = Tensor::from_vec(vec![4.0, 5.0, 6.0], [3]).unwrap();
//! let e = (&a + &b) * 2.0 - 1.0;
//! assert_eq!(e.copy().into_vec(), vec![9.0, 13.0, 17.0]);
//! ```

use std::ops;

use crate::error::TensorError;
use crate::expr::functional::{
    Divide, EqualTo, Greater, GreaterEqual, Less, LessEqual, LogicalAnd, LogicalNot, LogicalOr,
    Minus, Negate, NotEqualTo, Plus, Remainder, Times,
};
use crate::expr::{
    AxisReduce, Binary, Constant, Expr, IntoOperand, Outer, Permute, Reverse, Shift, Unary, Where,
    Zip,
};
use crate::routines::{Broadcast, Concatenate, Pad, Reshape, Stack};
use crate::scalar::c64;
use crate::tensor::Tensor;
use crate::view::{IndirectView, MaskedView, View};

macro_rules! impl_owned_operand {
    ($([$($gens:tt)*] $ty:ty => $n:tt;)*) => {
        $(
            impl<$($gens)*> IntoOperand<$n> for $ty
            where
                $ty: Expr<$n>,
            {
                type Expr = Self;

                #[inline]
                fn into_operand(self) -> Self {
                    self
                }
            }
        )*
    };
}

macro_rules! impl_arith_operators {
    ($([$($gens:tt)*] $ty:ty => $n:tt;)*) => {
        $(
            impl_arith_operators!(@op Add add Plus [$($gens)*] $ty => $n);
            impl_arith_operators!(@op Sub sub Minus [$($gens)*] $ty => $n);
            impl_arith_operators!(@op Mul mul Times [$($gens)*] $ty => $n);
            impl_arith_operators!(@op Div div Divide [$($gens)*] $ty => $n);
            impl_arith_operators!(@op Rem rem Remainder [$($gens)*] $ty => $n);

            impl<$($gens)*> ops::Neg for $ty
            where
                $ty: Expr<$n>,
            {
                type Output = Unary<Negate, Self, $n>;

                #[inline]
                fn neg(self) -> Self::Output {
                    Unary::new(Negate, self)
                }
            }
        )*
    };
    (@op $trait:ident $method:ident $func:ident [$($gens:tt)*] $ty:ty => $n:tt) => {
        impl<$($gens)* Rhs> ops::$trait<Rhs> for $ty
        where
            $ty: Expr<$n>,
            Rhs: IntoOperand<$n>,
        {
            type Output = Binary<$func, Self, Rhs::Expr, $n>;

            /// # Panics
            ///
            /// Panics if the operand shapes do not broadcast.
            #[track_caller]
            fn $method(self, rhs: Rhs) -> Self::Output {
                match Binary::new($func, self, rhs.into_operand()) {
                    Ok(node) => node,
                    Err(err) => panic!("{err}"),
                }
            }
        }
    };
}

impl_owned_operand! {
    [T, const N: usize] Tensor<T, N> => N;
    ['a, T, const N: usize] View<'a, T, N> => N;
    ['a, T, const N: usize] IndirectView<'a, T, N> => N;
    ['a, T] MaskedView<'a, T> => 1;
    [T, const N: usize] Constant<T, N> => N;
    [F, A, const N: usize] Unary<F, A, N> => N;
    [F, A, B, const N: usize] Binary<F, A, B, N> => N;
    [F, A, B, const M: usize, const K: usize, const N: usize] Outer<F, A, B, M, K, N> => N;
    [F, A, R, const N: usize] AxisReduce<F, A, R, N> => N;
    [C, X, Y, const N: usize] Where<C, X, Y, N> => N;
    [A, const N: usize] Reverse<A, N> => N;
    [A, const N: usize] Shift<A, N> => N;
    [A, const N: usize] Permute<A, N> => N;
    [A, B, const N: usize] Zip<A, B, N> => N;
    [A, const N: usize] Broadcast<A, N> => N;
    [A, const M: usize, const N: usize] Reshape<A, M, N> => N;
    [E, const N: usize] Concatenate<E, N> => N;
    [E, const M: usize, const N: usize] Stack<E, M, N> => N;
    [A, T, const N: usize] Pad<A, T, N> => N;
}

impl_arith_operators! {
    [T, const N: usize,] Tensor<T, N> => N;
    ['a, T, const N: usize,] &'a Tensor<T, N> => N;
    ['a, T, const N: usize,] View<'a, T, N> => N;
    ['a, T, const N: usize,] IndirectView<'a, T, N> => N;
    ['a, T,] MaskedView<'a, T> => 1;
    [F, A, const N: usize,] Unary<F, A, N> => N;
    [F, A, B, const N: usize,] Binary<F, A, B, N> => N;
    [F, A, B, const M: usize, const K: usize, const N: usize,] Outer<F, A, B, M, K, N> => N;
    [F, A, R, const N: usize,] AxisReduce<F, A, R, N> => N;
    [C, X, Y, const N: usize,] Where<C, X, Y, N> => N;
    [A, const N: usize,] Reverse<A, N> => N;
    [A, const N: usize,] Shift<A, N> => N;
    [A, const N: usize,] Permute<A, N> => N;
    [A, const N: usize,] Broadcast<A, N> => N;
    [A, const M: usize, const N: usize,] Reshape<A, M, N> => N;
    [E, const N: usize,] Concatenate<E, N> => N;
    [E, const M: usize, const N: usize,] Stack<E, M, N> => N;
    [A, T, const N: usize,] Pad<A, T, N> => N;
}

// Scalar on the left: `2.0 * &t`. The scalar type is the element type, so a
// bare literal resolves against the tensor it multiplies.
macro_rules! impl_scalar_lhs {
    ($($s:ty),* $(,)?) => {
        $(
            impl_scalar_lhs!(@op $s, Add add Plus);
            impl_scalar_lhs!(@op $s, Sub sub Minus);
            impl_scalar_lhs!(@op $s, Mul mul Times);
            impl_scalar_lhs!(@op $s, Div div Divide);
        )*
    };
    (@op $s:ty, $trait:ident $method:ident $func:ident) => {
        impl<'a, const N: usize> ops::$trait<&'a Tensor<$s, N>> for $s {
            type Output = Binary<$func, Constant<$s, N>, &'a Tensor<$s, N>, N>;

            #[inline]
            fn $method(self, rhs: &'a Tensor<$s, N>) -> Self::Output {
                match Binary::new($func, Constant::new(self), rhs) {
                    Ok(node) => node,
                    Err(_) => unreachable!("a constant broadcasts against any shape"),
                }
            }
        }

        impl<'a, const N: usize> ops::$trait<View<'a, $s, N>> for $s {
            type Output = Binary<$func, Constant<$s, N>, View<'a, $s, N>, N>;

            #[inline]
            fn $method(self, rhs: View<'a, $s, N>) -> Self::Output {
                match Binary::new($func, Constant::new(self), rhs) {
                    Ok(node) => node,
                    Err(_) => unreachable!("a constant broadcasts against any shape"),
                }
            }
        }
    };
}

impl_scalar_lhs!(f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, c64);

macro_rules! named_binary {
    ($($(#[$doc:meta])* $name:ident => $func:ident;)*) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns `TensorError::ShapeMismatch` if the shapes do not broadcast.
            pub fn $name<L, R, const N: usize>(
                lhs: L,
                rhs: R,
            ) -> Result<Binary<$func, L::Expr, R::Expr, N>, TensorError>
            where
                L: IntoOperand<N>,
                R: IntoOperand<N>,
            {
                Binary::new($func, lhs.into_operand(), rhs.into_operand())
            }
        )*
    };
}

named_binary! {
    /// Element-wise `lhs + rhs`.
    add => Plus;
    /// Element-wise `lhs - rhs`.
    sub => Minus;
    /// Element-wise `lhs * rhs`.
    mul => Times;
    /// Element-wise `lhs / rhs`.
    div => Divide;
    /// Element-wise `lhs % rhs`.
    rem => Remainder;
    /// Element-wise `lhs < rhs`.
    less => Less;
    /// Element-wise `lhs <= rhs`.
    less_equal => LessEqual;
    /// Element-wise `lhs > rhs`.
    greater => Greater;
    /// Element-wise `lhs >= rhs`.
    greater_equal => GreaterEqual;
    /// Element-wise `lhs == rhs`.
    equal => EqualTo;
    /// Element-wise `lhs != rhs`.
    not_equal => NotEqualTo;
    /// Element-wise `lhs && rhs` on boolean operands.
    logical_and => LogicalAnd;
    /// Element-wise `lhs || rhs` on boolean operands.
    logical_or => LogicalOr;
}

/// Element-wise negation of a boolean operand.
pub fn logical_not<O, const N: usize>(operand: O) -> Unary<LogicalNot, O::Expr, N>
where
    O: IntoOperand<N>,
{
    Unary::new(LogicalNot, operand.into_operand())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{all, apply};

    fn v(data: Vec<f64>) -> Tensor<f64, 1> {
        let n = data.len();
        Tensor::from_vec(data, [n]).unwrap()
    }

    #[test]
    fn test_reference_operators() {
        let a = v(vec![1.0, 2.0, 3.0]);
        let b = v(vec![4.0, 5.0, 6.0]);
        assert_eq!((&a + &b).copy().into_vec(), vec![5.0, 7.0, 9.0]);
        assert_eq!((&b - &a).copy().into_vec(), vec![3.0, 3.0, 3.0]);
        assert_eq!((&a * &b).copy().into_vec(), vec![4.0, 10.0, 18.0]);
        assert_eq!((&b / &a).copy().into_vec(), vec![4.0, 2.5, 2.0]);
        assert_eq!((-&a).copy().into_vec(), vec![-1.0, -2.0, -3.0]);
    }

    #[test]
    fn test_scalars_on_either_side() {
        let a = v(vec![1.0, 2.0]);
        assert_eq!((&a * 3.0).copy().into_vec(), vec![3.0, 6.0]);
        assert_eq!((3.0 * &a).copy().into_vec(), vec![3.0, 6.0]);
        assert_eq!((1.0 - a.view()).copy().into_vec(), vec![0.0, -1.0]);
        let ints = Tensor::from_vec(vec![7, 8, 9], [3]).unwrap();
        assert_eq!((&ints % 4).copy().into_vec(), vec![3, 0, 1]);
    }

    #[test]
    fn test_nested_expressions_compose() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], [2, 2]).unwrap();
        let col = Tensor::from_vec(vec![10.0, 20.0], [2, 1]).unwrap();
        let e = -((&a + &col) * 0.5);
        assert_eq!(e.shape(), [2, 2]);
        assert_eq!(e.copy().into_vec(), vec![-5.5, -6.0, -11.5, -12.0]);
        let sq = apply(&a, |x: f64| x * x) + &a;
        assert_eq!(sq.copy().into_vec(), vec![2.0, 6.0, 12.0, 20.0]);
    }

    #[test]
    fn test_plain_float_literals_mix_with_tensors() {
        let a = v(vec![1.0, 2.0, 3.0]);
        let e = 2.0 * &a + 1.0;
        assert_eq!(e.copy().into_vec(), vec![3.0, 5.0, 7.0]);
        let f = 1.0 / a.view() - 0.5;
        assert_eq!(f.copy().into_vec(), vec![0.5, 0.0, 1.0 / 3.0 - 0.5]);

        let single = Tensor::from_vec(vec![1.5f32, 2.5], [2]).unwrap();
        assert_eq!((2.0 * &single).copy().into_vec(), vec![3.0f32, 5.0]);
        let ints = Tensor::from_vec(vec![1u8, 2], [2]).unwrap();
        assert_eq!((10 - &ints).copy().into_vec(), vec![9u8, 8]);
    }

    #[test]
    fn test_owned_tensor_operand() {
        let a = v(vec![1.0, 2.0]);
        let e = a.clone() + a;
        assert_eq!(e.copy().into_vec(), vec![2.0, 4.0]);
    }

    #[test]
    #[should_panic(expected = "shape mismatch")]
    fn test_operator_panics_on_mismatch() {
        let a = v(vec![1.0, 2.0]);
        let b = v(vec![1.0, 2.0, 3.0]);
        let _ = &a + &b;
    }

    #[test]
    fn test_named_functions_report_errors() {
        let a = v(vec![1.0, 2.0]);
        let b = v(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            add(&a, &b),
            Err(TensorError::ShapeMismatch { .. })
        ));
        assert_eq!(mul(&a, 2.0).unwrap().copy().into_vec(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_comparisons_and_logic() {
        let a = Tensor::from_vec(vec![1, 5, 3, 7], [4]).unwrap();
        let lo = greater(&a, 2).unwrap();
        let hi = less_equal(&a, 5).unwrap();
        let both = logical_and(&lo, &hi).unwrap();
        assert_eq!(both.copy().into_vec(), vec![false, true, true, false]);
        let either = logical_or(&lo, logical_not(&hi)).unwrap();
        assert_eq!(either.copy().into_vec(), vec![false, true, true, true]);
        assert!(all(equal(&a, &a).unwrap()));
        assert!(!all(not_equal(&a, 3).unwrap()));
        assert_eq!(
            less(&a, 5).unwrap().copy().into_vec(),
            greater_equal(&a, 5).map(|e| logical_not(e).copy()).unwrap().into_vec()
        );
    }
}
