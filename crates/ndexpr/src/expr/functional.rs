//! Function objects stored inside expression nodes.
//!
//! Nodes are generic over [`UnaryOp`] / [`BinaryOp`] rather than over the
//! `Fn` traits directly so that the built-in operations have nameable,
//! zero-sized types (`Binary<Plus, A, B, N>`). Every closure of the right
//! arity implements these traits as well.

use std::marker::PhantomData;
use std::ops;

use num_traits::AsPrimitive;

/// A function of one argument.
pub trait UnaryOp<A> {
    /// Result element type.
    type Output;

    /// Apply the function.
    fn call(&self, a: A) -> Self::Output;
}

/// A function of two arguments.
pub trait BinaryOp<A, B> {
    /// Result element type.
    type Output;

    /// Apply the function.
    fn call(&self, a: A, b: B) -> Self::Output;
}

impl<F, A, R> UnaryOp<A> for F
where
    F: Fn(A) -> R,
{
    type Output = R;

    #[inline]
    fn call(&self, a: A) -> R {
        self(a)
    }
}

impl<F, A, B, R> BinaryOp<A, B> for F
where
    F: Fn(A, B) -> R,
{
    type Output = R;

    #[inline]
    fn call(&self, a: A, b: B) -> R {
        self(a, b)
    }
}

macro_rules! arith_op {
    ($(#[$doc:meta])* $name:ident, $trait:ident, $method:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl<A, B> BinaryOp<A, B> for $name
        where
            A: ops::$trait<B>,
        {
            type Output = <A as ops::$trait<B>>::Output;

            #[inline]
            fn call(&self, a: A, b: B) -> Self::Output {
                ops::$trait::$method(a, b)
            }
        }
    };
}

arith_op!(
    /// `a + b`
    Plus, Add, add
);
arith_op!(
    /// `a - b`
    Minus, Sub, sub
);
arith_op!(
    /// `a * b`
    Times, Mul, mul
);
arith_op!(
    /// `a / b`
    Divide, Div, div
);
arith_op!(
    /// `a % b`
    Remainder, Rem, rem
);

macro_rules! compare_op {
    ($(#[$doc:meta])* $name:ident, |$a:ident, $b:ident| $body:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl<A: PartialOrd<B>, B> BinaryOp<A, B> for $name {
            type Output = bool;

            #[inline]
            fn call(&self, $a: A, $b: B) -> bool {
                $body
            }
        }
    };
}

compare_op!(
    /// `a < b`
    Less, |a, b| a < b
);
compare_op!(
    /// `a <= b`
    LessEqual, |a, b| a <= b
);
compare_op!(
    /// `a > b`
    Greater, |a, b| a > b
);
compare_op!(
    /// `a >= b`
    GreaterEqual, |a, b| a >= b
);
compare_op!(
    /// `a == b`
    EqualTo, |a, b| a == b
);
compare_op!(
    /// `a != b`
    NotEqualTo, |a, b| a != b
);

/// Larger of two values; the first argument wins ties and unordered pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Maximum;

impl<A: PartialOrd> BinaryOp<A, A> for Maximum {
    type Output = A;

    #[inline]
    fn call(&self, a: A, b: A) -> A {
        if b > a { b } else { a }
    }
}

/// Smaller of two values; the first argument wins ties and unordered pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Minimum;

impl<A: PartialOrd> BinaryOp<A, A> for Minimum {
    type Output = A;

    #[inline]
    fn call(&self, a: A, b: A) -> A {
        if b < a { b } else { a }
    }
}

/// `a && b`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalAnd;

impl BinaryOp<bool, bool> for LogicalAnd {
    type Output = bool;

    #[inline]
    fn call(&self, a: bool, b: bool) -> bool {
        a && b
    }
}

/// `a || b`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalOr;

impl BinaryOp<bool, bool> for LogicalOr {
    type Output = bool;

    #[inline]
    fn call(&self, a: bool, b: bool) -> bool {
        a || b
    }
}

/// `!a`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalNot;

impl UnaryOp<bool> for LogicalNot {
    type Output = bool;

    #[inline]
    fn call(&self, a: bool) -> bool {
        !a
    }
}

/// `-a`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Negate;

impl<A: ops::Neg> UnaryOp<A> for Negate {
    type Output = A::Output;

    #[inline]
    fn call(&self, a: A) -> A::Output {
        -a
    }
}

/// Numeric cast with `as` semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cast<U>(PhantomData<fn() -> U>);

impl<U> Cast<U> {
    pub fn new() -> Self {
        Cast(PhantomData)
    }
}

impl<A, U> UnaryOp<A> for Cast<U>
where
    A: AsPrimitive<U>,
    U: Copy + 'static,
{
    type Output = U;

    #[inline]
    fn call(&self, a: A) -> U {
        a.as_()
    }
}

/// Builds a pair from two elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MakePair;

impl<A, B> BinaryOp<A, B> for MakePair {
    type Output = (A, B);

    #[inline]
    fn call(&self, a: A, b: B) -> (A, B) {
        (a, b)
    }
}

/// First component of a pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct First;

impl<A, B> UnaryOp<(A, B)> for First {
    type Output = A;

    #[inline]
    fn call(&self, pair: (A, B)) -> A {
        pair.0
    }
}

/// Second component of a pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Second;

impl<A, B> UnaryOp<(A, B)> for Second {
    type Output = B;

    #[inline]
    fn call(&self, pair: (A, B)) -> B {
        pair.1
    }
}
