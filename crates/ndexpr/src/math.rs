//! Element-wise mathematical functions.
//!
//! Every function here returns a lazy node; nothing is computed until the
//! result is evaluated. The float functions require `num_traits::Float`
//! elements, the complex helpers work on any [`Scalar`].

use num_traits::Float;

use crate::error::TensorError;
use crate::expr::functional::{BinaryOp, Maximum, Minimum, UnaryOp};
use crate::expr::{fold, Binary, IntoOperand, OperandElem, Unary};
use crate::scalar::Scalar;

macro_rules! float_unary {
    ($($(#[$doc:meta])* $name:ident => $op:ident;)*) => {
        $(
            #[doc = concat!("Function object behind [`", stringify!($name), "`].")]
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $op;

            impl<T: Float> UnaryOp<T> for $op {
                type Output = T;

                #[inline]
                fn call(&self, x: T) -> T {
                    x.$name()
                }
            }

            $(#[$doc])*
            pub fn $name<O, const N: usize>(operand: O) -> Unary<$op, O::Expr, N>
            where
                O: IntoOperand<N>,
                OperandElem<O, N>: Float,
            {
                Unary::new($op, operand.into_operand())
            }
        )*
    };
}

float_unary! {
    /// Absolute value.
    abs => Abs;
    /// Square root.
    sqrt => Sqrt;
    /// Cube root.
    cbrt => Cbrt;
    /// `e^x`.
    exp => Exp;
    /// `2^x`.
    exp2 => Exp2;
    /// Natural logarithm.
    ln => Ln;
    /// Base-2 logarithm.
    log2 => Log2;
    /// Base-10 logarithm.
    log10 => Log10;
    /// Sine.
    sin => Sin;
    /// Cosine.
    cos => Cos;
    /// Tangent.
    tan => Tan;
    /// Arcsine.
    asin => Asin;
    /// Arccosine.
    acos => Acos;
    /// Arctangent.
    atan => Atan;
    /// Hyperbolic sine.
    sinh => Sinh;
    /// Hyperbolic cosine.
    cosh => Cosh;
    /// Hyperbolic tangent.
    tanh => Tanh;
    /// Inverse hyperbolic sine.
    asinh => Asinh;
    /// Inverse hyperbolic cosine.
    acosh => Acosh;
    /// Inverse hyperbolic tangent.
    atanh => Atanh;
    /// Largest integer not above `x`.
    floor => Floor;
    /// Smallest integer not below `x`.
    ceil => Ceil;
    /// Nearest integer, halfway cases away from zero.
    round => Round;
    /// Integer part.
    trunc => Trunc;
    /// `1`, `-1` or NaN following the sign of `x`.
    signum => Signum;
    /// `1 / x`.
    recip => Recip;
}

macro_rules! float_predicate {
    ($($(#[$doc:meta])* $name:ident => $op:ident, $method:ident;)*) => {
        $(
            #[doc = concat!("Function object behind [`", stringify!($name), "`].")]
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $op;

            impl<T: Float> UnaryOp<T> for $op {
                type Output = bool;

                #[inline]
                fn call(&self, x: T) -> bool {
                    x.$method()
                }
            }

            $(#[$doc])*
            pub fn $name<O, const N: usize>(operand: O) -> Unary<$op, O::Expr, N>
            where
                O: IntoOperand<N>,
                OperandElem<O, N>: Float,
            {
                Unary::new($op, operand.into_operand())
            }
        )*
    };
}

float_predicate! {
    /// True where the element is NaN.
    isnan => IsNan, is_nan;
    /// True where the element is positive or negative infinity.
    isinf => IsInf, is_infinite;
    /// True where the element is neither NaN nor infinite.
    isfinite => IsFinite, is_finite;
}

/// `x * x`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Square;

impl<T: Copy + std::ops::Mul> UnaryOp<T> for Square {
    type Output = T::Output;

    #[inline]
    fn call(&self, x: T) -> T::Output {
        x * x
    }
}

/// Element-wise square; works for any `Copy` element with multiplication.
pub fn square<O, const N: usize>(operand: O) -> Unary<Square, O::Expr, N>
where
    O: IntoOperand<N>,
{
    Unary::new(Square, operand.into_operand())
}

/// `x` raised to a fixed integer power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Powi(pub i32);

impl<T: Float> UnaryOp<T> for Powi {
    type Output = T;

    #[inline]
    fn call(&self, x: T) -> T {
        x.powi(self.0)
    }
}

/// Element-wise `x^n` for an integer exponent.
pub fn powi<O, const N: usize>(operand: O, n: i32) -> Unary<Powi, O::Expr, N>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: Float,
{
    Unary::new(Powi(n), operand.into_operand())
}

/// `x` raised to a fixed float power.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Powf<T>(pub T);

impl<T: Float> UnaryOp<T> for Powf<T> {
    type Output = T;

    #[inline]
    fn call(&self, x: T) -> T {
        x.powf(self.0)
    }
}

/// Element-wise `x^e` for a float exponent.
pub fn powf<O, const N: usize>(
    operand: O,
    e: OperandElem<O, N>,
) -> Unary<Powf<OperandElem<O, N>>, O::Expr, N>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: Float,
{
    Unary::new(Powf(e), operand.into_operand())
}

/// Clamp into `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip<T> {
    lo: T,
    hi: T,
}

impl<T: PartialOrd + Clone> UnaryOp<T> for Clip<T> {
    type Output = T;

    #[inline]
    fn call(&self, x: T) -> T {
        if x < self.lo {
            self.lo.clone()
        } else if x > self.hi {
            self.hi.clone()
        } else {
            x
        }
    }
}

/// Limit every element to `[lo, hi]`. NaN passes through unchanged.
///
/// # Errors
///
/// Returns `TensorError::InvalidArgument` if `lo > hi`.
///
/// # Examples
///
/// ```
/// use ndexpr::math::clip;
/// use ndexpr::{Expr, Tensor};
///
/// let t = Tensor::from_vec(vec![-2, 0, 5, 9], [4]).unwrap();
/// assert_eq!(clip(&t, 0, 6).unwrap().copy().into_vec(), vec![0, 0, 5, 6]);
/// ```
pub fn clip<O, const N: usize>(
    operand: O,
    lo: OperandElem<O, N>,
    hi: OperandElem<O, N>,
) -> Result<Unary<Clip<OperandElem<O, N>>, O::Expr, N>, TensorError>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: PartialOrd + Clone,
{
    if lo > hi {
        return Err(TensorError::invalid("clip lower bound exceeds upper bound"));
    }
    Ok(Unary::new(Clip { lo, hi }, operand.into_operand()))
}

macro_rules! float_binary {
    ($($(#[$doc:meta])* $name:ident => $op:ident, $method:ident;)*) => {
        $(
            #[doc = concat!("Function object behind [`", stringify!($name), "`].")]
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $op;

            impl<T: Float> BinaryOp<T, T> for $op {
                type Output = T;

                #[inline]
                fn call(&self, a: T, b: T) -> T {
                    a.$method(b)
                }
            }

            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns `TensorError::ShapeMismatch` if the shapes do not broadcast.
            pub fn $name<L, R, const N: usize>(
                lhs: L,
                rhs: R,
            ) -> Result<Binary<$op, L::Expr, R::Expr, N>, TensorError>
            where
                L: IntoOperand<N>,
                R: IntoOperand<N>,
            {
                Binary::new($op, lhs.into_operand(), rhs.into_operand())
            }
        )*
    };
}

float_binary! {
    /// Element-wise `a^b`.
    pow => Pow, powf;
    /// Four-quadrant arctangent of `a / b`.
    atan2 => Atan2, atan2;
    /// `sqrt(a^2 + b^2)` without intermediate overflow.
    hypot => Hypot, hypot;
}

/// Element-wise larger value. NaN on the right never wins.
///
/// # Errors
///
/// Returns `TensorError::ShapeMismatch` if the shapes do not broadcast.
pub fn maximum<L, R, const N: usize>(
    lhs: L,
    rhs: R,
) -> Result<Binary<Maximum, L::Expr, R::Expr, N>, TensorError>
where
    L: IntoOperand<N>,
    R: IntoOperand<N>,
{
    Binary::new(Maximum, lhs.into_operand(), rhs.into_operand())
}

/// Element-wise smaller value. NaN on the right never wins.
///
/// # Errors
///
/// Returns `TensorError::ShapeMismatch` if the shapes do not broadcast.
pub fn minimum<L, R, const N: usize>(
    lhs: L,
    rhs: R,
) -> Result<Binary<Minimum, L::Expr, R::Expr, N>, TensorError>
where
    L: IntoOperand<N>,
    R: IntoOperand<N>,
{
    Binary::new(Minimum, lhs.into_operand(), rhs.into_operand())
}

/// Complex conjugate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Conj;

impl<T: Scalar> UnaryOp<T> for Conj {
    type Output = T;

    #[inline]
    fn call(&self, x: T) -> T {
        x.conj()
    }
}

/// Real part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RealPart;

impl<T: Scalar> UnaryOp<T> for RealPart {
    type Output = T::Real;

    #[inline]
    fn call(&self, x: T) -> T::Real {
        x.real_part()
    }
}

/// Imaginary part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImagPart;

impl<T: Scalar> UnaryOp<T> for ImagPart {
    type Output = T::Real;

    #[inline]
    fn call(&self, x: T) -> T::Real {
        x.imag_part()
    }
}

/// Element-wise complex conjugate; the identity for real elements.
///
/// ```
/// use ndexpr::math::conj;
/// use ndexpr::{c64, Expr, Tensor};
///
/// let t = Tensor::from_vec(vec![c64::new(1.0, 2.0), c64::new(3.0, -4.0)], [2]).unwrap();
/// let c = conj(&t).copy();
/// assert_eq!(c[[0]].im, -2.0);
/// assert_eq!(c[[1]].im, 4.0);
/// ```
pub fn conj<O, const N: usize>(operand: O) -> Unary<Conj, O::Expr, N>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: Scalar,
{
    Unary::new(Conj, operand.into_operand())
}

/// Element-wise real part.
pub fn real<O, const N: usize>(operand: O) -> Unary<RealPart, O::Expr, N>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: Scalar,
{
    Unary::new(RealPart, operand.into_operand())
}

/// Element-wise imaginary part; zero for real elements.
pub fn imag<O, const N: usize>(operand: O) -> Unary<ImagPart, O::Expr, N>
where
    O: IntoOperand<N>,
    OperandElem<O, N>: Scalar,
{
    Unary::new(ImagPart, operand.into_operand())
}

/// Squared Frobenius norm, `sum(|x|^2)`.
///
/// Cheaper than [`norm`] when the square root is not needed.
pub fn norm_sqr<O, const N: usize>(operand: O) -> <OperandElem<O, N> as Scalar>::Real
where
    O: IntoOperand<N>,
    OperandElem<O, N>: Scalar,
{
    fold(operand, num_traits::Zero::zero(), |acc, x: OperandElem<O, N>| {
        let (re, im) = (x.real_part(), x.imag_part());
        acc + re * re + im * im
    })
}

/// Frobenius norm, `sqrt(sum(|x|^2))`.
///
/// ```
/// use ndexpr::math::norm;
/// use ndexpr::Tensor;
///
/// let t = Tensor::from_vec(vec![3.0f64, 4.0], [2]).unwrap();
/// assert!((norm(&t) - 5.0).abs() < 1e-10);
/// ```
pub fn norm<O, const N: usize>(operand: O) -> <OperandElem<O, N> as Scalar>::Real
where
    O: IntoOperand<N>,
    OperandElem<O, N>: Scalar,
    <OperandElem<O, N> as Scalar>::Real: Float,
{
    norm_sqr(operand).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;
    use crate::scalar::c64;
    use crate::tensor::Tensor;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn v(data: Vec<f64>) -> Tensor<f64, 1> {
        let n = data.len();
        Tensor::from_vec(data, [n]).unwrap()
    }

    #[test]
    fn test_unary_float_functions() {
        let t = v(vec![1.0, 4.0, 9.0]);
        assert_eq!(sqrt(&t).copy().into_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(square(&t).copy().into_vec(), vec![1.0, 16.0, 81.0]);
        assert_relative_eq!(ln(exp(&t)).eval(&[2].into()), 9.0, epsilon = 1e-12);
        assert_relative_eq!(log2(&t).eval(&[1].into()), 2.0);
        assert_relative_eq!(log10(&v(vec![1000.0])).eval(&[0].into()), 3.0, epsilon = 1e-12);
        assert_relative_eq!(cbrt(&v(vec![27.0])).eval(&[0].into()), 3.0, epsilon = 1e-12);
        assert_eq!(exp2(&v(vec![3.0])).copy().into_vec(), vec![8.0]);
        assert_eq!(recip(&t).eval(&[1].into()), 0.25);
    }

    #[test]
    fn test_trig_roundtrip() {
        let angles = v(vec![0.0, PI / 6.0, PI / 4.0]);
        let back = asin(sin(&angles)).copy();
        for (a, b) in angles.iter().zip(back.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
        assert_relative_eq!(cos(&angles).eval(&[0].into()), 1.0);
        assert_relative_eq!(tan(&angles).eval(&[2].into()), 1.0, epsilon = 1e-12);
        assert_relative_eq!(atanh(tanh(&angles)).eval(&[1].into()), PI / 6.0, epsilon = 1e-12);
        let h = cosh(&v(vec![0.0])).copy();
        assert_eq!(h.into_vec(), vec![1.0]);
    }

    #[test]
    fn test_rounding_and_sign() {
        let t = v(vec![-1.5, -0.2, 0.5, 2.7]);
        assert_eq!(floor(&t).copy().into_vec(), vec![-2.0, -1.0, 0.0, 2.0]);
        assert_eq!(ceil(&t).copy().into_vec(), vec![-1.0, -0.0, 1.0, 3.0]);
        assert_eq!(round(&t).copy().into_vec(), vec![-2.0, -0.0, 1.0, 3.0]);
        assert_eq!(trunc(&t).copy().into_vec(), vec![-1.0, -0.0, 0.0, 2.0]);
        assert_eq!(signum(&t).copy().into_vec(), vec![-1.0, -1.0, 1.0, 1.0]);
        assert_eq!(abs(&t).copy().into_vec(), vec![1.5, 0.2, 0.5, 2.7]);
    }

    #[test]
    fn test_powers_and_binary() {
        let t = v(vec![1.0, 2.0, 3.0]);
        assert_eq!(powi(&t, 3).copy().into_vec(), vec![1.0, 8.0, 27.0]);
        assert_relative_eq!(powf(&t, 0.5).eval(&[3 - 1].into()), 3.0f64.sqrt());
        let e = v(vec![2.0, 2.0, 0.0]);
        assert_eq!(pow(&t, &e).unwrap().copy().into_vec(), vec![1.0, 4.0, 1.0]);
        assert_relative_eq!(hypot(&t, 4.0).unwrap().eval(&[2].into()), 5.0);
        assert_relative_eq!(atan2(1.0, &t).unwrap().eval(&[0].into()), PI / 4.0);
        assert!(pow(&t, &v(vec![1.0, 2.0])).is_err());
    }

    #[test]
    fn test_maximum_minimum_clip() {
        let a = Tensor::from_vec(vec![1, 5, 3], [3]).unwrap();
        let b = Tensor::from_vec(vec![4, 2, 3], [3]).unwrap();
        assert_eq!(maximum(&a, &b).unwrap().copy().into_vec(), vec![4, 5, 3]);
        assert_eq!(minimum(&a, 2).unwrap().copy().into_vec(), vec![1, 2, 2]);
        assert!(clip(&a, 4, 2).is_err());
        assert_eq!(clip(&a, 2, 4).unwrap().copy().into_vec(), vec![2, 4, 3]);
    }

    #[test]
    fn test_predicates() {
        let t = v(vec![1.0, f64::NAN, f64::INFINITY, -f64::INFINITY]);
        assert_eq!(isnan(&t).copy().into_vec(), vec![false, true, false, false]);
        assert_eq!(isinf(&t).copy().into_vec(), vec![false, false, true, true]);
        assert_eq!(isfinite(&t).copy().into_vec(), vec![true, false, false, false]);
    }

    #[test]
    fn test_complex_parts_and_norm() {
        let z = Tensor::from_vec(vec![c64::new(3.0, 4.0), c64::new(0.0, 1.0)], [2]).unwrap();
        assert_eq!(real(&z).copy().into_vec(), vec![3.0, 0.0]);
        assert_eq!(imag(&z).copy().into_vec(), vec![4.0, 1.0]);
        assert_eq!(conj(&z).eval(&[1].into()), c64::new(0.0, -1.0));
        assert_relative_eq!(norm_sqr(&z), 26.0);
        assert_relative_eq!(norm(&z), 26.0f64.sqrt(), epsilon = 1e-12);

        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], [2, 2]).unwrap();
        assert_relative_eq!(norm(&t), 30.0f64.sqrt(), epsilon = 1e-10);
        assert_eq!(imag(&t).copy().into_vec(), vec![0.0; 4]);
    }
}
