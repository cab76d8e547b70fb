//! Scalar trait for numeric tensor element types.

use num_traits::{One, Zero};
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

pub use num_complex::Complex64 as c64;

/// Trait for numeric element types used by the factory functions and the
/// arithmetic conveniences.
///
/// Containers and expressions themselves accept any element type; this
/// trait is only required where zero/one or field arithmetic is needed.
pub trait Scalar:
    Copy
    + Debug
    + PartialEq
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + 'static
{
    /// The real type associated with this scalar.
    type Real: Scalar;

    /// Complex conjugate (identity for real types).
    fn conj(self) -> Self;

    /// Real part.
    fn real_part(self) -> Self::Real;

    /// Imaginary part (zero for real types).
    fn imag_part(self) -> Self::Real;
}

macro_rules! impl_real_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl Scalar for $t {
                type Real = $t;

                #[inline]
                fn conj(self) -> Self {
                    self
                }

                #[inline]
                fn real_part(self) -> Self::Real {
                    self
                }

                #[inline]
                fn imag_part(self) -> Self::Real {
                    <$t as Zero>::zero()
                }
            }
        )*
    };
}

impl_real_scalar!(f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Scalar for c64 {
    type Real = f64;

    #[inline]
    fn conj(self) -> Self {
        c64::new(self.re, -self.im)
    }

    #[inline]
    fn real_part(self) -> f64 {
        self.re
    }

    #[inline]
    fn imag_part(self) -> f64 {
        self.im
    }
}
