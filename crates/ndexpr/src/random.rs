//! Random tensor construction.
//!
//! Available with the `random` feature (on by default).

use rand::distr::uniform::SampleUniform;
use rand::distr::{StandardUniform, Uniform};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::TensorError;
use crate::scalar::{c64, Scalar};
use crate::shape::{Layout, Shape};
use crate::tensor::Tensor;

/// Element types that can be drawn uniformly from `[0, 1)`.
pub trait RandomUniform: Scalar {
    /// Sample from the uniform distribution on `[0, 1)`; complex values
    /// draw both parts independently.
    fn sample_uniform<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

/// Element types that can be drawn from a standard normal distribution.
pub trait RandomNormal: Scalar {
    /// Sample from `N(0, 1)`.
    fn sample_normal<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

macro_rules! impl_random_real {
    ($($t:ty),*) => {
        $(
            impl RandomUniform for $t {
                fn sample_uniform<R: Rng + ?Sized>(rng: &mut R) -> Self {
                    rng.sample(StandardUniform)
                }
            }

            impl RandomNormal for $t {
                fn sample_normal<R: Rng + ?Sized>(rng: &mut R) -> Self {
                    rng.sample(StandardNormal)
                }
            }
        )*
    };
}

impl_random_real!(f32, f64);

impl RandomUniform for c64 {
    fn sample_uniform<R: Rng + ?Sized>(rng: &mut R) -> Self {
        c64::new(rng.sample(StandardUniform), rng.sample(StandardUniform))
    }
}

impl RandomNormal for c64 {
    fn sample_normal<R: Rng + ?Sized>(rng: &mut R) -> Self {
        // Real and imaginary parts are independent N(0, 1/2) so that E|z|^2 = 1.
        let scale = std::f64::consts::FRAC_1_SQRT_2;
        c64::new(
            rng.sample::<f64, _>(StandardNormal) * scale,
            rng.sample::<f64, _>(StandardNormal) * scale,
        )
    }
}

impl<T: RandomUniform, const N: usize> Tensor<T, N> {
    /// Tensor of uniform random values in `[0, 1)` from the thread-local RNG.
    ///
    /// # Example
    ///
    /// ```
    /// use ndexpr::Tensor;
    ///
    /// let t: Tensor<f64, 2> = Tensor::random([2, 3]);
    /// assert_eq!(t.shape(), [2, 3]);
    /// assert!(t.data().iter().all(|&v| (0.0..1.0).contains(&v)));
    /// ```
    pub fn random(shape: impl Into<Shape<N>>) -> Self {
        Self::random_with_rng(shape, &mut rand::rng())
    }

    /// Uniform random values in `[0, 1)` drawn from `rng`, in row-major order.
    ///
    /// The same seed always produces the same tensor.
    ///
    /// # Example
    ///
    /// ```
    /// use ndexpr::Tensor;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let t1: Tensor<f64, 2> = Tensor::random_with_rng([2, 3], &mut rng);
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let t2: Tensor<f64, 2> = Tensor::random_with_rng([2, 3], &mut rng);
    /// assert_eq!(t1, t2);
    /// ```
    pub fn random_with_rng<R: Rng + ?Sized>(shape: impl Into<Shape<N>>, rng: &mut R) -> Self {
        let shape = shape.into();
        let data = (0..shape.size()).map(|_| T::sample_uniform(rng)).collect();
        Tensor::from_parts(data, shape, Layout::RowMajor)
    }
}

impl<T: RandomNormal, const N: usize> Tensor<T, N> {
    /// Tensor of standard normal values from the thread-local RNG.
    pub fn randn(shape: impl Into<Shape<N>>) -> Self {
        Self::randn_with_rng(shape, &mut rand::rng())
    }

    /// Standard normal values drawn from `rng`, in row-major order.
    pub fn randn_with_rng<R: Rng + ?Sized>(shape: impl Into<Shape<N>>, rng: &mut R) -> Self {
        let shape = shape.into();
        let data = (0..shape.size()).map(|_| T::sample_normal(rng)).collect();
        Tensor::from_parts(data, shape, Layout::RowMajor)
    }
}

impl<T: SampleUniform + Scalar, const N: usize> Tensor<T, N> {
    /// Uniform values in `[low, high)` drawn from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::InvalidArgument` unless `low < high` and both
    /// are finite.
    ///
    /// # Example
    ///
    /// ```
    /// use ndexpr::Tensor;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let t: Tensor<f64, 1> = Tensor::uniform_with_rng([50], -2.0, 2.0, &mut rng).unwrap();
    /// assert!(t.data().iter().all(|&v| (-2.0..2.0).contains(&v)));
    /// assert!(Tensor::<f64, 1>::uniform_with_rng([3], 1.0, 1.0, &mut rng).is_err());
    /// ```
    pub fn uniform_with_rng<R: Rng + ?Sized>(
        shape: impl Into<Shape<N>>,
        low: T,
        high: T,
        rng: &mut R,
    ) -> Result<Self, TensorError> {
        let dist = Uniform::new(low, high).map_err(|err| {
            tracing::warn!(%err, "rejected uniform range");
            TensorError::invalid(format!("invalid uniform range: {err}"))
        })?;
        let shape = shape.into();
        let data = (0..shape.size()).map(|_| rng.sample(&dist)).collect();
        Ok(Tensor::from_parts(data, shape, Layout::RowMajor))
    }
}
