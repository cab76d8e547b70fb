//! Tensor factories beyond the basic fill constructors.
//!
//! Ranges (`arange`, `linspace`, `logspace`), identity matrices, nested
//! literal data, `*_like` helpers and materializing conversions.

use num_traits::{Float, NumCast, One, ToPrimitive, Zero};

use crate::error::TensorError;
use crate::expr::{Expr, IntoOperand, OperandElem};
use crate::shape::{Layout, Shape};
use crate::tensor::Tensor;

/// Nested literal data of rank `N` with element type `T`.
///
/// Implemented for arrays nested up to three levels and for `Vec<T>` /
/// `Vec<Vec<T>>`.
pub trait NestedData<T, const N: usize> {
    /// Shape of the data; ragged input is rejected.
    fn nested_shape(&self) -> Result<Shape<N>, TensorError>;

    /// Elements in row-major order.
    fn into_flat(self) -> Vec<T>;
}

impl<T, const A: usize> NestedData<T, 1> for [T; A] {
    fn nested_shape(&self) -> Result<Shape<1>, TensorError> {
        Ok(Shape::new([A]))
    }

    fn into_flat(self) -> Vec<T> {
        self.into_iter().collect()
    }
}

impl<T, const A: usize, const B: usize> NestedData<T, 2> for [[T; B]; A] {
    fn nested_shape(&self) -> Result<Shape<2>, TensorError> {
        Ok(Shape::new([A, B]))
    }

    fn into_flat(self) -> Vec<T> {
        self.into_iter().flatten().collect()
    }
}

impl<T, const A: usize, const B: usize, const C: usize> NestedData<T, 3> for [[[T; C]; B]; A] {
    fn nested_shape(&self) -> Result<Shape<3>, TensorError> {
        Ok(Shape::new([A, B, C]))
    }

    fn into_flat(self) -> Vec<T> {
        self.into_iter().flatten().flatten().collect()
    }
}

impl<T> NestedData<T, 1> for Vec<T> {
    fn nested_shape(&self) -> Result<Shape<1>, TensorError> {
        Ok(Shape::new([self.len()]))
    }

    fn into_flat(self) -> Vec<T> {
        self
    }
}

impl<T> NestedData<T, 2> for Vec<Vec<T>> {
    fn nested_shape(&self) -> Result<Shape<2>, TensorError> {
        let cols = self.first().map_or(0, Vec::len);
        if let Some(row) = self.iter().find(|row| row.len() != cols) {
            return Err(TensorError::shapes(&[cols], &[row.len()]));
        }
        Ok(Shape::new([self.len(), cols]))
    }

    fn into_flat(self) -> Vec<T> {
        self.into_iter().flatten().collect()
    }
}

impl<T, const N: usize> Tensor<T, N> {
    /// Build a tensor from nested literal data.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ShapeMismatch` if nested vectors are ragged.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndexpr::Tensor;
    ///
    /// let t: Tensor<i32, 2> = Tensor::from_nested([[1, 2, 3], [4, 5, 6]]).unwrap();
    /// assert_eq!(t.shape(), [2, 3]);
    /// assert_eq!(t[[1, 0]], 4);
    ///
    /// let ragged: Result<Tensor<i32, 2>, _> = Tensor::from_nested(vec![vec![1, 2], vec![3]]);
    /// assert!(ragged.is_err());
    /// ```
    pub fn from_nested<D: NestedData<T, N>>(data: D) -> Result<Self, TensorError> {
        let shape = data.nested_shape()?;
        Ok(Self::from_parts(data.into_flat(), shape, Layout::RowMajor))
    }
}

fn cast<U: ToPrimitive, T: NumCast>(value: U) -> Result<T, TensorError> {
    <T as NumCast>::from(value)
        .ok_or_else(|| TensorError::invalid("value not representable in element type"))
}

impl<T> Tensor<T, 1>
where
    T: Copy + PartialOrd + Zero + NumCast + std::ops::Add<Output = T> + std::ops::Mul<Output = T>,
{
    /// Values `start, start + step, ...` strictly before `stop`.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::InvalidArgument` if `step` is zero or the
    /// bounds are not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndexpr::Tensor;
    ///
    /// let t = Tensor::arange(0, 10, 3).unwrap();
    /// assert_eq!(t.into_vec(), vec![0, 3, 6, 9]);
    ///
    /// let down = Tensor::arange(1.0, 0.0, -0.25).unwrap();
    /// assert_eq!(down.into_vec(), vec![1.0, 0.75, 0.5, 0.25]);
    /// ```
    pub fn arange(start: T, stop: T, step: T) -> Result<Self, TensorError> {
        if step == T::zero() {
            return Err(TensorError::invalid("arange step must be non-zero"));
        }
        let (lo, hi, by) = (cast::<T, f64>(start)?, cast::<T, f64>(stop)?, cast::<T, f64>(step)?);
        let span = ((hi - lo) / by).ceil();
        if !span.is_finite() {
            return Err(TensorError::invalid("arange bounds must be finite"));
        }
        let count = span.max(0.0) as usize;
        let data = (0..count)
            .map(|i| -> Result<T, TensorError> { Ok(start + step * cast(i)?) })
            .collect::<Result<Vec<T>, TensorError>>()?;
        Ok(Self::from_parts(data, Shape::new([count]), Layout::RowMajor))
    }
}

impl<T: Float> Tensor<T, 1> {
    /// `num` evenly spaced values from `start` to `stop`.
    ///
    /// With `endpoint` the last value is exactly `stop`; without it the
    /// interval is half-open.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndexpr::Tensor;
    ///
    /// let t = Tensor::linspace(0.0, 1.0, 5, true);
    /// assert_eq!(t.into_vec(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    /// let h = Tensor::linspace(0.0, 1.0, 4, false);
    /// assert_eq!(h.into_vec(), vec![0.0, 0.25, 0.5, 0.75]);
    /// ```
    pub fn linspace(start: T, stop: T, num: usize, endpoint: bool) -> Self {
        let intervals = if endpoint { num.saturating_sub(1) } else { num };
        let step = match <T as NumCast>::from(intervals) {
            Some(n) if intervals > 0 => (stop - start) / n,
            _ => T::zero(),
        };
        let data = (0..num)
            .map(|i| {
                if endpoint && i + 1 == num && num > 1 {
                    stop
                } else {
                    start + step * <T as NumCast>::from(i).unwrap_or_else(T::nan)
                }
            })
            .collect();
        Self::from_parts(data, Shape::new([num]), Layout::RowMajor)
    }

    /// `base` raised to `num` evenly spaced exponents from `start` to `stop`.
    ///
    /// # Examples
    ///
    /// ```
    /// use approx::assert_relative_eq;
    /// use ndexpr::Tensor;
    ///
    /// let t = Tensor::logspace(0.0, 3.0, 4, 10.0);
    /// for (got, want) in t.data().iter().zip([1.0, 10.0, 100.0, 1000.0]) {
    ///     assert_relative_eq!(*got, want, max_relative = 1e-12);
    /// }
    /// ```
    pub fn logspace(start: T, stop: T, num: usize, base: T) -> Self {
        let mut t = Self::linspace(start, stop, num, true);
        for v in t.data_mut() {
            *v = base.powf(*v);
        }
        t
    }
}

impl<T: Clone + Zero + One> Tensor<T, 2> {
    /// `n x n` identity matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndexpr::Tensor;
    ///
    /// let i: Tensor<f64, 2> = Tensor::eye(3);
    /// assert_eq!(i[[1, 1]], 1.0);
    /// assert_eq!(i[[0, 2]], 0.0);
    /// ```
    pub fn eye(n: usize) -> Self {
        Self::eye_offset(n, n, 0)
    }

    /// `rows x cols` matrix with ones on diagonal `k` (positive is above
    /// the main diagonal).
    pub fn eye_offset(rows: usize, cols: usize, k: isize) -> Self {
        Self::from_fn([rows, cols], |index| {
            if index[1] as isize - index[0] as isize == k {
                T::one()
            } else {
                T::zero()
            }
        })
    }
}

/// Tensor of `value` with the shape and layout of `like`.
pub fn full_like<E, T, const N: usize>(like: &E, value: T) -> Tensor<T, N>
where
    E: Expr<N> + ?Sized,
    T: Clone,
{
    Tensor::full_with_layout(like.shape(), value, like.layout())
}

/// Zeros with the shape and layout of `like`.
///
/// ```
/// use ndexpr::{zeros_like, Tensor};
///
/// let a = Tensor::from_vec(vec![1.5, 2.5], [1, 2]).unwrap();
/// let z = zeros_like(&a);
/// assert_eq!(z.shape(), [1, 2]);
/// assert_eq!(z.into_vec(), vec![0.0, 0.0]);
/// ```
pub fn zeros_like<E, const N: usize>(like: &E) -> Tensor<E::Elem, N>
where
    E: Expr<N> + ?Sized,
    E::Elem: Clone + Zero,
{
    full_like(like, E::Elem::zero())
}

/// Ones with the shape and layout of `like`.
pub fn ones_like<E, const N: usize>(like: &E) -> Tensor<E::Elem, N>
where
    E: Expr<N> + ?Sized,
    E::Elem: Clone + One,
{
    full_like(like, E::Elem::one())
}

/// Default-initialized elements with the shape and layout of `like`.
pub fn default_like<E, const N: usize>(like: &E) -> Tensor<E::Elem, N>
where
    E: Expr<N> + ?Sized,
    E::Elem: Clone + Default,
{
    full_like(like, E::Elem::default())
}

/// Materialize any operand (tensor, view or expression) into a new tensor.
///
/// ```
/// use ndexpr::{asarray, Tensor};
///
/// let a = Tensor::from_vec(vec![1, 2, 3, 4], [2, 2]).unwrap();
/// let t = asarray(a.transpose());
/// assert_eq!(t.into_vec(), vec![1, 3, 2, 4]);
/// ```
pub fn asarray<O, const N: usize>(operand: O) -> Tensor<OperandElem<O, N>, N>
where
    O: IntoOperand<N>,
{
    operand.into_operand().copy_with_layout(Layout::RowMajor)
}

/// Materialize a 1-D operand as a `1 x n` row matrix.
///
/// ```
/// use ndexpr::{asmatrix, Tensor};
///
/// let v = Tensor::from_vec(vec![1, 2, 3], [3]).unwrap();
/// let m = asmatrix(&v);
/// assert_eq!(m.shape(), [1, 3]);
/// assert_eq!(m[[0, 2]], 3);
/// ```
pub fn asmatrix<O>(operand: O) -> Tensor<OperandElem<O, 1>, 2>
where
    O: IntoOperand<1>,
{
    let row = operand.into_operand();
    let len = row.size();
    Tensor::from_parts(row.iter().collect(), Shape::new([1, len]), Layout::RowMajor)
}
