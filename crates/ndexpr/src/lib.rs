//! ndexpr - fixed-rank dense tensors with lazy expression templates
//!
//! Tensors carry their rank as a const generic. Arithmetic, broadcasting,
//! remapping and reductions compose into typed expression nodes that are
//! evaluated element by element only when materialized or iterated.
//!
//! # Architecture
//!
//! ```text
//! Level 1: Shape model (shape module)
//!     → Shape<N>, Index<N>, ravel/unravel, broadcasting
//!
//! Level 2: Containers (tensor, view modules)
//!     → Tensor<T, N> owning a Dense<T> buffer
//!     → View / ViewMut (strided), IndirectView, MaskedView
//!
//! Level 3: Lazy expressions (expr module)
//!     → Unary, Binary, Outer, AxisReduce, Where, Reverse, Shift, Permute
//!     → operators and named functions build nodes, Expr::copy evaluates
//!
//! Level 4: Routines and math (routines, math modules)
//!     → reshape, concatenate, stack, pad, take, put, select, ...
//!     → element-wise float functions as function objects
//! ```
//!
//! # Example
//!
//! ```
//! use ndexpr::{sum_axis, Expr, Tensor};
//!
//! let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [2, 3]).unwrap();
//! let b = Tensor::from_vec(vec![10.0, 20.0, 30.0], [1, 3]).unwrap();
//!
//! // Broadcast add, then square; nothing is evaluated until `copy`.
//! let expr = (&a + &b).map(|x: f64| x * x);
//! assert_eq!(expr.shape(), [2, 3]);
//!
//! let rows = sum_axis(&a, 1).unwrap().copy();
//! assert_eq!(rows.into_vec(), vec![6.0, 15.0]);
//! assert_eq!(expr.copy()[[1, 2]], 36.0 * 36.0);
//! ```

pub mod construct;
pub mod error;
pub mod expr;
pub mod iter;
pub mod math;
#[cfg(feature = "random")]
pub mod random;
pub mod routines;
pub mod scalar;
pub mod shape;
pub mod storage;
pub mod tensor;
pub mod view;

pub use construct::{asarray, asmatrix, default_like, full_like, ones_like, zeros_like, NestedData};
pub use error::{ErrorKind, TensorError};
pub use expr::ops::{
    add, div, equal, greater, greater_equal, less, less_equal, logical_and, logical_not,
    logical_or, mul, not_equal, rem, sub,
};
pub use expr::{
    accumulate, all, allclose, any, apply, apply_along_axes, apply_along_axis, apply_binary,
    array_equal, cumprod, cumsum, fold, max, max_axis, min, min_axis, outer, outer_into,
    outer_with, permute, prod, prod_axis, ptp_axis, reduce, reduce_axis, reverse, shift, sum,
    sum_axis, transpose, unzip, where_, zip, Expr, ExprMut, IntoOperand,
};
pub use iter::{AxisIter, IndexedIter, Iter};
#[cfg(feature = "random")]
pub use random::{RandomNormal, RandomUniform};
pub use routines::{
    astype, broadcast_to, compress, concatenate, extract, flatten, pad, place, put,
    put_along_axis, putmask, reshape, select, stack, take, take_along_axis, take_along_axis_view,
    take_axis, PadMode,
};
pub use scalar::{c64, Scalar};
pub use shape::{Index, Layout, Shape};
pub use storage::Dense;
pub use tensor::Tensor;
pub use view::{IndirectView, IndirectViewMut, MaskedView, MaskedViewMut, View, ViewMut};
