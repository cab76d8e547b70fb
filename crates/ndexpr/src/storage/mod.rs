//! Storage types for tensor data.
//!
//! Storage is always a flat buffer; shape, strides and layout live in the
//! [`Tensor`](crate::tensor::Tensor) wrapper.

mod dense;

pub use dense::Dense;
pub(crate) use dense::try_with_capacity;
