//! Error types for ndexpr.

use thiserror::Error;

/// Coarse classification of a [`TensorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Shapes could not be unified (broadcasting or exact match).
    Shape,
    /// A coordinate or axis argument is outside its valid range.
    OutOfRange,
    /// Any other violated precondition.
    InvalidArgument,
    /// The allocator could not provide a buffer.
    Allocation,
}

/// Errors that can occur in tensor operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TensorError {
    /// Two shapes are not broadcast-compatible (or not equal where equality is required).
    #[error("shape mismatch: {lhs:?} and {rhs:?} are not compatible")]
    ShapeMismatch { lhs: Vec<usize>, rhs: Vec<usize> },

    /// Number of elements does not match the requested shape.
    #[error("size mismatch: expected {expected} elements, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Index out of bounds.
    #[error("index {index} is out of bounds for axis {axis} with size {dim_size}")]
    IndexOutOfBounds {
        axis: usize,
        index: usize,
        dim_size: usize,
    },

    /// Slice range out of bounds.
    #[error("slice {start}..{end} is out of bounds for axis {axis} with size {size}")]
    SliceOutOfBounds {
        start: usize,
        end: usize,
        axis: usize,
        size: usize,
    },

    /// Axis argument out of bounds.
    #[error("axis {axis} is out of bounds for tensor of rank {ndim}")]
    AxisOutOfBounds { axis: usize, ndim: usize },

    /// Invalid permutation.
    #[error("invalid permutation {perm:?} for tensor with {ndim} dimensions")]
    InvalidPermutation { perm: Vec<usize>, ndim: usize },

    /// Reduction over an empty sequence without an initial value.
    #[error("cannot reduce an empty sequence without an initial value")]
    EmptyReduction,

    /// Other precondition failures.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Buffer allocation failed.
    #[error("failed to allocate a buffer of {elements} elements")]
    AllocationFailure { elements: usize },
}

impl TensorError {
    /// Returns the taxonomy class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TensorError::ShapeMismatch { .. } | TensorError::SizeMismatch { .. } => {
                ErrorKind::Shape
            }
            TensorError::IndexOutOfBounds { .. }
            | TensorError::SliceOutOfBounds { .. }
            | TensorError::AxisOutOfBounds { .. } => ErrorKind::OutOfRange,
            TensorError::InvalidPermutation { .. }
            | TensorError::EmptyReduction
            | TensorError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            TensorError::AllocationFailure { .. } => ErrorKind::Allocation,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        TensorError::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn shapes(lhs: &[usize], rhs: &[usize]) -> Self {
        TensorError::ShapeMismatch {
            lhs: lhs.to_vec(),
            rhs: rhs.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(TensorError::shapes(&[2], &[3]).kind(), ErrorKind::Shape);
        assert_eq!(
            TensorError::AxisOutOfBounds { axis: 3, ndim: 2 }.kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(TensorError::EmptyReduction.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            TensorError::AllocationFailure { elements: 1 }.kind(),
            ErrorKind::Allocation
        );
    }

    #[test]
    fn test_display() {
        let err = TensorError::IndexOutOfBounds {
            axis: 1,
            index: 5,
            dim_size: 3,
        };
        assert_eq!(
            err.to_string(),
            "index 5 is out of bounds for axis 1 with size 3"
        );
    }
}
