//! Dense storage for tensor data.

use crate::error::TensorError;

/// Dense storage - contiguous, exclusively owned array of elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Dense<T> {
    data: Vec<T>,
}

impl<T> Dense<T> {
    /// Empty storage (no buffer).
    #[inline]
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create dense storage from existing vector (takes ownership).
    #[inline]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Create storage with `len` copies of `value`, reporting allocation failure.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::AllocationFailure` if the buffer cannot be reserved.
    pub fn try_filled(len: usize, value: T) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        let mut data = try_with_capacity(len)?;
        data.resize(len, value);
        Ok(Self { data })
    }

    /// Create storage with `len` copies of `value`.
    pub fn filled(len: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: vec![value; len],
        }
    }

    /// Length of storage.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if storage is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get immutable slice of data.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get mutable slice of data.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the storage and return the underlying Vec.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

/// Reserve an exact-capacity vector, mapping allocator failure to `TensorError`.
pub(crate) fn try_with_capacity<T>(len: usize) -> Result<Vec<T>, TensorError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| {
        tracing::warn!(elements = len, "tensor buffer allocation failed");
        TensorError::AllocationFailure { elements: len }
    })?;
    Ok(data)
}

impl<T> std::ops::Index<usize> for Dense<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> std::ops::IndexMut<usize> for Dense<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}
