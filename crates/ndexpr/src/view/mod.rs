//! Non-owning views over a tensor's buffer.
//!
//! - [`View`] / [`ViewMut`]: shape + per-axis strides + base offset.
//! - [`IndirectView`] / [`IndirectViewMut`]: shape + explicit buffer offsets
//!   (gather results that stay linked to the source).
//! - [`MaskedView`] / [`MaskedViewMut`]: the positions selected by a boolean
//!   mask, exposed as a 1-D sequence.
//!
//! Views obtained through `&Tensor` are read-only; the `*Mut` variants
//! borrow the tensor mutably and write through to it.

mod indirect;
mod masked;
mod strided;

pub use indirect::{IndirectView, IndirectViewMut};
pub use masked::{MaskedView, MaskedViewMut};
pub use strided::{View, ViewMut};
