//! Array routines built on top of the expression engine.
//!
//! - [`shape_ops`]: lazy broadcast, reshape, concatenate, stack and pad nodes.
//! - [`indexing`]: gathers, scatters and mask-driven selection.

pub mod indexing;
pub mod shape_ops;

pub use indexing::{
    compress, extract, place, put, put_along_axis, putmask, select, take, take_along_axis,
    take_along_axis_view, take_axis,
};
pub use shape_ops::{
    astype, broadcast_to, concatenate, flatten, pad, reshape, stack, Broadcast, Concatenate, Pad,
    PadMode, Reshape, Stack,
};
