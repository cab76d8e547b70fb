//! Iterators over expressions.
//!
//! [`Iter`] walks every element of an expression through a flat counter and
//! unravels the counter into a multi-index on each step, so it supports
//! random access, reverse iteration and distances in O(1).
//! [`AxisIter`] walks only a subset of axes while the remaining coordinates
//! stay fixed; axis-wise reductions are built on it.

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

use smallvec::SmallVec;

use crate::expr::Expr;
use crate::shape::{ravel_index, unravel_index, Index, Layout, Shape};

/// Element iterator over an expression in a fixed order.
pub struct Iter<'a, E: ?Sized, const N: usize> {
    expr: &'a E,
    shape: Shape<N>,
    order: Layout,
    front: usize,
    back: usize,
}

impl<'a, E: Expr<N> + ?Sized, const N: usize> Iter<'a, E, N> {
    /// Iterate all of `expr` in `order`.
    pub fn new(expr: &'a E, order: Layout) -> Self {
        let shape = expr.shape();
        Self {
            expr,
            shape,
            order,
            front: 0,
            back: shape.size(),
        }
    }

    /// Traversal order.
    pub fn order(&self) -> Layout {
        self.order
    }

    /// Flat position of the next element to be yielded from the front.
    pub fn position(&self) -> usize {
        self.front
    }

    /// Multi-index of the next element, or `None` once exhausted.
    pub fn index(&self) -> Option<Index<N>> {
        (self.front < self.back).then(|| unravel_index(self.front, &self.shape, self.order))
    }

    /// Element at absolute flat position `pos` in this iterator's order.
    pub fn get(&self, pos: usize) -> Option<E::Elem> {
        (pos < self.shape.size())
            .then(|| self.expr.eval(&unravel_index(pos, &self.shape, self.order)))
    }

    /// Element `offset` steps ahead of the front without advancing.
    pub fn peek_at(&self, offset: usize) -> Option<E::Elem> {
        let pos = self.front.checked_add(offset)?;
        if pos < self.back { self.get(pos) } else { None }
    }

    /// Signed number of steps from `self` to `other`.
    ///
    /// Returns `None` if the iterators walk different expressions or use
    /// different orders.
    pub fn distance(&self, other: &Self) -> Option<isize> {
        self.same_source(other)
            .then(|| other.front as isize - self.front as isize)
    }

    /// Pair every element with its multi-index.
    pub fn indexed(self) -> IndexedIter<'a, E, N> {
        IndexedIter { inner: self }
    }

    fn same_source(&self, other: &Self) -> bool {
        std::ptr::eq(self.expr, other.expr) && self.order == other.order
    }

    #[inline]
    fn at(&self, pos: usize) -> E::Elem {
        self.expr.eval(&unravel_index(pos, &self.shape, self.order))
    }
}

impl<E: ?Sized, const N: usize> Clone for Iter<'_, E, N> {
    fn clone(&self) -> Self {
        Self {
            expr: self.expr,
            shape: self.shape,
            order: self.order,
            front: self.front,
            back: self.back,
        }
    }
}

impl<E: ?Sized, const N: usize> fmt::Debug for Iter<'_, E, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("shape", &self.shape)
            .field("order", &self.order)
            .field("front", &self.front)
            .field("back", &self.back)
            .finish()
    }
}

impl<E: Expr<N> + ?Sized, const N: usize> Iterator for Iter<'_, E, N> {
    type Item = E::Elem;

    #[inline]
    fn next(&mut self) -> Option<E::Elem> {
        if self.front >= self.back {
            return None;
        }
        let item = self.at(self.front);
        self.front += 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<E::Elem> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }

    fn count(self) -> usize {
        self.back - self.front
    }
}

impl<E: Expr<N> + ?Sized, const N: usize> DoubleEndedIterator for Iter<'_, E, N> {
    #[inline]
    fn next_back(&mut self) -> Option<E::Elem> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.at(self.back))
    }

    fn nth_back(&mut self, n: usize) -> Option<E::Elem> {
        self.back = self.back.saturating_sub(n).max(self.front);
        self.next_back()
    }
}

impl<E: Expr<N> + ?Sized, const N: usize> ExactSizeIterator for Iter<'_, E, N> {}

impl<E: Expr<N> + ?Sized, const N: usize> FusedIterator for Iter<'_, E, N> {}

impl<E: ?Sized, const N: usize> PartialEq for Iter<'_, E, N> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.expr, other.expr)
            && self.order == other.order
            && self.front == other.front
    }
}

impl<E: ?Sized, const N: usize> PartialOrd for Iter<'_, E, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if std::ptr::eq(self.expr, other.expr) && self.order == other.order {
            self.front.partial_cmp(&other.front)
        } else {
            None
        }
    }
}

/// [`Iter`] that also yields each element's multi-index.
#[derive(Clone, Debug)]
pub struct IndexedIter<'a, E: ?Sized, const N: usize> {
    inner: Iter<'a, E, N>,
}

impl<E: Expr<N> + ?Sized, const N: usize> Iterator for IndexedIter<'_, E, N> {
    type Item = (Index<N>, E::Elem);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.inner.index()?;
        self.inner.next().map(|item| (index, item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<E: Expr<N> + ?Sized, const N: usize> DoubleEndedIterator for IndexedIter<'_, E, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let inner = &mut self.inner;
        if inner.front >= inner.back {
            return None;
        }
        let index = unravel_index(inner.back - 1, &inner.shape, inner.order);
        inner.next_back().map(|item| (index, item))
    }
}

impl<E: Expr<N> + ?Sized, const N: usize> ExactSizeIterator for IndexedIter<'_, E, N> {}

/// Iterator over a sub-lattice of an expression.
///
/// The coordinates of every axis not listed in `free_axes` stay at the value
/// given by `base`; the listed axes are walked in row-major order among
/// themselves (the first listed axis varies slowest).
pub struct AxisIter<'a, E: ?Sized, const N: usize> {
    expr: &'a E,
    base: Index<N>,
    free_axes: SmallVec<[usize; 4]>,
    extents: SmallVec<[usize; 4]>,
    front: usize,
    back: usize,
}

impl<'a, E: Expr<N> + ?Sized, const N: usize> AxisIter<'a, E, N> {
    /// Walk `free_axes` of `expr` with all other coordinates taken from `base`.
    ///
    /// Every entry of `free_axes` must be a valid axis of rank `N`.
    pub fn new(expr: &'a E, base: Index<N>, free_axes: &[usize]) -> Self {
        let shape = expr.shape();
        let free_axes: SmallVec<[usize; 4]> = free_axes.iter().copied().collect();
        let extents: SmallVec<[usize; 4]> = free_axes.iter().map(|&k| shape[k]).collect();
        let len = extents.iter().product();
        Self {
            expr,
            base,
            free_axes,
            extents,
            front: 0,
            back: len,
        }
    }

    /// Walk the single axis `axis`.
    pub fn along(expr: &'a E, base: Index<N>, axis: usize) -> Self {
        Self::new(expr, base, &[axis])
    }

    /// Index holding the fixed coordinates.
    pub fn base(&self) -> &Index<N> {
        &self.base
    }

    /// Axes being walked.
    pub fn free_axes(&self) -> &[usize] {
        &self.free_axes
    }

    /// Full multi-index of lattice position `pos`.
    pub fn index_at(&self, pos: usize) -> Index<N> {
        let mut index = self.base;
        let mut rem = pos;
        for k in (0..self.free_axes.len()).rev() {
            let extent = self.extents[k];
            if extent != 0 {
                index[self.free_axes[k]] = rem % extent;
                rem /= extent;
            }
        }
        index
    }
}

impl<E: ?Sized, const N: usize> Clone for AxisIter<'_, E, N> {
    fn clone(&self) -> Self {
        Self {
            expr: self.expr,
            base: self.base,
            free_axes: self.free_axes.clone(),
            extents: self.extents.clone(),
            front: self.front,
            back: self.back,
        }
    }
}

impl<E: ?Sized, const N: usize> fmt::Debug for AxisIter<'_, E, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisIter")
            .field("base", &self.base)
            .field("free_axes", &self.free_axes)
            .field("front", &self.front)
            .field("back", &self.back)
            .finish()
    }
}

impl<E: Expr<N> + ?Sized, const N: usize> Iterator for AxisIter<'_, E, N> {
    type Item = E::Elem;

    fn next(&mut self) -> Option<E::Elem> {
        if self.front >= self.back {
            return None;
        }
        let item = self.expr.eval(&self.index_at(self.front));
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<E::Elem> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<E: Expr<N> + ?Sized, const N: usize> DoubleEndedIterator for AxisIter<'_, E, N> {
    fn next_back(&mut self) -> Option<E::Elem> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.expr.eval(&self.index_at(self.back)))
    }
}

impl<E: Expr<N> + ?Sized, const N: usize> ExactSizeIterator for AxisIter<'_, E, N> {}

impl<E: Expr<N> + ?Sized, const N: usize> FusedIterator for AxisIter<'_, E, N> {}

/// Flat row-major position of `index` inside `shape`.
pub(crate) fn row_major_position<const N: usize>(index: &Index<N>, shape: &Shape<N>) -> usize {
    ravel_index(index, shape, Layout::RowMajor)
}
