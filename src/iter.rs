//! Run-based traversal of strided regions.
//!
//! A region is walked as a sequence of *runs*: maximal spans along the
//! fastest-varying axis (as defined by the [`Order`]) that are stepped with a
//! single stride increment. Only when a run is exhausted do the slower axes
//! roll over (carry propagation, slowest axis last), and the next run's start
//! is recomputed with one offset sum. A one-dimensional region is a single
//! run with no rollover.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::order::Order;
use crate::region::Region;

/// Flat-offset cursor over a region.
#[derive(Debug, Clone)]
pub(crate) struct Runs<const N: usize, O: Order> {
    shape: [usize; N],
    strides: [usize; N],
    start: usize,
    /// Coordinates of the slower axes; the fastest axis is tracked by `pos`.
    coords: [usize; N],
    pos: usize,
    run_stride: usize,
    run_left: usize,
    remaining: usize,
    _order: PhantomData<O>,
}

impl<const N: usize, O: Order> Runs<N, O> {
    /// Cursor over the first `len` elements of `region` (either all of them
    /// or none, for a buffer that has been emptied).
    pub(crate) fn new(region: &Region<N>, len: usize) -> Self {
        let start = region.start();
        let (run_stride, run_left) = if N == 0 {
            (0, len)
        } else {
            let fast = O::axis::<N>(0);
            (region.strides[fast], region.shape[fast])
        };
        Self {
            shape: region.shape,
            strides: region.strides,
            start,
            coords: [0; N],
            pos: start,
            run_stride,
            run_left: if len == 0 { 0 } else { run_left },
            remaining: len,
            _order: PhantomData,
        }
    }

    /// Offset of the element the next call to [`Self::next_offset`] yields.
    #[inline]
    pub(crate) fn peek(&self) -> Option<usize> {
        (self.remaining > 0).then_some(self.pos)
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }

    #[inline]
    pub(crate) fn next_offset(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let off = self.pos;
        self.remaining -= 1;
        self.run_left -= 1;
        if self.run_left > 0 {
            self.pos += self.run_stride;
        } else if self.remaining > 0 {
            self.roll_over();
        }
        Some(off)
    }

    /// Carry into the slower axes and position at the start of the next run.
    fn roll_over(&mut self) {
        let mut pos = self.start;
        let mut carry = true;
        for rank in 1..N {
            let axis = O::axis::<N>(rank);
            if carry {
                self.coords[axis] += 1;
                if self.coords[axis] < self.shape[axis] {
                    carry = false;
                } else {
                    self.coords[axis] = 0;
                }
            }
            pos += self.coords[axis] * self.strides[axis];
        }
        debug_assert!(!carry, "rolled over past the last run");
        self.pos = pos;
        self.run_left = self.shape[O::axis::<N>(0)];
    }
}

/// Iterator over shared references to the elements of a region, in
/// traversal order.
///
/// Two iterators compare equal when they would yield the same element next
/// (same address), or when both are exhausted.
pub struct Iter<'a, T, const N: usize, O: Order> {
    data: &'a [T],
    runs: Runs<N, O>,
}

impl<'a, T, const N: usize, O: Order> Iter<'a, T, N, O> {
    pub(crate) fn new(data: &'a [T], region: &Region<N>) -> Self {
        let len = region.len_in(data.len());
        Self {
            data,
            runs: Runs::new(region, len),
        }
    }

    /// Address of the element yielded next, or `None` at the end.
    #[inline]
    pub fn peek_ptr(&self) -> Option<*const T> {
        self.runs.peek().map(|off| &self.data[off] as *const T)
    }
}

impl<T, const N: usize, O: Order> Clone for Iter<'_, T, N, O> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            runs: self.runs.clone(),
        }
    }
}

impl<T, const N: usize, O: Order> std::fmt::Debug for Iter<'_, T, N, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iter")
            .field("order", &O::NAME)
            .field("remaining", &self.runs.remaining())
            .finish()
    }
}

impl<'a, T, const N: usize, O: Order> Iterator for Iter<'a, T, N, O> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let data = self.data;
        self.runs.next_offset().map(|off| &data[off])
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.runs.remaining();
        (n, Some(n))
    }
}

impl<T, const N: usize, O: Order> ExactSizeIterator for Iter<'_, T, N, O> {}

impl<T, const N: usize, O: Order> FusedIterator for Iter<'_, T, N, O> {}

impl<T, const N: usize, O: Order> PartialEq for Iter<'_, T, N, O> {
    fn eq(&self, other: &Self) -> bool {
        self.peek_ptr() == other.peek_ptr()
    }
}

/// Iterator over mutable references to the elements of a region.
pub struct IterMut<'a, T, const N: usize, O: Order> {
    ptr: *mut T,
    len: usize,
    runs: Runs<N, O>,
    _marker: PhantomData<&'a mut T>,
}

// SAFETY: IterMut hands out disjoint `&mut T`, like `std::slice::IterMut`.
unsafe impl<T: Send, const N: usize, O: Order> Send for IterMut<'_, T, N, O> {}
unsafe impl<T: Sync, const N: usize, O: Order> Sync for IterMut<'_, T, N, O> {}

impl<'a, T, const N: usize, O: Order> IterMut<'a, T, N, O> {
    /// The caller guarantees that `region` maps distinct coordinates to
    /// distinct offsets within `data` (true for every region derived from a
    /// dense layout, and checked by `ViewMut::from_parts`).
    pub(crate) fn new(data: &'a mut [T], region: &Region<N>) -> Self {
        let len = region.len_in(data.len());
        Self {
            ptr: data.as_mut_ptr(),
            len: data.len(),
            runs: Runs::new(region, len),
            _marker: PhantomData,
        }
    }

    /// Address of the element yielded next, or `None` at the end.
    #[inline]
    pub fn peek_ptr(&self) -> Option<*const T> {
        self.runs
            .peek()
            .map(|off| self.ptr.wrapping_add(off) as *const T)
    }
}

impl<T, const N: usize, O: Order> std::fmt::Debug for IterMut<'_, T, N, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IterMut")
            .field("order", &O::NAME)
            .field("remaining", &self.runs.remaining())
            .finish()
    }
}

impl<'a, T, const N: usize, O: Order> Iterator for IterMut<'a, T, N, O> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let off = self.runs.next_offset()?;
        assert!(off < self.len, "strided offset {off} past buffer of {}", self.len);
        // SAFETY: `off` is in bounds and each offset is yielded at most once,
        // so no two returned references alias.
        Some(unsafe { &mut *self.ptr.add(off) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.runs.remaining();
        (n, Some(n))
    }
}

impl<T, const N: usize, O: Order> ExactSizeIterator for IterMut<'_, T, N, O> {}

impl<T, const N: usize, O: Order> FusedIterator for IterMut<'_, T, N, O> {}

impl<T, const N: usize, O: Order> PartialEq for IterMut<'_, T, N, O> {
    fn eq(&self, other: &Self) -> bool {
        self.peek_ptr() == other.peek_ptr()
    }
}
