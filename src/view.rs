//! Non-owning strided views.
//!
//! This module provides [`View`] and [`ViewMut`], windows over a buffer owned
//! elsewhere (an [`NdArray`](crate::NdArray) or any slice). A view is a
//! borrowed slice plus three `N`-length metadata arrays (shape, strides,
//! per-axis offsets); building one never allocates or copies elements.
//!
//! Key features:
//! - Const-generic rank for type safety
//! - Prefix fixing, per-axis slicing, suffix fixing and their compositions,
//!   each computed in one pass
//! - Read-only views cannot write at the type level; mutable views write
//!   through to the shared buffer
//!
//! The borrow ties every view to its source: the source cannot be resized,
//! reassigned or dropped while a view over it is alive.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::array::NdArray;
use crate::base::{Base, ZeroBased};
use crate::iter::{Iter, IterMut};
use crate::offset::{validate_bounds, validate_disjoint, AxisTuple};
use crate::order::{dense_layout, Order, RowMajor};
use crate::region::Region;
use crate::slice::Slice;
use crate::{NdArrayError, Result};

/// An immutable strided view over a contiguous buffer.
///
/// # Type Parameters
/// - `'a`: Lifetime of the underlying data
/// - `T`: Element type
/// - `N`: Number of axes (const generic)
/// - `O`: Traversal order (default: [`RowMajor`])
/// - `B`: Index origin (default: [`ZeroBased`])
///
/// # Example
/// ```
/// use strided_ndarray::{Slice, View};
///
/// let data: Vec<i32> = (0..16).collect();
/// let grid: View<'_, i32, 2> = View::from_parts(&data, [4, 4], [4, 1], 0).unwrap();
/// let center = grid.slice([Slice::new(1, 3, 1), Slice::new(1, 3, 1)]).unwrap();
/// assert_eq!(center.iter().copied().collect::<Vec<_>>(), vec![5, 6, 9, 10]);
/// ```
pub struct View<'a, T, const N: usize, O: Order = RowMajor, B: Base = ZeroBased> {
    data: &'a [T],
    region: Region<N>,
    _layout: PhantomData<(O, B)>,
}

/// A mutable strided view over a contiguous buffer.
///
/// Same as [`View`] but allows writing through to the shared buffer.
/// Transformations consume the view to prevent aliasing of mutable views;
/// use [`ViewMut::reborrow`] to keep using the source view.
pub struct ViewMut<'a, T, const N: usize, O: Order = RowMajor, B: Base = ZeroBased> {
    data: &'a mut [T],
    region: Region<N>,
    _layout: PhantomData<(O, B)>,
}

impl<T, const N: usize, O: Order, B: Base> Clone for View<'_, T, N, O, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const N: usize, O: Order, B: Base> Copy for View<'_, T, N, O, B> {}

impl<T, const N: usize, O: Order, B: Base> fmt::Debug for View<'_, T, N, O, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("shape", &self.region.shape)
            .field("strides", &self.region.strides)
            .field("offsets", &self.region.offsets)
            .field("order", &O::NAME)
            .finish()
    }
}

impl<T, const N: usize, O: Order, B: Base> fmt::Debug for ViewMut<'_, T, N, O, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewMut")
            .field("shape", &self.region.shape)
            .field("strides", &self.region.strides)
            .field("offsets", &self.region.offsets)
            .field("order", &O::NAME)
            .finish()
    }
}

impl<'a, T, const N: usize, O: Order, B: Base> View<'a, T, N, O, B> {
    /// Create a view over `data` with explicit strides and a flat start offset.
    ///
    /// # Errors
    /// Returns an error if the view would reach past the end of `data`, or if
    /// its element count overflows `usize` (possible with zero strides).
    pub fn from_parts(
        data: &'a [T],
        shape: [usize; N],
        strides: [usize; N],
        offset: usize,
    ) -> Result<Self> {
        dense_layout::<O, N>(&shape)?;
        validate_bounds(data.len(), &shape, &strides, offset)?;
        let mut region = Region::from_strides(shape, strides);
        region.base = offset;
        Ok(Self::from_region(data, region))
    }

    pub(crate) fn from_region(data: &'a [T], region: Region<N>) -> Self {
        log::trace!(
            "view shape={:?} strides={:?} start={}",
            region.shape,
            region.strides,
            region.start()
        );
        Self {
            data,
            region,
            _layout: PhantomData,
        }
    }

    #[inline]
    pub fn shape(&self) -> &[usize; N] {
        &self.region.shape
    }

    #[inline]
    pub fn strides(&self) -> &[usize; N] {
        &self.region.strides
    }

    /// Per-axis start offsets accumulated by slicing.
    #[inline]
    pub fn offsets(&self) -> &[usize; N] {
        &self.region.offsets
    }

    /// Flat buffer offset of the first element.
    #[inline]
    pub fn offset(&self) -> usize {
        self.region.start()
    }

    #[inline]
    pub fn extent(&self, axis: usize) -> usize {
        self.region.shape[axis]
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        N
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.region.len_in(self.data.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The whole borrowed buffer, including elements outside the view.
    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// Whether the view is one dense block in traversal order.
    pub fn is_contiguous(&self) -> bool {
        self.region.is_contiguous::<O>()
    }

    pub(crate) fn raw_parts(&self) -> (&'a [T], Region<N>) {
        (self.data, self.region)
    }

    /// Get an element by coordinate.
    pub fn get(&self, index: impl AxisTuple<N>) -> Result<&'a T> {
        let off = self.region.offset_of::<B>(&index.into_axes()?)?;
        let data = self.data;
        data.get(off).ok_or(NdArrayError::OffsetOutOfRange {
            offset: off,
            len: data.len(),
        })
    }

    /// Elements in traversal order.
    pub fn iter(&self) -> Iter<'a, T, N, O> {
        Iter::new(self.data, &self.region)
    }

    /// Full alias: same shape, strides and offsets.
    #[inline]
    pub fn view(&self) -> View<'a, T, N, O, B> {
        *self
    }

    /// Fix the first `K` axes, keeping the trailing `M = N - K`.
    pub fn fix_prefix<const K: usize, const M: usize>(
        &self,
        index: [usize; K],
    ) -> Result<View<'a, T, M, O, B>> {
        let region = self.region.fix_prefix::<B, K, M>(&index)?;
        Ok(View::from_region(self.data, region))
    }

    /// Slice every axis.
    pub fn slice(&self, slices: [Slice; N]) -> Result<View<'a, T, N, O, B>> {
        let region = self.region.slice::<B>(&slices)?;
        Ok(View::from_region(self.data, region))
    }

    /// Fix the last `K` axes, keeping the leading `M = N - K`.
    pub fn fix_suffix<const K: usize, const M: usize>(
        &self,
        index: [usize; K],
    ) -> Result<View<'a, T, M, O, B>> {
        let region = self.region.fix_suffix::<B, K, M>(&index)?;
        Ok(View::from_region(self.data, region))
    }

    /// Fix the first `K` axes and slice the remaining `M`, in one pass.
    pub fn fix_prefix_slice<const K: usize, const M: usize>(
        &self,
        index: [usize; K],
        slices: [Slice; M],
    ) -> Result<View<'a, T, M, O, B>> {
        let region = self.region.fix_prefix_slice::<B, K, M>(&index, &slices)?;
        Ok(View::from_region(self.data, region))
    }

    /// Slice the leading `M` axes and fix the last `K`, in one pass.
    pub fn slice_fix_suffix<const K: usize, const M: usize>(
        &self,
        slices: [Slice; M],
        index: [usize; K],
    ) -> Result<View<'a, T, M, O, B>> {
        let region = self.region.slice_fix_suffix::<B, K, M>(&slices, &index)?;
        Ok(View::from_region(self.data, region))
    }

    /// Copy the visited elements into a fresh array of the same shape.
    pub fn to_owned(&self) -> NdArray<T, N, O, B>
    where
        T: Clone,
    {
        NdArray::from_view(self)
    }
}

impl<'a, T, const N: usize, O: Order, B: Base> ViewMut<'a, T, N, O, B> {
    /// Create a mutable view over `data` with explicit strides and a flat
    /// start offset.
    ///
    /// # Errors
    /// Returns an error if the view would reach past the end of `data`, or if
    /// two coordinates could map to the same element.
    pub fn from_parts(
        data: &'a mut [T],
        shape: [usize; N],
        strides: [usize; N],
        offset: usize,
    ) -> Result<Self> {
        dense_layout::<O, N>(&shape)?;
        validate_bounds(data.len(), &shape, &strides, offset)?;
        validate_disjoint(&shape, &strides)?;
        let mut region = Region::from_strides(shape, strides);
        region.base = offset;
        Ok(Self::from_region(data, region))
    }

    pub(crate) fn from_region(data: &'a mut [T], region: Region<N>) -> Self {
        Self {
            data,
            region,
            _layout: PhantomData,
        }
    }

    #[inline]
    pub fn shape(&self) -> &[usize; N] {
        &self.region.shape
    }

    #[inline]
    pub fn strides(&self) -> &[usize; N] {
        &self.region.strides
    }

    #[inline]
    pub fn offsets(&self) -> &[usize; N] {
        &self.region.offsets
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.region.start()
    }

    #[inline]
    pub fn extent(&self, axis: usize) -> usize {
        self.region.shape[axis]
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        N
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.region.len_in(self.data.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_contiguous(&self) -> bool {
        self.region.is_contiguous::<O>()
    }

    pub(crate) fn raw_parts(&self) -> (&[T], Region<N>) {
        (&*self.data, self.region)
    }

    /// Reborrow as an immutable view.
    #[inline]
    pub fn as_view(&self) -> View<'_, T, N, O, B> {
        View::from_region(&*self.data, self.region)
    }

    /// Reborrow as a shorter-lived mutable view.
    #[inline]
    pub fn reborrow(&mut self) -> ViewMut<'_, T, N, O, B> {
        ViewMut::from_region(&mut *self.data, self.region)
    }

    pub fn get(&self, index: impl AxisTuple<N>) -> Result<&T> {
        let off = self.region.offset_of::<B>(&index.into_axes()?)?;
        let len = self.data.len();
        self.data
            .get(off)
            .ok_or(NdArrayError::OffsetOutOfRange { offset: off, len })
    }

    pub fn get_mut(&mut self, index: impl AxisTuple<N>) -> Result<&mut T> {
        let off = self.region.offset_of::<B>(&index.into_axes()?)?;
        let len = self.data.len();
        self.data
            .get_mut(off)
            .ok_or(NdArrayError::OffsetOutOfRange { offset: off, len })
    }

    /// Set an element.
    pub fn set(&mut self, index: impl AxisTuple<N>, value: T) -> Result<()> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    /// Write `value` into every element of the view.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        for x in self.iter_mut() {
            *x = value.clone();
        }
    }

    pub fn iter(&self) -> Iter<'_, T, N, O> {
        Iter::new(&*self.data, &self.region)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T, N, O> {
        IterMut::new(&mut *self.data, &self.region)
    }

    /// Consume the view into an iterator over mutable references.
    pub fn into_iter_mut(self) -> IterMut<'a, T, N, O> {
        IterMut::new(self.data, &self.region)
    }

    pub fn fix_prefix<const K: usize, const M: usize>(
        self,
        index: [usize; K],
    ) -> Result<ViewMut<'a, T, M, O, B>> {
        let region = self.region.fix_prefix::<B, K, M>(&index)?;
        Ok(ViewMut::from_region(self.data, region))
    }

    pub fn slice(self, slices: [Slice; N]) -> Result<ViewMut<'a, T, N, O, B>> {
        let region = self.region.slice::<B>(&slices)?;
        Ok(ViewMut::from_region(self.data, region))
    }

    pub fn fix_suffix<const K: usize, const M: usize>(
        self,
        index: [usize; K],
    ) -> Result<ViewMut<'a, T, M, O, B>> {
        let region = self.region.fix_suffix::<B, K, M>(&index)?;
        Ok(ViewMut::from_region(self.data, region))
    }

    pub fn fix_prefix_slice<const K: usize, const M: usize>(
        self,
        index: [usize; K],
        slices: [Slice; M],
    ) -> Result<ViewMut<'a, T, M, O, B>> {
        let region = self.region.fix_prefix_slice::<B, K, M>(&index, &slices)?;
        Ok(ViewMut::from_region(self.data, region))
    }

    pub fn slice_fix_suffix<const K: usize, const M: usize>(
        self,
        slices: [Slice; M],
        index: [usize; K],
    ) -> Result<ViewMut<'a, T, M, O, B>> {
        let region = self.region.slice_fix_suffix::<B, K, M>(&slices, &index)?;
        Ok(ViewMut::from_region(self.data, region))
    }

    pub fn to_owned(&self) -> NdArray<T, N, O, B>
    where
        T: Clone,
    {
        NdArray::from_view(&self.as_view())
    }
}

impl<'a, T, const N: usize, O: Order, B: Base> IntoIterator for View<'a, T, N, O, B> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, N, O>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const N: usize, O: Order, B: Base> IntoIterator for ViewMut<'a, T, N, O, B> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, N, O>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_iter_mut()
    }
}

impl<T, const N: usize, O: Order, B: Base, I: AxisTuple<N>> Index<I> for View<'_, T, N, O, B> {
    type Output = T;

    /// # Panics
    /// Panics if the coordinate is out of range.
    fn index(&self, index: I) -> &T {
        match self.get(index) {
            Ok(x) => x,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T, const N: usize, O: Order, B: Base, I: AxisTuple<N>> Index<I> for ViewMut<'_, T, N, O, B> {
    type Output = T;

    fn index(&self, index: I) -> &T {
        match self.get(index) {
            Ok(x) => x,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T, const N: usize, O: Order, B: Base, I: AxisTuple<N>> IndexMut<I>
    for ViewMut<'_, T, N, O, B>
{
    fn index_mut(&mut self, index: I) -> &mut T {
        match self.get_mut(index) {
            Ok(x) => x,
            Err(err) => panic!("{err}"),
        }
    }
}
