//! The owning N-dimensional array.
//!
//! [`NdArray`] holds one contiguous buffer of `product(shape)` elements laid
//! out densely in its [`Order`]. Views borrow it; resizing or reassigning it
//! requires exclusive access, so no view can outlive the buffer it reads.

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Index, IndexMut};

use crate::alloc::{BufferAllocator, Global, Propagation};
use crate::base::{Base, ZeroBased};
use crate::iter::{Iter, IterMut};
use crate::nested::{for_each_leaf, infer_shape, Nested};
use crate::offset::{flat_offset, AxisTuple};
use crate::order::{dense_layout, Order, RowMajor};
use crate::region::Region;
use crate::slice::Slice;
use crate::view::{View, ViewMut};
use crate::{NdArrayError, Result};

/// A dense, owning array with a fixed number of axes.
///
/// # Type Parameters
/// - `T`: Element type
/// - `N`: Number of axes (const generic)
/// - `O`: Memory and traversal order (default: [`RowMajor`])
/// - `B`: Index origin (default: [`ZeroBased`])
/// - `A`: Buffer allocator (default: [`Global`])
///
/// # Example
/// ```
/// use strided_ndarray::NdArray;
///
/// let mut a: NdArray<i32, 2> = NdArray::from_fn([2, 3], |[i, j]| (i * 3 + j) as i32);
/// a[[0, 0]] = 10;
/// assert_eq!(a.as_slice(), &[10, 1, 2, 3, 4, 5]);
/// assert_eq!(a.to_string(), "[[10,1,2],[3,4,5]]");
/// ```
pub struct NdArray<
    T,
    const N: usize,
    O: Order = RowMajor,
    B: Base = ZeroBased,
    A: BufferAllocator = Global,
> {
    data: Vec<T>,
    shape: [usize; N],
    strides: [usize; N],
    alloc: A,
    propagation: Propagation,
    _layout: PhantomData<(O, B)>,
}

// ============================================================================
// Construction with the global allocator
// ============================================================================

impl<T, const N: usize, O: Order, B: Base> NdArray<T, N, O, B, Global> {
    /// Create an array of the given shape filled with `T::default()`.
    ///
    /// # Panics
    /// Panics if the element count of `shape` overflows `usize`; use
    /// [`from_extents`](Self::from_extents) to get an error instead.
    pub fn new(shape: [usize; N]) -> Self
    where
        T: Clone + Default,
    {
        Self::from_elem(shape, T::default())
    }

    /// Create an array of the given shape filled with `value`.
    ///
    /// # Panics
    /// Panics if the element count of `shape` overflows `usize`.
    pub fn from_elem(shape: [usize; N], value: T) -> Self
    where
        T: Clone,
    {
        Self::with_allocator(shape, value, Global, Propagation::default())
    }

    /// Create a default-filled array from per-axis extents in any
    /// [`AxisTuple`] form.
    ///
    /// ```
    /// use strided_ndarray::NdArray;
    ///
    /// let a: NdArray<u8, 3> = NdArray::from_extents((2, 3, 4)).unwrap();
    /// assert_eq!(a.shape(), &[2, 3, 4]);
    /// assert!(NdArray::<u8, 3>::from_extents(vec![2, 3]).is_err());
    /// ```
    ///
    /// # Errors
    /// Returns [`NdArrayError::RankMismatch`] for the wrong number of extents
    /// and [`NdArrayError::SizeOverflow`] if their product overflows `usize`.
    pub fn from_extents(extents: impl AxisTuple<N>) -> Result<Self>
    where
        T: Clone + Default,
    {
        let shape = extents.into_axes()?;
        let (strides, size) = dense_layout::<O, N>(&shape)?;
        let mut data = Global.allocate(size);
        data.resize(size, T::default());
        Ok(Self::from_raw(data, shape, strides, Global, Propagation::default()))
    }

    /// Adopt a buffer already laid out densely in order `O`.
    ///
    /// # Errors
    /// Returns [`NdArrayError::SizeOverflow`] if the element count of `shape`
    /// overflows `usize`, and [`NdArrayError::LengthMismatch`] if `data` does
    /// not hold exactly that many elements.
    pub fn from_shape_vec(shape: [usize; N], data: Vec<T>) -> Result<Self> {
        let (strides, size) = dense_layout::<O, N>(&shape)?;
        if data.len() != size {
            return Err(NdArrayError::LengthMismatch {
                expected: size,
                found: data.len(),
            });
        }
        Ok(Self::from_raw(data, shape, strides, Global, Propagation::default()))
    }

    /// Create an array by calling `f` with each user-facing coordinate, in
    /// traversal order.
    ///
    /// # Panics
    /// Panics if the element count of `shape` overflows `usize`.
    pub fn from_fn(shape: [usize; N], mut f: impl FnMut([usize; N]) -> T) -> Self {
        let (strides, size) = O::calculate_strides(&shape);
        let mut data = Global.allocate(size);
        let mut coords = [0usize; N];
        for _ in 0..size {
            data.push(f(coords.map(B::unbase)));
            O::advance(&mut coords, &shape);
        }
        Self::from_raw(data, shape, strides, Global, Propagation::default())
    }

    /// Create an array from a nested literal, inferring the shape.
    ///
    /// # Errors
    /// Returns [`NdArrayError::ShapeMismatch`] if the literal is ragged, mixes
    /// values and sequences as siblings, or nests to a depth other than `N`.
    pub fn from_nested(literal: Nested<T>) -> Result<Self> {
        let shape = infer_shape::<T, N>(&literal)?;
        let (strides, size) = dense_layout::<O, N>(&shape)?;
        let mut slots: Vec<Option<T>> = Global.allocate(size);
        slots.resize_with(size, || None);
        for_each_leaf::<T, N>(literal, |coords, value| {
            let off: usize = coords.iter().zip(&strides).map(|(&i, &s)| i * s).sum();
            slots[off] = Some(value);
        });
        let mut data = Global.allocate(size);
        data.extend(slots.into_iter().flatten());
        Ok(Self::from_raw(data, shape, strides, Global, Propagation::default()))
    }

    /// Materialize a view into a freshly allocated array of the same shape.
    pub fn from_view<B2: Base>(view: &View<'_, T, N, O, B2>) -> Self
    where
        T: Clone,
    {
        let shape = *view.shape();
        let (strides, size) = O::calculate_strides(&shape);
        let mut data = Global.allocate(size);
        data.extend(view.iter().cloned());
        Self::from_raw(data, shape, strides, Global, Propagation::default())
    }
}

impl<T, const N: usize, O: Order, B: Base> TryFrom<Nested<T>> for NdArray<T, N, O, B, Global> {
    type Error = NdArrayError;

    fn try_from(literal: Nested<T>) -> Result<Self> {
        Self::from_nested(literal)
    }
}

// ============================================================================
// Everything else
// ============================================================================

impl<T, const N: usize, O: Order, B: Base, A: BufferAllocator> NdArray<T, N, O, B, A> {
    /// Create an array filled with `value`, drawing its buffer from `alloc`.
    ///
    /// `propagation` decides how `alloc` travels on
    /// [`clone_from`](Clone::clone_from), [`assign`](Self::assign) and
    /// [`swap`](Self::swap) for the lifetime of this array.
    ///
    /// # Panics
    /// Panics if the element count of `shape` overflows `usize`.
    pub fn with_allocator(
        shape: [usize; N],
        value: T,
        alloc: A,
        propagation: Propagation,
    ) -> Self
    where
        T: Clone,
    {
        let (strides, size) = O::calculate_strides(&shape);
        let mut data = alloc.allocate(size);
        data.resize(size, value);
        Self::from_raw(data, shape, strides, alloc, propagation)
    }

    fn from_raw(
        data: Vec<T>,
        shape: [usize; N],
        strides: [usize; N],
        alloc: A,
        propagation: Propagation,
    ) -> Self {
        Self {
            data,
            shape,
            strides,
            alloc,
            propagation,
            _layout: PhantomData,
        }
    }

    #[inline]
    pub fn shape(&self) -> &[usize; N] {
        &self.shape
    }

    #[inline]
    pub fn strides(&self) -> &[usize; N] {
        &self.strides
    }

    /// Extent of one axis.
    ///
    /// # Panics
    /// Panics if `axis >= N`.
    #[inline]
    pub fn extent(&self, axis: usize) -> usize {
        self.shape[axis]
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        N
    }

    /// Number of elements held.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of elements the buffer can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// The buffer in memory order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    #[inline]
    pub fn propagation(&self) -> Propagation {
        self.propagation
    }

    pub(crate) fn region(&self) -> Region<N> {
        Region::from_strides(self.shape, self.strides)
    }

    pub(crate) fn raw_parts(&self) -> (&[T], Region<N>) {
        (&self.data, self.region())
    }

    // ------------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------------

    /// Get an element by coordinate.
    ///
    /// ```
    /// use strided_ndarray::{NdArray, NdArrayError};
    ///
    /// let a: NdArray<i32, 2> = NdArray::from_fn([2, 2], |[i, j]| (10 * i + j) as i32);
    /// assert_eq!(a.get([1, 0]), Ok(&10));
    /// assert_eq!(a.get((1, 1)), Ok(&11));
    /// assert!(matches!(a.get([2, 0]), Err(NdArrayError::OutOfRange { axis: 0, .. })));
    /// ```
    pub fn get(&self, index: impl AxisTuple<N>) -> Result<&T> {
        let off = flat_offset::<B, N>(&self.shape, &self.strides, &index.into_axes()?)?;
        let len = self.data.len();
        self.data
            .get(off)
            .ok_or(NdArrayError::OffsetOutOfRange { offset: off, len })
    }

    pub fn get_mut(&mut self, index: impl AxisTuple<N>) -> Result<&mut T> {
        let off = flat_offset::<B, N>(&self.shape, &self.strides, &index.into_axes()?)?;
        let len = self.data.len();
        self.data
            .get_mut(off)
            .ok_or(NdArrayError::OffsetOutOfRange { offset: off, len })
    }

    /// Elements in traversal order.
    pub fn iter(&self) -> Iter<'_, T, N, O> {
        Iter::new(&self.data, &self.region())
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T, N, O> {
        let region = self.region();
        IterMut::new(&mut self.data, &region)
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.data.fill(value);
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    /// Full-alias view.
    #[inline]
    pub fn view(&self) -> View<'_, T, N, O, B> {
        View::from_region(&self.data, self.region())
    }

    /// Full-alias mutable view.
    #[inline]
    pub fn view_mut(&mut self) -> ViewMut<'_, T, N, O, B> {
        let region = self.region();
        ViewMut::from_region(&mut self.data, region)
    }

    /// Fix the first `K` axes; see [`View::fix_prefix`].
    pub fn fix_prefix<const K: usize, const M: usize>(
        &self,
        index: [usize; K],
    ) -> Result<View<'_, T, M, O, B>> {
        self.view().fix_prefix(index)
    }

    /// Slice every axis; see [`View::slice`].
    pub fn slice(&self, slices: [Slice; N]) -> Result<View<'_, T, N, O, B>> {
        self.view().slice(slices)
    }

    /// Fix the last `K` axes; see [`View::fix_suffix`].
    pub fn fix_suffix<const K: usize, const M: usize>(
        &self,
        index: [usize; K],
    ) -> Result<View<'_, T, M, O, B>> {
        self.view().fix_suffix(index)
    }

    pub fn fix_prefix_slice<const K: usize, const M: usize>(
        &self,
        index: [usize; K],
        slices: [Slice; M],
    ) -> Result<View<'_, T, M, O, B>> {
        self.view().fix_prefix_slice(index, slices)
    }

    pub fn slice_fix_suffix<const K: usize, const M: usize>(
        &self,
        slices: [Slice; M],
        index: [usize; K],
    ) -> Result<View<'_, T, M, O, B>> {
        self.view().slice_fix_suffix(slices, index)
    }

    // ------------------------------------------------------------------------
    // Reshaping
    // ------------------------------------------------------------------------

    /// Change the shape, keeping the linear prefix of the buffer.
    ///
    /// The first `min(old, new)` elements in memory order are kept; new slots
    /// are set to `fill`. The buffer is reused when its capacity suffices.
    /// Coordinates are not preserved across a change of any non-leading
    /// extent; see [`resize_preserving`](Self::resize_preserving).
    ///
    /// # Panics
    /// Panics if the element count of `shape` overflows `usize`.
    pub fn resize(&mut self, shape: [usize; N], fill: T)
    where
        T: Clone,
    {
        let (strides, size) = O::calculate_strides(&shape);
        if size <= self.data.capacity() {
            log::trace!(
                "resize {:?} -> {:?} within capacity {}",
                self.shape,
                shape,
                self.data.capacity()
            );
            self.data.truncate(size);
            self.data.resize(size, fill);
        } else {
            log::debug!(
                "resize {:?} -> {:?} reallocates ({} -> {} elements)",
                self.shape,
                shape,
                self.data.capacity(),
                size
            );
            let mut data = self.alloc.allocate(size);
            data.append(&mut self.data);
            data.resize(size, fill);
            self.data = data;
        }
        self.shape = shape;
        self.strides = strides;
    }

    /// Change the shape, keeping every element whose coordinate lies in both
    /// the old and the new shape.
    ///
    /// ```
    /// use strided_ndarray::{nested, NdArray};
    ///
    /// let mut a: NdArray<i32, 2> = NdArray::try_from(nested!([[1, 2], [3, 4]])).unwrap();
    /// a.resize_preserving([3, 3], 0);
    /// assert_eq!(a.to_string(), "[[1,2,0],[3,4,0],[0,0,0]]");
    /// ```
    ///
    /// # Panics
    /// Panics if the element count of `shape` overflows `usize`.
    pub fn resize_preserving(&mut self, shape: [usize; N], fill: T)
    where
        T: Clone,
    {
        let (strides, size) = O::calculate_strides(&shape);
        log::debug!("resize_preserving {:?} -> {:?}", self.shape, shape);
        let mut data = self.alloc.allocate(size);
        data.resize(size, fill);

        let old_shape = self.shape;
        let mut coords = [0usize; N];
        for value in mem::take(&mut self.data) {
            if coords.iter().zip(&shape).all(|(&i, &n)| i < n) {
                let off: usize = coords.iter().zip(&strides).map(|(&i, &s)| i * s).sum();
                data[off] = value;
            }
            O::advance(&mut coords, &old_shape);
        }
        self.data = data;
        self.shape = shape;
        self.strides = strides;
    }

    // ------------------------------------------------------------------------
    // Value semantics
    // ------------------------------------------------------------------------

    /// Move-assign `other` into `self`.
    ///
    /// With [`Propagation::on_move`] set, or when both allocators compare
    /// equal, the buffer is adopted as is. Otherwise the elements are moved
    /// into a buffer from `self`'s allocator.
    pub fn assign(&mut self, other: Self) {
        let NdArray {
            mut data,
            shape,
            strides,
            alloc,
            ..
        } = other;
        if self.propagation.on_move {
            self.alloc = alloc;
            self.data = data;
        } else if self.alloc == alloc {
            self.data = data;
        } else {
            log::debug!(
                "assign moves {} elements between unequal allocators",
                data.len()
            );
            let mut own = self.alloc.allocate(data.len());
            own.append(&mut data);
            self.data = own;
        }
        self.shape = shape;
        self.strides = strides;
    }

    /// Exchange contents with `other`.
    ///
    /// With [`Propagation::on_swap`] set, or when both allocators compare
    /// equal, buffers are exchanged directly. Otherwise each side moves the
    /// other's elements into a buffer from its own allocator.
    pub fn swap(&mut self, other: &mut Self) {
        if self.propagation.on_swap {
            mem::swap(&mut self.alloc, &mut other.alloc);
            mem::swap(&mut self.data, &mut other.data);
        } else if self.alloc == other.alloc {
            mem::swap(&mut self.data, &mut other.data);
        } else {
            log::debug!(
                "swap moves {} + {} elements between unequal allocators",
                self.data.len(),
                other.data.len()
            );
            let mut mine = self.alloc.allocate(other.data.len());
            mine.append(&mut other.data);
            let mut theirs = other.alloc.allocate(self.data.len());
            theirs.append(&mut self.data);
            self.data = mine;
            other.data = theirs;
        }
        mem::swap(&mut self.shape, &mut other.shape);
        mem::swap(&mut self.strides, &mut other.strides);
    }

    /// Move the contents out, leaving `self` empty with every extent 0.
    ///
    /// The returned array carries the allocator that produced its buffer.
    pub fn take(&mut self) -> Self {
        let empty = [0usize; N];
        let (empty_strides, _) = O::calculate_strides(&empty);
        let data = mem::replace(&mut self.data, self.alloc.allocate(0));
        let shape = mem::replace(&mut self.shape, empty);
        let strides = mem::replace(&mut self.strides, empty_strides);
        Self::from_raw(data, shape, strides, self.alloc.clone(), self.propagation)
    }
}

impl<T: Clone, const N: usize, O: Order, B: Base, A: BufferAllocator> Clone
    for NdArray<T, N, O, B, A>
{
    fn clone(&self) -> Self {
        let mut data = self.alloc.allocate(self.data.len());
        data.extend_from_slice(&self.data);
        Self::from_raw(
            data,
            self.shape,
            self.strides,
            self.alloc.clone(),
            self.propagation,
        )
    }

    /// Copy-assign, taking `source`'s allocator only when
    /// [`Propagation::on_copy`] is set.
    fn clone_from(&mut self, source: &Self) {
        if self.propagation.on_copy && self.alloc != source.alloc {
            log::debug!("clone_from adopts the source allocator");
            self.alloc = source.alloc.clone();
            self.data = self.alloc.allocate(source.data.len());
        } else if self.data.capacity() < source.data.len() {
            self.data = self.alloc.allocate(source.data.len());
        }
        self.data.clear();
        self.data.extend_from_slice(&source.data);
        self.shape = source.shape;
        self.strides = source.strides;
    }
}

impl<T, const N: usize, O: Order, B: Base, A: BufferAllocator + Default> Default
    for NdArray<T, N, O, B, A>
{
    fn default() -> Self {
        let shape = [0usize; N];
        let (strides, _) = O::calculate_strides(&shape);
        let alloc = A::default();
        let data = alloc.allocate(0);
        Self::from_raw(data, shape, strides, alloc, Propagation::default())
    }
}

impl<T: fmt::Debug, const N: usize, O: Order, B: Base, A: BufferAllocator> fmt::Debug
    for NdArray<T, N, O, B, A>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NdArray")
            .field("shape", &self.shape)
            .field("strides", &self.strides)
            .field("order", &O::NAME)
            .field("origin", &B::ORIGIN)
            .field("data", &self.data)
            .finish()
    }
}

impl<T, const N: usize, O: Order, B: Base, A: BufferAllocator, I: AxisTuple<N>> Index<I>
    for NdArray<T, N, O, B, A>
{
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

impl<T, const N: usize, O: Order, B: Base, A: BufferAllocator, I: AxisTuple<N>> IndexMut<I>
    for NdArray<T, N, O, B, A>
{
    fn index_mut(&mut self, index: I) -> &mut T {
        match self.get_mut(index) {
            Ok(x) => x,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<'a, T, const N: usize, O: Order, B: Base, A: BufferAllocator> IntoIterator
    for &'a NdArray<T, N, O, B, A>
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, N, O>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const N: usize, O: Order, B: Base, A: BufferAllocator> IntoIterator
    for &'a mut NdArray<T, N, O, B, A>
{
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, N, O>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
