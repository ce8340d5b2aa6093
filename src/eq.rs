//! Element-wise equality between arrays and views.
//!
//! Two regions compare equal when their shapes agree on every axis and every
//! pair of elements met in lockstep traversal compares equal. Both sides must
//! share an [`Order`]; index origin and allocator may differ.

use std::ptr;

use crate::alloc::BufferAllocator;
use crate::array::NdArray;
use crate::base::Base;
use crate::iter::Iter;
use crate::order::Order;
use crate::region::Region;
use crate::view::{View, ViewMut};

fn regions_eq<T, U, const N: usize, O: Order>(
    (a, ra): (&[T], Region<N>),
    (b, rb): (&[U], Region<N>),
) -> bool
where
    T: PartialEq<U>,
{
    if ra.shape != rb.shape {
        return false;
    }
    let lhs = Iter::<T, N, O>::new(a, &ra);
    let rhs = Iter::<U, N, O>::new(b, &rb);
    if lhs.len() != rhs.len() {
        return false;
    }
    let same_buffer = ptr::eq(a.as_ptr().cast::<()>(), b.as_ptr().cast::<()>());
    if same_buffer && ra.start() == rb.start() && ra.strides == rb.strides {
        return true;
    }
    lhs.zip(rhs).all(|(x, y)| x == y)
}

macro_rules! impl_region_eq {
    ([$($generics:tt)*] $lhs:ty, $rhs:ty) => {
        impl<$($generics)*> PartialEq<$rhs> for $lhs
        where
            T: PartialEq<U>,
        {
            fn eq(&self, other: &$rhs) -> bool {
                regions_eq::<T, U, N, O>(self.raw_parts(), other.raw_parts())
            }
        }
    };
}

impl_region_eq!(
    [T, U, const N: usize, O: Order, B1: Base, B2: Base, A1: BufferAllocator, A2: BufferAllocator]
    NdArray<T, N, O, B1, A1>, NdArray<U, N, O, B2, A2>
);
impl_region_eq!(
    ['b, T, U, const N: usize, O: Order, B1: Base, B2: Base, A1: BufferAllocator]
    NdArray<T, N, O, B1, A1>, View<'b, U, N, O, B2>
);
impl_region_eq!(
    ['b, T, U, const N: usize, O: Order, B1: Base, B2: Base, A1: BufferAllocator]
    NdArray<T, N, O, B1, A1>, ViewMut<'b, U, N, O, B2>
);
impl_region_eq!(
    ['a, T, U, const N: usize, O: Order, B1: Base, B2: Base, A2: BufferAllocator]
    View<'a, T, N, O, B1>, NdArray<U, N, O, B2, A2>
);
impl_region_eq!(
    ['a, 'b, T, U, const N: usize, O: Order, B1: Base, B2: Base]
    View<'a, T, N, O, B1>, View<'b, U, N, O, B2>
);
impl_region_eq!(
    ['a, 'b, T, U, const N: usize, O: Order, B1: Base, B2: Base]
    View<'a, T, N, O, B1>, ViewMut<'b, U, N, O, B2>
);
impl_region_eq!(
    ['a, T, U, const N: usize, O: Order, B1: Base, B2: Base, A2: BufferAllocator]
    ViewMut<'a, T, N, O, B1>, NdArray<U, N, O, B2, A2>
);
impl_region_eq!(
    ['a, 'b, T, U, const N: usize, O: Order, B1: Base, B2: Base]
    ViewMut<'a, T, N, O, B1>, View<'b, U, N, O, B2>
);
impl_region_eq!(
    ['a, 'b, T, U, const N: usize, O: Order, B1: Base, B2: Base]
    ViewMut<'a, T, N, O, B1>, ViewMut<'b, U, N, O, B2>
);

impl<T: Eq, const N: usize, O: Order, B: Base, A: BufferAllocator> Eq for NdArray<T, N, O, B, A> {}
impl<T: Eq, const N: usize, O: Order, B: Base> Eq for View<'_, T, N, O, B> {}
impl<T: Eq, const N: usize, O: Order, B: Base> Eq for ViewMut<'_, T, N, O, B> {}
