//! Nested-bracket rendering.
//!
//! Axes are written outermost to innermost by logical coordinate, whatever
//! the memory order: shape `[2, 3]` holding `1..=6` renders as
//! `[[1,2,3],[4,5,6]]`. Siblings are comma-separated with no spaces. A rank-0
//! region renders its lone element. Format flags apply to every element.

use std::fmt;

use crate::alloc::BufferAllocator;
use crate::array::NdArray;
use crate::base::Base;
use crate::order::Order;
use crate::region::Region;
use crate::view::{View, ViewMut};

fn write_region<T: fmt::Display, const N: usize>(
    f: &mut fmt::Formatter<'_>,
    data: &[T],
    region: &Region<N>,
) -> fmt::Result {
    if N == 0 && data.is_empty() {
        return f.write_str("[]");
    }
    write_axis(f, data, &region.shape, &region.strides, region.start())
}

fn write_axis<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    data: &[T],
    shape: &[usize],
    strides: &[usize],
    offset: usize,
) -> fmt::Result {
    let Some((&extent, inner_shape)) = shape.split_first() else {
        return match data.get(offset) {
            Some(value) => fmt::Display::fmt(value, f),
            None => Err(fmt::Error),
        };
    };
    let (&stride, inner_strides) = strides.split_first().ok_or(fmt::Error)?;
    f.write_str("[")?;
    for i in 0..extent {
        if i > 0 {
            f.write_str(",")?;
        }
        write_axis(f, data, inner_shape, inner_strides, offset + i * stride)?;
    }
    f.write_str("]")
}

impl<T: fmt::Display, const N: usize, O: Order, B: Base, A: BufferAllocator> fmt::Display
    for NdArray<T, N, O, B, A>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (data, region) = self.raw_parts();
        write_region(f, data, &region)
    }
}

impl<T: fmt::Display, const N: usize, O: Order, B: Base> fmt::Display for View<'_, T, N, O, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (data, region) = self.raw_parts();
        write_region(f, data, &region)
    }
}

impl<T: fmt::Display, const N: usize, O: Order, B: Base> fmt::Display for ViewMut<'_, T, N, O, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (data, region) = self.raw_parts();
        write_region(f, data, &region)
    }
}
