//! Offset arithmetic shared by arrays, views and iterators.
//!
//! A coordinate is combined with per-axis strides (and, for views, per-axis
//! offsets) into one flat buffer offset:
//!
//! ```text
//! offset = Σ_i rebase(index[i]) * strides[i] + offsets[i]
//! ```
//!
//! The same routine serves the reduced-arity forms used when fixing a prefix
//! or a suffix of the axes.

use crate::base::Base;
use crate::{NdArrayError, Result};

/// Values supplied one per axis: coordinates or extents.
///
/// The canonical form is `[usize; N]`. Tuples, a bare `usize` (rank 1) and
/// runtime-length lists convert into it; lists are length-checked.
pub trait AxisTuple<const N: usize> {
    fn into_axes(self) -> Result<[usize; N]>;
}

impl<const N: usize> AxisTuple<N> for [usize; N] {
    #[inline]
    fn into_axes(self) -> Result<[usize; N]> {
        Ok(self)
    }
}

impl<const N: usize> AxisTuple<N> for &[usize; N] {
    #[inline]
    fn into_axes(self) -> Result<[usize; N]> {
        Ok(*self)
    }
}

impl<const N: usize> AxisTuple<N> for &[usize] {
    #[inline]
    fn into_axes(self) -> Result<[usize; N]> {
        self.try_into()
            .map_err(|_| NdArrayError::RankMismatch(self.len(), N))
    }
}

impl<const N: usize> AxisTuple<N> for &Vec<usize> {
    #[inline]
    fn into_axes(self) -> Result<[usize; N]> {
        self.as_slice().into_axes()
    }
}

impl<const N: usize> AxisTuple<N> for Vec<usize> {
    #[inline]
    fn into_axes(self) -> Result<[usize; N]> {
        self.as_slice().into_axes()
    }
}

impl AxisTuple<1> for usize {
    #[inline]
    fn into_axes(self) -> Result<[usize; 1]> {
        Ok([self])
    }
}

macro_rules! impl_axis_tuple {
    ($n:literal; $($name:ident),+) => {
        impl AxisTuple<$n> for ($(impl_axis_tuple!(@usize $name),)+) {
            #[inline]
            fn into_axes(self) -> Result<[usize; $n]> {
                let ($($name,)+) = self;
                Ok([$($name),+])
            }
        }
    };
    (@usize $name:ident) => { usize };
}

impl_axis_tuple!(1; a);
impl_axis_tuple!(2; a, b);
impl_axis_tuple!(3; a, b, c);
impl_axis_tuple!(4; a, b, c, d);
impl_axis_tuple!(5; a, b, c, d, e);
impl_axis_tuple!(6; a, b, c, d, e, f);

/// Flat offset contributed by `index`, applied to the axes starting at
/// `first_axis`.
///
/// `index` may cover fewer axes than `shape` (prefix or suffix fixing).
/// `offsets` is either empty (owning arrays) or parallel to `shape`.
/// Every coordinate is rebased through `B` and checked against its extent.
#[inline]
pub(crate) fn partial_offset<B: Base>(
    first_axis: usize,
    shape: &[usize],
    strides: &[usize],
    offsets: &[usize],
    index: &[usize],
) -> Result<usize> {
    let mut off = 0usize;
    for (k, &user) in index.iter().enumerate() {
        let axis = first_axis + k;
        let extent = shape[axis];
        let i = B::rebase(user)
            .filter(|&i| i < extent)
            .ok_or(NdArrayError::OutOfRange {
                axis,
                index: user,
                extent,
            })?;
        off += i * strides[axis] + offsets.get(axis).copied().unwrap_or(0);
    }
    Ok(off)
}

/// Full-arity offset for an owning buffer (no per-axis offsets).
#[inline]
pub(crate) fn flat_offset<B: Base, const N: usize>(
    shape: &[usize; N],
    strides: &[usize; N],
    index: &[usize; N],
) -> Result<usize> {
    partial_offset::<B>(0, shape, strides, &[], index)
}

/// Validate that every offset reachable from `offset` stays within `[0, len)`.
pub(crate) fn validate_bounds(
    len: usize,
    shape: &[usize],
    strides: &[usize],
    offset: usize,
) -> Result<()> {
    // Empty region - no access needed
    if shape.contains(&0) {
        return Ok(());
    }
    let overflow = NdArrayError::OffsetOutOfRange {
        offset: usize::MAX,
        len,
    };
    let mut max_offset = offset;
    for (&extent, &stride) in shape.iter().zip(strides) {
        if extent > 1 {
            let end = stride.checked_mul(extent - 1).ok_or(overflow.clone())?;
            max_offset = max_offset.checked_add(end).ok_or(overflow.clone())?;
        }
    }
    if max_offset >= len {
        return Err(NdArrayError::OffsetOutOfRange {
            offset: max_offset,
            len,
        });
    }
    Ok(())
}

/// Validate that no two coordinates of a region map to the same offset.
///
/// Sufficient check: with axes sorted by stride, each stride must exceed the
/// span already covered by the smaller ones.
pub(crate) fn validate_disjoint(shape: &[usize], strides: &[usize]) -> Result<()> {
    if shape.contains(&0) {
        return Ok(());
    }
    let mut axes: Vec<(usize, usize)> = shape
        .iter()
        .zip(strides)
        .filter(|(&extent, _)| extent > 1)
        .map(|(&extent, &stride)| (stride, extent))
        .collect();
    axes.sort_unstable();
    let mut span = 0usize;
    for (stride, extent) in axes {
        if stride <= span {
            return Err(NdArrayError::OverlappingStrides);
        }
        span += stride * (extent - 1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{OneBased, ZeroBased};

    #[test]
    fn test_axis_tuple_forms_agree() {
        let a: [usize; 3] = [1, 2, 3].into_axes().unwrap();
        let b: [usize; 3] = (1, 2, 3).into_axes().unwrap();
        let c: [usize; 3] = vec![1, 2, 3].into_axes().unwrap();
        let d: [usize; 3] = (&[1usize, 2, 3][..]).into_axes().unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a, d);
        let e: [usize; 1] = 4usize.into_axes().unwrap();
        assert_eq!(e, [4]);
    }

    #[test]
    fn test_axis_tuple_wrong_length() {
        let r: Result<[usize; 3]> = vec![1, 2].into_axes();
        assert!(matches!(r, Err(NdArrayError::RankMismatch(2, 3))));
    }

    #[test]
    fn test_flat_offset_row_major() {
        let shape = [2, 3, 4];
        let strides = [12, 4, 1];
        assert_eq!(
            flat_offset::<ZeroBased, 3>(&shape, &strides, &[1, 2, 3]).unwrap(),
            23
        );
        assert_eq!(
            flat_offset::<OneBased, 3>(&shape, &strides, &[2, 3, 4]).unwrap(),
            23
        );
    }

    #[test]
    fn test_flat_offset_out_of_range() {
        let shape = [2, 3];
        let strides = [3, 1];
        let err = flat_offset::<ZeroBased, 2>(&shape, &strides, &[0, 3]).unwrap_err();
        assert!(matches!(
            err,
            NdArrayError::OutOfRange {
                axis: 1,
                index: 3,
                extent: 3
            }
        ));
        // below the one-based origin
        assert!(flat_offset::<OneBased, 2>(&shape, &strides, &[0, 1]).is_err());
    }

    #[test]
    fn test_partial_offset_suffix_with_offsets() {
        // axes 1 and 2 of a [2, 3, 4] region with per-axis offsets
        let shape = [2, 3, 4];
        let strides = [12, 4, 1];
        let offsets = [0, 4, 1];
        let off = partial_offset::<ZeroBased>(1, &shape, &strides, &offsets, &[2, 0]).unwrap();
        assert_eq!(off, 2 * 4 + 4 + 1);
    }

    #[test]
    fn test_validate_bounds_ok() {
        assert!(validate_bounds(6, &[2, 3], &[3, 1], 0).is_ok());
        assert!(validate_bounds(6, &[2, 3], &[1, 2], 0).is_ok());
    }

    #[test]
    fn test_validate_bounds_out_of_range() {
        assert!(validate_bounds(5, &[2, 3], &[3, 1], 0).is_err());
    }

    #[test]
    fn test_validate_bounds_empty() {
        assert!(validate_bounds(0, &[0, 3], &[3, 1], 0).is_ok());
    }

    #[test]
    fn test_validate_bounds_with_offset() {
        assert!(validate_bounds(7, &[2, 3], &[3, 1], 1).is_ok());
        assert!(validate_bounds(6, &[2, 3], &[3, 1], 1).is_err());
    }

    #[test]
    fn test_validate_disjoint() {
        assert!(validate_disjoint(&[2, 3], &[3, 1]).is_ok());
        assert!(validate_disjoint(&[2, 3], &[1, 2]).is_ok());
        assert!(validate_disjoint(&[4, 3], &[0, 1]).is_err());
        assert!(validate_disjoint(&[2, 3], &[2, 1]).is_err());
        // extent-1 axes never alias
        assert!(validate_disjoint(&[1, 3], &[0, 1]).is_ok());
    }
}
