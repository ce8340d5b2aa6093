//! Memory-order strategies.
//!
//! An [`Order`] derives strides from a shape and fixes which axis varies
//! fastest during traversal:
//!
//! - [`RowMajor`] (C default): last index varies fastest
//! - [`ColumnMajor`] (Fortran/Julia default): first index varies fastest

use std::fmt;

use crate::{NdArrayError, Result};

/// Layout and traversal strategy for a fixed-rank array.
pub trait Order: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Human-readable name, used in `Debug` output.
    const NAME: &'static str;

    /// Compute strides for `shape` and the total element count, or `None`
    /// if the count does not fit in `usize`.
    fn checked_strides<const N: usize>(shape: &[usize; N]) -> Option<([usize; N], usize)>;

    /// Compute strides for `shape` and the total element count.
    ///
    /// # Panics
    /// Panics if the element count overflows `usize`.
    #[inline]
    fn calculate_strides<const N: usize>(shape: &[usize; N]) -> ([usize; N], usize) {
        Self::checked_strides(shape)
            .unwrap_or_else(|| panic!("element count of shape {shape:?} overflows usize"))
    }

    /// Axis visited at position `rank` counting from the fastest-varying one.
    ///
    /// `rank` must be `< N`.
    fn axis<const N: usize>(rank: usize) -> usize;

    /// Advance `coords` to the next coordinate in traversal order.
    ///
    /// Returns `false` once every axis has wrapped around, leaving `coords`
    /// back at the origin.
    #[inline]
    fn advance<const N: usize>(coords: &mut [usize; N], shape: &[usize; N]) -> bool {
        for rank in 0..N {
            let axis = Self::axis::<N>(rank);
            coords[axis] += 1;
            if coords[axis] < shape[axis] {
                return true;
            }
            coords[axis] = 0;
        }
        false
    }
}

/// Strides and element count of a dense buffer of `shape` in order `O`.
///
/// # Errors
/// Returns [`NdArrayError::SizeOverflow`] if the layout does not fit in `usize`.
pub(crate) fn dense_layout<O: Order, const N: usize>(
    shape: &[usize; N],
) -> Result<([usize; N], usize)> {
    O::checked_strides(shape).ok_or_else(|| NdArrayError::SizeOverflow(shape.to_vec()))
}

/// Row-major order: stride of the last axis is 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RowMajor;

/// Column-major order: stride of the first axis is 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ColumnMajor;

impl Order for RowMajor {
    const NAME: &'static str = "row-major";

    #[inline]
    fn checked_strides<const N: usize>(shape: &[usize; N]) -> Option<([usize; N], usize)> {
        let mut strides = [0usize; N];
        let mut size = 1usize;
        for i in (0..N).rev() {
            strides[i] = size;
            size = size.checked_mul(shape[i])?;
        }
        Some((strides, size))
    }

    #[inline]
    fn axis<const N: usize>(rank: usize) -> usize {
        N - 1 - rank
    }
}

impl Order for ColumnMajor {
    const NAME: &'static str = "column-major";

    #[inline]
    fn checked_strides<const N: usize>(shape: &[usize; N]) -> Option<([usize; N], usize)> {
        let mut strides = [0usize; N];
        let mut size = 1usize;
        for i in 0..N {
            strides[i] = size;
            size = size.checked_mul(shape[i])?;
        }
        Some((strides, size))
    }

    #[inline]
    fn axis<const N: usize>(rank: usize) -> usize {
        rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_strides() {
        assert_eq!(RowMajor::calculate_strides(&[3, 4]), ([4, 1], 12));
        assert_eq!(RowMajor::calculate_strides(&[2, 3, 4]), ([12, 4, 1], 24));
    }

    #[test]
    fn test_col_major_strides() {
        assert_eq!(ColumnMajor::calculate_strides(&[3, 4]), ([1, 3], 12));
        assert_eq!(ColumnMajor::calculate_strides(&[2, 3, 4]), ([1, 2, 6], 24));
    }

    #[test]
    fn test_rank_zero_strides() {
        assert_eq!(RowMajor::calculate_strides::<0>(&[]), ([], 1));
        assert_eq!(ColumnMajor::calculate_strides::<0>(&[]), ([], 1));
    }

    #[test]
    fn test_zero_extent() {
        let (_, size) = RowMajor::calculate_strides(&[3, 0, 2]);
        assert_eq!(size, 0);
    }

    #[test]
    fn test_size_overflow() {
        assert_eq!(RowMajor::checked_strides(&[usize::MAX, 2]), None);
        assert_eq!(ColumnMajor::checked_strides(&[usize::MAX / 2 + 2, 2]), None);
        assert_eq!(RowMajor::checked_strides(&[usize::MAX, 0]), Some(([0, 1], 0)));
        // strides of the slower axes still have to fit
        assert_eq!(RowMajor::checked_strides(&[0, usize::MAX, 2]), None);
    }

    #[test]
    fn test_dense_layout_reports_overflow() {
        assert_eq!(dense_layout::<RowMajor, 2>(&[2, 3]), Ok(([3, 1], 6)));
        assert_eq!(
            dense_layout::<ColumnMajor, 2>(&[usize::MAX, 2]),
            Err(NdArrayError::SizeOverflow(vec![usize::MAX, 2]))
        );
    }

    #[test]
    #[should_panic(expected = "overflows usize")]
    fn test_calculate_strides_panics_on_overflow() {
        RowMajor::calculate_strides(&[usize::MAX, usize::MAX]);
    }

    #[test]
    fn test_fastest_axis() {
        assert_eq!(RowMajor::axis::<3>(0), 2);
        assert_eq!(RowMajor::axis::<3>(2), 0);
        assert_eq!(ColumnMajor::axis::<3>(0), 0);
        assert_eq!(ColumnMajor::axis::<3>(2), 2);
    }

    #[test]
    fn test_advance_row_major() {
        let shape = [2, 3];
        let mut coords = [0, 0];
        let mut seen = vec![coords];
        while RowMajor::advance(&mut coords, &shape) {
            seen.push(coords);
        }
        assert_eq!(seen, vec![[0, 0], [0, 1], [0, 2], [1, 0], [1, 1], [1, 2]]);
        assert_eq!(coords, [0, 0]);
    }

    #[test]
    fn test_advance_col_major() {
        let shape = [2, 3];
        let mut coords = [0, 0];
        let mut seen = vec![coords];
        while ColumnMajor::advance(&mut coords, &shape) {
            seen.push(coords);
        }
        assert_eq!(seen, vec![[0, 0], [1, 0], [0, 1], [1, 1], [0, 2], [1, 2]]);
    }

    #[test]
    fn test_strides_bijective() {
        fn check<O: Order>(shape: [usize; 3]) {
            let (strides, size) = O::calculate_strides(&shape);
            let mut hit = vec![false; size];
            let mut coords = [0usize; 3];
            loop {
                let off: usize = (0..3).map(|i| coords[i] * strides[i]).sum();
                assert!(!hit[off], "offset {off} reached twice");
                hit[off] = true;
                if !O::advance(&mut coords, &shape) {
                    break;
                }
            }
            assert!(hit.iter().all(|&h| h));
        }
        check::<RowMajor>([2, 3, 4]);
        check::<ColumnMajor>([2, 3, 4]);
        check::<RowMajor>([5, 1, 3]);
        check::<ColumnMajor>([1, 7, 2]);
    }
}
