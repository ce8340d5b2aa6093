//! Region metadata: the shape/strides/offsets triple shared by views and
//! iterators, and the one-pass transforms that build sub-regions.
//!
//! Every transform (prefix fixing, slicing, suffix fixing and their
//! compositions) goes through [`Region::reduce`], which computes the fixed
//! axes' displacement with [`partial_offset`] and the kept axes' new
//! shape/strides/offsets in the same pass.

use crate::base::Base;
use crate::offset::partial_offset;
use crate::order::Order;
use crate::slice::Slice;
use crate::{NdArrayError, Result};

/// Shape, strides and per-axis offsets of a strided region.
///
/// The flat start of the region is `base + Σ offsets`. `base` holds the
/// displacement contributed by axes that have been fixed away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Region<const N: usize> {
    pub(crate) shape: [usize; N],
    pub(crate) strides: [usize; N],
    pub(crate) offsets: [usize; N],
    pub(crate) base: usize,
}

/// Where the fixed coordinates sit relative to the kept axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fixed {
    Prefix,
    Suffix,
}

impl<const N: usize> Region<N> {
    /// Dense region over a fresh buffer laid out in order `O`.
    #[cfg(test)]
    pub(crate) fn dense<O: Order>(shape: [usize; N]) -> Self {
        let (strides, _) = O::calculate_strides(&shape);
        Self::from_strides(shape, strides)
    }

    /// Region over a buffer whose strides are already known.
    pub(crate) fn from_strides(shape: [usize; N], strides: [usize; N]) -> Self {
        Self {
            shape,
            strides,
            offsets: [0; N],
            base: 0,
        }
    }

    /// Flat offset of the first element.
    #[inline]
    pub(crate) fn start(&self) -> usize {
        self.base + self.offsets.iter().sum::<usize>()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Elements reachable over a buffer of `data_len` elements. A rank-0
    /// region over an emptied buffer has none.
    #[inline]
    pub(crate) fn len_in(&self, data_len: usize) -> usize {
        if data_len == 0 {
            0
        } else {
            self.len()
        }
    }

    /// Flat offset of a user-facing coordinate.
    #[inline]
    pub(crate) fn offset_of<B: Base>(&self, index: &[usize; N]) -> Result<usize> {
        Ok(self.base + partial_offset::<B>(0, &self.shape, &self.strides, &self.offsets, index)?)
    }

    /// Whether the region is one dense block traversed in order `O`.
    pub(crate) fn is_contiguous<O: Order>(&self) -> bool {
        let mut expected = 1usize;
        for rank in 0..N {
            let axis = O::axis::<N>(rank);
            if self.shape[axis] <= 1 {
                continue;
            }
            if self.strides[axis] != expected {
                return false;
            }
            expected *= self.shape[axis];
        }
        true
    }

    pub(crate) fn fix_prefix<B: Base, const K: usize, const M: usize>(
        &self,
        index: &[usize; K],
    ) -> Result<Region<M>> {
        self.reduce::<B, K, M>(Fixed::Prefix, index, None)
    }

    pub(crate) fn fix_suffix<B: Base, const K: usize, const M: usize>(
        &self,
        index: &[usize; K],
    ) -> Result<Region<M>> {
        self.reduce::<B, K, M>(Fixed::Suffix, index, None)
    }

    pub(crate) fn slice<B: Base>(&self, slices: &[Slice; N]) -> Result<Region<N>> {
        self.reduce::<B, 0, N>(Fixed::Prefix, &[], Some(slices))
    }

    pub(crate) fn fix_prefix_slice<B: Base, const K: usize, const M: usize>(
        &self,
        index: &[usize; K],
        slices: &[Slice; M],
    ) -> Result<Region<M>> {
        self.reduce::<B, K, M>(Fixed::Prefix, index, Some(slices))
    }

    pub(crate) fn slice_fix_suffix<B: Base, const K: usize, const M: usize>(
        &self,
        slices: &[Slice; M],
        index: &[usize; K],
    ) -> Result<Region<M>> {
        self.reduce::<B, K, M>(Fixed::Suffix, index, Some(slices))
    }

    /// Fix `K` axes (leading or trailing) and optionally slice the `M` kept axes.
    fn reduce<B: Base, const K: usize, const M: usize>(
        &self,
        fixed: Fixed,
        index: &[usize; K],
        slices: Option<&[Slice; M]>,
    ) -> Result<Region<M>> {
        if K + M != N {
            return Err(NdArrayError::RankMismatch(K + M, N));
        }
        let (fixed_first, kept_first) = match fixed {
            Fixed::Prefix => (0, K),
            Fixed::Suffix => (M, 0),
        };
        let displacement =
            partial_offset::<B>(fixed_first, &self.shape, &self.strides, &self.offsets, index)?;

        let mut out = Region {
            shape: [0; M],
            strides: [0; M],
            offsets: [0; M],
            base: self.base + displacement,
        };
        for j in 0..M {
            let axis = kept_first + j;
            let stride = self.strides[axis];
            match slices {
                Some(slices) => {
                    let r = slices[j].resolve::<B>(axis, self.shape[axis])?;
                    out.shape[j] = r.len;
                    out.strides[j] = stride * r.step;
                    out.offsets[j] = self.offsets[axis] + r.start * stride;
                }
                None => {
                    out.shape[j] = self.shape[axis];
                    out.strides[j] = stride;
                    out.offsets[j] = self.offsets[axis];
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{OneBased, ZeroBased};
    use crate::order::{ColumnMajor, RowMajor};

    #[test]
    fn test_dense_region() {
        let r = Region::dense::<RowMajor>([2, 3]);
        assert_eq!(r.strides, [3, 1]);
        assert_eq!(r.start(), 0);
        assert_eq!(r.len(), 6);
        assert!(r.is_contiguous::<RowMajor>());
        assert!(!r.is_contiguous::<ColumnMajor>());
    }

    #[test]
    fn test_slice_4x4_center() {
        let r = Region::dense::<RowMajor>([4, 4]);
        let s = r
            .slice::<ZeroBased>(&[Slice::new(1, 3, 1), Slice::new(1, 3, 1)])
            .unwrap();
        assert_eq!(s.shape, [2, 2]);
        assert_eq!(s.strides, [4, 1]);
        assert_eq!(s.offsets, [4, 1]);
        assert_eq!(s.start(), 5);
        assert!(!s.is_contiguous::<RowMajor>());
    }

    #[test]
    fn test_slice_with_step() {
        let r = Region::dense::<RowMajor>([10]);
        let s = r.slice::<ZeroBased>(&[Slice::new(1, 10, 3)]).unwrap();
        assert_eq!(s.shape, [3]);
        assert_eq!(s.strides, [3]);
        assert_eq!(s.start(), 1);
    }

    #[test]
    fn test_fix_prefix() {
        let r = Region::dense::<RowMajor>([2, 3, 4]);
        let p: Region<2> = r.fix_prefix::<ZeroBased, 1, 2>(&[1]).unwrap();
        assert_eq!(p.shape, [3, 4]);
        assert_eq!(p.strides, [4, 1]);
        assert_eq!(p.start(), 12);
    }

    #[test]
    fn test_fix_suffix() {
        let r = Region::dense::<RowMajor>([2, 3, 4]);
        let s: Region<1> = r.fix_suffix::<ZeroBased, 2, 1>(&[2, 3]).unwrap();
        assert_eq!(s.shape, [2]);
        assert_eq!(s.strides, [12]);
        assert_eq!(s.start(), 2 * 4 + 3);
    }

    #[test]
    fn test_fix_everything() {
        let r = Region::dense::<ColumnMajor>([2, 3]);
        let s: Region<0> = r.fix_prefix::<ZeroBased, 2, 0>(&[1, 2]).unwrap();
        assert_eq!(s.start(), 1 + 2 * 2);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_rank_mismatch() {
        let r = Region::dense::<RowMajor>([2, 3, 4]);
        let res = r.fix_prefix::<ZeroBased, 1, 1>(&[0]);
        assert!(matches!(res, Err(NdArrayError::RankMismatch(2, 3))));
    }

    #[test]
    fn test_one_based_fix_and_slice() {
        let r = Region::dense::<RowMajor>([3, 4]);
        let p: Region<1> = r
            .fix_prefix_slice::<OneBased, 1, 1>(&[2], &[Slice::new(2, 5, 2)])
            .unwrap();
        // row 1 (zero-based), columns 1 and 3
        assert_eq!(p.shape, [2]);
        assert_eq!(p.strides, [2]);
        assert_eq!(p.start(), 4 + 1);
        assert!(r.fix_prefix::<OneBased, 1, 1>(&[0]).is_err());
    }

    #[test]
    fn test_offset_of_matches_start_after_reduce() {
        let r = Region::dense::<ColumnMajor>([3, 4, 5]);
        let s: Region<2> = r
            .slice_fix_suffix::<ZeroBased, 1, 2>(&[Slice::new(1, 3, 1), Slice::full()], &[4])
            .unwrap();
        for i in 0..2 {
            for j in 0..4 {
                let direct = r.offset_of::<ZeroBased>(&[i + 1, j, 4]).unwrap();
                assert_eq!(s.offset_of::<ZeroBased>(&[i, j]).unwrap(), direct);
            }
        }
    }

    #[test]
    fn test_composition_matches_two_steps() {
        let r = Region::dense::<RowMajor>([3, 4, 5]);
        let slices = [Slice::new(1, 4, 2), Slice::new(0, 5, 3)];
        let one: Region<2> = r.fix_prefix_slice::<ZeroBased, 1, 2>(&[2], &slices).unwrap();
        let two = r
            .fix_prefix::<ZeroBased, 1, 2>(&[2])
            .unwrap()
            .slice::<ZeroBased>(&slices)
            .unwrap();
        assert_eq!(one.shape, two.shape);
        assert_eq!(one.strides, two.strides);
        assert_eq!(one.start(), two.start());
    }
}
