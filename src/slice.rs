//! Slice descriptors.
//!
//! A [`Slice`] selects a strided sub-range `start..stop` (step `step`) of one
//! axis. `start` and `stop` are user-facing coordinates under the view's
//! [`Base`]; leaving either unspecified selects the natural edge of the axis.

use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use crate::base::Base;
use crate::{NdArrayError, Result};

/// A `(start, stop, step)` triple describing a strided sub-range of one axis.
///
/// `stop` is exclusive. The selected length is `ceil((stop - start) / step)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slice {
    start: Option<usize>,
    stop: Option<usize>,
    step: usize,
}

/// A slice resolved against a concrete axis, in zero-based coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedSlice {
    pub(crate) start: usize,
    pub(crate) len: usize,
    pub(crate) step: usize,
}

impl Slice {
    /// Slice `start..stop` with the given step.
    pub const fn new(start: usize, stop: usize, step: usize) -> Self {
        Self {
            start: Some(start),
            stop: Some(stop),
            step,
        }
    }

    /// The whole axis.
    pub const fn full() -> Self {
        Self {
            start: None,
            stop: None,
            step: 1,
        }
    }

    /// From `start` to the end of the axis.
    pub const fn starting_at(start: usize) -> Self {
        Self {
            start: Some(start),
            stop: None,
            step: 1,
        }
    }

    /// From the origin of the axis up to `stop` (exclusive).
    pub const fn up_to(stop: usize) -> Self {
        Self {
            start: None,
            stop: Some(stop),
            step: 1,
        }
    }

    /// Same bounds, different step.
    pub const fn step_by(self, step: usize) -> Self {
        Self { step, ..self }
    }

    #[inline]
    pub fn start(&self) -> Option<usize> {
        self.start
    }

    #[inline]
    pub fn stop(&self) -> Option<usize> {
        self.stop
    }

    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Resolve against `axis` of length `extent`.
    pub(crate) fn resolve<B: Base>(&self, axis: usize, extent: usize) -> Result<ResolvedSlice> {
        let start = self.start.unwrap_or(B::ORIGIN);
        let stop = self.stop.unwrap_or(B::ORIGIN + extent);
        let invalid = NdArrayError::InvalidSlice {
            axis,
            start,
            stop,
            step: self.step,
        };
        if self.step == 0 || start > stop {
            return Err(invalid);
        }
        let out_of_range = |index| NdArrayError::OutOfRange {
            axis,
            index,
            extent,
        };
        let zero_start = B::rebase(start).ok_or_else(|| out_of_range(start))?;
        let zero_stop = B::rebase(stop).ok_or_else(|| out_of_range(stop))?;
        if zero_stop > extent {
            return Err(out_of_range(stop));
        }
        Ok(ResolvedSlice {
            start: zero_start,
            len: compute_slice_len(zero_start, zero_stop, self.step),
            step: self.step,
        })
    }
}

impl Default for Slice {
    fn default() -> Self {
        Self::full()
    }
}

impl From<RangeFull> for Slice {
    fn from(_: RangeFull) -> Self {
        Self::full()
    }
}

impl From<Range<usize>> for Slice {
    fn from(r: Range<usize>) -> Self {
        Self::new(r.start, r.end, 1)
    }
}

impl From<RangeFrom<usize>> for Slice {
    fn from(r: RangeFrom<usize>) -> Self {
        Self::starting_at(r.start)
    }
}

impl From<RangeTo<usize>> for Slice {
    fn from(r: RangeTo<usize>) -> Self {
        Self::up_to(r.end)
    }
}

impl From<RangeInclusive<usize>> for Slice {
    fn from(r: RangeInclusive<usize>) -> Self {
        Self::new(*r.start(), r.end().saturating_add(1), 1)
    }
}

impl From<RangeToInclusive<usize>> for Slice {
    fn from(r: RangeToInclusive<usize>) -> Self {
        Self::up_to(r.end.saturating_add(1))
    }
}

fn compute_slice_len(start: usize, stop: usize, step: usize) -> usize {
    stop.saturating_sub(start).div_ceil(step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{OneBased, ZeroBased};

    #[test]
    fn test_slice_len() {
        assert_eq!(compute_slice_len(0, 10, 1), 10);
        assert_eq!(compute_slice_len(0, 10, 3), 4);
        assert_eq!(compute_slice_len(1, 3, 1), 2);
        assert_eq!(compute_slice_len(4, 4, 2), 0);
    }

    #[test]
    fn test_resolve_defaults() {
        let r = Slice::full().resolve::<ZeroBased>(0, 5).unwrap();
        assert_eq!(
            r,
            ResolvedSlice {
                start: 0,
                len: 5,
                step: 1
            }
        );
        let r = Slice::full().resolve::<OneBased>(0, 5).unwrap();
        assert_eq!(r.start, 0);
        assert_eq!(r.len, 5);
    }

    #[test]
    fn test_resolve_one_based_bounds() {
        // 2..4 in one-based coordinates covers zero-based 1 and 2
        let r = Slice::new(2, 4, 1).resolve::<OneBased>(0, 5).unwrap();
        assert_eq!(r.start, 1);
        assert_eq!(r.len, 2);
        assert!(Slice::new(0, 2, 1).resolve::<OneBased>(0, 5).is_err());
        assert!(Slice::up_to(7).resolve::<OneBased>(0, 5).is_err());
        assert!(Slice::up_to(6).resolve::<OneBased>(0, 5).is_ok());
    }

    #[test]
    fn test_resolve_rejects_bad_step_and_order() {
        assert!(matches!(
            Slice::full().step_by(0).resolve::<ZeroBased>(1, 4),
            Err(NdArrayError::InvalidSlice { axis: 1, .. })
        ));
        assert!(matches!(
            Slice::new(3, 1, 1).resolve::<ZeroBased>(0, 4),
            Err(NdArrayError::InvalidSlice { .. })
        ));
    }

    #[test]
    fn test_resolve_stop_past_extent() {
        assert!(matches!(
            Slice::new(0, 5, 1).resolve::<ZeroBased>(2, 4),
            Err(NdArrayError::OutOfRange {
                axis: 2,
                index: 5,
                extent: 4
            })
        ));
    }

    #[test]
    fn test_from_ranges() {
        assert_eq!(Slice::from(..), Slice::full());
        assert_eq!(Slice::from(1..3), Slice::new(1, 3, 1));
        assert_eq!(Slice::from(1..=3), Slice::new(1, 4, 1));
        assert_eq!(Slice::from(2..).start(), Some(2));
        assert_eq!(Slice::from(..2).stop(), Some(2));
        assert_eq!(Slice::from(..=2).stop(), Some(3));
    }

    #[test]
    fn test_inclusive_range_to_max_is_out_of_range() {
        let s = Slice::from(0..=usize::MAX);
        assert_eq!(s.stop(), Some(usize::MAX));
        assert!(matches!(
            s.resolve::<ZeroBased>(0, 4),
            Err(NdArrayError::OutOfRange {
                axis: 0,
                index: usize::MAX,
                extent: 4
            })
        ));
        assert!(matches!(
            Slice::from(..=usize::MAX).resolve::<OneBased>(1, 4),
            Err(NdArrayError::OutOfRange { axis: 1, .. })
        ));
    }
}
