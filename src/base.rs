//! Index-origin strategies.
//!
//! A [`Base`] maps user-facing coordinates to the zero-based coordinates used
//! internally for offset arithmetic.

use std::fmt;

/// Index-origin convention.
pub trait Base: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// First valid coordinate on every axis.
    const ORIGIN: usize;

    #[inline]
    fn origin() -> usize {
        Self::ORIGIN
    }

    /// Convert a user-facing coordinate to a zero-based one.
    ///
    /// Returns `None` when `index` lies below the origin.
    #[inline]
    fn rebase(index: usize) -> Option<usize> {
        index.checked_sub(Self::ORIGIN)
    }

    /// Convert a zero-based coordinate back to the user-facing convention.
    #[inline]
    fn unbase(index: usize) -> usize {
        index + Self::ORIGIN
    }
}

/// Zero-based indexing (`0..extent`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ZeroBased;

/// One-based indexing (`1..=extent`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OneBased;

impl Base for ZeroBased {
    const ORIGIN: usize = 0;

    #[inline]
    fn rebase(index: usize) -> Option<usize> {
        Some(index)
    }
}

impl Base for OneBased {
    const ORIGIN: usize = 1;
}
