//! Fixed-rank N-dimensional arrays with zero-copy strided views.
//!
//! An [`NdArray`] owns one contiguous buffer laid out in a chosen memory
//! [`Order`] and addressed under a chosen index [`Base`]. Borrowing it as a
//! [`View`] or [`ViewMut`] gives windows that fix leading or trailing axes,
//! slice axes with a step, or both at once, without copying elements.
//!
//! # Core Types
//!
//! - [`NdArray`]: Owning array, generic over element, rank, order, base and
//!   allocator
//! - [`View`] / [`ViewMut`]: Strided windows over a borrowed buffer
//! - [`Iter`] / [`IterMut`]: Traversal in the array's order, one run of the
//!   fastest-varying axis at a time
//! - [`Slice`]: `start..stop` with a step, for one axis
//! - [`Nested`] and [`nested!`]: Bracketed literals with shape inference
//!
//! # Strategies
//!
//! - [`RowMajor`] / [`ColumnMajor`]: Which axis varies fastest
//! - [`ZeroBased`] / [`OneBased`]: Index origin on every axis
//! - [`BufferAllocator`] and [`Propagation`]: Where buffers come from and how
//!   allocators move between arrays
//!
//! # Example
//!
//! ```rust
//! use strided_ndarray::{nested, NdArray, Slice};
//!
//! let a: NdArray<i32, 2> = NdArray::try_from(nested!([[1, 2, 3], [4, 5, 6]])).unwrap();
//! assert_eq!(a[[1, 2]], 6);
//!
//! // Row 1 as a rank-1 view
//! let row = a.fix_prefix::<1, 1>([1]).unwrap();
//! assert_eq!(row.iter().copied().collect::<Vec<_>>(), vec![4, 5, 6]);
//!
//! // Every other column
//! let cols = a.slice([Slice::full(), Slice::full().step_by(2)]).unwrap();
//! assert_eq!(cols.to_string(), "[[1,3],[4,6]]");
//! ```
//!
//! # Column-major, one-based
//!
//! ```rust
//! use strided_ndarray::{ColumnMajor, NdArray, OneBased};
//!
//! let mut a: NdArray<f64, 2, ColumnMajor, OneBased> = NdArray::new([2, 3]);
//! a[[2, 1]] = 1.5;
//! assert_eq!(a.as_slice()[1], 1.5);
//! assert_eq!(a.strides(), &[1, 2]);
//! ```

mod alloc;
mod array;
mod base;
mod display;
mod eq;
mod iter;
mod nested;
mod offset;
mod order;
mod region;
mod slice;
pub mod view;

// ============================================================================
// Strategies
// ============================================================================
pub use alloc::{BufferAllocator, Global, Propagation};
pub use base::{Base, OneBased, ZeroBased};
pub use order::{ColumnMajor, Order, RowMajor};

// ============================================================================
// Arrays, views and iteration
// ============================================================================
pub use array::NdArray;
pub use iter::{Iter, IterMut};
pub use view::{View, ViewMut};

// ============================================================================
// Indexing and construction helpers
// ============================================================================
pub use nested::{infer_shape, Nested};
pub use offset::AxisTuple;
pub use slice::Slice;

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during array construction, indexing and viewing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NdArrayError {
    /// A nested literal is not rectangular or its depth differs from the rank.
    #[error("shape mismatch at depth {depth}: {reason}")]
    ShapeMismatch { depth: usize, reason: String },

    /// A flat buffer does not hold exactly as many elements as the shape.
    #[error("buffer length {found} does not match shape size {expected}")]
    LengthMismatch { expected: usize, found: usize },

    /// A coordinate lies outside its axis.
    #[error("index {index} out of range for axis {axis} with extent {extent}")]
    OutOfRange {
        axis: usize,
        index: usize,
        extent: usize,
    },

    /// The element count of a shape does not fit in `usize`.
    #[error("shape {0:?} has more elements than fit in usize")]
    SizeOverflow(Vec<usize>),

    /// A view would reach past the end of its buffer.
    #[error("offset {offset} out of range for buffer of length {len}")]
    OffsetOutOfRange { offset: usize, len: usize },

    /// A slice with zero step or with `start > stop`.
    #[error("invalid slice {start}..{stop} step {step} on axis {axis}")]
    InvalidSlice {
        axis: usize,
        start: usize,
        stop: usize,
        step: usize,
    },

    /// Number of supplied axes does not match the rank.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Two coordinates of a mutable view would map to the same element.
    #[error("strides alias distinct coordinates")]
    OverlappingStrides,
}

/// Result type for array operations.
pub type Result<T> = std::result::Result<T, NdArrayError>;
