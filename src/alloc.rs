//! Buffer allocation and allocator-propagation policy.
//!
//! An owning array obtains its buffer from a [`BufferAllocator`]. How the
//! allocator travels on copy-assignment, move-assignment and swap is decided
//! by a [`Propagation`] value read once when the array is constructed.

use std::fmt;

/// Source of element buffers for owning arrays.
///
/// On stable Rust this is a policy and identity hook, not a memory source:
/// every buffer is a `Vec<T>` on the global heap, whatever the implementor.
/// An allocator decides when a fresh buffer is requested and, through its
/// `PartialEq`, whether two arrays may exchange buffers without moving
/// elements.
///
/// Allocators compare equal when a buffer obtained from one may be adopted
/// by an array holding the other.
pub trait BufferAllocator: Clone + PartialEq + fmt::Debug {
    /// Return an empty buffer able to hold at least `capacity` elements.
    ///
    /// The buffer must be a global-heap `Vec`; implementors may count or
    /// tag requests but cannot place the memory elsewhere.
    fn allocate<T>(&self, capacity: usize) -> Vec<T>;
}

/// The process-wide global allocator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Global;

impl BufferAllocator for Global {
    #[inline]
    fn allocate<T>(&self, capacity: usize) -> Vec<T> {
        Vec::with_capacity(capacity)
    }
}

/// Whether an array adopts the other operand's allocator.
///
/// - `on_copy`: `clone_from` takes the source's allocator.
/// - `on_move`: `assign` takes the source's allocator (and its buffer).
/// - `on_swap`: `swap` exchanges allocators along with buffers.
///
/// When a flag is off and the two allocators differ, elements are moved into
/// a buffer obtained from the array's own allocator instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Propagation {
    pub on_copy: bool,
    pub on_move: bool,
    pub on_swap: bool,
}

impl Propagation {
    /// Never propagate; every array keeps the allocator it was built with.
    pub const NEVER: Self = Self {
        on_copy: false,
        on_move: false,
        on_swap: false,
    };

    /// Always propagate.
    pub const ALWAYS: Self = Self {
        on_copy: true,
        on_move: true,
        on_swap: true,
    };
}

impl Default for Propagation {
    /// Matches the global allocator: propagate on move only.
    fn default() -> Self {
        Self {
            on_copy: false,
            on_move: true,
            on_swap: false,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::Tagged;
    use super::*;

    #[test]
    fn test_global_allocate() {
        let v: Vec<u8> = Global.allocate(16);
        assert!(v.is_empty());
        assert!(v.capacity() >= 16);
    }

    #[test]
    fn test_default_propagation() {
        let p = Propagation::default();
        assert!(!p.on_copy);
        assert!(p.on_move);
        assert!(!p.on_swap);
    }

    #[test]
    fn test_tagged_counts() {
        let a = Tagged::new(1);
        let _: Vec<i32> = a.allocate(4);
        let _: Vec<i32> = a.clone().allocate(4);
        assert_eq!(a.allocations(), 2);
        assert_eq!(a, Tagged::new(1));
        assert_ne!(a, Tagged::new(2));
    }
}
