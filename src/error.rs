use std::fmt::{self, Display};

/// Reasons an `HdrVec` operation can refuse to run.
///
/// A failed operation never leaves the buffer half-modified: the length, the
/// capacity and the element bytes are exactly what they were before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HdrVecError {
    /// The allocator returned null for a request of this many bytes.
    OutOfMemory { requested_bytes: usize },
    /// Header plus elements do not fit in a valid allocation layout.
    CapacityOverflow,
    /// The range `at..at + count` is out of bounds for a buffer of `length` elements.
    InvalidRange { at: usize, count: usize, length: usize },
    /// The operation needs an allocated buffer, but the handle is null.
    NullHandle,
}

impl HdrVecError {
    /// True for failures reported by (or on the way to) the allocator.
    pub fn is_allocation_failure(&self) -> bool {
        match self {
            HdrVecError::OutOfMemory { .. } | HdrVecError::CapacityOverflow => true,
            HdrVecError::InvalidRange { .. } | HdrVecError::NullHandle => false,
        }
    }
}

impl Display for HdrVecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HdrVecError::OutOfMemory { requested_bytes } => write!(f, "Allocation of {} bytes failed", requested_bytes),
            HdrVecError::CapacityOverflow => Display::fmt("Requested capacity overflows the allocation size", f),
            HdrVecError::InvalidRange { at, count, length } => write!(f, "Range of {} elements at {} exceeds length {}", count, at, length),
            HdrVecError::NullHandle => Display::fmt("Buffer is not allocated", f),
        }
    }
}

impl std::error::Error for HdrVecError {}
