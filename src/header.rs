use crate::HdrVecError;
use std::alloc::Layout;

/// Smallest number of element slots a buffer is allocated with.
pub const MIN_CAPACITY: usize = 4;

/// Bookkeeping stored in the same allocation, immediately before element 0.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Number of initialized elements.
    pub length: usize,
    /// Number of element slots the allocation holds.
    pub capacity: usize,
}

/// Capacity chosen when `length` elements no longer fit.
///
/// Below `MIN_CAPACITY` this is `MIN_CAPACITY`, otherwise `length / 2 * 4`, which
/// is never smaller than `length`.
pub fn grown_capacity(length: usize) -> Result<usize, HdrVecError> {
    if length < MIN_CAPACITY {
        Ok(MIN_CAPACITY)
    } else {
        (length / 2).checked_mul(4).ok_or(HdrVecError::CapacityOverflow)
    }
}

/// Distance in bytes from the start of the allocation to element 0.
///
/// The header size rounded up to the element alignment. Because the header is
/// a multiple of its own alignment, the header always sits right before element 0.
#[inline(always)]
pub(crate) const fn data_offset<T>() -> usize {
    let size = std::mem::size_of::<Header>();
    let align = std::mem::align_of::<T>();
    (size + align - 1) / align * align
}

/// Layout of a whole buffer: padding, header, then `capacity` elements.
pub(crate) fn layout_for<T>(capacity: usize) -> Result<Layout, HdrVecError> {
    let align = std::mem::align_of::<T>().max(std::mem::align_of::<Header>());
    let size = std::mem::size_of::<T>()
        .checked_mul(capacity)
        .and_then(|bytes| bytes.checked_add(data_offset::<T>()))
        .ok_or(HdrVecError::CapacityOverflow)?;
    Layout::from_size_align(size, align).map_err(|_| HdrVecError::CapacityOverflow)
}
