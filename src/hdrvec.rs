use crate::dontdothis::{base_of, data_of, header_of};
use crate::header::{self, Header};
use crate::HdrVecError;
use std::alloc;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

/// Growable array whose length and capacity live in a `Header` placed right before
/// the first element, inside the same allocation.
///
/// The handle is a single pointer to element 0, or nothing at all. An unallocated
/// handle behaves as an empty buffer with zero capacity: it reads as an empty slice,
/// the allocating operations (`make`, `grow`, `copy`, `insert`, `push`, `append`)
/// create a fresh buffer from it, and the others (`clear`, `remove`, `pop`,
/// `remove_swap`, `free`) fail with `HdrVecError::NullHandle`.
///
/// Elements are moved around as plain bytes, hence the `Copy` bound.
///
/// Any pointer or slice obtained from the buffer is invalidated by an operation that
/// grows it, because the allocation may move.
pub struct HdrVec<T> where T: Copy {
    data: Option<NonNull<T>>,
}

impl<T> HdrVec<T> where T: Copy {
    /// Returns the null handle. Nothing is allocated.
    #[inline(always)]
    pub const fn new() -> HdrVec<T> {
        HdrVec { data: None }
    }

    /// Allocates an empty buffer with room for exactly `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<HdrVec<T>, HdrVecError> {
        let mut array = HdrVec::new();
        unsafe { array.make(0, capacity)? };
        Ok(array)
    }

    /// Allocates a buffer holding a copy of `source`.
    pub fn from_slice(source: &[T]) -> Result<HdrVec<T>, HdrVecError> {
        let mut array = HdrVec::new();
        array.copy(source, None)?;
        Ok(array)
    }

    /// The header in front of the data, or `None` for the null handle.
    #[inline(always)]
    pub fn header(&self) -> Option<&Header> {
        self.data.map(|data| unsafe { &*header_of(data) })
    }

    #[inline(always)]
    fn header_mut(&mut self) -> Option<&mut Header> {
        self.data.map(|data| unsafe { &mut *header_of(data) })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.header().map_or(0, |header| header.length)
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.header().map_or(0, |header| header.capacity)
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if no allocation is attached to this handle.
    #[inline(always)]
    pub fn is_null(&self) -> bool {
        self.data.is_none()
    }

    /// Pointer to element 0, or null for the null handle.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        self.data.map_or(ptr::null(), |data| data.as_ptr() as *const T)
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.map_or(ptr::null_mut(), |data| data.as_ptr())
    }

    /// Element storage as raw bytes. Reads past `len() * size_of::<T>()` are not checked.
    #[inline(always)]
    pub fn data_ptr(&self) -> *mut u8 {
        self.data.map_or(ptr::null_mut(), |data| data.as_ptr() as *mut u8)
    }

    pub fn as_slice(&self) -> &[T] {
        match self.data {
            Some(data) => unsafe { std::slice::from_raw_parts(data.as_ptr(), self.len()) },
            None => &[],
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len();
        match self.data {
            Some(data) => unsafe { std::slice::from_raw_parts_mut(data.as_ptr(), len) },
            None => &mut [],
        }
    }

    /// Resizes the allocation to exactly `capacity` elements and writes `length` and
    /// `capacity` into the header. A null handle gets a fresh allocation.
    ///
    /// Elements up to the smaller of the old and new capacity are preserved, even if
    /// the allocation moves. On failure the handle and its contents are untouched.
    ///
    /// # Safety
    ///
    /// `length` must not exceed `capacity`, and elements between the previous length
    /// and `length` are uninitialized until written by the caller. They must be
    /// written before they are read through any accessor.
    pub unsafe fn make(&mut self, length: usize, capacity: usize) -> Result<(), HdrVecError> {
        debug_assert!(length <= capacity, "make: length <= capacity");

        let new_layout = header::layout_for::<T>(capacity)?;
        let base = match self.data {
            Some(data) => {
                let old_layout = header::layout_for::<T>(self.capacity())?;
                trace!("realloc {} -> {} bytes", old_layout.size(), new_layout.size());
                alloc::realloc(base_of(data), old_layout, new_layout.size())
            },
            None => {
                trace!("alloc {} bytes", new_layout.size());
                alloc::alloc(new_layout)
            },
        };

        let base = match NonNull::new(base) {
            Some(base) => base,
            None => {
                debug!("allocation of {} bytes failed", new_layout.size());
                return Err(HdrVecError::OutOfMemory { requested_bytes: new_layout.size() });
            },
        };

        let data = data_of::<T>(base);
        header_of(data).write(Header { length, capacity });
        self.data = Some(data);

        Ok(())
    }

    /// Sets the length to `length`, reallocating first if the capacity is too small.
    ///
    /// When the buffer already has room nothing moves; otherwise the new capacity
    /// follows `header::grown_capacity`.
    ///
    /// # Safety
    ///
    /// Growing the length exposes uninitialized elements between the previous length
    /// and `length`. They must be written before they are read.
    pub unsafe fn grow(&mut self, length: usize) -> Result<(), HdrVecError> {
        if let Some(header) = self.header_mut() {
            if header.capacity >= length {
                header.length = length;
                return Ok(());
            }
        }

        let capacity = header::grown_capacity(length)?;
        self.make(length, capacity)
    }

    /// Replaces the contents with `count` elements of `source` (all of it for `None`).
    pub fn copy(&mut self, source: &[T], count: Option<usize>) -> Result<(), HdrVecError> {
        let previous = self.len();
        if let Some(header) = self.header_mut() {
            header.length = 0;
        }

        let result = self.insert(0, source, count);
        if result.is_err() {
            if let Some(header) = self.header_mut() {
                header.length = previous;
            }
        }
        result
    }

    /// Inserts `count` elements of `source` (all of it for `None`) at index `at`,
    /// shifting the elements from `at` onwards to the right.
    ///
    /// `at` may be at most `len()`; an insertion point past the end is rejected.
    pub fn insert(&mut self, at: usize, source: &[T], count: Option<usize>) -> Result<(), HdrVecError> {
        let count = source_count(source, count)?;
        let length = self.len();
        if at > length {
            debug!("insert at {} past length {}", at, length);
            return Err(HdrVecError::InvalidRange { at, count, length });
        }
        let new_length = length.checked_add(count).ok_or(HdrVecError::CapacityOverflow)?;

        unsafe {
            self.grow(new_length)?;
            let data = self.as_mut_ptr();
            ptr::copy(data.add(at), data.add(at + count), length - at);
            ptr::copy_nonoverlapping(source.as_ptr(), data.add(at), count);
        }

        Ok(())
    }

    /// Inserts `elem` right before the current last element, or at index 0 when the
    /// buffer is empty or null.
    ///
    /// The first pushed element therefore stays last, and later ones accumulate in
    /// front of it in push order. Use `append` to add at the end.
    pub fn push(&mut self, elem: T) -> Result<(), HdrVecError> {
        let at = self.len().saturating_sub(1);
        self.insert(at, std::slice::from_ref(&elem), None)
    }

    /// Adds `elem` after the last element.
    pub fn append(&mut self, elem: T) -> Result<(), HdrVecError> {
        let at = self.len();
        let new_length = at.checked_add(1).ok_or(HdrVecError::CapacityOverflow)?;

        unsafe {
            self.grow(new_length)?;
            self.as_mut_ptr().add(at).write(elem);
        }

        Ok(())
    }

    /// Sets the length to 0. The allocation and its bytes stay as they are.
    pub fn clear(&mut self) -> Result<(), HdrVecError> {
        let header = self.header_mut().ok_or(HdrVecError::NullHandle)?;
        header.length = 0;
        Ok(())
    }

    /// Removes `count` elements at `at`, shifting the rest left to close the gap.
    pub fn remove(&mut self, at: usize, count: usize) -> Result<(), HdrVecError> {
        let length = self.len_checked()?;
        let end = range_end(at, count, length)?;

        unsafe {
            let data = self.as_mut_ptr();
            ptr::copy(data.add(end), data.add(at), length - end);
        }
        self.set_len(length - count);

        Ok(())
    }

    /// Drops the last element.
    pub fn pop(&mut self) -> Result<(), HdrVecError> {
        let length = self.len_checked()?;
        if length == 0 {
            return Err(HdrVecError::InvalidRange { at: 0, count: 1, length });
        }
        self.set_len(length - 1);
        Ok(())
    }

    /// Removes `count` elements at `at` by moving the last elements into the gap.
    ///
    /// At most `count` elements are moved regardless of the length, so the order of the
    /// remaining elements is not kept. When fewer than `count` elements follow the gap,
    /// only those are moved.
    pub fn remove_swap(&mut self, at: usize, count: usize) -> Result<(), HdrVecError> {
        let length = self.len_checked()?;
        let end = range_end(at, count, length)?;
        let moved = count.min(length - end);

        unsafe {
            let data = self.as_mut_ptr();
            ptr::copy_nonoverlapping(data.add(length - moved), data.add(at), moved);
        }
        self.set_len(length - count);

        Ok(())
    }

    /// Releases the allocation and turns this into the null handle.
    pub fn free(&mut self) -> Result<(), HdrVecError> {
        let data = self.data.ok_or(HdrVecError::NullHandle)?;
        let layout = header::layout_for::<T>(self.capacity())?;

        trace!("free {} bytes", layout.size());
        self.data = None;
        unsafe { alloc::dealloc(base_of(data), layout) };

        Ok(())
    }

    #[inline(always)]
    fn len_checked(&self) -> Result<usize, HdrVecError> {
        self.header().map(|header| header.length).ok_or(HdrVecError::NullHandle)
    }

    #[inline(always)]
    fn set_len(&mut self, length: usize) {
        if let Some(header) = self.header_mut() {
            header.length = length;
        }
    }
}

/// Resolves the optional element count of `copy` and `insert`.
fn source_count<T>(source: &[T], count: Option<usize>) -> Result<usize, HdrVecError> {
    match count {
        None => Ok(source.len()),
        Some(count) if count <= source.len() => Ok(count),
        Some(count) => Err(HdrVecError::InvalidRange { at: 0, count, length: source.len() }),
    }
}

/// End of the range `at..at + count`, if it lies within `length`.
fn range_end(at: usize, count: usize, length: usize) -> Result<usize, HdrVecError> {
    match at.checked_add(count) {
        Some(end) if end <= length => Ok(end),
        _ => {
            debug!("range of {} at {} exceeds length {}", count, at, length);
            Err(HdrVecError::InvalidRange { at, count, length })
        },
    }
}

impl<T> Default for HdrVec<T> where T: Copy {
    fn default() -> Self {
        HdrVec::new()
    }
}

impl<T> Drop for HdrVec<T> where T: Copy {
    fn drop(&mut self) {
        match self.free() {
            Ok(()) | Err(HdrVecError::NullHandle) => (),
            Err(_e) => {
                debug!("leaking buffer on drop: {}", _e);
            },
        }
    }
}

impl<T> Deref for HdrVec<T> where T: Copy {
    type Target = [T];

    #[inline(always)]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for HdrVec<T> where T: Copy {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}
