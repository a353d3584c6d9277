/**!

Pointer arithmetic between the start of a buffer allocation, its header and
its first element.

The element pointer is the handle. Everything else is found by stepping back
from it, so these helpers are only valid for pointers produced by `data_of`
on a live allocation laid out by `header::layout_for`.

*/

use crate::header::{data_offset, Header};
use std::ptr::NonNull;

#[inline(always)]
pub unsafe fn data_of<T>(base: NonNull<u8>) -> NonNull<T> {
    NonNull::new_unchecked(base.as_ptr().add(data_offset::<T>()) as *mut T)
}

#[inline(always)]
pub unsafe fn base_of<T>(data: NonNull<T>) -> *mut u8 {
    (data.as_ptr() as *mut u8).sub(data_offset::<T>())
}

#[inline(always)]
pub unsafe fn header_of<T>(data: NonNull<T>) -> *mut Header {
    (data.as_ptr() as *mut u8).sub(std::mem::size_of::<Header>()) as *mut Header
}
