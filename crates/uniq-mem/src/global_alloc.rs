use std::alloc::{Layout, alloc, dealloc};

use core::ptr::NonNull;

use crate::Allocator;

/// The process-global allocator, compatible with [`Box`].
#[derive(Clone, Copy, Default, Debug)]
pub struct GlobalAlloc;

impl Allocator for GlobalAlloc {

    unsafe fn allocate_raw(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        let layout = Layout::from_size_align(size, align).ok()?;
        if layout.size() == 0 {
            return None
        }
        NonNull::new(unsafe { alloc(layout) })
    }

    unsafe fn free_raw(&self, ptr: NonNull<u8>, size: usize, align: usize) {
        debug_assert!(
            Layout::from_size_align(size, align).is_ok_and(|layout| layout.size() != 0),
            "freeing with a layout allocate_raw never accepts: size {size}, align {align}",
        );
        unsafe {
            // same size and align as the allocation, which was a valid layout
            dealloc(ptr.as_ptr(), Layout::from_size_align_unchecked(size, align))
        }
    }
}
