use core::{
    alloc::Layout,
    ptr::NonNull,
};

use crate::CreateError;

pub trait Allocator {

    /// # Safety
    /// `size` must be non-zero and `align` a power of two.
    unsafe fn allocate_raw(&self, size: usize, align: usize) -> Option<NonNull<u8>>;

    /// # Safety
    /// `ptr` must come from [`Allocator::allocate_raw`] on `self` with the same `size` and
    /// `align`, and must not be freed twice.
    unsafe fn free_raw(&self, ptr: NonNull<u8>, size: usize, align: usize);

    /// Allocates `size` bytes, rejecting zero-sized and malformed layouts.
    fn allocate_layout(&self, size: usize, align: usize) -> Result<NonNull<u8>, CreateError> {
        let layout = Layout::from_size_align(size, align)
            .map_err(|_| CreateError::InvalidLayout { size, align })?;
        if layout.size() == 0 {
            return Err(CreateError::InvalidLayout { size, align })
        }
        unsafe {
            self.allocate_raw(size, align)
        }.ok_or(CreateError::AllocFailed { size, align })
    }

    /// Allocates uninitialized room for one `T`.
    ///
    /// Zero-sized types get a dangling pointer and never touch the allocator.
    fn allocate_one<T>(&self) -> Result<NonNull<T>, CreateError> {
        if size_of::<T>() == 0 {
            return Ok(NonNull::dangling())
        }
        self.allocate_layout(size_of::<T>(), align_of::<T>())
            .map(|ptr| ptr.cast())
    }

    /// Frees the memory behind `ptr` without dropping the value.
    ///
    /// # Safety
    /// `ptr` must point to a live value allocated by `self` (or be a dangling pointer
    /// to a zero-sized value), and the memory must not be used afterwards.
    unsafe fn free_val<T: ?Sized>(&self, ptr: NonNull<T>) {
        let (size, align) = unsafe {
            let val = ptr.as_ref();
            (size_of_val(val), align_of_val(val))
        };
        if size != 0 {
            unsafe { self.free_raw(ptr.cast(), size, align) }
        }
    }
}
