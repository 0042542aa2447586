use core::ptr::NonNull;

use crate::{Allocator, GlobalAlloc};

/// How an owned value is released.
///
/// Implemented for every `FnMut(NonNull<T>)`, so both closures and plain `fn`
/// pointers can be bound as destroyers.
pub trait Destroy<T: ?Sized> {

    /// # Safety
    /// `ptr` must point to a live, uniquely owned value produced by a creator this
    /// policy is paired with. `ptr` is not used by the caller afterwards.
    unsafe fn destroy(&mut self, ptr: NonNull<T>);
}

/// Drops the value and returns its memory to [`GlobalAlloc`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct DefaultDestroy;

impl<T: ?Sized> Destroy<T> for DefaultDestroy {

    #[inline(always)]
    unsafe fn destroy(&mut self, ptr: NonNull<T>) {
        unsafe {
            AllocDestroy::new(&GlobalAlloc).destroy(ptr)
        }
    }
}

/// Drops the value and returns its memory to a borrowed allocator.
pub struct AllocDestroy<'alloc, Alloc: Allocator> {
    alloc: &'alloc Alloc,
}

impl<'alloc, Alloc: Allocator> AllocDestroy<'alloc, Alloc> {

    #[inline(always)]
    pub fn new(alloc: &'alloc Alloc) -> Self {
        Self {
            alloc,
        }
    }

    #[inline(always)]
    pub fn alloc(&self) -> &'alloc Alloc {
        self.alloc
    }
}

impl<'alloc, Alloc: Allocator> Clone for AllocDestroy<'alloc, Alloc> {

    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'alloc, Alloc: Allocator> Copy for AllocDestroy<'alloc, Alloc> {}

impl<'alloc, Alloc: Allocator, T: ?Sized> Destroy<T> for AllocDestroy<'alloc, Alloc> {

    unsafe fn destroy(&mut self, ptr: NonNull<T>) {
        unsafe {
            // size and alignment have to be read before the value is gone
            let (size, align) = {
                let val = ptr.as_ref();
                (size_of_val(val), align_of_val(val))
            };
            ptr.drop_in_place();
            if size != 0 {
                self.alloc.free_raw(ptr.cast(), size, align);
            }
        }
    }
}

impl<T: ?Sized, F> Destroy<T> for F
    where
        F: FnMut(NonNull<T>),
{

    #[inline(always)]
    unsafe fn destroy(&mut self, ptr: NonNull<T>) {
        self(ptr)
    }
}
