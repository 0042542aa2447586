#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    ptr::NonNull,
    rc::Rc,
};

use uniq_mem::{
    policy::{Destroy, DefaultDestroy},
    Allocator, GlobalAlloc,
};

/// Forwards to [`DefaultDestroy`] and counts the calls across clones.
#[derive(Clone, Default)]
pub struct CountingDestroy {
    calls: Rc<Cell<usize>>,
}

impl CountingDestroy {

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<T: ?Sized> Destroy<T> for CountingDestroy {

    unsafe fn destroy(&mut self, ptr: NonNull<T>) {
        self.calls.set(self.calls.get() + 1);
        unsafe { DefaultDestroy.destroy(ptr) }
    }
}

/// [`GlobalAlloc`] with bookkeeping.
#[derive(Default)]
pub struct CountingAlloc {
    pub allocs: Cell<usize>,
    pub frees: Cell<usize>,
    pub live_bytes: Cell<usize>,
}

impl Allocator for CountingAlloc {

    unsafe fn allocate_raw(&self, size: usize, align: usize) -> Option<NonNull<u8>> {
        let ptr = unsafe { GlobalAlloc.allocate_raw(size, align)? };
        self.allocs.set(self.allocs.get() + 1);
        self.live_bytes.set(self.live_bytes.get() + size);
        Some(ptr)
    }

    unsafe fn free_raw(&self, ptr: NonNull<u8>, size: usize, align: usize) {
        self.frees.set(self.frees.get() + 1);
        self.live_bytes.set(self.live_bytes.get() - size);
        unsafe { GlobalAlloc.free_raw(ptr, size, align) }
    }
}

/// Never hands out memory.
pub struct FailingAlloc;

impl Allocator for FailingAlloc {

    unsafe fn allocate_raw(&self, _size: usize, _align: usize) -> Option<NonNull<u8>> {
        None
    }

    unsafe fn free_raw(&self, _ptr: NonNull<u8>, _size: usize, _align: usize) {
        panic!("nothing was allocated")
    }
}

pub type DropLog = Rc<RefCell<Vec<&'static str>>>;

/// Appends its name to a shared log when dropped.
pub struct Tracked {
    pub name: &'static str,
    log: DropLog,
}

impl Tracked {

    pub fn new(name: &'static str, log: &DropLog) -> Self {
        Self {
            name,
            log: log.clone(),
        }
    }
}

impl Drop for Tracked {

    fn drop(&mut self) {
        self.log.borrow_mut().push(self.name);
    }
}
