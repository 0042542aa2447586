//! Entry points that build a value and wrap it in a [`Unique`].
//!
//! [`Factory`] resolves its creation policy `C` and destruction policy `D` from
//! its type parameters, so every choice is made at compile time:
//!
//! - [`Factory::new`] uses [`DefaultCreate`] and [`DefaultDestroy`].
//! - [`Factory::from_defaults`] default-constructs arbitrary policy types. Plain
//!   `fn` pointers are not `Default`, so a pointer policy named this way without
//!   being supplied fails to compile.
//! - [`Factory::create_with`] and [`Factory::destroy_with`] bind policy
//!   instances, including closures and `fn` items. Both are `unsafe`: the
//!   destroyer has to be able to release whatever the creator produces.
//!
//! The arguments given to [`Factory::make`] are a tuple, forwarded to the creator.
//!
//! ```
//! use core::ptr::NonNull;
//! use uniq_mem::factory::Factory;
//!
//! fn shred(ptr: NonNull<[u8; 4]>) {
//!     drop(unsafe { Box::from_raw(ptr.as_ptr()) });
//! }
//!
//! // `shred` frees through `Box`, which is what the default creator allocates with.
//! let key = unsafe {
//!     Factory::new().destroy_with(shred as fn(NonNull<[u8; 4]>))
//! }.make(([1, 2, 3, 4],));
//! assert_eq!(*key, [1, 2, 3, 4]);
//! ```

use core::{
    fmt::Display,
    marker::PhantomData,
};

use crate::{
    policy::{Create, Destroy, DefaultCreate, DefaultDestroy, AllocCreate, AllocDestroy},
    Allocator, CreateError, Unique,
};

pub struct Factory<T: ?Sized, C = DefaultCreate, D = DefaultDestroy> {
    creator: C,
    destroyer: D,
    _marker: PhantomData<fn() -> *const T>,
}

impl<T: ?Sized> Factory<T, DefaultCreate, DefaultDestroy> {

    #[inline(always)]
    pub fn new() -> Self {
        Self {
            creator: DefaultCreate,
            destroyer: DefaultDestroy,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized> Default for Factory<T, DefaultCreate, DefaultDestroy> {

    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized, C, D> Factory<T, C, D> {

    /// Default-constructs both policies.
    ///
    /// A `fn` pointer policy has no default, so it can't be named here:
    ///
    /// ```compile_fail
    /// use core::ptr::NonNull;
    /// use uniq_mem::{factory::Factory, policy::DefaultCreate};
    ///
    /// let factory = unsafe {
    ///     Factory::<u8, DefaultCreate, fn(NonNull<u8>)>::from_defaults()
    /// };
    /// ```
    ///
    /// # Safety
    /// Pointers produced by `C` must be releasable by `D`.
    #[inline(always)]
    pub unsafe fn from_defaults() -> Self
        where
            C: Default,
            D: Default,
    {
        Self {
            creator: C::default(),
            destroyer: D::default(),
            _marker: PhantomData,
        }
    }

    /// Binds a creator instance.
    ///
    /// # Safety
    /// Pointers produced by `creator` must point to live values nothing else owns,
    /// and the factory's destroyer must be able to release them.
    #[inline(always)]
    pub unsafe fn create_with<C2>(self, creator: C2) -> Factory<T, C2, D> {
        Factory {
            creator,
            destroyer: self.destroyer,
            _marker: PhantomData,
        }
    }

    /// Binds a destroyer instance.
    ///
    /// Binding is `unsafe` even with the default creator, since a destroyer such
    /// as [`AllocDestroy`] frees into memory the creator never allocated from:
    ///
    /// ```compile_fail,E0133
    /// use uniq_mem::{factory::Factory, policy::AllocDestroy, GlobalAlloc};
    ///
    /// let handle = Factory::new()
    ///     .destroy_with(AllocDestroy::new(&GlobalAlloc))
    ///     .make((1u32,));
    /// ```
    ///
    /// # Safety
    /// `destroyer` must be able to release every pointer the factory's creator
    /// produces.
    #[inline(always)]
    pub unsafe fn destroy_with<D2: Destroy<T>>(self, destroyer: D2) -> Factory<T, C, D2> {
        Factory {
            creator: self.creator,
            destroyer,
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    pub fn creator(&self) -> &C {
        &self.creator
    }

    #[inline(always)]
    pub fn destroyer(&self) -> &D {
        &self.destroyer
    }

    /// Builds a value from `args` and hands it to a new handle.
    ///
    /// A creation failure is returned as is; no handle exists at that point, so
    /// nothing gets destroyed.
    pub fn try_make<Args>(mut self, args: Args) -> Result<Unique<T, D>, C::Error>
        where
            C: Create<T, Args>,
            D: Destroy<T>,
    {
        let raw = self.creator.create(args)?;
        Ok(unsafe { Unique::from_raw_parts(raw, self.destroyer) })
    }

    /// Same as [`try_make`](Factory::try_make), panicking if creation fails.
    #[track_caller]
    pub fn make<Args>(self, args: Args) -> Unique<T, D>
        where
            C: Create<T, Args>,
            C::Error: Display,
            D: Destroy<T>,
    {
        match self.try_make(args) {
            Ok(unique) => unique,
            Err(err) => creation_failed(&err),
        }
    }
}

impl<T: ?Sized, C: Clone, D: Clone> Clone for Factory<T, C, D> {

    #[inline(always)]
    fn clone(&self) -> Self {
        Self {
            creator: self.creator.clone(),
            destroyer: self.destroyer.clone(),
            _marker: PhantomData,
        }
    }
}

#[cold]
#[track_caller]
fn creation_failed(err: &dyn Display) -> ! {
    panic!("creation failed: {}", err)
}

/// Moves `value` onto the heap.
///
/// # Panics
/// If the global allocator fails.
#[inline(always)]
#[track_caller]
pub fn make_unique<T>(value: T) -> Unique<T> {
    Factory::new().make((value,))
}

/// Places `T::default()` on the heap.
///
/// # Panics
/// If the global allocator fails.
#[inline(always)]
#[track_caller]
pub fn make_unique_default<T: Default>() -> Unique<T> {
    Factory::new().make(())
}

/// Moves `value` into memory from `alloc`; the handle gives it back there.
#[inline(always)]
pub fn make_unique_in<'alloc, Alloc: Allocator, T>(
    alloc: &'alloc Alloc,
    value: T,
) -> Result<Unique<T, AllocDestroy<'alloc, Alloc>>, CreateError>
{
    let factory = unsafe {
        Factory::new()
            .create_with(AllocCreate::new(alloc))
            .destroy_with(AllocDestroy::new(alloc))
    };
    factory.try_make((value,))
}
