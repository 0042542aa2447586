use core::{
    convert::Infallible,
    ptr::NonNull,
};

use crate::{Allocator, GlobalAlloc, CreateError};

/// How a value is built and placed somewhere it can be owned from.
///
/// `Args` is always a tuple; its arity selects the overload. Closures and `fn`
/// items of up to three arguments returning `NonNull<T>` implement this trait
/// with `Args` set to the tuple of their argument types.
///
/// A creator is only meaningful together with the destroyer that releases what it
/// produced, which is why binding a custom creator to a [`Factory`] is `unsafe`.
///
/// [`Factory`]: crate::factory::Factory
pub trait Create<T: ?Sized, Args> {

    type Error;

    fn create(&mut self, args: Args) -> Result<NonNull<T>, Self::Error>;
}

/// Moves a value into [`GlobalAlloc`] memory.
///
/// `(value,)` places `value`, `()` places `T::default()`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct DefaultCreate;

impl<T> Create<T, (T,)> for DefaultCreate {

    type Error = CreateError;

    #[inline(always)]
    fn create(&mut self, args: (T,)) -> Result<NonNull<T>, CreateError> {
        AllocCreate::new(&GlobalAlloc).create(args)
    }
}

impl<T: Default> Create<T, ()> for DefaultCreate {

    type Error = CreateError;

    #[inline(always)]
    fn create(&mut self, _: ()) -> Result<NonNull<T>, CreateError> {
        AllocCreate::new(&GlobalAlloc).create(())
    }
}

/// Moves a value into memory from a borrowed allocator.
pub struct AllocCreate<'alloc, Alloc: Allocator> {
    alloc: &'alloc Alloc,
}

impl<'alloc, Alloc: Allocator> AllocCreate<'alloc, Alloc> {

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

    fn place<T>(&self, value: T) -> Result<NonNull<T>, CreateError> {
        let ptr = self.alloc.allocate_one::<T>()?;
        unsafe {
            ptr.write(value);
        }
        Ok(ptr)
    }
}

impl<'alloc, Alloc: Allocator> Clone for AllocCreate<'alloc, Alloc> {

    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'alloc, Alloc: Allocator> Copy for AllocCreate<'alloc, Alloc> {}

impl<'alloc, Alloc: Allocator, T> Create<T, (T,)> for AllocCreate<'alloc, Alloc> {

    type Error = CreateError;

    #[inline(always)]
    fn create(&mut self, (value,): (T,)) -> Result<NonNull<T>, CreateError> {
        self.place(value)
    }
}

impl<'alloc, Alloc: Allocator, T: Default> Create<T, ()> for AllocCreate<'alloc, Alloc> {

    type Error = CreateError;

    #[inline(always)]
    fn create(&mut self, _: ()) -> Result<NonNull<T>, CreateError> {
        self.place(T::default())
    }
}

/// Adapts a closure returning `Result<NonNull<T>, E>` into a fallible creator.
#[derive(Clone, Copy, Debug)]
pub struct TryCreateFn<F>(pub F);

macro_rules! impl_create_fn {
    ($($arg:ident),*) => {

        impl<T: ?Sized, F, $($arg),*> Create<T, ($($arg,)*)> for F
            where
                F: FnMut($($arg),*) -> NonNull<T>,
        {
            type Error = Infallible;

            #[allow(non_snake_case)]
            #[inline(always)]
            fn create(&mut self, ($($arg,)*): ($($arg,)*)) -> Result<NonNull<T>, Infallible> {
                Ok(self($($arg),*))
            }
        }

        impl<T: ?Sized, F, E, $($arg),*> Create<T, ($($arg,)*)> for TryCreateFn<F>
            where
                F: FnMut($($arg),*) -> Result<NonNull<T>, E>,
        {
            type Error = E;

            #[allow(non_snake_case)]
            #[inline(always)]
            fn create(&mut self, ($($arg,)*): ($($arg,)*)) -> Result<NonNull<T>, E> {
                (self.0)($($arg),*)
            }
        }
    };
}

impl_create_fn!();
impl_create_fn!(A0);
impl_create_fn!(A0, A1);
impl_create_fn!(A0, A1, A2);
