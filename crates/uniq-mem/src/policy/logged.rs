use core::{
    fmt::Display,
    ptr::NonNull,
};

use super::{Create, Destroy};

/// Wraps a creator or destroyer and reports what it does through `uniq-log`.
///
/// Creation and destruction are logged at trace level, creation failures at
/// debug level. Nothing is written until the logger has been initialized.
#[derive(Clone, Copy, Debug)]
pub struct Logged<P> {
    inner: P,
    name: &'static str,
}

impl<P> Logged<P> {

    #[inline(always)]
    pub fn new(inner: P) -> Self {
        Self::named(inner, "value")
    }

    #[inline(always)]
    pub fn named(inner: P, name: &'static str) -> Self {
        Self {
            inner,
            name,
        }
    }

    #[inline(always)]
    pub fn inner(&self) -> &P {
        &self.inner
    }

    #[inline(always)]
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: Default> Default for Logged<P> {

    #[inline(always)]
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<T: ?Sized, Args, C> Create<T, Args> for Logged<C>
    where
        C: Create<T, Args>,
        C::Error: Display,
{
    type Error = C::Error;

    fn create(&mut self, args: Args) -> Result<NonNull<T>, C::Error> {
        match self.inner.create(args) {
            Ok(ptr) => {
                uniq_log::trace!("created {} at {:p}", self.name, ptr);
                Ok(ptr)
            },
            Err(err) => {
                uniq_log::debug!("creating {} failed: {}", self.name, err);
                Err(err)
            },
        }
    }
}

impl<T: ?Sized, D: Destroy<T>> Destroy<T> for Logged<D> {

    unsafe fn destroy(&mut self, ptr: NonNull<T>) {
        uniq_log::trace!("destroying {} at {:p}", self.name, ptr);
        unsafe {
            self.inner.destroy(ptr)
        }
    }
}
