use core::{
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
    mem::{self, ManuallyDrop},
    ops::{Deref, DerefMut},
    ptr::{self, NonNull},
};

use crate::{
    macros::assert_pointer_sized,
    policy::{Destroy, DefaultDestroy},
    Observer, Null, Upcast,
};

/// An exclusive owner of one heap value, or of nothing.
///
/// The value is released by the destruction policy `D` exactly once: when the
/// handle is dropped, or when a new value is [`assign`](Unique::assign)ed over
/// it. [`release`](Unique::release) hands the value out without releasing it.
///
/// Non-empty handles come from the [`factory`](crate::factory) entry points.
/// Empty handles can be made directly with [`Unique::null`] when `D` is
/// default-constructible, or with [`Unique::with_destroyer`] otherwise.
///
/// A handle is not `Clone`. It is `Send`/`Sync` when both `T` and `D` are, so it
/// can be handed to another thread, but it provides no synchronization of its
/// own.
pub struct Unique<T: ?Sized, D: Destroy<T> = DefaultDestroy> {
    raw: Option<NonNull<T>>,
    destroyer: D,
    _marker: PhantomData<T>,
}

assert_pointer_sized!(Unique<u64>, Unique<String>);

impl<T: ?Sized, D: Destroy<T> + Default> Unique<T, D> {

    /// An empty handle with a default-constructed policy.
    ///
    /// A `fn` pointer policy has no default and has to be given through
    /// [`Unique::with_destroyer`]:
    ///
    /// ```compile_fail
    /// use core::ptr::NonNull;
    /// use uniq_mem::Unique;
    ///
    /// let handle = Unique::<u8, fn(NonNull<u8>)>::null();
    /// ```
    #[inline(always)]
    pub fn null() -> Self {
        Self::with_destroyer(D::default())
    }
}

impl<T: ?Sized, D: Destroy<T>> Unique<T, D> {

    #[inline(always)]
    pub fn with_destroyer(destroyer: D) -> Self {
        Self {
            raw: None,
            destroyer,
            _marker: PhantomData,
        }
    }

    /// # Safety
    /// `raw` must point to a live value nothing else owns, and `destroyer` must be
    /// able to release it.
    #[inline(always)]
    pub(crate) unsafe fn from_raw_parts(raw: NonNull<T>, destroyer: D) -> Self {
        Self {
            raw: Some(raw),
            destroyer,
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    fn into_raw_parts(self) -> (Option<NonNull<T>>, D) {
        let mut this = ManuallyDrop::new(self);
        let raw = this.raw.take();
        let destroyer = unsafe { ptr::read(&this.destroyer) };
        (raw, destroyer)
    }

    #[inline(always)]
    pub fn is_some(&self) -> bool {
        self.raw.is_some()
    }

    #[inline(always)]
    pub fn is_null(&self) -> bool {
        self.raw.is_none()
    }

    /// Gives up ownership without destroying the value.
    ///
    /// The caller becomes responsible for releasing the returned pointer.
    #[inline(always)]
    pub fn release(&mut self) -> Option<NonNull<T>> {
        self.raw.take()
    }

    /// An observer of the current value, null if the handle is empty.
    #[inline(always)]
    pub fn get(&self) -> Observer<T> {
        self.raw.map_or(Observer::null(), Observer::from)
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> Option<NonNull<T>> {
        self.raw
    }

    #[inline(always)]
    pub fn as_ref(&self) -> Option<&T> {
        self.raw.map(|ptr| unsafe { ptr.as_ref() })
    }

    #[inline(always)]
    pub fn as_mut(&mut self) -> Option<&mut T> {
        self.raw.map(|mut ptr| unsafe { ptr.as_mut() })
    }

    #[inline(always)]
    pub fn destroyer(&self) -> &D {
        &self.destroyer
    }

    /// Mutable access to the bound policy.
    ///
    /// Replacing the policy while the handle holds a value is as risky as binding
    /// one, so this is `unsafe` like [`Factory::destroy_with`]:
    ///
    /// ```compile_fail,E0133
    /// use uniq_mem::{make_unique_in, policy::AllocDestroy, GlobalAlloc};
    ///
    /// let mut handle = make_unique_in(&GlobalAlloc, 1u32).unwrap();
    /// *handle.destroyer_mut() = AllocDestroy::new(&GlobalAlloc);
    /// ```
    ///
    /// # Safety
    /// Whatever the policy is left as must be able to release the current value.
    ///
    /// [`Factory::destroy_with`]: crate::factory::Factory::destroy_with
    #[inline(always)]
    pub unsafe fn destroyer_mut(&mut self) -> &mut D {
        &mut self.destroyer
    }

    /// Exchanges the values of two handles, each together with the policy that
    /// will release it.
    #[inline(always)]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other)
    }

    /// Moves the value into a new handle, leaving `self` empty and still bound to
    /// its policy.
    #[inline(always)]
    pub fn take(&mut self) -> Self
        where
            D: Clone,
    {
        Self {
            raw: self.raw.take(),
            destroyer: self.destroyer.clone(),
            _marker: PhantomData,
        }
    }

    /// Converts into a handle of a type `T` can be owned as, keeping the same
    /// destroyer.
    #[inline(always)]
    pub fn upcast<U: ?Sized>(self) -> Unique<U, D>
        where
            T: Upcast<U>,
            D: Destroy<U>,
    {
        let (raw, destroyer) = self.into_raw_parts();
        Unique {
            raw: raw.map(<T as Upcast<U>>::upcast),
            destroyer,
            _marker: PhantomData,
        }
    }

    /// Destroys the current value, if any, then takes over the value and the
    /// destroyer of `other`.
    pub fn assign<U: ?Sized>(&mut self, other: Unique<U, D>)
        where
            U: Upcast<T>,
            D: Destroy<U>,
    {
        let (raw, destroyer) = other.into_raw_parts();
        self.free();
        self.raw = raw.map(<U as Upcast<T>>::upcast);
        self.destroyer = destroyer;
    }

    /// Destroys the current value, if any. The handle stays bound to its policy.
    #[inline(always)]
    pub fn reset(&mut self) {
        self.free()
    }

    #[inline(always)]
    fn free(&mut self) {
        if let Some(raw) = self.raw.take() {
            unsafe {
                self.destroyer.destroy(raw)
            }
        }
    }
}

impl<T: ?Sized> From<Box<T>> for Unique<T, DefaultDestroy> {

    #[inline(always)]
    fn from(value: Box<T>) -> Self {
        unsafe {
            Self::from_raw_parts(NonNull::from(Box::leak(value)), DefaultDestroy)
        }
    }
}

impl<T: ?Sized> Unique<T, DefaultDestroy> {

    /// Hands the value over to a [`Box`], which releases memory the same way.
    #[inline(always)]
    pub fn into_box(self) -> Option<Box<T>> {
        let (raw, _) = self.into_raw_parts();
        raw.map(|ptr| unsafe { Box::from_raw(ptr.as_ptr()) })
    }
}

impl<T: ?Sized, D: Destroy<T> + Default> Default for Unique<T, D> {

    #[inline(always)]
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized, D: Destroy<T>> Drop for Unique<T, D> {

    #[inline(always)]
    fn drop(&mut self) {
        self.free()
    }
}

#[cold]
#[track_caller]
fn empty_deref() -> ! {
    panic!("dereferenced an empty Unique")
}

impl<T: ?Sized, D: Destroy<T>> Deref for Unique<T, D> {

    type Target = T;

    /// # Panics
    /// If the handle is empty.
    #[track_caller]
    fn deref(&self) -> &T {
        match self.raw {
            Some(ptr) => unsafe { ptr.as_ref() },
            None => empty_deref(),
        }
    }
}

impl<T: ?Sized, D: Destroy<T>> DerefMut for Unique<T, D> {

    #[track_caller]
    fn deref_mut(&mut self) -> &mut T {
        match self.raw {
            Some(mut ptr) => unsafe { ptr.as_mut() },
            None => empty_deref(),
        }
    }
}

impl<T: ?Sized, D: Destroy<T>> PartialEq<Null> for Unique<T, D> {

    #[inline(always)]
    fn eq(&self, _: &Null) -> bool {
        self.is_null()
    }
}

impl<T: ?Sized, D: Destroy<T>> PartialEq<Unique<T, D>> for Null {

    #[inline(always)]
    fn eq(&self, other: &Unique<T, D>) -> bool {
        other.is_null()
    }
}

impl<T: ?Sized, D: Destroy<T>> Debug for Unique<T, D> {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.raw {
            Some(ptr) => write!(f, "Unique({:p})", ptr),
            None => write!(f, "Unique(Null)"),
        }
    }
}

unsafe impl<T: ?Sized + Send, D: Destroy<T> + Send> Send for Unique<T, D> {}
unsafe impl<T: ?Sized + Sync, D: Destroy<T> + Sync> Sync for Unique<T, D> {}
