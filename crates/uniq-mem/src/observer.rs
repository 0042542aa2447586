use core::{
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
    hash::{Hash, Hasher},
    ptr::NonNull,
};

use crate::macros::assert_pointer_sized;

/// The empty sentinel both handle types compare against.
///
/// ```
/// use uniq_mem::{Null, Observer};
///
/// let observer = Observer::<u32>::null();
/// assert!(observer == Null);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Null;

/// A non-owning, copyable pointer to a value owned elsewhere.
///
/// An observer never releases anything. It carries no lifetime, so keeping the
/// observed value alive while the observer is dereferenced is up to the caller.
///
/// Comparison, ordering and hashing use the address of the value only; the
/// metadata of unsized pointers is ignored and a null observer orders before
/// every non-null one.
pub struct Observer<T: ?Sized> {
    raw: Option<NonNull<T>>,
}

assert_pointer_sized!(Observer<u64>, Observer<[u8; 3]>);

impl<T: ?Sized> Observer<T> {

    #[inline(always)]
    pub const fn null() -> Self {
        Self {
            raw: None,
        }
    }

    #[inline(always)]
    pub fn new(ptr: *mut T) -> Self {
        Self {
            raw: NonNull::new(ptr),
        }
    }

    #[inline(always)]
    pub fn is_some(&self) -> bool {
        self.raw.is_some()
    }

    #[inline(always)]
    pub fn is_null(&self) -> bool {
        self.raw.is_none()
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> Option<NonNull<T>> {
        self.raw
    }

    /// The address of the observed value, zero when null.
    #[inline(always)]
    pub fn addr(&self) -> usize {
        self.raw.map_or(0, |ptr| ptr.cast::<u8>().as_ptr() as usize)
    }

    /// # Safety
    /// The observed value must be alive for `'a` and must not be mutated through
    /// any other path while the returned reference exists.
    #[inline(always)]
    pub unsafe fn as_ref<'a>(&self) -> Option<&'a T> {
        self.raw.map(|ptr| unsafe { ptr.as_ref() })
    }

    /// # Safety
    /// The observed value must be alive for `'a` and the returned reference must be
    /// the only access to it while it exists.
    #[inline(always)]
    pub unsafe fn as_mut<'a>(&mut self) -> Option<&'a mut T> {
        self.raw.map(|mut ptr| unsafe { ptr.as_mut() })
    }
}

impl<T: ?Sized> Copy for Observer<T> {}

impl<T: ?Sized> Clone for Observer<T> {

    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Default for Observer<T> {

    #[inline(always)]
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized> From<NonNull<T>> for Observer<T> {

    #[inline(always)]
    fn from(value: NonNull<T>) -> Self {
        Self {
            raw: Some(value),
        }
    }
}

impl<T: ?Sized> From<&T> for Observer<T> {

    #[inline(always)]
    fn from(value: &T) -> Self {
        NonNull::from(value).into()
    }
}

impl<T: ?Sized> From<&mut T> for Observer<T> {

    #[inline(always)]
    fn from(value: &mut T) -> Self {
        NonNull::from(value).into()
    }
}

impl<T: ?Sized> PartialEq for Observer<T> {

    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<T: ?Sized> Eq for Observer<T> {}

impl<T: ?Sized> PartialOrd for Observer<T> {

    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: ?Sized> Ord for Observer<T> {

    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        self.addr().cmp(&other.addr())
    }
}

impl<T: ?Sized> Hash for Observer<T> {

    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state)
    }
}

impl<T: ?Sized> PartialEq<Null> for Observer<T> {

    #[inline(always)]
    fn eq(&self, _: &Null) -> bool {
        self.is_null()
    }
}

impl<T: ?Sized> PartialEq<Observer<T>> for Null {

    #[inline(always)]
    fn eq(&self, other: &Observer<T>) -> bool {
        other.is_null()
    }
}

impl<T: ?Sized> Debug for Observer<T> {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.raw {
            Some(ptr) => write!(f, "Observer({:p})", ptr),
            None => write!(f, "Observer(Null)"),
        }
    }
}
