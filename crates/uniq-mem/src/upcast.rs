use core::ptr::NonNull;

/// Pointer conversion from a value type into a type it may be owned as, such as
/// a concrete type into a trait object it implements.
///
/// # Safety
/// The returned pointer must address the same allocation, and `size_of_val`,
/// `align_of_val` and dropping through it must describe the original value.
/// Unsizing coercions satisfy this, which is what [`impl_upcast!`] generates.
///
/// [`impl_upcast!`]: crate::impl_upcast
pub unsafe trait Upcast<T: ?Sized> {

    fn upcast(ptr: NonNull<Self>) -> NonNull<T>;
}

unsafe impl<T: ?Sized> Upcast<T> for T {

    #[inline(always)]
    fn upcast(ptr: NonNull<Self>) -> NonNull<T> {
        ptr
    }
}

/// Implements [`Upcast`](crate::Upcast) through unsizing coercion.
///
/// ```
/// use core::fmt::Debug;
/// use uniq_mem::{impl_upcast, make_unique, Unique};
///
/// #[derive(Debug)]
/// struct Meters(f32);
///
/// impl_upcast!(Meters => dyn Debug);
///
/// let length: Unique<dyn Debug> = make_unique(Meters(2.5)).upcast();
/// assert_eq!(format!("{:?}", &*length), "Meters(2.5)");
/// ```
#[macro_export]
macro_rules! impl_upcast {
    ($($from:ty => $to:ty),+ $(,)?) => {
        $(
            unsafe impl $crate::Upcast<$to> for $from {

                #[inline(always)]
                fn upcast(ptr: ::core::ptr::NonNull<Self>) -> ::core::ptr::NonNull<$to> {
                    ptr
                }
            }
        )+
    };
}
