/// Fails the build if a handle type outgrows a thin pointer.
macro_rules! assert_pointer_sized {
    ($($t:ty),+ $(,)?) => {
        $(
            const _: () = assert!(
                size_of::<$t>() == size_of::<*const ()>(),
                "handle must stay pointer-sized",
            );
        )+
    };
}

pub(crate) use assert_pointer_sized;
