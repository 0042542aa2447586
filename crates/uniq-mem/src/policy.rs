//! Creation and destruction policies.
//!
//! A [`Create`] policy builds a value and hands out a pointer to it, a [`Destroy`]
//! policy releases what such a pointer refers to. The defaults go through
//! [`GlobalAlloc`](crate::GlobalAlloc) and agree with [`Box`] on layout, the
//! `Alloc*` pair goes through any [`Allocator`](crate::Allocator).

mod create;
mod destroy;
#[cfg(feature = "log")]
mod logged;

pub use create::{Create, DefaultCreate, AllocCreate, TryCreateFn};
pub use destroy::{Destroy, DefaultDestroy, AllocDestroy};
#[cfg(feature = "log")]
pub use logged::Logged;
