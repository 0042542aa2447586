//! Exclusive-ownership handles with pluggable creation and destruction policies.
//!
//! [`Unique`] owns one heap value and releases it through its destruction policy
//! exactly once. [`Observer`] points at a value without owning it. Values are
//! built through the [`factory`] entry points, which pick the creation and
//! destruction policies at compile time.
//!
//! ```
//! use uniq_mem::{make_unique, Null};
//!
//! let mut first = make_unique(String::from("owned"));
//! let observer = first.get();
//!
//! let second = first.take();
//! assert!(first == Null);
//! assert_eq!(second.get(), observer);
//! assert_eq!(*second, "owned");
//! ```

mod macros;
mod allocator;
mod global_alloc;
mod errors;
mod observer;
mod unique;
mod upcast;

pub mod policy;
pub mod factory;

pub use errors::CreateError;
pub use allocator::Allocator;
pub use global_alloc::GlobalAlloc;
pub use observer::{Observer, Null};
pub use unique::Unique;
pub use upcast::Upcast;
pub use factory::{make_unique, make_unique_default, make_unique_in};
