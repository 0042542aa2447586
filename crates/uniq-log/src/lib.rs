//! Colored, target-filtered logging to stderr.
//!
//! The logger is configured once with [`init`] (which reads `RUST_LOG`) or
//! [`init_with_filter`], after which the [`error!`], [`warn!`], [`info!`],
//! [`debug!`] and [`trace!`] macros write lines tagged with the calling
//! module's path. Before initialization every macro is a no-op that returns
//! `false`.

mod log;
mod error;
mod filter;
pub mod fmt;

pub use error::LogError;
pub use filter::Filter;
pub use fmt::{LogFmt, LogFmtBuilder, LogSpec, SegmentSpec};

pub type Result<T> = core::result::Result<T, LogError>;

pub use log::*;
