//! # mcpwrap Common
//!
//! Foundational types shared by every mcpwrap crate:
//!
//! - [`error`] - severity classification implemented by each crate's error enum,
//!   plus [`Diagnostic`] records for failures that were recovered instead of raised
//! - [`logging`] - the [`Pretty`] wrapper for dumping structured values in log lines

pub mod error;
pub mod logging;

pub use error::{Diagnostic, ErrorSeverity, Severity};
pub use logging::Pretty;
