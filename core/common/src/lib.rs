//! Common types shared by the primkit crates.
//!
//! This module provides the provider status space, the error taxonomy
//! derived from it, and the operation selector passed across the provider
//! boundary.

pub mod error;
pub mod status;
pub mod types;

pub use error::{Error, Result};
pub use status::{OsStatus, Status};
pub use types::Operation;
