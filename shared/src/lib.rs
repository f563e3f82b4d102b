//! Shared types for QuoteMaster
//!
//! Common types used by the cloud service and its clients: the error
//! system, procurement models, period keys and small utilities.

pub mod error;
pub mod models;
pub mod period;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
