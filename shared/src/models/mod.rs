//! Data models
//!
//! Shared between quotemaster-cloud and the web console (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL).

pub mod demand;
pub mod matrix;
pub mod price_history;
pub mod product;
pub mod quotation;
pub mod supplier;
pub mod team;

// Re-exports
pub use demand::*;
pub use matrix::*;
pub use price_history::*;
pub use product::*;
pub use quotation::*;
pub use supplier::*;
pub use team::*;
