//! Database access layer
//!
//! Plain `sqlx` queries against PostgreSQL. Functions that take a
//! [`sqlx::PgExecutor`] run either on the pool or inside a workflow
//! transaction (`&mut *tx`).

pub mod audit;
pub mod catalog;
pub mod demand;
pub mod matrix;
pub mod price_history;
pub mod quotations;
pub mod teams;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
