//! Service layer: multi-step operations over the db layer

pub mod demand;
pub mod matrix;
pub mod workflow;

#[cfg(test)]
mod fixtures;
