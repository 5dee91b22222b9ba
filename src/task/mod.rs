//! Task lifecycle management for the store board.
//!
//! Tasks are created on a board, started, paused for someone else to pick
//! up, completed after an explicit confirmation and finally deleted by a
//! manager. Each step appends to the task's activity log. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
