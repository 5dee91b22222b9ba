//! Storeboard: task lifecycle for a retail store kanban board.
//!
//! Tasks move between columns (todo, in progress, needs pickup, completed)
//! on one of two boards, the front store and the back store. Every move is
//! recorded in an append-only activity log that also answers who started,
//! picked up and completed a task.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure lifecycle rules with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and change signals
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//!
//! # Modules
//!
//! - [`config`]: Board-wide settings
//! - [`task`]: Task lifecycle, activity log and board projection

pub mod config;
pub mod task;
