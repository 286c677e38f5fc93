//! Core domain types for the Staybook hotel booking platform.
//!
//! This crate is the leaf of the workspace: it defines the entities
//! (users, hotels, bookings, vouchers, sessions), the error taxonomy
//! shared by every other crate, configuration loading, and the pure
//! pieces of business logic (loyalty-point arithmetic, input
//! validation) that the persistence and HTTP layers build on.
//!
//! Nothing in here performs I/O.

pub mod config;
pub mod error;
pub mod loyalty;
pub mod types;
pub mod validate;

pub use config::Config;
pub use error::{Error, Result};
