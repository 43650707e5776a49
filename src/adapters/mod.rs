//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - sqlx-backed reader and repository
//! - `memory` - In-process store for tests and local runs

pub mod memory;
pub mod postgres;

pub use memory::InMemoryMembershipStore;
pub use postgres::{PostgresMemberGroupRepository, PostgresMemberReader};
