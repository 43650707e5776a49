//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Member Ports
//!
//! - `MemberReader` - Point lookups, company listing and composed search
//! - `MemberGroupRepository` - Load and persist a member group aggregate

mod member_group_repository;
mod member_reader;

pub use member_group_repository::MemberGroupRepository;
pub use member_reader::{EmailAndName, MemberReader};
