//! PostgreSQL adapters - Database implementations for the member ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresMemberReader` - Point lookups, company listing and search
//! - `PostgresMemberGroupRepository` - Loads and saves member groups

mod member_group_repository;
mod member_reader;
mod rows;

pub use member_group_repository::PostgresMemberGroupRepository;
pub use member_reader::PostgresMemberReader;
