//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `membership` - Member groups, members, subscriptions and activation
//! - `listing` - Filter registry, query composition and pagination

pub mod foundation;
pub mod listing;
pub mod membership;
