//! In-memory adapters.
//!
//! - `InMemoryMembershipStore` - Serves both member ports from one graph

mod membership_store;
mod search;

pub use membership_store::InMemoryMembershipStore;
