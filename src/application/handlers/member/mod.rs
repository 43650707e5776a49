//! Member handlers.
//!
//! Command and query handlers for the member registry:
//!
//! ## Commands
//! - Activating and deactivating member groups
//! - Changing a group's e-mail
//! - Deleting members
//!
//! ## Queries
//! - Simple company listing and registry-driven search
//! - Member, name and group lookups
//! - Plan usage under the active subscription

mod activate_member_group;
mod deactivate_member_group;
mod delete_member;
mod find_member;
mod get_member;
mod get_member_by_name;
mod get_member_group;
mod get_used_plan_qty;
mod list_company_members;
mod search_members;
mod update_group_email;

#[cfg(test)]
pub mod test_support;

// Commands
pub use activate_member_group::{
    ActivateMemberGroupCommand, ActivateMemberGroupHandler, ActivateMemberGroupResult,
};
pub use deactivate_member_group::{DeactivateMemberGroupCommand, DeactivateMemberGroupHandler};
pub use delete_member::{DeleteMemberCommand, DeleteMemberHandler};
pub use update_group_email::{UpdateGroupEmailCommand, UpdateGroupEmailHandler};

// Queries
pub use find_member::{
    FindMemberByCustomerQuery, FindMemberByEmailAndNameQuery, FindMemberHandler, FindMemberResult,
};
pub use get_member::{GetMemberHandler, GetMemberQuery, GetMemberResult};
pub use get_member_by_name::{GetMemberByNameHandler, GetMemberByNameQuery, GetMemberByNameResult};
pub use get_member_group::{GetMemberGroupHandler, GetMemberGroupQuery, GetMemberGroupResult};
pub use get_used_plan_qty::{GetUsedPlanQtyHandler, GetUsedPlanQtyQuery, GetUsedPlanQtyResult};
pub use list_company_members::{
    ListCompanyMembersHandler, ListCompanyMembersQuery, ListCompanyMembersResult,
};
pub use search_members::{SearchMembersHandler, SearchMembersQuery, SearchMembersResult};
