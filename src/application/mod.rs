//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::member::{
    // Commands
    ActivateMemberGroupCommand, ActivateMemberGroupHandler, ActivateMemberGroupResult,
    DeactivateMemberGroupCommand, DeactivateMemberGroupHandler,
    DeleteMemberCommand, DeleteMemberHandler,
    UpdateGroupEmailCommand, UpdateGroupEmailHandler,
    // Queries
    FindMemberByCustomerQuery, FindMemberByEmailAndNameQuery, FindMemberHandler, FindMemberResult,
    GetMemberByNameHandler, GetMemberByNameQuery, GetMemberByNameResult,
    GetMemberGroupHandler, GetMemberGroupQuery, GetMemberGroupResult,
    GetMemberHandler, GetMemberQuery, GetMemberResult,
    GetUsedPlanQtyHandler, GetUsedPlanQtyQuery, GetUsedPlanQtyResult,
    ListCompanyMembersHandler, ListCompanyMembersQuery, ListCompanyMembersResult,
    SearchMembersHandler, SearchMembersQuery, SearchMembersResult,
};
