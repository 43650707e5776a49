//! Member listing module.
//!
//! Two read paths over members:
//!
//! - the advanced listing: registry-driven filters and ordering, composed
//!   into a storage-neutral [`ComposedQuery`] and answered with
//!   [`MemberSearchResult`]
//! - the simple listing: page-numbered, assembled into a [`Page`] of
//!   [`MemberListItem`]

mod composer;
mod fields;
mod filter;
mod page;
mod query;
mod registry;
mod summary;

pub use composer::{ComposedQuery, QueryComposer};
pub use fields::{FieldPath, FieldType};
pub use filter::{Condition, FilterKind, Operand, Predicate};
pub use page::{
    total_pages, MemberEntry, MemberListItem, Page, PageRequest, Paginated, DEFAULT_PAGE,
    DEFAULT_PER_PAGE,
};
pub use query::{MemberQuery, SortDirection, SortOrder, LIMIT_MAX, LIMIT_MIN, OFFSET_MIN};
pub use registry::{FilterRegistry, FilterRule};
pub use summary::{MemberSearchResult, MemberSummary};
