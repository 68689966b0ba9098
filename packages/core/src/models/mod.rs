//! Data Models
//!
//! - [`bookmark`] - Parser output (`BookmarkRecord`, `ParseOutcome`)
//! - [`plan`] - Planner output (`ImportPlan` and its entries)
//! - [`destination`] - Persistence row shapes and write statements
//! - [`snapshot`] - Read-only destination lookups used by the planner

pub mod bookmark;
pub mod destination;
pub mod plan;
pub mod snapshot;

pub use bookmark::{BookmarkRecord, ParseOutcome, MAX_TITLE_LENGTH, MAX_URL_LENGTH};
pub use destination::{
    CardScope, CardUrlRecord, GroupRecord, MenuRecord, NewCard, NewGroup, NewMenu, WriteStatement,
};
pub use plan::{
    group_key, menu_key, CardAction, CardPlan, EntityAction, GroupPlan, ImportPlan, MenuPlan,
    PlanStats,
};
pub use snapshot::{DestinationSnapshot, UrlBucket};
