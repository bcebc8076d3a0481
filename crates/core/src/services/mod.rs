//! Business logic services.

#![allow(missing_docs)]

pub mod common_tag;
pub mod entry;
pub mod user;

pub use common_tag::{CommonTagResponse, CommonTagService};
pub use entry::{
    CreateEntryInput, EntryDetailResponse, EntryGroup, EntryListResponse, EntryMetadata,
    EntryService, GroupImage,
};
pub use user::UserService;
