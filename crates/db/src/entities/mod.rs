//! Database entities.

pub mod common_tag;
pub mod entry;
pub mod user;

pub use common_tag::Entity as CommonTag;
pub use entry::Entity as Entry;
pub use user::Entity as User;
