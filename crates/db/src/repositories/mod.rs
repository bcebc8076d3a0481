//! Repository layer.
//!
//! Each repository wraps the shared [`sea_orm::DatabaseConnection`] and is
//! the only place that touches the query builder. Services depend on
//! repositories, never on the connection directly, so storage failures can
//! be simulated with a mock connection in tests.

mod common_tag;
mod entry;
mod user;

pub use common_tag::CommonTagRepository;
pub use entry::EntryRepository;
pub use user::UserRepository;
