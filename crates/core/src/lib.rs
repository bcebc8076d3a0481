//! Core business logic for promptstash.

pub mod access;
pub mod metadata;
pub mod services;

pub use access::check_visibility;
pub use metadata::{ParsedMetadata, parse_metadata, parse_parameter_blob, prompt_words};
pub use services::*;
