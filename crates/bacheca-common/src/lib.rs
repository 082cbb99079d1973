//! Bacheca Common - Shared types, errors, and settings
//!
//! This crate provides the foundational types used across all Bacheca
//! components:
//! - Error taxonomy for the publication core
//! - Settings loaded from file and environment
//! - Utility functions shared by services

pub mod error;
pub mod settings;
pub mod utils;

// Re-exports for convenience
pub use error::PublishError;
pub use settings::PublicationSettings;
pub use utils::parse_id_list;

/// Discriminator for page-content records (one content block per
/// sub-city/sub-category pairing).
pub const KIND_PAGE_CONTENT: &str = "page_content";

/// Discriminator for classifieds posts.
pub const KIND_POST: &str = "post";

/// Resource status for a file owned by at least one committed record. Image
/// rows only exist for committed files; a file that is merely staged has no
/// row yet and lives in the staging controller until commit or discard.
pub const RESOURCE_COMMITTED: &str = "committed";
