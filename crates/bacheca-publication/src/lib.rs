//! Bacheca Publication - combinatorial publication and resource lifecycle
//!
//! This crate expands one admin submission into a cartesian set of `listing`
//! rows (sub-city × sub-category), enforcing per-combination uniqueness and
//! keeping uploaded image groups consistent with the rows under transaction
//! commit/rollback. It also owns the batch-deletion path, which removes a
//! shared image group's files only once every referencing row is gone.
//!
//! Pipeline for one submission:
//!
//! ```text
//! resolve axes → duplicate guard → stage files → single-transaction write
//!     loop → commit → replaced-file cleanup + notification
//! ```
//!
//! Any failure after staging deletes exactly the files staged by that
//! submission and rolls the transaction back; a caller never observes a
//! partially-applied expansion.

pub mod axis;
pub mod combination;
pub mod deletion;
pub mod guard;
pub mod model;
pub mod notify;
pub mod orchestrator;
pub mod resources;

pub use deletion::delete_listings;
pub use model::{DeletionOutcome, Payload, PublishOutcome, Submission, UploadedFile};
pub use notify::{NoopNotifier, NotificationSender};
pub use orchestrator::PublicationService;
pub use resources::{LocalResourceStore, ResourceStore};
