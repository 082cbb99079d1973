//! Bacheca Persistence - SeaORM entities and schema
//!
//! This crate defines the relational model shared by the publication and
//! deletion services:
//! - Dimension hierarchies (`city`/`sub_city`, `category`/`sub_category`)
//! - The denormalized `listing` table (one row per combination)
//! - The `listing_image` table (one row per uploaded file, keyed by group)

pub mod entity;
pub mod schema;
