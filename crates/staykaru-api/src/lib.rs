//! StayKaru image upload API
//!
//! HTTP surface over the storage and processing crates: authenticated uploads
//! for accommodations, food providers and menu items, plus retrieval, deletion
//! and public delivery of the stored files.

pub mod api_doc;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;
