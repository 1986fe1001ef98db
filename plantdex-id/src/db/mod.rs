//! Database access for plantdex-id
//!
//! Schema creation lives in `plantdex_common::db`; this module holds the
//! queries.

pub mod thumbnails;
