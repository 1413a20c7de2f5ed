//! API endpoint modules.
//!
//! Each module adds typed methods to `ApiClient` for a group of related
//! server endpoints.

pub mod catalog;
