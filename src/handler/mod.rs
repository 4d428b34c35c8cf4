//! Request handler module
//!
//! Responsible for request routing dispatch and the three dashboard endpoints.

pub mod data;
pub mod pages;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
