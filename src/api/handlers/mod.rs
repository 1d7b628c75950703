//! REST endpoint handlers organized by resource.

pub mod system;
pub mod upload;
