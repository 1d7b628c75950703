//! Data Transfer Objects for REST request/response serialization.

pub mod upload_dto;

pub use upload_dto::*;
