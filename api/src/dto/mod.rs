//! Request and response DTOs.

pub mod auth;
