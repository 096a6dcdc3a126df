//! Domain layer: entities owned by the token authority.

pub mod entities;
