//! User directory implementations.

pub mod memory;
pub mod mysql;
