//! # Keygate Infrastructure
//!
//! Concrete [`UserDirectory`] implementations backing the token authority:
//! a MySQL directory over sqlx for production and an in-memory directory for
//! tests and local runs.
//!
//! [`UserDirectory`]: kg_core::directory::UserDirectory

pub mod directory;

pub use directory::memory::MemoryUserDirectory;
pub use directory::mysql::MySqlUserDirectory;
