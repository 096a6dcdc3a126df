//! Unit tests for the token authority.

mod authority_tests;
