//! Shared helpers.

pub mod testing;
