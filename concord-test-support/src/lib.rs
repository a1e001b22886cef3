//! Shared test utilities used across concord crates.

pub mod proptest_profile;
pub mod tracing;
