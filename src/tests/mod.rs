//! Crate-level test suites.
//!
//! - `property`: proptest invariants of the match wizard and formatter
//! - `unit`: HTTP-mocked provider tests and mocked-provider suggestion tests

mod property;
mod unit;
