//! Unit tests that need HTTP or provider mocks.

mod providers;
mod suggestion_tests;
