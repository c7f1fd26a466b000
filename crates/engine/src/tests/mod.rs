//! Cross-module tests.

mod concurrency;
mod properties;
