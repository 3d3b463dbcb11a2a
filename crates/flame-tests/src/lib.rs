//! End-to-end tests for the flame crates.
//!
//! Native generator -> buffer handle -> decoder -> PNG sink -> read back.
