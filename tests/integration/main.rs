//! API integration tests
//!
//! Run against a live server (seeded via `cargo run --bin seed`) with:
//! cargo test -- --ignored

mod common;

mod api_tests;
mod loan_flow_tests;
