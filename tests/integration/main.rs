//! Integration tests

mod capture_test;
mod store_test;
mod support;
