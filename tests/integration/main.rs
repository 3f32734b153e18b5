//! Integration tests for poly-scout

mod common;
mod config_test;
mod e2e_test;
mod lifecycle_test;
mod store_test;
