//! Common test utilities for vitrina-subscription-core integration tests

pub mod mock_repos;

#[allow(unused_imports)]
pub use mock_repos::{managed_subscriber, unmanaged_subscriber, MockRepo};
